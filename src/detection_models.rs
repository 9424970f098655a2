// src/detection_models.rs

use crate::asc_models::Rotation;
use serde::{Deserialize, Serialize};

/// One object reported by the external detector. Only the class label and
/// the box center are used; the confidence is carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(alias = "name")]
    pub class: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(alias = "xcenter")]
    pub x_center: f64,
    #[serde(alias = "ycenter")]
    pub y_center: f64,
}

impl Detection {
    pub fn new(class: impl Into<String>, x_center: f64, y_center: f64) -> Self {
        Detection {
            class: class.into(),
            confidence: None,
            x_center,
            y_center,
        }
    }

    pub fn classify(&self) -> Option<DetectionClass> {
        DetectionClass::from_label(&self.class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionClass {
    Junction,
    Component(ComponentKind),
}

impl DetectionClass {
    /// Maps detector labels (and their snake_case spellings) to a class.
    pub fn from_label(label: &str) -> Option<Self> {
        let kind = match label {
            "junction" => return Some(DetectionClass::Junction),
            "resistor" => ComponentKind::Resistor,
            "capacitor" | "capacitor-unpolarized" => ComponentKind::Capacitor,
            "inductor" => ComponentKind::Inductor,
            "voltage_dc" | "voltage-dc" => ComponentKind::VoltageDc,
            "voltage_ac" | "voltage-dc_ac" => ComponentKind::VoltageAc,
            "ground" | "gnd" => ComponentKind::Ground,
            _ => return None,
        };
        Some(DetectionClass::Component(kind))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    VoltageDc,
    VoltageAc,
    Ground,
}

/// How a detected symbol snaps onto a wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementProfile {
    /// LTspice symbol name; `None` for kinds emitted as flags.
    pub symbol: Option<&'static str>,
    pub prefix: &'static str,
    /// Allowed distance across a vertical wire; `None` disables vertical attachment.
    pub vertical_tolerance: Option<f64>,
    pub horizontal_tolerance: f64,
    /// Subtracted from the wire coordinate on the constrained axis.
    pub wire_offset: i32,
    /// Subtracted from the detection coordinate on the free axis.
    pub free_offset: i32,
    pub vertical_rotation: Rotation,
    pub horizontal_rotation: Rotation,
}

impl ComponentKind {
    /// Order in which kinds are placed during reconstruction.
    pub const PLACEMENT_ORDER: [ComponentKind; 6] = [
        ComponentKind::Resistor,
        ComponentKind::VoltageDc,
        ComponentKind::VoltageAc,
        ComponentKind::Capacitor,
        ComponentKind::Ground,
        ComponentKind::Inductor,
    ];

    pub fn profile(&self) -> PlacementProfile {
        match self {
            ComponentKind::Resistor | ComponentKind::Inductor => PlacementProfile {
                symbol: Some(if *self == ComponentKind::Resistor { "res" } else { "ind" }),
                prefix: if *self == ComponentKind::Resistor { "R" } else { "L" },
                vertical_tolerance: Some(35.0),
                horizontal_tolerance: 35.0,
                wire_offset: 16,
                free_offset: 0,
                vertical_rotation: Rotation::R0,
                horizontal_rotation: Rotation::R90,
            },
            ComponentKind::Capacitor => PlacementProfile {
                symbol: Some("cap"),
                prefix: "C",
                vertical_tolerance: Some(50.0),
                horizontal_tolerance: 25.0,
                wire_offset: 16,
                free_offset: 0,
                vertical_rotation: Rotation::R0,
                horizontal_rotation: Rotation::R90,
            },
            ComponentKind::VoltageDc | ComponentKind::VoltageAc => PlacementProfile {
                symbol: Some("voltage"),
                prefix: "V",
                vertical_tolerance: Some(25.0),
                horizontal_tolerance: 25.0,
                wire_offset: 0,
                free_offset: 96,
                vertical_rotation: Rotation::R0,
                horizontal_rotation: Rotation::R270,
            },
            // The ground flag sits one grid unit below the wire.
            ComponentKind::Ground => PlacementProfile {
                symbol: None,
                prefix: "",
                vertical_tolerance: None,
                horizontal_tolerance: 200.0,
                wire_offset: -16,
                free_offset: 0,
                vertical_rotation: Rotation::R0,
                horizontal_rotation: Rotation::R270,
            },
        }
    }
}
