// src/wires.rs

use crate::asc_models::Wire;
use glam::DVec2;
use log::debug;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
    Other,
}

/// Angle of the line from `a` to `b`, in degrees within `[0, 360)`.
pub fn slope_angle(a: DVec2, b: DVec2) -> f64 {
    let d = b - a;
    d.y.atan2(d.x).to_degrees().rem_euclid(360.0)
}

/// Classifies a slope angle. The tolerance is exclusive: a line exactly
/// `tolerance` degrees off an axis is `Other`.
pub fn classify_angle(degrees: f64, tolerance: f64) -> Orientation {
    let degrees = degrees.rem_euclid(360.0);
    let half_turn = degrees % 180.0;
    let to_horizontal = half_turn.min(180.0 - half_turn);
    let to_vertical = (degrees - 90.0).abs().min((degrees - 270.0).abs());

    if to_horizontal < tolerance {
        Orientation::Horizontal
    } else if to_vertical < tolerance {
        Orientation::Vertical
    } else {
        Orientation::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedWire {
    pub wire: Wire,
    pub orientation: Orientation,
}

/// Synthesized wires in discovery order, with per-orientation views.
#[derive(Debug, Clone, Default)]
pub struct WireSet {
    wires: Vec<OrientedWire>,
}

impl WireSet {
    pub fn from_wires(wires: Vec<OrientedWire>) -> Self {
        WireSet { wires }
    }

    pub fn all(&self) -> &[OrientedWire] {
        &self.wires
    }

    pub fn horizontal(&self) -> impl Iterator<Item = &Wire> {
        self.of(Orientation::Horizontal)
    }

    pub fn vertical(&self) -> impl Iterator<Item = &Wire> {
        self.of(Orientation::Vertical)
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn to_wires(&self) -> Vec<Wire> {
        self.wires.iter().map(|w| w.wire).collect()
    }

    fn of(&self, orientation: Orientation) -> impl Iterator<Item = &Wire> {
        self.wires
            .iter()
            .filter(move |w| w.orientation == orientation)
            .map(|w| &w.wire)
    }
}

/// Builds the wire for one junction pair, or `None` when the pair is not
/// close enough to an axis.
///
/// The endpoint nearer the origin becomes the start; the end is then moved
/// onto the start's row (horizontal) or column (vertical).
pub fn wire_between(a: (i32, i32), b: (i32, i32), angle_tolerance: f64) -> Option<OrientedWire> {
    let mut wire = Wire::from_endpoints(a, b);
    let start = DVec2::new(wire.x1 as f64, wire.y1 as f64);
    let end = DVec2::new(wire.x2 as f64, wire.y2 as f64);

    let orientation = classify_angle(slope_angle(start, end), angle_tolerance);
    match orientation {
        Orientation::Horizontal => wire.y2 = wire.y1,
        Orientation::Vertical => wire.x2 = wire.x1,
        Orientation::Other => return None,
    }
    Some(OrientedWire { wire, orientation })
}

/// Connects every unordered pair of aligned junctions that lines up with an axis.
///
/// Coincident junctions and repeated segments are skipped.
pub fn synthesize_wires(junctions: &[(i32, i32)], angle_tolerance: f64) -> WireSet {
    let mut wires = Vec::new();
    let mut seen = HashSet::new();

    for (i, &a) in junctions.iter().enumerate() {
        for &b in &junctions[i + 1..] {
            if a == b {
                continue;
            }
            let Some(oriented) = wire_between(a, b, angle_tolerance) else {
                continue;
            };
            if oriented.wire.is_zero_length() || !seen.insert(oriented.wire.key()) {
                continue;
            }
            wires.push(oriented);
        }
    }

    let set = WireSet::from_wires(wires);
    debug!(
        "Synthesized {} wires ({} horizontal, {} vertical) from {} junctions",
        set.len(),
        set.horizontal().count(),
        set.vertical().count(),
        junctions.len()
    );
    set
}
