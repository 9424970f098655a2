// src/placer.rs

use crate::aligner::snap;
use crate::asc_models::*;
use crate::detection_models::{ComponentKind, Detection, PlacementProfile};
use crate::wires::{Orientation, OrientedWire, WireSet};
use log::debug;
use std::collections::HashMap;

/// Next instance number per component kind. Every kind numbers from 1,
/// DC and AC voltage sources included.
#[derive(Debug, Default)]
pub struct InstanceCounters(HashMap<ComponentKind, usize>);

impl InstanceCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self, kind: ComponentKind, prefix: &str) -> String {
        let counter = self.0.entry(kind).or_insert(0);
        *counter += 1;
        format!("{}{}", prefix, counter)
    }
}

/// Everything produced by placing symbols onto a wire set.
#[derive(Debug, Default)]
pub struct Placement {
    pub components: Vec<Component>,
    /// Ground connectors.
    pub wires: Vec<Wire>,
    pub flags: Vec<Flag>,
}

fn strictly_between(value: f64, a: i32, b: i32) -> bool {
    (a.min(b) as f64) < value && value < (a.max(b) as f64)
}

fn within_band(value: f64, a: i32, b: i32, tolerance: f64) -> bool {
    (a.min(b) as f64 - tolerance) < value && value < (a.max(b) as f64 + tolerance)
}

/// Finds the first wire, in discovery order, that the point sits on.
///
/// A vertical wire matches when `y` is strictly inside its span and `x` is
/// within the kind's vertical tolerance; horizontal wires swap the axes.
/// This is first-match, not nearest-match.
pub fn find_attachment(
    wires: &WireSet,
    profile: &PlacementProfile,
    x: f64,
    y: f64,
) -> Option<OrientedWire> {
    wires.all().iter().copied().find(|w| {
        let wire = &w.wire;
        match w.orientation {
            Orientation::Vertical => match profile.vertical_tolerance {
                Some(tolerance) => {
                    strictly_between(y, wire.y1, wire.y2)
                        && within_band(x, wire.x1, wire.x2, tolerance)
                }
                None => false,
            },
            Orientation::Horizontal => {
                strictly_between(x, wire.x1, wire.x2)
                    && within_band(y, wire.y1, wire.y2, profile.horizontal_tolerance)
            }
            Orientation::Other => false,
        }
    })
}

/// Binds detected symbols to wires. Instance numbering and component ids
/// live in the placer, so separate reconstructions never share state.
pub struct SymbolPlacer<'a> {
    wires: &'a WireSet,
    grid: i32,
    counters: InstanceCounters,
    component_counter: usize,
    placement: Placement,
}

impl<'a> SymbolPlacer<'a> {
    pub fn new(wires: &'a WireSet, grid: i32) -> Self {
        SymbolPlacer {
            wires,
            grid,
            counters: InstanceCounters::new(),
            component_counter: 0,
            placement: Placement::default(),
        }
    }

    /// Places every detection of `kind`. Detections that match no wire are dropped.
    pub fn place(&mut self, kind: ComponentKind, detections: &[Detection]) {
        let profile = kind.profile();

        for detection in detections {
            let (px, py) = (detection.x_center, detection.y_center);
            let Some(attached) = find_attachment(self.wires, &profile, px, py) else {
                debug!(
                    "Dropping {:?} at ({:.1}, {:.1}): no wire within tolerance",
                    kind, px, py
                );
                continue;
            };

            let wire = attached.wire;
            let (x, y, rotation) = match attached.orientation {
                Orientation::Vertical => (
                    wire.x1 - profile.wire_offset,
                    snap(py, self.grid) - profile.free_offset,
                    profile.vertical_rotation,
                ),
                _ => (
                    snap(px, self.grid) - profile.free_offset,
                    wire.y1 - profile.wire_offset,
                    profile.horizontal_rotation,
                ),
            };

            match profile.symbol {
                Some(symbol) => self.push_component(kind, symbol, profile.prefix, x, y, rotation),
                None => self.push_ground(x, snap(py, self.grid), y),
            }
        }
    }

    pub fn finish(self) -> Placement {
        debug!(
            "Placed {} symbols and {} ground flags",
            self.placement.components.len(),
            self.placement.flags.len()
        );
        self.placement
    }

    fn push_component(
        &mut self,
        kind: ComponentKind,
        symbol: &str,
        prefix: &str,
        x: i32,
        y: i32,
        rotation: Rotation,
    ) {
        self.component_counter += 1;
        let mut attributes = Attributes::new();
        attributes.insert(NAME_KEY, self.counters.next_name(kind, prefix));

        self.placement.components.push(Component {
            id: format!("comp_{}", self.component_counter),
            component_type: symbol.to_string(),
            x,
            y,
            rotation,
            attributes,
        });
    }

    // Ground is an LTspice net flag plus a short vertical lead from the
    // detected symbol down (or up) to it.
    fn push_ground(&mut self, x: i32, detected_y: i32, flag_y: i32) {
        self.placement.flags.push(Flag {
            x,
            y: flag_y,
            net_name: "0".to_string(),
        });

        let connector = Wire::from_endpoints((x, detected_y), (x, flag_y));
        if !connector.is_zero_length() {
            self.placement.wires.push(connector);
        }
    }
}
