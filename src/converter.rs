// src/converter.rs

use crate::aligner::align_and_snap;
use crate::asc_models::Schematic;
use crate::config::ReconstructConfig;
use crate::detection_models::{ComponentKind, Detection, DetectionClass};
use crate::error::Result;
use crate::placer::SymbolPlacer;
use crate::wires::synthesize_wires;
use crate::writer::to_asc_string;
use log::{info, warn};
use std::collections::HashMap;

/// Detections split by class, each group in input order.
#[derive(Debug, Default)]
pub struct GroupedDetections {
    pub junctions: Vec<Detection>,
    pub components: HashMap<ComponentKind, Vec<Detection>>,
}

/// Groups detections by class. Unrecognized labels are dropped with a warning.
pub fn group_detections(detections: &[Detection]) -> GroupedDetections {
    let mut grouped = GroupedDetections::default();
    for detection in detections {
        match detection.classify() {
            Some(DetectionClass::Junction) => grouped.junctions.push(detection.clone()),
            Some(DetectionClass::Component(kind)) => grouped
                .components
                .entry(kind)
                .or_default()
                .push(detection.clone()),
            None => warn!("Ignoring detection with unknown class '{}'", detection.class),
        }
    }
    grouped
}

/// Reconstructs a schematic from raw detections.
///
/// Junctions become an axis-aligned wire graph, then each component kind is
/// snapped onto those wires. The result is de-duplicated and carries the
/// configured version and sheet.
pub fn reconstruct(detections: &[Detection], config: &ReconstructConfig) -> Result<Schematic> {
    info!("Reconstructing schematic from {} detections", detections.len());
    let grouped = group_detections(detections);

    let junctions = align_and_snap(&grouped.junctions, config.junction_threshold, config.grid);
    let wire_set = synthesize_wires(&junctions, config.angle_tolerance);

    let mut placer = SymbolPlacer::new(&wire_set, config.grid);
    for kind in ComponentKind::PLACEMENT_ORDER {
        if let Some(group) = grouped.components.get(&kind) {
            placer.place(kind, group);
        }
    }
    let placement = placer.finish();

    let mut wires = wire_set.to_wires();
    wires.extend(placement.wires);

    let mut schematic = Schematic {
        version: Some(config.version.clone()),
        sheet: Some(config.sheet),
        components: placement.components,
        wires,
        flags: placement.flags,
    };
    schematic.dedup();

    info!(
        "Reconstructed {} components, {} wires, {} flags",
        schematic.components.len(),
        schematic.wires.len(),
        schematic.flags.len()
    );
    Ok(schematic)
}

/// Reconstructs a schematic and renders it as ASC text.
pub fn reconstruct_asc(detections: &[Detection], config: &ReconstructConfig) -> Result<String> {
    Ok(to_asc_string(&reconstruct(detections, config)?))
}
