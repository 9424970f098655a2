use asc_reconstruct::{
    aligner::{COORD_LIMIT, align_and_snap, snap},
    asc_models::{Rotation, Wire},
    config::ReconstructConfig,
    converter::{group_detections, reconstruct, reconstruct_asc},
    detection_models::{ComponentKind, Detection, DetectionClass},
    detector::DetectorResponse,
    error::Error,
    parser::parse_asc,
    placer::SymbolPlacer,
    wires::{Orientation, OrientedWire, WireSet, classify_angle, synthesize_wires, wire_between},
};

fn junctions(points: &[(f64, f64)]) -> Vec<Detection> {
    points
        .iter()
        .map(|&(x, y)| Detection::new("junction", x, y))
        .collect()
}

fn vertical(x: i32, y1: i32, y2: i32) -> OrientedWire {
    OrientedWire {
        wire: Wire::new(x, y1, x, y2),
        orientation: Orientation::Vertical,
    }
}

fn horizontal(y: i32, x1: i32, x2: i32) -> OrientedWire {
    OrientedWire {
        wire: Wire::new(x1, y, x2, y),
        orientation: Orientation::Horizontal,
    }
}

fn rc_loop() -> Vec<Detection> {
    vec![
        Detection::new("junction", 100.0, 100.0),
        Detection::new("junction", 400.0, 100.0),
        Detection::new("junction", 100.0, 400.0),
        Detection::new("junction", 400.0, 400.0),
        Detection::new("resistor", 250.0, 110.0),
        Detection::new("capacitor-unpolarized", 410.0, 250.0),
        Detection::new("voltage-dc", 100.0, 250.0),
        Detection::new("gnd", 250.0, 450.0),
    ]
}

// --- Junction alignment ---

#[test]
fn test_close_junctions_share_x() {
    let aligned = align_and_snap(&junctions(&[(100.0, 100.0), (130.0, 100.0)]), 50.0, 16);

    assert_eq!(aligned[0].0, aligned[1].0);
    assert_eq!(aligned[0].0 % 16, 0);
    // Both axes collapse here, so no wire can be drawn between them.
    assert_eq!(aligned[0], aligned[1]);
    assert!(synthesize_wires(&aligned, 10.0).is_empty());
}

#[test]
fn test_aligned_pair_forms_vertical_wire() {
    let aligned = align_and_snap(&junctions(&[(100.0, 100.0), (130.0, 300.0)]), 50.0, 16);
    assert_eq!(aligned, vec![(96, 96), (96, 288)]);

    let wires = synthesize_wires(&aligned, 10.0);
    assert_eq!(wires.all(), &[vertical(96, 96, 288)]);
}

#[test]
fn test_pair_close_on_both_axes_aligns_x_only() {
    let aligned = align_and_snap(&junctions(&[(100.0, 100.0), (120.0, 120.0)]), 50.0, 16);
    assert_eq!(aligned, vec![(96, 96), (96, 112)]);
}

#[test]
fn test_y_alignment_when_x_is_far() {
    let aligned = align_and_snap(&junctions(&[(100.0, 200.0), (400.0, 230.0)]), 50.0, 16);
    assert_eq!(aligned, vec![(96, 192), (400, 192)]);
}

#[test]
fn test_alignment_chains_through_moved_junctions() {
    let aligned = align_and_snap(&junctions(&[(10.0, 0.0), (50.0, 300.0), (90.0, 600.0)]), 50.0, 16);
    assert_eq!(aligned, vec![(0, 0), (0, 288), (0, 592)]);

    let wires = synthesize_wires(&aligned, 10.0);
    assert_eq!(
        wires.all(),
        &[vertical(0, 0, 288), vertical(0, 0, 592), vertical(0, 288, 592)]
    );
}

#[test]
fn test_huge_coordinates_are_clamped() {
    let aligned = align_and_snap(&junctions(&[(3.0e9, 10.0), (-3.0e9, 500.0)]), 50.0, 16);
    assert_eq!(aligned, vec![(COORD_LIMIT, 0), (-COORD_LIMIT, 496)]);
}

#[test]
fn test_output_keeps_input_order_and_grid() {
    let points = [(405.3, 17.9), (33.3, 250.0), (700.0, 600.5), (12.0, 12.0)];
    let aligned = align_and_snap(&junctions(&points), 50.0, 16);

    assert_eq!(aligned.len(), points.len());
    for (x, y) in &aligned {
        assert_eq!(x % 16, 0);
        assert_eq!(y % 16, 0);
    }
    assert_eq!(aligned[2], (688, 592));
}

#[test]
fn test_snap_rounds_down() {
    assert_eq!(snap(130.7, 16), 128);
    assert_eq!(snap(96.0, 16), 96);
    assert_eq!(snap(15.99, 16), 0);
    assert_eq!(snap(-5.0, 16), -16);
    assert_eq!(snap(3.0e9, 16), COORD_LIMIT);
    assert_eq!(snap(f64::NEG_INFINITY, 16), -COORD_LIMIT);
    assert_eq!(snap(f64::NAN, 16), 0);
}

// --- Wire synthesis ---

#[test]
fn test_orientation_threshold_is_exclusive() {
    assert_eq!(classify_angle(10.0, 10.0), Orientation::Other);
    assert_eq!(classify_angle(9.9, 10.0), Orientation::Horizontal);
    assert_eq!(classify_angle(350.0, 10.0), Orientation::Other);
    assert_eq!(classify_angle(350.1, 10.0), Orientation::Horizontal);
    assert_eq!(classify_angle(170.0, 10.0), Orientation::Other);
    assert_eq!(classify_angle(189.9, 10.0), Orientation::Horizontal);
    assert_eq!(classify_angle(80.0, 10.0), Orientation::Other);
    assert_eq!(classify_angle(80.1, 10.0), Orientation::Vertical);
    assert_eq!(classify_angle(279.9, 10.0), Orientation::Vertical);
    assert_eq!(classify_angle(45.0, 10.0), Orientation::Other);
}

#[test]
fn test_wire_starts_nearest_origin_and_is_straightened() {
    let wire = wire_between((300, 120), (0, 100), 10.0).expect("horizontal wire");
    assert_eq!(wire.orientation, Orientation::Horizontal);
    assert_eq!(wire.wire, Wire::new(0, 100, 300, 100));

    let wire = wire_between((96, 400), (112, 96), 10.0).expect("vertical wire");
    assert_eq!(wire.orientation, Orientation::Vertical);
    assert_eq!(wire.wire, Wire::new(112, 96, 112, 400));

    assert!(wire_between((0, 0), (100, 100), 10.0).is_none());
}

#[test]
fn test_equal_distance_keeps_first_endpoint() {
    assert_eq!(Wire::from_endpoints((3, 4), (4, 3)).start(), (3, 4));
    assert_eq!(Wire::from_endpoints((4, 3), (3, 4)).start(), (4, 3));
}

#[test]
fn test_synthesized_wires_and_views() {
    let aligned = vec![(96, 96), (400, 96), (96, 400), (400, 400), (96, 96)];
    let wires = synthesize_wires(&aligned, 10.0);

    assert_eq!(
        wires.all(),
        &[
            horizontal(96, 96, 400),
            vertical(96, 96, 400),
            vertical(400, 96, 400),
            horizontal(400, 96, 400),
        ]
    );
    assert_eq!(wires.horizontal().count(), 2);
    assert_eq!(wires.vertical().count(), 2);
}

// --- Symbol placement ---

#[test]
fn test_resistor_attaches_to_vertical_wire() {
    let wires = WireSet::from_wires(vec![vertical(112, 0, 200)]);
    let mut placer = SymbolPlacer::new(&wires, 16);
    placer.place(ComponentKind::Resistor, &[Detection::new("resistor", 108.0, 50.0)]);
    let placement = placer.finish();

    assert_eq!(placement.components.len(), 1);
    let res = &placement.components[0];
    assert_eq!(res.component_type, "res");
    assert_eq!(res.rotation, Rotation::R0);
    assert_eq!(res.x, 96);
    assert_eq!(res.y, 48);
    assert_eq!(res.attributes.name(), Some("R1"));
}

#[test]
fn test_first_matching_wire_wins() {
    // Both wires are in range; the nearer one comes second.
    let wires = WireSet::from_wires(vec![vertical(128, 0, 200), vertical(96, 0, 200)]);
    let mut placer = SymbolPlacer::new(&wires, 16);
    placer.place(ComponentKind::Inductor, &[Detection::new("inductor", 100.0, 100.0)]);
    let placement = placer.finish();

    assert_eq!(placement.components[0].x, 112);
    assert_eq!(placement.components[0].attributes.name(), Some("L1"));
}

#[test]
fn test_span_test_is_strict() {
    let wires = WireSet::from_wires(vec![vertical(112, 0, 200)]);
    let mut placer = SymbolPlacer::new(&wires, 16);
    placer.place(
        ComponentKind::Resistor,
        &[
            Detection::new("resistor", 112.0, 200.0),
            Detection::new("resistor", 147.0, 100.0),
        ],
    );
    assert!(placer.finish().components.is_empty());
}

#[test]
fn test_capacitor_tolerance_differs_by_orientation() {
    let wires = WireSet::from_wires(vec![vertical(400, 96, 400), horizontal(96, 96, 400)]);
    let mut placer = SymbolPlacer::new(&wires, 16);
    placer.place(
        ComponentKind::Capacitor,
        &[
            // 45 off a vertical wire: inside the capacitor's 50.
            Detection::new("capacitor", 445.0, 250.0),
            // 30 off a horizontal wire: outside its 25.
            Detection::new("capacitor", 250.0, 126.0),
            Detection::new("capacitor", 250.0, 110.0),
        ],
    );
    let placement = placer.finish();

    assert_eq!(placement.components.len(), 2);
    assert_eq!(
        (placement.components[0].x, placement.components[0].y),
        (384, 240)
    );
    assert_eq!(placement.components[1].rotation, Rotation::R90);
    assert_eq!(
        (placement.components[1].x, placement.components[1].y),
        (240, 80)
    );
    assert_eq!(placement.components[1].attributes.name(), Some("C2"));
}

#[test]
fn test_voltage_sources_number_per_kind() {
    let wires = WireSet::from_wires(vec![vertical(96, 96, 400), horizontal(400, 96, 400)]);
    let mut placer = SymbolPlacer::new(&wires, 16);
    placer.place(
        ComponentKind::VoltageDc,
        &[
            Detection::new("voltage-dc", 100.0, 250.0),
            Detection::new("voltage-dc", 100.0, 300.0),
        ],
    );
    placer.place(ComponentKind::VoltageAc, &[Detection::new("voltage-dc_ac", 250.0, 410.0)]);
    let placement = placer.finish();

    let dc = &placement.components[0];
    assert_eq!((dc.x, dc.y, dc.rotation), (96, 144, Rotation::R0));
    assert_eq!(dc.attributes.name(), Some("V1"));
    assert_eq!(placement.components[1].attributes.name(), Some("V2"));

    let ac = &placement.components[2];
    assert_eq!((ac.x, ac.y, ac.rotation), (144, 400, Rotation::R270));
    // AC sources keep their own sequence.
    assert_eq!(ac.attributes.name(), Some("V1"));
    assert_eq!(ac.id, "comp_3");
}

#[test]
fn test_ground_emits_flag_and_connector() {
    let wires = WireSet::from_wires(vec![vertical(96, 96, 400), horizontal(400, 96, 400)]);
    let mut placer = SymbolPlacer::new(&wires, 16);
    placer.place(
        ComponentKind::Ground,
        &[
            Detection::new("gnd", 250.0, 450.0),
            // Ground never attaches to vertical wires.
            Detection::new("gnd", 100.0, 150.0),
        ],
    );
    let placement = placer.finish();

    assert!(placement.components.is_empty());
    assert_eq!(placement.flags.len(), 1);
    assert_eq!((placement.flags[0].x, placement.flags[0].y), (240, 416));
    assert_eq!(placement.flags[0].net_name, "0");
    assert_eq!(placement.wires, vec![Wire::new(240, 416, 240, 448)]);
}

// --- Orchestration ---

#[test]
fn test_reconstruct_rc_loop() {
    let asc = reconstruct_asc(&rc_loop(), &ReconstructConfig::default()).expect("Should reconstruct");

    assert_eq!(
        asc,
        "Version 4\n\
         SHEET 1 880 680\n\
         SYMBOL res 240 80 R90\n\
         SYMATTR InstName R1\n\
         SYMBOL voltage 96 144 R0\n\
         SYMATTR InstName V1\n\
         SYMBOL cap 384 240 R0\n\
         SYMATTR InstName C1\n\
         WIRE 96 96 400 96\n\
         WIRE 96 96 96 400\n\
         WIRE 400 96 400 400\n\
         WIRE 96 400 400 400\n\
         WIRE 240 416 240 448\n\
         FLAG 240 416 0\n"
    );
}

#[test]
fn test_reconstruction_round_trips_through_text() {
    let schematic = reconstruct(&rc_loop(), &ReconstructConfig::default()).expect("Should reconstruct");
    let reparsed = parse_asc(&asc_reconstruct::writer::to_asc_string(&schematic)).expect("Should parse");
    assert!(reparsed.same_structure(&schematic));

    for c in &schematic.components {
        assert_eq!(c.x % 16, 0);
        assert_eq!(c.y % 16, 0);
    }
}

#[test]
fn test_reconstruction_is_deterministic() {
    let config = ReconstructConfig::default();
    let first = reconstruct(&rc_loop(), &config).expect("Should reconstruct");
    let second = reconstruct(&rc_loop(), &config).expect("Should reconstruct");
    assert_eq!(first, second);
}

#[test]
fn test_unmatched_and_unknown_detections_are_dropped() {
    let mut detections = rc_loop();
    detections.push(Detection::new("transistor", 250.0, 110.0));
    detections.push(Detection::new("resistor", 700.0, 700.0));

    let schematic = reconstruct(&detections, &ReconstructConfig::default()).expect("Should reconstruct");
    assert_eq!(schematic.components.len(), 3);
}

#[test]
fn test_reconstruct_far_out_detections() {
    let limit = COORD_LIMIT as f64;
    let detections = vec![
        Detection::new("junction", 3.0e9, 100.0),
        Detection::new("junction", 3.0e9, 400.0),
        Detection::new("junction", -3.0e9, 100.0),
        Detection::new("resistor", limit + 5.0, 250.0),
        Detection::new("voltage-dc", -3.0e9, 110.0),
    ];
    let schematic = reconstruct(&detections, &ReconstructConfig::default()).expect("Should reconstruct");

    assert_eq!(
        schematic.wires,
        vec![
            Wire::new(COORD_LIMIT, 96, COORD_LIMIT, 400),
            Wire::new(COORD_LIMIT, 96, -COORD_LIMIT, 96),
        ]
    );
    assert_eq!(schematic.components.len(), 1);
    assert_eq!(schematic.components[0].x, COORD_LIMIT - 16);
    assert_eq!(schematic.components[0].y, 240);
}

#[test]
fn test_no_junctions_yields_header_only() {
    let detections = vec![Detection::new("resistor", 100.0, 100.0)];
    let schematic = reconstruct(&detections, &ReconstructConfig::default()).expect("Should reconstruct");

    assert!(schematic.components.is_empty());
    assert!(schematic.wires.is_empty());
    assert_eq!(schematic.version.as_deref(), Some("4"));
    assert!(matches!(
        schematic.ensure_has_components(),
        Err(Error::EmptyInputError(_))
    ));
}

#[test]
fn test_group_detections() {
    let grouped = group_detections(&rc_loop());
    assert_eq!(grouped.junctions.len(), 4);
    assert_eq!(grouped.components[&ComponentKind::Resistor].len(), 1);
    assert_eq!(grouped.components[&ComponentKind::Ground].len(), 1);
    assert!(!grouped.components.contains_key(&ComponentKind::Inductor));
}

// --- Config & collaborator formats ---

#[test]
fn test_config_from_json_overrides_defaults() {
    let config = ReconstructConfig::from_json_str(r#"{ "grid": 8, "version": "4.1" }"#)
        .expect("Should load config");
    assert_eq!(config.grid, 8);
    assert_eq!(config.version, "4.1");
    assert_eq!(config.junction_threshold, 50.0);
    assert_eq!(config.sheet.width, 880);

    assert!(matches!(
        ReconstructConfig::from_json_str("{ grid: }"),
        Err(Error::JsonError(_))
    ));
}

#[test]
fn test_detection_labels_and_aliases() {
    let detection: Detection = serde_json::from_str(
        r#"{ "name": "capacitor-unpolarized", "confidence": 0.91, "xcenter": 410.5, "ycenter": 250 }"#,
    )
    .expect("Should deserialize");
    assert_eq!(detection.x_center, 410.5);
    assert_eq!(
        detection.classify(),
        Some(DetectionClass::Component(ComponentKind::Capacitor))
    );

    assert_eq!(
        DetectionClass::from_label("voltage_ac"),
        Some(DetectionClass::Component(ComponentKind::VoltageAc))
    );
    assert_eq!(DetectionClass::from_label("junction"), Some(DetectionClass::Junction));
    assert_eq!(DetectionClass::from_label("opamp"), None);
}

#[test]
fn test_detector_response_decoding() {
    let ok: DetectorResponse = serde_json::from_str(
        r#"{ "success": true, "result": [ { "class": "junction", "x_center": 1.0, "y_center": 2.0 } ] }"#,
    )
    .expect("Should deserialize");
    let detections = ok.into_detections().expect("detections");
    assert_eq!(detections, vec![Detection::new("junction", 1.0, 2.0)]);

    let failed: DetectorResponse =
        serde_json::from_str(r#"{ "success": false, "message": "model not loaded" }"#)
            .expect("Should deserialize");
    match failed.into_detections() {
        Err(Error::MissingData(msg)) => assert!(msg.contains("model not loaded")),
        other => panic!("Expected MissingData, got {:?}", other),
    }

    let empty: DetectorResponse =
        serde_json::from_str(r#"{ "success": true }"#).expect("Should deserialize");
    assert!(empty.into_detections().is_err());
}
