use flowcal_camtools::flow_tower::{FlowTowerGenerator, FlowTowerParameters};
use flowcal_core::Error;

// Base file with a [0, 50] x [0, 50] extrusion footprint, top layers at
// Z 9.8 and 10.0, a travel move far outside the footprint, and a
// shutdown macro.
const BASE: &str = "\
; layer height: 0.2 mm
M140 S60
M104 S210
G28
G0 Z0.2 F3000
G1 X0 Y0 E0.5 F1200
G1 X50 Y0 E1.0
G1 X50 Y50 E1.5
G1 X0 Y50 E2.0
G0 Z9.8
G1 X10 Y10 E2.5
G0 Z10.0
G1 X20 Y20 E3.0
G1 X1000 Y1000 F6000
PRINT_END
";

fn example_params() -> FlowTowerParameters {
    FlowTowerParameters {
        layer_height: 0.2,
        section_height: 5.0,
        initial_flow_percent: 100.0,
        bed_temp: 60.0,
        nozzle_temp: 210.0,
        flow_increase_percent: 10.0,
        sections: 2,
        nozzle_diameter: 0.4,
        cylinder_diameter: 20.0,
    }
}

#[test]
fn test_placement_from_base_file() {
    let generator = FlowTowerGenerator::new(example_params());
    let gcode = generator.generate(BASE).unwrap();

    // Starts on the second-to-last layer, centered on the footprint.
    assert!(gcode.contains("; Starting Z: 9.800 mm (second-to-last layer)"));
    assert!(gcode.contains("; Print bounding box: X=[0.00, 50.00], Y=[0.00, 50.00]"));
    assert!(gcode.contains("; Cylinder center: X=25.00, Y=25.00"));
    // First perimeter point is center + radius on X.
    assert!(gcode.contains("G0 F3000 X35.000 Y25.000 ; Move to first point"));
    assert!(gcode.contains("G1 F1200 Z9.800 ; Move to second-to-last layer Z height"));
    assert!(gcode.contains("G1 F300 E5.0 ; Prime extruder for good adhesion"));
}

#[test]
fn test_flow_schedule_set_points() {
    let generator = FlowTowerGenerator::new(example_params());
    let gcode = generator.generate(BASE).unwrap();

    assert!(gcode.contains("M221 S100 ; Set initial flow rate to 100%"));
    assert!(gcode.contains("; Starting section 2 with flow rate 110.0%"));
    assert!(gcode.contains("M221 S110.0 ; Set flow rate to 110.0%"));
    assert!(gcode.contains("; Starting section 3 with flow rate 120.0%"));
    assert!(gcode.contains("M221 S120.0 ; Set flow rate to 120.0%"));
    // Flow never steps past the last section.
    assert!(!gcode.contains("M221 S130.0"));
}

#[test]
fn test_adhesion_perimeter_is_72_points_at_constant_height() {
    let generator = FlowTowerGenerator::new(example_params());
    let gcode = generator.generate(BASE).unwrap();

    let perimeter_lines: Vec<&str> = gcode
        .lines()
        .filter(|line| line.starts_with("G1 F600 "))
        .collect();
    assert_eq!(perimeter_lines.len(), 72);
    for line in &perimeter_lines {
        // Constant height: the perimeter never commands Z.
        assert!(!line.contains('Z'));
        assert!(line.contains('E'));
    }
}

#[test]
fn test_spiral_moves_carry_height_and_extrusion() {
    let generator = FlowTowerGenerator::new(example_params());
    let gcode = generator.generate(BASE).unwrap();

    let spiral_lines: Vec<&str> = gcode
        .lines()
        .filter(|line| line.starts_with("G1 X") && line.ends_with("F800"))
        .collect();
    assert!(!spiral_lines.is_empty());
    for line in &spiral_lines {
        assert!(line.contains('Z'));
        assert!(line.contains('E'));
    }
    // Layer annotations appear once per revolution.
    assert!(gcode.contains("; Layer 1, Z=10.00"));
}

#[test]
fn test_base_stream_precedes_continuation() {
    let generator = FlowTowerGenerator::new(example_params());
    let gcode = generator.generate(BASE).unwrap();

    let base_pos = gcode.find("G1 X20 Y20 E3.0").unwrap();
    let header_pos = gcode.find("; CYLINDER CONTINUATION").unwrap();
    assert!(base_pos < header_pos);
    // Mode commands come right after the header block.
    let modes_pos = gcode.find("G90 ; Absolute positioning").unwrap();
    assert!(header_pos < modes_pos);
}

#[test]
fn test_recovered_shutdown_block_is_reused() {
    let generator = FlowTowerGenerator::new(example_params());
    let gcode = generator.generate(BASE).unwrap();

    let end_pos = gcode.find("; End spiral vase cylinder").unwrap();
    let shutdown_pos = gcode.rfind("PRINT_END").unwrap();
    assert!(shutdown_pos > end_pos);
    // No fallback ending when a shutdown block was recovered.
    assert!(!gcode.contains("M84 ; Disable motors"));
}

#[test]
fn test_fallback_shutdown_block() {
    let base = "G0 Z9.8\nG1 X0 Y0 E1.0\nG0 Z10.0\nG1 X50 Y50 E2.0\n";
    let generator = FlowTowerGenerator::new(example_params());
    let gcode = generator.generate(base).unwrap();

    assert!(gcode.contains("M104 S0 ; Turn off extruder"));
    assert!(gcode.contains("M140 S0 ; Turn off bed"));
    assert!(gcode.contains("M107 ; Turn off fan"));
    assert!(gcode.contains("M84 ; Disable motors"));
}

#[test]
fn test_degraded_input_uses_documented_defaults() {
    // No usable moves at all: fallback box (0,100,0,100), start at Z 0.
    let generator = FlowTowerGenerator::new(example_params());
    let gcode = generator.generate("; empty program\n").unwrap();

    assert!(gcode.contains("; Starting Z: 0.000 mm"));
    assert!(gcode.contains("; Print bounding box: X=[0.00, 100.00], Y=[0.00, 100.00]"));
    assert!(gcode.contains("; Cylinder center: X=50.00, Y=50.00"));
    assert!(gcode.contains("G0 F3000 X60.000 Y50.000 ; Move to first point"));
}

#[test]
fn test_invalid_parameters_are_rejected_before_synthesis() {
    let params = FlowTowerParameters {
        section_height: 0.0,
        ..example_params()
    };
    let generator = FlowTowerGenerator::new(params);
    let err = generator.generate(BASE).unwrap_err();
    assert!(matches!(err, Error::Parameter(_)));
}

#[test]
fn test_generation_is_deterministic() {
    let generator = FlowTowerGenerator::new(example_params());
    let first = generator.generate(BASE).unwrap();
    let second = generator.generate(BASE).unwrap();
    assert_eq!(first, second);
}
