use std::fs;

use flowcal::{recover_settings, FlowTowerGenerator, FlowTowerParameters};

const BASE: &str = "\
; layer height: 0.2 mm
M140 S60
M104 S210
G0 Z9.8 F3000
G1 X0 Y0 E0.5
G1 X50 Y50 E1.0
G0 Z10.0
G1 X25 Y25 E1.5
PRINT_END
";

#[test]
fn test_generate_through_the_file_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("base.gcode");
    let output = dir.path().join("output.gcode");
    fs::write(&input, BASE).unwrap();

    let base = fs::read_to_string(&input).unwrap();
    let recovered = recover_settings(&base);
    let params = FlowTowerParameters {
        layer_height: recovered.layer_height.unwrap(),
        bed_temp: recovered.bed_temp.unwrap(),
        nozzle_temp: recovered.nozzle_temp.unwrap(),
        ..FlowTowerParameters::default()
    };

    let generator = FlowTowerGenerator::new(params);
    let program = generator.generate(&base).unwrap();
    fs::write(&output, &program).unwrap();

    // Identical inputs produce a byte-identical file on a second run.
    let rerun = generator.generate(&fs::read_to_string(&input).unwrap()).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), rerun);

    // Recovered set-points made it into the annotation header.
    assert!(program.contains("; Layer height: 0.2 mm"));
    assert!(program.contains("; Bed temperature: 60 °C"));
    assert!(program.contains("; Nozzle temperature: 210 °C"));
}
