use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use flowcal::{
    analyze, init_logging, recover_settings, FlowTowerGenerator, FlowTowerParameters,
};

/// Append a flow calibration cylinder to an existing print file.
///
/// Defaults for unspecified parameters are recovered from comments and
/// set-point commands in the base file where possible.
#[derive(Parser, Debug)]
#[command(name = "flowcal", version, about)]
struct Cli {
    /// Base G-code file to extend
    input: PathBuf,

    /// Output file for the combined program
    #[arg(short, long, default_value = "output.gcode")]
    output: PathBuf,

    /// JSON file with a complete parameter set (flags below override it)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Layer height of the spiral (mm)
    #[arg(long)]
    layer_height: Option<f64>,

    /// Height of one calibration section (mm)
    #[arg(long)]
    section_height: Option<f64>,

    /// Flow percentage of the first section
    #[arg(long)]
    initial_flow: Option<f64>,

    /// Bed temperature (°C), annotation only
    #[arg(long)]
    bed_temp: Option<f64>,

    /// Nozzle temperature (°C), annotation only
    #[arg(long)]
    nozzle_temp: Option<f64>,

    /// Flow percentage added per section
    #[arg(long)]
    flow_increase: Option<f64>,

    /// Number of calibration sections
    #[arg(long)]
    sections: Option<u32>,

    /// Nozzle diameter (mm)
    #[arg(long)]
    nozzle_diameter: Option<f64>,

    /// Outer diameter of the calibration cylinder (mm)
    #[arg(long)]
    cylinder_diameter: Option<f64>,
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let base_gcode = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let params = resolve_parameters(&cli, &base_gcode)?;
    let analysis = analyze(&base_gcode);
    info!(
        last_z = analysis.last_z(),
        start_z = analysis.second_last_z(),
        "analyzed base file"
    );

    let generator = FlowTowerGenerator::new(params);
    let program = generator.generate_with_analysis(&base_gcode, &analysis)?;

    fs::write(&cli.output, &program)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(
        path = %cli.output.display(),
        bytes = program.len(),
        "wrote calibration program"
    );

    Ok(())
}

/// Assemble the parameter set: explicit flags win over a JSON parameter
/// file, which wins over values recovered from the base file, which win
/// over built-in defaults.
fn resolve_parameters(cli: &Cli, base_gcode: &str) -> Result<FlowTowerParameters> {
    let mut params = match &cli.params {
        Some(path) => FlowTowerParameters::load(path)
            .with_context(|| format!("failed to load parameters from {}", path.display()))?,
        None => {
            let recovered = recover_settings(base_gcode);
            let defaults = FlowTowerParameters::default();
            FlowTowerParameters {
                layer_height: recovered.layer_height.unwrap_or(defaults.layer_height),
                nozzle_diameter: recovered
                    .nozzle_diameter
                    .unwrap_or(defaults.nozzle_diameter),
                bed_temp: recovered.bed_temp.unwrap_or(defaults.bed_temp),
                nozzle_temp: recovered.nozzle_temp.unwrap_or(defaults.nozzle_temp),
                initial_flow_percent: recovered
                    .flow_percent
                    .unwrap_or(defaults.initial_flow_percent),
                ..defaults
            }
        }
    };

    if let Some(value) = cli.layer_height {
        params.layer_height = value;
    }
    if let Some(value) = cli.section_height {
        params.section_height = value;
    }
    if let Some(value) = cli.initial_flow {
        params.initial_flow_percent = value;
    }
    if let Some(value) = cli.bed_temp {
        params.bed_temp = value;
    }
    if let Some(value) = cli.nozzle_temp {
        params.nozzle_temp = value;
    }
    if let Some(value) = cli.flow_increase {
        params.flow_increase_percent = value;
    }
    if let Some(value) = cli.sections {
        params.sections = value;
    }
    if let Some(value) = cli.nozzle_diameter {
        params.nozzle_diameter = value;
    }
    if let Some(value) = cli.cylinder_diameter {
        params.cylinder_diameter = value;
    }

    Ok(params)
}
