//! Flow calibration tower generation.
//!
//! The generator appends a spiral-vase calibration cylinder to an
//! existing print file. The cylinder sits on the second-to-last layer
//! of the base print, centered on the print footprint, and steps the
//! flow percentage upward once per section of climbed height.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use flowcal_core::{ParameterError, ParameterResult, Result};
use flowcal_gcode::{analyze, PrintAnalysis};

use crate::emitter::ProgramEmitter;
use crate::spiral::{SpiralConfig, SpiralSynthesizer};

/// Operator-supplied parameters for the flow calibration tower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowTowerParameters {
    /// Layer height of the spiral (mm).
    pub layer_height: f64,
    /// Height of one calibration section (mm).
    pub section_height: f64,
    /// Flow percentage of the first section.
    pub initial_flow_percent: f64,
    /// Bed temperature (°C), annotation only.
    pub bed_temp: f64,
    /// Nozzle temperature (°C), annotation only.
    pub nozzle_temp: f64,
    /// Flow percentage added per section.
    pub flow_increase_percent: f64,
    /// Number of calibration sections.
    pub sections: u32,
    /// Nozzle diameter (mm).
    pub nozzle_diameter: f64,
    /// Outer diameter of the calibration cylinder (mm).
    pub cylinder_diameter: f64,
}

impl Default for FlowTowerParameters {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            section_height: 5.0,
            initial_flow_percent: 100.0,
            bed_temp: 60.0,
            nozzle_temp: 210.0,
            flow_increase_percent: 10.0,
            sections: 1,
            nozzle_diameter: 0.4,
            cylinder_diameter: 20.0,
        }
    }
}

fn positive(name: &str, value: f64) -> ParameterResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::InvalidValue {
            name: name.to_string(),
            reason: "must be strictly positive".to_string(),
        })
    }
}

fn non_negative(name: &str, value: f64) -> ParameterResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ParameterError::InvalidValue {
            name: name.to_string(),
            reason: "must not be negative".to_string(),
        })
    }
}

impl FlowTowerParameters {
    /// Validate all fields before synthesis.
    ///
    /// A non-positive layer or section height would make the climb loop
    /// unbounded, so validation is mandatory and the generator runs it
    /// first.
    pub fn validate(&self) -> ParameterResult<()> {
        positive("layer_height", self.layer_height)?;
        positive("section_height", self.section_height)?;
        positive("initial_flow_percent", self.initial_flow_percent)?;
        positive("nozzle_diameter", self.nozzle_diameter)?;
        positive("cylinder_diameter", self.cylinder_diameter)?;
        if self.sections == 0 {
            return Err(ParameterError::InvalidValue {
                name: "sections".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        non_negative("bed_temp", self.bed_temp)?;
        non_negative("nozzle_temp", self.nozzle_temp)?;
        non_negative("flow_increase_percent", self.flow_increase_percent)?;
        Ok(())
    }

    /// Load a parameter set from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Generator for the flow calibration tower G-code.
pub struct FlowTowerGenerator {
    params: FlowTowerParameters,
    config: SpiralConfig,
}

impl FlowTowerGenerator {
    /// Create a generator with the default spiral constants.
    pub fn new(params: FlowTowerParameters) -> Self {
        Self::with_config(params, SpiralConfig::default())
    }

    /// Create a generator with explicit spiral constants.
    pub fn with_config(params: FlowTowerParameters, config: SpiralConfig) -> Self {
        Self { params, config }
    }

    pub fn params(&self) -> &FlowTowerParameters {
        &self.params
    }

    /// Analyze the base stream and append the calibration tower.
    ///
    /// Pure function of its inputs: identical inputs produce identical
    /// output text.
    pub fn generate(&self, base_gcode: &str) -> Result<String> {
        let analysis = analyze(base_gcode);
        self.generate_with_analysis(base_gcode, &analysis)
    }

    /// Append the calibration tower using an existing analysis.
    pub fn generate_with_analysis(
        &self,
        base_gcode: &str,
        analysis: &PrintAnalysis,
    ) -> Result<String> {
        self.params.validate()?;

        let start_z = analysis.second_last_z();
        let synthesizer = SpiralSynthesizer::new(&self.params, &self.config);
        let path = synthesizer.synthesize(&analysis.bounding_box, start_z);
        info!(
            start_z,
            center_x = path.center_x,
            center_y = path.center_y,
            radius = path.radius,
            target_z = path.target_z,
            "synthesized calibration cylinder"
        );

        let base = analysis.strip_shutdown(base_gcode);
        let emitter = ProgramEmitter::new(&self.params, &self.config);
        Ok(emitter.emit(
            &base,
            &analysis.bounding_box,
            analysis.shutdown_sequence.as_deref(),
            &path,
        ))
    }
}
