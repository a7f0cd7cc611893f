//! Spiral path and flow schedule synthesis.
//!
//! Pure geometry: given validated parameters and the analyzed print
//! footprint, produce the ordered vertex sequence of the calibration
//! cylinder. No text is emitted here; see [`crate::emitter`].

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use flowcal_core::{BoundingBox, Point};

use crate::flow_tower::FlowTowerParameters;

/// Fixed geometry and feed constants for spiral synthesis.
///
/// Collected in one overridable structure instead of scattered
/// literals. The defaults are empirical values tuned for 1.75 mm
/// filament on a 0.4 mm-class nozzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiralConfig {
    /// Segments per full circle (72 segments = 5° each).
    pub segments_per_revolution: u32,
    /// Extra extrusion on the adhesion perimeter, compensating
    /// first-layer adhesion loss. Fixed empirical constant.
    pub adhesion_extrusion_factor: f64,
    /// Reference filament diameter (mm).
    pub filament_diameter: f64,
    /// Extrusion width as a multiple of the nozzle diameter.
    pub extrusion_width_factor: f64,
    /// Feed rate for the rapid traverse to the first perimeter point (mm/min).
    pub travel_feed_rate: f64,
    /// Feed rate for the initial drop to the start height (mm/min).
    pub z_feed_rate: f64,
    /// Feed rate while priming the extruder (mm/min).
    pub prime_feed_rate: f64,
    /// Filament length extruded while priming (mm).
    pub prime_amount: f64,
    /// Feed rate for the adhesion perimeter (mm/min).
    pub perimeter_feed_rate: f64,
    /// Feed rate for the climbing spiral (mm/min).
    pub spiral_feed_rate: f64,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            segments_per_revolution: 72,
            adhesion_extrusion_factor: 1.3,
            filament_diameter: 1.75,
            extrusion_width_factor: 1.2,
            travel_feed_rate: 3000.0,
            z_feed_rate: 1200.0,
            prime_feed_rate: 300.0,
            prime_amount: 5.0,
            perimeter_feed_rate: 600.0,
            spiral_feed_rate: 800.0,
        }
    }
}

/// Flow set-point change taking effect at a spiral point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowChange {
    /// Zero-based index of the section being entered.
    pub section: u32,
    /// New flow percentage.
    pub flow_percent: f64,
}

/// One generated vertex of the calibration cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralPoint {
    /// Angle step index within the pass.
    pub index: usize,
    /// Absolute position of the vertex.
    pub position: Point,
    /// Filament length for the segment ending at this vertex (mm).
    pub extrusion: f64,
    /// Flow percentage active when the vertex was generated.
    pub flow_percent: f64,
    /// Set when this vertex opens a new calibration section.
    pub flow_change: Option<FlowChange>,
    /// Layer number, set once per completed revolution.
    pub layer_marker: Option<u32>,
}

/// Fully synthesized toolpath for the calibration cylinder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpiralPath {
    /// Cylinder center: midpoint of the print bounding box.
    pub center_x: f64,
    pub center_y: f64,
    /// Cylinder radius (mm).
    pub radius: f64,
    /// Height of the adhesion perimeter: the second-to-last layer of
    /// the base print.
    pub start_z: f64,
    /// Height the spiral aims for: `start_z + sections * section_height`.
    pub target_z: f64,
    /// Height actually reached; overshoots `target_z` by at most one
    /// height step.
    pub final_z: f64,
    /// The constant-height adhesion perimeter, one full revolution.
    pub adhesion_pass: Vec<SpiralPoint>,
    /// The continuous climb.
    pub spiral: Vec<SpiralPoint>,
}

/// Computes the cylinder toolpath from parameters and the print footprint.
pub struct SpiralSynthesizer<'a> {
    params: &'a FlowTowerParameters,
    config: &'a SpiralConfig,
}

impl<'a> SpiralSynthesizer<'a> {
    pub fn new(params: &'a FlowTowerParameters, config: &'a SpiralConfig) -> Self {
        Self { params, config }
    }

    /// Commanded filament length per millimeter of travel.
    ///
    /// Ratio of the deposited cross-section (extrusion width times layer
    /// height) to the filament cross-section.
    pub fn extrusion_ratio(&self) -> f64 {
        let width = self.params.nozzle_diameter * self.config.extrusion_width_factor;
        let extrusion_area = width * self.params.layer_height;
        let filament_area = PI * (self.config.filament_diameter / 2.0).powi(2);
        extrusion_area / filament_area
    }

    /// Synthesize the full cylinder toolpath.
    ///
    /// Callers must have validated the parameters first: the climb loop
    /// is bounded only because `layer_height` and `section_height` are
    /// strictly positive.
    pub fn synthesize(&self, bounding_box: &BoundingBox, start_z: f64) -> SpiralPath {
        let (center_x, center_y) = bounding_box.center();
        let radius = self.params.cylinder_diameter / 2.0;
        let segments = self.config.segments_per_revolution as usize;
        let step_angle = 2.0 * PI / segments as f64;
        let ratio = self.extrusion_ratio();

        let target_z =
            start_z + f64::from(self.params.sections) * self.params.section_height;

        let vertex = |step: usize, z: f64| -> Point {
            let angle = (step % segments) as f64 * step_angle;
            Point::new(
                center_x + radius * angle.cos(),
                center_y + radius * angle.sin(),
                z,
            )
        };

        // One full perimeter at constant height before climbing.
        let mut adhesion_pass = Vec::with_capacity(segments);
        for i in 1..=segments {
            let position = vertex(i, start_z);
            let previous = vertex(i - 1, start_z);
            adhesion_pass.push(SpiralPoint {
                index: i,
                position,
                extrusion: position.distance(&previous)
                    * ratio
                    * self.config.adhesion_extrusion_factor,
                flow_percent: self.params.initial_flow_percent,
                flow_change: None,
                layer_marker: None,
            });
        }

        // Continuous climb: angle wraps every revolution, height rises by
        // one layer per revolution. Terminates at the first vertex at or
        // above the target height.
        let z_step = self.params.layer_height / segments as f64;
        let mut spiral = Vec::new();
        let mut current_z = start_z;
        let mut current_section = 0u32;
        let mut flow_percent = self.params.initial_flow_percent;
        let mut i = 0usize;

        while current_z < target_z {
            current_z += z_step;

            let section =
                ((current_z - start_z) / self.params.section_height).floor() as u32;
            let flow_change = if section > current_section {
                current_section = section;
                flow_percent = self.params.initial_flow_percent
                    + f64::from(section) * self.params.flow_increase_percent;
                Some(FlowChange {
                    section,
                    flow_percent,
                })
            } else {
                None
            };

            let position = vertex(i, current_z);
            let previous = vertex(i + segments - 1, current_z - z_step);

            // At a revolution boundary the climbed height is an exact
            // multiple of the layer height, so round rather than
            // truncate the accumulated value.
            let layer_marker = (i % segments == 0 && i > 0)
                .then(|| ((current_z - start_z) / self.params.layer_height).round() as u32);

            spiral.push(SpiralPoint {
                index: i,
                position,
                extrusion: position.distance(&previous) * ratio,
                flow_percent,
                flow_change,
                layer_marker,
            });
            i += 1;
        }

        SpiralPath {
            center_x,
            center_y,
            radius,
            start_z,
            target_z,
            final_z: current_z,
            adhesion_pass,
            spiral,
        }
    }
}
