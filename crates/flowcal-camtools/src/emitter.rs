//! Serialization of the synthesized toolpath back into the command format.
//!
//! Output precision follows the conventions of slicer output: positions
//! at 3 decimals, spiral heights and extrusion amounts at 4, flow
//! percentages at 1.

use flowcal_core::BoundingBox;

use crate::flow_tower::FlowTowerParameters;
use crate::spiral::{SpiralConfig, SpiralPath};

/// Writes the continuation program after the base stream.
pub struct ProgramEmitter<'a> {
    params: &'a FlowTowerParameters,
    config: &'a SpiralConfig,
}

impl<'a> ProgramEmitter<'a> {
    pub fn new(params: &'a FlowTowerParameters, config: &'a SpiralConfig) -> Self {
        Self { params, config }
    }

    /// Serialize the full output program.
    ///
    /// `base_without_shutdown` is the original stream with the recovered
    /// shutdown block already stripped; `shutdown` is that block, reused
    /// verbatim at the end, or `None` to emit the fallback ending.
    pub fn emit(
        &self,
        base_without_shutdown: &str,
        bounding_box: &BoundingBox,
        shutdown: Option<&str>,
        path: &SpiralPath,
    ) -> String {
        let p = self.params;
        let c = self.config;
        let mut gcode = String::from(base_without_shutdown.trim_end());

        // Metadata header: every parameter plus the recovered and
        // computed geometry, as annotation lines.
        gcode.push_str("\n\n; CYLINDER CONTINUATION - SPIRAL VASE MODE\n");
        gcode.push_str(&format!(
            "; Generated by: flowcal {}\n",
            env!("CARGO_PKG_VERSION")
        ));
        gcode.push_str(&format!(
            "; Starting Z: {:.3} mm (second-to-last layer)\n",
            path.start_z
        ));
        gcode.push_str(&format!("; Layer height: {} mm\n", p.layer_height));
        gcode.push_str(&format!("; Section height: {} mm\n", p.section_height));
        gcode.push_str(&format!("; Initial flow rate: {}%\n", p.initial_flow_percent));
        gcode.push_str(&format!("; Bed temperature: {} °C\n", p.bed_temp));
        gcode.push_str(&format!("; Nozzle temperature: {} °C\n", p.nozzle_temp));
        gcode.push_str(&format!(
            "; Flow increase per section: {}%\n",
            p.flow_increase_percent
        ));
        gcode.push_str(&format!("; Number of sections: {}\n", p.sections));
        gcode.push_str(&format!("; Nozzle diameter: {} mm\n", p.nozzle_diameter));
        gcode.push_str(&format!("; Cylinder diameter: {} mm\n", p.cylinder_diameter));
        gcode.push_str(&format!(
            "; Print bounding box: X=[{:.2}, {:.2}], Y=[{:.2}, {:.2}]\n",
            bounding_box.min_x, bounding_box.max_x, bounding_box.min_y, bounding_box.max_y
        ));
        gcode.push_str(&format!(
            "; Cylinder center: X={:.2}, Y={:.2}\n\n",
            path.center_x, path.center_y
        ));

        // Modes for vase printing: absolute positioning, relative extruder.
        gcode.push_str("G90 ; Absolute positioning\n");
        gcode.push_str("M83 ; Relative extruder mode\n");
        gcode.push_str(&format!(
            "M221 S{} ; Set initial flow rate to {}%\n",
            p.initial_flow_percent, p.initial_flow_percent
        ));

        // Traverse to the first perimeter point, drop to the start
        // height, prime without moving.
        let first_x = path.center_x + path.radius;
        let first_y = path.center_y;
        gcode.push_str("; Moving to start position for cylinder perimeter\n");
        gcode.push_str(&format!(
            "G0 F{:.0} X{:.3} Y{:.3} ; Move to first point\n",
            c.travel_feed_rate, first_x, first_y
        ));
        gcode.push_str(&format!(
            "G1 F{:.0} Z{:.3} ; Move to second-to-last layer Z height\n",
            c.z_feed_rate, path.start_z
        ));
        gcode.push_str(&format!(
            "G1 F{:.0} E{:.1} ; Prime extruder for good adhesion\n",
            c.prime_feed_rate, c.prime_amount
        ));

        gcode.push_str(&format!(
            "; Printing first perimeter at Z={:.3} (second-to-last layer)\n",
            path.start_z
        ));
        for point in &path.adhesion_pass {
            gcode.push_str(&format!(
                "G1 F{:.0} X{:.3} Y{:.3} E{:.4}\n",
                c.perimeter_feed_rate, point.position.x, point.position.y, point.extrusion
            ));
        }

        gcode.push_str(&format!(
            "\n; Beginning spiral climb from Z={:.3}\n",
            path.start_z
        ));
        for point in &path.spiral {
            if let Some(change) = point.flow_change {
                gcode.push_str(&format!(
                    "; Starting section {} with flow rate {:.1}%\n",
                    change.section + 1,
                    change.flow_percent
                ));
                gcode.push_str(&format!(
                    "M221 S{:.1} ; Set flow rate to {:.1}%\n",
                    change.flow_percent, change.flow_percent
                ));
            }
            gcode.push_str(&format!(
                "G1 X{:.3} Y{:.3} Z{:.4} E{:.4} F{:.0}\n",
                point.position.x,
                point.position.y,
                point.position.z,
                point.extrusion,
                c.spiral_feed_rate
            ));
            if let Some(layer) = point.layer_marker {
                gcode.push_str(&format!("; Layer {}, Z={:.2}\n", layer, point.position.z));
            }
        }

        gcode.push_str("\n; End spiral vase cylinder\n");

        // Reuse the recovered shutdown block, or fall back to a minimal
        // ending.
        match shutdown {
            Some(sequence) => {
                gcode.push('\n');
                gcode.push_str(sequence);
                gcode.push('\n');
            }
            None => {
                gcode.push_str("M104 S0 ; Turn off extruder\n");
                gcode.push_str("M140 S0 ; Turn off bed\n");
                gcode.push_str("M107 ; Turn off fan\n");
                gcode.push_str("M84 ; Disable motors\n");
            }
        }

        gcode
    }
}
