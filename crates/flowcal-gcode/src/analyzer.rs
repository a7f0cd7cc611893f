//! Whole-stream analysis of an existing print file.
//!
//! One pass over the input text recovers the geometric state the
//! generator needs: layer heights, the extrusion bounding box, the final
//! position, and the trailing shutdown block.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use flowcal_core::BoundingBox;

use crate::command::MotionCommand;

/// Marker identifying the trailing shutdown macro in slicer output.
pub const SHUTDOWN_MARKER: &str = "PRINT_END";

/// Final coordinates seen across all move lines of the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LastPosition {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub e: Option<f64>,
}

/// Result of scanning an existing command stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintAnalysis {
    /// Distinct Z heights of rapid/linear moves, sorted ascending.
    pub layer_heights: Vec<f64>,
    /// X/Y extents of extrusion moves, or the fallback extents.
    pub bounding_box: BoundingBox,
    /// False when no extrusion move was found and the fallback box is in use.
    pub bounding_box_recovered: bool,
    /// Verbatim shutdown block, when the marker was found.
    pub shutdown_sequence: Option<String>,
    /// Final coordinates of the stream, for diagnostics.
    pub last_position: LastPosition,
}

impl PrintAnalysis {
    /// Highest Z seen, or 0 when the stream had no usable moves.
    pub fn last_z(&self) -> f64 {
        self.layer_heights.last().copied().unwrap_or(0.0)
    }

    /// Second-highest Z seen: the start height for the calibration
    /// cylinder. Defaults to 0 when fewer than two distinct heights
    /// exist.
    pub fn second_last_z(&self) -> f64 {
        if self.layer_heights.len() >= 2 {
            self.layer_heights[self.layer_heights.len() - 2]
        } else {
            0.0
        }
    }

    /// Remove the recovered shutdown block from the base text.
    ///
    /// Returns the text unchanged when no block was recovered, or when
    /// the captured lines were not contiguous in the source.
    pub fn strip_shutdown(&self, base_gcode: &str) -> String {
        match &self.shutdown_sequence {
            Some(sequence) => base_gcode.replace(sequence.as_str(), ""),
            None => base_gcode.to_string(),
        }
    }
}

/// Scan the raw input text and recover geometric and thermal state.
///
/// Never fails: each missing piece of state is replaced by a documented
/// default and reported through a `warn!` diagnostic.
pub fn analyze(base_gcode: &str) -> PrintAnalysis {
    let mut z_heights: Vec<f64> = Vec::new();
    let mut bbox: Option<BoundingBox> = None;
    let mut last_position = LastPosition::default();

    for line in base_gcode.lines() {
        let cmd = MotionCommand::parse(line);
        if !cmd.is_move() {
            continue;
        }

        if let Some(z) = cmd.z {
            z_heights.push(z);
        }

        if cmd.is_extruding() {
            if let (Some(x), Some(y)) = (cmd.x, cmd.y) {
                match &mut bbox {
                    Some(b) => b.include(x, y),
                    None => bbox = Some(BoundingBox::from_point(x, y)),
                }
            }
        }

        if cmd.x.is_some() {
            last_position.x = cmd.x;
        }
        if cmd.y.is_some() {
            last_position.y = cmd.y;
        }
        if cmd.z.is_some() {
            last_position.z = cmd.z;
        }
        if cmd.e.is_some() {
            last_position.e = cmd.e;
        }
    }

    z_heights.sort_by(|a, b| a.total_cmp(b));
    z_heights.dedup();
    debug!(
        count = z_heights.len(),
        "distinct layer heights in base file"
    );
    if z_heights.len() < 2 {
        warn!("fewer than two distinct layer heights found; start height defaults to 0");
    }

    let (bounding_box, bounding_box_recovered) = match bbox {
        Some(b) => {
            debug!(
                min_x = b.min_x,
                max_x = b.max_x,
                min_y = b.min_y,
                max_y = b.max_y,
                "print bounding box from extrusion moves"
            );
            (b, true)
        }
        None => {
            warn!("could not determine print boundaries, using default extents");
            (BoundingBox::fallback(), false)
        }
    };

    let shutdown_sequence = extract_shutdown_sequence(base_gcode);
    if shutdown_sequence.is_some() {
        debug!("found shutdown sequence in base file");
    }

    PrintAnalysis {
        layer_heights: z_heights,
        bounding_box,
        bounding_box_recovered,
        shutdown_sequence,
        last_position,
    }
}

/// Capture the trailing shutdown block verbatim.
///
/// Collects every line containing the marker, plus blank lines once the
/// marker has been seen, joined in encounter order. The capture is
/// approximate: a marker appearing early in a comment drags that line
/// into the block too. Callers must treat the result as best-effort.
fn extract_shutdown_sequence(base_gcode: &str) -> Option<String> {
    let mut marker_seen = false;
    let mut captured: Vec<&str> = Vec::new();

    for line in base_gcode.lines() {
        if line.contains(SHUTDOWN_MARKER) || (marker_seen && line.trim().is_empty()) {
            marker_seen = true;
            captured.push(line);
        }
    }

    if captured.is_empty() {
        None
    } else {
        Some(captured.join("\n"))
    }
}
