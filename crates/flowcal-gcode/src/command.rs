//! Motion command parsing
//!
//! A [`MotionCommand`] is a read-only view of one line of the input
//! stream. Only rapid (`G0`) and linear (`G1`) moves carry coordinate
//! fields; everything else is classified as [`MoveKind::Other`] and
//! ignored by the analyzer.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Kind of motion described by a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Rapid positioning (`G0`), never extrudes.
    Rapid,
    /// Linear interpolation (`G1`), extrudes when an E field is present.
    Linear,
    /// Any non-move line (comments, M-codes, mode switches).
    Other,
}

/// Parsed view of one line of a command stream.
///
/// Coordinate fields are absolute positions in millimeters; `e` is the
/// commanded filament feed length. A field is `None` when the line does
/// not mention it. Only the first occurrence of each letter counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    pub kind: MoveKind,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub e: Option<f64>,
}

fn field_regex() -> &'static Regex {
    static FIELD: OnceLock<Regex> = OnceLock::new();
    FIELD.get_or_init(|| Regex::new(r"([XYZE])([0-9]+\.?[0-9]*)").expect("invalid regex pattern"))
}

impl MotionCommand {
    /// Parse a single line of the input stream.
    ///
    /// Move classification matches on the `"G0 "` / `"G1 "` prefix, so a
    /// bare `G1` with no fields is not treated as a move.
    pub fn parse(line: &str) -> Self {
        let kind = if line.starts_with("G0 ") {
            MoveKind::Rapid
        } else if line.starts_with("G1 ") {
            MoveKind::Linear
        } else {
            MoveKind::Other
        };

        let mut cmd = Self {
            kind,
            x: None,
            y: None,
            z: None,
            e: None,
        };
        if cmd.kind == MoveKind::Other {
            return cmd;
        }

        for caps in field_regex().captures_iter(line) {
            if let Ok(value) = caps[2].parse::<f64>() {
                match &caps[1] {
                    "X" if cmd.x.is_none() => cmd.x = Some(value),
                    "Y" if cmd.y.is_none() => cmd.y = Some(value),
                    "Z" if cmd.z.is_none() => cmd.z = Some(value),
                    "E" if cmd.e.is_none() => cmd.e = Some(value),
                    _ => {}
                }
            }
        }
        cmd
    }

    /// True for rapid and linear moves.
    pub fn is_move(&self) -> bool {
        self.kind != MoveKind::Other
    }

    /// True for linear moves that deposit material.
    ///
    /// The E field is the proxy for "this move prints": linear moves
    /// without one are travel moves and must not contribute to the
    /// print footprint.
    pub fn is_extruding(&self) -> bool {
        self.kind == MoveKind::Linear && self.e.is_some()
    }
}
