//! Best-effort recovery of print settings from slicer output.
//!
//! Slicers leave settings behind in two forms: free-text comments
//! ("; layer height: 0.2 mm") and set-point commands (`M104`, `M140`,
//! `M221`). This pass mines both. It is substring matching, not a
//! structured parser: every field stays `None` until something matches,
//! so callers can tell a recovered value from a fallback.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// Settings mined from the base file. `None` means "not found".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveredSettings {
    /// Layer height in mm, from a "layer height" comment.
    pub layer_height: Option<f64>,
    /// Nozzle diameter in mm, from a "nozzle diameter" comment.
    pub nozzle_diameter: Option<f64>,
    /// Bed temperature in °C, from comments or `M140`.
    pub bed_temp: Option<f64>,
    /// Nozzle temperature in °C, from comments or `M104`/`M109`.
    pub nozzle_temp: Option<f64>,
    /// Flow percentage, from the last `M221` set-point.
    pub flow_percent: Option<f64>,
}

fn millimeter_value(line: &str) -> Option<f64> {
    static MM: OnceLock<Regex> = OnceLock::new();
    let regex = MM
        .get_or_init(|| Regex::new(r"([0-9]+\.?[0-9]*)\s*mm").expect("invalid regex pattern"));
    regex
        .captures(line)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

fn first_number(line: &str) -> Option<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let regex = NUMBER
        .get_or_init(|| Regex::new(r"([0-9]+\.?[0-9]*)").expect("invalid regex pattern"));
    regex
        .captures(line)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

fn s_field(line: &str) -> Option<f64> {
    static S_FIELD: OnceLock<Regex> = OnceLock::new();
    let regex = S_FIELD
        .get_or_init(|| Regex::new(r"S([0-9]+\.?[0-9]*)").expect("invalid regex pattern"));
    regex
        .captures(line)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

/// Scan the base file for settings left behind by the slicer.
///
/// Comment matches are collected first; set-point commands win over
/// comment matches regardless of where they appear in the file, and the
/// last set-point of a kind is the one kept. Temperatures and flow
/// percentages are truncated to whole numbers, matching how firmware
/// reports them.
pub fn recover_settings(base_gcode: &str) -> RecoveredSettings {
    let mut settings = RecoveredSettings::default();

    // Free-text comment pass.
    for line in base_gcode.lines() {
        let lower = line.to_lowercase();

        if lower.contains("layer") && lower.contains("height") {
            if let Some(value) = millimeter_value(line) {
                settings.layer_height = Some(value);
            }
        }

        if lower.contains("nozzle") && lower.contains("diameter") {
            if let Some(value) = millimeter_value(line) {
                settings.nozzle_diameter = Some(value);
            }
        }

        if lower.contains("bed") && lower.contains("temp") {
            if let Some(value) = first_number(line) {
                settings.bed_temp = Some(value.trunc());
            }
        }

        if lower.contains("nozzle") && lower.contains("temp") || lower.contains("hotend") {
            if let Some(value) = first_number(line) {
                settings.nozzle_temp = Some(value.trunc());
            }
        }
    }

    // Set-point command pass.
    for line in base_gcode.lines() {
        if line.starts_with("M140") {
            if let Some(value) = s_field(line) {
                settings.bed_temp = Some(value.trunc());
            }
        }

        if line.starts_with("M104") || line.starts_with("M109") {
            if let Some(value) = s_field(line) {
                settings.nozzle_temp = Some(value.trunc());
            }
        }

        if line.starts_with("M221") {
            if let Some(value) = s_field(line) {
                settings.flow_percent = Some(value.trunc());
            }
        }
    }

    debug!(?settings, "recovered settings from base file");
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_recovery() {
        let gcode = "\
; layer height: 0.25 mm
; nozzle diameter = 0.6 mm
; bed temp 65
; hotend set to 215
";
        let settings = recover_settings(gcode);
        assert_eq!(settings.layer_height, Some(0.25));
        assert_eq!(settings.nozzle_diameter, Some(0.6));
        assert_eq!(settings.bed_temp, Some(65.0));
        assert_eq!(settings.nozzle_temp, Some(215.0));
        assert_eq!(settings.flow_percent, None);
    }

    #[test]
    fn test_set_point_commands_override_comments() {
        let gcode = "\
M140 S60
; bed temp 80
M104 S210
M221 S95
";
        let settings = recover_settings(gcode);
        // M140 wins over the comment even though it appears first.
        assert_eq!(settings.bed_temp, Some(60.0));
        assert_eq!(settings.nozzle_temp, Some(210.0));
        assert_eq!(settings.flow_percent, Some(95.0));
    }

    #[test]
    fn test_last_flow_set_point_wins() {
        let gcode = "M221 S100\nG1 X0 Y0 E1.0\nM221 S97.5\n";
        let settings = recover_settings(gcode);
        assert_eq!(settings.flow_percent, Some(97.0));
    }

    #[test]
    fn test_total_absence_of_matches() {
        let settings = recover_settings("G1 X0 Y0 E1.0\nG28\n");
        assert_eq!(settings, RecoveredSettings::default());
        assert_eq!(settings.layer_height, None);
    }
}
