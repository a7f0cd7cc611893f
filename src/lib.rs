//! # FlowCal
//!
//! Appends a spiral-vase flow calibration cylinder to an existing 3D
//! printer G-code file. The cylinder is printed directly on top of the
//! last finished layer and steps the flow percentage (`M221`) upward in
//! fixed-height sections, so extrusion flow can be tuned empirically
//! without re-slicing a model.
//!
//! ## Architecture
//!
//! FlowCal is organized as a workspace with multiple crates:
//!
//! 1. **flowcal-core** - Shared types and error handling
//! 2. **flowcal-gcode** - Analysis of the existing command stream
//! 3. **flowcal-camtools** - Spiral synthesis and G-code emission
//! 4. **flowcal** - CLI binary that integrates the crates

pub use flowcal_camtools::{
    FlowChange, FlowTowerGenerator, FlowTowerParameters, SpiralConfig, SpiralPath, SpiralPoint,
};
pub use flowcal_core::{BoundingBox, Error, ParameterError, Point, Result};
pub use flowcal_gcode::{
    analyze, recover_settings, MotionCommand, MoveKind, PrintAnalysis, RecoveredSettings,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output and `RUST_LOG`
/// environment variable support.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
