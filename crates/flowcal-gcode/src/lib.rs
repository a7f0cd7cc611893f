//! # FlowCal G-code analysis
//!
//! Read-only analysis of an existing print file. The analyzer walks the
//! command stream once and recovers everything the toolpath generator
//! needs to continue the print:
//!
//! - the distinct Z heights used by real moves (for the start height)
//! - the X/Y bounding box of extrusion moves (for the cylinder center)
//! - the trailing shutdown macro, captured verbatim
//! - best-effort print settings mined from comments and set-point commands
//!
//! Nothing here hard-fails: every recovery degrades to a documented
//! default and emits a `tracing` diagnostic instead.

pub mod analyzer;
pub mod command;
pub mod settings;

pub use analyzer::{analyze, LastPosition, PrintAnalysis, SHUTDOWN_MARKER};
pub use command::{MotionCommand, MoveKind};
pub use settings::{recover_settings, RecoveredSettings};
