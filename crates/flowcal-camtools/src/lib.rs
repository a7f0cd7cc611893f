//! # FlowCal CAM Tools
//!
//! Toolpath generation for the flow calibration cylinder: a continuous
//! spiral-vase tower printed on top of an existing part, with the flow
//! percentage stepped upward in fixed-height sections so the operator
//! can read off the best-looking band.
//!
//! ## Components
//!
//! - **Flow Tower**: validated operator parameters and the generator
//!   facade that turns a base file into the combined program
//! - **Spiral**: pure geometry for the adhesion perimeter, the climbing
//!   spiral, per-segment extrusion amounts, and the flow-rate schedule
//! - **Emitter**: serialization of the synthesized path back into the
//!   textual command format, appended after the base stream

pub mod emitter;
pub mod flow_tower;
pub mod spiral;

// Re-export commonly used items
pub use emitter::ProgramEmitter;
pub use flow_tower::{FlowTowerGenerator, FlowTowerParameters};
pub use spiral::{FlowChange, SpiralConfig, SpiralPath, SpiralPoint, SpiralSynthesizer};
