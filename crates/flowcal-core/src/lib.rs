//! Core types and error handling shared across the FlowCal workspace.
//!
//! This crate holds the small vocabulary the other crates speak:
//! machine positions, extrusion bounding boxes, and the error taxonomy
//! used from the analyzer up to the CLI boundary.

pub mod error;
pub mod types;

pub use error::{Error, ParameterError, ParameterResult, Result};
pub use types::{BoundingBox, Point};
