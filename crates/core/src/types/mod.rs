//! Core types for Shop Probe.
//!
//! Type-safe wrappers for the values a probe run sends and records.

pub mod email;
pub mod id;
pub mod price;
pub mod report;
pub mod step;
pub mod wire;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use report::ProbeReport;
pub use step::{Step, StepOutcome, StepResult};
pub use wire::*;
