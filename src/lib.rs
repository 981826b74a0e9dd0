//! robodash - workspace state for a robot telemetry dashboard
//!
//! Modules:
//! - schema: persisted document shape, validation and migration
//! - widgets: widget kinds and their descriptors
//! - channel: telemetry channel records and struct codecs
//! - kernel: workspace store (state/action/effect) and persistence services

pub mod channel;
pub mod kernel;
pub mod schema;
pub mod widgets;
