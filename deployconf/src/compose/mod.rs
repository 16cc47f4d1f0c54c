//! Composition of the resolved descriptor into one document per artifact.
//!
//! Documents only hold resolved values, so the templates that render them never need to make a decision
//! beyond mechanical substitution.

pub mod pipeline;
pub mod service;
pub mod workload;

pub use pipeline::{PipelineDocument, compose_pipeline};
pub use service::{ServiceDocument, compose_service};
pub use workload::{WorkloadDocument, compose_workload};
