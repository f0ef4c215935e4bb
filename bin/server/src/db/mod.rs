//! Database repositories for the darkroom workflow service.

pub mod workflow;

pub use workflow::WorkflowRepository;
