//! Core domain types and utilities for the darkroom platform.
//!
//! This crate provides the foundational ID types and error handling shared
//! by the darkroom workflow service.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ComponentId, ParseIdError, WorkflowId};
