//! Workflow model and validation for the darkroom platform.
//!
//! This crate provides:
//!
//! - **Component Model**: the closed set of component types and their
//!   scalar settings values
//! - **Workflow Definition**: a named, ordered list of components with a
//!   generated identifier
//! - **Validation**: pure, exhaustive structural checks that report every
//!   finding as a field-keyed [`ViolationSet`]
//!
//! Persistence and transport live elsewhere; nothing here performs I/O.

pub mod component;
pub mod definition;
pub mod error;
pub mod validator;

pub use component::{Component, ComponentType, SettingValue, Settings};
pub use definition::Workflow;
pub use error::ParseComponentTypeError;
pub use validator::{ComponentRequest, ViolationSet, validate_workflow};
