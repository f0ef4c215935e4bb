//! HTTP server for the darkroom workflow service.
//!
//! The server is a thin transport around the validator and store: it
//! decodes the request payload, runs validation, persists accepted
//! workflows, and encodes either the new identifier or the full set of
//! validation findings.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
