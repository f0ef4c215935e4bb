//! Error types for the workflow crate.
//!
//! Parse-level errors live here. Validation findings are not errors in this
//! sense: they are collected into a [`ViolationSet`](crate::ViolationSet)
//! value and returned, never raised through control flow.

use std::fmt;

/// Error returned when a string does not name a known component type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseComponentTypeError {
    /// The value that failed to parse.
    pub value: String,
}

impl fmt::Display for ParseComponentTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown component type '{}'", self.value)
    }
}

impl std::error::Error for ParseComponentTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_component_type_error_display() {
        let err = ParseComponentTypeError {
            value: "rotate".to_string(),
        };
        assert_eq!(err.to_string(), "unknown component type 'rotate'");
    }
}
