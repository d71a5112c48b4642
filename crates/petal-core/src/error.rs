//! Error types.

use thiserror::Error;

/// Instrument registry construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("instrument name is empty")]
    EmptyName,

    #[error("instrument {name:?} registered twice")]
    Duplicate { name: String },

    #[error("too many instruments: {count} exceeds limit of {limit}")]
    TooMany { count: usize, limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::Duplicate { name: "Rose".to_string() };
        assert_eq!(err.to_string(), "instrument \"Rose\" registered twice");

        let err = RegistryError::TooMany { count: 20, limit: 16 };
        assert!(err.to_string().contains("20"));
    }
}
