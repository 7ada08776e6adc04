//! Error types for the safety control core.
//!
//! All errors here are setup-time errors: they occur at registration,
//! construction, or configuration-update time. The per-cycle arbitration
//! path never returns an error.

use thiserror::Error;

/// Errors from named component registries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A component with this name is already registered.
    #[error("a component named '{0}' is already registered")]
    DuplicateName(String),

    /// No component with this name is registered.
    #[error("no component named '{0}' is registered")]
    NotFound(String),
}

/// Configuration and construction errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The damping matrix cannot be inverted.
    #[error("damping matrix is singular and cannot be inverted")]
    SingularDamping,

    /// A joint-space quantity has the wrong dimension.
    #[error("joint dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Robot joint count.
        expected: usize,
        /// Dimension of the supplied value.
        actual: usize,
    },

    /// A parameter is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration file I/O error.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_display() {
        let err = RegistryError::DuplicateName("power_limit".into());
        assert!(err.to_string().contains("power_limit"));
        let err = RegistryError::NotFound("missing".into());
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::DimensionMismatch {
            expected: 7,
            actual: 6,
        };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('6'));
    }
}
