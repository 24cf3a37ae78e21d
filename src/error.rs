//! Error types shared across the crate.

use thiserror::Error;

use crate::scenario::ConfigError;

/// Errors returned by construction, integration and zero solving.
///
/// Normal trajectory termination (reaching the maximum distance, or the
/// bullet slowing below the stable-flight threshold) is not an error.
#[derive(Debug, Error)]
pub enum BallisticsError {
    /// A configuration value was rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The integrator hit its step-count cap before terminating.
    #[error("trajectory integration diverged after {steps} steps")]
    IntegrationDivergence { steps: usize },

    /// The zero solver did not converge.
    #[error("zero angle not found after {iterations} iterations (miss {miss_ft:.6} ft)")]
    ZeroNotFound { iterations: usize, miss_ft: f64 },

    /// A scenario file could not be loaded.
    #[error(transparent)]
    Scenario(#[from] ConfigError),
}

impl BallisticsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BallisticsError::InvalidConfiguration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, BallisticsError>;
