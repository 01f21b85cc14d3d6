//! Error types for the lieops library
//!
//! This module provides the crate-level error and result types. Module errors
//! (currently [`ManifoldError`]) are wrapped inside [`LieError`] so that the
//! full source chain stays inspectable.
//!
//! Example error chain:
//! ```text
//! LieError::Operation {
//!     group: "SO(3)",
//!     operation: "log",
//!     source: ManifoldError::ShapeMismatch { expected: (3, 3), actual: (4, 4) },
//! }
//! ```

use crate::manifold::ManifoldError;
use std::error::Error as StdError;
use thiserror::Error;

/// Main result type used by the matrix-level API.
pub type LieResult<T> = Result<T, LieError>;

/// Main error type for the lieops library.
///
/// # Error Chain Access
///
/// ```rust
/// use lieops::manifold::matrix::SO3Group;
/// use nalgebra::DVector;
///
/// let group = SO3Group::new();
/// if let Err(e) = group.wedge(&DVector::from_vec(vec![1.0, 2.0])) {
///     assert!(e.chain().contains("expected vector of length 3"));
/// }
/// ```
#[derive(Debug, Error)]
pub enum LieError {
    /// Manifold errors raised directly by the typed layer
    #[error(transparent)]
    Manifold(#[from] ManifoldError),

    /// A matrix-level operation rejected its input
    #[error("{group} {operation} failed")]
    Operation {
        group: &'static str,
        operation: &'static str,
        #[source]
        source: ManifoldError,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl LieError {
    /// The underlying manifold error, if this error carries one.
    pub fn manifold_error(&self) -> Option<&ManifoldError> {
        match self {
            LieError::Manifold(err) | LieError::Operation { source: err, .. } => Some(err),
            LieError::InvalidConfig { .. } => None,
        }
    }

    /// Get the full error chain as a string for logging and debugging.
    ///
    /// Output looks like:
    /// ```text
    /// SO(3) log failed
    ///   → Shape mismatch: expected 3x3 matrix, got 4x4
    /// ```
    pub fn chain(&self) -> String {
        let mut chain = vec![self.to_string()];
        let mut source = self.source();

        while let Some(err) = source {
            chain.push(format!("  → {}", err));
            source = err.source();
        }

        chain.join("\n")
    }

    /// Single-line variant of [`LieError::chain`].
    pub fn chain_compact(&self) -> String {
        let mut chain = vec![self.to_string()];
        let mut source = self.source();

        while let Some(err) = source {
            chain.push(err.to_string());
            source = err.source();
        }

        chain.join(" → ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lie_error_display() {
        let error = LieError::from(ManifoldError::InvalidNumber);
        assert!(error.to_string().contains("NaN or Inf"));
    }

    #[test]
    fn test_lie_error_chain() {
        let error = LieError::Operation {
            group: "SE(3)",
            operation: "exp",
            source: ManifoldError::ShapeMismatch {
                expected: (4, 4),
                actual: (3, 3),
            },
        };

        let chain = error.chain();
        assert!(chain.starts_with("SE(3) exp failed"));
        assert!(chain.contains("expected 4x4 matrix, got 3x3"));
        assert_eq!(chain.lines().count(), 2);
    }

    #[test]
    fn test_lie_error_chain_compact() {
        let error = LieError::Operation {
            group: "SO(2)",
            operation: "wedge",
            source: ManifoldError::DimensionMismatch {
                expected: 1,
                actual: 3,
            },
        };

        let chain_compact = error.chain_compact();
        assert!(chain_compact.contains("SO(2) wedge failed → "));
        assert!(chain_compact.contains("expected vector of length 1, got 3"));
    }

    #[test]
    fn test_invalid_config_has_no_manifold_error() {
        let error = LieError::InvalidConfig {
            field: "membership_tolerance",
            reason: "must be positive".to_string(),
        };
        assert!(error.manifold_error().is_none());
        assert!(error.to_string().contains("membership_tolerance"));
    }

    #[test]
    fn test_transparent_error_conversion() {
        let manifold_error = ManifoldError::DimensionMismatch {
            expected: 6,
            actual: 5,
        };

        let lie_error: LieError = manifold_error.clone().into();
        match &lie_error {
            LieError::Manifold(_) => {}
            _ => panic!("Expected Manifold variant"),
        }
        assert_eq!(lie_error.manifold_error(), Some(&manifold_error));
    }
}
