use qqq_core::errors::{ErrorInfo, QqqError};
use thiserror::Error;

/// Failures raised while setting up or running a solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The true relative residual exceeds `tolerance_factor * target`.
    #[error(
        "relative residual {relative} outside tolerance (target {target}, max tolerated {max_tolerated})"
    )]
    ResidualOutOfTolerance {
        /// Relative residual `|chi - A^dag A psi| / |chi|`.
        relative: f64,
        /// Requested residual target.
        target: f64,
        /// Largest relative residual accepted.
        max_tolerated: f64,
        /// Iterations across both solve steps.
        iterations: usize,
    },
    /// Parameters that cannot be marshaled.
    #[error("invalid solver parameter `{field}`: {reason}")]
    InvalidParams {
        /// Offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The multigrid backend reported a failure.
    #[error("multigrid backend failure: {0}")]
    Backend(String),
}

impl SolveError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        SolveError::InvalidParams {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<SolveError> for QqqError {
    fn from(err: SolveError) -> Self {
        let info = match &err {
            SolveError::ResidualOutOfTolerance {
                relative,
                target,
                max_tolerated,
                iterations,
            } => ErrorInfo::new("residual-out-of-tolerance", err.to_string())
                .with_context("relative", relative)
                .with_context("target", target)
                .with_context("max_tolerated", max_tolerated)
                .with_context("iterations", iterations),
            SolveError::InvalidParams { field, .. } => {
                ErrorInfo::new("solver-params", err.to_string()).with_context("field", field)
            }
            SolveError::Backend(_) => ErrorInfo::new("solver-backend", err.to_string()),
        };
        QqqError::Solver(info)
    }
}
