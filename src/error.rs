use thiserror::Error;

use crate::lm::SolverStatus;

/// Error types for the lmfit-core library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Parameter, coordinate or value lengths are inconsistent, or the system
    /// has fewer observations than parameters.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The model reported a failure while evaluating residuals or the Jacobian.
    #[error("Model evaluation failed: {0}")]
    ModelEvaluation(String),

    /// The damped linear system could not produce a usable step.
    #[error("Singular system at iteration {iteration}: no usable step even at maximal damping")]
    SingularSystem {
        /// Number of accepted iterations before the failure.
        iteration: usize,
    },

    /// `iterate()` was called after the solver reached a terminal state.
    #[error("Solver already terminated with status {0:?}")]
    Terminated(SolverStatus),
}

impl FitError {
    /// Wraps an arbitrary error coming out of user model code as a
    /// [`FitError::ModelEvaluation`], leaving existing evaluation errors untouched.
    pub(crate) fn into_model_failure(self) -> Self {
        match self {
            err @ FitError::ModelEvaluation(_) => err,
            other => FitError::ModelEvaluation(other.to_string()),
        }
    }
}

/// Result type alias for lmfit-core operations.
pub type Result<T> = std::result::Result<T, FitError>;

impl From<String> for FitError {
    fn from(s: String) -> Self {
        FitError::ModelEvaluation(s)
    }
}

impl From<&str> for FitError {
    fn from(s: &str) -> Self {
        FitError::ModelEvaluation(s.to_string())
    }
}
