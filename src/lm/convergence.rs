//! Convergence criteria and solver status.
//!
//! The solver stops once the most recent accepted step is small compared to
//! the parameters it was applied to, component by component:
//!
//! `|step_j| <= abs_tol + rel_tol * |params_j|` for every `j`.

use ndarray::Array1;

use crate::error::FitError;

/// State of a [`Solver`](super::Solver) between calls to `iterate()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// The solver can take further steps.
    Continuing,

    /// The last accepted step met the step-size tolerance. Terminal.
    Converged,

    /// A model evaluation failed or no usable step could be found. Terminal.
    Failed,
}

impl SolverStatus {
    /// Returns true if no further iterations are permitted.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SolverStatus::Continuing)
    }
}

/// How a call to `run()` ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// The step-size tolerance was met.
    Converged,

    /// The iteration budget ran out before convergence. The parameters are
    /// the best estimate found so far.
    MaxIterationsReached,

    /// The fit failed; the parameters are the last accepted estimate.
    Failed(FitError),
}

impl Termination {
    /// Returns true if the fit converged.
    pub fn is_converged(&self) -> bool {
        matches!(self, Termination::Converged)
    }

    /// Returns a description of the termination reason.
    pub fn description(&self) -> String {
        match self {
            Termination::Converged => "Converged: small parameter step".to_string(),
            Termination::MaxIterationsReached => {
                "Terminated: maximum iterations reached".to_string()
            }
            Termination::Failed(err) => format!("Failed: {}", err),
        }
    }
}

/// Checks whether a step is small relative to the parameters.
///
/// # Arguments
///
/// * `step` - The most recent accepted step
/// * `params` - The parameters after that step was applied
/// * `abs_tol` - Absolute tolerance per component
/// * `rel_tol` - Relative tolerance per component
pub fn step_within_tolerance(
    step: &Array1<f64>,
    params: &Array1<f64>,
    abs_tol: f64,
    rel_tol: f64,
) -> bool {
    step.iter()
        .zip(params.iter())
        .all(|(dx, x)| dx.abs() <= abs_tol + rel_tol * x.abs())
}
