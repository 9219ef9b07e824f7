//! Levenberg-Marquardt solver.
//!
//! This module provides the iterative solver that fits a [`Model`](crate::model::Model)
//! to [`Observations`](crate::observations::Observations) by minimizing the
//! sum of squared residuals with damped Gauss-Newton steps.

pub mod batch;
pub mod config;
pub mod convergence;
pub mod solver;
pub mod step;

// Re-export key types
pub use batch::{fit_batch, fit_batch_with_config, FitJob};
pub use config::SolverConfig;
pub use convergence::{step_within_tolerance, SolverStatus, Termination};
pub use solver::{FitReport, Solver};
pub use step::NormalEquations;
