//! Configuration options for the Levenberg-Marquardt solver.
//!
//! This module defines the iteration budget, the step-size convergence
//! tolerances and the damping schedule used by [`Solver`](super::Solver).

use serde::{Deserialize, Serialize};

/// Configuration options for the Levenberg-Marquardt solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of accepted iterations used by `Solver::solve`. Default: 500
    pub max_iterations: usize,

    /// Absolute tolerance on each step component. Default: 1e-4
    pub step_abs_tol: f64,

    /// Relative tolerance on each step component. Default: 1e-4
    pub step_rel_tol: f64,

    /// Initial value for the damping parameter. Default: 1e-3
    pub initial_lambda: f64,

    /// Factor by which to increase lambda. Default: 10.0
    pub lambda_up_factor: f64,

    /// Factor by which to decrease lambda. Default: 0.1
    pub lambda_down_factor: f64,

    /// Minimum value for lambda. Default: 1e-12
    pub min_lambda: f64,

    /// Maximum value for lambda. Default: 1e12
    pub max_lambda: f64,

    /// Relative slack when comparing a trial cost to the current one. Default: 1e-12
    pub cost_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            step_abs_tol: 1e-4,
            step_rel_tol: 1e-4,
            initial_lambda: 1e-3,
            lambda_up_factor: 10.0,
            lambda_down_factor: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e12,
            cost_tolerance: 1e-12,
        }
    }
}

impl SolverConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the absolute and relative step tolerances.
    pub fn with_step_tolerances(mut self, abs_tol: f64, rel_tol: f64) -> Self {
        self.step_abs_tol = abs_tol;
        self.step_rel_tol = rel_tol;
        self
    }

    /// Set the initial value for the damping parameter.
    ///
    /// A value of zero starts with pure Gauss-Newton steps.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.initial_lambda = lambda;
        self
    }

    /// Set the factor by which to increase lambda.
    pub fn with_lambda_up_factor(mut self, factor: f64) -> Self {
        self.lambda_up_factor = factor;
        self
    }

    /// Set the factor by which to decrease lambda.
    pub fn with_lambda_down_factor(mut self, factor: f64) -> Self {
        self.lambda_down_factor = factor;
        self
    }

    /// Set the minimum and maximum values for lambda.
    pub fn with_lambda_bounds(mut self, min_lambda: f64, max_lambda: f64) -> Self {
        self.min_lambda = min_lambda;
        self.max_lambda = max_lambda;
        self
    }

    /// Set the relative slack used when accepting a step.
    pub fn with_cost_tolerance(mut self, tolerance: f64) -> Self {
        self.cost_tolerance = tolerance;
        self
    }

    /// Damping factor after a rejected step or failed solve.
    pub(crate) fn increase_lambda(&self, lambda: f64) -> f64 {
        (lambda * self.lambda_up_factor)
            .max(self.min_lambda)
            .min(self.max_lambda)
    }

    /// Damping factor after an accepted step.
    pub(crate) fn decrease_lambda(&self, lambda: f64) -> f64 {
        (lambda * self.lambda_down_factor).max(self.min_lambda)
    }
}
