//! The iterative Levenberg-Marquardt solver.
//!
//! A [`Solver`] owns the parameter estimate, the observations and the model
//! for the lifetime of one fit. The caller drives it either step by step with
//! [`Solver::iterate`] or to completion with [`Solver::run`].

use std::fmt;

use log::{debug, info, trace, warn};
use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};
use crate::model::Model;
use crate::observations::Observations;

use super::config::SolverConfig;
use super::convergence::{step_within_tolerance, SolverStatus, Termination};
use super::step::NormalEquations;

/// Result of driving a solver to a terminal state.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Final parameter values
    pub params: Array1<f64>,

    /// Why the fit stopped
    pub termination: Termination,

    /// Number of accepted iterations
    pub iterations: usize,

    /// Sum of squared residuals at `params`
    pub cost: f64,
}

impl FitReport {
    /// Returns true if the fit converged.
    pub fn is_converged(&self) -> bool {
        self.termination.is_converged()
    }
}

impl fmt::Display for FitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fit Result:")?;
        writeln!(f, "  Termination: {}", self.termination.description())?;
        writeln!(f, "  Cost: {:.6e}", self.cost)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Parameters: {}", self.params)?;
        Ok(())
    }
}

/// Levenberg-Marquardt solver for one fit.
#[derive(Debug)]
pub struct Solver<M> {
    model: M,
    data: Observations,
    config: SolverConfig,

    /// Current parameter estimate
    params: Array1<f64>,

    /// Last accepted step, `None` before the first one
    step: Option<Array1<f64>>,

    /// Sum of squared residuals at `params`
    cost: f64,

    /// Current damping factor
    lambda: f64,

    /// Damping scale of the previous iteration
    scale: Option<Array1<f64>>,

    iteration: usize,
    status: SolverStatus,
    failure: Option<FitError>,
}

impl<M: Model> Solver<M> {
    /// Create a solver with the default configuration.
    ///
    /// See [`Solver::with_config`].
    pub fn new(initial_params: impl Into<Array1<f64>>, data: Observations, model: M) -> Result<Self> {
        Self::with_config(initial_params, data, model, SolverConfig::default())
    }

    /// Create a solver with the given configuration.
    ///
    /// The initial parameters are copied into the solver. Residuals and the
    /// Jacobian are evaluated once at the initial guess to validate the model.
    ///
    /// # Errors
    ///
    /// * `FitError::DimensionMismatch` if the number of initial parameters does
    ///   not match the model, or there are fewer observations than parameters
    /// * `FitError::ModelEvaluation` if the model fails at the initial guess or
    ///   produces non-finite values there
    pub fn with_config(
        initial_params: impl Into<Array1<f64>>,
        data: Observations,
        model: M,
        config: SolverConfig,
    ) -> Result<Self> {
        let params = initial_params.into();
        let n_params = model.parameter_count();

        if params.len() != n_params {
            return Err(FitError::DimensionMismatch(format!(
                "Expected {} parameters, got {}",
                n_params,
                params.len()
            )));
        }
        if data.len() < n_params {
            return Err(FitError::DimensionMismatch(format!(
                "Under-determined system: {} observations for {} parameters",
                data.len(),
                n_params
            )));
        }

        let (residuals, _) = evaluate(&model, &params, &data)?;
        let cost = residuals.dot(&residuals);
        let lambda = config.initial_lambda;

        Ok(Self {
            model,
            data,
            config,
            params,
            step: None,
            cost,
            lambda,
            scale: None,
            iteration: 0,
            status: SolverStatus::Continuing,
            failure: None,
        })
    }

    /// Perform one refinement step.
    ///
    /// Rejected trial steps raise the damping factor and are retried within
    /// the same call; only an accepted step advances the iteration count.
    ///
    /// # Errors
    ///
    /// * `FitError::Terminated` if the solver is already converged or failed
    /// * `FitError::ModelEvaluation` if the model fails; the solver is then failed
    /// * `FitError::SingularSystem` if no usable step exists even at maximal
    ///   damping; the solver is then failed
    pub fn iterate(&mut self) -> Result<SolverStatus> {
        if self.status.is_terminal() {
            return Err(FitError::Terminated(self.status));
        }

        let (residuals, jacobian) = match evaluate(&self.model, &self.params, &self.data) {
            Ok(eval) => eval,
            Err(err) => return Err(self.fail(err)),
        };
        self.cost = residuals.dot(&residuals);

        let normal = NormalEquations::assemble(&jacobian, &residuals, self.scale.as_ref());
        self.scale = Some(normal.scale().clone());
        if normal.jacobian_vanishes() {
            return Err(self.fail(FitError::SingularSystem {
                iteration: self.iteration,
            }));
        }

        loop {
            if let Some(step) = normal.solve(self.lambda) {
                let trial = &self.params + &step;
                let trial_cost = match self.model.cost(&trial, &self.data) {
                    Ok(cost) => cost,
                    Err(err) => return Err(self.fail(err.into_model_failure())),
                };

                if self.acceptable(trial_cost) {
                    let predicted = normal.predicted_reduction(&step);
                    debug!(
                        "iteration {}: cost {:.6e} -> {:.6e} (gain ratio {:.3}), lambda {:.3e}, max |step| {:.3e}",
                        self.iteration + 1,
                        self.cost,
                        trial_cost,
                        gain_ratio(self.cost, trial_cost, predicted),
                        self.lambda,
                        step.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
                    );

                    self.params = trial;
                    self.step = Some(step);
                    self.cost = trial_cost;
                    self.iteration += 1;
                    self.lambda = self.config.decrease_lambda(self.lambda);

                    if self.converged() {
                        self.status = SolverStatus::Converged;
                    }
                    return Ok(self.status);
                }

                trace!(
                    "rejected trial step: cost {:.6e} -> {:.6e} at lambda {:.3e}",
                    self.cost,
                    trial_cost,
                    self.lambda
                );
            } else {
                trace!("damped system not solvable at lambda {:.3e}", self.lambda);
            }

            let next_lambda = self.config.increase_lambda(self.lambda);
            if self.lambda >= self.config.max_lambda || next_lambda <= self.lambda {
                return Err(self.fail(FitError::SingularSystem {
                    iteration: self.iteration,
                }));
            }
            self.lambda = next_lambda;
        }
    }

    /// Whether the most recent accepted step meets the step-size tolerance.
    ///
    /// Always false before the first accepted step. Has no side effects.
    pub fn converged(&self) -> bool {
        self.step.as_ref().is_some_and(|step| {
            step_within_tolerance(
                step,
                &self.params,
                self.config.step_abs_tol,
                self.config.step_rel_tol,
            )
        })
    }

    /// Iterate until convergence, failure, or `max_iterations` accepted steps.
    ///
    /// The count includes iterations performed by earlier calls, so the
    /// solver never goes beyond `max_iterations` in total.
    pub fn run(&mut self, max_iterations: usize) -> FitReport {
        while self.status == SolverStatus::Continuing && self.iteration < max_iterations {
            // Failures are recorded in the solver state and reported below
            if self.iterate().is_err() {
                break;
            }
        }

        let termination = match self.status {
            SolverStatus::Converged => Termination::Converged,
            SolverStatus::Continuing => Termination::MaxIterationsReached,
            SolverStatus::Failed => Termination::Failed(
                self.failure
                    .clone()
                    .unwrap_or(FitError::SingularSystem {
                        iteration: self.iteration,
                    }),
            ),
        };

        info!(
            "fit finished after {} iterations: {}",
            self.iteration,
            termination.description()
        );

        FitReport {
            params: self.params.clone(),
            termination,
            iterations: self.iteration,
            cost: self.cost,
        }
    }

    /// Iterate with the configured iteration budget.
    pub fn solve(&mut self) -> FitReport {
        self.run(self.config.max_iterations)
    }

    /// Current parameter estimate.
    pub fn params(&self) -> &Array1<f64> {
        &self.params
    }

    /// Most recent accepted step.
    pub fn step(&self) -> Option<&Array1<f64>> {
        self.step.as_ref()
    }

    /// Number of accepted iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Current state of the solver.
    pub fn status(&self) -> SolverStatus {
        self.status
    }

    /// Sum of squared residuals at the current estimate.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Current damping factor.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// The error that failed the solver, if any.
    pub fn failure(&self) -> Option<&FitError> {
        self.failure.as_ref()
    }

    /// The observations being fitted.
    pub fn observations(&self) -> &Observations {
        &self.data
    }

    /// The configuration the solver was created with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The model being fitted.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Consume the solver and return the parameter estimate.
    pub fn into_params(self) -> Array1<f64> {
        self.params
    }

    /// A trial cost is acceptable if it is no worse than the current cost,
    /// up to the configured relative slack.
    fn acceptable(&self, trial_cost: f64) -> bool {
        trial_cost.is_finite() && trial_cost <= self.cost + self.config.cost_tolerance * self.cost
    }

    fn fail(&mut self, err: FitError) -> FitError {
        warn!(
            "fit failed after {} iterations: {}",
            self.iteration, err
        );
        self.status = SolverStatus::Failed;
        self.failure = Some(err.clone());
        err
    }
}

/// Evaluate residuals and Jacobian, enforcing the model's shape contract.
fn evaluate<M: Model>(
    model: &M,
    params: &Array1<f64>,
    data: &Observations,
) -> Result<(Array1<f64>, Array2<f64>)> {
    let (residuals, jacobian) = model
        .residuals_and_jacobian(params, data)
        .map_err(FitError::into_model_failure)?;

    assert_eq!(
        residuals.len(),
        data.len(),
        "the model must return one residual per observation"
    );
    assert_eq!(
        jacobian.dim(),
        (data.len(), params.len()),
        "the model Jacobian must have shape (observations, parameters)"
    );

    if residuals.iter().chain(jacobian.iter()).any(|v| !v.is_finite()) {
        return Err(FitError::ModelEvaluation(
            "residuals or Jacobian contain non-finite values".to_string(),
        ));
    }

    Ok((residuals, jacobian))
}

/// Ratio of actual to predicted cost reduction.
fn gain_ratio(cost: f64, new_cost: f64, predicted_reduction: f64) -> f64 {
    let actual_reduction = cost - new_cost;

    if predicted_reduction.abs() < 1e-300 {
        if actual_reduction.abs() < 1e-300 {
            1.0
        } else {
            0.0
        }
    } else {
        actual_reduction / predicted_reduction
    }
}
