//! Model definition trait.
//!
//! This module defines the `Model` trait, which represents the residual and
//! Jacobian functions that parameterize a fit. A model is a pure function of
//! the current parameter estimate and the fixed observation set owned by the
//! solver.

use ndarray::{Array1, Array2};

use crate::error::Result;
use crate::observations::Observations;

/// A parametric model fitted to observations by least squares.
///
/// Implementations must be deterministic and free of side effects. The
/// residual vector must have one entry per observation and the Jacobian must
/// have shape `(observations, parameters)`; returning anything else is a
/// programming error and the solver panics on it.
pub trait Model {
    /// Number of parameters the model expects (`nParams`).
    fn parameter_count(&self) -> usize;

    /// Evaluate the residuals `model(coordinates, params) - values`.
    ///
    /// # Arguments
    ///
    /// * `params` - The parameter values at which to evaluate the residuals
    /// * `data` - The observations the model is fitted against
    ///
    /// # Returns
    ///
    /// * A vector of residuals, or an error if the evaluation fails
    fn residuals(&self, params: &Array1<f64>, data: &Observations) -> Result<Array1<f64>>;

    /// Evaluate the Jacobian `J[i][j] = ∂residual_i/∂params_j` at `params`.
    ///
    /// The solver always re-evaluates the Jacobian at the current estimate, so
    /// linear and nonlinear models are treated alike.
    fn jacobian(&self, params: &Array1<f64>, data: &Observations) -> Result<Array2<f64>>;

    /// Evaluate residuals and Jacobian together.
    ///
    /// Override this when both share expensive intermediate results. The
    /// default evaluates the residuals first and does not compute the
    /// Jacobian if that fails.
    fn residuals_and_jacobian(
        &self,
        params: &Array1<f64>,
        data: &Observations,
    ) -> Result<(Array1<f64>, Array2<f64>)> {
        let residuals = self.residuals(params, data)?;
        let jacobian = self.jacobian(params, data)?;
        Ok((residuals, jacobian))
    }

    /// Sum of squared residuals at `params`.
    fn cost(&self, params: &Array1<f64>, data: &Observations) -> Result<f64> {
        let residuals = self.residuals(params, data)?;
        Ok(residuals.dot(&residuals))
    }
}

impl<M: Model + ?Sized> Model for &M {
    fn parameter_count(&self) -> usize {
        (**self).parameter_count()
    }

    fn residuals(&self, params: &Array1<f64>, data: &Observations) -> Result<Array1<f64>> {
        (**self).residuals(params, data)
    }

    fn jacobian(&self, params: &Array1<f64>, data: &Observations) -> Result<Array2<f64>> {
        (**self).jacobian(params, data)
    }

    fn residuals_and_jacobian(
        &self,
        params: &Array1<f64>,
        data: &Observations,
    ) -> Result<(Array1<f64>, Array2<f64>)> {
        (**self).residuals_and_jacobian(params, data)
    }

    fn cost(&self, params: &Array1<f64>, data: &Observations) -> Result<f64> {
        (**self).cost(params, data)
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn parameter_count(&self) -> usize {
        (**self).parameter_count()
    }

    fn residuals(&self, params: &Array1<f64>, data: &Observations) -> Result<Array1<f64>> {
        (**self).residuals(params, data)
    }

    fn jacobian(&self, params: &Array1<f64>, data: &Observations) -> Result<Array2<f64>> {
        (**self).jacobian(params, data)
    }

    fn residuals_and_jacobian(
        &self,
        params: &Array1<f64>,
        data: &Observations,
    ) -> Result<(Array1<f64>, Array2<f64>)> {
        (**self).residuals_and_jacobian(params, data)
    }

    fn cost(&self, params: &Array1<f64>, data: &Observations) -> Result<f64> {
        (**self).cost(params, data)
    }
}
