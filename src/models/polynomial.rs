//! Polynomial models for fitting data.

use ndarray::{Array1, Array2};

use crate::error::Result;
use crate::model::Model;
use crate::observations::Observations;

/// A polynomial model of arbitrary degree
///
/// The polynomial function is defined as:
///
/// f(x) = c[0] + c[1]*x + c[2]*x^2 + ... + c[n]*x^n
///
/// Parameters are ordered by increasing power, so the linear model
/// `f(x) = a*x + b` uses `params = [b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialModel {
    degree: usize,
}

impl PolynomialModel {
    /// Create a new polynomial model with the specified degree.
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }

    /// The straight line `f(x) = a*x + b` with parameters `[b, a]`.
    pub fn linear() -> Self {
        Self::new(1)
    }

    /// Degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluate the polynomial at `x` using Horner's scheme.
    pub fn value(&self, params: &Array1<f64>, x: f64) -> f64 {
        params.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }
}

impl Model for PolynomialModel {
    fn parameter_count(&self) -> usize {
        self.degree + 1
    }

    fn residuals(&self, params: &Array1<f64>, data: &Observations) -> Result<Array1<f64>> {
        let predicted = data.coordinates().mapv(|x| self.value(params, x));
        Ok(predicted - data.values())
    }

    fn jacobian(&self, _params: &Array1<f64>, data: &Observations) -> Result<Array2<f64>> {
        // J_ij = x_i^j; independent of the parameters
        let x = data.coordinates();
        Ok(Array2::from_shape_fn((data.len(), self.degree + 1), |(i, j)| {
            x[i].powi(j as i32)
        }))
    }
}
