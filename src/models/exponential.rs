//! Exponential decay model for fitting.

use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};
use crate::model::Model;
use crate::observations::Observations;

/// An exponential model for fitting exponential decay or growth
///
/// The exponential function is defined as:
///
/// f(x) = amplitude * exp(-x/decay) + baseline
///
/// with `params = [amplitude, decay, baseline]`. A zero decay constant is
/// outside the model's domain and reported as an evaluation failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExponentialModel;

impl ExponentialModel {
    pub fn new() -> Self {
        Self
    }

    fn unpack(params: &Array1<f64>) -> Result<(f64, f64, f64)> {
        let (amplitude, decay, baseline) = (params[0], params[1], params[2]);
        if decay == 0.0 || !decay.is_finite() {
            return Err(FitError::ModelEvaluation(format!(
                "decay constant must be finite and non-zero, got {}",
                decay
            )));
        }
        Ok((amplitude, decay, baseline))
    }
}

impl Model for ExponentialModel {
    fn parameter_count(&self) -> usize {
        3
    }

    fn residuals(&self, params: &Array1<f64>, data: &Observations) -> Result<Array1<f64>> {
        let (amplitude, decay, baseline) = Self::unpack(params)?;
        let predicted = data
            .coordinates()
            .mapv(|x| amplitude * f64::exp(-x / decay) + baseline);
        Ok(predicted - data.values())
    }

    fn jacobian(&self, params: &Array1<f64>, data: &Observations) -> Result<Array2<f64>> {
        let (amplitude, decay, _) = Self::unpack(params)?;
        let x = data.coordinates();
        let mut jac = Array2::zeros((data.len(), 3));

        for (i, &xi) in x.iter().enumerate() {
            let e = f64::exp(-xi / decay);
            jac[[i, 0]] = e;
            jac[[i, 1]] = amplitude * e * xi / (decay * decay);
            jac[[i, 2]] = 1.0;
        }

        Ok(jac)
    }
}
