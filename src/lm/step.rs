//! Step calculation for the Levenberg-Marquardt solver.
//!
//! The step solves the damped normal equations
//!
//! `(JᵀJ + λD) · step = -Jᵀr`
//!
//! where `D` holds, per parameter, the largest diagonal entry of `JᵀJ` seen
//! so far in the fit. Scaling the damping term by `D` keeps the step
//! invariant under rescaling of individual parameters. A column that has
//! never been seen nonzero gets a scale of 1 so that its damping term does
//! not vanish.

use faer::prelude::Solve;
use faer::{Col, Mat, Side};
use ndarray::{Array1, Array2};

/// Normal equations assembled from one residual/Jacobian evaluation.
///
/// Assembly happens once per iteration; `solve` can then be called repeatedly
/// with increasing damping without touching the model again.
#[derive(Debug, Clone)]
pub struct NormalEquations {
    /// JᵀJ
    jtj: Array2<f64>,

    /// Jᵀr
    jtr: Array1<f64>,

    /// Damping scale D
    scale: Array1<f64>,
}

impl NormalEquations {
    /// Assemble `JᵀJ`, `Jᵀr` and the damping scale.
    ///
    /// `previous_scale` is the scale used by the previous iteration of the
    /// same fit, if any; each entry of the new scale is at least as large.
    pub fn assemble(
        jacobian: &Array2<f64>,
        residuals: &Array1<f64>,
        previous_scale: Option<&Array1<f64>>,
    ) -> Self {
        let jtj = jacobian.t().dot(jacobian);
        let jtr = jacobian.t().dot(residuals);

        let mut scale = jtj.diag().to_owned();
        if let Some(previous) = previous_scale {
            scale.zip_mut_with(previous, |d, &p| *d = d.max(p));
        }
        let max_scale = scale.iter().cloned().fold(0.0, f64::max);
        let threshold = f64::EPSILON * f64::EPSILON * max_scale;
        scale.mapv_inplace(|d| if d <= threshold { 1.0 } else { d });

        Self { jtj, jtr, scale }
    }

    /// Number of parameters.
    pub fn dim(&self) -> usize {
        self.jtr.len()
    }

    /// The gradient of half the cost, `Jᵀr`.
    pub fn gradient(&self) -> &Array1<f64> {
        &self.jtr
    }

    /// The damping scale `D`.
    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }

    /// Whether the Jacobian is identically zero, so no parameter has any
    /// influence on the residuals and no step can reduce the cost.
    pub fn jacobian_vanishes(&self) -> bool {
        let max_diag = self.jtj.diag().iter().cloned().fold(0.0, f64::max);
        max_diag <= 0.0 || !max_diag.is_finite()
    }

    /// Solve `(JᵀJ + λD) · step = -Jᵀr` by Cholesky factorization.
    ///
    /// Returns `None` when the damped matrix is not numerically positive
    /// definite or the solution is not finite; the caller should retry with a
    /// larger `lambda`.
    pub fn solve(&self, lambda: f64) -> Option<Array1<f64>> {
        let n = self.dim();
        let a = Mat::from_fn(n, n, |i, j| {
            if i == j {
                self.jtj[[i, j]] + lambda * self.scale[i]
            } else {
                self.jtj[[i, j]]
            }
        });
        let b = Col::from_fn(n, |i| -self.jtr[i]);

        let llt = a.llt(Side::Lower).ok()?;
        let x = llt.solve(&b);

        let step = x.iter().copied().collect::<Array1<f64>>();
        if step.len() != n || step.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(step)
    }

    /// Predicted decrease of the cost `‖r‖²` for `step` under the linear model.
    pub fn predicted_reduction(&self, step: &Array1<f64>) -> f64 {
        // ‖r‖² - ‖r + J·step‖² = -2 stepᵀJᵀr - stepᵀJᵀJ step
        -2.0 * step.dot(&self.jtr) - step.dot(&self.jtj.dot(step))
    }
}
