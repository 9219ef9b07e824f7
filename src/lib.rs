//! # lmfit-core
//!
//! `lmfit-core` is an embeddable nonlinear least-squares curve-fitting engine.
//! It fits a parametric model to observed data by minimizing the sum of
//! squared residuals with the Levenberg-Marquardt algorithm.
//!
//! The library provides:
//! - A [`Model`] trait for user-supplied residual and Jacobian functions
//! - A [`Solver`] that can be driven one step at a time or run to completion
//! - Built-in polynomial and exponential models
//! - Parallel fitting of independent problems
//!
//! ## Basic Usage
//!
//! ```
//! use lmfit_core::models::PolynomialModel;
//! use lmfit_core::observations::linspace;
//! use lmfit_core::{Observations, Solver};
//!
//! // y = 5x + 3 sampled at x = 1..10
//! let data = Observations::from_fn(linspace(1.0, 10.0, 10), |x| 5.0 * x + 3.0);
//!
//! // Parameters are [b, a] for f(x) = a*x + b
//! let mut solver = Solver::new(vec![0.0, 0.0], data, PolynomialModel::linear()).unwrap();
//! let report = solver.run(500);
//!
//! assert!(report.is_converged());
//! assert!((report.params[0] - 3.0).abs() < 1e-4);
//! assert!((report.params[1] - 5.0).abs() < 1e-4);
//! ```

pub mod error;
pub mod lm;
pub mod model;
pub mod models;
pub mod observations;

// Re-exports for convenience
pub use error::{FitError, Result};
pub use lm::{FitReport, Solver, SolverConfig, SolverStatus, Termination};
pub use model::Model;
pub use observations::Observations;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
