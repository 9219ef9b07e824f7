//! Built-in model implementations for common fitting problems.
//!
//! These models cover the usual cases of curve fitting and double as
//! reference implementations of the [`Model`](crate::model::Model) trait.

mod exponential;
mod polynomial;

pub use exponential::ExponentialModel;
pub use polynomial::PolynomialModel;
