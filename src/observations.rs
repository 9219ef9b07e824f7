//! Observed data that a model is fitted against.
//!
//! An [`Observations`] set is a pair of equal-length sequences: the
//! coordinates at which data was sampled and the observed values there.
//! It is built once and never mutated afterwards.

use ndarray::Array1;

use crate::error::{FitError, Result};

/// Immutable set of `(coordinate, value)` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    coordinates: Array1<f64>,
    values: Array1<f64>,
}

impl Observations {
    /// Create a new observation set from coordinates and observed values.
    ///
    /// Both sequences are copied; later changes to the caller's buffers have
    /// no effect on the set.
    ///
    /// # Errors
    ///
    /// * `FitError::DimensionMismatch` if the two sequences differ in length
    pub fn new(coordinates: impl Into<Array1<f64>>, values: impl Into<Array1<f64>>) -> Result<Self> {
        let coordinates = coordinates.into();
        let values = values.into();

        if coordinates.len() != values.len() {
            return Err(FitError::DimensionMismatch(format!(
                "{} coordinates but {} values",
                coordinates.len(),
                values.len()
            )));
        }

        Ok(Self {
            coordinates,
            values,
        })
    }

    /// Create an observation set by sampling `f` at every coordinate.
    pub fn from_fn<F>(coordinates: impl Into<Array1<f64>>, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let coordinates = coordinates.into();
        let values = coordinates.mapv(f);
        Self {
            coordinates,
            values,
        }
    }

    /// The sample coordinates.
    pub fn coordinates(&self) -> &Array1<f64> {
        &self.coordinates
    }

    /// The observed values.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of samples (`nPoints`).
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Whether the set holds no samples.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Evenly spaced coordinates from `start` to `end`, both inclusive.
///
/// `n == 1` yields `[start]` and `n == 0` an empty array.
pub fn linspace(start: f64, end: f64, n: usize) -> Array1<f64> {
    match n {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => {
            let step = (end - start) / (n - 1) as f64;
            Array1::from_shape_fn(n, |i| start + i as f64 * step)
        }
    }
}
