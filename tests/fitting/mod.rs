//! Integration tests for fitting through the public solver API.


// Failure handling and terminal states
pub mod failure_modes;

// Nonlinear models and noisy data
pub mod nonlinear_fits;

// Parallel fitting of independent problems
pub mod batch;
