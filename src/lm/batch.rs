//! Parallel fitting of independent problems.
//!
//! Every job owns its model, initial guess and observations, and gets its own
//! [`Solver`]. Nothing is shared between jobs, so they run on the rayon
//! thread pool without synchronization.

use ndarray::Array1;
use rayon::prelude::*;

use crate::error::Result;
use crate::model::Model;
use crate::observations::Observations;

use super::config::SolverConfig;
use super::solver::{FitReport, Solver};

/// One independent fit.
#[derive(Debug, Clone)]
pub struct FitJob<M> {
    pub model: M,
    pub initial_params: Array1<f64>,
    pub data: Observations,
}

impl<M> FitJob<M> {
    pub fn new(model: M, initial_params: impl Into<Array1<f64>>, data: Observations) -> Self {
        Self {
            model,
            initial_params: initial_params.into(),
            data,
        }
    }
}

/// Fit every job in parallel with the default configuration.
///
/// Returns one entry per job, in input order. Construction errors are
/// reported per job and do not affect the others.
pub fn fit_batch<M>(jobs: Vec<FitJob<M>>) -> Vec<Result<FitReport>>
where
    M: Model + Send,
{
    fit_batch_with_config(jobs, &SolverConfig::default())
}

/// Fit every job in parallel with the given configuration.
pub fn fit_batch_with_config<M>(jobs: Vec<FitJob<M>>, config: &SolverConfig) -> Vec<Result<FitReport>>
where
    M: Model + Send,
{
    jobs.into_par_iter()
        .map(|job| {
            let mut solver =
                Solver::with_config(job.initial_params, job.data, job.model, config.clone())?;
            Ok(solver.solve())
        })
        .collect()
}
