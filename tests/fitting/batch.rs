//! Parallel fitting of independent problems.

use approx::assert_relative_eq;
use lmfit_core::lm::{fit_batch_with_config, FitJob};
use lmfit_core::models::ExponentialModel;
use lmfit_core::observations::linspace;
use lmfit_core::{Observations, SolverConfig, Termination};
use ndarray::array;

#[test]
fn test_independent_exponential_fits() {
    let decays = [0.5, 1.0, 2.0, 4.0];
    let jobs = decays
        .iter()
        .map(|&decay| {
            let data = Observations::from_fn(linspace(0.0, 10.0, 50), move |x| {
                3.0 * (-x / decay).exp() + 0.2
            });
            FitJob::new(ExponentialModel::new(), array![1.0, 1.0, 0.0], data)
        })
        .collect::<Vec<_>>();

    let reports = fit_batch_with_config(jobs, &SolverConfig::default());
    for (report, &decay) in reports.iter().zip(decays.iter()) {
        let report = report.as_ref().unwrap();
        assert_eq!(report.termination, Termination::Converged);
        assert_relative_eq!(report.params[1], decay, epsilon = 1e-3);
    }
}

#[test]
fn test_batch_honors_iteration_budget() {
    let jobs = vec![FitJob::new(
        ExponentialModel::new(),
        array![1.0, 1.0, 0.0],
        Observations::from_fn(linspace(0.0, 10.0, 50), |x| 3.0 * (-x / 2.0).exp()),
    )];

    let config = SolverConfig::new().with_max_iterations(1);
    let reports = fit_batch_with_config(jobs, &config);
    let report = reports[0].as_ref().unwrap();
    assert_eq!(report.termination, Termination::MaxIterationsReached);
    assert_eq!(report.iterations, 1);
}
