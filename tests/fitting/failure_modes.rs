//! Failure handling: singular systems, model failures and terminal states.

use lmfit_core::models::{ExponentialModel, PolynomialModel};
use lmfit_core::observations::linspace;
use lmfit_core::{FitError, Observations, Solver, SolverStatus, Termination};
use ndarray::array;

use crate::test_helpers::{reference_line, ContraryOffset, FailingLine, FlatModel, SplitSlope};

#[test]
fn test_zero_jacobian_fails_with_singular_system() {
    let mut solver = Solver::new(array![1.0, 2.0], reference_line(), FlatModel).unwrap();

    let err = solver.iterate().unwrap_err();
    assert_eq!(err, FitError::SingularSystem { iteration: 0 });
    assert_eq!(solver.status(), SolverStatus::Failed);
    assert_eq!(solver.failure(), Some(&err));

    // Last good parameters and iteration count are preserved, with no NaN
    assert_eq!(solver.params(), &array![1.0, 2.0]);
    assert_eq!(solver.iteration(), 0);
    assert!(solver.params().iter().all(|p| p.is_finite()));
}

#[test]
fn test_zero_jacobian_run_terminates() {
    let mut solver = Solver::new(array![1.0, 2.0], reference_line(), FlatModel).unwrap();
    let report = solver.run(500);

    assert_eq!(
        report.termination,
        Termination::Failed(FitError::SingularSystem { iteration: 0 })
    );
    assert_eq!(report.iterations, 0);
    assert_eq!(report.params.len(), 2);
}

#[test]
fn test_exhausted_damping_fails_with_singular_system() {
    let mut solver = Solver::new(array![0.0], reference_line(), ContraryOffset).unwrap();
    let initial_cost = solver.cost();

    let err = solver.iterate().unwrap_err();
    assert_eq!(err, FitError::SingularSystem { iteration: 0 });
    assert_eq!(solver.status(), SolverStatus::Failed);
    assert_eq!(solver.lambda(), solver.config().max_lambda);

    // No uphill step was ever accepted
    assert_eq!(solver.params(), &array![0.0]);
    assert!(solver.params().iter().all(|p| p.is_finite()));
    assert_eq!(solver.iteration(), 0);
    assert_eq!(solver.cost(), initial_cost);

    let report = solver.run(500);
    assert_eq!(
        report.termination,
        Termination::Failed(FitError::SingularSystem { iteration: 0 })
    );
    assert_eq!(report.iterations, 0);
}

#[test]
fn test_model_failure_stops_the_fit() {
    // One evaluation at construction, two per accepted iteration
    let model = FailingLine::new(3);
    let mut solver = Solver::new(array![0.0, 0.0], reference_line(), &model).unwrap();

    assert_eq!(solver.iterate().unwrap(), SolverStatus::Continuing);
    let accepted = solver.params().clone();

    let err = solver.iterate().unwrap_err();
    assert!(matches!(err, FitError::ModelEvaluation(_)));
    assert_eq!(solver.status(), SolverStatus::Failed);
    assert_eq!(solver.iteration(), 1);
    assert_eq!(solver.params(), &accepted);

    // No retries once failed
    let calls = model.calls.get();
    assert_eq!(
        solver.iterate(),
        Err(FitError::Terminated(SolverStatus::Failed))
    );
    assert_eq!(model.calls.get(), calls);
}

#[test]
fn test_model_failure_at_construction() {
    let data = Observations::new(array![0.0, 1.0, 2.0], array![1.0, 0.5, 0.25]).unwrap();
    let err = Solver::new(array![1.0, 0.0, 0.0], data, ExponentialModel::new()).unwrap_err();
    assert!(matches!(err, FitError::ModelEvaluation(_)));
}

#[test]
fn test_non_finite_residuals_are_rejected() {
    let data = Observations::new(array![1.0, f64::NAN, 3.0], array![1.0, 2.0, 3.0]).unwrap();
    let err = Solver::new(array![0.0, 0.0], data, PolynomialModel::linear()).unwrap_err();
    assert!(matches!(err, FitError::ModelEvaluation(_)));
}

#[test]
fn test_run_reports_model_failure() {
    let mut solver =
        Solver::new(array![0.0, 0.0], reference_line(), FailingLine::new(3)).unwrap();
    let report = solver.run(500);

    assert!(matches!(
        report.termination,
        Termination::Failed(FitError::ModelEvaluation(_))
    ));
    assert_eq!(report.iterations, 1);
    assert_eq!(report.params.len(), 2);
}

#[test]
fn test_collinear_parameters_are_damped() {
    let data = Observations::from_fn(linspace(1.0, 5.0, 5), |x| 4.0 * x);
    let mut solver = Solver::new(array![0.0, 0.0], data, SplitSlope).unwrap();
    let report = solver.solve();

    assert!(report.is_converged(), "{}", report);
    assert!((report.params[0] + report.params[1] - 4.0).abs() < 1e-4);
}
