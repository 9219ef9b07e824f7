//! Nonlinear models and noisy data.

use approx::assert_relative_eq;
use lmfit_core::models::{ExponentialModel, PolynomialModel};
use lmfit_core::observations::linspace;
use lmfit_core::{Model, Observations, Solver, SolverStatus};
use ndarray::{array, Array1};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn test_exponential_decay_without_noise() {
    // f(x) = 2.5 * exp(-x / 1.5) + 0.5
    let data = Observations::from_fn(linspace(0.0, 8.0, 40), |x| 2.5 * (-x / 1.5).exp() + 0.5);
    let mut solver = Solver::new(array![1.0, 1.0, 0.0], data, ExponentialModel::new()).unwrap();
    let report = solver.solve();

    assert!(report.is_converged(), "{}", report);
    assert_relative_eq!(report.params[0], 2.5, epsilon = 1e-3);
    assert_relative_eq!(report.params[1], 1.5, epsilon = 1e-3);
    assert_relative_eq!(report.params[2], 0.5, epsilon = 1e-3);
}

#[test]
fn test_exponential_from_zero_amplitude() {
    // At amplitude 0 the decay column of the Jacobian is identically zero
    let data = Observations::from_fn(linspace(0.0, 8.0, 40), |x| 2.5 * (-x / 1.5).exp() + 0.5);
    let model = ExponentialModel::new();
    let initial = array![0.0, 1.0, 0.0];
    let jacobian = model.jacobian(&initial, &data).unwrap();
    assert!(jacobian.column(1).iter().all(|&v| v == 0.0));

    let mut solver = Solver::new(initial, data, model).unwrap();

    // The first step leaves the decay untouched and moves the rest
    assert_eq!(solver.iterate().unwrap(), SolverStatus::Continuing);
    assert_eq!(solver.params()[1], 1.0);
    assert!(solver.params()[0] > 0.0);

    let report = solver.solve();
    assert!(report.is_converged(), "{}", report);
    assert_relative_eq!(report.params[0], 2.5, epsilon = 1e-3);
    assert_relative_eq!(report.params[1], 1.5, epsilon = 1e-3);
    assert_relative_eq!(report.params[2], 0.5, epsilon = 1e-3);
}

#[test]
fn test_exponential_decay_with_noise() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let x = linspace(0.0, 10.0, 60);
    let y = x.mapv(|x| 4.0 * (-x / 2.0).exp() + 1.0 + rng.gen_range(-0.02..0.02));
    let data = Observations::new(x, y).unwrap();

    let model = ExponentialModel::new();
    let initial = array![1.0, 1.0, 0.0];
    let initial_cost = model.cost(&initial, &data).unwrap();

    let mut solver = Solver::new(initial, data, model).unwrap();
    let report = solver.solve();

    assert!(report.is_converged(), "{}", report);
    assert!(report.cost < initial_cost);
    assert!((report.params[0] - 4.0).abs() < 0.1);
    assert!((report.params[1] - 2.0).abs() < 0.1);
    assert!((report.params[2] - 1.0).abs() < 0.05);
}

#[test]
fn test_noisy_line_matches_closed_form() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let x = linspace(0.0, 10.0, 50);
    let y = x.mapv(|x| 2.0 * x - 1.0 + rng.gen_range(-0.5..0.5));
    let data = Observations::new(x.clone(), y.clone()).unwrap();

    // Ordinary least squares in closed form
    let n = x.len() as f64;
    let (sx, sy) = (x.sum(), y.sum());
    let sxx = x.dot(&x);
    let sxy = x.dot(&y);
    let slope = (n * sxy - sx * sy) / (n * sxx - sx * sx);
    let intercept = (sy - slope * sx) / n;

    let mut solver = Solver::new(array![0.0, 0.0], data, PolynomialModel::linear()).unwrap();
    let report = solver.solve();

    assert!(report.is_converged());
    assert_relative_eq!(report.params[0], intercept, epsilon = 1e-4);
    assert_relative_eq!(report.params[1], slope, epsilon = 1e-4);
}

#[test]
fn test_step_by_step_driving() {
    let data = Observations::from_fn(linspace(0.0, 6.0, 25), |x| 3.0 * (-x / 0.8).exp());
    let mut solver = Solver::new(array![1.0, 2.0, 0.5], data, ExponentialModel::new()).unwrap();

    let mut history: Vec<Array1<f64>> = vec![solver.params().clone()];
    while solver.status() == SolverStatus::Continuing && solver.iteration() < 200 {
        solver.iterate().unwrap();
        history.push(solver.params().clone());
        assert_eq!(solver.params().len(), 3);
    }

    assert_eq!(solver.status(), SolverStatus::Converged);
    assert_eq!(history.len(), solver.iteration() + 1);

    // The last accepted step is the difference of the last two estimates
    let last = &history[history.len() - 1] - &history[history.len() - 2];
    let step = solver.step().unwrap();
    for (a, b) in last.iter().zip(step.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-12);
    }
}
