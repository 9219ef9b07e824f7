//! Fit `f(x) = a*x + b` to noiseless samples of `y = 5x + 3` at `x = 1..10`,
//! printing the state after every step.
//!
//! Run with `cargo run --example linear_fit`.

use lmfit_core::models::PolynomialModel;
use lmfit_core::observations::linspace;
use lmfit_core::{Model, Observations, Result, Solver, SolverStatus};

fn main() -> Result<()> {
    let data = Observations::from_fn(linspace(1.0, 10.0, 10), |x| 5.0 * x + 3.0);
    let model = PolynomialModel::linear();

    // params = [b, a]
    let mut solver = Solver::new(vec![0.0, 0.0], data, &model)?;

    while solver.status() == SolverStatus::Continuing && solver.iteration() < 500 {
        let status = match solver.iterate() {
            Ok(status) => status,
            Err(err) => {
                println!("fit failed: {}", err);
                break;
            }
        };

        println!(
            "iteration {:3}  status {:?}  cost {:.6e}  params {}",
            solver.iteration(),
            status,
            solver.cost(),
            solver.params()
        );
        let residuals = model.residuals(solver.params(), solver.observations())?;
        for r in residuals.iter() {
            println!("    {:+.6e}", r);
        }
    }

    let params = solver.params();
    println!("results");
    println!("a = {}", params[1]);
    println!("b = {}", params[0]);
    Ok(())
}
