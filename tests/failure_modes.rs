#![allow(non_snake_case)]

use denseqp::{algebra::*, solver::*};

fn scalar_qp(h: f64, lb: f64, ub: f64) -> DenseQp<f64> {
    DenseQp::new(Matrix::from(&[[h]]), vec![0.])
        .unwrap()
        .with_bounds(vec![0], vec![lb], vec![ub])
        .unwrap()
}

fn assert_finite(solution: &DefaultSolution<f64>) {
    for v in [
        &solution.v,
        &solution.lam_lb,
        &solution.lam_ub,
        &solution.t_lb,
        &solution.t_ub,
    ] {
        assert!(v.iter().all(|x| x.is_finite()), "{solution:?}");
    }
}

#[test]
fn test_nonconvex_numerical_failure() {
    // maximize v^2 without constraints
    let qp = DenseQp::new(Matrix::from(&[[-1.]]), vec![0.]).unwrap();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    // the indefinite Hessian cannot be factored, and the starting
    // iterate is handed back
    assert_eq!(status, SolverStatus::NumericalFailure);
    assert_eq!(solution.status, SolverStatus::NumericalFailure);
    assert_finite(&solution);
}

#[test]
fn test_crossed_bounds_stall() {
    // 1 <= v <= 0 has no solution
    let qp = scalar_qp(2., 1., 0.);
    let settings = DefaultSettings::default();
    let max_iter = settings.max_iter;
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::Stalled);
    assert!(solution.iterations < max_iter);
    assert_finite(&solution);
    assert!(solution.t_lb[0] > 0. && solution.t_ub[0] > 0.);
}
