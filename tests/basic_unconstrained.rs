#![allow(non_snake_case)]

use denseqp::{algebra::*, solver::*};

#[test]
fn test_unconstrained_feasible() {
    let g = vec![1., 2., -3.];
    let qp = DenseQp::new(Matrix::identity(3), g.clone()).unwrap();

    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::Converged);
    assert_eq!(solution.iterations, 1);
    assert!(solution.v.norm_inf_diff(&[-1., -2., 3.]) <= 1e-12);
    assert_eq!(solution.res_comp, 0.);
}

#[test]
fn test_unconstrained_with_equalities() {
    // minimize |v|^2/2 subject to v0 + v1 = 2
    let qp = DenseQp::new(Matrix::identity(2), vec![0., 0.])
        .unwrap()
        .with_equalities(Matrix::from(&[[1., 1.]]), vec![2.])
        .unwrap();

    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::Converged);
    assert_eq!(solution.iterations, 1);
    assert!(solution.v.norm_inf_diff(&[1., 1.]) <= 1e-10);
    assert!(f64::abs(solution.pi[0] - 1.) <= 1e-10);
}

#[test]
fn test_unconstrained_absent_bounds() {
    // bounds that are all infinite leave nothing to iterate on
    let qp = DenseQp::new(Matrix::identity(2), vec![1., -1.])
        .unwrap()
        .with_bounds(vec![0, 1], vec![-1e30, -1e30], vec![1e30, f64::INFINITY])
        .unwrap();
    assert_eq!(qp.num_active(), 0);

    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::Converged);
    assert_eq!(solution.iterations, 1);
    assert!(solution.v.norm_inf_diff(&[-1., 1.]) <= 1e-12);
    assert_eq!(solution.lam_lb, vec![0., 0.]);
}

#[test]
fn test_infeasible_equalities() {
    // v = 1 and v = 2
    let A = Matrix::from(&[
        [1.], //
        [1.], //
    ]);
    let qp = DenseQp::new(Matrix::from(&[[1.]]), vec![0.])
        .unwrap()
        .with_equalities(A, vec![1., 2.])
        .unwrap();

    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert!(matches!(
        status,
        SolverStatus::Stalled | SolverStatus::NumericalFailure
    ));

    // the same with an inequality, so that the full iteration runs.
    // Steps stay long while the equality residual cannot shrink, so
    // the iteration cap ends the solve.
    let qp = qp.with_bounds(vec![0], vec![-10.], vec![10.]).unwrap();
    let settings = DefaultSettings {
        max_iter: 50,
        ..DefaultSettings::default()
    };
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::MaxIterations);
    assert_eq!(solution.iterations, 50);
    assert!(solution.res_eq > 0.1);
}
