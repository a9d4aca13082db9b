#![allow(non_snake_case)]

use denseqp::{algebra::*, solver::*};

fn box_qp() -> DenseQp<f64> {
    // minimize |v - (2, -1.5, 0.5)|^2 over the box [-1, 1]^3, with
    // the first two bounds strictly active
    DenseQp::new(Matrix::identity(3), vec![-2., 1.5, -0.5])
        .unwrap()
        .with_bounds(vec![0, 1, 2], vec![-1.; 3], vec![1.; 3])
        .unwrap()
}

#[test]
fn test_warm_start_from_solution() {
    let qp = box_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());

    let status = solver.solve(&qp, &mut solution).unwrap();
    assert_eq!(status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[1., -1., 0.5]) <= 1e-6);

    // resolve after a small change of the linear term
    let mut qp = qp;
    qp.update_g(&[-2., 1.5, -0.4]).unwrap();

    let settings = DefaultSettings {
        warm_start: true,
        ..DefaultSettings::default()
    };
    solver.update_settings(settings).unwrap();
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[1., -1., 0.4]) <= 1e-6);
}

#[test]
fn test_warm_start_from_zero() {
    // a zero solution record is repaired into a usable start
    let qp = box_qp();
    let settings = DefaultSettings {
        warm_start: true,
        ..DefaultSettings::default()
    };
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());

    let status = solver.solve(&qp, &mut solution).unwrap();
    assert_eq!(status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[1., -1., 0.5]) <= 1e-6);
}

#[test]
fn test_predict_bounded_iterations() {
    let qp = box_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());

    let status = solver.predict(&qp, &mut solution, 2).unwrap();
    assert_eq!(status, SolverStatus::MaxIterations);
    assert_eq!(solution.iterations, 2);

    // slacks and multipliers stay strictly positive
    for (lam, t) in [
        (&solution.lam_lb, &solution.t_lb),
        (&solution.lam_ub, &solution.t_ub),
    ] {
        assert!(lam.iter().all(|&l| l > 0.));
        assert!(t.iter().all(|&s| s > 0.));
    }

    // a longer prediction continues from the returned iterate
    let status = solver.predict(&qp, &mut solution, 50).unwrap();
    assert_eq!(status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[1., -1., 0.5]) <= 1e-6);
}

#[test]
fn test_predict_residuals_on_exit() {
    let qp = box_qp();
    let settings = DefaultSettings {
        compute_residuals_predict: true,
        ..DefaultSettings::default()
    };
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());

    let status = solver.predict(&qp, &mut solution, 1).unwrap();
    assert_eq!(status, SolverStatus::MaxIterations);
    assert_eq!(solution.iterations, 1);
    assert!(solution.res_stat.is_finite());
    assert_eq!(solver.info().statistics().len(), 2);
}

#[test]
fn test_iterates_stay_interior() {
    let qp = box_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());

    for n_iter in 1..6 {
        let mut sol = DefaultSolution::new(qp.dims());
        solver.predict(&qp, &mut sol, n_iter).unwrap();
        assert!(sol.t_lb.iter().chain(&sol.t_ub).all(|&s| s > 0.));
        assert!(sol.lam_lb.iter().chain(&sol.lam_ub).all(|&l| l > 0.));
    }

    solver.solve(&qp, &mut solution).unwrap();
    assert!(solution.t_lb.iter().chain(&solution.t_ub).all(|&s| s > 0.));
    assert!(solution.lam_lb.iter().chain(&solution.lam_ub).all(|&l| l > 0.));
}
