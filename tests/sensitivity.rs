#![allow(non_snake_case)]

use denseqp::{algebra::*, solver::*};

fn projection_qp() -> DenseQp<f64> {
    // projection of (1,2) onto v0 + v1 <= 2
    let H = Matrix::from(&[
        [2., 0.], //
        [0., 2.], //
    ]);
    DenseQp::new(H, vec![-2., -4.])
        .unwrap()
        .with_general_constraints(Matrix::from(&[[1., 1.]]), vec![-1e30], vec![2.])
        .unwrap()
}

#[test]
fn test_sensitivity_active_constraint() {
    let qp = projection_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();
    assert_eq!(status, SolverStatus::Converged);

    // relaxing the active side moves the solution along (1,1)
    let mut pert = DenseQpPerturbation::new(qp.dims());
    pert.dug[0] = 1.;
    let mut dsol = DefaultSolution::new(qp.dims());
    solver.sensitivity(&qp, &pert, &mut dsol).unwrap();

    assert!(dsol.v.norm_inf_diff(&[0.5, 0.5]) <= 1e-5);
    assert!(f64::abs(dsol.lam_ug[0] + 1.) <= 1e-4);
    assert_eq!(dsol.lam_lg[0], 0.);
}

#[test]
fn test_sensitivity_linear_cost() {
    let qp = projection_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    solver.solve(&qp, &mut solution).unwrap();

    // a cost change along the constraint moves the solution along it
    let mut pert = DenseQpPerturbation::new(qp.dims());
    pert.dg = vec![1., -1.];
    let mut dsol = DefaultSolution::new(qp.dims());
    solver.sensitivity(&qp, &pert, &mut dsol).unwrap();

    assert!(dsol.v.norm_inf_diff(&[-0.5, 0.5]) <= 1e-5);
}

#[test]
fn test_sensitivity_without_factorization() {
    let qp = projection_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();

    let pert = DenseQpPerturbation::new(qp.dims());
    let mut dsol = DefaultSolution::new(qp.dims());
    let result = solver.sensitivity(&qp, &pert, &mut dsol);

    assert_eq!(result, Err(SolverError::NoFactorization));
}

#[test]
fn test_sensitivity_bad_perturbation() {
    let qp = projection_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    solver.solve(&qp, &mut solution).unwrap();

    let mut pert = DenseQpPerturbation::new(qp.dims());
    pert.dug = vec![1., 1.];
    let mut dsol = DefaultSolution::new(qp.dims());
    let result = solver.sensitivity(&qp, &pert, &mut dsol);

    assert!(matches!(result, Err(SolverError::BadData(_))));
}
