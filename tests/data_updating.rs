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

fn solve(solver: &mut DefaultSolver<f64>, qp: &DenseQp<f64>) -> DefaultSolution<f64> {
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(qp, &mut solution).unwrap();
    assert_eq!(status, SolverStatus::Converged);
    solution
}

#[test]
fn test_update_general_bounds() {
    let mut qp = projection_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();

    let solution = solve(&mut solver, &qp);
    assert!(solution.v.norm_inf_diff(&[0.5, 1.5]) <= 1e-6);

    // the constraint becomes inactive
    qp.update_general_bounds(&[-1e30], &[4.]).unwrap();
    let solution = solve(&mut solver, &qp);
    assert!(solution.v.norm_inf_diff(&[1., 2.]) <= 1e-6);
    assert!(solution.lam_ug[0] <= 1e-6);

    // switching the lower side on
    qp.update_general_bounds(&[3.5], &[4.]).unwrap();
    let solution = solve(&mut solver, &qp);
    assert!(solution.v.norm_inf_diff(&[1.25, 2.25]) <= 1e-6);
}

#[test]
fn test_update_g() {
    let mut qp = projection_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();

    // projection of (0,0) is interior
    qp.update_g(&[0., 0.]).unwrap();
    let solution = solve(&mut solver, &qp);
    assert!(solution.v.norm_inf_diff(&[0., 0.]) <= 1e-6);

    assert!(qp.update_g(&[0.]).is_err());
}

#[test]
fn test_update_H() {
    let mut qp = projection_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();

    // minimize 2 v0^2 + v1^2 - 2 v0 - 4 v1 subject to v0 + v1 <= 2
    let H = Matrix::from(&[
        [4., 0.], //
        [0., 2.], //
    ]);
    qp.update_H(&H).unwrap();
    let solution = solve(&mut solver, &qp);
    assert!(solution.v.norm_inf_diff(&[1. / 3., 5. / 3.]) <= 1e-6);
    assert!(f64::abs(solution.lam_ug[0] - 2. / 3.) <= 1e-6);
}

#[test]
fn test_update_A_and_b() {
    // minimize |v|^2 subject to a'v = b
    let mut qp = DenseQp::new(Matrix::identity(2), vec![0., 0.])
        .unwrap()
        .with_equalities(Matrix::from(&[[1., 1.]]), vec![2.])
        .unwrap();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();

    let solution = solve(&mut solver, &qp);
    assert!(solution.v.norm_inf_diff(&[1., 1.]) <= 1e-6);

    qp.update_b(&[4.]).unwrap();
    let solution = solve(&mut solver, &qp);
    assert!(solution.v.norm_inf_diff(&[2., 2.]) <= 1e-6);

    qp.update_A(&Matrix::from(&[[1., 2.]])).unwrap();
    qp.update_b(&[2.]).unwrap();
    let solution = solve(&mut solver, &qp);
    assert!(solution.v.norm_inf_diff(&[0.4, 0.8]) <= 1e-6);

    assert!(qp.update_A(&Matrix::identity(2)).is_err());
    assert!(qp.update_b(&[1., 2.]).is_err());
}

#[test]
fn test_update_C() {
    let mut qp = projection_qp();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();

    // projection of (1,2) onto v0 + 2 v1 <= 2
    qp.update_C(&Matrix::from(&[[1., 2.]])).unwrap();
    let solution = solve(&mut solver, &qp);
    assert!(solution.v.norm_inf_diff(&[0.4, 0.8]) <= 1e-6);
    assert!(f64::abs(solution.lam_ug[0] - 1.2) <= 1e-6);

    assert!(qp.update_C(&Matrix::from(&[[1.]])).is_err());
}

#[test]
fn test_update_soft_bounds() {
    // minimize v^2 - 4v + su^2 subject to v - su <= 1, su >= us
    let mut soft = SoftConstraints::new(vec![0]);
    soft.Zu = vec![2.];
    let mut qp = DenseQp::new(Matrix::from(&[[2.]]), vec![-4.])
        .unwrap()
        .with_bounds(vec![0], vec![-1e30], vec![1.])
        .unwrap()
        .with_soft_constraints(soft)
        .unwrap();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();

    let solution = solve(&mut solver, &qp);
    assert!(f64::abs(solution.su[0] - 0.5) <= 1e-6);

    // raising the slack floor past the penalized optimum
    qp.update_soft_bounds(&[0.], &[0.8]).unwrap();
    let solution = solve(&mut solver, &qp);
    assert!(f64::abs(solution.v[0] - 1.8) <= 1e-6);
    assert!(f64::abs(solution.su[0] - 0.8) <= 1e-6);

    assert!(qp.update_soft_bounds(&[0.], &[]).is_err());
}
