use denseqp::{algebra::*, solver::*};

fn bounded_qp() -> DenseQp<f64> {
    DenseQp::new(Matrix::identity(1), vec![-1.])
        .unwrap()
        .with_bounds(vec![0], vec![-1e12], vec![2.])
        .unwrap()
}

// the infinity threshold is process wide, so it is exercised
// from a single test
#[test]
fn test_infinity_threshold() {
    set_infinity(1e10);
    assert_eq!(get_infinity(), 1e10);
    let qp = bounded_qp();
    assert_eq!(qp.num_active(), 1);

    default_infinity();
    assert_eq!(get_infinity(), 1e20);
    assert_eq!(bounded_qp().num_active(), 2);

    // the mask is fixed when the problem is built
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();
    assert_eq!(status, SolverStatus::Converged);
    assert!(f64::abs(solution.v[0] - 1.) <= 1e-6);
    assert_eq!(solution.lam_lb[0], 0.);
}
