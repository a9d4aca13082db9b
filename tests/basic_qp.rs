#![allow(non_snake_case)]

use denseqp::{algebra::*, solver::*};

fn basic_qp_data() -> DenseQp<f64> {
    // H = [4. 1;1 2]
    let H = Matrix::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);
    let g = vec![1., 1.];

    // x0 + x1 = 1, 0 <= x <= 0.7
    let A = Matrix::from(&[[1., 1.]]);
    let b = vec![1.];

    DenseQp::new(H, g)
        .unwrap()
        .with_equalities(A, b)
        .unwrap()
        .with_bounds(vec![0, 1], vec![0., 0.], vec![0.7, 0.7])
        .unwrap()
}

fn solve_with(qp: &DenseQp<f64>, settings: DefaultSettings<f64>) -> DefaultSolution<f64> {
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    solver.solve(qp, &mut solution).unwrap();
    solution
}

#[test]
fn test_qp_univariate() {
    // minimize v^2 subject to 0 <= v <= 10
    let qp = DenseQp::new(Matrix::from(&[[2.]]), vec![0.])
        .unwrap()
        .with_bounds(vec![0], vec![0.], vec![10.])
        .unwrap();

    let solution = solve_with(&qp, DefaultSettings::default());

    assert_eq!(solution.status, SolverStatus::Converged);
    assert!(solution.v[0].abs() <= 1e-3);
    assert!(solution.res_stat <= 1e-8);
    assert!(solution.res_comp <= 1e-8);
}

#[test]
fn test_qp_feasible() {
    let qp = basic_qp_data();
    let solution = solve_with(&qp, DefaultSettings::default());

    assert_eq!(solution.status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[0.3, 0.7]) <= 1e-6);
    assert!(f64::abs(solution.objective - 1.88) <= 1e-6);

    // the upper bound of x1 is the active one
    assert!(f64::abs(solution.lam_ub[1] - 0.2) <= 1e-6);
    assert!(solution.lam_lb[0] <= 1e-6);
    assert!(f64::abs(solution.pi[0] - 2.9) <= 1e-6);
}

#[test]
fn test_qp_residuals_at_convergence() {
    let qp = basic_qp_data();
    let settings = DefaultSettings::default();
    let solution = solve_with(&qp, settings.clone());

    assert_eq!(solution.status, SolverStatus::Converged);
    assert!(solution.res_stat <= settings.tol_stat);
    assert!(solution.res_eq <= settings.tol_eq);
    assert!(solution.res_ineq <= settings.tol_ineq);
    assert!(solution.res_comp <= settings.tol_comp);

    // every complementarity pair is small
    for (lam, t) in [
        (&solution.lam_lb, &solution.t_lb),
        (&solution.lam_ub, &solution.t_ub),
    ] {
        for (l, s) in lam.iter().zip(t) {
            assert!(l * s <= settings.tol_comp);
        }
    }
}

#[test]
fn test_qp_general_constraint() {
    // projection of (1,2) onto v0 + v1 <= 2
    let H = Matrix::from(&[
        [2., 0.], //
        [0., 2.], //
    ]);
    let qp = DenseQp::new(H, vec![-2., -4.])
        .unwrap()
        .with_general_constraints(Matrix::from(&[[1., 1.]]), vec![-1e30], vec![2.])
        .unwrap();

    let solution = solve_with(&qp, DefaultSettings::default());

    assert_eq!(solution.status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[0.5, 1.5]) <= 1e-6);
    assert!(f64::abs(solution.lam_ug[0] - 1.) <= 1e-6);

    // the absent lower side carries nothing
    assert_eq!(solution.lam_lg[0], 0.);
    assert_eq!(solution.t_lg[0], 0.);
}

#[test]
fn test_qp_kkt_methods() {
    let qp = basic_qp_data();

    for (method, expected) in [
        ("auto", KKTFactorization::Cholesky),
        ("cholesky", KKTFactorization::Cholesky),
        ("lq", KKTFactorization::LQ),
        ("lu", KKTFactorization::LU),
    ] {
        let settings = DefaultSettingsBuilder::default()
            .kkt_solve_method(method.to_string())
            .build()
            .unwrap();
        let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
        let mut solution = DefaultSolution::new(qp.dims());
        let status = solver.solve(&qp, &mut solution).unwrap();

        assert_eq!(status, SolverStatus::Converged, "method {method}");
        assert!(solution.v.norm_inf_diff(&[0.3, 0.7]) <= 1e-6);

        let stats = solver.info().statistics();
        assert_eq!(stats[0].factorization, None);
        assert!(stats[1..].iter().all(|r| r.factorization == Some(expected)));
    }
}

#[test]
fn test_qp_redundant_equalities() {
    // more equalities than unknowns, consistent but rank deficient
    let A = Matrix::from(&[
        [1., 1.],  //
        [1., -1.], //
        [2., 0.],  //
    ]);
    let qp = DenseQp::new(Matrix::identity(2), vec![0., 0.])
        .unwrap()
        .with_equalities(A, vec![1., 0., 1.])
        .unwrap()
        .with_bounds(vec![0, 1], vec![0., 0.], vec![1., 1.])
        .unwrap();

    let settings = DefaultSettings {
        reg_dual: 1e-8,
        ..DefaultSettings::default()
    };
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[0.5, 0.5]) <= 1e-6);
    let last = solver.info().statistics().last().unwrap();
    assert_eq!(last.factorization, Some(KKTFactorization::LQ));
}

#[test]
fn test_qp_max_iterations() {
    let qp = basic_qp_data();
    let settings = DefaultSettings {
        max_iter: 2,
        ..DefaultSettings::default()
    };
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::MaxIterations);
    assert_eq!(solution.iterations, 2);
    assert_eq!(solver.info().statistics().len(), 3);
}

#[test]
fn test_qp_max_iterations_without_exit_residuals() {
    // the last step is counted even though its iterate is not evaluated
    let qp = basic_qp_data();
    let settings = DefaultSettings {
        max_iter: 2,
        compute_residuals_exit: false,
        ..DefaultSettings::default()
    };
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::MaxIterations);
    assert_eq!(solution.iterations, 2);
    assert_eq!(solver.info().iterations(), 2);

    let stats = solver.info().statistics();
    assert_eq!(stats.len(), 3);
    assert_eq!(stats[2].iteration, 2);
    assert_eq!(stats[2].res_stat, stats[1].res_stat);
}

#[test]
fn test_qp_no_predictor_corrector() {
    let qp = basic_qp_data();
    let settings = DefaultSettings {
        pred_corr: false,
        max_iter: 200,
        ..DefaultSettings::default()
    };
    let solution = solve_with(&qp, settings);

    assert_eq!(solution.status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[0.3, 0.7]) <= 1e-6);
}

#[test]
fn test_qp_split_step() {
    let qp = basic_qp_data();
    let settings = DefaultSettings {
        split_step: true,
        ..DefaultSettings::default()
    };
    let solution = solve_with(&qp, settings);

    assert_eq!(solution.status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[0.3, 0.7]) <= 1e-6);
}

#[test]
fn test_qp_mu_decreasing() {
    let qp = basic_qp_data();
    let settings = DefaultSettings {
        cond_pred_corr: false,
        ..DefaultSettings::default()
    };
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    solver.solve(&qp, &mut solution).unwrap();

    let mu: Vec<f64> = solver.info().statistics().iter().map(|r| r.mu).collect();
    for k in 1..mu.len() {
        assert!(mu[k] <= mu[k - 1] * 1.01 + 1e-10, "mu rose at {k}: {mu:?}");
    }
}

#[test]
fn test_qp_deterministic() {
    let qp = basic_qp_data();
    let mut solver = DefaultSolver::new(qp.dims(), DefaultSettings::default()).unwrap();

    let mut first = DefaultSolution::new(qp.dims());
    solver.solve(&qp, &mut first).unwrap();
    let mut second = DefaultSolution::new(qp.dims());
    solver.solve(&qp, &mut second).unwrap();

    assert_eq!(first.v, second.v);
    assert_eq!(first.lam_ub, second.lam_ub);
    assert_eq!(first.iterations, second.iterations);
}

#[test]
fn test_qp_f32() {
    let H = Matrix::<f32>::from(&[
        [4., 1.], //
        [1., 2.], //
    ]);
    let qp = DenseQp::new(H, vec![1., 1.])
        .unwrap()
        .with_equalities(Matrix::from(&[[1., 1.]]), vec![1.])
        .unwrap()
        .with_bounds(vec![0, 1], vec![0., 0.], vec![0.7, 0.7])
        .unwrap();

    let settings = DefaultSettings::<f32> {
        tol_stat: 1e-4,
        tol_eq: 1e-4,
        tol_ineq: 1e-4,
        tol_comp: 1e-4,
        ..DefaultSettings::default()
    };
    let mut solver = DefaultSolver::new(qp.dims(), settings).unwrap();
    let mut solution = DefaultSolution::new(qp.dims());
    let status = solver.solve(&qp, &mut solution).unwrap();

    assert_eq!(status, SolverStatus::Converged);
    assert!(solution.v.norm_inf_diff(&[0.3, 0.7]) <= 1e-3);
}
