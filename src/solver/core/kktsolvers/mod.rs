//! Dense solvers for the reduced KKT system
//!
//! Every engine solves systems of the form
//!
//! ```text
//! [ M   A' ] [x]   [r1]
//! [ A  -δI ] [y] = [r2]
//! ```
//!
//! where `M` is the condensed Hessian with the inequality barrier terms
//! added, `A` is the equality constraint matrix and `δ > 0` is a small
//! dual regularization.

#![allow(non_snake_case)]

use crate::algebra::*;
use enum_dispatch::*;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod cholesky;
mod lq;
mod lu;
mod schur;
mod unconstrained;

pub(crate) use cholesky::*;
pub(crate) use lq::*;
pub(crate) use lu::*;
pub(crate) use unconstrained::*;

/// Factorization that produced a KKT solve
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KKTFactorization {
    /// Cholesky factors of the condensed Hessian and of the Schur complement
    Cholesky,
    /// Cholesky factor of the condensed Hessian and LQ factor of the
    /// regularized equality block
    LQ,
    /// LU factors of the full reduced KKT matrix
    LU,
}

impl std::fmt::Display for KKTFactorization {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            KKTFactorization::Cholesky => "chol",
            KKTFactorization::LQ => "lq",
            KKTFactorization::LU => "lu",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Error type returned by KKT system updates and solves
pub enum KKTSolverError {
    /// A dense factorization failed
    #[error("KKT factorization failed: {0}")]
    Factorization(#[from] DenseFactorizationError),
    /// A solve produced Infs or NaNs
    #[error("KKT solve produced a non-finite direction")]
    NonFinite,
    /// A solve was requested before any successful factorization
    #[error("KKT system has not been factored")]
    NoFactorization,
}

#[enum_dispatch]
pub(crate) trait KKTSolver<T>
where
    T: FloatT,
{
    /// Factor the reduced KKT matrix.  `M` must be stored in full.
    fn factor(
        &mut self,
        M: &Matrix<T>,
        A: &Matrix<T>,
        δ: T,
    ) -> Result<KKTFactorization, DenseFactorizationError>;

    /// Solve in place.  On entry `x` and `y` hold `r1` and `r2`.
    fn solve(&mut self, x: &mut [T], y: &mut [T]);
}

#[enum_dispatch(KKTSolver<T>)]
pub(crate) enum KKTSolverEngine<T>
where
    T: FloatT,
{
    UnconstrainedKKTSolver(UnconstrainedKKTSolver<T>),
    CholeskyKKTSolver(CholeskyKKTSolver<T>),
    LQKKTSolver(LQKKTSolver<T>),
    LUKKTSolver(LUKKTSolver<T>),
}

/// Factorization strategies selectable by the user, plus the
/// Newton-only strategy for problems without inequalities
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
pub(crate) enum KKTStrategy {
    Unconstrained,
    Cholesky,
    LQ,
    LU,
}

impl<T> KKTSolverEngine<T>
where
    T: FloatT,
{
    pub(crate) fn new(strategy: KKTStrategy, nx: usize, ne: usize) -> Self {
        match strategy {
            KKTStrategy::Unconstrained => UnconstrainedKKTSolver::new(nx, ne).into(),
            KKTStrategy::Cholesky => CholeskyKKTSolver::new(nx, ne).into(),
            KKTStrategy::LQ => LQKKTSolver::new(nx, ne).into(),
            KKTStrategy::LU => LUKKTSolver::new(nx, ne).into(),
        }
    }

    pub(crate) fn strategy(&self) -> KKTStrategy {
        match self {
            KKTSolverEngine::UnconstrainedKKTSolver(_) => KKTStrategy::Unconstrained,
            KKTSolverEngine::CholeskyKKTSolver(_) => KKTStrategy::Cholesky,
            KKTSolverEngine::LQKKTSolver(_) => KKTStrategy::LQ,
            KKTSolverEngine::LUKKTSolver(_) => KKTStrategy::LU,
        }
    }
}

// ---------------------------------------------------------------------
// shared test problem and checks for the engines

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    // M positive definite, A full row rank
    pub(crate) fn test_kkt() -> (Matrix<f64>, Matrix<f64>) {
        #[rustfmt::skip]
        let M = Matrix::from(&[
            [ 4., 1., 0.],
            [ 1., 3., 1.],
            [ 0., 1., 2.],
        ]);
        #[rustfmt::skip]
        let A = Matrix::from(&[
            [ 1., 1., 1.],
        ]);
        (M, A)
    }

    // the residual of the full reduced system
    pub(crate) fn kkt_residual(
        M: &Matrix<f64>,
        A: &Matrix<f64>,
        δ: f64,
        x: &[f64],
        y: &[f64],
        r1: &[f64],
        r2: &[f64],
    ) -> f64 {
        let mut e1 = r1.to_vec();
        M.gemv(&mut e1, x, -1., 1.);
        A.t().gemv(&mut e1, y, -1., 1.);
        let mut e2 = r2.to_vec();
        A.gemv(&mut e2, x, -1., 1.);
        e2.axpby(δ, y, 1.);
        f64::max(e1.norm_inf(), e2.norm_inf())
    }

    pub(crate) fn check_engine(engine: &mut KKTSolverEngine<f64>, expected: KKTFactorization) {
        let (M, A) = test_kkt();
        let δ = 1e-10;
        assert_eq!(engine.factor(&M, &A, δ), Ok(expected));

        let r1 = vec![1., -2., 3.];
        let r2 = vec![0.5];
        let mut x = r1.clone();
        let mut y = r2.clone();
        engine.solve(&mut x, &mut y);
        assert!(kkt_residual(&M, &A, δ, &x, &y, &r1, &r2) < 1e-10);
    }
}
