#![allow(non_snake_case)]

use super::cholesky::SchurWithFallback;
use super::schur::*;
use super::*;

/// KKT solver using a Cholesky factor of the condensed Hessian and an
/// LQ factor of the regularized equality block, falling back to LU on
/// failure.  The Schur complement is never formed, which keeps this
/// strategy stable when there are more equalities than variables.
pub(crate) struct LQKKTSolver<T> {
    inner: SchurWithFallback<T>,
}

impl<T> LQKKTSolver<T>
where
    T: FloatT,
{
    pub(crate) fn new(nx: usize, ne: usize) -> Self {
        Self {
            inner: SchurWithFallback::new(SchurMethod::LQ, nx, ne),
        }
    }
}

impl<T> KKTSolver<T> for LQKKTSolver<T>
where
    T: FloatT,
{
    fn factor(
        &mut self,
        M: &Matrix<T>,
        A: &Matrix<T>,
        δ: T,
    ) -> Result<KKTFactorization, DenseFactorizationError> {
        self.inner.factor(M, A, δ)
    }

    fn solve(&mut self, x: &mut [T], y: &mut [T]) {
        self.inner.solve(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::*;
    use super::*;

    #[test]
    fn test_lq_kktsolver() {
        let mut engine = KKTSolverEngine::<f64>::new(KKTStrategy::LQ, 3, 1);
        check_engine(&mut engine, KKTFactorization::LQ);
    }

    #[test]
    fn test_lq_kktsolver_wide() {
        // more equalities than variables, consistent right hand side
        let M = Matrix::from(&[[2.0]]);
        #[rustfmt::skip]
        let A = Matrix::from(&[
            [1.],
            [1.],
        ]);
        let δ = 1e-10;
        let mut engine = LQKKTSolver::<f64>::new(1, 2);
        assert_eq!(engine.factor(&M, &A, δ), Ok(KKTFactorization::LQ));

        let r1 = vec![0.];
        let r2 = vec![1., 1.];
        let mut x = r1.clone();
        let mut y = r2.clone();
        engine.solve(&mut x, &mut y);
        assert!(kkt_residual(&M, &A, δ, &x, &y, &r1, &r2) < 1e-6);
        assert!((x[0] - 1.).abs() < 1e-6);
    }
}
