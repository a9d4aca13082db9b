#![allow(non_snake_case)]

use super::schur::*;
use super::*;

/// KKT solver for problems without active inequalities.  The condensed
/// Hessian is then just the regularized objective Hessian, and a single
/// factorization solves the whole problem.
pub(crate) struct UnconstrainedKKTSolver<T> {
    schur: SchurComplementSolver<T>,
    kind: KKTFactorization,
}

impl<T> UnconstrainedKKTSolver<T>
where
    T: FloatT,
{
    pub(crate) fn new(nx: usize, ne: usize) -> Self {
        // a Schur complement built from more equalities than variables
        // is singular without regularization, so use its LQ form
        let (method, kind) = if ne > nx {
            (SchurMethod::LQ, KKTFactorization::LQ)
        } else {
            (SchurMethod::Cholesky, KKTFactorization::Cholesky)
        };
        Self {
            schur: SchurComplementSolver::new(method, nx, ne),
            kind,
        }
    }
}

impl<T> KKTSolver<T> for UnconstrainedKKTSolver<T>
where
    T: FloatT,
{
    fn factor(
        &mut self,
        M: &Matrix<T>,
        A: &Matrix<T>,
        δ: T,
    ) -> Result<KKTFactorization, DenseFactorizationError> {
        self.schur.factor(M, A, δ)?;
        Ok(self.kind)
    }

    fn solve(&mut self, x: &mut [T], y: &mut [T]) {
        self.schur.solve(x, y);
    }
}

#[test]
fn test_unconstrained_kktsolver() {
    use super::test_utils::*;
    let mut engine = KKTSolverEngine::<f64>::new(KKTStrategy::Unconstrained, 3, 1);
    check_engine(&mut engine, KKTFactorization::Cholesky);
}
