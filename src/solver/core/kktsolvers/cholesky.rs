#![allow(non_snake_case)]

use super::schur::*;
use super::*;

// Schur complement solve with a fallback to a full LU factorization
// when the Schur complement method breaks down.  The LU workspace is
// only allocated on first use.
pub(crate) struct SchurWithFallback<T> {
    nx: usize,
    ne: usize,
    schur: SchurComplementSolver<T>,
    kind: KKTFactorization,
    fallback: Option<LUKKTSolver<T>>,
    using_fallback: bool,
}

impl<T> SchurWithFallback<T>
where
    T: FloatT,
{
    pub(crate) fn new(method: SchurMethod, nx: usize, ne: usize) -> Self {
        let kind = match method {
            SchurMethod::Cholesky => KKTFactorization::Cholesky,
            SchurMethod::LQ => KKTFactorization::LQ,
        };
        Self {
            nx,
            ne,
            schur: SchurComplementSolver::new(method, nx, ne),
            kind,
            fallback: None,
            using_fallback: false,
        }
    }

    pub(crate) fn factor(
        &mut self,
        M: &Matrix<T>,
        A: &Matrix<T>,
        δ: T,
    ) -> Result<KKTFactorization, DenseFactorizationError> {
        match self.schur.factor(M, A, δ) {
            Ok(()) => {
                self.using_fallback = false;
                Ok(self.kind)
            }
            Err(DenseFactorizationError::IncompatibleDimension) => {
                Err(DenseFactorizationError::IncompatibleDimension)
            }
            Err(_) => {
                let (nx, ne) = (self.nx, self.ne);
                let lu = self.fallback.get_or_insert_with(|| LUKKTSolver::new(nx, ne));
                let kind = lu.factor(M, A, δ)?;
                self.using_fallback = true;
                Ok(kind)
            }
        }
    }

    pub(crate) fn solve(&mut self, x: &mut [T], y: &mut [T]) {
        match (&mut self.fallback, self.using_fallback) {
            (Some(lu), true) => lu.solve(x, y),
            _ => self.schur.solve(x, y),
        }
    }
}

/// KKT solver using Cholesky factors of the condensed Hessian and of the
/// Schur complement, falling back to LU on failure.
pub(crate) struct CholeskyKKTSolver<T> {
    inner: SchurWithFallback<T>,
}

impl<T> CholeskyKKTSolver<T>
where
    T: FloatT,
{
    pub(crate) fn new(nx: usize, ne: usize) -> Self {
        Self {
            inner: SchurWithFallback::new(SchurMethod::Cholesky, nx, ne),
        }
    }
}

impl<T> KKTSolver<T> for CholeskyKKTSolver<T>
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
    fn test_cholesky_kktsolver() {
        let mut engine = KKTSolverEngine::<f64>::new(KKTStrategy::Cholesky, 3, 1);
        check_engine(&mut engine, KKTFactorization::Cholesky);
    }

    #[test]
    fn test_cholesky_kktsolver_fallback() {
        // indefinite M breaks the Schur complement method
        #[rustfmt::skip]
        let M = Matrix::from(&[
            [ 1., 0.],
            [ 0., -1.],
        ]);
        let A = Matrix::from(&[[0., 1.]]);
        let mut engine = CholeskyKKTSolver::<f64>::new(2, 1);
        assert_eq!(engine.factor(&M, &A, 0.), Ok(KKTFactorization::LU));

        let mut x = vec![1., 1.];
        let mut y = vec![2.];
        engine.solve(&mut x, &mut y);
        assert!(x.norm_inf_diff(&[1., 2.]) < 1e-12);

        // a definite M switches back to the Schur complement
        let M = Matrix::from(&[[2., 0.], [0., 1.]]);
        assert_eq!(engine.factor(&M, &A, 0.), Ok(KKTFactorization::Cholesky));

        // M*[1,2] + A'*3 = [2,5], A*[1,2] = 2
        let mut x = vec![2., 5.];
        let mut y = vec![2.];
        engine.solve(&mut x, &mut y);
        assert!(x.norm_inf_diff(&[1., 2.]) < 1e-12);
        assert!((y[0] - 3.).abs() < 1e-12);
    }
}
