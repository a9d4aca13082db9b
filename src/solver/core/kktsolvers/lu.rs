#![allow(non_snake_case)]

use super::*;

/// KKT solver that factors the full reduced matrix
///
/// ```text
/// K = [ M   A' ]
///     [ A  -δI ]
/// ```
///
/// with partial pivoting.  This is the slowest strategy but does not
/// need `M` to be positive definite or `A` to have full row rank.
pub(crate) struct LUKKTSolver<T> {
    nx: usize,
    ne: usize,
    K: Matrix<T>,
    lu: LUEngine<T>,
    work: Vec<T>,
}

impl<T> LUKKTSolver<T>
where
    T: FloatT,
{
    pub(crate) fn new(nx: usize, ne: usize) -> Self {
        let n = nx + ne;
        Self {
            nx,
            ne,
            K: Matrix::zeros((n, n)),
            lu: LUEngine::new(n),
            work: vec![T::zero(); n],
        }
    }
}

impl<T> KKTSolver<T> for LUKKTSolver<T>
where
    T: FloatT,
{
    fn factor(
        &mut self,
        M: &Matrix<T>,
        A: &Matrix<T>,
        δ: T,
    ) -> Result<KKTFactorization, DenseFactorizationError> {
        let (nx, ne) = (self.nx, self.ne);
        if M.size() != (nx, nx) || A.size() != (ne, nx) {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        let K = &mut self.K;
        for j in 0..nx {
            for i in 0..nx {
                K[(i, j)] = M[(i, j)];
            }
            for i in 0..ne {
                K[(nx + i, j)] = A[(i, j)];
                K[(j, nx + i)] = A[(i, j)];
            }
        }
        for j in 0..ne {
            for i in 0..ne {
                K[(nx + i, nx + j)] = T::zero();
            }
            K[(nx + j, nx + j)] = -δ;
        }

        self.lu.factor(&self.K)?;
        Ok(KKTFactorization::LU)
    }

    fn solve(&mut self, x: &mut [T], y: &mut [T]) {
        let nx = self.nx;
        self.work[..nx].copy_from(x);
        self.work[nx..].copy_from(y);
        self.lu.solve(&mut self.work);
        x.copy_from(&self.work[..nx]);
        y.copy_from(&self.work[nx..]);
    }
}

#[test]
fn test_lu_kktsolver() {
    use super::test_utils::*;
    let mut engine = KKTSolverEngine::<f64>::new(KKTStrategy::LU, 3, 1);
    check_engine(&mut engine, KKTFactorization::LU);
}

#[test]
fn test_lu_kktsolver_indefinite_hessian() {
    // M indefinite but K nonsingular
    #[rustfmt::skip]
    let M = Matrix::from(&[
        [ 1., 0.],
        [ 0., -1.],
    ]);
    let A = Matrix::from(&[[0., 1.]]);
    let mut engine = LUKKTSolver::<f64>::new(2, 1);
    assert_eq!(engine.factor(&M, &A, 0.), Ok(KKTFactorization::LU));

    // K*[1,2,3] = [1, -2+3, 2]
    let mut x = vec![1., 1.];
    let mut y = vec![2.];
    engine.solve(&mut x, &mut y);
    assert!(x.norm_inf_diff(&[1., 2.]) < 1e-12);
    assert!((y[0] - 3.).abs() < 1e-12);
}
