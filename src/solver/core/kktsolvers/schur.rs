#![allow(non_snake_case)]

use crate::algebra::*;

// Block elimination for the reduced KKT system.  With M = L*L' and
// AL = A*inv(L'), the Schur complement is S = AL*AL' + δI, and
//
//   S*y = A*inv(M)*r1 - r2
//   x   = inv(M)*(r1 - A'*y)
//
// S is either formed and Cholesky factored, or its factor is taken
// from an LQ factorization of [AL  sqrt(δ)I] without forming S.

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum SchurMethod {
    Cholesky,
    LQ,
}

pub(crate) struct SchurComplementSolver<T> {
    method: SchurMethod,
    cholM: CholeskyEngine<T>,
    AL: Matrix<T>,
    // Schur complement, Cholesky method only
    S: Matrix<T>,
    cholS: CholeskyEngine<T>,
    // stacked [AL sqrt(δ)I], LQ method only
    B: Matrix<T>,
    lqS: LQEngine<T>,
    work_x: Vec<T>,
}

impl<T> SchurComplementSolver<T>
where
    T: FloatT,
{
    pub(crate) fn new(method: SchurMethod, nx: usize, ne: usize) -> Self {
        let (sdim, bdims) = match method {
            SchurMethod::Cholesky => (ne, (0, 0)),
            SchurMethod::LQ => (0, (ne, nx + ne)),
        };
        Self {
            method,
            cholM: CholeskyEngine::new(nx),
            AL: Matrix::zeros((ne, nx)),
            S: Matrix::zeros((sdim, sdim)),
            cholS: CholeskyEngine::new(sdim),
            B: Matrix::zeros(bdims),
            lqS: LQEngine::new(bdims.0, bdims.1),
            work_x: vec![T::zero(); nx],
        }
    }

    pub(crate) fn factor(
        &mut self,
        M: &Matrix<T>,
        A: &Matrix<T>,
        δ: T,
    ) -> Result<(), DenseFactorizationError> {
        let (ne, nx) = A.size();
        if self.AL.size() != (ne, nx) {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        self.cholM.factor(M)?;

        // rows of AL are inv(L)*A[i,:]'
        let L = &self.cholM.L;
        for i in 0..ne {
            for j in 0..nx {
                self.work_x[j] = A[(i, j)];
            }
            L.lsolve(&mut self.work_x);
            for j in 0..nx {
                self.AL[(i, j)] = self.work_x[j];
            }
        }

        match self.method {
            SchurMethod::Cholesky => {
                // upper triangle is all that gets read
                for j in 0..ne {
                    for i in 0..=j {
                        let mut s = T::zero();
                        for k in 0..nx {
                            s += self.AL[(i, k)] * self.AL[(j, k)];
                        }
                        self.S[(i, j)] = s;
                    }
                    self.S[(j, j)] += δ;
                }
                self.cholS.factor(&self.S)?;
            }
            SchurMethod::LQ => {
                let sqrtδ = T::sqrt(T::max(δ, T::zero()));
                self.B.data.set(T::zero());
                for i in 0..ne {
                    for j in 0..nx {
                        self.B[(i, j)] = self.AL[(i, j)];
                    }
                    self.B[(i, nx + i)] = sqrtδ;
                }
                self.lqS.factor(&self.B)?;
            }
        }
        Ok(())
    }

    pub(crate) fn solve(&mut self, x: &mut [T], y: &mut [T]) {
        let L = &self.cholM.L;

        // u = inv(L)*r1, then y <- AL*u - r2
        L.lsolve(x);
        self.AL.gemv(y, x, T::one(), -T::one());

        match self.method {
            SchurMethod::Cholesky => self.cholS.solve(y),
            SchurMethod::LQ => self.lqS.solve(y),
        }

        // x <- inv(L')*(u - AL'*y)
        self.AL.t().gemv(x, y, -T::one(), T::one());
        L.ltsolve(x);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::*;
    use super::*;

    fn check_method(method: SchurMethod) {
        let (M, A) = test_kkt();
        let δ = 1e-8;
        let mut eng = SchurComplementSolver::<f64>::new(method, 3, 1);
        assert!(eng.factor(&M, &A, δ).is_ok());

        let r1 = vec![1., 0., -1.];
        let r2 = vec![2.];
        let mut x = r1.clone();
        let mut y = r2.clone();
        eng.solve(&mut x, &mut y);
        assert!(kkt_residual(&M, &A, δ, &x, &y, &r1, &r2) < 1e-10);
    }

    #[test]
    fn test_schur_cholesky() {
        check_method(SchurMethod::Cholesky);
    }

    #[test]
    fn test_schur_lq() {
        check_method(SchurMethod::LQ);
    }

    #[test]
    fn test_schur_no_equalities() {
        let (M, _) = test_kkt();
        let A = Matrix::<f64>::zeros((0, 3));
        let mut eng = SchurComplementSolver::<f64>::new(SchurMethod::Cholesky, 3, 0);
        assert!(eng.factor(&M, &A, 1e-8).is_ok());

        // M*[1,1,1] = [5,5,3]
        let mut x = vec![5., 5., 3.];
        let mut y: Vec<f64> = vec![];
        eng.solve(&mut x, &mut y);
        assert!(x.norm_inf_diff(&[1., 1., 1.]) < 1e-12);
    }

    #[test]
    fn test_schur_indefinite_hessian() {
        #[rustfmt::skip]
        let M = Matrix::from(&[
            [ 1., 0.],
            [ 0., -1.],
        ]);
        let A = Matrix::from(&[[1., 1.]]);
        let mut eng = SchurComplementSolver::<f64>::new(SchurMethod::Cholesky, 2, 1);
        assert_eq!(
            eng.factor(&M, &A, 1e-8),
            Err(DenseFactorizationError::Cholesky(2))
        );
    }
}
