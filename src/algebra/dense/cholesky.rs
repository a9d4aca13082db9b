#![allow(non_snake_case)]

use crate::algebra::*;

pub struct CholeskyEngine<T> {
    /// lower triangular factor (stored as square dense)
    pub L: Matrix<T>,
}

impl<T> CholeskyEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        let L = Matrix::<T>::zeros((n, n));
        Self { L }
    }
}

impl<T> FactorCholesky for CholeskyEngine<T>
where
    T: FloatT,
{
    type T = T;

    fn factor(&mut self, A: &Matrix<T>) -> Result<(), DenseFactorizationError> {
        if A.size() != self.L.size() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        // left looking, column by column.  Entry (i,j) of
        // the lower triangle is read from (j,i) in triu(A).
        let n = self.L.n;
        let L = &mut self.L;
        L.data_mut().set(T::zero());

        for j in 0..n {
            let mut d = A[(j, j)];
            for k in 0..j {
                d -= L[(j, k)] * L[(j, k)];
            }
            if !(d > T::zero()) || !d.is_finite() {
                return Err(DenseFactorizationError::Cholesky(j + 1));
            }
            let ljj = d.sqrt();
            L[(j, j)] = ljj;

            for i in (j + 1)..n {
                let mut s = A[(j, i)];
                for k in 0..j {
                    s -= L[(i, k)] * L[(j, k)];
                }
                L[(i, j)] = s / ljj;
            }
        }
        Ok(())
    }

    fn solve(&mut self, b: &mut [T]) {
        self.L.lsolve(b);
        self.L.ltsolve(b);
    }
}

macro_rules! generate_test_cholesky {
    ($fxx:ty, $test_name:ident, $tolfn:ident) => {
        #[test]
        fn $test_name() {
            #[rustfmt::skip]
            let S = Matrix::<$fxx>::from(
            &[[ 8., -2., 4.],
              [-2., 12., 2.],
              [ 4.,  2., 6.]]);

            let mut eng = CholeskyEngine::<$fxx>::new(3);
            assert!(eng.factor(&S).is_ok());

            // reconstruct L*L' column by column
            let mut M = Matrix::<$fxx>::zeros((3, 3));
            for j in 0..3 {
                let mut e = vec![0.; 3];
                e[j] = 1.;
                let mut Lte = vec![0.; 3];
                eng.L.t().gemv(&mut Lte, &e, 1.0, 0.0);
                eng.L.gemv(M.col_slice_mut(j), &Lte, 1.0, 0.0);
            }
            assert!(M.data.norm_inf_diff(&S.data) < (1e-8 as $fxx).$tolfn());

            // S*[1,2,3] = [8-4+12, -2+24+6, 4+4+18]
            let mut b = vec![16., 28., 26.];
            eng.solve(&mut b);
            assert!(b.norm_inf_diff(&[1., 2., 3.]) <= (1e-10 as $fxx).$tolfn());
        }
    };
}

generate_test_cholesky!(f32, test_cholesky_f32, sqrt);
generate_test_cholesky!(f64, test_cholesky_f64, abs);

#[test]
fn test_cholesky_indefinite() {
    #[rustfmt::skip]
    let S = Matrix::from(
    &[[ 1., 2.],
      [ 2., 1.]]);

    let mut eng = CholeskyEngine::<f64>::new(2);
    assert_eq!(eng.factor(&S), Err(DenseFactorizationError::Cholesky(2)));

    let mut eng = CholeskyEngine::<f64>::new(3);
    assert_eq!(
        eng.factor(&S),
        Err(DenseFactorizationError::IncompatibleDimension)
    );
}
