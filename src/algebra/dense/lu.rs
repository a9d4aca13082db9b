#![allow(non_snake_case)]

use crate::algebra::*;

pub struct LUEngine<T> {
    /// combined unit lower / upper factors of P*A
    pub LU: Matrix<T>,
    /// row permutation.  Row i of P*A is row ipiv[i] of A.
    pub ipiv: Vec<usize>,
    work: Vec<T>,
}

impl<T> LUEngine<T>
where
    T: FloatT,
{
    pub fn new(n: usize) -> Self {
        let LU = Matrix::<T>::zeros((n, n));
        let ipiv = (0..n).collect();
        let work = vec![T::zero(); n];
        Self { LU, ipiv, work }
    }
}

impl<T> FactorLU for LUEngine<T>
where
    T: FloatT,
{
    type T = T;

    fn factor(&mut self, A: &Matrix<T>) -> Result<(), DenseFactorizationError> {
        if A.size() != self.LU.size() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        let n = self.LU.n;
        self.LU.data.copy_from(&A.data);
        for (i, p) in self.ipiv.iter_mut().enumerate() {
            *p = i;
        }

        let LU = &mut self.LU;
        for k in 0..n {
            // partial pivoting on column k
            let mut p = k;
            let mut pmax = LU[(k, k)].abs();
            for i in (k + 1)..n {
                let v = LU[(i, k)].abs();
                if v > pmax {
                    pmax = v;
                    p = i;
                }
            }
            if pmax == T::zero() || !pmax.is_finite() {
                return Err(DenseFactorizationError::LU(k + 1));
            }
            if p != k {
                for j in 0..n {
                    let tmp = LU[(k, j)];
                    LU[(k, j)] = LU[(p, j)];
                    LU[(p, j)] = tmp;
                }
                self.ipiv.swap(k, p);
            }

            let pivot = LU[(k, k)];
            for i in (k + 1)..n {
                LU[(i, k)] /= pivot;
            }
            for j in (k + 1)..n {
                let ukj = LU[(k, j)];
                if ukj == T::zero() {
                    continue;
                }
                for i in (k + 1)..n {
                    let lik = LU[(i, k)];
                    LU[(i, j)] -= lik * ukj;
                }
            }
        }
        Ok(())
    }

    fn solve(&mut self, b: &mut [T]) {
        let n = self.LU.n;
        assert_eq!(b.len(), n);

        // apply the permutation, then unit lower and upper solves
        for (w, &p) in self.work.iter_mut().zip(self.ipiv.iter()) {
            *w = b[p];
        }
        b.copy_from(&self.work);

        let LU = &self.LU;
        for j in 0..n {
            let bj = b[j];
            for i in (j + 1)..n {
                b[i] -= LU[(i, j)] * bj;
            }
        }
        for j in (0..n).rev() {
            b[j] /= LU[(j, j)];
            let bj = b[j];
            for i in 0..j {
                b[i] -= LU[(i, j)] * bj;
            }
        }
    }
}

macro_rules! generate_test_lu {
    ($fxx:ty, $test_name:ident, $tolfn:ident) => {
        #[test]
        fn $test_name() {
            // requires pivoting: zero in the leading entry
            #[rustfmt::skip]
            let A = Matrix::<$fxx>::from(
            &[[ 0.,  2., 1.],
              [ 1., -1., 0.],
              [ 3.,  1., 4.]]);

            let mut eng = LUEngine::<$fxx>::new(3);
            assert!(eng.factor(&A).is_ok());

            // A*[1,2,3] = [7, -1, 17]
            let mut b = vec![7., -1., 17.];
            eng.solve(&mut b);
            assert!(b.norm_inf_diff(&[1., 2., 3.]) <= (1e-10 as $fxx).$tolfn());
        }
    };
}

generate_test_lu!(f32, test_lu_f32, sqrt);
generate_test_lu!(f64, test_lu_f64, abs);

#[test]
fn test_lu_indefinite_and_singular() {
    // symmetric indefinite KKT-like matrix is fine
    #[rustfmt::skip]
    let K = Matrix::from(
    &[[ 1.,  1.],
      [ 1., -1.]]);
    let mut eng = LUEngine::<f64>::new(2);
    assert!(eng.factor(&K).is_ok());
    let mut b = vec![3., -1.];
    eng.solve(&mut b);
    assert!(b.norm_inf_diff(&[1., 2.]) < 1e-14);

    #[rustfmt::skip]
    let S = Matrix::from(
    &[[ 1., 2.],
      [ 2., 4.]]);
    assert_eq!(eng.factor(&S), Err(DenseFactorizationError::LU(2)));
}
