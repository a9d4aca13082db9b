#![allow(non_snake_case)]

use crate::algebra::*;

pub struct LQEngine<T> {
    /// lower triangular factor (stored as square dense)
    pub L: Matrix<T>,
    // row-reduced copy of the input
    W: Matrix<T>,
    // householder vector
    v: Vec<T>,
}

impl<T> LQEngine<T>
where
    T: FloatT,
{
    /// Engine for factoring `m x n` matrices with `m <= n`
    pub fn new(m: usize, n: usize) -> Self {
        assert!(m <= n);
        let L = Matrix::<T>::zeros((m, m));
        let W = Matrix::<T>::zeros((m, n));
        let v = vec![T::zero(); n];
        Self { L, W, v }
    }

    pub fn size(&self) -> (usize, usize) {
        self.W.size()
    }
}

impl<T> FactorLQ for LQEngine<T>
where
    T: FloatT,
{
    type T = T;

    fn factor(&mut self, A: &Matrix<T>) -> Result<(), DenseFactorizationError> {
        if A.size() != self.W.size() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        let (m, n) = A.size();
        let W = &mut self.W;
        let v = &mut self.v;
        W.data.copy_from(&A.data);

        // Householder reflections applied from the right, one
        // row at a time, zero the entries right of the diagonal
        for i in 0..m {
            let mut α = T::zero();
            for j in i..n {
                α += W[(i, j)] * W[(i, j)];
            }
            α = α.sqrt();

            // relative to the original row, so that exactly
            // dependent rows fail despite roundoff
            let mut rownorm = T::zero();
            for j in 0..n {
                rownorm += A[(i, j)] * A[(i, j)];
            }
            let tol = T::epsilon() * n.as_T() * rownorm.sqrt();
            if !(α > tol) || !α.is_finite() {
                return Err(DenseFactorizationError::LQ(i + 1));
            }

            let x0 = W[(i, i)];
            let sgn = if x0 < T::zero() { -T::one() } else { T::one() };
            for j in i..n {
                v[j] = W[(i, j)];
            }
            v[i] += sgn * α;
            let vtv = v[i..n].sumsq();

            for r in i..m {
                let mut s = T::zero();
                for j in i..n {
                    s += W[(r, j)] * v[j];
                }
                let c = (s + s) / vtv;
                for j in i..n {
                    W[(r, j)] -= c * v[j];
                }
            }
        }

        // copy out with a positive diagonal.  Column sign flips
        // leave L*L' unchanged.
        let L = &mut self.L;
        L.data.set(T::zero());
        for j in 0..m {
            let sgn = if W[(j, j)] < T::zero() { -T::one() } else { T::one() };
            for i in j..m {
                L[(i, j)] = sgn * W[(i, j)];
            }
        }
        Ok(())
    }

    fn solve(&mut self, b: &mut [T]) {
        self.L.lsolve(b);
        self.L.ltsolve(b);
    }
}

macro_rules! generate_test_lq {
    ($fxx:ty, $test_name:ident, $tolfn:ident) => {
        #[test]
        fn $test_name() {
            #[rustfmt::skip]
            let A = Matrix::<$fxx>::from(
            &[[ 1., 2., 0., 1.],
              [ 0., 1., 3., 1.],
              [ 2., 0., 1., 1.]]);

            let mut eng = LQEngine::<$fxx>::new(3, 4);
            assert!(eng.factor(&A).is_ok());

            // A*A' = [6 3 3; 3 11 4; 3 4 6]
            #[rustfmt::skip]
            let AAt = Matrix::<$fxx>::from(
            &[[ 6.,  3., 3.],
              [ 3., 11., 4.],
              [ 3.,  4., 6.]]);
            for i in 0..3 {
                for j in 0..3 {
                    let mut lij = 0.;
                    for k in 0..3 {
                        lij += eng.L[(i, k)] * eng.L[(j, k)];
                    }
                    assert!((lij - AAt[(i, j)]).abs() <= (1e-10 as $fxx).$tolfn());
                }
                assert!(eng.L[(i, i)] > 0.);
            }

            // AAt*[1,1,1] = [12, 18, 13]
            let mut b = vec![12., 18., 13.];
            eng.solve(&mut b);
            assert!(b.norm_inf_diff(&[1., 1., 1.]) <= (1e-10 as $fxx).$tolfn());
        }
    };
}

generate_test_lq!(f32, test_lq_f32, sqrt);
generate_test_lq!(f64, test_lq_f64, abs);

#[test]
fn test_lq_rank_deficient() {
    #[rustfmt::skip]
    let A = Matrix::from(
    &[[ 1., 1., 0.],
      [ 2., 2., 0.]]);
    let mut eng = LQEngine::<f64>::new(2, 3);
    assert!(matches!(
        eng.factor(&A),
        Err(DenseFactorizationError::LQ(2))
    ));
}
