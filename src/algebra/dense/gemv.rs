#![allow(non_snake_case)]
use crate::algebra::*;

impl<T> MatrixVectorMultiply for Matrix<T>
where
    T: FloatT,
{
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(self.n, x.len());
        assert_eq!(self.m, y.len());

        if b == T::zero() {
            y.set(T::zero());
        } else if b != T::one() {
            y.scale(b);
        }
        // column oriented accumulation
        for (col, &xj) in x.iter().enumerate() {
            let axj = a * xj;
            if axj == T::zero() {
                continue;
            }
            for (yi, &Aij) in y.iter_mut().zip(self.col_slice(col)) {
                *yi += Aij * axj;
            }
        }
    }
}

impl<'a, T> MatrixVectorMultiply for Adjoint<'a, Matrix<T>>
where
    T: FloatT,
{
    type T = T;

    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let A = self.src;
        assert_eq!(A.m, x.len());
        assert_eq!(A.n, y.len());

        for (col, yj) in y.iter_mut().enumerate() {
            let dot = A.col_slice(col).dot(x);
            *yj = if b == T::zero() {
                a * dot
            } else {
                a * dot + b * (*yj)
            };
        }
    }
}

impl<'a, T> SymMatrixVectorMultiply for Symmetric<'a, Matrix<T>>
where
    T: FloatT,
{
    type T = T;

    fn symv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        let A = self.src;
        let n = A.n;
        assert!(A.is_square());
        assert_eq!(n, x.len());
        assert_eq!(n, y.len());

        if b == T::zero() {
            y.set(T::zero());
        } else if b != T::one() {
            y.scale(b);
        }

        // upper triangle only.  Each off diagonal
        // entry contributes to two outputs.
        for c in 0..n {
            let col = A.col_slice(c);
            let mut acc = T::zero();
            for r in 0..c {
                y[r] += a * col[r] * x[c];
                acc += col[r] * x[r];
            }
            y[c] += a * (acc + col[c] * x[c]);
        }
    }
}

#[test]
fn test_gemv() {
    #[rustfmt::skip]
    let A = Matrix::from(&[
        [1., 2., 3.],
        [4., 5., 6.],
    ]);
    let x = vec![1., 0., -1.];
    let mut y = vec![1., 1.];
    A.gemv(&mut y, &x, 2., 1.);
    assert_eq!(y, vec![-3., -3.]);

    let x = vec![1., -1.];
    let mut y = vec![0.; 3];
    A.t().gemv(&mut y, &x, 1., 0.);
    assert_eq!(y, vec![-3., -3., -3.]);
}

#[test]
fn test_symv() {
    // lower triangle is junk and should be ignored
    #[rustfmt::skip]
    let A = Matrix::from(&[
        [4., 1., 2.],
        [9., 5., 3.],
        [9., 9., 6.],
    ]);
    let x = vec![1., 2., 3.];
    let mut y = vec![1.; 3];
    A.sym().symv(&mut y, &x, 1., -1.);
    // full symmetric product is [12, 20, 26]
    assert_eq!(y, vec![11., 19., 25.]);
}
