#![allow(non_snake_case)]
use crate::algebra::*;

// Triangular solves against the lower triangle of a square
// matrix.  Entries above the diagonal are never referenced.

impl<T> TriangularSolve for Matrix<T>
where
    T: FloatT,
{
    type T = T;

    fn lsolve(&self, b: &mut [T]) {
        let n = self.n;
        assert!(self.is_square());
        assert_eq!(b.len(), n);

        // column oriented forward substitution
        for j in 0..n {
            let col = self.col_slice(j);
            b[j] /= col[j];
            let bj = b[j];
            for i in (j + 1)..n {
                b[i] -= col[i] * bj;
            }
        }
    }

    fn ltsolve(&self, b: &mut [T]) {
        let n = self.n;
        assert!(self.is_square());
        assert_eq!(b.len(), n);

        // row i of L' is column i of L
        for i in (0..n).rev() {
            let col = self.col_slice(i);
            let mut acc = b[i];
            for k in (i + 1)..n {
                acc -= col[k] * b[k];
            }
            b[i] = acc / col[i];
        }
    }
}

#[test]
fn test_triangular_solves() {
    #[rustfmt::skip]
    let L = Matrix::from(&[
        [2., 9., 9.],
        [1., 3., 9.],
        [4., 2., 1.],
    ]);

    // L*[1,2,3] = [2, 7, 11]
    let mut b = vec![2., 7., 11.];
    L.lsolve(&mut b);
    assert!(b.norm_inf_diff(&[1., 2., 3.]) < 1e-14);

    // L'*[1,2,3] = [2+2+12, 6+6, 3] = [16, 12, 3]
    let mut b = vec![16., 12., 3.];
    L.ltsolve(&mut b);
    assert!(b.norm_inf_diff(&[1., 2., 3.]) < 1e-14);
}
