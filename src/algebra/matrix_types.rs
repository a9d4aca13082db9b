#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// All matrices in the problem description and in the solver
// workspace are dense and stored in column major format.

/// Dense matrix in column major format
///
/// __Example usage__ : To construct the 3 x 2 matrix
/// ```text
/// A = [1.  4.]
///     [2.  5.]
///     [3.  6.]
/// ```
///
/// ```no_run
/// use denseqp::algebra::Matrix;
///
/// let A : Matrix<f64> = Matrix::new(
///    (3, 2),                     //size as tuple
///    vec![1., 2., 3., 4., 5., 6.]
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
///
/// // or equivalently, from row-major literal data
/// let B = Matrix::from(&[
///     [1., 4.],
///     [2., 5.],
///     [3., 6.],
/// ]);
/// assert_eq!(A, B);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// vector of data in column major format
    pub data: Vec<T>,
}

/// Adjoint of a matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Adjoint<'a, M> {
    pub src: &'a M,
}

/// Symmetric view of a matrix.  Only the upper
/// triangle of the source matrix is referenced.
#[derive(Debug, Clone, PartialEq)]
pub struct Symmetric<'a, M> {
    pub src: &'a M,
}
