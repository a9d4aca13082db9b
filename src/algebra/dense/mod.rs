mod cholesky;
mod core;
mod gemv;
mod lq;
mod lu;
mod triangular;

pub use self::cholesky::*;
pub use self::lq::*;
pub use self::lu::*;

use crate::algebra::{DenseFactorizationError, FloatT, Matrix};

/// Dense Cholesky factorization `A = L*L'` of a symmetric matrix.
pub trait FactorCholesky {
    type T: FloatT;
    /// Computes the Cholesky decomposition.  Only the upper triangle
    /// of `A` is referenced.  The factor is stored internally.
    fn factor(&mut self, A: &Matrix<Self::T>) -> Result<(), DenseFactorizationError>;

    /// Solves `A*x = b` in place using a previously computed factor.
    fn solve(&mut self, b: &mut [Self::T]);
}

/// Dense LU factorization `P*A = L*U` with partial pivoting.
pub trait FactorLU {
    type T: FloatT;
    /// Computes the LU decomposition of a square matrix.
    fn factor(&mut self, A: &Matrix<Self::T>) -> Result<(), DenseFactorizationError>;

    /// Solves `A*x = b` in place using a previously computed factor.
    fn solve(&mut self, b: &mut [Self::T]);
}

/// Dense LQ factorization `A = [L 0]*Q` of a wide matrix.
pub trait FactorLQ {
    type T: FloatT;
    /// Computes the lower triangular factor `L` of an `m x n`
    /// matrix `A` with `m <= n`.  The orthogonal factor is discarded,
    /// so that `L*L' = A*A'`.
    fn factor(&mut self, A: &Matrix<Self::T>) -> Result<(), DenseFactorizationError>;

    /// Solves `(A*A')*x = b` in place using a previously computed factor.
    fn solve(&mut self, b: &mut [Self::T]);
}
