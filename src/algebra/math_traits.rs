use super::FloatT;

// All internal math for the solver should go through these core
// traits, which are implemented generically for floats of type FloatT.

/// Scalar operations on [`FloatT`](crate::algebra::FloatT)

pub trait ScalarMath {
    type T: FloatT;
    /// Applies a threshold value.
    ///
    /// If `s < min_thresh`, it is assigned the new value `min_new`.
    ///
    /// If `s > max_thresh`, it assigned the new value `max_new`.
    fn clip(
        &self,
        min_thresh: Self::T,
        max_thresh: Self::T,
        min_new: Self::T,
        max_new: Self::T,
    ) -> Self::T;
}

/// Vector operations on slices of [`FloatT`](crate::algebra::FloatT)

pub trait VectorMath {
    type T;

    /// Copy values from `src` to `self`
    fn copy_from(&mut self, src: &Self) -> &mut Self;

    /// Assign `op(v[i])` to `self[i]`
    fn scalarop_from(&mut self, op: impl Fn(Self::T) -> Self::T, v: &Self) -> &mut Self;

    /// set all elements to the same value
    fn set(&mut self, c: Self::T) -> &mut Self;

    fn scale(&mut self, c: Self::T) -> &mut Self;

    fn negate(&mut self) -> &mut Self;

    fn dot(&self, y: &Self) -> Self::T;

    /// `dot(z + α*dz, s + α*ds)` without forming either vector
    fn dot_shifted(
        z: &[Self::T],
        s: &[Self::T],
        dz: &[Self::T],
        ds: &[Self::T],
        α: Self::T,
    ) -> Self::T;

    fn sum(&self) -> Self::T;

    fn sumsq(&self) -> Self::T;

    /// Infinity norm.  NaN if any element is NaN.
    fn norm_inf(&self) -> Self::T;

    /// Largest absolute elementwise difference
    fn norm_inf_diff(&self, b: &Self) -> Self::T;

    /// No Infs or NaNs
    fn is_finite(&self) -> bool;

    /// `self = a*x + b*self`
    fn axpby(&mut self, a: Self::T, x: &Self, b: Self::T) -> &mut Self;
}

/// Matrix-vector products for dense matrices of [`FloatT`](crate::algebra::FloatT)

pub trait MatrixVectorMultiply {
    type T: FloatT;

    /// BLAS-like general matrix-vector multiply.  Produces `y = a*self*x + b*y`
    fn gemv(&self, y: &mut [Self::T], x: &[Self::T], a: Self::T, b: Self::T);
}

/// Symmetric matrix-vector products

pub trait SymMatrixVectorMultiply {
    type T: FloatT;

    /// BLAS-like symmetric matrix-vector multiply.  Produces `y = a*self*x + b*y`.
    /// Only the upper triangle of the source data is referenced.
    fn symv(&self, y: &mut [Self::T], x: &[Self::T], a: Self::T, b: Self::T);
}

/// Solves with square lower triangular matrices

pub trait TriangularSolve {
    type T: FloatT;

    /// Solves `L*x = b` in place, where `L = self` is lower triangular.
    fn lsolve(&self, b: &mut [Self::T]);

    /// Solves `L'*x = b` in place, where `L = self` is lower triangular.
    fn ltsolve(&self, b: &mut [Self::T]);
}
