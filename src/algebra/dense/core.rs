#![allow(non_snake_case)]
use crate::algebra::{
    Adjoint, DenseMatrix, FloatT, Matrix, MatrixFormatError, ShapedMatrix,
    Symmetric, VectorMath,
};
use std::ops::{Index, IndexMut};

impl<T> DenseMatrix for Matrix<T>
where
    T: FloatT,
{
    type T = T;
    #[inline]
    fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }
    fn data(&self) -> &[T] {
        &self.data
    }
}

impl<'a, T> DenseMatrix for Adjoint<'a, Matrix<T>>
where
    T: FloatT,
{
    type T = T;
    #[inline]
    fn index_linear(&self, idx: (usize, usize)) -> usize {
        self.src.index_linear((idx.1, idx.0))
    }
    fn data(&self) -> &[T] {
        &self.src.data
    }
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    /// Matrix constructor from column major data.
    ///
    /// # Panics
    /// Panics if the data length does not match the dimensions.
    pub fn new(size: (usize, usize), data: Vec<T>) -> Self {
        let (m, n) = size;
        assert_eq!(m * n, data.len());
        Self { m, n, data }
    }

    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn set_identity(&mut self) {
        assert!(self.m == self.n);
        self.data.set(T::zero());
        for i in 0..self.n {
            self[(i, i)] = T::one();
        }
    }

    /// Checks that the data length agrees with the matrix dimensions.
    pub fn check_format(&self) -> Result<(), MatrixFormatError> {
        if self.m * self.n != self.data.len() {
            return Err(MatrixFormatError::IncompatibleDimension);
        }
        Ok(())
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    pub fn sym(&self) -> Symmetric<'_, Self> {
        Symmetric { src: self }
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// Adds `c` to every diagonal entry.
    pub fn shift_diagonal(&mut self, c: T) {
        for i in 0..usize::min(self.m, self.n) {
            self[(i, i)] += c;
        }
    }

    pub fn is_finite(&self) -> bool {
        self.data.is_finite()
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data()[self.index_linear(idx)]
    }
}

impl<T> Index<(usize, usize)> for Adjoint<'_, Matrix<T>>
where
    T: FloatT,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data()[self.index_linear(idx)]
    }
}

impl<T> ShapedMatrix for Matrix<T>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T> ShapedMatrix for Adjoint<'_, Matrix<T>>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        self.src.n
    }
    fn ncols(&self) -> usize {
        self.src.m
    }
}

impl<T> ShapedMatrix for Symmetric<'_, Matrix<T>>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        self.src.n
    }
    fn ncols(&self) -> usize {
        self.src.n
    }
}

// construct from row major literal data, i.e. with the
// same visual layout as the matrix itself
impl<T, const M: usize, const N: usize> From<&[[T; N]; M]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; N]; M]) -> Matrix<T> {
        let mut mat = Matrix::zeros((M, N));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                mat[(i, j)] = v;
            }
        }
        mat
    }
}

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f)?;
        for i in 0..self.nrows() {
            write!(f, "[ ")?;
            for j in 0..self.ncols() {
                write!(f, " {:?}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        writeln!(f)?;
        Ok(())
    }
}

#[test]
fn test_matrix_from_rows() {
    #[rustfmt::skip]
    let A = Matrix::from(&[
        [1., 4.],
        [2., 5.],
        [3., 6.],
    ]);
    assert_eq!(A.size(), (3, 2));
    assert_eq!(A.data, vec![1., 2., 3., 4., 5., 6.]);
    assert_eq!(A.t()[(1, 2)], 6.);
    assert!(A.check_format().is_ok());

    let B = Matrix { m: 2, n: 2, data: vec![1., 2., 3.] };
    assert!(B.check_format().is_err());
}

#[test]
fn test_shift_diagonal() {
    #[rustfmt::skip]
    let mut A = Matrix::from(&[
        [1., 2.],
        [0., 3.],
    ]);
    A.shift_diagonal(1.);
    assert_eq!(A.data, vec![2., 0., 2., 4.]);
}
