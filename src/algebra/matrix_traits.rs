#![allow(non_snake_case)]

use std::ops::Index;

/// Size queries common to all matrix types and views.
pub trait ShapedMatrix {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
}

//NB: the concrete dense type is just called "Matrix".  The "DenseMatrix" trait
//is implemented on Matrix and Adjoint to allow for indexing of values in
//either format.   This follows the Julia naming convention for similar types.
pub(crate) trait DenseMatrix: ShapedMatrix + Index<(usize, usize)> {
    type T;
    fn index_linear(&self, idx: (usize, usize)) -> usize;
    fn data(&self) -> &[Self::T];
}
