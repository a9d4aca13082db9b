use thiserror::Error;

#[derive(Error, Debug)]
/// Error type returned by dense matrix assembly operations.
pub enum MatrixFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
}

/// Error type returned by dense factorization routines.  Errors
/// carry the 1-based index of the failing pivot.
#[allow(clippy::upper_case_acronyms)]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenseFactorizationError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    #[error("Cholesky error: bad pivot in column {0}")]
    Cholesky(usize),
    #[error("LU error: singular pivot in column {0}")]
    LU(usize),
    #[error("LQ error: zero diagonal in row {0}")]
    LQ(usize),
}
