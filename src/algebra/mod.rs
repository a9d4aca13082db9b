//! Linear algebra for the dense QP solver.
//!
//! All matrices are dense and stored in column major format.  The factorization
//! engines are written natively in Rust and are generic over
//! [`FloatT`](crate::algebra::FloatT), so the solver does not depend on an
//! external BLAS or LAPACK implementation.

mod dense;
mod error_types;
mod floats;
mod math_traits;
mod matrix_traits;
mod matrix_types;
mod scalarmath;
mod vecmath;

pub use dense::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
pub use matrix_traits::*;
pub use matrix_types::*;
