//! Solver types for dense convex quadratic programs.
//!
//! The types here implement the component traits of the
//! [core solver](crate::solver::core) for the problem format
//! described in the top level crate documentation.

#![allow(non_snake_case)]

mod data_updating;
mod info;
mod info_print;
mod kktsystem;
mod problemdata;
mod residuals;
mod settings;
mod solution;
mod solver;
mod variables;

#[cfg(feature = "serde")]
mod json;

//export flattened
pub use info::*;
pub use kktsystem::*;
pub use problemdata::*;
pub use residuals::*;
pub use settings::*;
pub use solution::*;
pub use solver::*;
pub use variables::*;
