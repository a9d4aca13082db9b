//! Implementations of the core solver traits for specific problem formats.

pub mod default;
