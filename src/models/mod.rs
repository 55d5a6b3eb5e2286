//! Polynomial model layout and evaluation.
//!
//! Models are implemented as small, pure functions so that fitting code can
//! stay generic.

pub mod polynomial;

pub use polynomial::*;
