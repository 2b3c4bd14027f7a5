//! Distance matrices.
//!
//! Provides the dense depot-plus-employees matrix consumed by every
//! optimizer, together with the unreachable-edge sentinel.

mod matrix;

pub use matrix::{DistanceMatrix, UNREACHABLE};
