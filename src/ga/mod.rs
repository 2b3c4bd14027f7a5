//! Genetic algorithm for single-vehicle pickup routes.
//!
//! - [`Tour`] — Permutation chromosome over the local stops `1..=k`
//! - [`operators`] — Tournament selection, order crossover, inversion mutation
//! - [`RouteOptimizer`] — Generational GA returning a [`TspSolution`]
//! - [`TspConfig`] — Population, generation, and rate parameters

mod chromosome;
mod config;
pub mod operators;
mod solver;

pub use chromosome::Tour;
pub use config::TspConfig;
pub use solver::{RouteOptimizer, TourStatus, TspSolution};
