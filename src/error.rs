//! Error type shared by every stage of shuttle planning.

use thiserror::Error;

/// Errors surfaced by the routing core.
///
/// Trivial instances (no employees, zero headcount) are not errors: they
/// produce empty results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// Malformed caller data: bad matrix shape, invalid parameters, bad indices.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Band lookup was attempted on a rate card without bands.
    #[error("rate card has no distance bands")]
    EmptyRateCard,

    /// No combination of priced vehicle tiers covers the headcount.
    #[error("no feasible vehicle plan covers {headcount} employees")]
    InfeasiblePlan {
        /// Headcount that could not be covered.
        headcount: usize,
    },

    /// The best route found still crosses an unreachable edge.
    #[error("best route crosses an unreachable edge (distance {distance})")]
    UnreachableRoute {
        /// Total path distance including the sentinel edge(s).
        distance: f64,
    },

    /// The run was aborted through a [`CancelToken`](crate::cancel::CancelToken).
    #[error("optimization cancelled")]
    Cancelled,
}

impl RoutingError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RoutingError::InvalidInput(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;
