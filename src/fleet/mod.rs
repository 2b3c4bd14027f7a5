//! Fleet sizing.
//!
//! [`FleetAllocator`] turns a headcount and a representative route distance
//! into the cheapest [`CapacityPlan`](crate::models::CapacityPlan) the rate
//! card allows.

mod allocator;

pub use allocator::FleetAllocator;
