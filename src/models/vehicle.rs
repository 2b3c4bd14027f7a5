//! Vehicle tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A shuttle size, identified by its seat capacity.
///
/// # Examples
///
/// ```
/// use u_shuttle::models::VehicleTier;
///
/// let bus = VehicleTier::new(46);
/// assert_eq!(bus.capacity(), 46);
/// assert_eq!(bus.vehicles_to_cover(50), 2);
/// assert_eq!(VehicleTier::STANDARD.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleTier {
    capacity: u32,
}

impl VehicleTier {
    /// The minibus / midibus / coach sizes priced by typical rate cards.
    pub const STANDARD: [VehicleTier; 3] = [
        VehicleTier { capacity: 19 },
        VehicleTier { capacity: 27 },
        VehicleTier { capacity: 46 },
    ];

    /// Creates a tier with the given seat capacity.
    pub const fn new(capacity: u32) -> Self {
        Self { capacity }
    }

    /// Seat capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Smallest number of vehicles of this tier that seats `headcount` people.
    ///
    /// Zero-capacity tiers never cover anything and return 0.
    pub fn vehicles_to_cover(&self, headcount: usize) -> usize {
        if self.capacity == 0 {
            return 0;
        }
        headcount.div_ceil(self.capacity as usize)
    }
}

impl fmt::Display for VehicleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-seat", self.capacity)
    }
}
