//! Distance-banded rate cards.

use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::VehicleTier;
use crate::error::{Result, RoutingError};

/// Prices per vehicle tier for routes whose length falls in `[low_km, high_km]`.
///
/// # Examples
///
/// ```
/// use u_shuttle::models::{RateBand, VehicleTier};
///
/// let band = RateBand::new(0.0, 20.0)
///     .with_price(VehicleTier::new(19), 100.0)
///     .with_price(VehicleTier::new(46), 200.0);
/// assert!(band.contains(20.0));
/// assert!(!band.contains(20.5));
/// assert_eq!(band.price(VehicleTier::new(46)), Some(200.0));
/// assert_eq!(band.price(VehicleTier::new(27)), None);
/// assert_eq!(band.label(), "0-20");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBand {
    low_km: f64,
    high_km: f64,
    prices: BTreeMap<VehicleTier, f64>,
}

impl RateBand {
    /// Creates a band with no prices.
    pub fn new(low_km: f64, high_km: f64) -> Self {
        Self {
            low_km,
            high_km,
            prices: BTreeMap::new(),
        }
    }

    /// Sets the price of one vehicle of `tier` in this band.
    pub fn with_price(mut self, tier: VehicleTier, price: f64) -> Self {
        self.prices.insert(tier, price);
        self
    }

    /// Lower bound (inclusive), km.
    pub fn low_km(&self) -> f64 {
        self.low_km
    }

    /// Upper bound (inclusive), km.
    pub fn high_km(&self) -> f64 {
        self.high_km
    }

    /// Price of one vehicle of `tier`, if the band prices it.
    pub fn price(&self, tier: VehicleTier) -> Option<f64> {
        self.prices.get(&tier).copied()
    }

    /// All priced tiers, ascending by capacity.
    pub fn prices(&self) -> impl Iterator<Item = (VehicleTier, f64)> + '_ {
        self.prices.iter().map(|(&t, &p)| (t, p))
    }

    /// Returns `true` if `distance_km` lies in the inclusive range.
    pub fn contains(&self, distance_km: f64) -> bool {
        distance_km >= self.low_km && distance_km <= self.high_km
    }

    /// Human-readable range, e.g. `"0-20"`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.low_km, self.high_km)
    }

    fn validate(&self) -> Result<()> {
        if !self.low_km.is_finite() || !self.high_km.is_finite() || self.low_km > self.high_km {
            return Err(RoutingError::invalid(format!(
                "rate band {} has an invalid range",
                self.label()
            )));
        }
        for (tier, price) in self.prices() {
            if !price.is_finite() || price < 0.0 {
                return Err(RoutingError::invalid(format!(
                    "rate band {} prices {tier} at {price}",
                    self.label()
                )));
            }
        }
        Ok(())
    }
}

/// The band a distance resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandMatch<'a> {
    /// The band whose prices apply.
    pub band: &'a RateBand,
    /// `true` if no band contained the distance and the widest-reaching band
    /// was substituted.
    pub fallback: bool,
}

/// An ordered table of rate bands.
///
/// Resolution policy for a distance `d` (non-positive `d` is treated as 1 km):
///
/// 1. the first band, in table order, whose inclusive range contains `d`;
/// 2. otherwise the band with the greatest `high_km` (first one on ties),
///    reported as a fallback;
/// 3. an empty card fails with [`RoutingError::EmptyRateCard`].
///
/// # Examples
///
/// ```
/// use u_shuttle::models::{RateBand, RateCard, VehicleTier};
///
/// let card = RateCard::new(vec![
///     RateBand::new(0.0, 20.0).with_price(VehicleTier::new(19), 100.0),
///     RateBand::new(21.0, 40.0).with_price(VehicleTier::new(19), 140.0),
/// ])
/// .unwrap();
///
/// let hit = card.resolve(30.0).unwrap();
/// assert_eq!(hit.band.label(), "21-40");
/// assert!(!hit.fallback);
///
/// let miss = card.resolve(75.0).unwrap();
/// assert_eq!(miss.band.label(), "21-40");
/// assert!(miss.fallback);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateCard {
    bands: Vec<RateBand>,
}

impl<'de> Deserialize<'de> for RateCard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bands = Vec::<RateBand>::deserialize(deserializer)?;
        Self::new(bands).map_err(de::Error::custom)
    }
}

impl RateCard {
    /// Creates a rate card, rejecting inverted ranges and negative or
    /// non-finite prices.
    pub fn new(bands: Vec<RateBand>) -> Result<Self> {
        let card = Self { bands };
        card.validate()?;
        Ok(card)
    }

    /// Checks every band.
    pub fn validate(&self) -> Result<()> {
        self.bands.iter().try_for_each(RateBand::validate)
    }

    /// Bands in table order.
    pub fn bands(&self) -> &[RateBand] {
        &self.bands
    }

    /// Returns `true` if the card has no bands.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Finds the band whose prices apply to a route of `distance_km`.
    pub fn resolve(&self, distance_km: f64) -> Result<BandMatch<'_>> {
        if distance_km.is_nan() {
            return Err(RoutingError::invalid("route distance is NaN"));
        }
        let d = if distance_km <= 0.0 { 1.0 } else { distance_km };

        if let Some(band) = self.bands.iter().find(|b| b.contains(d)) {
            return Ok(BandMatch {
                band,
                fallback: false,
            });
        }

        let band = self
            .bands
            .iter()
            .reduce(|best, b| if b.high_km > best.high_km { b } else { best })
            .ok_or(RoutingError::EmptyRateCard)?;
        warn!(
            distance_km = d,
            band = %band.label(),
            "no rate band contains the route distance; using the band with the greatest upper bound"
        );
        Ok(BandMatch {
            band,
            fallback: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> RateCard {
        RateCard::new(vec![
            RateBand::new(0.0, 20.0)
                .with_price(VehicleTier::new(19), 100.0)
                .with_price(VehicleTier::new(27), 130.0),
            RateBand::new(21.0, 40.0).with_price(VehicleTier::new(19), 150.0),
            RateBand::new(41.0, 60.0).with_price(VehicleTier::new(19), 190.0),
        ])
        .expect("valid")
    }

    #[test]
    fn test_resolve_inclusive_bounds() {
        let c = card();
        assert_eq!(c.resolve(20.0).expect("band").band.label(), "0-20");
        assert_eq!(c.resolve(21.0).expect("band").band.label(), "21-40");
        assert_eq!(c.resolve(60.0).expect("band").band.label(), "41-60");
    }

    #[test]
    fn test_gap_falls_back_to_greatest_high() {
        let c = card();
        let m = c.resolve(20.5).expect("band");
        assert!(m.fallback);
        assert_eq!(m.band.label(), "41-60");
    }

    #[test]
    fn test_non_positive_distance_treated_as_one_km() {
        let c = RateCard::new(vec![
            RateBand::new(1.0, 5.0).with_price(VehicleTier::new(19), 10.0),
            RateBand::new(6.0, 9.0).with_price(VehicleTier::new(19), 20.0),
        ])
        .expect("valid");
        let m = c.resolve(0.0).expect("band");
        assert!(!m.fallback);
        assert_eq!(m.band.label(), "1-5");
    }

    #[test]
    fn test_empty_card() {
        assert_eq!(
            RateCard::default().resolve(10.0).unwrap_err(),
            RoutingError::EmptyRateCard
        );
    }

    #[test]
    fn test_nan_distance_rejected() {
        assert!(matches!(
            card().resolve(f64::NAN),
            Err(RoutingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validation() {
        assert!(RateCard::new(vec![RateBand::new(10.0, 5.0)]).is_err());
        assert!(RateCard::new(vec![
            RateBand::new(0.0, 5.0).with_price(VehicleTier::new(19), -1.0)
        ])
        .is_err());
    }

    #[test]
    fn test_json_round_trip_shape() {
        let json = r#"[{"low_km":0.0,"high_km":20.0,"prices":{"19":100.0,"46":200.0}}]"#;
        let card: RateCard = serde_json::from_str(json).expect("json");
        let band = &card.bands()[0];
        assert_eq!(band.price(VehicleTier::new(46)), Some(200.0));
        assert_eq!(band.prices().count(), 2);
    }

    #[test]
    fn test_deserialize_rejects_bad_prices() {
        let negative = r#"[{"low_km":0.0,"high_km":20.0,"prices":{"19":-100.0}}]"#;
        assert!(serde_json::from_str::<RateCard>(negative).is_err());

        let inverted = r#"[{"low_km":30.0,"high_km":20.0,"prices":{"19":100.0}}]"#;
        assert!(serde_json::from_str::<RateCard>(inverted).is_err());
    }
}
