//! Venue capacity tiers for the venue map.

use serde::{Deserialize, Serialize};

use crate::distribution::numeric_field;
use crate::event::Record;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityTier {
    Unknown,
    Micro,
    Small,
    #[serde(rename = "Mid-A")]
    MidA,
    #[serde(rename = "Mid-B")]
    MidB,
    #[serde(rename = "Mid-C")]
    MidC,
    #[serde(rename = "Large-A")]
    LargeA,
    #[serde(rename = "Large-B")]
    LargeB,
    #[serde(rename = "Large-C")]
    LargeC,
    Mega,
}

/// Upper bound (inclusive) of each sized tier, smallest first.
const TIERS: [(u64, CapacityTier); 9] = [
    (199, CapacityTier::Micro),
    (999, CapacityTier::Small),
    (2_999, CapacityTier::MidA),
    (4_999, CapacityTier::MidB),
    (9_999, CapacityTier::MidC),
    (15_000, CapacityTier::LargeA),
    (20_000, CapacityTier::LargeB),
    (50_000, CapacityTier::LargeC),
    (2_147_483_647, CapacityTier::Mega),
];

impl CapacityTier {
    /// Tier for a venue capacity; missing, zero, and out-of-range values are
    /// `Unknown`.
    pub fn from_capacity(capacity: Option<u64>) -> Self {
        match capacity {
            None | Some(0) => Self::Unknown,
            Some(c) => TIERS
                .iter()
                .find(|(max, _)| c <= *max)
                .map(|(_, tier)| *tier)
                .unwrap_or(Self::Unknown),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Micro => "Micro",
            Self::Small => "Small",
            Self::MidA => "Mid-A",
            Self::MidB => "Mid-B",
            Self::MidC => "Mid-C",
            Self::LargeA => "Large-A",
            Self::LargeB => "Large-B",
            Self::LargeC => "Large-C",
            Self::Mega => "Mega",
        }
    }

    /// Shade index (0 = neutral, 1..=4 = increasingly dark) for map markers.
    pub fn shade(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Micro | Self::Small => 1,
            Self::MidA | Self::MidB | Self::MidC => 2,
            Self::LargeA | Self::LargeB | Self::LargeC => 3,
            Self::Mega => 4,
        }
    }
}

/// Attach `category` and `shade` to a venue row, in place.
pub fn annotate_venue(venue: &mut Record) -> CapacityTier {
    let capacity = numeric_field(venue, "capacity")
        .filter(|c| *c >= 0.0)
        .map(|c| c as u64);
    let tier = CapacityTier::from_capacity(capacity);
    venue.insert("category".into(), tier.label().into());
    venue.insert("shade".into(), tier.shade().into());
    tier
}
