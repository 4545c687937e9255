//! Shared primitive types used across the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A gameweek number. One event = one league scoring week, 1..=38.
pub type Event = u32;

/// An upstream manager entry id.
pub type TeamId = u64;

/// An upstream player ("element") id.
pub type PlayerId = u32;

/// First gameweek of the second season half. League-wide, never per team.
pub const SECOND_HALF_START: Event = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SeasonHalf {
    First,  // GW1-19
    Second, // GW20-38
}

impl SeasonHalf {
    pub const ALL: [SeasonHalf; 2] = [SeasonHalf::First, SeasonHalf::Second];

    pub fn of(event: Event) -> Self {
        if event >= SECOND_HALF_START {
            SeasonHalf::Second
        } else {
            SeasonHalf::First
        }
    }

    pub fn contains(&self, event: Event) -> bool {
        Self::of(event) == *self
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            SeasonHalf::First => 0,
            SeasonHalf::Second => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeasonHalf::First => "GW1-19",
            SeasonHalf::Second => "GW20-38",
        }
    }
}

/// Money in tenths of a million, the unit upstream reports prices in.
/// Integer storage keeps every delta exact to one decimal place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Price(pub i32);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_tenths(tenths: i32) -> Self {
        Price(tenths)
    }

    /// Round a float amount in millions to the nearest tenth.
    pub fn from_millions(millions: f64) -> Self {
        Price((millions * 10.0).round() as i32)
    }

    pub fn tenths(&self) -> i32 {
        self.0
    }

    pub fn as_millions(&self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl Add for Price {
    type Output = Price;
    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Price;
    fn sub(self, rhs: Price) -> Price {
        Price(self.0 - rhs.0)
    }
}

impl Neg for Price {
    type Output = Price;
    fn neg(self) -> Price {
        Price(-self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}£{}.{}m", abs / 10, abs % 10)
    }
}
