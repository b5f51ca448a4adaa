//! OECD working-hours reference tables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static benchmark hours for one granularity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceBand {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Annual hours: OECD average ~1752h, Germany ~1340h, Mexico/Colombia ~2206h
pub const OECD_YEARLY: ReferenceBand = ReferenceBand {
    avg: 1752.0,
    min: 1340.0,
    max: 2206.0,
};

pub const OECD_MONTHLY: ReferenceBand = ReferenceBand {
    avg: 146.0,
    min: 111.7,
    max: 183.8,
};

pub const OECD_DAILY: ReferenceBand = ReferenceBand {
    avg: 6.7,
    min: 5.2,
    max: 8.5,
};

/// Aggregation granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Day, Granularity::Month, Granularity::Year];

    /// Number of windows shown when the caller does not ask for a count
    pub fn default_count(self) -> usize {
        match self {
            Granularity::Day => 7,
            Granularity::Month => 6,
            Granularity::Year => 3,
        }
    }

    pub fn reference(self) -> ReferenceBand {
        match self {
            Granularity::Day => OECD_DAILY,
            Granularity::Month => OECD_MONTHLY,
            Granularity::Year => OECD_YEARLY,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "daily" | "d" => Ok(Granularity::Day),
            "month" | "monthly" | "m" => Ok(Granularity::Month),
            "year" | "yearly" | "y" => Ok(Granularity::Year),
            other => Err(format!("Unknown granularity: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_counts() {
        assert_eq!(Granularity::Day.default_count(), 7);
        assert_eq!(Granularity::Month.default_count(), 6);
        assert_eq!(Granularity::Year.default_count(), 3);
    }

    #[test]
    fn reference_bands_are_ordered() {
        for granularity in Granularity::ALL {
            let band = granularity.reference();
            assert!(band.min < band.avg, "{granularity}: min >= avg");
            assert!(band.avg < band.max, "{granularity}: avg >= max");
        }
    }

    #[test]
    fn parse_granularity() {
        assert_eq!("daily".parse::<Granularity>().unwrap(), Granularity::Day);
        assert_eq!("Month".parse::<Granularity>().unwrap(), Granularity::Month);
        assert_eq!("y".parse::<Granularity>().unwrap(), Granularity::Year);
        assert!("week".parse::<Granularity>().is_err());
    }
}
