//! Lookback periods accepted by the market-data collaborator.

use chrono::{Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
    FiveYears,
    Max,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::FiveYears,
        Period::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }

    fn months(&self) -> Option<u32> {
        match self {
            Period::OneMonth => Some(1),
            Period::ThreeMonths => Some(3),
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::FiveYears => Some(60),
            Period::Max => None,
        }
    }

    /// First date (exclusive) covered when the window ends on `end`.
    /// `None` means unbounded.
    pub fn start_before(&self, end: NaiveDate) -> Option<NaiveDate> {
        self.months()
            .and_then(|m| end.checked_sub_months(Months::new(m)))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown period '{}' (expected one of 1mo, 3mo, 6mo, 1y, 5y, max)",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_agree() {
        for p in Period::ALL {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), p);
            assert_eq!(p.to_string(), p.as_str());
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("6MO".parse::<Period>().unwrap(), Period::SixMonths);
        assert_eq!(" Max ".parse::<Period>().unwrap(), Period::Max);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("2w".parse::<Period>().is_err());
    }

    #[test]
    fn default_is_six_months() {
        assert_eq!(Period::default(), Period::SixMonths);
    }

    #[test]
    fn start_before_end() {
        let end = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
        assert_eq!(
            Period::SixMonths.start_before(end),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            Period::OneYear.start_before(end),
            NaiveDate::from_ymd_opt(2023, 8, 31)
        );
        assert_eq!(Period::Max.start_before(end), None);
    }
}
