//! Code for working with calendar months.
use crate::units::Hours;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of days in each month of a non-leap year
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A calendar month, numbered from 1 (January) to 12 (December)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Month(u32);

impl Month {
    /// Create a new [`Month`], checking that it is in the range 1-12
    pub fn new(number: u32) -> Result<Self> {
        ensure!(
            (1..=12).contains(&number),
            "Month must be between 1 and 12 (got {number})"
        );

        Ok(Self(number))
    }

    /// The month number, from 1 to 12
    pub fn number(self) -> u32 {
        self.0
    }

    /// Number of days in this month for the given year
    pub fn days(self, year: u32) -> u32 {
        if self.0 == 2 && is_leap_year(year) {
            29
        } else {
            DAYS_IN_MONTH[(self.0 - 1) as usize]
        }
    }

    /// Number of hours in this month for the given year
    pub fn hours(self, year: u32) -> Hours {
        Hours(f64::from(self.days(year) * 24))
    }
}

impl TryFrom<u32> for Month {
    type Error = anyhow::Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Month> for u32 {
    fn from(value: Month) -> Self {
        value.0
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether `year` is a leap year in the Gregorian calendar
pub fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
