//! Sampling frequency and its seasonal period.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDateTime, TimeDelta};

use crate::error::SeriesError;

/// Sampling frequency of a series.
///
/// Each frequency carries a fixed seasonal period `s` used for seasonal
/// differencing, seasonal ACF/PACF lags and the seasonal model order.
/// The constants are domain conventions, not estimated from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// One observation per hour, `s = 24`.
    Hourly,
    /// One observation per day, `s = 30`.
    Daily,
    /// One observation per calendar month, `s = 12`.
    Monthly,
    /// One observation per calendar quarter, `s = 4`.
    Quarterly,
    /// One observation per calendar year, `s = 10`.
    Yearly,
}

impl Frequency {
    /// All frequencies in ascending period length.
    pub const ALL: [Frequency; 5] = [
        Frequency::Hourly,
        Frequency::Daily,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];

    /// Seasonal period `s` for this frequency.
    pub fn seasonality(self) -> usize {
        match self {
            Frequency::Hourly => 24,
            Frequency::Daily => 30,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Yearly => 10,
        }
    }

    /// Lower-case label, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }

    /// Advances `ts` by `steps` periods.
    ///
    /// Calendar frequencies add whole months, so a month-end start clamps to
    /// the last valid day of the target month (Jan 31 + 1 month = Feb 28/29).
    /// Stepping is always computed from `ts`, so repeated calls do not drift.
    pub fn advance(self, ts: NaiveDateTime, steps: usize) -> Result<NaiveDateTime, SeriesError> {
        let overflow = || SeriesError::TimestampOverflow { steps };
        let n = i64::try_from(steps).map_err(|_| overflow())?;
        let months = |per: u32| -> Result<NaiveDateTime, SeriesError> {
            let total = u32::try_from(steps)
                .ok()
                .and_then(|s| s.checked_mul(per))
                .ok_or_else(overflow)?;
            ts.checked_add_months(Months::new(total)).ok_or_else(overflow)
        };
        match self {
            Frequency::Hourly => TimeDelta::try_hours(n)
                .and_then(|d| ts.checked_add_signed(d))
                .ok_or_else(overflow),
            Frequency::Daily => TimeDelta::try_days(n)
                .and_then(|d| ts.checked_add_signed(d))
                .ok_or_else(overflow),
            Frequency::Monthly => months(1),
            Frequency::Quarterly => months(3),
            Frequency::Yearly => months(12),
        }
    }

    /// Returns the `horizon` timestamps that follow `last`.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use kairos_series::Frequency;
    ///
    /// let last = NaiveDate::from_ymd_opt(2020, 11, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// let next = Frequency::Monthly.future_index(last, 2).unwrap();
    /// assert_eq!(next[1].date(), NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
    /// ```
    pub fn future_index(
        self,
        last: NaiveDateTime,
        horizon: usize,
    ) -> Result<Vec<NaiveDateTime>, SeriesError> {
        (1..=horizon).map(|k| self.advance(last, k)).collect()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frequency {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "h" => Ok(Frequency::Hourly),
            "daily" | "d" => Ok(Frequency::Daily),
            "monthly" | "m" => Ok(Frequency::Monthly),
            "quarterly" | "q" => Ok(Frequency::Quarterly),
            "yearly" | "annual" | "y" => Ok(Frequency::Yearly),
            _ => Err(SeriesError::UnknownFrequency { name: s.to_string() }),
        }
    }
}
