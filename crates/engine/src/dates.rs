//! Calendar helpers.
//!
//! Everything in the engine works on [`NaiveDate`]: a day with no time of
//! day and no offset. Timestamps are turned into dates exactly once, at the
//! boundary, through [`local_date`] and the configured zone.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{EngineError, ResultEngine};

/// Zone the tracker's users live in (GMT+7).
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Ho_Chi_Minh;

/// Calendar day of `at` as seen from `tz`.
#[must_use]
pub fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Today as seen from `tz`.
#[must_use]
pub fn today(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

#[must_use]
pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// A calendar month, e.g. `2025-04`.
///
/// Internally the first day of the month, so ordering and hashing follow
/// the calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Builds a month, rejecting `month` outside `1..=12`.
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Month)
            .ok_or_else(|| EngineError::InvalidDate(format!("invalid month: {year}-{month:02}")))
    }

    /// Month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        // Day 1 always exists for a month that contains `date`.
        Month(date - Days::new(u64::from(date.day0())))
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.0 + Days::new(u64::from(self.days() - 1))
    }

    /// Number of calendar days (28 to 31).
    #[must_use]
    pub fn days(self) -> u32 {
        match self.month() {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ if self.0.leap_year() => 29,
            _ => 28,
        }
    }

    /// Inclusive on both ends.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    /// Every day of the month in order.
    pub fn dates(self) -> impl Iterator<Item = NaiveDate> {
        self.0.iter_days().take(self.days() as usize)
    }

    /// Days that are not Sundays.
    #[must_use]
    pub fn working_days(self) -> u32 {
        self.dates().filter(|date| !is_sunday(*date)).count() as u32
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.offset(-1)
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.offset(1)
    }

    /// Moves `months` forward (or backward when negative).
    #[must_use]
    pub fn offset(self, months: i32) -> Option<Self> {
        let shift = Months::new(months.unsigned_abs());
        let moved = if months >= 0 {
            self.0.checked_add_months(shift)
        } else {
            self.0.checked_sub_months(shift)
        };
        moved.map(Month)
    }

    /// `window` consecutive months ending at `self`, oldest first.
    ///
    /// Stops early only if the calendar runs out.
    #[must_use]
    pub fn window_ending_here(self, window: usize) -> Vec<Self> {
        let mut months: Vec<Self> = std::iter::successors(Some(self), |month| month.previous())
            .take(window)
            .collect();
        months.reverse();
        months
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = EngineError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidDate(format!("invalid month: {s}"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month)
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Month::of(date)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_follow_the_calendar() {
        let feb_leap = Month::new(2024, 2).unwrap();
        assert_eq!(feb_leap.days(), 29);
        assert_eq!(feb_leap.last_day(), date(2024, 2, 29));

        let feb = Month::new(2025, 2).unwrap();
        assert_eq!(feb.days(), 28);

        let dec = Month::new(2025, 12).unwrap();
        assert_eq!(dec.first_day(), date(2025, 12, 1));
        assert_eq!(dec.last_day(), date(2025, 12, 31));
    }

    #[test]
    fn contains_is_inclusive() {
        let april = Month::new(2025, 4).unwrap();
        assert!(april.contains(date(2025, 4, 1)));
        assert!(april.contains(date(2025, 4, 30)));
        assert!(!april.contains(date(2025, 5, 1)));
        assert!(!april.contains(date(2025, 3, 31)));
    }

    #[test]
    fn offsets_cross_year_boundaries() {
        let jan = Month::new(2025, 1).unwrap();
        assert_eq!(jan.previous(), Some(Month::new(2024, 12).unwrap()));
        assert_eq!(jan.offset(-13), Some(Month::new(2023, 12).unwrap()));
        assert_eq!(jan.offset(12), Some(Month::new(2026, 1).unwrap()));
    }

    #[test]
    fn window_is_oldest_first() {
        let march = Month::new(2025, 3).unwrap();
        let window = march.window_ending_here(3);
        assert_eq!(
            window,
            vec![
                Month::new(2025, 1).unwrap(),
                Month::new(2025, 2).unwrap(),
                march
            ]
        );
        assert!(march.window_ending_here(0).is_empty());
    }

    #[test]
    fn working_days_skip_sundays() {
        // April 2025 has 30 days and four Sundays.
        assert_eq!(Month::new(2025, 4).unwrap().working_days(), 26);
        // June 2025 starts on a Sunday and has five.
        assert_eq!(Month::new(2025, 6).unwrap().working_days(), 25);
    }

    #[test]
    fn parse_and_display_round_trip_format() {
        let month: Month = "2025-04".parse().unwrap();
        assert_eq!(month.to_string(), "2025-04");
        assert!("2025-13".parse::<Month>().is_err());
        assert!("2025-4".parse::<Month>().is_err());
        assert!("april".parse::<Month>().is_err());
    }

    #[test]
    fn month_of_any_day() {
        assert_eq!(Month::of(date(2025, 4, 17)), Month::new(2025, 4).unwrap());
    }

    #[test]
    fn local_date_uses_the_zone_not_utc() {
        // 18:30 UTC on the 30th is already the 1st in GMT+7.
        let at = Utc.with_ymd_and_hms(2025, 4, 30, 18, 30, 0).unwrap();
        assert_eq!(local_date(at, DEFAULT_TIMEZONE), date(2025, 5, 1));
        assert_eq!(local_date(at, chrono_tz::UTC), date(2025, 4, 30));
    }
}
