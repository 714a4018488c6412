use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Calendar month identifier, serialized in the `yyyy-MM` wire format used
/// by transfer rows and dashboard keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    /// Last day of the month.
    pub fn end_date(&self) -> NaiveDate {
        let last = days_in_month(self.year, self.month);
        NaiveDate::from_ymd_opt(self.year, self.month, last).unwrap()
    }

    pub fn shift(&self, months: i32) -> Self {
        let mut year = self.year;
        let mut month = self.month as i32 + months;
        while month > 12 {
            month -= 12;
            year += 1;
        }
        while month < 1 {
            month += 12;
            year -= 1;
        }
        Self {
            year,
            month: month as u32,
        }
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    /// Number of whole months from `self` to `other` (negative when
    /// `other` precedes `self`).
    pub fn months_until(&self, other: MonthKey) -> i32 {
        (other.year - self.year) * 12 + other.month as i32 - self.month as i32
    }

    /// Inclusive chronological axis from `past_months` before `reference`
    /// through `forecast_months - 1` after it (the reference month counts
    /// as the first forward month).
    pub fn axis(reference: MonthKey, past_months: u32, forecast_months: u32) -> Vec<MonthKey> {
        let start = reference.shift(-(past_months as i32));
        let total = past_months + forecast_months.max(1);
        (0..total as i32).map(|step| start.shift(step)).collect()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (year_part, month_part) = raw
            .split_once('-')
            .ok_or_else(|| format!("invalid month key `{raw}`"))?;
        let year: i32 = year_part
            .parse()
            .map_err(|_| format!("invalid month key `{raw}`"))?;
        let month: u32 = month_part
            .parse()
            .map_err(|_| format!("invalid month key `{raw}`"))?;
        MonthKey::new(year, month).ok_or_else(|| format!("invalid month key `{raw}`"))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Shifts a date by whole months, clamping the day to the target month's
/// length (Jan 31 + 1 month = Feb 28/29).
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let key = MonthKey::from_date(date).shift(months);
    let day = date.day().min(days_in_month(key.year, key.month));
    NaiveDate::from_ymd_opt(key.year, key.month, day).unwrap()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_wire_format_roundtrip() {
        let key = MonthKey::new(2024, 3).unwrap();
        assert_eq!(key.to_string(), "2024-03");
        assert_eq!("2024-03".parse::<MonthKey>().unwrap(), key);
        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("march".parse::<MonthKey>().is_err());
    }

    #[test]
    fn shift_wraps_across_year_boundaries() {
        let nov = MonthKey::new(2024, 11).unwrap();
        assert_eq!(nov.shift(3), MonthKey::new(2025, 2).unwrap());
        assert_eq!(nov.shift(-11), MonthKey::new(2023, 12).unwrap());
    }

    #[test]
    fn axis_spans_past_and_forward_months() {
        let reference = MonthKey::new(2024, 6).unwrap();
        let axis = MonthKey::axis(reference, 2, 3);
        assert_eq!(axis.len(), 5);
        assert_eq!(axis[0], MonthKey::new(2024, 4).unwrap());
        assert_eq!(axis[2], reference);
        assert_eq!(axis[4], MonthKey::new(2024, 8).unwrap());
    }

    #[test]
    fn shift_month_clamps_to_month_end() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            shift_month(jan31, 1),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(days_in_month(2023, 2), 28);
    }
}
