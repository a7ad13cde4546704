//! Core data types for forecast samples and entries

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::classify::WeekdayClassifier;
use crate::payload::CityInfo;

/// Fixed window of the day a forecast entry stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    /// Hours 9 to 16 inclusive
    Noon,
    /// Hours 17 to 23 inclusive
    Evening,
}

impl DayPart {
    pub const ALL: [DayPart; 2] = [DayPart::Noon, DayPart::Evening];

    /// Hour-of-day range covered by this day-part (end exclusive)
    pub fn hours(&self) -> Range<u32> {
        match self {
            DayPart::Noon => 9..17,
            DayPart::Evening => 17..24,
        }
    }
}

impl fmt::Display for DayPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPart::Noon => write!(f, "noon"),
            DayPart::Evening => write!(f, "evening"),
        }
    }
}

/// Identifies the calendar day a sample falls on in the configured zone
///
/// Two samples belong to the same day exactly when their keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekdayKey {
    date: NaiveDate,
}

impl WeekdayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Three-letter uppercase label, e.g. `"MON"`
    pub fn label(&self) -> String {
        self.weekday().to_string().to_uppercase()
    }
}

/// One validated 3-hour forecast slot
///
/// Built once from a payload element and never mutated afterwards.
/// `temperature` is already in degrees Celsius and `hour` is the
/// hour-of-day of `timestamp` in the engine's time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub condition_code: String,
    pub hour: u32,
}

impl Sample {
    pub fn new(
        timestamp: DateTime<Utc>,
        temperature: f64,
        condition_code: impl Into<String>,
        weekdays: &WeekdayClassifier,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            condition_code: condition_code.into(),
            hour: weekdays.hour_of(timestamp),
        }
    }
}

/// The forecast shown for one weekday and day-part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub weekday_label: String,
    pub icon_id: String,
    pub temperature_celsius: i32,
}

impl ForecastEntry {
    pub fn new(
        weekday_label: impl Into<String>,
        icon_id: impl Into<String>,
        temperature_celsius: i32,
    ) -> Self {
        Self {
            weekday_label: weekday_label.into(),
            icon_id: icon_id.into(),
            temperature_celsius,
        }
    }

    /// Build an entry from a Celsius reading, rounding half away from zero
    pub fn from_reading(
        weekday_label: impl Into<String>,
        icon_id: impl Into<String>,
        celsius: f64,
    ) -> Self {
        // `as` saturates; readings are finite by the time they get here
        let rounded = celsius.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
        Self::new(weekday_label, icon_id, rounded)
    }
}

/// The "right now" view for both day-parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSnapshot {
    pub noon: ForecastEntry,
    pub evening: ForecastEntry,
    pub is_night: bool,
}

/// Everything the presentation layer needs from one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub current: CurrentSnapshot,
    pub noon: Vec<ForecastEntry>,
    pub evening: Vec<ForecastEntry>,

    /// Payload elements that could not be turned into samples
    pub dropped_samples: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<CityInfo>,
}

impl ForecastOutput {
    /// Entries the presentation layer lists under the current snapshot
    pub fn visible_entries(&self) -> &[ForecastEntry] {
        if self.current.is_night {
            &self.evening
        } else {
            &self.noon
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_part_hours() {
        assert_eq!(DayPart::Noon.hours(), 9..17);
        assert_eq!(DayPart::Evening.hours(), 17..24);
        assert_eq!(DayPart::Evening.to_string(), "evening");
    }

    #[test]
    fn test_weekday_key_label() {
        // 2024-01-01 was a Monday
        let key = WeekdayKey::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(key.weekday(), Weekday::Mon);
        assert_eq!(key.label(), "MON");

        let key = WeekdayKey::new(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
        assert_eq!(key.label(), "SAT");
    }

    #[test]
    fn test_entry_rounding() {
        assert_eq!(ForecastEntry::from_reading("MON", "x", 12.5).temperature_celsius, 13);
        assert_eq!(ForecastEntry::from_reading("MON", "x", 12.49).temperature_celsius, 12);
        assert_eq!(ForecastEntry::from_reading("MON", "x", -0.5).temperature_celsius, -1);
        assert_eq!(ForecastEntry::from_reading("MON", "x", -3.2).temperature_celsius, -3);

        // Out of range readings pin to the i32 bounds
        assert_eq!(ForecastEntry::from_reading("MON", "x", 1e12).temperature_celsius, i32::MAX);
        assert_eq!(ForecastEntry::from_reading("MON", "x", -1e12).temperature_celsius, i32::MIN);
    }

    #[test]
    fn test_entry_serde() {
        let entry = ForecastEntry::new("TUE", "cloud.fill", 7);
        insta::assert_json_snapshot!(entry, @r###"
        {
          "weekday_label": "TUE",
          "icon_id": "cloud.fill",
          "temperature_celsius": 7
        }
        "###);
    }

    #[test]
    fn test_visible_entries_follow_night_flag() {
        let seed = ForecastEntry::new("", "x", 0);
        let mut output = ForecastOutput {
            current: CurrentSnapshot {
                noon: seed.clone(),
                evening: seed,
                is_night: false,
            },
            noon: vec![ForecastEntry::new("TUE", "a", 1)],
            evening: vec![
                ForecastEntry::new("TUE", "b", 2),
                ForecastEntry::new("WED", "b", 3),
            ],
            dropped_samples: 0,
            city: None,
        };
        assert_eq!(output.visible_entries().len(), 1);

        output.current.is_night = true;
        assert_eq!(output.visible_entries().len(), 2);
    }
}
