//! Day-part and weekday classification of sample timestamps

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::types::{DayPart, WeekdayKey};
use crate::{EngineError, EngineResult};

/// Format of the payload's `dt_txt` field
pub const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Map an hour-of-day to its day-part
///
/// Hours outside both windows (00-08, and anything past 23) have none.
pub fn classify_day_part(hour: u32) -> Option<DayPart> {
    match hour {
        9..=16 => Some(DayPart::Noon),
        17..=23 => Some(DayPart::Evening),
        _ => None,
    }
}

/// Convert epoch seconds into an instant
pub fn parse_epoch(secs: i64) -> EngineResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| EngineError::Parse(format!("timestamp out of range: {}", secs)))
}

/// Parse a `dt_txt` string, which the provider reports in UTC
pub fn parse_dt_txt(text: &str) -> EngineResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, DT_TXT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| EngineError::Parse(format!("invalid dt_txt {:?}: {}", text, e)))
}

/// Resolves instants to calendar days in one fixed time zone
///
/// The zone is injected once and never read from the environment, so two
/// classifiers built with the same zone always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayClassifier {
    tz: Tz,
}

impl WeekdayClassifier {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn classify(&self, timestamp: DateTime<Utc>) -> WeekdayKey {
        WeekdayKey::new(timestamp.with_timezone(&self.tz).date_naive())
    }

    pub fn classify_epoch(&self, secs: i64) -> EngineResult<WeekdayKey> {
        parse_epoch(secs).map(|ts| self.classify(ts))
    }

    pub fn classify_text(&self, text: &str) -> EngineResult<WeekdayKey> {
        parse_dt_txt(text).map(|ts| self.classify(ts))
    }

    /// Hour-of-day of `timestamp` in this classifier's zone
    pub fn hour_of(&self, timestamp: DateTime<Utc>) -> u32 {
        timestamp.with_timezone(&self.tz).hour()
    }
}
