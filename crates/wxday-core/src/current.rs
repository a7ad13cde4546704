//! Selection of the "current weather" snapshot

use serde::{Deserialize, Serialize};

use crate::classify::{classify_day_part, WeekdayClassifier};
use crate::icons::ConditionIconMapper;
use crate::types::{CurrentSnapshot, DayPart, ForecastEntry, Sample};

pub const DEFAULT_NOON_ICON: &str = "cloud.sun.fill";
pub const DEFAULT_NOON_TEMPERATURE: i32 = 24;
pub const DEFAULT_EVENING_ICON: &str = "moon.stars.fill";
pub const DEFAULT_EVENING_TEMPERATURE: i32 = 10;

/// Current entries shown before a batch supplies real ones
///
/// Their icons double as the fallback for unknown condition codes in the
/// matching day-part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSeeds {
    pub noon: ForecastEntry,
    pub evening: ForecastEntry,
}

impl SnapshotSeeds {
    pub fn for_part(&self, part: DayPart) -> &ForecastEntry {
        match part {
            DayPart::Noon => &self.noon,
            DayPart::Evening => &self.evening,
        }
    }

    /// Snapshot used when a batch holds no samples at all
    pub fn snapshot(&self) -> CurrentSnapshot {
        CurrentSnapshot {
            noon: self.noon.clone(),
            evening: self.evening.clone(),
            is_night: false,
        }
    }
}

impl Default for SnapshotSeeds {
    fn default() -> Self {
        Self {
            noon: ForecastEntry::new("", DEFAULT_NOON_ICON, DEFAULT_NOON_TEMPERATURE),
            evening: ForecastEntry::new("", DEFAULT_EVENING_ICON, DEFAULT_EVENING_TEMPERATURE),
        }
    }
}

/// Result of a selection: the snapshot plus the possibly shortened lists
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub current: CurrentSnapshot,
    pub noon: Vec<ForecastEntry>,
    pub evening: Vec<ForecastEntry>,
}

/// Derives the current snapshot from the freshest sample of a batch
pub struct CurrentWeatherSelector<'a> {
    weekdays: &'a WeekdayClassifier,
    icons: &'a ConditionIconMapper,
    seeds: &'a SnapshotSeeds,
}

impl<'a> CurrentWeatherSelector<'a> {
    pub fn new(
        weekdays: &'a WeekdayClassifier,
        icons: &'a ConditionIconMapper,
        seeds: &'a SnapshotSeeds,
    ) -> Self {
        Self {
            weekdays,
            icons,
            seeds,
        }
    }

    /// Build the snapshot for `samples` against already bucketed lists
    ///
    /// The first sample of the batch is the freshest one. For each day-part
    /// the first sample on that same day wins. Without one, noon borrows the
    /// head of `noon` (which is then removed so the day is not listed
    /// twice) and evening keeps its seed.
    pub fn select(
        &self,
        samples: &[Sample],
        mut noon: Vec<ForecastEntry>,
        evening: Vec<ForecastEntry>,
    ) -> Selection {
        let Some(latest) = samples.first() else {
            return Selection {
                current: self.seeds.snapshot(),
                noon,
                evening,
            };
        };

        let is_night = classify_day_part(latest.hour) != Some(DayPart::Noon);

        let current_noon = match self.today_entry(samples, latest, DayPart::Noon) {
            Some(entry) => entry,
            None if !noon.is_empty() => noon.remove(0),
            None => self.seeds.noon.clone(),
        };

        let current_evening = self
            .today_entry(samples, latest, DayPart::Evening)
            .unwrap_or_else(|| self.seeds.evening.clone());

        Selection {
            current: CurrentSnapshot {
                noon: current_noon,
                evening: current_evening,
                is_night,
            },
            noon,
            evening,
        }
    }

    fn today_entry(
        &self,
        samples: &[Sample],
        latest: &Sample,
        part: DayPart,
    ) -> Option<ForecastEntry> {
        let today = self.weekdays.classify(latest.timestamp);
        samples
            .iter()
            .find(|s| {
                classify_day_part(s.hour) == Some(part)
                    && self.weekdays.classify(s.timestamp) == today
            })
            .map(|s| {
                let icon = self
                    .icons
                    .icon_for(&s.condition_code, &self.seeds.for_part(part).icon_id);
                ForecastEntry::from_reading(today.label(), icon, s.temperature)
            })
    }
}
