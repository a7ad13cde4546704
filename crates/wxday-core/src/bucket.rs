//! Per-day bucketing of forecast samples

use crate::classify::{classify_day_part, WeekdayClassifier};
use crate::icons::ConditionIconMapper;
use crate::types::{DayPart, ForecastEntry, Sample, WeekdayKey};

/// Fold state threaded through one bucketing pass
#[derive(Debug)]
struct BucketFold {
    last_emitted: Option<WeekdayKey>,
    entries: Vec<ForecastEntry>,
}

/// Picks one representative sample per day for a day-part
pub struct ForecastBucketer<'a> {
    weekdays: &'a WeekdayClassifier,
    icons: &'a ConditionIconMapper,
}

impl<'a> ForecastBucketer<'a> {
    pub fn new(weekdays: &'a WeekdayClassifier, icons: &'a ConditionIconMapper) -> Self {
        Self { weekdays, icons }
    }

    /// Scan `samples` in order and emit one entry per day for `part`
    ///
    /// The day of the freshest sample (the first one) is today and produces
    /// no entry; the current snapshot covers it. On every other day the
    /// first sample in `part` wins. Unknown condition codes get
    /// `fallback_icon`.
    pub fn bucket(
        &self,
        samples: &[Sample],
        part: DayPart,
        fallback_icon: &str,
    ) -> Vec<ForecastEntry> {
        let today = BucketFold {
            last_emitted: samples.first().map(|s| self.weekdays.classify(s.timestamp)),
            entries: Vec::new(),
        };
        samples
            .iter()
            .fold(today, |fold, sample| {
                self.step(fold, sample, part, fallback_icon)
            })
            .entries
    }

    fn step(
        &self,
        mut fold: BucketFold,
        sample: &Sample,
        part: DayPart,
        fallback_icon: &str,
    ) -> BucketFold {
        if classify_day_part(sample.hour) != Some(part) {
            return fold;
        }

        let day = self.weekdays.classify(sample.timestamp);
        if fold.last_emitted == Some(day) {
            return fold;
        }

        let icon = self.icons.icon_for(&sample.condition_code, fallback_icon);
        let entry = ForecastEntry::from_reading(day.label(), icon, sample.temperature);
        fold.entries.push(entry);
        fold.last_emitted = Some(day);
        fold
    }
}
