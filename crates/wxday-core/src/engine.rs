//! Batch entry point wiring decoder, bucketer and selector together

use chrono_tz::Tz;
use serde_json::Value;
use tracing::{info, instrument};

use crate::bucket::ForecastBucketer;
use crate::classify::WeekdayClassifier;
use crate::current::{CurrentWeatherSelector, SnapshotSeeds};
use crate::icons::ConditionIconMapper;
use crate::payload::{CityInfo, PayloadDecoder};
use crate::types::{DayPart, ForecastOutput, Sample};
use crate::units::PayloadUnits;
use crate::{EngineError, EngineResult};

/// Engine settings resolved from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Zone used for weekdays and hours; never taken from the host
    pub timezone: Tz,
    pub units: PayloadUnits,
    pub seeds: SnapshotSeeds,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Berlin,
            units: PayloadUnits::Metric,
            seeds: SnapshotSeeds::default(),
        }
    }
}

/// Stateless forecast engine
///
/// Each call recomputes the full output from one batch, so a single engine
/// can be shared between sessions.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    settings: EngineSettings,
    weekdays: WeekdayClassifier,
    icons: ConditionIconMapper,
}

impl ForecastEngine {
    pub fn new(settings: EngineSettings, icons: ConditionIconMapper) -> Self {
        Self {
            weekdays: WeekdayClassifier::new(settings.timezone),
            settings,
            icons,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn weekdays(&self) -> &WeekdayClassifier {
        &self.weekdays
    }

    /// Run the engine over a decoded payload
    ///
    /// Fails only when the payload has no `list` array; broken samples are
    /// dropped and counted in `dropped_samples`.
    #[instrument(skip(self, payload))]
    pub fn run(&self, payload: &Value) -> EngineResult<ForecastOutput> {
        let decoder = PayloadDecoder::new(&self.weekdays, self.settings.units);
        let batch = decoder.decode(payload)?;
        Ok(self.compute(&batch.samples, batch.dropped, batch.city))
    }

    /// Run the engine over payload JSON text
    pub fn run_str(&self, json: &str) -> EngineResult<ForecastOutput> {
        let payload: Value = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidPayload(format!("not valid JSON: {}", e)))?;
        self.run(&payload)
    }

    /// Run the engine over samples that are already decoded
    pub fn run_samples(&self, samples: &[Sample]) -> ForecastOutput {
        self.compute(samples, 0, None)
    }

    fn compute(
        &self,
        samples: &[Sample],
        dropped: usize,
        city: Option<CityInfo>,
    ) -> ForecastOutput {
        let mut ordered = samples.to_vec();
        ordered.sort_by_key(|s| s.timestamp);

        let seeds = &self.settings.seeds;
        let bucketer = ForecastBucketer::new(&self.weekdays, &self.icons);
        let noon = bucketer.bucket(&ordered, DayPart::Noon, &seeds.noon.icon_id);
        let evening = bucketer.bucket(&ordered, DayPart::Evening, &seeds.evening.icon_id);

        let selector = CurrentWeatherSelector::new(&self.weekdays, &self.icons, seeds);
        let selection = selector.select(&ordered, noon, evening);

        info!(
            samples = ordered.len(),
            dropped,
            noon = selection.noon.len(),
            evening = selection.evening.len(),
            is_night = selection.current.is_night,
            "forecast batch processed"
        );

        ForecastOutput {
            current: selection.current,
            noon: selection.noon,
            evening: selection.evening,
            dropped_samples: dropped,
            city,
        }
    }
}
