//! Decoding of "5-day / 3-hour" forecast payloads into samples
//!
//! The `list` container is the only structural requirement. Every element
//! of it is decoded on its own so a single broken slot costs one sample,
//! not the batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::classify::{parse_dt_txt, parse_epoch, WeekdayClassifier};
use crate::types::Sample;
use crate::units::PayloadUnits;
use crate::{EngineError, EngineResult};

/// City block of the payload, passed through to the output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityInfo {
    pub id: Option<i64>,
    pub name: String,
    pub coord: Option<Coord>,
    pub country: Option<String>,

    /// Offset from UTC in seconds
    pub timezone: Option<i64>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    dt: Option<f64>,
    main: Option<RawMain>,
    #[serde(default)]
    weather: Vec<RawCondition>,
    dt_txt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    icon: Option<String>,
}

/// Samples recovered from one payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBatch {
    pub samples: Vec<Sample>,
    pub dropped: usize,
    pub city: Option<CityInfo>,
}

pub struct PayloadDecoder<'a> {
    weekdays: &'a WeekdayClassifier,
    units: PayloadUnits,
}

impl<'a> PayloadDecoder<'a> {
    pub fn new(weekdays: &'a WeekdayClassifier, units: PayloadUnits) -> Self {
        Self { weekdays, units }
    }

    pub fn decode(&self, payload: &Value) -> EngineResult<DecodedBatch> {
        let list = payload
            .get("list")
            .and_then(Value::as_array)
            .ok_or_else(|| EngineError::InvalidPayload("missing \"list\" array".to_string()))?;

        let mut batch = DecodedBatch {
            samples: Vec::with_capacity(list.len()),
            dropped: 0,
            city: decode_city(payload),
        };

        for (index, element) in list.iter().enumerate() {
            match self.decode_sample(element) {
                Ok(sample) => batch.samples.push(sample),
                Err(e) => {
                    warn!(index, error = %e, "dropping forecast sample");
                    batch.dropped += 1;
                }
            }
        }

        Ok(batch)
    }

    /// Decode one element of the payload's `list`
    pub fn decode_sample(&self, element: &Value) -> EngineResult<Sample> {
        let raw = RawSample::deserialize(element)
            .map_err(|e| EngineError::Parse(format!("malformed sample: {}", e)))?;

        let timestamp = match (raw.dt, raw.dt_txt.as_deref()) {
            (Some(dt), _) if dt.is_finite() => parse_epoch(dt.trunc() as i64)?,
            (Some(dt), _) => return Err(EngineError::Parse(format!("invalid dt: {}", dt))),
            (None, Some(text)) => parse_dt_txt(text)?,
            (None, None) => return Err(EngineError::Parse("sample has no timestamp".to_string())),
        };

        let temperature = raw
            .main
            .and_then(|m| m.temp)
            .filter(|t| t.is_finite())
            .ok_or_else(|| EngineError::Parse("missing main.temp".to_string()))?;

        let condition_code = raw
            .weather
            .into_iter()
            .next()
            .and_then(|w| w.icon)
            .ok_or_else(|| EngineError::Parse("missing weather[0].icon".to_string()))?;

        Ok(Sample::new(
            timestamp,
            self.units.to_celsius(temperature),
            condition_code,
            self.weekdays,
        ))
    }
}

fn decode_city(payload: &Value) -> Option<CityInfo> {
    let city = payload.get("city")?;
    match CityInfo::deserialize(city) {
        Ok(info) => Some(info),
        Err(e) => {
            warn!(error = %e, "ignoring malformed city block");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classifier() -> WeekdayClassifier {
        WeekdayClassifier::new(chrono_tz::UTC)
    }

    fn slot(dt: i64, temp: f64, icon: &str) -> Value {
        json!({
            "dt": dt,
            "main": { "temp": temp, "feels_like": temp, "humidity": 70 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": icon }],
            "dt_txt": "ignored when dt is present"
        })
    }

    #[test]
    fn test_decode_full_payload() {
        let weekdays = classifier();
        let decoder = PayloadDecoder::new(&weekdays, PayloadUnits::Metric);
        let payload = json!({
            "cod": "200",
            "message": 0,
            "cnt": 2,
            "list": [slot(1_704_110_400, 12.3, "01d"), slot(1_704_121_200, 10.0, "02d")],
            "city": {
                "id": 2657896,
                "name": "Zurich",
                "coord": { "lat": 47.3667, "lon": 8.55 },
                "country": "CH",
                "population": 341730,
                "timezone": 3600,
                "sunrise": 1704092170,
                "sunset": 1704123512
            }
        });

        let batch = decoder.decode(&payload).unwrap();
        assert_eq!(batch.samples.len(), 2);
        assert_eq!(batch.dropped, 0);
        assert_eq!(batch.samples[0].hour, 12);
        assert_eq!(batch.samples[0].condition_code, "01d");
        assert_eq!(batch.samples[1].hour, 15);

        let city = batch.city.unwrap();
        assert_eq!(city.name, "Zurich");
        assert_eq!(city.timezone, Some(3600));
    }

    #[test]
    fn test_missing_list_is_invalid() {
        let weekdays = classifier();
        let decoder = PayloadDecoder::new(&weekdays, PayloadUnits::Metric);

        let err = decoder.decode(&json!({ "cod": "200", "cnt": 0 })).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPayload(_)));

        let err = decoder.decode(&json!({ "list": "nope" })).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPayload(_)));
    }

    #[test]
    fn test_broken_samples_are_dropped() {
        let weekdays = classifier();
        let decoder = PayloadDecoder::new(&weekdays, PayloadUnits::Metric);
        let payload = json!({
            "list": [
                slot(1_704_110_400, 12.3, "01d"),
                { "dt_txt": "not a date", "main": { "temp": 3.0 }, "weather": [{ "icon": "01d" }] },
                { "dt": 1_704_121_200, "main": {}, "weather": [{ "icon": "01d" }] },
                { "dt": 1_704_121_200, "main": { "temp": 3.0 }, "weather": [] },
                { "dt": "soon", "main": { "temp": 3.0 }, "weather": [{ "icon": "01d" }] },
                slot(1_704_132_000, 8.0, "04n")
            ]
        });

        let batch = decoder.decode(&payload).unwrap();
        assert_eq!(batch.samples.len(), 2);
        assert_eq!(batch.dropped, 4);
        assert_eq!(batch.samples[1].condition_code, "04n");
        assert!(batch.city.is_none());
    }

    #[test]
    fn test_dt_txt_used_without_dt() {
        let weekdays = classifier();
        let decoder = PayloadDecoder::new(&weekdays, PayloadUnits::Metric);
        let element = json!({
            "main": { "temp": 1.0 },
            "weather": [{ "icon": "13d" }],
            "dt_txt": "2024-01-02 18:00:00"
        });

        let sample = decoder.decode_sample(&element).unwrap();
        assert_eq!(sample.hour, 18);
        assert_eq!(weekdays.classify(sample.timestamp).label(), "TUE");
    }

    #[test]
    fn test_units_are_converted() {
        let weekdays = classifier();

        let kelvin = PayloadDecoder::new(&weekdays, PayloadUnits::Standard);
        let sample = kelvin.decode_sample(&slot(1_704_110_400, 283.15, "01d")).unwrap();
        assert!((sample.temperature - 10.0).abs() < 0.001);

        let fahrenheit = PayloadDecoder::new(&weekdays, PayloadUnits::Imperial);
        let sample = fahrenheit.decode_sample(&slot(1_704_110_400, 50.0, "01d")).unwrap();
        assert!((sample.temperature - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_malformed_city_is_ignored() {
        let weekdays = classifier();
        let decoder = PayloadDecoder::new(&weekdays, PayloadUnits::Metric);
        let payload = json!({ "list": [], "city": { "name": 42 } });

        let batch = decoder.decode(&payload).unwrap();
        assert!(batch.samples.is_empty());
        assert!(batch.city.is_none());
    }
}
