//! Temperature unit handling for forecast payloads
//!
//! The provider reports temperatures in the unit system requested by the
//! fetch; the engine works in Celsius only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit conversion error
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown unit system: {0}")]
    UnknownUnitSystem(String),
}

/// Unit system of the temperatures in a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadUnits {
    /// Degrees Celsius
    #[default]
    Metric,
    /// Kelvin, the provider's default when no unit is requested
    Standard,
    /// Degrees Fahrenheit
    Imperial,
}

impl PayloadUnits {
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            PayloadUnits::Metric => value,
            PayloadUnits::Standard => value - 273.15,
            PayloadUnits::Imperial => (value - 32.0) * 5.0 / 9.0,
        }
    }
}

impl fmt::Display for PayloadUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadUnits::Metric => write!(f, "metric"),
            PayloadUnits::Standard => write!(f, "standard"),
            PayloadUnits::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for PayloadUnits {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" => Ok(PayloadUnits::Metric),
            "standard" | "kelvin" => Ok(PayloadUnits::Standard),
            "imperial" => Ok(PayloadUnits::Imperial),
            _ => Err(UnitError::UnknownUnitSystem(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_conversion() {
        assert_eq!(PayloadUnits::Metric.to_celsius(21.5), 21.5);

        // 273.15K = 0C
        assert!(PayloadUnits::Standard.to_celsius(273.15).abs() < 0.001);
        assert!((PayloadUnits::Standard.to_celsius(300.0) - 26.85).abs() < 0.001);

        // 32F = 0C, 212F = 100C
        assert!(PayloadUnits::Imperial.to_celsius(32.0).abs() < 0.001);
        assert!((PayloadUnits::Imperial.to_celsius(212.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_unit_system() {
        assert_eq!("metric".parse::<PayloadUnits>().unwrap(), PayloadUnits::Metric);
        assert_eq!("Imperial".parse::<PayloadUnits>().unwrap(), PayloadUnits::Imperial);
        assert_eq!("kelvin".parse::<PayloadUnits>().unwrap(), PayloadUnits::Standard);
        assert!(matches!(
            "rankine".parse::<PayloadUnits>(),
            Err(UnitError::UnknownUnitSystem(_))
        ));
    }
}
