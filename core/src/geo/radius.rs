use crate::prelude::{FireError, FireResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Proximity threshold in miles. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Radius(f64);

impl Radius {
    pub fn from_miles(miles: f64) -> FireResult<Self> {
        if !miles.is_finite() {
            return Err(FireError::field("radius", "Radius must be a number of miles"));
        }
        if miles < 0.0 {
            return Err(FireError::field("radius", "Radius cannot be negative"));
        }
        Ok(Self(miles))
    }

    /// Parses user input such as `"25"` or `" 12.5 "`.
    pub fn parse(input: &str) -> FireResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FireError::field("radius", "Radius is required"));
        }
        let miles = trimmed
            .parse::<f64>()
            .map_err(|_| FireError::field("radius", "Radius must be a number of miles"))?;
        Self::from_miles(miles)
    }

    pub fn miles(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Radius {
    type Error = FireError;

    fn try_from(miles: f64) -> FireResult<Self> {
        Self::from_miles(miles)
    }
}

impl From<Radius> for f64 {
    fn from(radius: Radius) -> f64 {
        radius.0
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mi", self.0)
    }
}

/// Serde adapter for server-supplied radii, which arrive as numbers or
/// numeric strings. Values that fail to parse decode as `None`.
pub mod lenient {
    use super::Radius;
    use log::warn;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Radius>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        let parsed = match &value {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(number)) => number
                .as_f64()
                .ok_or(())
                .and_then(|miles| Radius::from_miles(miles).map_err(|_| ())),
            Some(Value::String(text)) => Radius::parse(text).map_err(|_| ()),
            Some(_) => Err(()),
        };
        match parsed {
            Ok(radius) => Ok(Some(radius)),
            Err(()) => {
                warn!("ignoring unusable radius {:?}", value);
                Ok(None)
            }
        }
    }
}
