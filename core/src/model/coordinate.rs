use serde::{Deserialize, Serialize};

/// Geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate from the `[lon, lat]` pair used by the fire-data
    /// and geocoding services.
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Serde adapter for coordinates encoded as `[lon, lat]` arrays.
pub mod lon_lat {
    use super::Coordinate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(coordinate: &Coordinate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        coordinate.to_lon_lat().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Coordinate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pair = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Coordinate::from_lon_lat(pair))
    }
}
