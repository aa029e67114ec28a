use crate::model::coordinate::{lon_lat, Coordinate};
use serde::{Deserialize, Serialize};

/// Active fire reported by the fire-data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fire {
    #[serde(default)]
    pub name: String,
    #[serde(with = "lon_lat")]
    pub location: Coordinate,
}

impl Fire {
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}
