use crate::geo::Radius;
use crate::model::coordinate::Coordinate;
use crate::model::fire::Fire;
use crate::model::location::UserLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Fire,
    /// Alert pin drawn over a fire inside a watched radius.
    LocalFire,
    TempLocation,
    SavedLocation,
}

/// Renderable map pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub kind: MarkerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Marker {
    pub fn fire(fire: &Fire) -> Self {
        Self {
            coordinate: fire.location,
            kind: MarkerKind::Fire,
            label: Some(fire.name.clone()).filter(|name| !name.is_empty()),
        }
    }

    pub fn local_fire(fire: &Fire) -> Self {
        Self {
            kind: MarkerKind::LocalFire,
            ..Self::fire(fire)
        }
    }

    pub fn temp_location(search: &PublicSearch) -> Self {
        Self {
            coordinate: search.coordinate,
            kind: MarkerKind::TempLocation,
            label: Some(search.address.clone()),
        }
    }

    pub fn saved_location(coordinate: Coordinate, address: &str) -> Self {
        Self {
            coordinate,
            kind: MarkerKind::SavedLocation,
            label: Some(address.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    SavedLocation,
    TempLocation,
    FireLocation,
}

/// The pin whose popup is currently open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
    pub radius: Option<Radius>,
    pub kind: SelectionKind,
    pub id: Option<u64>,
    pub notifications: Option<bool>,
}

impl SelectedMarker {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn saved(location: &UserLocation) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            label: Some(location.address.clone()),
            radius: location.radius,
            kind: SelectionKind::SavedLocation,
            id: Some(location.id),
            notifications: Some(location.notifications),
        }
    }

    pub fn temp(search: &PublicSearch) -> Self {
        Self {
            latitude: search.coordinate.latitude,
            longitude: search.coordinate.longitude,
            label: Some(search.address.clone()),
            radius: search.radius,
            kind: SelectionKind::TempLocation,
            id: None,
            notifications: None,
        }
    }

    pub fn fire(fire: &Fire) -> Self {
        Self {
            latitude: fire.location.latitude,
            longitude: fire.location.longitude,
            label: Some(fire.name.clone()),
            radius: None,
            kind: SelectionKind::FireLocation,
            id: None,
            notifications: None,
        }
    }
}

/// Last geocoded address search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicSearch {
    pub address: String,
    pub coordinate: Coordinate,
    pub radius: Option<Radius>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Viewport {
    pub const SEARCH_ZOOM: f64 = 8.0;

    pub fn centered_on(coordinate: Coordinate, zoom: f64) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            zoom,
        }
    }
}

impl Default for Viewport {
    /// Continental United States.
    fn default() -> Self {
        Self {
            latitude: 39.8283,
            longitude: -98.5795,
            zoom: 3.3,
        }
    }
}
