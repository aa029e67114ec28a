use crate::geo::radius::{self, Radius};
use crate::model::coordinate::Coordinate;
use serde::{Deserialize, Deserializer, Serialize};

/// Location saved by an authenticated user, as returned by `GET /locations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub id: u64,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "radius::lenient::deserialize")]
    pub radius: Option<Radius>,
    #[serde(default, deserialize_with = "flag")]
    pub notifications: bool,
}

impl UserLocation {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// The notification flag arrives as a boolean or as 0/1.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Int(value)) => value != 0,
        None => false,
    })
}

/// Body of `POST /locations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLocation {
    pub address: String,
    pub radius: Radius,
}

/// Body of `PUT /locations/{id}`. Exactly one field is sent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationUpdate {
    Radius(Radius),
    Notifications(bool),
}

/// Body of the register and login calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_numeric_notification_flag() {
        let location: UserLocation = serde_json::from_value(json!({
            "id": 7,
            "address": "Paradise, CA",
            "latitude": 39.7596,
            "longitude": -121.6219,
            "radius": "25",
            "notifications": 1
        }))
        .unwrap();
        assert!(location.notifications);
        assert_eq!(location.radius.unwrap().miles(), 25.0);
    }

    #[test]
    fn unusable_radius_decodes_as_none() {
        let location: UserLocation = serde_json::from_value(json!({
            "id": 8,
            "address": "Chico, CA",
            "latitude": 39.7285,
            "longitude": -121.8375,
            "radius": "",
            "notifications": false
        }))
        .unwrap();
        assert_eq!(location.radius, None);
        assert!(!location.notifications);
    }

    #[test]
    fn update_serializes_single_field() {
        let radius = LocationUpdate::Radius(Radius::from_miles(15.0).unwrap());
        assert_eq!(serde_json::to_value(radius).unwrap(), json!({"radius": 15.0}));
        let toggle = LocationUpdate::Notifications(true);
        assert_eq!(
            serde_json::to_value(toggle).unwrap(),
            json!({"notifications": true})
        );
    }
}
