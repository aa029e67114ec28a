use crate::geo::haversine::{haversine_distance, DistanceUnit};
use crate::geo::radius::Radius;
use crate::model::{Coordinate, Fire, UserLocation};
use log::{debug, warn};

/// True when `candidate` lies within `radius` miles of `center`.
pub fn within_radius(center: Coordinate, candidate: Coordinate, radius: Radius) -> bool {
    haversine_distance(center, candidate, DistanceUnit::Miles) <= radius.miles()
}

/// Fires within `radius` of `center`, in input order.
pub fn fires_within_radius(center: Coordinate, radius: Radius, fires: &[Fire]) -> Vec<Fire> {
    fires
        .iter()
        .filter(|fire| within_radius(center, fire.location, radius))
        .cloned()
        .collect()
}

/// Parses a radius typed into a search box. Unusable input is logged and
/// yields `None`, which matches no fires.
pub fn search_radius(radius_input: &str) -> Option<Radius> {
    match Radius::parse(radius_input) {
        Ok(radius) => Some(radius),
        Err(err) => {
            warn!("skipping proximity filter for radius {:?}: {}", radius_input, err);
            None
        }
    }
}

/// Filters fires against a raw radius typed by the user.
///
/// Unusable input excludes every fire instead of failing the search.
pub fn fires_within(center: Coordinate, radius_input: &str, fires: &[Fire]) -> Vec<Fire> {
    match search_radius(radius_input) {
        Some(radius) => fires_within_radius(center, radius, fires),
        None => Vec::new(),
    }
}

/// Fires near any saved location. A fire close to two locations is
/// reported once per location.
pub fn fires_near_locations(locations: &[UserLocation], fires: &[Fire]) -> Vec<Fire> {
    let mut nearby = Vec::new();
    for location in locations {
        let Some(radius) = location.radius else {
            debug!("location {} has no usable radius", location.id);
            continue;
        };
        nearby.extend(fires_within_radius(location.coordinate(), radius, fires));
    }
    nearby
}
