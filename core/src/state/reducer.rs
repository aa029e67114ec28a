use crate::geo::proximity::{fires_near_locations, fires_within_radius};
use crate::geo::Radius;
use crate::model::{Fire, Marker, PublicSearch, SelectedMarker, UserLocation, Viewport};
use serde::{Deserialize, Serialize};

/// Everything the map renders, mirrored from server responses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FireDataState {
    pub user_locations: Vec<UserLocation>,
    pub public_search: Option<PublicSearch>,
    pub public_search_marker: Option<Marker>,
    pub local_fire_markers: Vec<Marker>,
    pub public_viewport: Viewport,
    pub all_fires: Vec<Fire>,
    pub all_fire_markers: Vec<Marker>,
    pub selected_marker: Option<SelectedMarker>,
    pub user_location_markers: Vec<Marker>,
    pub user_local_fire_markers: Vec<Marker>,
}

impl FireDataState {
    /// All markers in draw order, bottom layer first.
    pub fn markers(&self) -> Vec<Marker> {
        self.all_fire_markers
            .iter()
            .chain(&self.user_local_fire_markers)
            .chain(&self.local_fire_markers)
            .chain(&self.user_location_markers)
            .chain(&self.public_search_marker)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetUserLocationRecords(Vec<UserLocation>),
    SetUserLocations(Vec<UserLocation>),
    RemoveUserLocation(u64),
    SetPublicSearch(PublicSearch),
    SetPublicViewport(Viewport),
    SetAllFires(Vec<Fire>),
    SelectMarker(SelectedMarker),
    ClearSelectedMarker,
    SaveLocation(Marker),
    DeleteLocationMarker,
    UpdateSelectedRadius(Radius),
    ToggleNotifications,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetUserLocationRecords(_) => "set_user_location_records",
            Action::SetUserLocations(_) => "set_user_locations",
            Action::RemoveUserLocation(_) => "remove_user_location",
            Action::SetPublicSearch(_) => "set_public_search",
            Action::SetPublicViewport(_) => "set_public_viewport",
            Action::SetAllFires(_) => "set_all_fires",
            Action::SelectMarker(_) => "select_marker",
            Action::ClearSelectedMarker => "clear_selected_marker",
            Action::SaveLocation(_) => "save_location",
            Action::DeleteLocationMarker => "delete_location_marker",
            Action::UpdateSelectedRadius(_) => "update_selected_radius",
            Action::ToggleNotifications => "toggle_notifications",
        }
    }
}

fn fire_markers(fires: &[Fire]) -> Vec<Marker> {
    fires.iter().map(Marker::fire).collect()
}

fn alert_markers(fires: &[Fire]) -> Vec<Marker> {
    fires.iter().map(Marker::local_fire).collect()
}

fn search_alerts(search: &PublicSearch, fires: &[Fire]) -> Vec<Marker> {
    match search.radius {
        Some(radius) => alert_markers(&fires_within_radius(search.coordinate, radius, fires)),
        None => Vec::new(),
    }
}

fn saved_location_markers(locations: &[UserLocation]) -> Vec<Marker> {
    locations
        .iter()
        .map(|location| Marker::saved_location(location.coordinate(), &location.address))
        .collect()
}

/// Applies one action, replacing whole fields of the state.
pub fn reduce(state: &FireDataState, action: Action) -> FireDataState {
    let mut next = state.clone();
    match action {
        Action::SetUserLocationRecords(locations) => {
            next.user_locations = locations;
        }
        Action::SetUserLocations(locations) => {
            next.user_location_markers = saved_location_markers(&locations);
            next.user_local_fire_markers =
                alert_markers(&fires_near_locations(&locations, &next.all_fires));
            next.user_locations = locations;
        }
        Action::RemoveUserLocation(id) => {
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut next.user_locations)
                .into_iter()
                .partition(|location| location.id == id);
            let removed_markers = saved_location_markers(&removed);
            next.user_location_markers.retain(|marker| !removed_markers.contains(marker));
            next.user_local_fire_markers =
                alert_markers(&fires_near_locations(&kept, &next.all_fires));
            next.user_locations = kept;
        }
        Action::SetPublicSearch(search) => {
            next.public_search_marker = Some(Marker::temp_location(&search));
            next.local_fire_markers = search_alerts(&search, &next.all_fires);
            next.public_viewport = Viewport::centered_on(search.coordinate, Viewport::SEARCH_ZOOM);
            next.public_search = Some(search);
        }
        Action::SetPublicViewport(viewport) => {
            next.public_viewport = viewport;
        }
        Action::SetAllFires(fires) => {
            next.all_fire_markers = fire_markers(&fires);
            // Alerts depend on the fire list, so they follow it regardless of
            // which response arrived first.
            next.local_fire_markers = match &next.public_search {
                Some(search) => search_alerts(search, &fires),
                None => Vec::new(),
            };
            next.user_local_fire_markers =
                alert_markers(&fires_near_locations(&next.user_locations, &fires));
            next.all_fires = fires;
        }
        Action::SelectMarker(selected) => {
            next.selected_marker = Some(selected);
        }
        Action::ClearSelectedMarker => {
            next.selected_marker = None;
        }
        Action::SaveLocation(marker) => {
            next.user_location_markers.push(marker);
            next.selected_marker = None;
        }
        Action::DeleteLocationMarker => {
            next.public_search = None;
            next.public_search_marker = None;
            next.selected_marker = None;
            next.local_fire_markers = Vec::new();
        }
        Action::UpdateSelectedRadius(radius) => {
            if let Some(selected) = next.selected_marker.as_mut() {
                selected.radius = Some(radius);
            }
        }
        Action::ToggleNotifications => {
            if let Some(selected) = next.selected_marker.as_mut() {
                selected.notifications = Some(!selected.notifications.unwrap_or(false));
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinate, MarkerKind, SelectionKind};

    fn fires() -> Vec<Fire> {
        vec![
            Fire::new("Woolsey", Coordinate::new(34.2350, -118.7000)),
            Fire::new("Camp", Coordinate::new(39.8100, -121.4370)),
        ]
    }

    fn los_angeles_search(radius: f64) -> PublicSearch {
        PublicSearch {
            address: "Los Angeles, CA".into(),
            coordinate: Coordinate::new(34.0522, -118.2437),
            radius: Some(Radius::from_miles(radius).unwrap()),
        }
    }

    fn saved_location() -> UserLocation {
        UserLocation {
            id: 42,
            address: "Paradise, CA".into(),
            latitude: 39.7596,
            longitude: -121.6219,
            radius: Some(Radius::from_miles(20.0).unwrap()),
            notifications: false,
        }
    }

    #[test]
    fn set_all_fires_is_idempotent() {
        let start = FireDataState::default();
        let once = reduce(&start, Action::SetAllFires(fires()));
        let twice = reduce(&once, Action::SetAllFires(fires()));
        assert_eq!(once, twice);
        assert_eq!(once.all_fires.len(), once.all_fire_markers.len());
        assert!(once
            .all_fire_markers
            .iter()
            .all(|marker| marker.kind == MarkerKind::Fire));
    }

    #[test]
    fn toggle_only_flips_notifications() {
        let state = reduce(
            &FireDataState::default(),
            Action::SelectMarker(SelectedMarker::saved(&saved_location())),
        );
        let toggled = reduce(&state, Action::ToggleNotifications);
        let before = state.selected_marker.unwrap();
        let after = toggled.selected_marker.clone().unwrap();
        assert_eq!(after.notifications, Some(true));
        assert_eq!(
            SelectedMarker {
                notifications: before.notifications,
                ..after
            },
            before
        );

        let back = reduce(&toggled, Action::ToggleNotifications);
        assert_eq!(back.selected_marker.unwrap().notifications, Some(false));
    }

    #[test]
    fn toggle_without_selection_is_a_no_op() {
        let state = FireDataState::default();
        assert_eq!(reduce(&state, Action::ToggleNotifications), state);
    }

    #[test]
    fn search_projects_marker_alerts_and_viewport() {
        let state = reduce(&FireDataState::default(), Action::SetAllFires(fires()));
        let state = reduce(&state, Action::SetPublicSearch(los_angeles_search(50.0)));
        assert_eq!(
            state.public_search_marker.as_ref().unwrap().kind,
            MarkerKind::TempLocation
        );
        assert_eq!(state.local_fire_markers.len(), 1);
        assert_eq!(state.public_viewport.zoom, Viewport::SEARCH_ZOOM);
    }

    #[test]
    fn late_fire_list_still_produces_search_alerts() {
        let state = reduce(
            &FireDataState::default(),
            Action::SetPublicSearch(los_angeles_search(50.0)),
        );
        assert!(state.local_fire_markers.is_empty());
        let state = reduce(&state, Action::SetAllFires(fires()));
        assert_eq!(state.local_fire_markers.len(), 1);
    }

    #[test]
    fn user_locations_project_saved_markers_and_alerts() {
        let state = reduce(&FireDataState::default(), Action::SetAllFires(fires()));
        let state = reduce(&state, Action::SetUserLocations(vec![saved_location()]));
        assert_eq!(state.user_location_markers.len(), 1);
        assert_eq!(
            state.user_location_markers[0].kind,
            MarkerKind::SavedLocation
        );
        assert_eq!(state.user_local_fire_markers.len(), 1);
        assert_eq!(
            state.user_local_fire_markers[0].label.as_deref(),
            Some("Camp")
        );
    }

    #[test]
    fn save_appends_marker_and_clears_selection() {
        let search = los_angeles_search(10.0);
        let state = reduce(&FireDataState::default(), Action::SetPublicSearch(search.clone()));
        let state = reduce(&state, Action::SelectMarker(SelectedMarker::temp(&search)));
        let marker = Marker::saved_location(search.coordinate, &search.address);
        let state = reduce(&state, Action::SaveLocation(marker.clone()));
        assert_eq!(state.user_location_markers, vec![marker]);
        assert!(state.selected_marker.is_none());
    }

    #[test]
    fn delete_clears_related_projections() {
        let search = los_angeles_search(50.0);
        let state = reduce(&FireDataState::default(), Action::SetAllFires(fires()));
        let state = reduce(&state, Action::SetPublicSearch(search.clone()));
        let state = reduce(&state, Action::SelectMarker(SelectedMarker::temp(&search)));
        let state = reduce(&state, Action::DeleteLocationMarker);
        assert!(state.public_search_marker.is_none());
        assert!(state.selected_marker.is_none());
        assert!(state.local_fire_markers.is_empty());
        assert_eq!(state.all_fire_markers.len(), 2);
    }

    #[test]
    fn removing_location_drops_record_marker_and_alerts() {
        let state = reduce(&FireDataState::default(), Action::SetAllFires(fires()));
        let state = reduce(&state, Action::SetUserLocations(vec![saved_location()]));
        assert_eq!(state.user_local_fire_markers.len(), 1);

        let state = reduce(&state, Action::RemoveUserLocation(42));
        assert!(state.user_locations.is_empty());
        assert!(state.user_location_markers.is_empty());
        assert!(state.user_local_fire_markers.is_empty());
        assert_eq!(state.all_fire_markers.len(), 2);
    }

    #[test]
    fn removing_unknown_location_changes_nothing() {
        let state = reduce(&FireDataState::default(), Action::SetAllFires(fires()));
        let state = reduce(&state, Action::SetUserLocations(vec![saved_location()]));
        assert_eq!(reduce(&state, Action::RemoveUserLocation(7)), state);
    }

    #[test]
    fn radius_update_touches_only_radius() {
        let state = reduce(
            &FireDataState::default(),
            Action::SelectMarker(SelectedMarker::saved(&saved_location())),
        );
        let radius = Radius::from_miles(75.0).unwrap();
        let updated = reduce(&state, Action::UpdateSelectedRadius(radius));
        let selected = updated.selected_marker.unwrap();
        assert_eq!(selected.radius, Some(radius));
        assert_eq!(selected.kind, SelectionKind::SavedLocation);
        assert_eq!(selected.id, Some(42));
    }

    #[test]
    fn markers_follow_draw_order() {
        let state = reduce(&FireDataState::default(), Action::SetAllFires(fires()));
        let state = reduce(&state, Action::SetUserLocations(vec![saved_location()]));
        let state = reduce(&state, Action::SetPublicSearch(los_angeles_search(50.0)));
        let kinds: Vec<_> = state.markers().into_iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MarkerKind::Fire,
                MarkerKind::Fire,
                MarkerKind::LocalFire,
                MarkerKind::LocalFire,
                MarkerKind::SavedLocation,
                MarkerKind::TempLocation,
            ]
        );
    }
}
