use crate::api::ApiClient;
use fireflightcore::geo::{search_radius, Radius};
use fireflightcore::model::{
    LocationUpdate, Marker, NewLocation, PublicSearch, SelectedMarker, SelectionKind,
    UserLocation, Viewport,
};
use fireflightcore::state::{Action, FieldGroup, FireDataState, Store, Ticket};
use fireflightcore::storage::Storage;
use fireflightcore::telemetry::{log_outcome, CallMetrics};
use fireflightcore::{FireError, FireResult};
use log::{info, warn};
use std::sync::Arc;

/// Result of an address search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub place_name: String,
    pub search: PublicSearch,
    pub alerts: Vec<Marker>,
}

/// Fetches fire and location data and mirrors it into the shared store.
pub struct FireDataService {
    api: ApiClient,
    store: Arc<Store>,
    storage: Arc<Storage>,
    metrics: Arc<CallMetrics>,
}

impl FireDataService {
    pub fn new(api: ApiClient, storage: Arc<Storage>, metrics: Arc<CallMetrics>) -> Self {
        Self {
            api,
            store: Arc::new(Store::default()),
            storage,
            metrics,
        }
    }

    pub fn store(&self) -> Arc<Store> {
        self.store.clone()
    }

    pub fn snapshot(&self) -> FireDataState {
        self.store.snapshot()
    }

    fn commit(&self, ticket: Ticket, action: Action) {
        if !self.store.commit(ticket, action) {
            self.metrics.record_stale();
        }
    }

    /// Applies a local selection change. Any in-flight write for the
    /// previous selection becomes stale.
    fn select(&self, action: Action) {
        let ticket = self.store.begin(FieldGroup::Selection);
        self.commit(ticket, action);
    }

    fn require_token(&self) -> FireResult<String> {
        self.storage
            .token()?
            .ok_or_else(|| FireError::Authentication("Please log in first.".into()))
    }

    fn selected_saved(&self) -> FireResult<(SelectedMarker, u64)> {
        let selected = self
            .snapshot()
            .selected_marker
            .filter(|selected| selected.kind == SelectionKind::SavedLocation);
        match selected {
            Some(selected) => match selected.id {
                Some(id) => Ok((selected, id)),
                None => Err(FireError::validation("selected location has no id")),
            },
            None => Err(FireError::validation("Select a saved location first")),
        }
    }

    fn selected_temp(&self) -> FireResult<SelectedMarker> {
        self.snapshot()
            .selected_marker
            .filter(|selected| selected.kind == SelectionKind::TempLocation)
            .ok_or_else(|| FireError::validation("Select a search result to save"))
    }

    /// Replaces the fire list. Returns how many fires are known.
    pub async fn load_all_fires(&self) -> FireResult<usize> {
        let ticket = self.store.begin(FieldGroup::AllFires);
        let result = self.api.fetch_fires().await;
        log_outcome(&self.metrics, "GET /fpfire", &result);
        let fires = result?;
        let count = fires.len();
        self.commit(ticket, Action::SetAllFires(fires));
        Ok(count)
    }

    /// Geocodes `address` and marks fires within the typed radius.
    ///
    /// A radius that does not parse still places the search pin but
    /// produces no alerts.
    pub async fn search_address(
        &self,
        address: &str,
        radius_input: &str,
    ) -> FireResult<SearchOutcome> {
        let address = address.trim();
        if address.is_empty() {
            return Err(FireError::field("address", "Enter an address to search"));
        }
        let radius = search_radius(radius_input);

        let ticket = self.store.begin(FieldGroup::PublicSearch);
        let result = self.api.geocode(address).await;
        log_outcome(&self.metrics, "GET /geocoding", &result);
        let feature = result?
            .into_iter()
            .next()
            .ok_or_else(|| FireError::NotFound(format!("address {address:?}")))?;

        let search = PublicSearch {
            address: address.to_string(),
            coordinate: feature.center,
            radius,
        };
        self.commit(ticket, Action::SetPublicSearch(search.clone()));
        let alerts = match self.snapshot().public_search {
            Some(current) if current == search => self.snapshot().local_fire_markers,
            _ => Vec::new(),
        };
        Ok(SearchOutcome {
            place_name: feature.place_name,
            search,
            alerts,
        })
    }

    /// Opens the popup for the current search pin.
    pub fn select_search_result(&self) -> FireResult<SelectedMarker> {
        let search = self
            .snapshot()
            .public_search
            .ok_or_else(|| FireError::NotFound("search result".into()))?;
        let selected = SelectedMarker::temp(&search);
        self.select(Action::SelectMarker(selected.clone()));
        Ok(selected)
    }

    pub fn select_saved_location(&self, id: u64) -> FireResult<SelectedMarker> {
        let location = self
            .snapshot()
            .user_locations
            .into_iter()
            .find(|location| location.id == id)
            .ok_or_else(|| FireError::NotFound(format!("saved location {id}")))?;
        let selected = SelectedMarker::saved(&location);
        self.select(Action::SelectMarker(selected.clone()));
        Ok(selected)
    }

    pub fn select_fire(&self, index: usize) -> FireResult<SelectedMarker> {
        let state = self.snapshot();
        let fire = state
            .all_fires
            .get(index)
            .ok_or_else(|| FireError::NotFound(format!("fire #{index}")))?;
        let selected = SelectedMarker::fire(fire);
        self.select(Action::SelectMarker(selected.clone()));
        Ok(selected)
    }

    pub fn close_selected_marker(&self) {
        self.select(Action::ClearSelectedMarker);
    }

    pub fn set_public_viewport(&self, viewport: Viewport) {
        self.store.dispatch(Action::SetPublicViewport(viewport));
    }

    /// Saves the selected search result as a watched location.
    pub async fn save_selected_location(&self) -> FireResult<Marker> {
        let Some(token) = self.storage.token()? else {
            return Err(FireError::Authentication(
                "Please log in to save a location.".into(),
            ));
        };
        let selected = self.selected_temp()?;
        let address = selected
            .label
            .clone()
            .ok_or_else(|| FireError::field("address", "Selected pin has no address"))?;
        let radius = selected
            .radius
            .ok_or_else(|| FireError::field("radius", "Radius is required"))?;

        let locations = self.store.begin(FieldGroup::UserLocations);
        let selection = self.store.begin(FieldGroup::Selection);
        let result = self
            .api
            .create_location(&token, &NewLocation {
                address: address.clone(),
                radius,
            })
            .await;
        log_outcome(&self.metrics, "POST /locations", &result);
        result?;

        let marker = Marker::saved_location(selected.coordinate(), &address);
        self.commit(locations, Action::SaveLocation(marker.clone()));
        self.commit(selection, Action::DeleteLocationMarker);
        info!("saved {:?} with radius {}", address, radius);
        Ok(marker)
    }

    /// Fetches saved locations without touching their markers.
    pub async fn load_user_locations(&self) -> FireResult<Vec<UserLocation>> {
        let token = self.require_token()?;
        let ticket = self.store.begin(FieldGroup::UserLocations);
        let result = self.api.list_locations(&token).await;
        log_outcome(&self.metrics, "GET /locations", &result);
        let locations = result?;
        self.commit(ticket, Action::SetUserLocationRecords(locations.clone()));
        Ok(locations)
    }

    /// Fetches saved locations and rebuilds their markers and alerts.
    pub async fn refresh_user_locations(&self) -> FireResult<Vec<UserLocation>> {
        let token = self.require_token()?;
        let ticket = self.store.begin(FieldGroup::UserLocations);
        let result = self.api.list_locations(&token).await;
        log_outcome(&self.metrics, "GET /locations", &result);
        let locations = result?;
        self.commit(ticket, Action::SetUserLocations(locations.clone()));
        Ok(locations)
    }

    /// Deletes the selected saved location. Returns its id.
    ///
    /// Once the server confirms, the record and its pin are dropped locally
    /// even if the follow-up refresh fails.
    pub async fn delete_selected_location(&self) -> FireResult<u64> {
        let (_, id) = self.selected_saved()?;
        let token = self.require_token()?;
        let selection = self.store.begin(FieldGroup::Selection);
        let result = self.api.delete_location(&token, id).await;
        log_outcome(&self.metrics, "DELETE /locations", &result);
        result?;
        self.commit(selection, Action::ClearSelectedMarker);
        let locations = self.store.begin(FieldGroup::UserLocations);
        self.commit(locations, Action::RemoveUserLocation(id));
        if let Err(err) = self.refresh_user_locations().await {
            warn!("location {} deleted but refresh failed: {}", id, err);
        }
        Ok(id)
    }

    /// Changes the radius of the selected saved location.
    pub async fn update_selected_radius(&self, input: &str) -> FireResult<Radius> {
        let radius = Radius::parse(input)?;
        let (_, id) = self.selected_saved()?;
        let token = self.require_token()?;
        let selection = self.store.begin(FieldGroup::Selection);
        let result = self
            .api
            .update_location(&token, id, LocationUpdate::Radius(radius))
            .await;
        log_outcome(&self.metrics, "PUT /locations radius", &result);
        result?;
        self.commit(selection, Action::UpdateSelectedRadius(radius));
        self.refresh_user_locations().await?;
        Ok(radius)
    }

    /// Flips notifications for the selected saved location.
    ///
    /// The selection changes immediately and is flipped back if the server
    /// rejects the write, as long as the selection has not changed since.
    pub async fn toggle_notifications(&self) -> FireResult<bool> {
        let (selected, id) = self.selected_saved()?;
        let token = self.require_token()?;
        let enabled = !selected.notifications.unwrap_or(false);
        let selection = self.store.begin(FieldGroup::Selection);
        self.commit(selection, Action::ToggleNotifications);

        let result = self
            .api
            .update_location(&token, id, LocationUpdate::Notifications(enabled))
            .await;
        log_outcome(&self.metrics, "PUT /locations notifications", &result);
        if let Err(err) = result {
            self.commit(selection, Action::ToggleNotifications);
            return Err(err);
        }
        Ok(enabled)
    }
}
