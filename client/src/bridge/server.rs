use fireflightcore::state::Store;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Builder;
use warp::{Filter, Rejection, Reply};

/// Read-only HTTP view of the marker state for a map front end.
pub fn routes(store: Arc<Store>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let state_route = warp::path("state")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .map(|store: Arc<Store>| warp::reply::json(&store.snapshot()));

    let markers_route = warp::path("markers")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .map(|store: Arc<Store>| warp::reply::json(&store.snapshot().markers()));

    let selected_route = warp::path("selected")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter)
        .map(|store: Arc<Store>| warp::reply::json(&store.snapshot().selected_marker));

    state_route.or(markers_route).or(selected_route)
}

/// Bridge serving the store on a background thread.
pub struct MapBridge {
    address: SocketAddr,
}

impl MapBridge {
    pub fn spawn(store: Arc<Store>, address: SocketAddr) -> Self {
        let filter = routes(store);
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("map bridge runtime failed to start: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(filter).run(address).await;
            });
        });
        info!("map bridge listening on http://{}", address);
        Self { address }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fireflightcore::model::{Coordinate, Fire, Marker, SelectedMarker};
    use fireflightcore::state::Action;
    use serde_json::Value;

    fn populated_store() -> Arc<Store> {
        let store = Arc::new(Store::default());
        let fire = Fire::new("Dixie", Coordinate::new(40.0, -121.2));
        store.dispatch(Action::SetAllFires(vec![fire.clone()]));
        store.dispatch(Action::SelectMarker(SelectedMarker::fire(&fire)));
        store
    }

    #[tokio::test]
    async fn markers_route_lists_renderable_markers() {
        let filter = routes(populated_store());
        let response = warp::test::request().path("/markers").reply(&filter).await;
        assert_eq!(response.status(), 200);
        let markers: Vec<Marker> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].label.as_deref(), Some("Dixie"));
    }

    #[tokio::test]
    async fn selected_route_reports_open_popup() {
        let filter = routes(populated_store());
        let response = warp::test::request().path("/selected").reply(&filter).await;
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["kind"], "fire_location");
        assert_eq!(body["label"], "Dixie");
    }

    #[tokio::test]
    async fn state_route_reflects_later_dispatches() {
        let store = populated_store();
        let filter = routes(store.clone());
        store.dispatch(Action::ClearSelectedMarker);
        let response = warp::test::request().path("/state").reply(&filter).await;
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert!(body["selected_marker"].is_null());
        assert_eq!(body["all_fires"][0]["location"][0], -121.2);
    }

    #[tokio::test]
    async fn unknown_paths_are_rejected() {
        let filter = routes(populated_store());
        let response = warp::test::request().path("/ingest").reply(&filter).await;
        assert_eq!(response.status(), 404);
    }
}
