//! Fake remote services for tests.

use crate::config::AppConfig;
use std::net::SocketAddr;
use warp::{Filter, Rejection, Reply};

/// Serves `routes` on an ephemeral port of the current runtime.
pub fn serve<F, R>(routes: F) -> SocketAddr
where
    F: Filter<Extract = (R,)> + Clone + Send + Sync + 'static,
    F::Error: Into<Rejection>,
    R: Reply + Send + 'static,
{
    let (address, server) = warp::serve(routes.boxed()).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    address
}

/// Points every service at one fake server, with the auth and location
/// service under `/api`.
pub fn config_for(address: SocketAddr) -> AppConfig {
    AppConfig {
        api_base_url: format!("http://{address}/api"),
        fire_data_base_url: format!("http://{address}"),
        geocoding_base_url: format!("http://{address}"),
        geocoding_token: Some("pk.test".into()),
        storage_path: None,
        ..Default::default()
    }
}
