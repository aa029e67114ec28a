use crate::api::error::{check, transport};
use crate::config::AppConfig;
use fireflightcore::model::coordinate::lon_lat;
use fireflightcore::model::{Coordinate, Credentials, Fire, LocationUpdate, NewLocation, UserLocation};
use fireflightcore::{FireError, FireResult};
use log::debug;
use reqwest::{Client, Url};
use serde::Deserialize;

/// Candidate match returned by the geocoding service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeFeature {
    #[serde(with = "lon_lat")]
    pub center: Coordinate,
    #[serde(default)]
    pub place_name: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// HTTP client for the auth, location, fire-data and geocoding services.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    api: Url,
    fire_data: Url,
    geocoding: Url,
    geocoding_token: String,
}

fn parse_base(name: &str, raw: &str) -> FireResult<Url> {
    Url::parse(raw).map_err(|err| FireError::field(name, format!("invalid URL {raw:?}: {err}")))
}

fn endpoint(base: &Url, segments: &[&str]) -> FireResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FireError::validation(format!("{base} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> FireResult<Self> {
        Ok(Self {
            http: Client::new(),
            api: parse_base("api_base_url", &config.api_base_url)?,
            fire_data: parse_base("fire_data_base_url", &config.fire_data_base_url)?,
            geocoding: parse_base("geocoding_base_url", &config.geocoding_base_url)?,
            geocoding_token: config.geocoding_token().to_string(),
        })
    }

    pub async fn register(&self, credentials: &Credentials) -> FireResult<()> {
        let url = endpoint(&self.api, &["auth", "register"])?;
        let response = self
            .http
            .post(url)
            .json(credentials)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    /// Returns the session token issued for `credentials`.
    pub async fn login(&self, credentials: &Credentials) -> FireResult<String> {
        let url = endpoint(&self.api, &["auth", "login"])?;
        let response = self
            .http
            .post(url)
            .json(credentials)
            .send()
            .await
            .map_err(transport)?;
        let body: LoginResponse = check(response).await?.json().await.map_err(transport)?;
        Ok(body.token)
    }

    pub async fn fetch_fires(&self) -> FireResult<Vec<Fire>> {
        let url = endpoint(&self.fire_data, &["fpfire"])?;
        let response = self.http.get(url).send().await.map_err(transport)?;
        let fires: Vec<Fire> = check(response).await?.json().await.map_err(transport)?;
        debug!("fetched {} fires", fires.len());
        Ok(fires)
    }

    pub async fn geocode(&self, address: &str) -> FireResult<Vec<GeocodeFeature>> {
        let file = format!("{address}.json");
        let mut url = endpoint(&self.geocoding, &["geocoding", "v5", "mapbox.places", file.as_str()])?;
        url.query_pairs_mut()
            .append_pair("access_token", &self.geocoding_token);
        let response = self.http.get(url).send().await.map_err(transport)?;
        let body: GeocodeResponse = check(response).await?.json().await.map_err(transport)?;
        Ok(body.features)
    }

    pub async fn list_locations(&self, token: &str) -> FireResult<Vec<UserLocation>> {
        let url = endpoint(&self.api, &["locations"])?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?.json().await.map_err(transport)
    }

    pub async fn create_location(&self, token: &str, location: &NewLocation) -> FireResult<()> {
        let url = endpoint(&self.api, &["locations"])?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(location)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    pub async fn update_location(
        &self,
        token: &str,
        id: u64,
        update: LocationUpdate,
    ) -> FireResult<()> {
        let id = id.to_string();
        let url = endpoint(&self.api, &["locations", id.as_str()])?;
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(&update)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    pub async fn delete_location(&self, token: &str, id: u64) -> FireResult<()> {
        let id = id.to_string();
        let url = endpoint(&self.api, &["locations", id.as_str()])?;
        let response = self
            .http
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config_for, serve};
    use fireflightcore::geo::Radius;
    use fireflightcore::ErrorKind;
    use serde_json::{json, Value};
    use warp::Filter;

    #[test]
    fn endpoint_appends_encoded_segments() {
        let base = Url::parse("https://example.com/api/").unwrap();
        let url = endpoint(&base, &["geocoding", "v5", "mapbox.places", "1 Main St/2.json"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api/geocoding/v5/mapbox.places/1%20Main%20St%2F2.json"
        );
    }

    #[test]
    fn invalid_base_url_is_a_validation_error() {
        let config = AppConfig {
            api_base_url: "not a url".into(),
            ..Default::default()
        };
        assert_eq!(
            ApiClient::new(&config).err().unwrap().kind(),
            ErrorKind::Validation
        );
    }

    #[tokio::test]
    async fn fetch_fires_decodes_lon_lat() {
        let routes = warp::path!("fpfire").and(warp::get()).map(|| {
            warp::reply::json(&json!([
                {"name": "Kincade", "location": [-122.78, 38.79]},
                {"name": "Getty", "location": [-118.48, 34.08]}
            ]))
        });
        let client = ApiClient::new(&config_for(serve(routes))).unwrap();
        let fires = client.fetch_fires().await.unwrap();
        assert_eq!(fires.len(), 2);
        assert_eq!(fires[0].location, Coordinate::new(38.79, -122.78));
    }

    #[tokio::test]
    async fn geocode_sends_access_token() {
        let routes = warp::path!("geocoding" / "v5" / "mapbox.places" / String)
            .and(warp::query::<std::collections::HashMap<String, String>>())
            .map(|file: String, query: std::collections::HashMap<String, String>| {
                assert!(file.starts_with("Paradise") && file.ends_with("CA.json"));
                assert_eq!(query.get("access_token").map(String::as_str), Some("pk.test"));
                warp::reply::json(&json!({
                    "features": [{"center": [-121.62, 39.76], "place_name": "Paradise, California"}]
                }))
            });
        let mut config = config_for(serve(routes));
        config.geocoding_token = Some("pk.test".into());
        let client = ApiClient::new(&config).unwrap();
        let features = client.geocode("Paradise, CA").await.unwrap();
        assert_eq!(features[0].center, Coordinate::new(39.76, -121.62));
        assert_eq!(features[0].place_name, "Paradise, California");
    }

    #[tokio::test]
    async fn location_calls_carry_bearer_token() {
        let list = warp::path!("api" / "locations")
            .and(warp::get())
            .and(warp::header::<String>("authorization"))
            .map(|auth: String| {
                assert_eq!(auth, "Bearer t0k3n");
                warp::reply::json(&json!([
                    {"id": 3, "address": "Malibu", "latitude": 34.03, "longitude": -118.78,
                     "radius": 15, "notifications": 0}
                ]))
            });
        let update = warp::path!("api" / "locations" / u64)
            .and(warp::put())
            .and(warp::header::<String>("authorization"))
            .and(warp::body::json())
            .map(|id: u64, auth: String, body: Value| {
                assert_eq!(id, 3);
                assert_eq!(auth, "Bearer t0k3n");
                assert_eq!(body, json!({"radius": 30.0}));
                warp::reply()
            });
        let client = ApiClient::new(&config_for(serve(list.or(update)))).unwrap();

        let locations = client.list_locations("t0k3n").await.unwrap();
        assert_eq!(locations[0].radius, Some(Radius::from_miles(15.0).unwrap()));
        client
            .update_location("t0k3n", 3, LocationUpdate::Radius(Radius::from_miles(30.0).unwrap()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn register_rejection_surfaces_field_errors() {
        let routes = warp::path!("api" / "auth" / "register").and(warp::post()).map(|| {
            warp::reply::with_status(
                warp::reply::json(&json!({"username": "Username already exists"})),
                warp::http::StatusCode::BAD_REQUEST,
            )
        });
        let client = ApiClient::new(&config_for(serve(routes))).unwrap();
        let err = client
            .register(&Credentials {
                username: "smokey".into(),
                password: "onlyyou".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Username already exists");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error() {
        let config = AppConfig {
            fire_data_base_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.fetch_fires().await.unwrap_err().kind(),
            ErrorKind::Network
        );
    }
}
