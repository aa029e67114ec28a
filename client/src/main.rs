use anyhow::Context;
use api::ApiClient;
use bridge::MapBridge;
use clap::{Parser, Subcommand};
use config::AppConfig;
use fireflightcore::checklist::Checklist;
use fireflightcore::model::Viewport;
use fireflightcore::storage::{FileStore, Storage};
use fireflightcore::telemetry::CallMetrics;
use fireflightcore::FireError;
use log::warn;
use service::{AuthService, FireDataService};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod api;
mod bridge;
mod config;
mod report;
mod service;
#[cfg(test)]
mod testing;

#[derive(Parser)]
#[command(author, version, about = "Wildfire proximity tracker")]
struct Args {
    /// Load settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override where the session token and checklist are stored
    #[arg(long)]
    storage: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every known fire
    Fires,
    /// Show one fire by its position in the fire list
    Fire { index: usize },
    /// Find fires within a radius (miles) of an address
    Search {
        address: String,
        #[arg(long, default_value = "")]
        radius: String,
    },
    /// Fetch fires and geocode an address at the same time
    Overview {
        address: String,
        #[arg(long, default_value = "")]
        radius: String,
    },
    Register {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// List saved locations and the fires near them
    Locations,
    /// Save an address to watch
    Save {
        address: String,
        #[arg(long)]
        radius: String,
    },
    /// Delete a saved location
    Delete { id: u64 },
    /// Change the radius of a saved location
    SetRadius { id: u64, radius: String },
    /// Toggle notifications for a saved location
    Notify { id: u64 },
    /// Show or update the evacuation checklist
    Checklist {
        /// 1-based item number to check or uncheck
        #[arg(long)]
        toggle: Option<usize>,
        #[arg(long, default_value_t = false)]
        reset: bool,
    },
    /// Serve the marker state over HTTP for a map front end
    Serve {
        #[arg(long)]
        address: Option<SocketAddr>,
        /// Seconds between fire refreshes; 0 disables
        #[arg(long)]
        refresh_secs: Option<u64>,
        /// Initial map centre as `LAT,LON`
        #[arg(long, value_parser = parse_center)]
        center: Option<(f64, f64)>,
        #[arg(long)]
        zoom: Option<f64>,
    },
}

struct App {
    config: AppConfig,
    storage: Arc<Storage>,
    metrics: Arc<CallMetrics>,
    fire_data: FireDataService,
    auth: AuthService,
}

impl App {
    fn new(config: AppConfig) -> anyhow::Result<Self> {
        let storage = Arc::new(match &config.storage_path {
            Some(path) => Storage::new(FileStore::new(path)),
            None => Storage::in_memory(),
        });
        let metrics = Arc::new(CallMetrics::new());
        let api = ApiClient::new(&config).context("configuring service endpoints")?;
        Ok(Self {
            fire_data: FireDataService::new(api.clone(), storage.clone(), metrics.clone()),
            auth: AuthService::new(api, storage.clone(), metrics.clone()),
            config,
            storage,
            metrics,
        })
    }

    /// Loads fires and, when logged in, the saved locations.
    async fn load_map(&self) -> Result<(), FireError> {
        self.fire_data.load_all_fires().await?;
        if self.auth.is_authenticated()? {
            self.fire_data.refresh_user_locations().await?;
        }
        Ok(())
    }

    /// Fetches fires and geocodes `address` concurrently.
    async fn overview(
        &self,
        address: &str,
        radius: &str,
    ) -> Result<service::SearchOutcome, FireError> {
        let (fires, search) = tokio::join!(
            self.fire_data.load_all_fires(),
            self.fire_data.search_address(address, radius)
        );
        fires?;
        let mut outcome = search?;
        // Alerts are re-derived from whichever response landed last.
        let state = self.fire_data.snapshot();
        if state.public_search.as_ref() == Some(&outcome.search) {
            outcome.alerts = state.local_fire_markers;
        }
        Ok(outcome)
    }

    async fn run(&self, command: Command) -> Result<(), FireError> {
        match command {
            Command::Fires => {
                self.fire_data.load_all_fires().await?;
                print!("{}", report::fires(&self.fire_data.snapshot().all_fires));
            }
            Command::Fire { index } => {
                self.fire_data.load_all_fires().await?;
                let selected = self.fire_data.select_fire(index)?;
                println!("{}", report::selection(&selected));
                self.fire_data.close_selected_marker();
            }
            Command::Search { address, radius } => {
                self.fire_data.load_all_fires().await?;
                let outcome = self.fire_data.search_address(&address, &radius).await?;
                print!("{}", report::search(&outcome));
            }
            Command::Overview { address, radius } => {
                let outcome = self.overview(&address, &radius).await?;
                print!("{}", report::search(&outcome));
            }
            Command::Register {
                username,
                password,
                confirm,
            } => {
                self.auth.register(&username, &password, &confirm).await?;
                println!("Account created. Log in with `fireflight login {username}`.");
            }
            Command::Login { username, password } => {
                self.auth.login(&username, &password).await?;
                println!("Logged in as {username}.");
            }
            Command::Logout => {
                self.auth.logout()?;
                println!("Logged out.");
            }
            Command::Locations => {
                self.fire_data.load_all_fires().await?;
                let locations = self.fire_data.refresh_user_locations().await?;
                print!(
                    "{}",
                    report::locations(&locations, &self.fire_data.snapshot())
                );
            }
            Command::Save { address, radius } => {
                let outcome = self.fire_data.search_address(&address, &radius).await?;
                self.fire_data.select_search_result()?;
                self.fire_data.save_selected_location().await?;
                println!(
                    "Watching {} ({:.4}, {:.4}).",
                    outcome.place_name,
                    outcome.search.coordinate.latitude,
                    outcome.search.coordinate.longitude
                );
            }
            Command::Delete { id } => {
                self.fire_data.load_user_locations().await?;
                self.fire_data.select_saved_location(id)?;
                self.fire_data.delete_selected_location().await?;
                println!("Deleted location {id}.");
            }
            Command::SetRadius { id, radius } => {
                self.fire_data.load_all_fires().await?;
                self.fire_data.load_user_locations().await?;
                self.fire_data.select_saved_location(id)?;
                self.fire_data.update_selected_radius(&radius).await?;
                if let Some(selected) = self.fire_data.snapshot().selected_marker {
                    println!("{}", report::selection(&selected));
                }
            }
            Command::Notify { id } => {
                self.fire_data.load_user_locations().await?;
                self.fire_data.select_saved_location(id)?;
                let enabled = self.fire_data.toggle_notifications().await?;
                println!(
                    "Notifications for location {id} {}.",
                    if enabled { "enabled" } else { "disabled" }
                );
            }
            Command::Checklist { toggle, reset } => {
                let mut checklist = Checklist::load(&self.storage)?;
                if reset {
                    checklist.reset()?;
                }
                if let Some(position) = toggle {
                    checklist.toggle_position(position)?;
                }
                print!("{}", report::checklist(&checklist.entries()));
            }
            Command::Serve {
                address,
                refresh_secs,
                center,
                zoom,
            } => {
                if let Some((latitude, longitude)) = center {
                    self.fire_data.set_public_viewport(Viewport {
                        latitude,
                        longitude,
                        zoom: zoom.unwrap_or(Viewport::default().zoom),
                    });
                }
                self.serve(
                    address.unwrap_or(self.config.bridge_address),
                    refresh_secs.unwrap_or(self.config.refresh_secs),
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn serve(&self, address: SocketAddr, refresh_secs: u64) -> Result<(), FireError> {
        if let Err(err) = self.load_map().await {
            eprintln!("{}", err.user_message());
        }
        let bridge = MapBridge::spawn(self.fire_data.store(), address);
        println!(
            "Map bridge running on http://{} (Ctrl+C to stop)...",
            bridge.address()
        );

        if refresh_secs == 0 {
            signal::ctrl_c()
                .await
                .map_err(|err| FireError::Network(format!("awaiting Ctrl+C: {err}")))?;
            return Ok(());
        }

        let mut ticker = tokio::time::interval(Duration::from_secs(refresh_secs));
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.load_map().await {
                        warn!("refresh failed: {}", err);
                    }
                }
                result = signal::ctrl_c() => {
                    result.map_err(|err| FireError::Network(format!("awaiting Ctrl+C: {err}")))?;
                    break;
                }
            }
        }
        let metrics = self.metrics.snapshot();
        println!(
            "Stopped after {} successful calls, {} stale responses discarded.",
            metrics.succeeded, metrics.stale_discarded
        );
        Ok(())
    }
}

fn parse_center(raw: &str) -> Result<(f64, f64), String> {
    let (latitude, longitude) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {raw:?}"))?;
    let latitude = latitude
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("latitude: {err}"))?;
    let longitude = longitude
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("longitude: {err}"))?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("{raw:?} is not a valid coordinate"));
    }
    Ok((latitude, longitude))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    }
    .with_env(|key| std::env::var(key).ok())
    .with_storage_path(args.storage.clone());

    let app = App::new(config)?;
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime")?;

    if let Err(err) = runtime.block_on(app.run(args.command)) {
        eprintln!("{}", err.user_message());
        drop(runtime);
        process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config_for, serve};
    use serde_json::json;
    use warp::Filter;

    #[tokio::test]
    async fn overview_keeps_geocoder_place_name() {
        let fires = warp::path!("fpfire").map(|| {
            warp::reply::json(&json!([{"name": "Woolsey", "location": [-118.70, 34.235]}]))
        });
        let geocode = warp::path!("geocoding" / "v5" / "mapbox.places" / String).map(|_: String| {
            warp::reply::json(&json!({
                "features": [{"center": [-118.2437, 34.0522], "place_name": "Los Angeles, California"}]
            }))
        });
        let app = App::new(config_for(serve(fires.or(geocode)))).unwrap();

        let outcome = app.overview("la", "50").await.unwrap();
        assert_eq!(outcome.place_name, "Los Angeles, California");
        assert_eq!(outcome.search.address, "la");
        assert_eq!(outcome.alerts.len(), 1);
    }

    #[test]
    fn center_parses_lat_lon() {
        assert_eq!(parse_center("34.05, -118.24").unwrap(), (34.05, -118.24));
        assert!(parse_center("34.05").is_err());
        assert!(parse_center("95,0").is_err());
    }

    #[test]
    fn cli_parses_search_command() {
        let args = Args::try_parse_from(["fireflight", "search", "Paradise, CA", "--radius", "25"])
            .unwrap();
        match args.command {
            Command::Search { address, radius } => {
                assert_eq!(address, "Paradise, CA");
                assert_eq!(radius, "25");
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn cli_search_radius_defaults_to_empty() {
        let args = Args::try_parse_from(["fireflight", "search", "Chico"]).unwrap();
        assert!(matches!(args.command, Command::Search { radius, .. } if radius.is_empty()));
    }
}
