//! Core model and logic for the Fireflight wildfire tracker.
//!
//! Proximity filtering of fires around searched and saved locations, the
//! reducer that turns server responses into renderable map markers, and the
//! local storage the client keeps between runs.

pub mod checklist;
pub mod geo;
pub mod model;
pub mod prelude;
pub mod state;
pub mod storage;
pub mod telemetry;

pub use prelude::{ErrorKind, FireError, FireResult};
