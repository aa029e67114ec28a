pub mod haversine;
pub mod proximity;
pub mod radius;

pub use haversine::{haversine_distance, DistanceUnit};
pub use proximity::{
    fires_near_locations, fires_within, fires_within_radius, search_radius, within_radius,
};
pub use radius::Radius;
