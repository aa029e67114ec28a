pub mod auth;
pub mod fire_data;

pub use auth::AuthService;
pub use fire_data::{FireDataService, SearchOutcome};
