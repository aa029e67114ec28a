pub mod client;
pub(crate) mod error;

pub use client::ApiClient;
