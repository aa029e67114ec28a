pub mod server;

pub use server::MapBridge;
