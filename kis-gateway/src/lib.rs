pub mod client;
pub mod config;

pub use client::KisClient;
pub use config::{ConfigError, KisConfig};
