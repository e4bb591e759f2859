/// TOML configuration (`maestro.toml`).
pub mod config;

pub use config::{ConfigError, MaestroConfig};
