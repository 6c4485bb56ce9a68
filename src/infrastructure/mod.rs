// Infrastructure for the calltree front end: config, input loading,
// logging and thread pools.

pub mod concurrency;
pub mod config;
pub mod logger;
pub mod profile_loader;

pub use config::{CalltreeConfig, DepthConfig, DEFAULT_CONFIG_FILE};
pub use profile_loader::{LoadedProfile, ProfileLoader};
