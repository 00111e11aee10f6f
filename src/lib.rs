pub mod config;
pub mod error;
pub mod types;
pub mod relay;
pub mod providers;
pub mod server;
pub mod templates;
pub mod metrics;

pub use error::LandingZoneError;
pub type Result<T> = std::result::Result<T, LandingZoneError>;
