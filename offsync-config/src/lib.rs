pub mod config;
#[cfg(feature = "http")]
pub mod http;

pub use config::{ConfigError, Configurable};

#[cfg(feature = "http")]
pub use backoff;
