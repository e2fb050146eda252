pub mod config;
pub mod logger;
pub mod promise;

pub use config::{Config, ConfigError, ConfigOptions};
pub use logger::{LogLevel, Logger, TracingLogger};
pub use promise::Promise;
