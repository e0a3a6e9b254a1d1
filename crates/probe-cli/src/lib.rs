//! Gateway probe binary support: configuration, logging, errors.

pub mod config;
pub mod error;
pub mod logging;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use logging::init_logging;
