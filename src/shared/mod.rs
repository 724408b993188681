pub mod config;
pub mod error;

pub use config::OfflineConfig;
pub use error::{AppError, Result};
