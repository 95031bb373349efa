pub mod config;
pub mod content;
pub mod donate;
pub mod dtos;
pub mod error;
pub mod handlers;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod models;
pub mod payments;
pub mod schema;

pub use config::Config;
pub use error::{AppError, AppResult};
