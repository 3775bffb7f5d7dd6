pub mod subscription;
pub mod summary;

pub use subscription::subscription_config;
pub use summary::summary_config;

use crate::error::AppError;
use actix_web::web;

/// Malformed bodies get the same envelope as every other validation failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}
