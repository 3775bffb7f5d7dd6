use crate::models::ApiResponse;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("{0}")]
    ValidationError(String),

    #[error("invalid {field} format, use MM-YYYY")]
    InvalidPeriodFormat { field: &'static str },

    #[error("invalid {field}")]
    InvalidIdentifier { field: &'static str },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidPeriodFormat { .. }
            | AppError::InvalidIdentifier { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ConfigError(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidPeriodFormat { .. }
            | AppError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::ValidationError(_)
            | AppError::InvalidPeriodFormat { .. }
            | AppError::InvalidIdentifier { .. } => {
                log::warn!("Validation error: {self}");
                self.to_string()
            }
            AppError::NotFound(_) => self.to_string(),
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                "Database error".to_string()
            }
            AppError::ConfigError(msg) => {
                log::error!("Config error: {msg}");
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.code(), message))
    }
}
