use crate::error::{AppError, AppResult};
use crate::models::{MonthPeriod, normalize_period};
use uuid::Uuid;

/// Query-string filters treat an empty value as absent.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| !v.is_empty())
}

pub fn parse_uuid(raw: &str, field: &'static str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidIdentifier { field })
}

pub fn parse_optional_uuid(raw: Option<&str>, field: &'static str) -> AppResult<Option<Uuid>> {
    non_blank(raw).map(|v| parse_uuid(v, field)).transpose()
}

/// A missing period is reported the same way as a malformed one.
pub fn parse_period(raw: Option<&str>, field: &'static str) -> AppResult<MonthPeriod> {
    raw.ok_or(AppError::InvalidPeriodFormat { field })
        .and_then(|text| {
            normalize_period(text).map_err(|_| AppError::InvalidPeriodFormat { field })
        })
}

pub fn validate_service_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError(
            "service_name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

pub fn validate_price(price: i64) -> AppResult<i64> {
    if price < 0 {
        return Err(AppError::ValidationError(
            "price must be a non-negative integer".to_string(),
        ));
    }
    Ok(price)
}
