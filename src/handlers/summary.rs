use crate::models::*;
use crate::services::BillingService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/summary",
    tag = "summary",
    params(
        ("from" = String, Query, description = "First month of the period (MM-YYYY)"),
        ("to" = String, Query, description = "Last month of the period, inclusive (MM-YYYY)"),
        ("user_id" = Option<String>, Query, description = "Owner UUID"),
        ("service_name" = Option<String>, Query, description = "Case-insensitive substring of the service name")
    ),
    responses(
        (status = 200, description = "Total price of subscriptions active in the period", body = SummaryResponse),
        (status = 400, description = "Invalid period or user_id", body = ApiError),
        (status = 500, description = "Database error", body = ApiError)
    )
)]
pub async fn get_summary(
    billing_service: web::Data<BillingService>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse> {
    match billing_service.summarize(&query).await {
        Ok(total) => Ok(HttpResponse::Ok().json(ApiResponse::success(SummaryResponse { total }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn summary_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/summary", web::get().to(get_summary));
}
