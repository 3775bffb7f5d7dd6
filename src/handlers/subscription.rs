use crate::models::*;
use crate::services::SubscriptionService;
use crate::utils::parse_uuid;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscriptions",
    request_body = SubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 500, description = "Database error", body = ApiError)
    )
)]
pub async fn create_subscription(
    subscription_service: web::Data<SubscriptionService>,
    request: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse> {
    match subscription_service
        .create_subscription(request.into_inner())
        .await
    {
        Ok(subscription) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(SubscriptionResponse::from(subscription)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "subscriptions",
    params(
        ("user_id" = Option<String>, Query, description = "Owner UUID"),
        ("service_name" = Option<String>, Query, description = "Case-insensitive substring of the service name")
    ),
    responses(
        (status = 200, description = "Matching subscriptions", body = [SubscriptionResponse]),
        (status = 400, description = "Invalid user_id", body = ApiError),
        (status = 500, description = "Database error", body = ApiError)
    )
)]
pub async fn list_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
    query: web::Query<SubscriptionListQuery>,
) -> Result<HttpResponse> {
    match subscription_service.list_subscriptions(&query).await {
        Ok(subscriptions) => {
            let items: Vec<SubscriptionResponse> = subscriptions
                .into_iter()
                .map(SubscriptionResponse::from)
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(items)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription UUID")),
    responses(
        (status = 200, description = "Subscription", body = SubscriptionResponse),
        (status = 400, description = "Invalid id", body = ApiError),
        (status = 404, description = "Not found", body = ApiError)
    )
)]
pub async fn get_subscription(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = match parse_uuid(&path, "id") {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match subscription_service.get_subscription(id).await {
        Ok(subscription) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(SubscriptionResponse::from(subscription)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription UUID")),
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Subscription replaced", body = SubscriptionResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 404, description = "Not found", body = ApiError)
    )
)]
pub async fn update_subscription(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<String>,
    request: web::Json<SubscriptionRequest>,
) -> Result<HttpResponse> {
    let id = match parse_uuid(&path, "id") {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match subscription_service
        .update_subscription(id, request.into_inner())
        .await
    {
        Ok(subscription) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(SubscriptionResponse::from(subscription)))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    params(("id" = String, Path, description = "Subscription UUID")),
    responses(
        (status = 204, description = "Subscription deleted"),
        (status = 400, description = "Invalid id", body = ApiError),
        (status = 404, description = "Not found", body = ApiError)
    )
)]
pub async fn delete_subscription(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = match parse_uuid(&path, "id") {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match subscription_service.delete_subscription(id).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscriptions")
            .route("", web::get().to(list_subscriptions))
            .route("", web::post().to(create_subscription))
            .route("/{id}", web::get().to(get_subscription))
            .route("/{id}", web::put().to(update_subscription))
            .route("/{id}", web::delete().to(delete_subscription)),
    );
}
