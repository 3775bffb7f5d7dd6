use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::subscription::create_subscription,
        handlers::subscription::list_subscriptions,
        handlers::subscription::get_subscription,
        handlers::subscription::update_subscription,
        handlers::subscription::delete_subscription,
        handlers::summary::get_summary,
    ),
    components(
        schemas(
            SubscriptionRequest,
            SubscriptionResponse,
            SubscriptionListQuery,
            SummaryQuery,
            SummaryResponse,
            ApiError,
        )
    ),
    tags(
        (name = "subscriptions", description = "User subscription records"),
        (name = "summary", description = "Subscription cost over a period"),
    ),
    info(
        title = "Subscription API",
        version = "1.0.0",
        description = "REST service for managing user subscriptions and their cost over time"
    ),
    servers(
        (url = "/", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
