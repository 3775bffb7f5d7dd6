use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use std::sync::Arc;

use subscription_service::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    logging::init_logger,
    middlewares::create_cors,
    services::{BillingService, SubscriptionService},
    storage::{InMemorySubscriptionStore, SeaOrmSubscriptionStore, SubscriptionStore},
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let config = Config::load().context("Failed to load configuration")?;

    let store: Arc<dyn SubscriptionStore> = if config.database.is_in_memory() {
        log::warn!("Using in-memory subscription store, data will not survive a restart");
        Arc::new(InMemorySubscriptionStore::new())
    } else {
        let pool = create_pool(&config.database)
            .await
            .context("Failed to create database connection pool")?;

        if config.database.run_migrations {
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            log::info!("Database migrations applied");
        }
        Arc::new(SeaOrmSubscriptionStore::new(pool))
    };

    let subscription_service = SubscriptionService::new(store.clone());
    let billing_service = BillingService::new(store);
    let cors_config = config.cors.clone();

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors(&cors_config))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(billing_service.clone()))
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .configure(swagger_config)
            .configure(handlers::subscription_config)
            .configure(handlers::summary_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
