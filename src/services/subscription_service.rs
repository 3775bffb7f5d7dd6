use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::storage::{SubscriptionFilter, SubscriptionStore};
use crate::utils::{
    non_blank, parse_optional_uuid, parse_uuid, validate_price, validate_service_name,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    pub async fn create_subscription(&self, request: SubscriptionRequest) -> AppResult<Subscription> {
        let subscription = build_subscription(Uuid::new_v4(), request)?;
        self.store.insert(&subscription).await?;
        log::info!(
            "Created subscription {} ({}) for user {}",
            subscription.id,
            subscription.service_name,
            subscription.user_id
        );
        Ok(subscription)
    }

    pub async fn get_subscription(&self, id: Uuid) -> AppResult<Subscription> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))
    }

    /// Exact `user_id` match and case-insensitive `service_name` substring, both optional.
    pub async fn list_subscriptions(
        &self,
        query: &SubscriptionListQuery,
    ) -> AppResult<Vec<Subscription>> {
        let filter = SubscriptionFilter {
            user_id: parse_optional_uuid(query.user_id.as_deref(), "user_id")?,
            service_name: non_blank(query.service_name.as_deref()).map(str::to_string),
            window: None,
        };
        self.store.query(&filter).await
    }

    /// Full replace of every field except the id.
    pub async fn update_subscription(
        &self,
        id: Uuid,
        request: SubscriptionRequest,
    ) -> AppResult<Subscription> {
        let subscription = build_subscription(id, request)?;
        let rows = self.store.update(id, &subscription).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Subscription not found".to_string()));
        }
        log::info!("Updated subscription {id}");
        Ok(subscription)
    }

    pub async fn delete_subscription(&self, id: Uuid) -> AppResult<()> {
        let rows = self.store.delete(id).await?;
        if rows == 0 {
            return Err(AppError::NotFound("Subscription not found".to_string()));
        }
        log::info!("Deleted subscription {id}");
        Ok(())
    }
}

// start <= end is deliberately not enforced
fn build_subscription(id: Uuid, request: SubscriptionRequest) -> AppResult<Subscription> {
    let service_name = validate_service_name(&request.service_name)?;
    let price = validate_price(request.price)?;
    let user_id = parse_uuid(&request.user_id, "user_id")?;
    let start_period = normalize_period(&request.start_period).map_err(|_| {
        AppError::InvalidPeriodFormat {
            field: "start_period",
        }
    })?;
    let end_period = match request.end_period.as_deref() {
        Some(text) => EndPeriod::BoundedAt(normalize_period(text).map_err(|_| {
            AppError::InvalidPeriodFormat {
                field: "end_period",
            }
        })?),
        None => EndPeriod::Unbounded,
    };

    Ok(Subscription {
        id,
        service_name,
        price,
        user_id,
        start_period,
        end_period,
    })
}
