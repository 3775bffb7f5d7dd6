//! Persistence for subscription records.
//!
//! Services receive an `Arc<dyn SubscriptionStore>`; Postgres and in-memory
//! backends share the same filter semantics.

pub mod memory;
pub mod sea_orm_store;

pub use memory::InMemorySubscriptionStore;
pub use sea_orm_store::SeaOrmSubscriptionStore;

use crate::error::AppResult;
use crate::models::{BillingWindow, Subscription};
use async_trait::async_trait;
use sea_orm::DbErr;
use uuid::Uuid;

/// Conjunction of optional filters applied by `query` and `total_price`.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub user_id: Option<Uuid>,
    /// Case-insensitive substring of `service_name`
    pub service_name: Option<String>,
    /// Keep only subscriptions active at some point inside the window
    pub window: Option<BillingWindow>,
}

impl SubscriptionFilter {
    pub fn matches(&self, subscription: &Subscription) -> bool {
        if let Some(user_id) = self.user_id
            && subscription.user_id != user_id
        {
            return false;
        }
        if let Some(needle) = self.service_name.as_deref()
            && !subscription.service_name_contains(needle)
        {
            return false;
        }
        match &self.window {
            Some(window) => subscription.overlaps(window),
            None => true,
        }
    }
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn insert(&self, subscription: &Subscription) -> AppResult<()>;

    /// Replaces every column but the id. Returns the number of rows touched.
    async fn update(&self, id: Uuid, subscription: &Subscription) -> AppResult<u64>;

    /// Returns the number of rows removed.
    async fn delete(&self, id: Uuid) -> AppResult<u64>;

    async fn get(&self, id: Uuid) -> AppResult<Option<Subscription>>;

    /// Matching rows ordered by start period, then id.
    async fn query(&self, filter: &SubscriptionFilter) -> AppResult<Vec<Subscription>>;

    /// Sum of `price` over matching rows, 0 when nothing matches. A total past
    /// `i64::MAX` is a store error, the same as a BIGINT overflow in Postgres.
    async fn total_price(&self, filter: &SubscriptionFilter) -> AppResult<i64> {
        let rows = self.query(filter).await?;
        let total = rows
            .iter()
            .try_fold(0i64, |acc, s| acc.checked_add(s.price))
            .ok_or_else(|| DbErr::Custom("price total is out of range for bigint".to_string()))?;
        Ok(total)
    }
}
