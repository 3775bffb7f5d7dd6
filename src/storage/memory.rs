use crate::error::{AppError, AppResult};
use crate::models::Subscription;
use crate::storage::{SubscriptionFilter, SubscriptionStore};
use async_trait::async_trait;
use sea_orm::DbErr;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store, used by tests and by `DATABASE_URL=memory://`.
#[derive(Clone, Default)]
pub struct InMemorySubscriptionStore {
    rows: Arc<RwLock<HashMap<Uuid, Subscription>>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn insert(&self, subscription: &Subscription) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&subscription.id) {
            return Err(AppError::DatabaseError(DbErr::Custom(format!(
                "duplicate subscription id {}",
                subscription.id
            ))));
        }
        rows.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, subscription: &Subscription) -> AppResult<u64> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(row) => {
                *row = Subscription {
                    id,
                    ..subscription.clone()
                };
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        Ok(self.rows.write().await.remove(&id).map_or(0, |_| 1))
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn query(&self, filter: &SubscriptionFilter) -> AppResult<Vec<Subscription>> {
        let rows = self.rows.read().await;
        let mut matched: Vec<Subscription> =
            rows.values().filter(|s| filter.matches(s)).cloned().collect();
        matched.sort_by_key(|s| (s.start_period, s.id));
        Ok(matched)
    }
}
