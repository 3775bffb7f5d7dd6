use crate::entities::subscription_entity as subscriptions;
use crate::models::period::{BillingWindow, EndPeriod, MonthPeriod};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    /// Smallest currency unit, never negative.
    pub price: i64,
    pub user_id: Uuid,
    pub start_period: MonthPeriod,
    pub end_period: EndPeriod,
}

impl Subscription {
    /// Started on or before the window's end, and either never ends or ends on
    /// or after the window's start.
    pub fn overlaps(&self, window: &BillingWindow) -> bool {
        self.start_period.start_instant() <= window.end && self.end_period.reaches(window.start)
    }

    pub fn service_name_contains(&self, needle: &str) -> bool {
        self.service_name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

impl From<subscriptions::Model> for Subscription {
    fn from(m: subscriptions::Model) -> Self {
        Self {
            id: m.id,
            service_name: m.service_name,
            price: m.price,
            user_id: m.user_id,
            start_period: MonthPeriod::from_instant(m.start_date),
            end_period: m.end_date.map(MonthPeriod::from_instant).into(),
        }
    }
}

/// Body of create and update. Update replaces every field; the id comes from the path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionRequest {
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400)]
    pub price: i64,
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: String,
    /// MM-YYYY
    #[serde(alias = "start_date")]
    #[schema(example = "07-2025")]
    pub start_period: String,
    /// MM-YYYY; omit for an open-ended subscription
    #[serde(default, alias = "end_date")]
    #[schema(example = "12-2025")]
    pub end_period: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    #[schema(example = "07-2025")]
    pub start_period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "12-2025")]
    pub end_period: Option<String>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            service_name: s.service_name,
            price: s.price,
            user_id: s.user_id,
            start_period: s.start_period.to_string(),
            end_period: s.end_period.as_period().map(|p| p.to_string()),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionListQuery {
    pub user_id: Option<String>,
    /// Case-insensitive substring
    pub service_name: Option<String>,
}
