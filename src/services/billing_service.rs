use crate::error::AppResult;
use crate::models::{BillingWindow, SummaryQuery};
use crate::storage::{SubscriptionFilter, SubscriptionStore};
use crate::utils::{non_blank, parse_optional_uuid, parse_period};
use std::sync::Arc;

/// Total price of every subscription active at some point in `[from, to]`.
///
/// `from` and `to` are `MM-YYYY`; the window runs from the first instant of
/// `from` to the last instant of `to`. An inverted window is not an error, it
/// simply matches nothing. Zero matches sum to 0.
pub async fn summarize(
    store: &dyn SubscriptionStore,
    from: Option<&str>,
    to: Option<&str>,
    user_id: Option<&str>,
    service_name: Option<&str>,
) -> AppResult<i64> {
    let from = parse_period(from, "from")?;
    let to = parse_period(to, "to")?;
    let window = BillingWindow::between(from, to);
    let user_id = parse_optional_uuid(user_id, "user_id")?;

    let filter = SubscriptionFilter {
        user_id,
        service_name: non_blank(service_name).map(str::to_string),
        window: Some(window),
    };
    log::debug!("Summarizing {from}..{to} with {filter:?}");
    store.total_price(&filter).await
}

#[derive(Clone)]
pub struct BillingService {
    store: Arc<dyn SubscriptionStore>,
}

impl BillingService {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    pub async fn summarize(&self, query: &SummaryQuery) -> AppResult<i64> {
        summarize(
            self.store.as_ref(),
            query.from.as_deref(),
            query.to.as_deref(),
            query.user_id.as_deref(),
            query.service_name.as_deref(),
        )
        .await
    }
}
