use crate::entities::subscription_entity as subscriptions;
use crate::error::AppResult;
use crate::models::Subscription;
use crate::storage::{SubscriptionFilter, SubscriptionStore};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, UpdateMany,
};
use uuid::Uuid;

pub struct SeaOrmSubscriptionStore {
    pool: DatabaseConnection,
}

impl SeaOrmSubscriptionStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

/// Every column except the primary key.
fn to_active_model(s: &Subscription) -> subscriptions::ActiveModel {
    subscriptions::ActiveModel {
        id: NotSet,
        service_name: Set(s.service_name.clone()),
        price: Set(s.price),
        user_id: Set(s.user_id),
        start_date: Set(s.start_period.start_instant()),
        end_date: Set(s.end_period.as_period().map(|p| p.start_instant())),
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub(crate) fn filter_condition(filter: &SubscriptionFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(user_id) = filter.user_id {
        cond = cond.add(subscriptions::Column::UserId.eq(user_id));
    }
    if let Some(needle) = filter.service_name.as_deref() {
        let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
        cond = cond.add(
            Expr::expr(Func::lower(Expr::col(subscriptions::Column::ServiceName)))
                .like(LikeExpr::new(pattern).escape('\\')),
        );
    }
    if let Some(window) = filter.window {
        // start_date <= window.end AND (end_date IS NULL OR end_date >= window.start)
        cond = cond
            .add(subscriptions::Column::StartDate.lte(window.end))
            .add(
                Condition::any()
                    .add(subscriptions::Column::EndDate.is_null())
                    .add(subscriptions::Column::EndDate.gte(window.start)),
            );
    }
    cond
}

#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: i64,
}

fn update_query(id: Uuid, subscription: &Subscription) -> UpdateMany<subscriptions::Entity> {
    subscriptions::Entity::update_many()
        .set(to_active_model(subscription))
        .filter(subscriptions::Column::Id.eq(id))
}

fn list_query(filter: &SubscriptionFilter) -> Select<subscriptions::Entity> {
    subscriptions::Entity::find()
        .filter(filter_condition(filter))
        .order_by_asc(subscriptions::Column::StartDate)
        .order_by_asc(subscriptions::Column::Id)
}

/// Single-row aggregate; the cast keeps SUM(bigint) from coming back as numeric.
fn total_query(filter: &SubscriptionFilter) -> Select<subscriptions::Entity> {
    subscriptions::Entity::find()
        .filter(filter_condition(filter))
        .select_only()
        .column_as(Expr::cust("CAST(COALESCE(SUM(price), 0) AS BIGINT)"), "total")
}

#[async_trait]
impl SubscriptionStore for SeaOrmSubscriptionStore {
    async fn insert(&self, subscription: &Subscription) -> AppResult<()> {
        let mut model = to_active_model(subscription);
        model.id = Set(subscription.id);
        subscriptions::Entity::insert(model)
            .exec_without_returning(&self.pool)
            .await?;
        Ok(())
    }

    async fn update(&self, id: Uuid, subscription: &Subscription) -> AppResult<u64> {
        let result = update_query(id, subscription).exec(&self.pool).await?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = subscriptions::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        let model = subscriptions::Entity::find_by_id(id).one(&self.pool).await?;
        Ok(model.map(Subscription::from))
    }

    async fn query(&self, filter: &SubscriptionFilter) -> AppResult<Vec<Subscription>> {
        let models = list_query(filter).all(&self.pool).await?;
        Ok(models.into_iter().map(Subscription::from).collect())
    }

    async fn total_price(&self, filter: &SubscriptionFilter) -> AppResult<i64> {
        let total = total_query(filter)
            .into_model::<TotalRow>()
            .one(&self.pool)
            .await?
            .map(|r| r.total)
            .unwrap_or(0);
        Ok(total)
    }
}
