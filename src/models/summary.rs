use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SummaryQuery {
    /// MM-YYYY, first month of the window
    pub from: Option<String>,
    /// MM-YYYY, last month of the window (inclusive)
    pub to: Option<String>,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    /// Sum of prices of every subscription active during the window
    pub total: i64,
}
