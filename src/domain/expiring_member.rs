use chrono::{DateTime, Utc};

use crate::domain::subscription_status::SubscriptionStatus;

/// Read-only projection of a member whose subscription is about to end,
/// joined with the business and plan it belongs to.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExpiringMember {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub end_date: DateTime<Utc>,
    pub subscription_status: SubscriptionStatus,
    pub business_name: String,
    pub plan_name: String,
    pub plan_price: f64,
}
