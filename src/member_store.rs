use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    day_window::DayWindow, expiring_member::ExpiringMember,
    subscription_status::SubscriptionStatus,
};

/// Read access to members whose subscription ends within a given day.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Active members with an end date inside `window`, in a stable order.
    async fn find_expiring_members(
        &self,
        window: &DayWindow,
    ) -> Result<Vec<ExpiringMember>, MemberStoreError>;
}

#[derive(thiserror::Error, Debug)]
pub enum MemberStoreError {
    #[error("Failed to query expiring members.")]
    Query(#[from] sqlx::Error),
}

pub struct PgMemberStore {
    db_pool: PgPool,
}

impl PgMemberStore {
    pub fn new(db_pool: PgPool) -> PgMemberStore {
        PgMemberStore { db_pool }
    }
}

fn decode_subscription_status(row: &PgRow) -> Result<SubscriptionStatus, sqlx::Error> {
    let status: String = row.try_get("subscription_status")?;

    SubscriptionStatus::parse(status).map_err(|reason| sqlx::Error::ColumnDecode {
        index: "subscription_status".into(),
        source: reason.into(),
    })
}

#[async_trait]
impl MemberStore for PgMemberStore {
    #[tracing::instrument(
        name = "Fetching members whose subscription expires within the window",
        skip(self),
        fields(day = %window.day())
    )]
    async fn find_expiring_members(
        &self,
        window: &DayWindow,
    ) -> Result<Vec<ExpiringMember>, MemberStoreError> {
        let members = sqlx::query(
            r#"
            SELECT m.id::text AS id,
                   m.email,
                   m.full_name,
                   m.end_date,
                   m.subscription_status,
                   b.name AS business_name,
                   p.plan_name,
                   p.price AS plan_price
            FROM members m
            JOIN businesses b ON b.id = m.business_id
            JOIN subscription_plans p ON p.id = m.subscription_plan_id
            WHERE m.subscription_status = $1
              AND m.end_date >= $2
              AND m.end_date < $3
            ORDER BY m.end_date, m.id
            "#,
        )
        .bind(SubscriptionStatus::Active.as_ref())
        .bind(window.start)
        .bind(window.end)
        .try_map(|row: PgRow| {
            Ok(ExpiringMember {
                subscription_status: decode_subscription_status(&row)?,
                id: row.try_get("id")?,
                email: row.try_get("email")?,
                full_name: row.try_get("full_name")?,
                end_date: row.try_get("end_date")?,
                business_name: row.try_get("business_name")?,
                plan_name: row.try_get("plan_name")?,
                plan_price: row.try_get("plan_price")?,
            })
        })
        .fetch_all(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(members)
    }
}
