use async_trait::async_trait;

use crate::adapters::persistence::PostgresPersistence;
use crate::app_error::{AppError, AppResult};
use crate::application::use_cases::users::MembershipNumbers;

const MEMBERSHIP_COUNTER: &str = "membership_number";

/// Membership numbers come from an atomic upsert on the counters table.
/// The increment happens inside the database, so concurrent approvals
/// each observe a distinct value; no row counting is involved anywhere.
#[async_trait]
impl MembershipNumbers for PostgresPersistence {
    async fn next(&self) -> AppResult<i64> {
        let value: i64 = sqlx::query_scalar(
            "INSERT INTO counters (name, value) VALUES ($1, 1) \
             ON CONFLICT (name) DO UPDATE SET value = counters.value + 1 \
             RETURNING value",
        )
        .bind(MEMBERSHIP_COUNTER)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(value)
    }
}
