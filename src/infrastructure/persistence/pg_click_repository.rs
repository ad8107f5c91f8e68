//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, StoreError};

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    ip: String,
    user_agent: String,
    referrer: String,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            link_id: r.link_id,
            clicked_at: r.clicked_at,
            ip: r.ip,
            user_agent: r.user_agent,
            referrer: r.referrer,
        }
    }
}

/// PostgreSQL repository for click history.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    /// Increments `click_count` and appends the history row in one statement,
    /// so concurrent redirects never lose an increment and the count always
    /// equals the history length. Yields `None` when the link is missing,
    /// inactive or expired at the time of the write.
    async fn record_click(
        &self,
        link_id: i64,
        new_click: NewClick,
    ) -> Result<Option<Click>, StoreError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            WITH bumped AS (
                UPDATE short_links
                SET click_count = click_count + 1, updated_at = NOW()
                WHERE id = $1
                  AND active
                  AND (expires_at IS NULL OR expires_at > NOW())
                RETURNING id
            )
            INSERT INTO link_clicks (link_id, ip, user_agent, referrer)
            SELECT id, $2, $3, $4 FROM bumped
            RETURNING id, link_id, clicked_at, ip, user_agent, referrer
            "#,
        )
        .bind(link_id)
        .bind(new_click.ip)
        .bind(new_click.user_agent)
        .bind(new_click.referrer)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn history(&self, link_id: i64) -> Result<Vec<Click>, StoreError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, link_id, clicked_at, ip, user_agent, referrer
            FROM link_clicks
            WHERE link_id = $1
            ORDER BY clicked_at ASC, id ASC
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
