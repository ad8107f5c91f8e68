//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{LinkQuery, NewShortLink, ShortLink};
use crate::domain::repositories::{LinkRepository, StoreError};

const LINK_COLUMNS: &str = "id, code, original_url, custom_alias, owner_id, click_count, \
                            expires_at, active, created_at, updated_at";

/// Owner filter plus optional substring search; `$2` is a [`like_pattern`].
const OWNED_FILTER: &str = "owner_id = $1 \
     AND ($2::text IS NULL \
          OR original_url ILIKE $2 ESCAPE '\\' \
          OR code ILIKE $2 ESCAPE '\\' \
          OR custom_alias ILIKE $2 ESCAPE '\\')";

/// Wraps a search term for `ILIKE`, matching `%`, `_` and `\` literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    original_url: String,
    custom_alias: Option<String>,
    owner_id: i64,
    click_count: i64,
    expires_at: Option<DateTime<Utc>>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for ShortLink {
    fn from(r: LinkRow) -> Self {
        ShortLink {
            id: r.id,
            code: r.code,
            original_url: r.original_url,
            custom_alias: r.custom_alias,
            owner_id: r.owner_id,
            click_count: r.click_count,
            expires_at: r.expires_at,
            active: r.active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for short links.
///
/// `short_links_code_key` and `short_links_custom_alias_key` are the
/// authoritative uniqueness guards; violations surface as
/// [`StoreError::Conflict`] carrying the constraint name.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError> {
        let sql = format!(
            "INSERT INTO short_links (code, original_url, custom_alias, owner_id, expires_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {LINK_COLUMNS}"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(new_link.code)
            .bind(new_link.original_url)
            .bind(new_link.custom_alias)
            .bind(new_link.owner_id)
            .bind(new_link.expires_at)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn code_exists(&self, code: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM short_links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn key_in_use(&self, key: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM short_links WHERE code = $1 OR custom_alias = $1)",
        )
        .bind(key)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn find_active_by_key(&self, key: &str) -> Result<Option<ShortLink>, StoreError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM short_links \
             WHERE active AND (code = $1 OR custom_alias = $1) \
             LIMIT 1"
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<ShortLink>, StoreError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM short_links WHERE id = $1 AND owner_id = $2");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_owned(
        &self,
        owner_id: i64,
        query: LinkQuery,
    ) -> Result<Vec<ShortLink>, StoreError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM short_links \
             WHERE {OWNED_FILTER} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(owner_id)
            .bind(query.search.as_deref().map(like_pattern))
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_owned(&self, owner_id: i64, search: Option<String>) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM short_links WHERE {OWNED_FILTER}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(owner_id)
            .bind(search.as_deref().map(like_pattern))
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM short_links WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result =
            sqlx::query("DELETE FROM short_links WHERE expires_at IS NOT NULL AND expires_at <= $1")
                .bind(cutoff)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
