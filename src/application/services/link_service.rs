//! Link creation, code assignment and owner-scoped management.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::domain::entities::{LinkQuery, NewShortLink, ShortLink};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::error::LinkError;
use crate::utils::code_generator::{
    DEFAULT_CODE_LENGTH, generate_code, is_reserved, is_valid_alias,
};
use crate::utils::url_validator::validate_url;

/// Default cap on random code attempts per request.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Input for creating a short link.
#[derive(Debug, Clone)]
pub struct ShortenInput {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Service for creating short links and managing an owner's links.
///
/// Uniqueness is checked against the store before insert, but the store's
/// unique indexes decide: a conflicting insert becomes
/// [`LinkError::AliasTaken`] for custom aliases and triggers another
/// generation attempt for random codes.
pub struct LinkService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    base_url: String,
    code_length: usize,
    max_attempts: usize,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a link service with the default code policy (6 characters,
    /// 10 attempts).
    pub fn new(repository: Arc<L>, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            base_url: base_url.into(),
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the generated code length and the attempt cap.
    pub fn with_code_policy(mut self, code_length: usize, max_attempts: usize) -> Self {
        self.code_length = code_length;
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Resolves the code a new link will be stored under.
    ///
    /// - With a custom alias: the alias must pass [`is_valid_alias`] and must
    ///   not match any existing code or alias; it then becomes the code.
    /// - Without: random codes are generated until one is not in use, up to
    ///   the attempt cap.
    ///
    /// # Errors
    ///
    /// - [`LinkError::InvalidAlias`] - alias fails the charset/length policy
    /// - [`LinkError::AliasTaken`] - alias is reserved or already in use
    /// - [`LinkError::GenerationExhausted`] - every random attempt collided
    /// - [`LinkError::StoreUnavailable`] - the uniqueness query failed
    pub async fn assign_code(&self, custom_alias: Option<&str>) -> Result<String, LinkError> {
        let mut attempts = 0;
        self.assign_code_within(custom_alias, &mut attempts).await
    }

    /// [`Self::assign_code`] drawing random attempts from a caller-held budget,
    /// so insert-time retries and pre-check collisions share one cap.
    async fn assign_code_within(
        &self,
        custom_alias: Option<&str>,
        attempts: &mut usize,
    ) -> Result<String, LinkError> {
        match custom_alias {
            Some(alias) => self.check_alias(alias).await,
            None => self.generate_unique_code(attempts).await,
        }
    }

    /// Creates a short link for `owner_id`.
    ///
    /// Validation (URL, alias pattern, expiry) happens before any store access.
    ///
    /// # Errors
    ///
    /// See [`Self::assign_code`], plus [`LinkError::InvalidUrl`] and
    /// [`LinkError::InvalidExpiry`].
    pub async fn shorten(
        &self,
        owner_id: i64,
        input: ShortenInput,
    ) -> Result<ShortLink, LinkError> {
        validate_url(&input.original_url).map_err(|e| LinkError::InvalidUrl(e.to_string()))?;

        if let Some(expires_at) = input.expires_at
            && expires_at <= Utc::now()
        {
            return Err(LinkError::InvalidExpiry);
        }

        if let Some(alias) = input.custom_alias.as_deref()
            && !is_valid_alias(alias)
        {
            return Err(LinkError::InvalidAlias(alias.to_string()));
        }

        let link = match input.custom_alias {
            Some(alias) => {
                let code = self.assign_code(Some(&alias)).await?;
                let new_link = NewShortLink {
                    code,
                    original_url: input.original_url,
                    custom_alias: Some(alias.clone()),
                    owner_id,
                    expires_at: input.expires_at,
                };

                match self.repository.insert(new_link).await {
                    Ok(link) => link,
                    Err(StoreError::Conflict { constraint }) => {
                        debug!(alias = %alias, ?constraint, "Alias lost insert race");
                        return Err(LinkError::AliasTaken(alias));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            None => {
                self.insert_with_random_code(owner_id, input.original_url, input.expires_at)
                    .await?
            }
        };

        metrics::counter!("shortlink_links_created_total").increment(1);
        info!(
            link_id = link.id,
            code = %link.code,
            owner_id,
            "Short link created"
        );

        Ok(link)
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    /// Lists an owner's links, newest first, with the total matching count.
    pub async fn list_links(
        &self,
        owner_id: i64,
        query: LinkQuery,
    ) -> Result<(Vec<ShortLink>, i64), LinkError> {
        let search = query.search.clone();
        let links = self.repository.list_owned(owner_id, query).await?;
        let total = self.repository.count_owned(owner_id, search).await?;
        Ok((links, total))
    }

    /// Retrieves one of the owner's links.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NotFound`] if the link does not exist or belongs
    /// to another owner.
    pub async fn get_link(&self, owner_id: i64, id: i64) -> Result<ShortLink, LinkError> {
        self.repository
            .find_owned(id, owner_id)
            .await?
            .ok_or_else(|| LinkError::NotFound(id.to_string()))
    }

    /// Deletes one of the owner's links along with its click history.
    pub async fn delete_link(&self, owner_id: i64, id: i64) -> Result<(), LinkError> {
        if !self.repository.delete_owned(id, owner_id).await? {
            return Err(LinkError::NotFound(id.to_string()));
        }

        info!(link_id = id, owner_id, "Short link deleted");
        Ok(())
    }

    /// Deletes links that expired more than `retention` ago.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::RetentionOutOfRange`] when `now - retention` is
    /// not representable; the store is not touched.
    pub async fn sweep_expired(&self, retention: Duration) -> Result<u64, LinkError> {
        let cutoff = Utc::now()
            .checked_sub_signed(retention)
            .ok_or(LinkError::RetentionOutOfRange {
                seconds: retention.num_seconds(),
            })?;
        let removed = self.repository.delete_expired_before(cutoff).await?;
        if removed > 0 {
            metrics::counter!("shortlink_expired_links_swept_total").increment(removed);
            info!(removed, %cutoff, "Swept expired links");
        }
        Ok(removed)
    }

    /// Verifies the backing store is reachable.
    pub async fn store_health(&self) -> Result<(), LinkError> {
        Ok(self.repository.ping().await?)
    }

    async fn check_alias(&self, alias: &str) -> Result<String, LinkError> {
        if !is_valid_alias(alias) {
            return Err(LinkError::InvalidAlias(alias.to_string()));
        }

        if is_reserved(alias) || self.repository.key_in_use(alias).await? {
            return Err(LinkError::AliasTaken(alias.to_string()));
        }

        Ok(alias.to_string())
    }

    /// Generates codes until one is free, counting every attempt in `attempts`.
    async fn generate_unique_code(&self, attempts: &mut usize) -> Result<String, LinkError> {
        while *attempts < self.max_attempts {
            *attempts += 1;
            let code = generate_code(self.code_length);

            if is_reserved(&code) {
                continue;
            }

            if !self.repository.code_exists(&code).await? {
                return Ok(code);
            }

            debug!(code = %code, attempt = *attempts, "Generated code already in use");
        }

        warn!(attempts = self.max_attempts, "Code generation exhausted");
        Err(LinkError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    async fn insert_with_random_code(
        &self,
        owner_id: i64,
        original_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShortLink, LinkError> {
        let mut attempts = 0;

        loop {
            let code = self.assign_code_within(None, &mut attempts).await?;
            let new_link = NewShortLink {
                code: code.clone(),
                original_url: original_url.clone(),
                custom_alias: None,
                owner_id,
                expires_at,
            };

            match self.repository.insert(new_link).await {
                Ok(link) => return Ok(link),
                Err(StoreError::Conflict { constraint }) => {
                    debug!(code = %code, ?constraint, "Generated code lost insert race, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
