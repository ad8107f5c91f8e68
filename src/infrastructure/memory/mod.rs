//! In-process store backing all repository traits.
//!
//! Used when `STORAGE_BACKEND=memory` and by the HTTP integration tests. All
//! data is lost on restart. Every mutation takes the single write lock, so
//! the click counter and history are updated together.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{ApiToken, Click, LinkQuery, NewClick, NewShortLink, ShortLink};
use crate::domain::repositories::{ClickRepository, LinkRepository, StoreError, TokenRepository};

#[derive(Default)]
struct State {
    links: BTreeMap<i64, ShortLink>,
    clicks: Vec<Click>,
    tokens: BTreeMap<i64, ApiToken>,
    next_link_id: i64,
    next_click_id: i64,
    next_token_id: i64,
}

impl State {
    fn key_in_use(&self, key: &str) -> bool {
        self.links.values().any(|l| l.matches_key(key))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a link's `active` flag. Inactive links stop resolving and stop
    /// accepting clicks but stay visible to their owner.
    ///
    /// Returns `false` if no link has `id`.
    pub async fn set_active(&self, id: i64, active: bool) -> bool {
        let mut state = self.state.write().await;
        match state.links.get_mut(&id) {
            Some(link) => {
                link.active = active;
                link.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

fn conflict(constraint: &str) -> StoreError {
    StoreError::Conflict {
        constraint: Some(constraint.to_string()),
    }
}

fn matches_search(link: &ShortLink, search: Option<&str>) -> bool {
    let Some(term) = search else {
        return true;
    };
    let term = term.to_lowercase();

    link.original_url.to_lowercase().contains(&term)
        || link.code.to_lowercase().contains(&term)
        || link
            .custom_alias
            .as_deref()
            .is_some_and(|a| a.to_lowercase().contains(&term))
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError> {
        let mut state = self.state.write().await;

        if state.links.values().any(|l| l.code == new_link.code) {
            return Err(conflict("short_links_code_key"));
        }
        if let Some(alias) = new_link.custom_alias.as_deref()
            && state.key_in_use(alias)
        {
            return Err(conflict("short_links_custom_alias_key"));
        }

        state.next_link_id += 1;
        let now = Utc::now();
        let link = ShortLink {
            id: state.next_link_id,
            code: new_link.code,
            original_url: new_link.original_url,
            custom_alias: new_link.custom_alias,
            owner_id: new_link.owner_id,
            click_count: 0,
            expires_at: new_link.expires_at,
            active: true,
            created_at: now,
            updated_at: now,
        };
        state.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn code_exists(&self, code: &str) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        Ok(state.links.values().any(|l| l.code == code))
    }

    async fn key_in_use(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.state.read().await.key_in_use(key))
    }

    async fn find_active_by_key(&self, key: &str) -> Result<Option<ShortLink>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .links
            .values()
            .find(|l| l.active && l.matches_key(key))
            .cloned())
    }

    async fn find_owned(&self, id: i64, owner_id: i64) -> Result<Option<ShortLink>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .links
            .get(&id)
            .filter(|l| l.owner_id == owner_id)
            .cloned())
    }

    async fn list_owned(
        &self,
        owner_id: i64,
        query: LinkQuery,
    ) -> Result<Vec<ShortLink>, StoreError> {
        let state = self.state.read().await;

        let mut links: Vec<ShortLink> = state
            .links
            .values()
            .filter(|l| l.owner_id == owner_id && matches_search(l, query.search.as_deref()))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn count_owned(&self, owner_id: i64, search: Option<String>) -> Result<i64, StoreError> {
        let state = self.state.read().await;
        let count = state
            .links
            .values()
            .filter(|l| l.owner_id == owner_id && matches_search(l, search.as_deref()))
            .count();

        Ok(count as i64)
    }

    async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        if !state.links.get(&id).is_some_and(|l| l.owner_id == owner_id) {
            return Ok(false);
        }

        state.links.remove(&id);
        state.clicks.retain(|c| c.link_id != id);
        Ok(true)
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;

        let expired: Vec<i64> = state
            .links
            .values()
            .filter(|l| l.expires_at.is_some_and(|e| e <= cutoff))
            .map(|l| l.id)
            .collect();

        for id in &expired {
            state.links.remove(id);
        }
        state.clicks.retain(|c| !expired.contains(&c.link_id));

        Ok(expired.len() as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn record_click(
        &self,
        link_id: i64,
        new_click: NewClick,
    ) -> Result<Option<Click>, StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();

        let Some(link) = state
            .links
            .get_mut(&link_id)
            .filter(|l| l.active && !l.is_expired_at(now))
        else {
            return Ok(None);
        };
        link.click_count += 1;
        link.updated_at = now;

        state.next_click_id += 1;
        let click = Click {
            id: state.next_click_id,
            link_id,
            clicked_at: now,
            ip: new_click.ip,
            user_agent: new_click.user_agent,
            referrer: new_click.referrer,
        };
        state.clicks.push(click.clone());

        Ok(Some(click))
    }

    async fn history(&self, link_id: i64) -> Result<Vec<Click>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn find_active_by_hash(&self, token_hash: &str) -> Result<Option<ApiToken>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .values()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
            .cloned())
    }

    async fn update_last_used(&self, token_id: i64) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if let Some(token) = state.tokens.get_mut(&token_id)
            && !token.is_revoked()
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, StoreError> {
        let mut state = self.state.write().await;

        if state.tokens.values().any(|t| t.name == name) {
            return Err(conflict("api_tokens_name_key"));
        }
        if state.tokens.values().any(|t| t.token_hash == token_hash) {
            return Err(conflict("api_tokens_token_hash_key"));
        }

        state.next_token_id += 1;
        let token = ApiToken {
            id: state.next_token_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        state.tokens.insert(token.id, token.clone());

        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, StoreError> {
        let state = self.state.read().await;
        let mut tokens: Vec<ApiToken> = state.tokens.values().cloned().collect();
        tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tokens)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, StoreError> {
        Ok(self.state.read().await.tokens.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, StoreError> {
        let state = self.state.read().await;
        Ok(state.tokens.values().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.tokens.get_mut(&id) {
            Some(token) if !token.is_revoked() => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
