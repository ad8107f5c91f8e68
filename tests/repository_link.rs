//! PostgreSQL link and click repositories.
//!
//! Run with `DATABASE_URL` pointing at a disposable server:
//! `cargo test --test repository_link -- --ignored`

use chrono::{Duration, Utc};
use shortlink::domain::entities::{LinkQuery, NewClick, NewShortLink};
use shortlink::domain::repositories::{
    ClickRepository, LinkRepository, StoreError, TokenRepository,
};
use shortlink::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgTokenRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

async fn create_owner(pool: &PgPool, name: &str) -> i64 {
    PgTokenRepository::new(Arc::new(pool.clone()))
        .create_token(name, &format!("{name}-hash"))
        .await
        .unwrap()
        .id
}

fn new_link(code: &str, url: &str, owner_id: i64) -> NewShortLink {
    NewShortLink {
        code: code.to_string(),
        original_url: url.to_string(),
        custom_alias: None,
        owner_id,
        expires_at: None,
    }
}

fn new_click(ip: &str) -> NewClick {
    NewClick {
        ip: ip.to_string(),
        user_agent: "TestBot/1.0".to_string(),
        referrer: "direct".to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_insert_link(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .insert(new_link("test12", "https://example.com", owner_id))
        .await
        .unwrap();

    assert_eq!(link.code, "test12");
    assert_eq!(link.original_url, "https://example.com");
    assert_eq!(link.owner_id, owner_id);
    assert_eq!(link.click_count, 0);
    assert!(link.active);
    assert!(link.custom_alias.is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_insert_duplicate_code_is_conflict(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(new_link("dup001", "https://a.example.com", owner_id))
        .await
        .unwrap();
    let result = repo
        .insert(new_link("dup001", "https://b.example.com", owner_id))
        .await;

    assert_eq!(
        result.unwrap_err(),
        StoreError::Conflict {
            constraint: Some("short_links_code_key".to_string())
        }
    );
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_find_active_by_key_matches_code_and_alias(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(NewShortLink {
        custom_alias: Some("promo".to_string()),
        ..new_link("promo", "https://example.com/promo", owner_id)
    })
    .await
    .unwrap();
    repo.insert(new_link("abc123", "https://example.com", owner_id))
        .await
        .unwrap();

    let by_alias = repo.find_active_by_key("promo").await.unwrap().unwrap();
    assert_eq!(by_alias.original_url, "https://example.com/promo");

    let by_code = repo.find_active_by_key("abc123").await.unwrap().unwrap();
    assert_eq!(by_code.original_url, "https://example.com");

    assert!(repo.find_active_by_key("PROMO").await.unwrap().is_none());
    assert!(repo.find_active_by_key("missing").await.unwrap().is_none());

    assert!(repo.key_in_use("promo").await.unwrap());
    assert!(repo.code_exists("abc123").await.unwrap());
    assert!(!repo.key_in_use("free01").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_expired_link_is_still_found(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(NewShortLink {
        expires_at: Some(Utc::now() - Duration::hours(1)),
        ..new_link("old001", "https://example.com", owner_id)
    })
    .await
    .unwrap();

    // Expiry is judged by the caller so it can answer 410 instead of 404.
    let link = repo.find_active_by_key("old001").await.unwrap().unwrap();
    assert!(link.is_expired());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_list_and_count_owned(pool: PgPool) {
    let alice = create_owner(&pool, "alice").await;
    let bob = create_owner(&pool, "bob").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    for (code, url) in [
        ("a00001", "https://docs.example.com/1"),
        ("a00002", "https://blog.example.com/2"),
        ("a00003", "https://docs.example.com/3"),
    ] {
        repo.insert(new_link(code, url, alice)).await.unwrap();
    }
    repo.insert(new_link("b00001", "https://docs.example.com/b", bob))
        .await
        .unwrap();

    let page = repo
        .list_owned(
            alice,
            LinkQuery {
                offset: 0,
                limit: 2,
                search: None,
            },
        )
        .await
        .unwrap();
    let codes: Vec<_> = page.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, ["a00003", "a00002"]);
    assert_eq!(repo.count_owned(alice, None).await.unwrap(), 3);

    let docs = repo
        .list_owned(
            alice,
            LinkQuery {
                offset: 0,
                limit: 10,
                search: Some("DOCS".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(
        repo.count_owned(alice, Some("DOCS".to_string()))
            .await
            .unwrap(),
        2
    );
    assert_eq!(repo.count_owned(bob, None).await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_search_treats_wildcards_literally(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    for (code, url) in [
        ("w00001", "https://example.com/sale_50%"),
        ("w00002", "https://example.com/salex50x"),
        ("w00003", "https://example.com/plain"),
    ] {
        repo.insert(new_link(code, url, owner_id)).await.unwrap();
    }

    for (term, expected) in [("sale_50", 1), ("%", 1), ("_", 1), ("SALE", 2)] {
        let count = repo
            .count_owned(owner_id, Some(term.to_string()))
            .await
            .unwrap();
        assert_eq!(count, expected, "{term}");
    }

    let found = repo
        .list_owned(
            owner_id,
            LinkQuery {
                offset: 0,
                limit: 10,
                search: Some("50%".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].code, "w00001");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_delete_owned_checks_owner(pool: PgPool) {
    let alice = create_owner(&pool, "alice").await;
    let bob = create_owner(&pool, "bob").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .insert(new_link("del001", "https://example.com", alice))
        .await
        .unwrap();

    assert!(!repo.delete_owned(link.id, bob).await.unwrap());
    assert!(repo.delete_owned(link.id, alice).await.unwrap());
    assert!(repo.find_owned(link.id, alice).await.unwrap().is_none());
    assert!(!repo.delete_owned(link.id, alice).await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_delete_expired_before(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let repo = PgLinkRepository::new(Arc::new(pool));
    let now = Utc::now();

    repo.insert(NewShortLink {
        expires_at: Some(now - Duration::days(2)),
        ..new_link("gone01", "https://example.com", owner_id)
    })
    .await
    .unwrap();
    repo.insert(NewShortLink {
        expires_at: Some(now - Duration::minutes(5)),
        ..new_link("recent", "https://example.com", owner_id)
    })
    .await
    .unwrap();
    repo.insert(new_link("keep01", "https://example.com", owner_id))
        .await
        .unwrap();

    let removed = repo
        .delete_expired_before(now - Duration::days(1))
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert!(repo.find_active_by_key("gone01").await.unwrap().is_none());
    assert!(repo.find_active_by_key("recent").await.unwrap().is_some());
    assert!(repo.find_active_by_key("keep01").await.unwrap().is_some());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_record_click_updates_count_and_history(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let clicks = PgClickRepository::new(pool);

    let link = links
        .insert(new_link("clk001", "https://example.com", owner_id))
        .await
        .unwrap();

    let first = clicks
        .record_click(link.id, new_click("203.0.113.1"))
        .await
        .unwrap()
        .unwrap();
    clicks
        .record_click(link.id, new_click("203.0.113.2"))
        .await
        .unwrap();

    assert_eq!(first.link_id, link.id);
    assert_eq!(first.ip, "203.0.113.1");

    let stored = links.find_owned(link.id, owner_id).await.unwrap().unwrap();
    assert_eq!(stored.click_count, 2);

    let history = clicks.history(link.id).await.unwrap();
    let ips: Vec<_> = history.iter().map(|c| c.ip.as_str()).collect();
    assert_eq!(ips, ["203.0.113.1", "203.0.113.2"]);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_record_click_on_expired_link_is_noop(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let clicks = PgClickRepository::new(pool);

    let link = links
        .insert(NewShortLink {
            expires_at: Some(Utc::now() - Duration::seconds(1)),
            ..new_link("exp001", "https://example.com", owner_id)
        })
        .await
        .unwrap();

    let recorded = clicks
        .record_click(link.id, new_click("203.0.113.1"))
        .await
        .unwrap();

    assert!(recorded.is_none());
    assert!(clicks.history(link.id).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_inactive_link_neither_resolves_nor_counts(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let clicks = PgClickRepository::new(pool.clone());

    let link = links
        .insert(NewShortLink {
            custom_alias: Some("offline".to_string()),
            ..new_link("off001", "https://example.com", owner_id)
        })
        .await
        .unwrap();

    sqlx::query("UPDATE short_links SET active = FALSE WHERE id = $1")
        .bind(link.id)
        .execute(pool.as_ref())
        .await
        .unwrap();

    assert!(links.find_active_by_key("off001").await.unwrap().is_none());
    assert!(links.find_active_by_key("offline").await.unwrap().is_none());

    let recorded = clicks
        .record_click(link.id, new_click("203.0.113.9"))
        .await
        .unwrap();
    assert!(recorded.is_none());

    let stored = links.find_owned(link.id, owner_id).await.unwrap().unwrap();
    assert!(!stored.active);
    assert_eq!(stored.click_count, 0);
    assert!(clicks.history(link.id).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_concurrent_clicks_are_all_counted(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let clicks = Arc::new(PgClickRepository::new(pool));

    let link = links
        .insert(new_link("hot001", "https://example.com", owner_id))
        .await
        .unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let clicks = clicks.clone();
            tokio::spawn(async move {
                clicks
                    .record_click(link.id, new_click(&format!("198.51.100.{i}")))
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let stored = links.find_owned(link.id, owner_id).await.unwrap().unwrap();
    assert_eq!(stored.click_count, 20);
    assert_eq!(clicks.history(link.id).await.unwrap().len(), 20);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
