use super::*;
use crate::domain::{Character, RepositoryPtr};
use uuid::Uuid;

// Initialize tracing once for all tests
static TRACING_INIT: std::sync::Once = std::sync::Once::new();

fn init_tracing() {
    // ---
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_ansi(false) // No colorization, makes logs easier to read.
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Exercises the contract every repository backend must honour.
async fn check_contract(repo: RepositoryPtr<Vec<Character>>) {
    // ---
    let key = Uuid::new_v4().to_string();
    let before = repo.count().await.expect("count failed");

    assert_eq!(repo.get(&key).await.expect("get failed"), None);

    let list = vec![Character::named("char/1", "Jon")];
    assert!(repo.put_if_absent(&key, list.clone()).await.expect("put_if_absent failed"));
    assert!(!repo
        .put_if_absent(&key, Vec::new())
        .await
        .expect("put_if_absent failed"));
    assert_eq!(repo.get(&key).await.expect("get failed"), Some(list));
    assert_eq!(repo.count().await.expect("count failed"), before + 1);

    repo.put(&key, Vec::new()).await.expect("put failed");
    assert_eq!(repo.get(&key).await.expect("get failed"), Some(Vec::new()));

    assert!(repo.delete(&key).await.expect("delete failed"));
    assert!(!repo.delete(&key).await.expect("delete failed"));
    assert_eq!(repo.get(&key).await.expect("get failed"), None);
    assert_eq!(repo.count().await.expect("count failed"), before);
}

#[tokio::test]
async fn memory_repository_honours_contract() {
    // ---
    init_tracing();
    check_contract(create_memory_repository()).await;
}

#[tokio::test]
async fn memory_repository_put_if_absent_races_have_one_winner() {
    // ---
    init_tracing();
    let repo: RepositoryPtr<Uuid> = create_memory_repository();

    let attempts = (0..16).map(|_| {
        let repo = repo.clone();
        tokio::spawn(async move { repo.put_if_absent("a@x.com", Uuid::new_v4()).await })
    });

    let winners = futures::future::join_all(attempts)
        .await
        .into_iter()
        .filter(|r| matches!(r, Ok(Ok(true))))
        .count();

    assert_eq!(winners, 1);
}

#[tokio::test]
async fn redis_repository_honours_contract() {
    // ---
    // Needs a live server; skipped unless TEST_REDIS_URL is set.
    let Ok(url) = std::env::var("TEST_REDIS_URL") else {
        eprintln!("TEST_REDIS_URL not set, skipping redis repository test");
        return;
    };
    init_tracing();

    let client = redis::Client::open(url).expect("invalid redis url");
    let namespace = format!("test-favorites-{}", Uuid::new_v4());
    check_contract(create_redis_repository(client, &namespace)).await;
}

#[tokio::test]
async fn redis_repository_reports_unreachable_server() {
    // ---
    init_tracing();
    let client = redis::Client::open("redis://127.0.0.1:1").expect("valid url");
    let repo: RepositoryPtr<Vec<Character>> = create_redis_repository(client, "unreachable");

    assert!(repo.get("anything").await.is_err());
}
