mod common;

use common::{listing, TestHarness};
use ens_deals::kernel::BaseListingStore;
use test_context::test_context;

// =============================================================================
// Tests: Postgres listing store (requires Docker)
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_upsert_updates_existing_listing(ctx: &TestHarness) {
    let store = ctx.store();

    let first = store
        .upsert(&listing("upsert-me.eth", "1.5 ETH", Some("1 ETH")), "Vision")
        .await
        .expect("first upsert");
    assert!(!first.is_below_floor);

    let second = store
        .upsert(&listing("upsert-me.eth", "0.5 ETH", Some("1 ETH")), "OpenSea")
        .await
        .expect("second upsert");

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.price, 0.5);
    assert_eq!(second.source, "OpenSea");
    assert!(second.is_below_floor);

    let found = store
        .find_by_domain("UPSERT-ME.eth")
        .await
        .expect("lookup")
        .expect("listing exists");
    assert_eq!(found.id, first.id);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_below_floor_orders_by_discount(ctx: &TestHarness) {
    let store = ctx.store();
    store
        .upsert(&listing("floor-a.eth", "0.9", Some("1")), "Vision")
        .await
        .unwrap();
    store
        .upsert(&listing("floor-b.eth", "0.2", Some("1")), "Vision")
        .await
        .unwrap();
    store
        .upsert(&listing("floor-c.eth", "5", Some("1")), "Vision")
        .await
        .unwrap();

    let below: Vec<_> = store
        .find_below_floor(1000)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.domain_name)
        .filter(|name| name.starts_with("floor-"))
        .collect();

    assert_eq!(below, vec!["floor-b.eth", "floor-a.eth"]);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ping_and_backend(ctx: &TestHarness) {
    let store = ctx.store();
    store.ping().await.expect("ping");
    assert_eq!(store.backend(), "postgres");
    assert!(store.count().await.expect("count") >= 0);
}
