//! CartStore behavior against fake collaborators.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{trail_shoe, walking_shoe, FakeCatalog, FlakyBackend, Harness, CART_KEY};
use turbo_cache::KvBackend;
use turbo_cart::{CartError, CartNotice, CartOperation, UpdateProductAmount};
use turbo_commerce::catalog::Product;
use turbo_commerce::ProductId;

const SHOE: ProductId = ProductId::new(1);
const TRAIL: ProductId = ProductId::new(2);

fn catalog() -> FakeCatalog {
    FakeCatalog::new()
        .with_product(walking_shoe(), 3)
        .with_product(trail_shoe(), 5)
}

#[tokio::test]
async fn test_add_new_product() {
    let mut h = Harness::new(catalog());

    let item = h.store.add_product(SHOE).await.unwrap();

    assert_eq!(item.amount(), 1);
    assert_eq!(item.product, walking_shoe());
    assert_eq!(h.current(), vec![(1, 1)]);
    assert_eq!(h.persisted(), Some(vec![(1, 1)]));
    assert!(h.notices().is_empty());
}

#[tokio::test]
async fn test_add_existing_increments() {
    let h = Harness::new(catalog());

    h.store.add_product(SHOE).await.unwrap();
    h.store.add_product(TRAIL).await.unwrap();
    let item = h.store.add_product(SHOE).await.unwrap();

    assert_eq!(item.amount(), 2);
    assert_eq!(h.current(), vec![(1, 2), (2, 1)]);
    assert_eq!(h.persisted(), Some(vec![(1, 2), (2, 1)]));
    // Product data is only fetched when a line item is created.
    assert_eq!(h.catalog.product_calls(), 2);
}

#[tokio::test]
async fn test_add_at_stock_limit_is_rejected() {
    let mut h = Harness::new(catalog());
    for _ in 0..3 {
        h.store.add_product(SHOE).await.unwrap();
    }
    let writes = h.backend.writes();
    let mut updates = h.store.subscribe();
    updates.mark_unchanged();

    let err = h.store.add_product(SHOE).await.unwrap_err();

    match err {
        CartError::StockExceeded {
            product_id,
            requested,
            available,
        } => {
            assert_eq!(product_id, SHOE);
            assert_eq!(requested, 4);
            assert_eq!(available, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(h.notices(), vec![CartNotice::StockExceeded]);
    assert_eq!(h.current(), vec![(1, 3)]);
    assert_eq!(h.backend.writes(), writes);
    assert!(!updates.has_changed().unwrap());
}

#[tokio::test]
async fn test_add_out_of_stock_skips_product_fetch() {
    let mut h = Harness::new(catalog());
    h.catalog.set_stock(SHOE, 0);

    let err = h.store.add_product(SHOE).await.unwrap_err();

    assert!(err.is_stock_exceeded());
    assert_eq!(h.notices(), vec![CartNotice::StockExceeded]);
    assert_eq!(h.catalog.product_calls(), 0);
    assert!(h.store.cart().is_empty());
    assert_eq!(h.persisted(), None);
}

#[tokio::test]
async fn test_add_with_stock_failure() {
    let mut h = Harness::new(catalog());
    h.catalog.fail_stock.store(true, Ordering::SeqCst);

    let err = h.store.add_product(SHOE).await.unwrap_err();

    assert!(matches!(
        err,
        CartError::Collaborator {
            operation: CartOperation::Add,
            ..
        }
    ));
    assert_eq!(h.notices(), vec![CartNotice::AddFailed]);
    assert!(h.store.cart().is_empty());
}

#[tokio::test]
async fn test_add_with_product_failure() {
    let mut h = Harness::new(catalog());
    h.catalog.fail_products.store(true, Ordering::SeqCst);

    let err = h.store.add_product(SHOE).await.unwrap_err();

    assert_eq!(err.notice(), CartNotice::AddFailed);
    assert_eq!(h.notices(), vec![CartNotice::AddFailed]);
    assert!(h.store.cart().is_empty());
    assert_eq!(h.backend.writes(), 0);
}

#[tokio::test]
async fn test_remove_product() {
    let mut h = Harness::new(catalog());
    h.store.add_product(SHOE).await.unwrap();
    h.store.add_product(TRAIL).await.unwrap();
    let stock_calls = h.catalog.stock_calls();

    let removed = h.store.remove_product(SHOE).await.unwrap();

    assert_eq!(removed.id(), SHOE);
    assert_eq!(h.current(), vec![(2, 1)]);
    assert_eq!(h.persisted(), Some(vec![(2, 1)]));
    assert_eq!(h.catalog.stock_calls(), stock_calls);

    let err = h.store.remove_product(SHOE).await.unwrap_err();
    assert!(matches!(
        err,
        CartError::ItemNotFound {
            operation: CartOperation::Remove,
            product_id,
        } if product_id == SHOE
    ));
    assert_eq!(h.notices(), vec![CartNotice::RemoveFailed]);
    assert_eq!(h.current(), vec![(2, 1)]);
}

#[tokio::test]
async fn test_update_ignores_non_positive_amounts() {
    let mut h = Harness::new(catalog());
    h.store.add_product(SHOE).await.unwrap();
    let writes = h.backend.writes();
    let stock_calls = h.catalog.stock_calls();
    let mut updates = h.store.subscribe();
    updates.mark_unchanged();

    for amount in [0, -1, i64::MIN] {
        let outcome = h
            .store
            .update_product_amount(UpdateProductAmount::new(SHOE, amount))
            .await
            .unwrap();
        assert!(outcome.is_none());
    }
    // Also a no-op for products that aren't in the cart.
    let outcome = h
        .store
        .update_product_amount(UpdateProductAmount::new(TRAIL, 0))
        .await
        .unwrap();
    assert!(outcome.is_none());

    assert_eq!(h.current(), vec![(1, 1)]);
    assert_eq!(h.backend.writes(), writes);
    assert_eq!(h.catalog.stock_calls(), stock_calls);
    assert!(h.notices().is_empty());
    assert!(!updates.has_changed().unwrap());
}

#[tokio::test]
async fn test_update_sets_exact_amount() {
    let h = Harness::new(catalog());
    h.store.add_product(TRAIL).await.unwrap();

    let item = h
        .store
        .update_product_amount(UpdateProductAmount::new(TRAIL, 5))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(item.amount(), 5);
    assert_eq!(h.current(), vec![(2, 5)]);
    // The post-update cart is what gets written.
    assert_eq!(h.persisted(), Some(vec![(2, 5)]));

    h.store
        .update_product_amount(UpdateProductAmount::new(TRAIL, 2))
        .await
        .unwrap();
    assert_eq!(h.persisted(), Some(vec![(2, 2)]));
}

#[tokio::test]
async fn test_update_missing_product() {
    let mut h = Harness::new(catalog());

    let err = h
        .store
        .update_product_amount(UpdateProductAmount::new(SHOE, 2))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CartError::ItemNotFound {
            operation: CartOperation::Update,
            ..
        }
    ));
    assert_eq!(h.notices(), vec![CartNotice::UpdateFailed]);
    assert_eq!(h.catalog.stock_calls(), 0);
}

#[tokio::test]
async fn test_update_beyond_stock() {
    let mut h = Harness::new(catalog());
    h.store.add_product(SHOE).await.unwrap();

    let err = h
        .store
        .update_product_amount(UpdateProductAmount::new(SHOE, 4))
        .await
        .unwrap_err();

    assert!(err.is_stock_exceeded());
    assert_eq!(h.notices(), vec![CartNotice::StockExceeded]);
    assert_eq!(h.current(), vec![(1, 1)]);
}

#[tokio::test]
async fn test_update_with_stock_failure() {
    let mut h = Harness::new(catalog());
    h.store.add_product(SHOE).await.unwrap();
    h.catalog.fail_stock.store(true, Ordering::SeqCst);

    let err = h
        .store
        .update_product_amount(UpdateProductAmount::new(SHOE, 2))
        .await
        .unwrap_err();

    assert_eq!(err.notice(), CartNotice::UpdateFailed);
    assert_eq!(h.notices(), vec![CartNotice::UpdateFailed]);
    assert_eq!(h.current(), vec![(1, 1)]);
}

#[tokio::test]
async fn test_failed_write_changes_nothing() {
    let mut h = Harness::new(catalog());
    h.store.add_product(SHOE).await.unwrap();
    let mut updates = h.store.subscribe();
    updates.mark_unchanged();

    h.backend.fail_writes.store(true, Ordering::SeqCst);

    let add = h.store.add_product(SHOE).await.unwrap_err();
    let remove = h.store.remove_product(SHOE).await.unwrap_err();
    let update = h
        .store
        .update_product_amount(UpdateProductAmount::new(SHOE, 3))
        .await
        .unwrap_err();

    for err in [&add, &remove, &update] {
        assert!(matches!(err, CartError::Collaborator { .. }), "{err}");
    }
    assert_eq!(
        h.notices(),
        vec![
            CartNotice::AddFailed,
            CartNotice::RemoveFailed,
            CartNotice::UpdateFailed
        ]
    );
    assert_eq!(h.current(), vec![(1, 1)]);
    assert_eq!(h.persisted(), Some(vec![(1, 1)]));
    assert!(!updates.has_changed().unwrap());

    h.backend.fail_writes.store(false, Ordering::SeqCst);
    h.store.add_product(SHOE).await.unwrap();
    assert_eq!(h.persisted(), Some(vec![(1, 2)]));
}

#[tokio::test]
async fn test_subscribers_see_commits() {
    let h = Harness::new(catalog());
    let mut updates = h.store.subscribe();
    assert!(updates.borrow_and_update().is_empty());

    h.store.add_product(TRAIL).await.unwrap();

    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().item_count(), 1);

    h.store.remove_product(TRAIL).await.unwrap();
    updates.changed().await.unwrap();
    assert!(updates.borrow().is_empty());
}

#[tokio::test]
async fn test_reload_restores_cart() {
    let backend = Arc::new(FlakyBackend::default());
    {
        let h = Harness::with_backend(catalog(), backend.clone());
        h.store.add_product(TRAIL).await.unwrap();
        h.store.add_product(SHOE).await.unwrap();
        h.store
            .update_product_amount(UpdateProductAmount::new(TRAIL, 4))
            .await
            .unwrap();
    }

    let h = Harness::with_backend(catalog(), backend);
    let cart = h.store.cart();

    assert_eq!(h.current(), vec![(2, 4), (1, 1)]);
    assert_eq!(cart.items()[0].product, trail_shoe());
    assert_eq!(h.store.summary().unwrap().total.display(), "$739.50");
}

#[tokio::test]
async fn test_persisted_format() {
    let h = Harness::new(catalog());
    h.store.add_product(SHOE).await.unwrap();

    let raw: serde_json::Value = h.cache.get(CART_KEY).unwrap().unwrap();

    assert_eq!(
        raw,
        serde_json::json!([{
            "id": 1,
            "title": "Lightweight Walking Shoe",
            "price": 179.9,
            "image": "https://cdn.shop.test/1.jpg",
            "amount": 1
        }])
    );
}

#[tokio::test]
async fn test_add_product_with_name_field() {
    let product: Product =
        serde_json::from_str(r#"{"id":3,"name":"Shoe","price":10.5,"image":"x"}"#).unwrap();
    let h = Harness::new(FakeCatalog::new().with_product(product, 2));

    let item = h.store.add_product(ProductId::new(3)).await.unwrap();

    assert_eq!(item.product.title(), Some("Shoe"));
    let raw: serde_json::Value = h.cache.get(CART_KEY).unwrap().unwrap();
    assert_eq!(
        raw,
        serde_json::json!([{"id": 3, "name": "Shoe", "price": 10.5, "image": "x", "amount": 1}])
    );
    assert_eq!(h.store.summary().unwrap().total.display(), "$10.50");
}

#[tokio::test]
async fn test_reload_keeps_product_fields_verbatim() {
    let product = Product::new(ProductId::new(7))
        .with_title("Sample")
        .with_price(19.999)
        .with_attribute("sizes", serde_json::json!([38, 39]));
    let backend = Arc::new(FlakyBackend::default());
    {
        let h = Harness::with_backend(
            FakeCatalog::new().with_product(product.clone(), 1),
            backend.clone(),
        );
        h.store.add_product(ProductId::new(7)).await.unwrap();
    }

    let raw = String::from_utf8(backend.get(CART_KEY).unwrap().unwrap()).unwrap();
    assert!(raw.contains(r#""price":19.999"#), "{raw}");

    let h = Harness::with_backend(FakeCatalog::new(), backend);
    assert_eq!(h.store.cart().items()[0].product, product);
    assert_eq!(h.store.summary().unwrap().total.display(), "$20.00");
}

#[tokio::test]
async fn test_slow_write_does_not_stall_other_tasks() {
    let backend = Arc::new(FlakyBackend::default().with_write_delay(Duration::from_millis(200)));
    let h = Harness::with_backend(catalog(), backend);

    // Single-threaded runtime: the second branch only runs during the write
    // if the write is off the runtime thread.
    let (added, empty_during_write) = tokio::join!(h.store.add_product(SHOE), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.store.cart().is_empty()
    });

    added.unwrap();
    assert!(empty_during_write);
    assert_eq!(h.current(), vec![(1, 1)]);
    assert_eq!(h.persisted(), Some(vec![(1, 1)]));
}

#[tokio::test]
async fn test_malformed_storage_starts_empty() {
    for raw in [
        "not json",
        r#"{"id": 1}"#,
        r#"[{"id": 1, "title": "A", "price": 1.0, "amount": 0}]"#,
        r#"[{"id": 1, "title": "A", "price": 1.0, "amount": 1},
            {"id": 1, "title": "A", "price": 1.0, "amount": 2}]"#,
    ] {
        let backend = Arc::new(FlakyBackend::default());
        backend.set(CART_KEY, raw.as_bytes()).unwrap();

        let h = Harness::with_backend(catalog(), backend);
        assert!(h.store.cart().is_empty(), "{raw}");

        h.store.add_product(SHOE).await.unwrap();
        assert_eq!(h.persisted(), Some(vec![(1, 1)]));
    }
}

#[tokio::test]
async fn test_concurrent_adds_are_all_applied() {
    let catalog = FakeCatalog::new()
        .with_product(walking_shoe(), 10)
        .with_latency(Duration::from_millis(5));
    let h = Harness::new(catalog);
    h.store.add_product(SHOE).await.unwrap();

    let results = futures::future::join_all((0..5).map(|_| h.store.add_product(SHOE))).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(h.current(), vec![(1, 6)]);
    assert_eq!(h.persisted(), Some(vec![(1, 6)]));

    let mut amounts: Vec<u32> = results.into_iter().map(|r| r.unwrap().amount()).collect();
    amounts.sort_unstable();
    assert_eq!(amounts, vec![2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_concurrent_adds_respect_stock() {
    let catalog = FakeCatalog::new()
        .with_product(walking_shoe(), 3)
        .with_latency(Duration::from_millis(5));
    let mut h = Harness::new(catalog);

    let store = &h.store;
    let results = futures::future::join_all((0..5).map(|_| store.add_product(SHOE))).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    assert_eq!(h.current(), vec![(1, 3)]);
    assert_eq!(
        h.notices(),
        vec![CartNotice::StockExceeded, CartNotice::StockExceeded]
    );
}

#[tokio::test]
async fn test_walkthrough() {
    let catalog = FakeCatalog::new().with_product(walking_shoe(), 5);
    let mut h = Harness::new(catalog);

    h.store.add_product(SHOE).await.unwrap();
    assert_eq!(h.current(), vec![(1, 1)]);

    h.store.add_product(SHOE).await.unwrap();
    assert_eq!(h.current(), vec![(1, 2)]);

    let err = h
        .store
        .update_product_amount(UpdateProductAmount::new(SHOE, 10))
        .await
        .unwrap_err();
    assert!(err.is_stock_exceeded());
    assert_eq!(h.current(), vec![(1, 2)]);

    h.store.remove_product(SHOE).await.unwrap();
    assert!(h.store.cart().is_empty());
    assert_eq!(h.persisted(), Some(vec![]));
    assert_eq!(h.notices(), vec![CartNotice::StockExceeded]);
}
