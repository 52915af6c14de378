//! Fake collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;
use turbo_cache::{Cache, CacheError, KvBackend, MemoryBackend};
use turbo_cart::{
    CartNotice, CartStore, ChannelNotifier, CollaboratorError, ProductService, StockService,
};
use turbo_commerce::catalog::{Product, StockInfo};
use turbo_commerce::ProductId;

pub const CART_KEY: &str = "@TurboCommerce:cart";

pub fn walking_shoe() -> Product {
    Product::new(ProductId::new(1))
        .with_title("Lightweight Walking Shoe")
        .with_price(179.9)
        .with_image("https://cdn.shop.test/1.jpg")
}

pub fn trail_shoe() -> Product {
    Product::new(ProductId::new(2))
        .with_title("Trail Runner")
        .with_price(139.9)
        .with_image("https://cdn.shop.test/2.jpg")
}

/// In-memory stock and product service.
#[derive(Default)]
pub struct FakeCatalog {
    stock: Mutex<HashMap<ProductId, u32>>,
    products: Mutex<HashMap<ProductId, Product>>,
    pub fail_stock: AtomicBool,
    pub fail_products: AtomicBool,
    pub stock_calls: AtomicUsize,
    pub product_calls: AtomicUsize,
    latency: Option<Duration>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every stock query.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_product(self, product: Product, stock: u32) -> Self {
        self.set_stock(product.id, stock);
        self.products.lock().unwrap().insert(product.id, product);
        self
    }

    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.stock.lock().unwrap().insert(id, amount);
    }

    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StockService for FakeCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockInfo, CollaboratorError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_stock.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable("stock service down".into()));
        }
        let amount = self.stock.lock().unwrap().get(&product_id).copied();
        amount
            .map(|amount| StockInfo::new(product_id, amount))
            .ok_or_else(|| CollaboratorError::Unavailable(format!("no stock for {product_id}")))
    }
}

#[async_trait]
impl ProductService for FakeCatalog {
    async fn product(&self, product_id: ProductId) -> Result<Product, CollaboratorError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_products.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable("product service down".into()));
        }
        self.products
            .lock()
            .unwrap()
            .get(&product_id)
            .cloned()
            .ok_or_else(|| CollaboratorError::Malformed(format!("unknown product {product_id}")))
    }
}

/// Memory backend whose writes can be made to fail.
#[derive(Default)]
pub struct FlakyBackend {
    inner: MemoryBackend,
    pub fail_writes: AtomicBool,
    pub writes: AtomicUsize,
    write_delay: Option<Duration>,
}

impl FlakyBackend {
    /// Block the calling thread this long inside every write.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KvBackend for FlakyBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::StoreError("disk full".into()));
        }
        if let Some(delay) = self.write_delay {
            std::thread::sleep(delay);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

/// A store wired to fakes, plus handles to inspect them.
pub struct Harness {
    pub store: CartStore,
    pub catalog: Arc<FakeCatalog>,
    pub backend: Arc<FlakyBackend>,
    pub cache: Cache,
    notices: UnboundedReceiver<CartNotice>,
}

impl Harness {
    pub fn new(catalog: FakeCatalog) -> Self {
        Self::with_backend(catalog, Arc::new(FlakyBackend::default()))
    }

    pub fn with_backend(catalog: FakeCatalog, backend: Arc<FlakyBackend>) -> Self {
        let catalog = Arc::new(catalog);
        let cache = Cache::from_shared(backend.clone());
        let (notifier, notices) = ChannelNotifier::new();
        let store = CartStore::builder(cache.clone(), catalog.clone(), catalog.clone())
            .with_notifier(Arc::new(notifier))
            .build();

        Self {
            store,
            catalog,
            backend,
            cache,
            notices,
        }
    }

    /// Notices sent since the last call.
    pub fn notices(&mut self) -> Vec<CartNotice> {
        let mut out = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            out.push(notice);
        }
        out
    }

    /// Amounts of the persisted cart, in order.
    pub fn persisted(&self) -> Option<Vec<(u64, u32)>> {
        self.cache
            .get::<turbo_commerce::cart::Cart>(CART_KEY)
            .unwrap()
            .map(|cart| amounts(&cart))
    }

    /// Amounts of the in-memory cart, in order.
    pub fn current(&self) -> Vec<(u64, u32)> {
        amounts(&self.store.cart())
    }
}

pub fn amounts(cart: &turbo_commerce::cart::Cart) -> Vec<(u64, u32)> {
    cart.iter().map(|item| (item.id().get(), item.amount())).collect()
}
