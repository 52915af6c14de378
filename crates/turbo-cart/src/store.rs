//! The cart store.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use turbo_cache::{cache_key, Cache};
use turbo_commerce::cart::{Cart, CartSummary, LineItem};
use turbo_commerce::{CommerceError, Currency, ProductId};

use crate::error::{CartError, CartOperation, CollaboratorError};
use crate::notice::{NotificationSink, TracingNotifier};
use crate::services::{ProductService, StockService};

/// Namespace used for the storage key when none is configured.
pub const DEFAULT_NAMESPACE: &str = "@TurboCommerce";

/// Request to set a line item's amount.
///
/// `amount` is signed so a UI can pass through whatever a quantity control
/// produced; zero and negative values are ignored by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}

/// Builder for [`CartStore`].
pub struct CartStoreBuilder {
    cache: Cache,
    stock: Arc<dyn StockService>,
    products: Arc<dyn ProductService>,
    notifier: Arc<dyn NotificationSink>,
    namespace: String,
    currency: Currency,
}

impl CartStoreBuilder {
    /// Use a different notification sink. Defaults to [`TracingNotifier`].
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use a different storage namespace. Defaults to [`DEFAULT_NAMESPACE`].
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Currency product prices are read in. Defaults to USD.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Build the store, restoring any cart persisted under its key.
    pub fn build(self) -> CartStore {
        let storage_key = cache_key!(self.namespace.as_str(), "cart");
        let cart = load_cart(&self.cache, &storage_key);
        let (updates, _) = watch::channel(cart);

        CartStore {
            cache: self.cache,
            storage_key,
            stock: self.stock,
            products: self.products,
            notifier: self.notifier,
            currency: self.currency,
            op_lock: Mutex::new(()),
            updates,
        }
    }
}

/// Owns the shopper's cart.
///
/// Mutations run one at a time in call order. Each one is computed on a
/// copy of the cart, written to storage, and only then made visible to
/// [`cart`](Self::cart) and subscribers. A failed operation changes nothing,
/// returns a [`CartError`] and sends its [`CartNotice`](crate::CartNotice)
/// to the notification sink.
pub struct CartStore {
    cache: Cache,
    storage_key: String,
    stock: Arc<dyn StockService>,
    products: Arc<dyn ProductService>,
    notifier: Arc<dyn NotificationSink>,
    currency: Currency,
    op_lock: Mutex<()>,
    updates: watch::Sender<Cart>,
}

impl CartStore {
    /// Start building a store over `cache`, checking stock with `stock` and
    /// fetching product data from `products`.
    pub fn builder(
        cache: Cache,
        stock: Arc<dyn StockService>,
        products: Arc<dyn ProductService>,
    ) -> CartStoreBuilder {
        CartStoreBuilder {
            cache,
            stock,
            products,
            notifier: Arc::new(TracingNotifier),
            namespace: DEFAULT_NAMESPACE.to_string(),
            currency: Currency::default(),
        }
    }

    /// The key the cart is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Currency used for totals.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Snapshot of the current cart.
    pub fn cart(&self) -> Cart {
        self.updates.borrow().clone()
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver sees the current cart immediately and every committed
    /// cart afterwards. Rejected operations and ignored updates publish
    /// nothing.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.updates.subscribe()
    }

    /// Amount per product in the current cart.
    pub fn amounts(&self) -> HashMap<ProductId, u32> {
        self.updates.borrow().amounts()
    }

    /// Totals for the current cart.
    pub fn summary(&self) -> Result<CartSummary, CommerceError> {
        self.updates.borrow().summary(self.currency)
    }

    /// Add one unit of a product.
    ///
    /// Increments the line item if the product is already in the cart,
    /// otherwise fetches the product and appends it with amount 1. Rejected
    /// if the resulting amount would exceed stock.
    #[tracing::instrument(skip(self), fields(key = %self.storage_key))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<LineItem, CartError> {
        let result = self.try_add(product_id).await;
        self.report(result)
    }

    /// Remove a product's line item entirely.
    #[tracing::instrument(skip(self), fields(key = %self.storage_key))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<LineItem, CartError> {
        let result = self.try_remove(product_id).await;
        self.report(result)
    }

    /// Set a product's amount.
    ///
    /// Returns `Ok(None)` without touching anything when `amount <= 0`.
    /// Rejected if the product is not in the cart or `amount` exceeds stock.
    #[tracing::instrument(skip(self), fields(key = %self.storage_key))]
    pub async fn update_product_amount(
        &self,
        update: UpdateProductAmount,
    ) -> Result<Option<LineItem>, CartError> {
        let result = self.try_update(update).await;
        self.report(result)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<LineItem, CartError> {
        const OP: CartOperation = CartOperation::Add;

        let _guard = self.op_lock.lock().await;
        let mut next = self.cart();

        let stock = self
            .stock
            .stock(product_id)
            .await
            .map_err(CartError::collaborator(OP))?;

        let current = next.get(product_id).map(LineItem::amount);
        let fits = match current {
            Some(amount) => amount.checked_add(1).is_some_and(|n| stock.can_fulfill(n)),
            None => stock.is_available(),
        };
        if !fits {
            return Err(CartError::StockExceeded {
                product_id,
                requested: current.map_or(1, |amount| u64::from(amount) + 1),
                available: stock.amount,
            });
        }

        let item = if current.is_some() {
            next.increment(product_id)
                .map_err(CartError::domain(OP))?
                .clone()
        } else {
            let product = self
                .products
                .product(product_id)
                .await
                .map_err(CartError::collaborator(OP))?;
            if product.id != product_id {
                return Err(CartError::Collaborator {
                    operation: OP,
                    source: CollaboratorError::Malformed(format!(
                        "requested product {product_id}, got {}",
                        product.id
                    )),
                });
            }
            let item = LineItem::new(product, 1).map_err(CartError::domain(OP))?;
            next.push(item.clone()).map_err(CartError::domain(OP))?;
            item
        };

        self.commit(OP, next).await?;
        tracing::info!(amount = item.amount(), "product added");
        Ok(item)
    }

    async fn try_remove(&self, product_id: ProductId) -> Result<LineItem, CartError> {
        const OP: CartOperation = CartOperation::Remove;

        let _guard = self.op_lock.lock().await;
        let mut next = self.cart();

        let removed = next.remove(product_id).ok_or(CartError::ItemNotFound {
            operation: OP,
            product_id,
        })?;

        self.commit(OP, next).await?;
        tracing::info!("product removed");
        Ok(removed)
    }

    async fn try_update(
        &self,
        UpdateProductAmount { product_id, amount }: UpdateProductAmount,
    ) -> Result<Option<LineItem>, CartError> {
        const OP: CartOperation = CartOperation::Update;

        if amount <= 0 {
            tracing::debug!(amount, "ignoring non-positive amount");
            return Ok(None);
        }

        let _guard = self.op_lock.lock().await;
        let mut next = self.cart();

        if !next.contains(product_id) {
            return Err(CartError::ItemNotFound {
                operation: OP,
                product_id,
            });
        }

        let stock = self
            .stock
            .stock(product_id)
            .await
            .map_err(CartError::collaborator(OP))?;

        // Anything above u32::MAX is above every possible stock level.
        let amount = match u32::try_from(amount) {
            Ok(amount) if stock.can_fulfill(amount) => amount,
            _ => {
                return Err(CartError::StockExceeded {
                    product_id,
                    requested: amount.unsigned_abs(),
                    available: stock.amount,
                })
            }
        };

        let item = next
            .set_amount(product_id, amount)
            .map_err(CartError::domain(OP))?
            .clone();

        self.commit(OP, next).await?;
        tracing::info!(amount, "product amount updated");
        Ok(Some(item))
    }

    /// Persist `next`, then publish it. Must be called with the operation
    /// lock held.
    ///
    /// Backends do blocking I/O, so the write runs on the blocking pool.
    async fn commit(&self, operation: CartOperation, next: Cart) -> Result<(), CartError> {
        let cache = self.cache.clone();
        let key = self.storage_key.clone();
        let next = tokio::task::spawn_blocking(move || cache.set(&key, &next).map(|()| next))
            .await
            .map_err(|e| {
                CartError::collaborator(operation)(CollaboratorError::Unavailable(format!(
                    "storage write did not complete: {e}"
                )))
            })?
            .map_err(|e| CartError::collaborator(operation)(e.into()))?;
        self.updates.send_replace(next);
        Ok(())
    }

    fn report<T>(&self, result: Result<T, CartError>) -> Result<T, CartError> {
        if let Err(err) = &result {
            if err.is_stock_exceeded() {
                tracing::info!(error = %err, "operation rejected");
            } else {
                tracing::warn!(error = %err, "operation failed");
            }
            self.notifier.error(err.notice());
        }
        result
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.storage_key)
            .field("cart", &*self.updates.borrow())
            .finish_non_exhaustive()
    }
}

fn load_cart(cache: &Cache, key: &str) -> Cart {
    match cache.get::<Cart>(key) {
        Ok(Some(cart)) => {
            tracing::debug!(key, items = cart.len(), "restored cart");
            cart
        }
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable persisted cart");
            Cart::new()
        }
    }
}
