//! Cart store error types.

use std::fmt;

use thiserror::Error;
use turbo_cache::CacheError;
use turbo_commerce::{CommerceError, ProductId};
use turbo_data::FetchError;

use crate::notice::CartNotice;

/// The cart operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    /// `add_product`.
    Add,
    /// `remove_product`.
    Remove,
    /// `update_product_amount`.
    Update,
}

impl CartOperation {
    /// Notice shown when this operation fails for any reason other than
    /// stock.
    pub fn failure_notice(self) -> CartNotice {
        match self {
            Self::Add => CartNotice::AddFailed,
            Self::Remove => CartNotice::RemoveFailed,
            Self::Update => CartNotice::UpdateFailed,
        }
    }
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add product"),
            Self::Remove => write!(f, "remove product"),
            Self::Update => write!(f, "update product amount"),
        }
    }
}

/// Failure of one of the store's collaborators.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The stock or product API could not be reached or answered badly.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Local storage failed.
    #[error("Storage failed: {0}")]
    Storage(#[from] CacheError),

    /// The service answered with data the cart can't use.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The service is unavailable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by cart store operations.
///
/// Every error leaves the cart and its persisted copy unchanged.
#[derive(Error, Debug)]
pub enum CartError {
    /// The requested amount is more than the inventory API reports in stock.
    #[error(
        "Requested quantity for product {product_id} exceeds stock: requested {requested}, available {available}"
    )]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// Removal or update of a product that is not in the cart.
    #[error("Cannot {operation}: product {product_id} is not in the cart")]
    ItemNotFound {
        operation: CartOperation,
        product_id: ProductId,
    },

    /// A stock query, product fetch or storage write failed.
    #[error("Cannot {operation}: {source}")]
    Collaborator {
        operation: CartOperation,
        #[source]
        source: CollaboratorError,
    },

    /// A cart invariant check failed.
    #[error("Cannot {operation}: {source}")]
    Domain {
        operation: CartOperation,
        #[source]
        source: CommerceError,
    },
}

impl CartError {
    /// The user-facing notice for this error.
    pub fn notice(&self) -> CartNotice {
        match self {
            Self::StockExceeded { .. } => CartNotice::StockExceeded,
            Self::ItemNotFound { operation, .. }
            | Self::Collaborator { operation, .. }
            | Self::Domain { operation, .. } => operation.failure_notice(),
        }
    }

    /// Check if this is a stock rejection.
    pub fn is_stock_exceeded(&self) -> bool {
        matches!(self, Self::StockExceeded { .. })
    }

    pub(crate) fn collaborator(operation: CartOperation) -> impl FnOnce(CollaboratorError) -> Self {
        move |source| Self::Collaborator { operation, source }
    }

    pub(crate) fn domain(operation: CartOperation) -> impl FnOnce(CommerceError) -> Self {
        move |source| Self::Domain { operation, source }
    }
}
