//! Product type.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product as returned by `GET /products/{id}`.
///
/// Only `id` is interpreted on the way in. Every other field is kept
/// verbatim in `attributes` and serialized back at the top level, so a
/// persisted line item carries exactly the payload the API sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Everything else sent by the product API.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Create a product with no fields besides its id.
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    /// Set the `title` field.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_attribute("title", title.into())
    }

    /// Set the `price` field.
    pub fn with_price(self, price: f64) -> Self {
        self.with_attribute("price", price)
    }

    /// Set the `image` field.
    pub fn with_image(self, image: impl Into<String>) -> Self {
        self.with_attribute("image", image.into())
    }

    /// Set any field.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Display name: `title`, or `name` for APIs that use it.
    pub fn title(&self) -> Option<&str> {
        ["title", "name"]
            .iter()
            .find_map(|key| self.attributes.get(*key).and_then(Value::as_str))
    }

    /// Image URL, if any.
    pub fn image(&self) -> Option<&str> {
        self.attributes.get("image").and_then(Value::as_str)
    }

    /// Unit price read in `currency`.
    ///
    /// `price` may be a JSON number or a numeric string. The stored value is
    /// left untouched; rounding to minor units happens here.
    pub fn price(&self, currency: Currency) -> Result<Money, CommerceError> {
        let amount = match self.attributes.get("price") {
            None | Some(Value::Null) => return Err(CommerceError::MissingPrice(self.id)),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        match amount {
            Some(amount) if amount.is_finite() && amount >= 0.0 => {
                Ok(Money::from_decimal(amount, currency))
            }
            _ => Err(CommerceError::InvalidPrice(self.id)),
        }
    }
}
