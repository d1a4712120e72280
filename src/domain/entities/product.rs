use crate::domain::values::price::Price;
use crate::domain::values::product_id::ProductId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn has_embedding(&self) -> bool {
        self.embedding.as_ref().is_some_and(|v| !v.is_empty())
    }
}

/// Fields supplied when creating a product; the id is assigned by storage.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
}

impl NewProduct {
    pub fn new(name: String, description: Option<String>, price: Price) -> Result<Self, String> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err("Product name must not be empty".into());
        }
        Ok(Self {
            name,
            description: description.filter(|d| !d.trim().is_empty()),
            price,
        })
    }
}

/// Partial update; `None` leaves the stored value untouched.
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Price>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}
