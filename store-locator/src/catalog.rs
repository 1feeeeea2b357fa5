//! Product catalog search
//!
//! A small in-memory catalog used by the search screen: free-text search,
//! quick section filters, and "show me where it is" via the zone registry.

use crate::types::DisplayPoint;
use crate::zones::ZoneRegistry;
use serde::{Deserialize, Serialize};

/// A product on the shelves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Store section, used as the category (e.g. "Fruit")
    pub section: String,
    /// Zone id where the product is shelved
    pub zone: String,
    /// Unit price in the store's minor currency unit
    pub price: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Case-insensitive substring match on product name or section
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        // whitespace only counts for the blank check, it is matched literally
        if query.trim().is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();

        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query) || p.section.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Products in exactly this section
    pub fn by_section(&self, section: &str) -> Vec<&Product> {
        self.products.iter().filter(|p| p.section == section).collect()
    }

    /// Distinct sections, in first-seen order
    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = Vec::new();
        for product in &self.products {
            if !sections.contains(&product.section.as_str()) {
                sections.push(&product.section);
            }
        }
        sections
    }

    /// Floor-plan position of a product's zone
    ///
    /// `None` if the product is unknown or its zone is not registered.
    pub fn locate(&self, product_id: &str, registry: &ZoneRegistry) -> Option<DisplayPoint> {
        let product = self.get(product_id)?;
        let point = registry.get(&product.zone);
        if point.is_none() {
            log::debug!("Product {} is in unregistered zone {}", product.id, product.zone);
        }
        point
    }
}
