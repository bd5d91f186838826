//! Caching implementations for API resource types.

use crate::cache::Cacheable;

use super::types::{Brand, Car, Color, Model, Product};

impl Cacheable for Car {
  fn cache_key(&self) -> u64 {
    self.id
  }

  fn entity_type() -> &'static str {
    "cars"
  }
}

impl Cacheable for Model {
  fn cache_key(&self) -> u64 {
    self.id
  }

  fn entity_type() -> &'static str {
    "models"
  }
}

impl Cacheable for Color {
  fn cache_key(&self) -> u64 {
    self.id
  }

  fn entity_type() -> &'static str {
    "colors"
  }
}

impl Cacheable for Brand {
  fn cache_key(&self) -> u64 {
    self.id
  }

  fn entity_type() -> &'static str {
    "brands"
  }
}

impl Cacheable for Product {
  fn cache_key(&self) -> u64 {
    self.id
  }

  fn entity_type() -> &'static str {
    "products"
  }
}
