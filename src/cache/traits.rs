//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Trait for entities that can be cached.
///
/// Implementors provide the server-assigned id used to identify items within a
/// collection, and a resource name used in logs and UI titles.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Unique identifier for this entity (the `id` field on the wire)
  fn cache_key(&self) -> u64;

  /// Resource name (e.g., "cars", "models")
  fn entity_type() -> &'static str;
}

/// Result of a completed fetch, including where the data came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was fetched from the network
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T, fetched_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: Some(fetched_at),
    }
  }

  /// Create a new cache result served from already cached data.
  pub fn from_cache(data: T, cached_at: Option<DateTime<Utc>>) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      cached_at,
    }
  }
}

/// Indicates where fetched data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Served from the collection without a network call
  Cache,
}
