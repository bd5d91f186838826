//! Cached collection state and its reducer.

use chrono::{DateTime, Duration, Utc};

use super::traits::{CacheResult, CacheSource, Cacheable};

/// Loading status of a cached collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
  /// Nothing has been fetched yet
  #[default]
  Initial,
  /// A fetch has been dispatched and has not resolved
  Loading,
  /// The last resolved fetch succeeded
  Loaded,
  /// The last resolved fetch failed; items are the last known data
  Error,
}

impl LoadStatus {
  pub fn label(&self) -> &'static str {
    match self {
      LoadStatus::Initial => "not loaded",
      LoadStatus::Loading => "loading",
      LoadStatus::Loaded => "loaded",
      LoadStatus::Error => "error",
    }
  }
}

/// Lifecycle actions of a single fetch.
#[derive(Debug, Clone)]
pub enum FetchAction<T> {
  /// Fetch dispatched
  Pending,
  /// Fetch resolved with a full replacement of the items
  Fulfilled(CacheResult<Vec<T>>),
  /// Fetch failed. The reason is for logs and notices only; it is not kept
  /// in the collection.
  Rejected { reason: String },
}

impl<T> FetchAction<T> {
  pub fn rejection_reason(&self) -> Option<&str> {
    match self {
      FetchAction::Rejected { reason } => Some(reason),
      _ => None,
    }
  }
}

/// Items of one resource type, their loading status and the time of the last
/// successful network fetch.
///
/// Fields are private: the only way to change a collection is [`reduce`].
///
/// [`reduce`]: CachedCollection::reduce
#[derive(Debug, Clone)]
pub struct CachedCollection<T> {
  items: Vec<T>,
  status: LoadStatus,
  last_fetch: Option<DateTime<Utc>>,
}

impl<T> Default for CachedCollection<T> {
  fn default() -> Self {
    Self {
      items: Vec::new(),
      status: LoadStatus::Initial,
      last_fetch: None,
    }
  }
}

impl<T: Cacheable> CachedCollection<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Items in server response order.
  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn status(&self) -> LoadStatus {
    self.status
  }

  pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
    self.last_fetch
  }

  /// Look up an item by id.
  pub fn get(&self, id: u64) -> Option<&T> {
    self.items.iter().find(|item| item.cache_key() == id)
  }

  /// Whether a fetch at `now` can be served from the collection.
  ///
  /// An empty collection is never fresh.
  pub fn is_fresh(&self, now: DateTime<Utc>, stale_time: Duration) -> bool {
    if self.items.is_empty() {
      return false;
    }
    match self.last_fetch {
      Some(at) => now - at <= stale_time,
      None => false,
    }
  }

  /// Apply a lifecycle action.
  pub fn reduce(&mut self, action: FetchAction<T>) {
    match action {
      FetchAction::Pending => {
        self.status = LoadStatus::Loading;
      }
      FetchAction::Fulfilled(result) => {
        self.status = LoadStatus::Loaded;
        if result.source == CacheSource::Network {
          self.last_fetch = result.cached_at;
        }
        self.items = result.data;
      }
      FetchAction::Rejected { .. } => {
        self.status = LoadStatus::Error;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::{Deserialize, Serialize};

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Item {
    id: u64,
  }

  impl Cacheable for Item {
    fn cache_key(&self) -> u64 {
      self.id
    }

    fn entity_type() -> &'static str {
      "items"
    }
  }

  fn items(ids: &[u64]) -> Vec<Item> {
    ids.iter().map(|&id| Item { id }).collect()
  }

  fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
  }

  #[test]
  fn test_new_collection_is_initial_and_empty() {
    let collection: CachedCollection<Item> = CachedCollection::new();
    assert_eq!(collection.status(), LoadStatus::Initial);
    assert!(collection.items().is_empty());
    assert!(collection.last_fetch().is_none());
  }

  #[test]
  fn test_pending_sets_loading_and_keeps_items() {
    let mut collection = CachedCollection::new();
    collection.reduce(FetchAction::Fulfilled(CacheResult::from_network(
      items(&[1]),
      t0(),
    )));

    collection.reduce(FetchAction::Pending);
    assert_eq!(collection.status(), LoadStatus::Loading);
    assert_eq!(collection.items(), items(&[1]).as_slice());
  }

  #[test]
  fn test_fulfilled_replaces_items() {
    let mut collection = CachedCollection::new();
    collection.reduce(FetchAction::Fulfilled(CacheResult::from_network(
      items(&[1, 2, 3]),
      t0(),
    )));
    collection.reduce(FetchAction::Pending);
    collection.reduce(FetchAction::Fulfilled(CacheResult::from_network(
      items(&[5, 4]),
      t0() + Duration::seconds(90),
    )));

    assert_eq!(collection.status(), LoadStatus::Loaded);
    assert_eq!(collection.items(), items(&[5, 4]).as_slice());
    assert_eq!(
      collection.last_fetch(),
      Some(t0() + Duration::seconds(90))
    );
  }

  #[test]
  fn test_fulfilled_from_cache_keeps_timestamp() {
    let mut collection = CachedCollection::new();
    collection.reduce(FetchAction::Fulfilled(CacheResult::from_network(
      items(&[1]),
      t0(),
    )));
    collection.reduce(FetchAction::Pending);
    collection.reduce(FetchAction::Fulfilled(CacheResult::from_cache(
      items(&[1]),
      Some(t0()),
    )));

    assert_eq!(collection.status(), LoadStatus::Loaded);
    assert_eq!(collection.last_fetch(), Some(t0()));
  }

  #[test]
  fn test_rejected_keeps_stale_items() {
    let mut collection = CachedCollection::new();
    collection.reduce(FetchAction::Fulfilled(CacheResult::from_network(
      items(&[1, 2]),
      t0(),
    )));
    collection.reduce(FetchAction::Pending);
    collection.reduce(FetchAction::Rejected {
      reason: "500 Internal Server Error".to_string(),
    });

    assert_eq!(collection.status(), LoadStatus::Error);
    assert_eq!(collection.items(), items(&[1, 2]).as_slice());
    assert_eq!(collection.last_fetch(), Some(t0()));
  }

  #[test]
  fn test_freshness_window() {
    let mut collection = CachedCollection::new();
    let window = Duration::milliseconds(60_000);
    assert!(!collection.is_fresh(t0(), window));

    collection.reduce(FetchAction::Fulfilled(CacheResult::from_network(
      items(&[1]),
      t0(),
    )));
    assert!(collection.is_fresh(t0() + Duration::milliseconds(30_000), window));
    assert!(collection.is_fresh(t0() + Duration::milliseconds(60_000), window));
    assert!(!collection.is_fresh(t0() + Duration::milliseconds(60_001), window));
  }

  #[test]
  fn test_empty_collection_is_never_fresh() {
    let mut collection: CachedCollection<Item> = CachedCollection::new();
    collection.reduce(FetchAction::Fulfilled(CacheResult::from_network(
      Vec::new(),
      t0(),
    )));
    assert!(!collection.is_fresh(t0(), Duration::milliseconds(60_000)));
  }

  #[test]
  fn test_get_by_id() {
    let mut collection = CachedCollection::new();
    collection.reduce(FetchAction::Fulfilled(CacheResult::from_network(
      items(&[7, 9]),
      t0(),
    )));
    assert_eq!(collection.get(9), Some(&Item { id: 9 }));
    assert_eq!(collection.get(8), None);
  }
}
