//! Fetch orchestration for a single cached collection.

use chrono::Duration;
use color_eyre::Result;
use futures::future::{self, BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::collection::{CachedCollection, FetchAction, LoadStatus};
use super::traits::{CacheResult, Cacheable};

/// Staleness window: data fetched longer ago than this is refreshed.
pub const STALE_AFTER_MS: i64 = 60_000;

/// A factory function that creates futures fetching the full collection
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>;

/// A dispatched fetch, resolving to the action that completes it.
pub type PendingFetch<T> = BoxFuture<'static, FetchAction<T>>;

/// Cached collection plus the logic to refresh it.
///
/// A fetch happens in two halves. [`dispatch_fetch`] runs synchronously: it
/// marks the collection `Loading`, decides between cache hit and network, and
/// hands back a future. Whoever awaits that future feeds the resulting action
/// to [`reduce`]. Overlapping fetches are allowed unless single-flight is on;
/// whichever completion is reduced last wins.
///
/// [`dispatch_fetch`]: ResourceSlice::dispatch_fetch
/// [`reduce`]: ResourceSlice::reduce
pub struct ResourceSlice<T: Cacheable> {
  state: CachedCollection<T>,
  fetcher: Fetcher<T>,
  clock: Arc<dyn Clock>,
  stale_time: Duration,
  single_flight: bool,
}

impl<T: Cacheable> ResourceSlice<T> {
  /// Create a slice with the given fetcher function.
  ///
  /// The fetcher is called once per cache miss.
  pub fn new<F, Fut>(fetcher: F, clock: Arc<dyn Clock>) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
  {
    Self {
      state: CachedCollection::new(),
      fetcher: Arc::new(move || fetcher().boxed()),
      clock,
      stale_time: Duration::milliseconds(STALE_AFTER_MS),
      single_flight: false,
    }
  }

  /// Drop dispatches made while a fetch is already loading.
  pub fn with_single_flight(mut self, single_flight: bool) -> Self {
    self.single_flight = single_flight;
    self
  }

  pub fn state(&self) -> &CachedCollection<T> {
    &self.state
  }

  /// Synchronous half of a fetch.
  ///
  /// Returns `None` only when single-flight is on and a fetch is in flight.
  pub fn dispatch_fetch(&mut self) -> Option<PendingFetch<T>> {
    let resource = T::entity_type();

    if self.single_flight && self.state.status() == LoadStatus::Loading {
      debug!(resource, "fetch already in flight, dropping dispatch");
      return None;
    }

    let now = self.clock.now();
    let fresh = self.state.is_fresh(now, self.stale_time);
    self.state.reduce(FetchAction::Pending);

    if fresh {
      debug!(resource, count = self.state.items().len(), "cache hit");
      let result = CacheResult::from_cache(self.state.items().to_vec(), self.state.last_fetch());
      return Some(future::ready(FetchAction::Fulfilled(result)).boxed());
    }

    debug!(resource, "cache miss, fetching from network");
    let request = (self.fetcher)();
    let clock = Arc::clone(&self.clock);

    Some(
      async move {
        match request.await {
          Ok(items) => {
            info!(resource, count = items.len(), "fetched");
            FetchAction::Fulfilled(CacheResult::from_network(items, clock.now()))
          }
          Err(e) => {
            warn!(resource, error = %e, "fetch failed, keeping cached items");
            FetchAction::Rejected {
              reason: e.to_string(),
            }
          }
        }
      }
      .boxed(),
    )
  }

  /// Apply a lifecycle action to the collection.
  pub fn reduce(&mut self, action: FetchAction<T>) {
    self.state.reduce(action);
  }

  /// Dispatch, await and reduce in one call.
  ///
  /// Returns the items after the fetch resolved. On failure these are the
  /// previous items and the status is `Error`.
  pub async fn fetch(&mut self) -> &[T] {
    if let Some(pending) = self.dispatch_fetch() {
      let action = pending.await;
      self.reduce(action);
    }
    self.state.items()
  }
}
