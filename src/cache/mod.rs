//! Client-side cache for API collections.
//!
//! Every resource type gets one [`ResourceSlice`]: a [`CachedCollection`]
//! holding the last fetched items plus a fetcher that refreshes them. A fetch
//! is a three-phase lifecycle (pending, fulfilled, rejected) fed into a pure
//! reducer, so the same slice works when driven inline or from an event loop.
//!
//! Data younger than the staleness window (60 seconds) is served without a
//! network call. Failed refreshes keep the previous items and only flip the
//! status to `Error`.

mod clock;
mod collection;
mod slice;
mod traits;

pub use clock::{Clock, SystemClock};
pub use collection::{CachedCollection, FetchAction, LoadStatus};
pub use slice::ResourceSlice;
pub use traits::Cacheable;

#[cfg(test)]
pub use clock::ManualClock;
