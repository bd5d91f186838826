//! Process-wide store: one cached slice per resource type plus the cart.
//!
//! The store is built once at startup and only changes through
//! [`Store::reduce`]. Fetches are split into a synchronous dispatch (which
//! marks the slice `Loading` and returns a future) and the reduction of the
//! action that future resolves to, so the UI event loop can run fetches as
//! background tasks while keeping every mutation on the loop itself.

use clap::ValueEnum;
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::types::{Brand, Car, Color, Model, Product};
use crate::api::RentalApiClient;
use crate::cache::{CachedCollection, Cacheable, Clock, FetchAction, LoadStatus, ResourceSlice};
use crate::cart::{Cart, CartAction};

/// Resource types served from the cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
  #[default]
  Cars,
  Models,
  Colors,
  Brands,
  Products,
}

impl Resource {
  pub const ALL: [Resource; 5] = [
    Resource::Cars,
    Resource::Models,
    Resource::Colors,
    Resource::Brands,
    Resource::Products,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      Resource::Cars => Car::entity_type(),
      Resource::Models => Model::entity_type(),
      Resource::Colors => Color::entity_type(),
      Resource::Brands => Brand::entity_type(),
      Resource::Products => Product::entity_type(),
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      Resource::Cars => "Cars",
      Resource::Models => "Models",
      Resource::Colors => "Colors",
      Resource::Brands => "Brands",
      Resource::Products => "Products",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|r| r.name() == name)
  }
}

/// Actions accepted by the store, routed to their slice
#[derive(Debug, Clone)]
pub enum StoreAction {
  Cars(FetchAction<Car>),
  Models(FetchAction<Model>),
  Colors(FetchAction<Color>),
  Brands(FetchAction<Brand>),
  Products(FetchAction<Product>),
  Cart(CartAction),
}

impl StoreAction {
  /// Failure reason if this action rejects a fetch.
  pub fn rejection(&self) -> Option<(Resource, &str)> {
    match self {
      StoreAction::Cars(a) => a.rejection_reason().map(|r| (Resource::Cars, r)),
      StoreAction::Models(a) => a.rejection_reason().map(|r| (Resource::Models, r)),
      StoreAction::Colors(a) => a.rejection_reason().map(|r| (Resource::Colors, r)),
      StoreAction::Brands(a) => a.rejection_reason().map(|r| (Resource::Brands, r)),
      StoreAction::Products(a) => a.rejection_reason().map(|r| (Resource::Products, r)),
      StoreAction::Cart(_) => None,
    }
  }
}

/// Read-only snapshot of a slice's state, independent of the item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceStatus {
  pub status: LoadStatus,
  pub len: usize,
  pub last_fetch: Option<chrono::DateTime<chrono::Utc>>,
}

impl<T: Cacheable> From<&CachedCollection<T>> for SliceStatus {
  fn from(collection: &CachedCollection<T>) -> Self {
    Self {
      status: collection.status(),
      len: collection.items().len(),
      last_fetch: collection.last_fetch(),
    }
  }
}

pub struct Store {
  cars: ResourceSlice<Car>,
  models: ResourceSlice<Model>,
  colors: ResourceSlice<Color>,
  brands: ResourceSlice<Brand>,
  products: ResourceSlice<Product>,
  cart: Cart,
}

/// Build a slice whose fetcher calls one client method.
macro_rules! api_slice {
  ($client:expr, $clock:expr, $single_flight:expr, $method:ident) => {{
    let client = $client.clone();
    ResourceSlice::new(
      move || {
        let client = client.clone();
        async move { client.$method().await.map_err(color_eyre::Report::from) }
      },
      Arc::clone(&$clock),
    )
    .with_single_flight($single_flight)
  }};
}

impl Store {
  /// Create the store with every slice empty and backed by `client`.
  pub fn new(client: &RentalApiClient, clock: Arc<dyn Clock>, single_flight: bool) -> Self {
    Self {
      cars: api_slice!(client, clock, single_flight, get_cars),
      models: api_slice!(client, clock, single_flight, get_models),
      colors: api_slice!(client, clock, single_flight, get_colors),
      brands: api_slice!(client, clock, single_flight, get_brands),
      products: api_slice!(client, clock, single_flight, get_products),
      cart: Cart::default(),
    }
  }

  pub fn cars(&self) -> &CachedCollection<Car> {
    self.cars.state()
  }

  pub fn models(&self) -> &CachedCollection<Model> {
    self.models.state()
  }

  pub fn colors(&self) -> &CachedCollection<Color> {
    self.colors.state()
  }

  pub fn brands(&self) -> &CachedCollection<Brand> {
    self.brands.state()
  }

  pub fn products(&self) -> &CachedCollection<Product> {
    self.products.state()
  }

  pub fn cart(&self) -> &Cart {
    &self.cart
  }

  pub fn status(&self, resource: Resource) -> SliceStatus {
    match resource {
      Resource::Cars => self.cars().into(),
      Resource::Models => self.models().into(),
      Resource::Colors => self.colors().into(),
      Resource::Brands => self.brands().into(),
      Resource::Products => self.products().into(),
    }
  }

  /// Synchronous half of a fetch; the returned future resolves to the action
  /// to feed back into [`Store::reduce`].
  pub fn dispatch_fetch(&mut self, resource: Resource) -> Option<BoxFuture<'static, StoreAction>> {
    match resource {
      Resource::Cars => self
        .cars
        .dispatch_fetch()
        .map(|f| f.map(StoreAction::Cars).boxed()),
      Resource::Models => self
        .models
        .dispatch_fetch()
        .map(|f| f.map(StoreAction::Models).boxed()),
      Resource::Colors => self
        .colors
        .dispatch_fetch()
        .map(|f| f.map(StoreAction::Colors).boxed()),
      Resource::Brands => self
        .brands
        .dispatch_fetch()
        .map(|f| f.map(StoreAction::Brands).boxed()),
      Resource::Products => self
        .products
        .dispatch_fetch()
        .map(|f| f.map(StoreAction::Products).boxed()),
    }
  }

  pub fn reduce(&mut self, action: StoreAction) {
    match action {
      StoreAction::Cars(a) => self.cars.reduce(a),
      StoreAction::Models(a) => self.models.reduce(a),
      StoreAction::Colors(a) => self.colors.reduce(a),
      StoreAction::Brands(a) => self.brands.reduce(a),
      StoreAction::Products(a) => self.products.reduce(a),
      StoreAction::Cart(a) => self.cart.reduce(a),
    }
  }

  /// Dispatch, await and reduce a fetch inline.
  pub async fn fetch(&mut self, resource: Resource) -> SliceStatus {
    if let Some(pending) = self.dispatch_fetch(resource) {
      let action = pending.await;
      self.reduce(action);
    }
    self.status(resource)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::ManualClock;
  use crate::config::ApiConfig;
  use chrono::{DateTime, Duration};
  use serde_json::json;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn store_for(server: &MockServer, clock: Arc<ManualClock>) -> Store {
    let config = ApiConfig {
      url: server.uri(),
      timeout_secs: 5,
    };
    let client = RentalApiClient::new(&config, None).unwrap();
    Store::new(&client, clock, false)
  }

  fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
      DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    ))
  }

  #[tokio::test]
  async fn test_fetch_cars_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/cars"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "plate": "34ABC123"}])))
      .expect(2)
      .mount(&server)
      .await;

    let clock = clock();
    let mut store = store_for(&server, Arc::clone(&clock));

    let status = store.fetch(Resource::Cars).await;
    assert_eq!(status.status, LoadStatus::Loaded);
    assert_eq!(store.cars().items()[0].plate, "34ABC123");

    // Within the window: no request.
    clock.advance(Duration::milliseconds(30_000));
    store.fetch(Resource::Cars).await;

    // Past the window: second request.
    clock.advance(Duration::milliseconds(31_000));
    store.fetch(Resource::Cars).await;
    assert_eq!(store.cars().status(), LoadStatus::Loaded);
  }

  #[tokio::test]
  async fn test_server_error_keeps_previous_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/cars"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "plate": "34ABC123"}])))
      .up_to_n_times(1)
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(path("/cars"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let clock = clock();
    let mut store = store_for(&server, Arc::clone(&clock));
    store.fetch(Resource::Cars).await;
    let before = store.cars().items().to_vec();

    clock.advance(Duration::milliseconds(61_000));
    let status = store.fetch(Resource::Cars).await;

    assert_eq!(status.status, LoadStatus::Error);
    assert_eq!(store.cars().items(), before.as_slice());
  }

  #[tokio::test]
  async fn test_slices_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/colors"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Red"}])))
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(path("/brands"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let mut store = store_for(&server, clock());
    store.fetch(Resource::Colors).await;
    store.fetch(Resource::Brands).await;

    assert_eq!(store.status(Resource::Colors).status, LoadStatus::Loaded);
    assert_eq!(store.status(Resource::Brands).status, LoadStatus::Error);
    assert_eq!(store.status(Resource::Cars).status, LoadStatus::Initial);
    assert_eq!(store.status(Resource::Colors).len, 1);
  }

  #[tokio::test]
  async fn test_dispatch_then_reduce_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/models"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let mut store = store_for(&server, clock());
    let pending = store.dispatch_fetch(Resource::Models).unwrap();
    assert_eq!(store.models().status(), LoadStatus::Loading);

    let action = pending.await;
    let (resource, reason) = action.rejection().expect("rejected");
    assert_eq!(resource, Resource::Models);
    assert!(reason.contains("500"));

    store.reduce(action);
    assert_eq!(store.models().status(), LoadStatus::Error);
  }

  #[test]
  fn test_resource_names_round_trip() {
    for resource in Resource::ALL {
      assert_eq!(Resource::from_name(resource.name()), Some(resource));
    }
    assert_eq!(Resource::from_name("trucks"), None);
  }
}
