use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;

use super::error::ApiError;
use super::types::{
  AddCarRequest, Brand, Car, Color, Model, Product, ProductsResponse, UpdateCarRequest,
};

const USER_AGENT_VALUE: &str = concat!("rentacar/", env!("CARGO_PKG_VERSION"));

/// Rental API client
#[derive(Debug, Clone)]
pub struct RentalApiClient {
  client: reqwest::Client,
  base_url: Url,
}

impl RentalApiClient {
  pub fn new(config: &ApiConfig, token: Option<&str>) -> Result<Self, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    if let Some(token) = token {
      let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
      value.set_sensitive(true);
      headers.insert(AUTHORIZATION, value);
    }

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .default_headers(headers)
      .build()
      .map_err(ApiError::Client)?;

    Ok(Self {
      client,
      base_url: parse_base_url(&config.url)?,
    })
  }

  /// Host part of the base URL, for display
  pub fn host(&self) -> &str {
    self.base_url.host_str().unwrap_or("")
  }

  /// Get all cars
  pub async fn get_cars(&self) -> Result<Vec<Car>, ApiError> {
    self.get_json("cars").await
  }

  /// Get all car models
  pub async fn get_models(&self) -> Result<Vec<Model>, ApiError> {
    self.get_json("models").await
  }

  /// Get all colors
  pub async fn get_colors(&self) -> Result<Vec<Color>, ApiError> {
    self.get_json("colors").await
  }

  /// Get all brands
  pub async fn get_brands(&self) -> Result<Vec<Brand>, ApiError> {
    self.get_json("brands").await
  }

  /// Get all products (unwrapped from the paging envelope)
  pub async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
    let response: ProductsResponse = self.get_json("products").await?;
    debug!(
      total = response.total,
      skip = response.skip,
      limit = response.limit,
      "products page"
    );
    Ok(response.products)
  }

  /// Get a single product by id
  pub async fn get_product(&self, id: u64) -> Result<Product, ApiError> {
    self.get_json(&format!("products/{}", id)).await
  }

  /// Create a car
  pub async fn add_car(&self, request: &AddCarRequest) -> Result<(), ApiError> {
    self.send_json(Method::POST, "cars", request).await
  }

  /// Update an existing car
  pub async fn update_car(&self, request: &UpdateCarRequest) -> Result<(), ApiError> {
    self.send_json(Method::PUT, "cars", request).await
  }

  fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
    self.base_url.join(path).map_err(|source| ApiError::InvalidUrl {
      url: format!("{}{}", self.base_url, path),
      source,
    })
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    let url = self.endpoint(path)?;
    debug!(url = %url, "GET");

    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(ApiError::Status {
        url: url.to_string(),
        status,
      });
    }

    let body = response.bytes().await.map_err(|source| ApiError::Transport {
      url: url.to_string(),
      source,
    })?;

    serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
      url: url.to_string(),
      source,
    })
  }

  async fn send_json<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<(), ApiError> {
    let url = self.endpoint(path)?;
    debug!(url = %url, method = %method, "sending");

    let response = self
      .client
      .request(method, url.clone())
      .json(body)
      .send()
      .await
      .map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(ApiError::Status {
        url: url.to_string(),
        status,
      });
    }

    Ok(())
  }
}

/// Parse the base URL so that relative endpoints are appended to its path.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
  let mut normalized = raw.trim().to_string();
  if !normalized.ends_with('/') {
    normalized.push('/');
  }
  Url::parse(&normalized).map_err(|source| ApiError::InvalidUrl {
    url: raw.to_string(),
    source,
  })
}
