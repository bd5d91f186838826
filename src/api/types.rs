//! Resource types as served by the rental API.
//!
//! Field names follow the API's camelCase JSON. Fields the catalog can live
//! without are defaulted so a sparse server response still deserializes.

use serde::{Deserialize, Serialize};

/// Body style of a car
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarType {
  #[default]
  #[serde(rename = "ECOHATCHBACK")]
  EcoHatchback,
  #[serde(rename = "ECOSEDAN")]
  EcoSedan,
  #[serde(rename = "MIDSEDAN")]
  MidSedan,
  #[serde(rename = "SUV")]
  Suv,
  #[serde(rename = "LUXURY")]
  Luxury,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FuelType {
  #[default]
  Diesel,
  Gasoline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransmissionType {
  #[default]
  Automatic,
  Manual,
}

/// Whether a car can currently be rented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Available {
  #[default]
  Yes,
  No,
}

impl CarType {
  pub fn label(&self) -> &'static str {
    match self {
      CarType::EcoHatchback => "Eco hatchback",
      CarType::EcoSedan => "Eco sedan",
      CarType::MidSedan => "Mid sedan",
      CarType::Suv => "SUV",
      CarType::Luxury => "Luxury",
    }
  }
}

impl FuelType {
  pub fn label(&self) -> &'static str {
    match self {
      FuelType::Diesel => "Diesel",
      FuelType::Gasoline => "Gasoline",
    }
  }
}

impl Available {
  pub fn label(&self) -> &'static str {
    match self {
      Available::Yes => "yes",
      Available::No => "no",
    }
  }
}

impl TransmissionType {
  pub fn label(&self) -> &'static str {
    match self {
      TransmissionType::Automatic => "Automatic",
      TransmissionType::Manual => "Manual",
    }
  }
}

/// Rentable car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
  pub id: u64,
  #[serde(default)]
  pub plate: String,
  #[serde(default)]
  pub kilometer: i64,
  #[serde(default)]
  pub daily_price: f64,
  #[serde(default)]
  pub model_year: i32,
  #[serde(default)]
  pub min_findeks_rate: i32,
  #[serde(default)]
  pub image_path: String,
  #[serde(default, alias = "model_id")]
  pub model_id: u64,
  #[serde(default, alias = "color_id")]
  pub color_id: u64,
  #[serde(default)]
  pub car_type: CarType,
  #[serde(default)]
  pub fuel_type: FuelType,
  #[serde(default)]
  pub transmission_type: TransmissionType,
  #[serde(default)]
  pub available: Available,
}

/// Car model (e.g. "Corolla")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
  pub id: u64,
  pub name: String,
  #[serde(default, alias = "brand_id")]
  pub brand_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
  pub id: u64,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub logo_path: Option<String>,
}

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: u64,
  pub title: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub price: f64,
  #[serde(default)]
  pub thumbnail: Option<String>,
}

/// Envelope returned by `GET products`
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
  #[serde(default)]
  pub products: Vec<Product>,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub skip: u64,
  #[serde(default)]
  pub limit: u64,
}

/// Body of `POST cars`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCarRequest {
  pub plate: String,
  pub kilometer: i64,
  pub daily_price: f64,
  pub model_year: i32,
  pub min_findeks_rate: i32,
  pub image_path: String,
  pub model_id: u64,
  pub color_id: u64,
  pub car_type: CarType,
  pub fuel_type: FuelType,
  pub transmission_type: TransmissionType,
  pub available: Available,
}

/// Body of `PUT cars`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateCarRequest {
  pub id: u64,
  #[serde(flatten)]
  pub car: AddCarRequest,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_car_accepts_snake_case_foreign_keys() {
    let car: Car = serde_json::from_str(
      r#"{"id":1,"plate":"34ABC123","dailyPrice":950.0,"model_id":4,"color_id":2,
          "carType":"SUV","fuelType":"GASOLINE","transmissionType":"MANUAL","available":"NO"}"#,
    )
    .unwrap();

    assert_eq!(car.model_id, 4);
    assert_eq!(car.color_id, 2);
    assert_eq!(car.car_type, CarType::Suv);
    assert_eq!(car.fuel_type, FuelType::Gasoline);
    assert_eq!(car.transmission_type, TransmissionType::Manual);
    assert_eq!(car.available, Available::No);
  }

  #[test]
  fn test_sparse_car_uses_defaults() {
    let car: Car = serde_json::from_str(r#"{"id":1,"plate":"34ABC123"}"#).unwrap();
    assert_eq!(car.kilometer, 0);
    assert_eq!(car.car_type, CarType::EcoHatchback);
    assert_eq!(car.available, Available::Yes);
  }

  #[test]
  fn test_update_request_flattens_car_fields() {
    let request = UpdateCarRequest {
      id: 9,
      car: AddCarRequest {
        plate: "34ABC123".to_string(),
        kilometer: 1200,
        daily_price: 800.0,
        model_year: 2020,
        min_findeks_rate: 500,
        image_path: "cars/9.png".to_string(),
        model_id: 3,
        color_id: 1,
        car_type: CarType::EcoSedan,
        fuel_type: FuelType::Diesel,
        transmission_type: TransmissionType::Automatic,
        available: Available::Yes,
      },
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["id"], 9);
    assert_eq!(value["plate"], "34ABC123");
    assert_eq!(value["dailyPrice"], 800.0);
    assert_eq!(value["carType"], "ECOSEDAN");
  }
}
