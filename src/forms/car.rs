//! Add/update car form.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::api::types::{
  AddCarRequest, Available, Car, CarType, Color, FuelType, Model, TransmissionType,
  UpdateCarRequest,
};

use super::validation::ValidationErrors;

/// Turkish plate: province code 01-81, then 1-3 letters and 2-5 digits.
const PLATE_PATTERN: &str = r"^(0[1-9]|[1-7][0-9]|8[01])((\s?[a-zA-Z]\s?)(\d{4,5})|(\s?[a-zA-Z]{2}\s?)(\d{3,4})|(\s?[a-zA-Z]{3}\s?)(\d{2,3}))";

const MIN_MODEL_YEAR: i32 = 2005;
const MAX_MODEL_YEAR: i32 = 2024;

fn plate_regex() -> &'static Regex {
  static PLATE: OnceLock<Regex> = OnceLock::new();
  PLATE.get_or_init(|| Regex::new(PLATE_PATTERN).expect("plate pattern is valid"))
}

/// Raw form values. Every field may be missing; `validate_*` decides what is
/// required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CarForm {
  pub id: Option<u64>,
  pub plate: Option<String>,
  pub kilometer: Option<i64>,
  pub daily_price: Option<f64>,
  pub model_year: Option<i32>,
  pub min_findeks_rate: Option<i32>,
  pub image_path: Option<String>,
  #[serde(alias = "model_id")]
  pub model_id: Option<u64>,
  #[serde(alias = "color_id")]
  pub color_id: Option<u64>,
  pub car_type: Option<CarType>,
  pub fuel_type: Option<FuelType>,
  pub transmission_type: Option<TransmissionType>,
  pub available: Option<Available>,
}

impl CarForm {
  /// Form prefilled from an existing car, for editing.
  pub fn from_car(car: &Car) -> Self {
    Self {
      id: Some(car.id),
      plate: Some(car.plate.clone()),
      kilometer: Some(car.kilometer),
      daily_price: Some(car.daily_price),
      model_year: Some(car.model_year),
      min_findeks_rate: Some(car.min_findeks_rate),
      image_path: Some(car.image_path.clone()),
      model_id: Some(car.model_id),
      color_id: Some(car.color_id),
      car_type: Some(car.car_type),
      fuel_type: Some(car.fuel_type),
      transmission_type: Some(car.transmission_type),
      available: Some(car.available),
    }
  }

  /// Overlay the fields set in `edits` on top of this form.
  pub fn merge(self, edits: CarForm) -> Self {
    Self {
      id: edits.id.or(self.id),
      plate: edits.plate.or(self.plate),
      kilometer: edits.kilometer.or(self.kilometer),
      daily_price: edits.daily_price.or(self.daily_price),
      model_year: edits.model_year.or(self.model_year),
      min_findeks_rate: edits.min_findeks_rate.or(self.min_findeks_rate),
      image_path: edits.image_path.or(self.image_path),
      model_id: edits.model_id.or(self.model_id),
      color_id: edits.color_id.or(self.color_id),
      car_type: edits.car_type.or(self.car_type),
      fuel_type: edits.fuel_type.or(self.fuel_type),
      transmission_type: edits.transmission_type.or(self.transmission_type),
      available: edits.available.or(self.available),
    }
  }

  /// Validate for `POST cars`.
  pub fn validate_add(&self) -> Result<AddCarRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let request = self.check_fields(&mut errors, Available::Yes);
    errors.into_result(request)
  }

  /// Validate for `PUT cars`. Same rules as adding, plus a required id.
  pub fn validate_update(&self) -> Result<UpdateCarRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let id = match self.id {
      Some(id) if id > 0 => id,
      _ => {
        errors.add("id", "Id is required");
        0
      }
    };
    let car = self.check_fields(&mut errors, Available::No);
    errors.into_result(UpdateCarRequest { id, car })
  }

  /// Check that the selected model and color exist in the loaded lists.
  ///
  /// Empty lists are skipped: nothing to check against.
  pub fn check_references(&self, models: &[Model], colors: &[Color]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if let Some(model_id) = self.model_id.filter(|&id| id > 0) {
      if !models.is_empty() && !models.iter().any(|m| m.id == model_id) {
        errors.add("modelId", format!("Unknown model {}", model_id));
      }
    }
    if let Some(color_id) = self.color_id.filter(|&id| id > 0) {
      if !colors.is_empty() && !colors.iter().any(|c| c.id == color_id) {
        errors.add("colorId", format!("Unknown color {}", color_id));
      }
    }
    errors.into_result(())
  }

  fn check_fields(&self, errors: &mut ValidationErrors, default_available: Available) -> AddCarRequest {
    let plate = self.plate.as_deref().map(str::trim).unwrap_or_default();
    if plate.is_empty() {
      errors.add("plate", "Plate is required");
    } else if !plate_regex().is_match(plate) {
      errors.add("plate", "Invalid plate");
    }

    let kilometer = match self.kilometer {
      None => {
        errors.add("kilometer", "Kilometer is required");
        0
      }
      Some(km) if km < 0 => {
        errors.add("kilometer", "Kilometer cannot be negative");
        km
      }
      Some(km) => km,
    };

    let daily_price = match self.daily_price {
      None => {
        errors.add("dailyPrice", "Daily price is required");
        0.0
      }
      Some(price) if !price.is_finite() || price < 0.0 => {
        errors.add("dailyPrice", "Daily price cannot be negative");
        price
      }
      Some(price) => price,
    };

    let min_findeks_rate = self.min_findeks_rate.unwrap_or_else(|| {
      errors.add("minFindeksRate", "Minimum findeks rate is required");
      0
    });

    let image_path = self.image_path.as_deref().map(str::trim).unwrap_or_default();
    if image_path.is_empty() {
      errors.add("imagePath", "Image path is required");
    }

    let model_year = match self.model_year {
      None => {
        errors.add("modelYear", "Model year is required");
        0
      }
      Some(year) if year < MIN_MODEL_YEAR => {
        errors.add("modelYear", format!("Model year cannot be before {}", MIN_MODEL_YEAR));
        year
      }
      Some(year) if year > MAX_MODEL_YEAR => {
        errors.add("modelYear", format!("Model year cannot be after {}", MAX_MODEL_YEAR));
        year
      }
      Some(year) => year,
    };

    // 0 is the "nothing selected" option of the pickers
    let model_id = self.model_id.filter(|&id| id > 0).unwrap_or_else(|| {
      errors.add("modelId", "Model is required");
      0
    });
    let color_id = self.color_id.filter(|&id| id > 0).unwrap_or_else(|| {
      errors.add("colorId", "Color is required");
      0
    });

    AddCarRequest {
      plate: plate.to_string(),
      kilometer,
      daily_price,
      model_year,
      min_findeks_rate,
      image_path: image_path.to_string(),
      model_id,
      color_id,
      car_type: self.car_type.unwrap_or_default(),
      fuel_type: self.fuel_type.unwrap_or_default(),
      transmission_type: self.transmission_type.unwrap_or_default(),
      available: self.available.unwrap_or(default_available),
    }
  }
}
