//! Table rows and detail fields for each resource type.

use ratatui::layout::Constraint;
use serde::Serialize;
use serde_json::Value;

use crate::api::types::{Brand, Car, Color, Model, Product};

/// A resource that can be shown as a catalog table row
pub trait CatalogRow {
  fn headers() -> &'static [&'static str];

  fn widths() -> Vec<Constraint>;

  fn cells(&self) -> Vec<String>;
}

impl CatalogRow for Car {
  fn headers() -> &'static [&'static str] {
    &["ID", "Plate", "Year", "Km", "Daily", "Type", "Fuel", "Gear", "Avail."]
  }

  fn widths() -> Vec<Constraint> {
    vec![
      Constraint::Length(6),
      Constraint::Length(12),
      Constraint::Length(6),
      Constraint::Length(9),
      Constraint::Length(9),
      Constraint::Fill(1),
      Constraint::Length(9),
      Constraint::Length(10),
      Constraint::Length(6),
    ]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.plate.clone(),
      self.model_year.to_string(),
      self.kilometer.to_string(),
      format!("{:.2}", self.daily_price),
      self.car_type.label().to_string(),
      self.fuel_type.label().to_string(),
      self.transmission_type.label().to_string(),
      self.available.label().to_string(),
    ]
  }
}

impl CatalogRow for Model {
  fn headers() -> &'static [&'static str] {
    &["ID", "Name", "Brand"]
  }

  fn widths() -> Vec<Constraint> {
    vec![Constraint::Length(6), Constraint::Fill(1), Constraint::Length(8)]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.name.clone(),
      self.brand_id.map(|id| id.to_string()).unwrap_or_default(),
    ]
  }
}

impl CatalogRow for Color {
  fn headers() -> &'static [&'static str] {
    &["ID", "Name"]
  }

  fn widths() -> Vec<Constraint> {
    vec![Constraint::Length(6), Constraint::Fill(1)]
  }

  fn cells(&self) -> Vec<String> {
    vec![self.id.to_string(), self.name.clone()]
  }
}

impl CatalogRow for Brand {
  fn headers() -> &'static [&'static str] {
    &["ID", "Name", "Logo"]
  }

  fn widths() -> Vec<Constraint> {
    vec![Constraint::Length(6), Constraint::Fill(1), Constraint::Fill(1)]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.name.clone(),
      self.logo_path.clone().unwrap_or_default(),
    ]
  }
}

impl CatalogRow for Product {
  fn headers() -> &'static [&'static str] {
    &["ID", "Title", "Price"]
  }

  fn widths() -> Vec<Constraint> {
    vec![Constraint::Length(6), Constraint::Fill(1), Constraint::Length(10)]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.title.clone(),
      format!("{:.2}", self.price),
    ]
  }
}

/// Items whose cells contain `filter` (case-insensitive), in original order.
pub fn visible<'a, T: CatalogRow>(items: &'a [T], filter: &str) -> Vec<&'a T> {
  let needle = filter.trim().to_lowercase();
  if needle.is_empty() {
    return items.iter().collect();
  }
  items
    .iter()
    .filter(|item| {
      item
        .cells()
        .iter()
        .any(|cell| cell.to_lowercase().contains(&needle))
    })
    .collect()
}

/// Flatten an item into label/value pairs for the detail view.
pub fn detail_fields<T: Serialize>(item: &T) -> Vec<(String, String)> {
  match serde_json::to_value(item) {
    Ok(Value::Object(map)) => map
      .into_iter()
      .map(|(key, value)| (key, display_value(&value)))
      .collect(),
    Ok(other) => vec![("value".to_string(), display_value(&other))],
    Err(e) => vec![("error".to_string(), e.to_string())],
  }
}

fn display_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Null => "-".to_string(),
    other => other.to_string(),
  }
}
