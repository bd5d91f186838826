//! Rental cart. Local state only, never fetched.

use crate::api::types::Car;

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
  pub car: Car,
  pub days: u32,
}

impl CartItem {
  pub fn subtotal(&self) -> f64 {
    self.car.daily_price * f64::from(self.days)
  }
}

#[derive(Debug, Clone)]
pub enum CartAction {
  /// Add a car for one day; ignored if the car is already in the cart
  Add(Car),
  Remove(u64),
  /// Set the rental length of a car; zero is clamped to one day
  SetDays(u64, u32),
  Clear,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
  items: Vec<CartItem>,
}

impl Cart {
  pub fn items(&self) -> &[CartItem] {
    &self.items
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn contains(&self, car_id: u64) -> bool {
    self.items.iter().any(|item| item.car.id == car_id)
  }

  pub fn total(&self) -> f64 {
    self.items.iter().map(CartItem::subtotal).sum()
  }

  pub fn reduce(&mut self, action: CartAction) {
    match action {
      CartAction::Add(car) => {
        if !self.contains(car.id) {
          self.items.push(CartItem { car, days: 1 });
        }
      }
      CartAction::Remove(id) => self.items.retain(|item| item.car.id != id),
      CartAction::SetDays(id, days) => {
        if let Some(item) = self.items.iter_mut().find(|item| item.car.id == id) {
          item.days = days.max(1);
        }
      }
      CartAction::Clear => self.items.clear(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn car(id: u64, daily_price: f64) -> Car {
    serde_json::from_value(serde_json::json!({
      "id": id,
      "plate": format!("34ABC{:03}", id),
      "dailyPrice": daily_price
    }))
    .unwrap()
  }

  #[test]
  fn test_add_is_unique_by_id() {
    let mut cart = Cart::default();
    cart.reduce(CartAction::Add(car(1, 500.0)));
    cart.reduce(CartAction::Add(car(1, 500.0)));
    cart.reduce(CartAction::Add(car(2, 300.0)));

    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.total(), 800.0);
  }

  #[test]
  fn test_days_multiply_daily_price() {
    let mut cart = Cart::default();
    cart.reduce(CartAction::Add(car(1, 500.0)));
    cart.reduce(CartAction::SetDays(1, 3));
    assert_eq!(cart.total(), 1500.0);

    cart.reduce(CartAction::SetDays(1, 0));
    assert_eq!(cart.items()[0].days, 1);
  }

  #[test]
  fn test_remove_and_clear() {
    let mut cart = Cart::default();
    cart.reduce(CartAction::Add(car(1, 500.0)));
    cart.reduce(CartAction::Add(car(2, 300.0)));

    cart.reduce(CartAction::Remove(1));
    assert!(!cart.contains(1));
    assert!(cart.contains(2));

    cart.reduce(CartAction::Clear);
    assert!(cart.is_empty());
    assert_eq!(cart.total(), 0.0);
  }
}
