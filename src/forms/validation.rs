use std::collections::BTreeMap;
use std::fmt;

/// Field name to message, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
  fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
  /// Record a message for a field. The first message for a field wins.
  pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
    self.fields.entry(field).or_insert_with(|| message.into());
  }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.fields.get(field).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
    self.fields.iter().map(|(field, message)| (*field, message.as_str()))
  }

  /// `Ok(value)` if nothing was recorded.
  pub fn into_result<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() {
      Ok(value)
    } else {
      Err(self)
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, (field, message)) in self.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{}: {}", field, message)?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}
