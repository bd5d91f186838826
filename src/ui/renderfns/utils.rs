use chrono::{DateTime, Utc};
use ratatui::prelude::Color;

use crate::cache::LoadStatus;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Border/title color for a collection status
pub fn status_color(status: LoadStatus) -> Color {
  match status {
    LoadStatus::Initial => Color::DarkGray,
    LoadStatus::Loading => Color::Yellow,
    LoadStatus::Loaded => Color::Blue,
    LoadStatus::Error => Color::Red,
  }
}

/// Human readable age of a fetch, e.g. "42s ago"
pub fn format_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let secs = (now - at).num_seconds().max(0);
  if secs < 60 {
    format!("{}s ago", secs)
  } else if secs < 3600 {
    format!("{}m ago", secs / 60)
  } else {
    format!("{}h ago", secs / 3600)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Günlük ücret", 8), "Günlü...");
  }

  #[test]
  fn test_status_color() {
    assert_eq!(status_color(LoadStatus::Error), Color::Red);
    assert_eq!(status_color(LoadStatus::Loading), Color::Yellow);
    assert_eq!(status_color(LoadStatus::Loaded), Color::Blue);
  }

  #[test]
  fn test_format_age() {
    let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    assert_eq!(format_age(now - Duration::seconds(42), now), "42s ago");
    assert_eq!(format_age(now - Duration::seconds(125), now), "2m ago");
    assert_eq!(format_age(now - Duration::hours(3), now), "3h ago");
    assert_eq!(format_age(now + Duration::seconds(5), now), "0s ago");
  }
}
