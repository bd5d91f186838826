use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};

use crate::cache::{CachedCollection, Cacheable, LoadStatus};
use crate::ui::renderfns::{format_age, status_color};
use crate::ui::rows::{visible, CatalogRow};

/// Draw one cached collection as a table.
///
/// Every status renders: an `Error` collection still shows whatever items it
/// kept from the last successful fetch.
pub fn draw_catalog<T: Cacheable + CatalogRow>(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  collection: &CachedCollection<T>,
  filter: &str,
  selected: usize,
  now: DateTime<Utc>,
) {
  let rows = visible(collection.items(), filter);
  let status = collection.status();

  let mut heading = match status {
    LoadStatus::Initial => format!(" {} (not loaded)", title),
    LoadStatus::Loading => format!(" {} (loading...)", title),
    LoadStatus::Loaded => format!(" {} ({})", title, rows.len()),
    LoadStatus::Error => format!(" {} ({}, refresh failed)", title, rows.len()),
  };
  if let Some(at) = collection.last_fetch() {
    heading.push_str(&format!(" · fetched {}", format_age(at, now)));
  }
  if !filter.is_empty() {
    heading.push_str(&format!(" · /{}", filter));
  }
  heading.push(' ');

  let block = Block::default()
    .title(heading)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(status_color(status)));

  if rows.is_empty() {
    let message = empty_message(status, T::entity_type(), !filter.is_empty());
    let paragraph = Paragraph::new(message)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let header = Row::new(T::headers().iter().copied())
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

  let table = Table::new(rows.iter().map(|item| Row::new(item.cells())), T::widths())
    .header(header)
    .block(block)
    .row_highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = TableState::default().with_selected(Some(selected.min(rows.len() - 1)));
  frame.render_stateful_widget(table, area, &mut state);
}

fn empty_message(status: LoadStatus, resource: &str, filtered: bool) -> String {
  match status {
    LoadStatus::Initial => "Nothing fetched yet.".to_string(),
    LoadStatus::Loading => format!("Loading {}...", resource),
    LoadStatus::Loaded if filtered => "No matches for the current filter.".to_string(),
    LoadStatus::Loaded => format!("No {} found.", resource),
    LoadStatus::Error => format!("Could not load {}. Press r to retry.", resource),
  }
}
