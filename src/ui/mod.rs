mod renderfns;
pub mod rows;
mod views;

use crate::app::{App, Mode, ViewState};
use crate::store::{Resource, Store};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use renderfns::{draw_command_overlay, draw_header};
use rows::detail_fields;
use views::{draw_cart, draw_catalog, draw_detail};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let store = app.store();
  draw_header(
    frame,
    chunks[0],
    app.title(),
    &app.view_breadcrumb(),
    store.cart().items().len(),
  );

  // Draw current view
  if let Some(view) = app.current_view() {
    match view {
      ViewState::Catalog { resource, selected } => {
        draw_resource(frame, chunks[1], app, *resource, *selected);
      }
      ViewState::Cart { selected } => {
        draw_cart(frame, chunks[1], store.cart(), *selected);
      }
      ViewState::CarDetail { id, scroll } => {
        let (title, fields) = car_detail(store, *id);
        draw_detail(frame, chunks[1], &title, &fields, *scroll);
      }
      ViewState::Detail {
        title,
        fields,
        scroll,
      } => {
        draw_detail(frame, chunks[1], title, fields, *scroll);
      }
    }
  }

  if *app.mode() == Mode::Command {
    draw_command_overlay(
      frame,
      chunks[1],
      app.command_input(),
      &app.autocomplete_suggestions(),
      app.selected_suggestion(),
    );
  }

  // Draw status bar
  draw_status_bar(frame, chunks[2], app);
}

fn draw_resource(frame: &mut Frame, area: Rect, app: &App, resource: Resource, selected: usize) {
  let store = app.store();
  let filter = app.search_filter();
  let now = app.now();
  let title = resource.title();

  match resource {
    Resource::Cars => draw_catalog(frame, area, title, store.cars(), filter, selected, now),
    Resource::Models => draw_catalog(frame, area, title, store.models(), filter, selected, now),
    Resource::Colors => draw_catalog(frame, area, title, store.colors(), filter, selected, now),
    Resource::Brands => draw_catalog(frame, area, title, store.brands(), filter, selected, now),
    Resource::Products => draw_catalog(frame, area, title, store.products(), filter, selected, now),
  }
}

/// Car fields plus the names its model and color ids point at
fn car_detail(store: &Store, id: u64) -> (String, Vec<(String, String)>) {
  let Some(car) = store.cars().get(id) else {
    return (
      format!("Car {}", id),
      vec![("car".to_string(), "no longer in the list".to_string())],
    );
  };

  let mut fields = detail_fields(car);
  let model = store
    .models()
    .get(car.model_id)
    .map(|m| m.name.clone())
    .unwrap_or_else(|| "-".to_string());
  let color = store
    .colors()
    .get(car.color_id)
    .map(|c| c.name.clone())
    .unwrap_or_else(|| "-".to_string());
  fields.push(("model".to_string(), model));
  fields.push(("color".to_string(), color));

  (car.plate.clone(), fields)
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match app.mode() {
    Mode::Normal => match app.notice() {
      Some(notice) if notice.is_error => (format!(" {}", notice.message), Style::default().fg(Color::Red)),
      Some(notice) => (format!(" {}", notice.message), Style::default().fg(Color::Green)),
      None => (normal_hint(app.current_view()).to_string(), Style::default().fg(Color::DarkGray)),
    },
    Mode::Command => {
      let cmd = format!(":{}", app.command_input());
      (cmd, Style::default().fg(Color::Yellow))
    }
    Mode::Search => {
      let search = format!("/{}", app.search_filter());
      (search, Style::default().fg(Color::Cyan))
    }
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}

fn normal_hint(view: Option<&ViewState>) -> &'static str {
  match view {
    Some(ViewState::Catalog {
      resource: Resource::Cars,
      ..
    }) => " :command  /search  j/k:nav  Enter:details  a:add to cart  r:refresh  Tab:next  q:quit",
    Some(ViewState::Catalog { .. }) => " :command  /search  j/k:nav  Enter:details  r:refresh  Tab:next  q:quit",
    Some(ViewState::Cart { .. }) => " j/k:nav  +/-:days  d:remove  x:clear  q:back",
    Some(ViewState::CarDetail { .. }) => " j/k:scroll  a:add to cart  r:refresh  q:back",
    _ => " j/k:scroll  q:back",
  }
}
