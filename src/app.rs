use crate::api::types::Product;
use crate::api::RentalApiClient;
use crate::cache::Clock;
use crate::cart::CartAction;
use crate::commands::{self, Command};
use crate::event::{Event, EventHandler};
use crate::store::{Resource, Store, StoreAction};
use crate::ui;
use crate::ui::rows::{detail_fields, visible, CatalogRow};
use chrono::{DateTime, Utc};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// How long a notice stays in the status bar
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
  Search,
}

/// View state. Catalog data lives in the store; views only keep selection.
#[derive(Debug)]
pub enum ViewState {
  // Root view (set via : commands)
  Catalog { resource: Resource, selected: usize },

  // Pushed views
  Cart { selected: usize },
  CarDetail { id: u64, scroll: u16 },
  Detail {
    title: String,
    fields: Vec<(String, String)>,
    scroll: u16,
  },
}

/// Transient message in the status bar
#[derive(Debug)]
pub struct Notice {
  pub message: String,
  pub is_error: bool,
  shown_at: Instant,
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<ViewState>,

  /// Current input mode
  mode: Mode,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Search filter input (after pressing /)
  search_filter: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Header title
  title: String,

  /// The only store; mutated on this loop only
  store: Store,

  /// Used directly for uncached requests (product detail)
  client: RentalApiClient,

  clock: Arc<dyn Clock>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  notice: Option<Notice>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(
    title: String,
    default_resource: Resource,
    store: Store,
    client: RentalApiClient,
    clock: Arc<dyn Clock>,
  ) -> Self {
    // Replaced by the event handler's sender in run()
    let (tx, _rx) = mpsc::unbounded_channel();

    Self {
      view_stack: vec![ViewState::Catalog {
        resource: default_resource,
        selected: 0,
      }],
      mode: Mode::Normal,
      command_input: String::new(),
      search_filter: String::new(),
      selected_suggestion: 0,
      title,
      store,
      client,
      clock,
      event_tx: tx,
      notice: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Initial data load
    if let Some(resource) = self.root_resource() {
      self.dispatch_fetch(resource);
    }

    // Main loop
    let result = self.event_loop(&mut terminal, &mut events).await;

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }
    Ok(())
  }

  /// Dispatch a fetch and run its network half as a background task.
  ///
  /// The store is marked `Loading` right here; the completing action comes
  /// back through the event channel.
  fn dispatch_fetch(&mut self, resource: Resource) {
    if let Some(pending) = self.store.dispatch_fetch(resource) {
      let tx = self.event_tx.clone();
      tokio::spawn(async move {
        let _ = tx.send(Event::Store(pending.await));
      });
    }
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        if self
          .notice
          .as_ref()
          .is_some_and(|n| n.shown_at.elapsed() > NOTICE_TTL)
        {
          self.notice = None;
        }
      }
      Event::Store(action) => self.handle_store_action(action),
      Event::ProductLoaded(product) => self.show_product(*product),
      Event::Error(msg) => self.set_notice(msg, true),
    }
  }

  fn handle_store_action(&mut self, action: StoreAction) {
    if let Some((resource, reason)) = action.rejection() {
      let message = format!("Could not refresh {}: {}", resource.name(), reason);
      self.set_notice(message, true);
    }
    self.store.reduce(action);
    self.clamp_selection();
  }

  fn handle_key(&mut self, key: KeyEvent) {
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
      Mode::Search => self.handle_search_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Enter => self.enter_selected(),
      KeyCode::Esc => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.search_filter.clear();
        }
      }
      KeyCode::Tab => self.cycle_resource(1),
      KeyCode::BackTab => self.cycle_resource(-1),

      // Data
      KeyCode::Char('r') => self.refresh_current(),
      KeyCode::Char('a') => self.add_selected_to_cart(),
      KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_from_cart(),
      KeyCode::Char('+') => self.change_selected_days(1),
      KeyCode::Char('-') => self.change_selected_days(-1),
      KeyCode::Char('x') => {
        if matches!(self.view_stack.last(), Some(ViewState::Cart { .. })) {
          self.store.reduce(StoreAction::Cart(CartAction::Clear));
          self.clamp_selection();
        }
      }

      // Mode switches
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
      }
      KeyCode::Char('/') => {
        if matches!(self.view_stack.last(), Some(ViewState::Catalog { .. })) {
          self.mode = Mode::Search;
          self.search_filter.clear();
        }
      }

      _ => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        // Navigate autocomplete suggestions
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0; // Reset selection on input change
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0; // Reset selection on input change
      }
      _ => {}
    }
  }

  fn handle_search_mode_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.search_filter.clear();
      }
      KeyCode::Enter => {
        // Keep filter and return to normal mode
        self.mode = Mode::Normal;
      }
      KeyCode::Backspace => {
        self.search_filter.pop();
      }
      KeyCode::Char(c) => {
        self.search_filter.push(c);
      }
      _ => {}
    }
    self.clamp_selection();
  }

  fn execute_command(&mut self) {
    // Either the selected suggestion or the raw input
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = if self.selected_suggestion < suggestions.len() {
      suggestions[self.selected_suggestion].name.to_string()
    } else {
      self.command_input.trim().to_lowercase()
    };
    self.command_input.clear();

    debug!(command = %cmd, "executing command");

    if let Some(resource) = Resource::from_name(&cmd) {
      self.show_catalog(resource);
      return;
    }

    match cmd.as_str() {
      "cart" => {
        if !matches!(self.view_stack.last(), Some(ViewState::Cart { .. })) {
          self.view_stack.push(ViewState::Cart { selected: 0 });
        }
      }
      "refresh" => self.refresh_current(),
      "quit" => self.should_quit = true,
      _ => self.set_notice(format!("Unknown command: {}", cmd), true),
    }
  }

  /// Replace the root with a catalog and fetch it (served from cache while fresh).
  fn show_catalog(&mut self, resource: Resource) {
    self.view_stack = vec![ViewState::Catalog {
      resource,
      selected: 0,
    }];
    self.search_filter.clear();
    self.dispatch_fetch(resource);
  }

  fn cycle_resource(&mut self, delta: i32) {
    if self.view_stack.len() != 1 {
      return;
    }
    if let Some(current) = self.root_resource() {
      let all = Resource::ALL;
      let index = all.iter().position(|r| *r == current).unwrap_or(0) as i32;
      let next = all[(index + delta).rem_euclid(all.len() as i32) as usize];
      self.show_catalog(next);
    }
  }

  fn refresh_current(&mut self) {
    match self.view_stack.last() {
      Some(ViewState::Catalog { resource, .. }) => {
        let resource = *resource;
        self.dispatch_fetch(resource);
      }
      Some(ViewState::CarDetail { .. }) => {
        self.dispatch_fetch(Resource::Cars);
        self.dispatch_fetch(Resource::Models);
        self.dispatch_fetch(Resource::Colors);
      }
      _ => {}
    }
  }

  fn root_resource(&self) -> Option<Resource> {
    match self.view_stack.first() {
      Some(ViewState::Catalog { resource, .. }) => Some(*resource),
      _ => None,
    }
  }

  /// Number of selectable rows in a catalog under the current filter
  fn visible_len(&self, resource: Resource) -> usize {
    let filter = &self.search_filter;
    match resource {
      Resource::Cars => visible(self.store.cars().items(), filter).len(),
      Resource::Models => visible(self.store.models().items(), filter).len(),
      Resource::Colors => visible(self.store.colors().items(), filter).len(),
      Resource::Brands => visible(self.store.brands().items(), filter).len(),
      Resource::Products => visible(self.store.products().items(), filter).len(),
    }
  }

  fn move_selection(&mut self, delta: i32) {
    let len = match self.view_stack.last() {
      Some(ViewState::Catalog { resource, .. }) => self.visible_len(*resource),
      Some(ViewState::Cart { .. }) => self.store.cart().items().len(),
      _ => 0,
    };

    match self.view_stack.last_mut() {
      Some(ViewState::Catalog { selected, .. }) | Some(ViewState::Cart { selected }) => {
        if len > 0 {
          *selected = (*selected as i32 + delta).rem_euclid(len as i32) as usize;
        }
      }
      Some(ViewState::CarDetail { scroll, .. }) | Some(ViewState::Detail { scroll, .. }) => {
        *scroll = (*scroll as i32 + delta).max(0) as u16;
      }
      None => {}
    }
  }

  fn clamp_selection(&mut self) {
    let lens: Vec<usize> = self
      .view_stack
      .iter()
      .map(|view| match view {
        ViewState::Catalog { resource, .. } => self.visible_len(*resource),
        ViewState::Cart { .. } => self.store.cart().items().len(),
        _ => 0,
      })
      .collect();

    for (view, len) in self.view_stack.iter_mut().zip(lens) {
      if let ViewState::Catalog { selected, .. } | ViewState::Cart { selected } = view {
        *selected = (*selected).min(len.saturating_sub(1));
      }
    }
  }

  fn enter_selected(&mut self) {
    let Some(ViewState::Catalog { resource, selected }) = self.view_stack.last() else {
      return;
    };
    let (resource, selected) = (*resource, *selected);
    let filter = self.search_filter.as_str();

    match resource {
      Resource::Cars => {
        let id = selected_in(self.store.cars().items(), filter, selected).map(|c| c.id);
        if let Some(id) = id {
          self.view_stack.push(ViewState::CarDetail { id, scroll: 0 });
          // Names for the model/color ids, like the edit form needs
          self.dispatch_fetch(Resource::Models);
          self.dispatch_fetch(Resource::Colors);
        }
      }
      Resource::Models => {
        let detail = selected_in(self.store.models().items(), filter, selected)
          .map(|m| (m.name.clone(), detail_fields(m)));
        self.push_detail(detail);
      }
      Resource::Colors => {
        let detail = selected_in(self.store.colors().items(), filter, selected)
          .map(|c| (c.name.clone(), detail_fields(c)));
        self.push_detail(detail);
      }
      Resource::Brands => {
        let detail = selected_in(self.store.brands().items(), filter, selected)
          .map(|b| (b.name.clone(), detail_fields(b)));
        self.push_detail(detail);
      }
      Resource::Products => {
        let id = selected_in(self.store.products().items(), filter, selected).map(|p| p.id);
        if let Some(id) = id {
          self.load_product(id);
        }
      }
    }
  }

  fn push_detail(&mut self, detail: Option<(String, Vec<(String, String)>)>) {
    if let Some((title, fields)) = detail {
      self.view_stack.push(ViewState::Detail {
        title,
        fields,
        scroll: 0,
      });
    }
  }

  /// Product detail is fetched by id and never cached.
  fn load_product(&mut self, id: u64) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();
    self.set_notice(format!("Loading product {}...", id), false);

    tokio::spawn(async move {
      match client.get_product(id).await {
        Ok(product) => {
          let _ = tx.send(Event::ProductLoaded(Box::new(product)));
        }
        Err(e) => {
          let _ = tx.send(Event::Error(e.to_string()));
        }
      }
    });
  }

  fn show_product(&mut self, product: Product) {
    self.notice = None;
    self.view_stack.push(ViewState::Detail {
      title: product.title.clone(),
      fields: detail_fields(&product),
      scroll: 0,
    });
  }

  fn selected_car_id(&self) -> Option<u64> {
    match self.view_stack.last() {
      Some(ViewState::Catalog {
        resource: Resource::Cars,
        selected,
      }) => selected_in(self.store.cars().items(), &self.search_filter, *selected).map(|c| c.id),
      Some(ViewState::CarDetail { id, .. }) => Some(*id),
      Some(ViewState::Cart { selected }) => self.store.cart().items().get(*selected).map(|i| i.car.id),
      _ => None,
    }
  }

  fn add_selected_to_cart(&mut self) {
    if matches!(self.view_stack.last(), Some(ViewState::Cart { .. })) {
      return;
    }
    let Some(car) = self
      .selected_car_id()
      .and_then(|id| self.store.cars().get(id))
      .cloned()
    else {
      return;
    };

    if self.store.cart().contains(car.id) {
      self.set_notice(format!("{} is already in the cart", car.plate), false);
      return;
    }
    info!(car = car.id, "added to cart");
    self.set_notice(format!("Added {} to the cart", car.plate), false);
    self.store.reduce(StoreAction::Cart(CartAction::Add(car)));
  }

  fn remove_selected_from_cart(&mut self) {
    if !matches!(self.view_stack.last(), Some(ViewState::Cart { .. })) {
      return;
    }
    if let Some(id) = self.selected_car_id() {
      self.store.reduce(StoreAction::Cart(CartAction::Remove(id)));
      self.clamp_selection();
    }
  }

  fn change_selected_days(&mut self, delta: i64) {
    let Some(ViewState::Cart { selected }) = self.view_stack.last() else {
      return;
    };
    if let Some(item) = self.store.cart().items().get(*selected) {
      let days = (i64::from(item.days) + delta).clamp(1, i64::from(u32::MAX)) as u32;
      let id = item.car.id;
      self.store.reduce(StoreAction::Cart(CartAction::SetDays(id, days)));
    }
  }

  fn set_notice(&mut self, message: String, is_error: bool) {
    self.notice = Some(Notice {
      message,
      is_error,
      shown_at: Instant::now(),
    });
  }

  // Accessors for UI rendering
  pub fn current_view(&self) -> Option<&ViewState> {
    self.view_stack.last()
  }

  pub fn store(&self) -> &Store {
    &self.store
  }

  pub fn now(&self) -> DateTime<Utc> {
    self.clock.now()
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn search_filter(&self) -> &str {
    &self.search_filter
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn notice(&self) -> Option<&Notice> {
    self.notice.as_ref()
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| self.breadcrumb_label(v))
      .collect()
  }

  pub fn autocomplete_suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(&self.command_input)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  /// Get the label for a view in the breadcrumb
  fn breadcrumb_label(&self, view: &ViewState) -> String {
    match view {
      ViewState::Catalog { resource, .. } => resource.title().to_string(),
      ViewState::Cart { .. } => "Cart".to_string(),
      ViewState::CarDetail { id, .. } => self
        .store
        .cars()
        .get(*id)
        .map(|car| car.plate.clone())
        .unwrap_or_else(|| format!("Car {}", id)),
      ViewState::Detail { title, .. } => title.clone(),
    }
  }
}

/// The item at `selected` among those visible under `filter`
fn selected_in<'a, T: CatalogRow>(items: &'a [T], filter: &str, selected: usize) -> Option<&'a T> {
  visible(items, filter).get(selected).copied()
}
