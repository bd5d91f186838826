use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::cart::Cart;
use crate::ui::renderfns::truncate;

pub fn draw_cart(frame: &mut Frame, area: Rect, cart: &Cart, selected: usize) {
  let title = format!(" Cart ({}) · total {:.2} ", cart.items().len(), cart.total());

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Green));

  if cart.is_empty() {
    let paragraph = Paragraph::new("Cart is empty. Select a car and press a to add it.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = cart
    .items()
    .iter()
    .map(|item| {
      let line = Line::from(vec![
        Span::styled(
          format!("{:<12}", truncate(&item.car.plate, 12)),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(" {:>4} day(s) x {:>9.2}", item.days, item.car.daily_price)),
        Span::styled(
          format!("  = {:>10.2}", item.subtotal()),
          Style::default().fg(Color::Yellow),
        ),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected.min(cart.items().len() - 1)));

  frame.render_stateful_widget(list, area, &mut state);
}
