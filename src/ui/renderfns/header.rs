use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title, breadcrumb and cart size
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, breadcrumb: &[String], cart_len: usize) {
  let mut spans = vec![
    Span::styled(" rentacar ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::raw(" "),
  ];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }
    let style = if i == breadcrumb.len() - 1 {
      Style::default().fg(Color::Yellow).bold()
    } else {
      Style::default().fg(Color::White)
    };
    spans.push(Span::styled(part.clone(), style));
  }

  spans.push(Span::raw("  "));
  spans.push(Span::styled(cart_label(cart_len), Style::default().fg(Color::Green)));

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn cart_label(len: usize) -> String {
  match len {
    0 => "cart empty".to_string(),
    1 => "1 car in cart".to_string(),
    n => format!("{} cars in cart", n),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cart_label() {
    assert_eq!(cart_label(0), "cart empty");
    assert_eq!(cart_label(1), "1 car in cart");
    assert_eq!(cart_label(3), "3 cars in cart");
  }
}
