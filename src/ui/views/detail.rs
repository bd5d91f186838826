use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Draw label/value pairs of a single item
pub fn draw_detail(frame: &mut Frame, area: Rect, title: &str, fields: &[(String, String)], scroll: u16) {
  let block = Block::default()
    .title(format!(" {} ", title))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

  let lines: Vec<Line> = fields
    .iter()
    .map(|(label, value)| {
      Line::from(vec![
        Span::styled(
          format!("{:>width$}  ", label, width = width),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw(value.clone()),
      ])
    })
    .collect();

  let paragraph = Paragraph::new(lines)
    .block(block)
    .wrap(Wrap { trim: false })
    .scroll((scroll, 0));
  frame.render_widget(paragraph, area);
}
