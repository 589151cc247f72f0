//! Select box widget: one option shown at a time, changed with the arrow keys.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct SelectBox<'a> {
    title: &'a str,
    options: Vec<&'a str>,
    selected: usize,
    focused: bool,
}

impl<'a> SelectBox<'a> {
    pub fn new(title: &'a str, options: Vec<&'a str>, selected: usize, focused: bool) -> Self {
        Self {
            title,
            options,
            selected,
            focused,
        }
    }

    fn line(&self) -> Line<'a> {
        let current = self.options.get(self.selected).copied().unwrap_or("");
        let arrow = |visible: bool, glyph: &'static str| {
            if visible && self.focused {
                Span::styled(glyph, Style::default().fg(Color::Cyan))
            } else {
                Span::raw(" ")
            }
        };

        Line::from(vec![
            arrow(self.selected > 0, "▲"),
            Span::raw(" "),
            Span::styled(current, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            arrow(self.selected + 1 < self.options.len(), "▼"),
            Span::styled(
                format!("  ({}/{})", self.selected + 1, self.options.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }
}

impl Widget for SelectBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", self.title));

        Paragraph::new(self.line()).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(select: &SelectBox) -> String {
        select
            .line()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect()
    }

    #[test]
    fn test_arrows_only_when_focused_and_movable() {
        let options = vec!["patient", "doctor", "hospital"];
        assert_eq!(
            text(&SelectBox::new("Select Table", options.clone(), 0, true)),
            "  patient ▼  (1/3)"
        );
        assert_eq!(
            text(&SelectBox::new("Select Table", options.clone(), 2, true)),
            "▲ hospital    (3/3)"
        );
        assert_eq!(
            text(&SelectBox::new("Select Table", options, 1, false)),
            "  doctor    (2/3)"
        );
    }
}
