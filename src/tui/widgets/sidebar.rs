//! Navigation sidebar listing the dashboard pages.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::app::Page;

/// Sidebar widget for page navigation.
pub struct Sidebar {
    current: Page,
    focused: bool,
}

impl Sidebar {
    pub fn new(current: Page, focused: bool) -> Self {
        Self { current, focused }
    }
}

impl Widget for Sidebar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Navigation ");

        let lines: Vec<Line> = Page::ALL
            .iter()
            .map(|page| {
                if *page == self.current {
                    Line::from(Span::styled(
                        format!("> {}", page.label()),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {}", page.label()))
                }
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
