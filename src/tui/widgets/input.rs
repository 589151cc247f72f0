//! Text input widgets.
//!
//! [`TextInput`] is a bordered single-line field that scrolls horizontally
//! to keep the cursor visible; [`TextInput::multiline`] is the SQL editor.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::app::InputState;

/// Number of characters to skip so the cursor stays visible.
pub fn calculate_scroll_offset(cursor: usize, available_width: usize) -> usize {
    cursor.saturating_sub(available_width)
}

/// A bordered text field.
pub struct TextInput<'a> {
    title: &'a str,
    input: &'a InputState,
    focused: bool,
    multiline: bool,
}

impl<'a> TextInput<'a> {
    pub fn new(title: &'a str, input: &'a InputState, focused: bool) -> Self {
        Self {
            title,
            input,
            focused,
            multiline: false,
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Where the terminal cursor belongs when this field is rendered in `area`.
    pub fn cursor_position(&self, area: Rect) -> Position {
        let inner_width = area.width.saturating_sub(3) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;
        let (line, column) = self.input.cursor_position();

        let x = column - calculate_scroll_offset(column, inner_width);
        let y = if self.multiline {
            line - vertical_offset(line, inner_height)
        } else {
            0
        };
        Position::new(area.x + 1 + x as u16, area.y + 1 + y as u16)
    }
}

fn vertical_offset(line: usize, height: usize) -> usize {
    line.saturating_sub(height.saturating_sub(1))
}

impl Widget for TextInput<'_> {
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

        let inner_width = area.width.saturating_sub(3) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;
        let (cursor_line, cursor_column) = self.input.cursor_position();
        let skip = calculate_scroll_offset(cursor_column, inner_width);

        let lines: Vec<Line> = if self.multiline {
            self.input
                .text
                .split('\n')
                .enumerate()
                .skip(vertical_offset(cursor_line, inner_height))
                .map(|(i, line)| {
                    let skip = if i == cursor_line { skip } else { 0 };
                    Line::from(line.chars().skip(skip).collect::<String>())
                })
                .collect()
        } else {
            vec![Line::from(
                self.input.text.chars().skip(skip).collect::<String>(),
            )]
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
