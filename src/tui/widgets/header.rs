//! Header widget for the TUI.
//!
//! Displays the application name, version, and database connection info.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    connection_info: Option<&'a str>,
    is_processing: bool,
}

impl<'a> Header<'a> {
    pub fn new(connection_info: Option<&'a str>, is_processing: bool) -> Self {
        Self {
            connection_info,
            is_processing,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" Medical Records v{}", env!("CARGO_PKG_VERSION"));
        buf.set_span(area.x, area.y, &Span::styled(left_text, style), area.width);

        if self.is_processing {
            let text = "working...";
            let busy_style = style.fg(Color::Yellow);
            let x = area.x + area.width.saturating_sub(text.len() as u16) / 2;
            buf.set_string(x, area.y, text, busy_style);
        }

        let (dot, dot_color, info) = match self.connection_info {
            Some(info) => ("●", Color::Green, info),
            None => ("○", Color::Gray, "not connected"),
        };
        let db_text = format!(" [db: {info}] ");
        let width = db_text.chars().count() as u16 + 2;
        if width < area.width {
            let x = area.right().saturating_sub(width);
            buf.set_string(x, area.y, " ", style);
            buf.set_string(x + 1, area.y, dot, style.fg(dot_color));
            buf.set_string(x + 2, area.y, &db_text, style);
        }
    }
}
