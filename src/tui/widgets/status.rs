//! Status line showing the last success or error notice, or key hints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::app::{Notice, NoticeKind};

const HINTS: &str = "Tab: next field  ↑/↓: choose  Enter: run  Esc: back  Ctrl+Q: quit";

pub struct StatusLine<'a> {
    notice: Option<&'a Notice>,
}

impl<'a> StatusLine<'a> {
    pub fn new(notice: Option<&'a Notice>) -> Self {
        Self { notice }
    }

    fn line(&self) -> Line<'a> {
        let Some(notice) = self.notice else {
            return Line::from(Span::styled(HINTS, Style::default().fg(Color::DarkGray)));
        };

        let (tag, color) = match notice.kind {
            NoticeKind::Success => ("OK", Color::Green),
            NoticeKind::Error => ("ERROR", Color::Red),
            NoticeKind::Info => ("INFO", Color::Yellow),
        };
        Line::from(vec![
            Span::styled(
                format!(" {tag} "),
                Style::default()
                    .bg(color)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", notice.message), Style::default().fg(color)),
        ])
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_without_notice() {
        assert_eq!(StatusLine::new(None).line().to_string(), HINTS);
    }

    #[test]
    fn test_error_notice() {
        let notice = Notice {
            kind: NoticeKind::Error,
            message: "Invalid input: A condition is required".into(),
        };
        assert_eq!(
            StatusLine::new(Some(&notice)).line().to_string(),
            " ERROR  Invalid input: A condition is required"
        );
    }
}
