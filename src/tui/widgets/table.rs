//! Result table widget for the TUI.
//!
//! Renders query results with column headers, auto-sized columns and styled
//! NULL values. Rows past the visible area are reached by scrolling.

use crate::db::{QueryResult, Value};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const MAX_COLUMN_WIDTH: usize = 40;
const MIN_COLUMN_WIDTH: usize = 4;

/// Lines above the first data row: top border, header, separator.
const HEADER_LINES: usize = 3;
/// Lines below the last data row: bottom border, footer.
const FOOTER_LINES: usize = 2;

/// Widget for rendering a query result as a table.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
    scroll: usize,
}

impl<'a> ResultTable<'a> {
    pub fn new(result: &'a QueryResult) -> Self {
        Self { result, scroll: 0 }
    }

    /// Skips the first `scroll` data rows, never past the last page.
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .result
            .columns
            .iter()
            .map(|col| col.name.chars().count().max(MIN_COLUMN_WIDTH))
            .collect();

        for row in &self.result.rows {
            for (width, value) in widths.iter_mut().zip(row) {
                *width = (*width).max(value.to_display_string().chars().count());
            }
        }

        widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
    }

    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let head: String = s.chars().take(max_width - 3).collect();
            format!("{head}...")
        }
    }

    /// Renders the table to lines, showing at most `max_rows` data rows.
    pub fn render_to_lines(&self, available_width: usize, max_rows: usize) -> Vec<Line<'a>> {
        if self.result.columns.is_empty() {
            return vec![Line::from(Span::styled(
                "(no columns)",
                Style::default().fg(Color::DarkGray),
            ))];
        }

        let widths = self.column_widths();
        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let widths: Vec<usize> = if total_width > available_width && available_width > 0 {
            let scale = available_width as f64 / total_width as f64;
            widths
                .iter()
                .map(|&w| ((w as f64 * scale) as usize).max(MIN_COLUMN_WIDTH))
                .collect()
        } else {
            widths
        };

        let last_page = self.result.rows.len().saturating_sub(max_rows.max(1));
        let first = self.scroll.min(last_page);
        let shown = &self.result.rows[first..];
        let shown = &shown[..shown.len().min(max_rows)];

        let mut lines = Vec::with_capacity(shown.len() + HEADER_LINES + FOOTER_LINES);
        lines.push(border(&widths, '┌', '┬', '┐'));
        lines.push(self.header_row(&widths));
        lines.push(border(&widths, '├', '┼', '┤'));
        lines.extend(shown.iter().map(|row| data_row(row, &widths)));
        lines.push(border(&widths, '└', '┴', '┘'));

        let mut footer = format!(
            "{} row{} returned ({}ms)",
            self.result.row_count,
            if self.result.row_count == 1 { "" } else { "s" },
            self.result.execution_time.as_millis()
        );
        if shown.len() < self.result.rows.len() {
            footer.push_str(&format!(
                ", showing {}-{} (PgUp/PgDn to scroll)",
                first + 1,
                first + shown.len()
            ));
        }
        lines.push(Line::from(Span::styled(
            footer,
            Style::default().fg(Color::DarkGray),
        )));

        lines
    }

    fn header_row(&self, widths: &[usize]) -> Line<'a> {
        let separator = Span::styled("│", Style::default().fg(Color::DarkGray));
        let mut spans = vec![separator.clone()];

        for (col, &width) in self.result.columns.iter().zip(widths) {
            let name = Self::truncate(&col.name, width);
            spans.push(Span::styled(
                format!(" {name:width$} "),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(separator.clone());
        }

        Line::from(spans)
    }
}

fn border<'a>(widths: &[usize], left: char, mid: char, right: char) -> Line<'a> {
    let inner: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
    let text = format!("{left}{}{right}", inner.join(&mid.to_string()));
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn data_row<'a>(row: &[Value], widths: &[usize]) -> Line<'a> {
    let separator = Span::styled("│", Style::default().fg(Color::DarkGray));
    let mut spans = vec![separator.clone()];

    for (value, &width) in row.iter().zip(widths) {
        let text = ResultTable::truncate(&value.to_display_string(), width);
        let style = if value.is_null() {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {text:width$} "), style));
        spans.push(separator.clone());
    }

    Line::from(spans)
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max_rows = (area.height as usize).saturating_sub(HEADER_LINES + FOOTER_LINES);
        let lines = self.render_to_lines(area.width as usize, max_rows);

        for (i, line) in lines.iter().take(area.height as usize).enumerate() {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}
