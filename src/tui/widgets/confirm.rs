//! Confirmation dialog for statements that change data.
//!
//! Shown over the page for free-form mutating or destructive SQL and for
//! every delete built on the delete page.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::safety::{ClassificationResult, SafetyLevel};

/// SQL lines shown before the rest is elided.
const MAX_SQL_LINES: usize = 5;

/// Renders the dialog centered on the frame.
pub fn render_confirmation_dialog(
    frame: &mut Frame,
    sql: &str,
    classification: &ClassificationResult,
) {
    let area = frame.area();
    let width = (area.width as f32 * 0.6).clamp(30.0, 80.0) as u16;
    let width = width.min(area.width);
    let sql_lines = wrap_sql(sql, width.saturating_sub(4) as usize);
    let dialog_area = center_rect(width, dialog_height(&sql_lines, classification), area);

    let (color, title) = match classification.level {
        SafetyLevel::Safe => (Color::Green, " Confirm Query "),
        SafetyLevel::Mutating => (Color::Yellow, " Confirm Modification "),
        SafetyLevel::Destructive => (Color::Red, " Warning: Destructive Statement "),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            classification.prompt(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(
        sql_lines
            .iter()
            .take(MAX_SQL_LINES)
            .map(|l| Line::from(Span::styled(format!("  {l}"), Style::default().fg(Color::Cyan)))),
    );
    if sql_lines.len() > MAX_SQL_LINES {
        lines.push(Line::from(Span::styled(
            "  ...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("Execute? "),
        Span::styled(
            "[y/Enter]",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Yes  "),
        Span::styled(
            "[n/Esc]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" No"),
    ]));

    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Black));

    frame.render_widget(Clear, dialog_area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        dialog_area,
    );
}

/// Prompt, blank, SQL, blank, buttons, plus borders.
fn dialog_height(sql_lines: &[String], classification: &ClassificationResult) -> u16 {
    let sql = sql_lines.len().min(MAX_SQL_LINES + 1);
    // Destructive prompts carry a warning sentence and may wrap.
    let prompt = if classification.requires_warning() { 2 } else { 1 };
    (prompt + 1 + sql + 1 + 1 + 2) as u16
}

/// Word-wraps SQL to `max_width` columns, keeping existing line breaks.
fn wrap_sql(sql: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for line in sql.trim().lines() {
        if line.chars().count() <= max_width {
            lines.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_width
            {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    area
}
