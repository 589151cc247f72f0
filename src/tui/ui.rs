//! UI rendering for the TUI.
//!
//! Lays out the header, navigation sidebar, the open page and the status
//! line, then draws the confirmation dialog on top when one is pending.

use super::app::{App, Field, Focus, Page};
use super::widgets::{
    chart::ChartView, confirm, header::Header, input::TextInput, select::SelectBox,
    sidebar::Sidebar, status::StatusLine, table::ResultTable,
};
use crate::controllers::{delete, home, insert, query, visualize, Chart};
use crate::sql::Table;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Width of the navigation sidebar.
const SIDEBAR_WIDTH: u16 = 22;

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [sidebar_area, page_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .areas(body_area);

    frame.render_widget(
        Header::new(app.connection_info.as_deref(), app.is_processing),
        header_area,
    );
    frame.render_widget(
        Sidebar::new(app.page, app.focus == Focus::Sidebar),
        sidebar_area,
    );
    frame.render_widget(StatusLine::new(app.notice.as_ref()), status_area);

    let page_area = page_area.inner(ratatui::layout::Margin::new(1, 0));
    match app.page {
        Page::Home => render_home(frame, page_area, app),
        Page::Query => render_query(frame, page_area, app),
        Page::Insert => render_insert(frame, page_area, app),
        Page::Delete => render_delete(frame, page_area, app),
        Page::Visualize => render_visualize(frame, page_area, app),
    }

    if let Some(pending) = &app.pending {
        confirm::render_confirmation_dialog(frame, pending.sql(), &pending.classification());
    }
}

fn title(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )))
}

fn muted(text: impl Into<String>) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        text.into(),
        Style::default().fg(Color::Gray),
    )))
    .wrap(Wrap { trim: true })
}

fn button(label: &str, focused: bool) -> Paragraph<'_> {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Paragraph::new(Line::from(Span::styled(format!("[ {label} ]"), style)))
}

/// Draws a text field and places the terminal cursor in it when focused.
fn render_input(frame: &mut Frame, area: Rect, widget: TextInput, focused: bool, app: &App) {
    let cursor = widget.cursor_position(area);
    frame.render_widget(widget, area);
    if focused && app.pending.is_none() {
        frame.set_cursor_position(cursor);
    }
}

fn table_select(title: &str, selected: Table, focused: bool) -> SelectBox<'_> {
    let options = Table::ALL.iter().map(Table::as_str).collect();
    let index = Table::ALL.iter().position(|t| *t == selected).unwrap_or(0);
    SelectBox::new(title, options, index, focused)
}

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let [title_area, body_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);

    frame.render_widget(title(home::TITLE), title_area);
    let lines: Vec<Line> = home::lines(app.connection_info.as_deref())
        .into_iter()
        .map(Line::from)
        .collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body_area);
}

fn render_query(frame: &mut Frame, area: Rect, app: &App) {
    let [title_area, intro_area, editor_area, button_area, output_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let field = app.current_field();
    frame.render_widget(title(query::TITLE), title_area);
    frame.render_widget(muted(query::INTRO), intro_area);

    let editor_focused = field == Some(Field::Sql);
    let editor = TextInput::new("Enter your SQL query", &app.sql, editor_focused).multiline();
    render_input(frame, editor_area, editor, editor_focused, app);

    frame.render_widget(
        button(Page::Query.button(), field == Some(Field::Button)),
        button_area,
    );

    let output_area = output_area.inner(ratatui::layout::Margin::new(0, 1));
    match &app.result {
        Some(result) => frame.render_widget(
            ResultTable::new(result).scroll(app.result_scroll),
            output_area,
        ),
        None => {
            let mut lines = vec![Line::from(Span::styled(
                "Examples:",
                Style::default().fg(Color::Gray),
            ))];
            lines.extend(query::EXAMPLES.iter().map(|sql| {
                Line::from(Span::styled(
                    format!("  {sql}"),
                    Style::default().fg(Color::DarkGray),
                ))
            }));
            frame.render_widget(Paragraph::new(lines), output_area);
        }
    }
}

fn render_insert(frame: &mut Frame, area: Rect, app: &App) {
    let [title_area, subtitle_area, select_area, columns_area, values_area, button_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

    let field = app.current_field();
    frame.render_widget(title(insert::TITLE), title_area);
    frame.render_widget(
        muted(format!("Insert data into {}", app.insert_table)),
        subtitle_area,
    );
    frame.render_widget(
        table_select("Select Table", app.insert_table, field == Some(Field::Table)),
        select_area,
    );

    let columns = app.insert_columns();
    let columns_text = match columns {
        Some(columns) => {
            let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
            format!(
                "Columns for the table (excluding auto-increment columns): {}",
                names.join(", ")
            )
        }
        None => "Loading columns...".to_string(),
    };
    frame.render_widget(muted(columns_text), columns_area);

    let values_title = columns
        .map(insert::prompt)
        .unwrap_or_else(|| "Values (comma-separated)".to_string());
    let values_focused = field == Some(Field::Values);
    render_input(
        frame,
        values_area,
        TextInput::new(&values_title, &app.values, values_focused),
        values_focused,
        app,
    );

    frame.render_widget(
        button(Page::Insert.button(), field == Some(Field::Button)),
        button_area,
    );
}

fn render_delete(frame: &mut Frame, area: Rect, app: &App) {
    let [title_area, select_area, condition_area, button_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let field = app.current_field();
    frame.render_widget(title(delete::TITLE), title_area);
    frame.render_widget(
        table_select("Select Table", app.delete_table, field == Some(Field::Table)),
        select_area,
    );

    let condition_focused = field == Some(Field::Condition);
    render_input(
        frame,
        condition_area,
        TextInput::new(delete::CONDITION_PROMPT, &app.condition, condition_focused),
        condition_focused,
        app,
    );

    frame.render_widget(
        button(Page::Delete.button(), field == Some(Field::Button)),
        button_area,
    );
}

fn render_visualize(frame: &mut Frame, area: Rect, app: &App) {
    let [title_area, intro_area, select_area, button_area, chart_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let field = app.current_field();
    frame.render_widget(title(visualize::TITLE), title_area);
    frame.render_widget(muted(visualize::INTRO), intro_area);

    let options = Chart::ALL.iter().map(Chart::label).collect();
    let index = Chart::ALL.iter().position(|c| *c == app.chart).unwrap_or(0);
    frame.render_widget(
        SelectBox::new(
            "Select Visualization Type",
            options,
            index,
            field == Some(Field::Chart),
        ),
        select_area,
    );
    frame.render_widget(
        button(Page::Visualize.button(), field == Some(Field::Button)),
        button_area,
    );

    if let Some(chart) = &app.chart_data {
        let chart_area = chart_area.inner(ratatui::layout::Margin::new(0, 1));
        frame.render_widget(ChartView::new(chart), chart_area);
    }
}
