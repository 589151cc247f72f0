//! Chart widget.
//!
//! Bar charts and histograms use ratatui's `BarChart`. Pie charts are drawn
//! as one proportional bar per slice with its percentage.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
};

use crate::chart::{ChartData, ChartKind};

const SLICE_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
];

pub struct ChartView<'a> {
    chart: &'a ChartData,
}

impl<'a> ChartView<'a> {
    pub fn new(chart: &'a ChartData) -> Self {
        Self { chart }
    }

    fn block(&self) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.chart.title))
    }

    /// One line per slice: label, bar sized by share, percentage and value.
    pub fn pie_lines(&self, width: usize) -> Vec<Line<'a>> {
        let label_width = self
            .chart
            .data
            .iter()
            .map(|d| d.label.chars().count())
            .max()
            .unwrap_or(0)
            .min(24);
        // label, gaps, "100.0%", value
        let bar_width = width.saturating_sub(label_width + 20).max(1);

        self.chart
            .shares()
            .into_iter()
            .zip(&self.chart.data)
            .enumerate()
            .map(|(i, ((label, pct), datum))| {
                let color = SLICE_COLORS[i % SLICE_COLORS.len()];
                let filled = ((pct / 100.0) * bar_width as f64).round() as usize;
                let label: String = label.chars().take(label_width).collect();
                Line::from(vec![
                    Span::raw(format!("{label:label_width$} ")),
                    Span::styled("█".repeat(filled), Style::default().fg(color)),
                    Span::styled(
                        "░".repeat(bar_width - filled.min(bar_width)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!(" {pct:5.1}%"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" ({})", format_value(datum.value)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    }

    fn render_bars(&self, area: Rect, buf: &mut Buffer) {
        let bars: Vec<Bar> = self
            .chart
            .data
            .iter()
            .enumerate()
            .map(|(i, datum)| {
                Bar::default()
                    .value(datum.value.max(0.0).round() as u64)
                    .text_value(format_value(datum.value))
                    .label(Line::from(datum.label.clone()))
                    .style(Style::default().fg(SLICE_COLORS[i % SLICE_COLORS.len()]))
            })
            .collect();

        let count = u16::try_from(bars.len()).unwrap_or(u16::MAX).max(1);
        let inner_width = area.width.saturating_sub(2);
        let gap = if self.chart.kind == ChartKind::Histogram { 0 } else { 1 };
        let bar_width = (inner_width.saturating_sub(gap * count) / count).clamp(1, 16);

        BarChart::default()
            .block(self.block())
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(gap)
            .value_style(Style::default().add_modifier(Modifier::BOLD))
            .render(area, buf);
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.chart.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No data to chart",
                Style::default().fg(Color::DarkGray),
            )))
            .block(self.block())
            .render(area, buf);
            return;
        }

        match self.chart.kind {
            ChartKind::Pie => {
                let mut lines = vec![Line::from(Span::styled(
                    format!("{} by {}", self.chart.value_label, self.chart.category_label),
                    Style::default().fg(Color::DarkGray),
                ))];
                lines.extend(self.pie_lines(area.width.saturating_sub(2) as usize));
                Paragraph::new(lines).block(self.block()).render(area, buf);
            }
            ChartKind::Bar | ChartKind::Histogram => self.render_bars(area, buf),
        }
    }
}
