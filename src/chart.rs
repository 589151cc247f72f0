//! Chart data built from query results.
//!
//! A [`DataFrame`] pins fixed column labels onto a result set; [`ChartData`]
//! turns a frame into the series a chart widget draws.

use serde::Serialize;

use crate::db::{QueryResult, Row, Value};
use crate::error::{DashError, Result};

/// Histograms never use more bins than this.
pub const MAX_BINS: usize = 20;

/// Rows of a result set under fixed column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl DataFrame {
    /// Labels the columns of `result`.
    ///
    /// Fails when the result does not have exactly one column per label.
    pub fn new(labels: &[&str], result: QueryResult) -> Result<Self> {
        let width = result.columns.len();
        if width != labels.len() {
            return Err(DashError::query(format!(
                "Expected {} columns ({}) but the query returned {}",
                labels.len(),
                labels.join(", "),
                width
            )));
        }
        if let Some(row) = result.rows.iter().find(|row| row.len() != width) {
            return Err(DashError::query(format!(
                "Row has {} values but the frame has {} columns",
                row.len(),
                width
            )));
        }

        Ok(Self {
            columns: labels.iter().map(|l| l.to_string()).collect(),
            rows: result.rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column labelled `label`.
    pub fn column(&self, label: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| DashError::internal(format!("Frame has no column '{label}'")))
    }

    /// Values of one column, top to bottom.
    pub fn values(&self, label: &str) -> Result<impl Iterator<Item = &Value>> {
        let index = self.column(label)?;
        Ok(self.rows.iter().map(move |row| &row[index]))
    }
}

/// How a chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Histogram,
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pie => write!(f, "pie"),
            Self::Bar => write!(f, "bar"),
            Self::Histogram => write!(f, "histogram"),
        }
    }
}

/// One bar, slice or bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datum {
    pub label: String,
    pub value: f64,
}

impl Datum {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A chart ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub kind: ChartKind,
    /// Label of the axis (or legend) the data is grouped by.
    pub category_label: String,
    /// Label of the measured value.
    pub value_label: String,
    pub data: Vec<Datum>,
}

impl ChartData {
    /// One datum per frame row: the `names` column labels it, the `values`
    /// column sizes it.
    pub fn categories(
        title: impl Into<String>,
        kind: ChartKind,
        frame: &DataFrame,
        names: &str,
        values: &str,
    ) -> Result<Self> {
        let name_index = frame.column(names)?;
        let value_index = frame.column(values)?;

        let data = frame
            .rows
            .iter()
            .map(|row| {
                let value = &row[value_index];
                let amount = value.as_f64().ok_or_else(|| {
                    DashError::query(format!(
                        "Column '{values}' has a non-numeric value: {}",
                        value.to_display_string()
                    ))
                })?;
                Ok(Datum::new(row[name_index].to_display_string(), amount))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title: title.into(),
            kind,
            category_label: names.to_string(),
            value_label: values.to_string(),
            data,
        })
    }

    /// Equal-width bins over the numeric values of one column.
    ///
    /// NULL and non-numeric values are skipped.
    pub fn histogram(title: impl Into<String>, frame: &DataFrame, column: &str) -> Result<Self> {
        let values: Vec<f64> = frame.values(column)?.filter_map(Value::as_f64).collect();

        Ok(Self {
            title: title.into(),
            kind: ChartKind::Histogram,
            category_label: column.to_string(),
            value_label: "Count".to_string(),
            data: bin(&values),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.data.iter().map(|d| d.value).sum()
    }

    /// Each datum's share of the total, in percent.
    pub fn shares(&self) -> Vec<(&str, f64)> {
        let total = self.total();
        self.data
            .iter()
            .map(|d| {
                let pct = if total > 0.0 {
                    d.value / total * 100.0
                } else {
                    0.0
                };
                (d.label.as_str(), pct)
            })
            .collect()
    }
}

/// Sturges' rule, capped at [`MAX_BINS`].
pub fn bin_count(samples: usize) -> usize {
    if samples <= 1 {
        return 1;
    }
    let bins = (samples as f64).log2().ceil() as usize + 1;
    bins.clamp(1, MAX_BINS)
}

fn bin(values: &[f64]) -> Vec<Datum> {
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    if min == max {
        return vec![Datum::new(format_edge(min), values.len() as f64)];
    }

    let bins = bin_count(values.len());
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in values {
        let index = ((value - min) / width).floor() as usize;
        counts[index.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let low = min + width * i as f64;
            let high = low + width;
            Datum::new(
                format!("{}-{}", format_edge(low), format_edge(high)),
                count as f64,
            )
        })
        .collect()
}

fn format_edge(edge: f64) -> String {
    if edge.fract() == 0.0 && edge.abs() < 1e15 {
        format!("{}", edge as i64)
    } else {
        format!("{edge:.0}")
    }
}
