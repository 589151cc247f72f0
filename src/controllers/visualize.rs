//! Visualizations page: four canned charts.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::chart::{ChartData, ChartKind, DataFrame};
use crate::db::DatabaseClient;
use crate::error::{DashError, Result};
use crate::query::QueryExecutor;
use crate::sql::Statement;

pub const TITLE: &str = "Visualizations";

pub const INTRO: &str = "Generate visual insights from the database.";

/// The charts the page offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chart {
    #[default]
    PatientDemographics,
    AdmissionTypes,
    BillingAmounts,
    TreatmentResults,
}

impl Chart {
    pub const ALL: [Chart; 4] = [
        Chart::PatientDemographics,
        Chart::AdmissionTypes,
        Chart::BillingAmounts,
        Chart::TreatmentResults,
    ];

    /// Name shown in the chart select box.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PatientDemographics => "Patient Demographics",
            Self::AdmissionTypes => "Admission Types",
            Self::BillingAmounts => "Billing Amounts",
            Self::TreatmentResults => "Treatment Results",
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Self::PatientDemographics => {
                "SELECT gender, COUNT(*) AS count FROM patient GROUP BY gender;"
            }
            Self::AdmissionTypes => {
                "SELECT admission_type, COUNT(*) AS count FROM visits GROUP BY admission_type;"
            }
            Self::BillingAmounts => "SELECT billing_amount FROM visits;",
            Self::TreatmentResults => {
                "SELECT medical_condition, COUNT(*) AS count FROM treatment GROUP BY medical_condition;"
            }
        }
    }

    /// Column labels of the frame, in query column order.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::PatientDemographics => &["Gender", "Count"],
            Self::AdmissionTypes => &["Admission Type", "Count"],
            Self::BillingAmounts => &["Billing Amount"],
            Self::TreatmentResults => &["Medical Condition", "Count"],
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            Self::PatientDemographics | Self::TreatmentResults => ChartKind::Pie,
            Self::AdmissionTypes => ChartKind::Bar,
            Self::BillingAmounts => ChartKind::Histogram,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::PatientDemographics => "Gender Distribution",
            Self::AdmissionTypes => "Admission Types",
            Self::BillingAmounts => "Billing Amount Distribution",
            Self::TreatmentResults => "Treatment Results",
        }
    }

    /// Builds the chart from a frame labelled with [`Chart::labels`].
    pub fn build(&self, frame: &DataFrame) -> Result<ChartData> {
        match self.labels() {
            [column] => ChartData::histogram(self.title(), frame, column),
            [names, values] => ChartData::categories(self.title(), self.kind(), frame, names, values),
            _ => Err(DashError::internal(format!(
                "Chart {} has no layout",
                self.label()
            ))),
        }
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Chart {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|chart| chart.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DashError::input(format!("Unknown visualization: {s}")))
    }
}

/// Runs the chart's query and builds the chart from its rows.
pub async fn generate(db: &dyn DatabaseClient, chart: Chart) -> Result<ChartData> {
    let output = QueryExecutor::new(db).run(&Statement::new(chart.sql())).await?;
    let result = match output.rows() {
        Some(result) => result.clone(),
        None => {
            return Err(DashError::internal(format!(
                "Query for {} returned no rows",
                chart.label()
            )))
        }
    };
    debug!("{} query returned {} rows", chart.label(), result.row_count);

    let frame = DataFrame::new(chart.labels(), result)?;
    chart.build(&frame)
}
