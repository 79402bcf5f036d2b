// src/models.rs
use serde::{Serialize, Deserialize};
use chrono::NaiveDate;

/// Parsed period date (first day of the month). `None` when the label
/// could not be parsed; such rows stay usable but sort last.
pub type PeriodTimestamp = Option<NaiveDate>;

/// Canonical left-to-right order of T-bill tenors on any tenor axis.
pub const TENOR_ORDER: [&str; 14] = [
    "7 Day", "14 Day", "1 Month", "2 Month", "3 Month", "4 Month", "5 Month",
    "6 Month", "7 Month", "8 Month", "9 Month", "10 Month", "11 Month", "12 Month",
];

/// Position of a tenor in `TENOR_ORDER`, if it is a canonical tenor.
pub fn tenor_rank(tenor: &str) -> Option<usize> {
    TENOR_ORDER.iter().position(|t| *t == tenor)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub period: String,
    pub yields: Vec<Option<f64>>,
}

/// One row per period, one column per tenor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WideYieldTable {
    pub period_column: String,
    pub tenors: Vec<String>,
    pub rows: Vec<PeriodRow>,
}

impl WideYieldTable {
    pub fn new(period_column: impl Into<String>, tenors: Vec<String>) -> Self {
        WideYieldTable {
            period_column: period_column.into(),
            tenors,
            rows: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        WideYieldTable::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row, padding or truncating its cells to the tenor count.
    pub fn push_row(&mut self, period: impl Into<String>, mut yields: Vec<Option<f64>>) {
        yields.resize(self.tenors.len(), None);
        self.rows.push(PeriodRow {
            period: period.into(),
            yields,
        });
    }

    pub fn tenor_index(&self, tenor: &str) -> Option<usize> {
        self.tenors.iter().position(|t| t == tenor)
    }

    pub fn value(&self, period: &str, tenor: &str) -> Option<f64> {
        let idx = self.tenor_index(tenor)?;
        self.rows
            .iter()
            .find(|r| r.period == period)
            .and_then(|r| r.yields.get(idx).copied().flatten())
    }
}

/// Long-form (period, tenor, yield) observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyYieldRow {
    pub period: String,
    pub timestamp: PeriodTimestamp,
    pub tenor: String,
    #[serde(rename = "yield")]
    pub yield_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: String,
    #[serde(rename = "yield")]
    pub yield_pct: Option<f64>,
}

/// Yields of one tenor over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenorSeries {
    pub tenor: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub tenor: String,
    #[serde(rename = "yield")]
    pub yield_pct: Option<f64>,
}

/// Yield curve snapshot for a single period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldCurve {
    pub period: String,
    pub points: Vec<CurvePoint>,
}

/// Period x tenor matrix behind the surface and heatmap views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldGrid {
    pub tenors: Vec<String>,
    pub periods: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
    pub min_yield: Option<f64>,
    pub max_yield: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub period_column: String,
    pub tenors: Vec<String>,
    pub row_count: usize,
    pub first_period: Option<String>,
    pub last_period: Option<String>,
    pub missing_yields: usize,
    pub unparseable_periods: Vec<String>,
}
