// src/services/charts.rs
//! Chart-ready views over a yield table: time series per tenor, a single
//! period's yield curve, and the period x tenor grid behind the surface and
//! heatmap.
use crate::models::{
    CurvePoint, PeriodRow, SeriesPoint, TableSummary, TenorSeries, WideYieldTable, YieldCurve,
    YieldGrid,
};
use crate::services::period::derive_period_timestamp;
use crate::services::transform::{chrono_key, slice_by_period, to_tidy};

/// Table rows in period order; rows with unparseable labels go last.
fn chronological_rows(table: &WideYieldTable) -> Vec<&PeriodRow> {
    let mut rows: Vec<_> = table
        .rows
        .iter()
        .map(|r| (derive_period_timestamp(&r.period), r))
        .collect();
    rows.sort_by_key(|(ts, _)| chrono_key(ts));
    rows.into_iter().map(|(_, r)| r).collect()
}

/// Distinct period labels in chronological order.
pub fn periods(table: &WideYieldTable) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in chronological_rows(table) {
        if !out.contains(&row.period) {
            out.push(row.period.clone());
        }
    }
    out
}

pub fn latest_period(table: &WideYieldTable) -> Option<String> {
    periods(table).pop()
}

pub fn time_series(table: &WideYieldTable) -> Vec<TenorSeries> {
    let rows = chronological_rows(table);
    table
        .tenors
        .iter()
        .enumerate()
        .map(|(idx, tenor)| TenorSeries {
            tenor: tenor.clone(),
            points: rows
                .iter()
                .map(|r| SeriesPoint {
                    period: r.period.clone(),
                    yield_pct: r.yields.get(idx).copied().flatten(),
                })
                .collect(),
        })
        .collect()
}

pub fn yield_curve(table: &WideYieldTable, period: &str) -> YieldCurve {
    let points = slice_by_period(&to_tidy(table), period)
        .into_iter()
        .map(|r| CurvePoint {
            tenor: r.tenor,
            yield_pct: r.yield_pct,
        })
        .collect();
    YieldCurve {
        period: period.to_string(),
        points,
    }
}

pub fn yield_grid(table: &WideYieldTable) -> YieldGrid {
    let rows = chronological_rows(table);
    let values: Vec<Vec<Option<f64>>> = rows.iter().map(|r| r.yields.clone()).collect();

    let observed = || values.iter().flatten().filter_map(|v| *v);
    let min_yield = observed().reduce(f64::min);
    let max_yield = observed().reduce(f64::max);

    YieldGrid {
        tenors: table.tenors.clone(),
        periods: rows.iter().map(|r| r.period.clone()).collect(),
        values,
        min_yield,
        max_yield,
    }
}

pub fn summary(table: &WideYieldTable) -> TableSummary {
    let ordered = periods(table);
    let missing_yields = table
        .rows
        .iter()
        .map(|r| r.yields.iter().filter(|v| v.is_none()).count())
        .sum();
    let unparseable_periods = table
        .rows
        .iter()
        .filter(|r| derive_period_timestamp(&r.period).is_none())
        .map(|r| r.period.clone())
        .collect();

    TableSummary {
        period_column: table.period_column.clone(),
        tenors: table.tenors.clone(),
        row_count: table.rows.len(),
        first_period: ordered.first().cloned(),
        last_period: ordered.last().cloned(),
        missing_yields,
        unparseable_periods,
    }
}
