// src/services/transform.rs
use std::collections::HashMap;

use crate::models::{tenor_rank, PeriodTimestamp, TidyYieldRow, WideYieldTable};
use crate::services::period::derive_period_timestamp;

/// Melts the wide table into one row per (period, tenor). Missing yields are
/// kept so the result is always rows x tenors long.
pub fn to_tidy(wide: &WideYieldTable) -> Vec<TidyYieldRow> {
    let mut out = Vec::with_capacity(wide.rows.len() * wide.tenors.len());
    for row in &wide.rows {
        let timestamp = derive_period_timestamp(&row.period);
        for (idx, tenor) in wide.tenors.iter().enumerate() {
            out.push(TidyYieldRow {
                period: row.period.clone(),
                timestamp,
                tenor: tenor.clone(),
                yield_pct: row.yields.get(idx).copied().flatten(),
            });
        }
    }
    out
}

/// Sort key for period dates: dated periods ascending, undated ones last.
pub(crate) fn chrono_key(ts: &PeriodTimestamp) -> (bool, PeriodTimestamp) {
    (ts.is_none(), *ts)
}

/// Stable ascending sort by period date. Rows without a date go last in
/// their input order.
pub fn chronological(rows: &[TidyYieldRow]) -> Vec<TidyYieldRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|r| chrono_key(&r.timestamp));
    sorted
}

/// Stable sort by canonical tenor position. Tenors outside the canonical
/// list follow all canonical ones in input order.
pub fn by_tenor_order(rows: &[TidyYieldRow]) -> Vec<TidyYieldRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|r| tenor_rank(&r.tenor).unwrap_or(usize::MAX));
    sorted
}

pub fn slice_by_period(rows: &[TidyYieldRow], period: &str) -> Vec<TidyYieldRow> {
    let matching: Vec<TidyYieldRow> = rows
        .iter()
        .filter(|r| r.period == period)
        .cloned()
        .collect();
    by_tenor_order(&matching)
}

/// Re-pivots tidy rows into a wide table. Periods and tenors keep the order
/// in which they first appear.
pub fn pivot(rows: &[TidyYieldRow], period_column: &str) -> WideYieldTable {
    let mut tenors: Vec<String> = Vec::new();
    let mut periods: Vec<String> = Vec::new();
    let mut cells: HashMap<(&str, &str), Option<f64>> = HashMap::new();

    for r in rows {
        if !tenors.contains(&r.tenor) {
            tenors.push(r.tenor.clone());
        }
        if !periods.contains(&r.period) {
            periods.push(r.period.clone());
        }
        cells.insert((r.period.as_str(), r.tenor.as_str()), r.yield_pct);
    }

    let mut wide = WideYieldTable::new(period_column, tenors.clone());
    for period in &periods {
        let yields = tenors
            .iter()
            .map(|t| cells.get(&(period.as_str(), t.as_str())).copied().flatten())
            .collect();
        wide.push_row(period.clone(), yields);
    }
    wide
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TENOR_ORDER;

    fn sample_table() -> WideYieldTable {
        let mut wide = WideYieldTable::new(
            "Period",
            vec!["3 Month".to_string(), "6 Month".to_string()],
        );
        wide.push_row("Jan 24", vec![Some(6.8), Some(6.9)]);
        wide.push_row("Feb 24", vec![Some(6.7), Some(6.85)]);
        wide
    }

    fn row(period: &str, tenor: &str, y: f64) -> TidyYieldRow {
        TidyYieldRow {
            period: period.to_string(),
            timestamp: derive_period_timestamp(period),
            tenor: tenor.to_string(),
            yield_pct: Some(y),
        }
    }

    #[test]
    fn tidy_is_full_cross_product() {
        let mut wide = sample_table();
        wide.push_row("Mar 24", vec![None, None]);
        let tidy = to_tidy(&wide);
        assert_eq!(tidy.len(), 3 * 2);
        assert_eq!(tidy.iter().filter(|r| r.yield_pct.is_none()).count(), 2);
    }

    #[test]
    fn tidy_of_empty_table_is_empty() {
        assert!(to_tidy(&WideYieldTable::empty()).is_empty());
    }

    #[test]
    fn slice_returns_curve_in_tenor_order() {
        let mut wide = WideYieldTable::new(
            "Period",
            vec!["6 Month".to_string(), "3 Month".to_string()],
        );
        wide.push_row("Jan 24", vec![Some(6.9), Some(6.8)]);
        wide.push_row("Feb 24", vec![Some(6.85), Some(6.7)]);

        let slice = slice_by_period(&to_tidy(&wide), "Feb 24");
        let curve: Vec<(&str, Option<f64>)> = slice
            .iter()
            .map(|r| (r.tenor.as_str(), r.yield_pct))
            .collect();
        assert_eq!(curve, vec![("3 Month", Some(6.7)), ("6 Month", Some(6.85))]);
    }

    #[test]
    fn slice_of_unknown_period_is_empty() {
        let tidy = to_tidy(&sample_table());
        assert!(slice_by_period(&tidy, "Dec 99").is_empty());
        assert!(slice_by_period(&[], "Jan 24").is_empty());
    }

    #[test]
    fn chronological_sorts_dates_and_puts_unparseable_last() {
        let rows = vec![
            row("Qtr1", "3 Month", 1.0),
            row("Mar 24", "3 Month", 2.0),
            row("Jan 24", "3 Month", 3.0),
            row("Bogus", "3 Month", 4.0),
            row("Dec 23", "3 Month", 5.0),
        ];
        let sorted = chronological(&rows);
        let periods: Vec<&str> = sorted.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["Dec 23", "Jan 24", "Mar 24", "Qtr1", "Bogus"]);
        assert_eq!(chronological(&sorted), sorted);
        assert_eq!(chronological(&rows), sorted);
    }

    #[test]
    fn chronological_is_stable_within_a_period() {
        let rows = vec![
            row("Feb 24", "6 Month", 1.0),
            row("Jan 24", "6 Month", 2.0),
            row("Feb 24", "3 Month", 3.0),
        ];
        let sorted = chronological(&rows);
        let tenors: Vec<&str> = sorted.iter().map(|r| r.tenor.as_str()).collect();
        assert_eq!(tenors, vec!["6 Month", "6 Month", "3 Month"]);
    }

    #[test]
    fn canonical_tenors_precede_unknown_ones() {
        let rows = vec![
            row("Jan 24", "2 Year", 1.0),
            row("Jan 24", "12 Month", 2.0),
            row("Jan 24", "Overnight", 3.0),
            row("Jan 24", "7 Day", 4.0),
            row("Jan 24", "3 Month", 5.0),
        ];
        let sorted = by_tenor_order(&rows);
        let tenors: Vec<&str> = sorted.iter().map(|r| r.tenor.as_str()).collect();
        assert_eq!(
            tenors,
            vec!["7 Day", "3 Month", "12 Month", "2 Year", "Overnight"]
        );

        let ranks: Vec<usize> = sorted
            .iter()
            .filter_map(|r| TENOR_ORDER.iter().position(|t| *t == r.tenor))
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn melt_then_pivot_recovers_values() {
        let mut wide = sample_table();
        wide.push_row("Mar 24", vec![None, Some(7.01)]);
        let back = pivot(&to_tidy(&wide), "Period");
        assert_eq!(back, wide);
        assert_eq!(back.value("Feb 24", "6 Month"), Some(6.85));
    }

    #[test]
    fn pivot_after_chronological_reorders_periods() {
        let mut wide = sample_table();
        wide.push_row("Dec 23", vec![Some(6.95), Some(7.0)]);
        let back = pivot(&chronological(&to_tidy(&wide)), "Period");
        let periods: Vec<&str> = back.rows.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["Dec 23", "Jan 24", "Feb 24"]);
        assert_eq!(back.value("Dec 23", "3 Month"), Some(6.95));
    }

    mod property_tests {
        use crate::models::{tenor_rank, TidyYieldRow, WideYieldTable};
        use crate::services::transform::{
            by_tenor_order, chrono_key, chronological, pivot, slice_by_period, to_tidy,
        };
        use proptest::prelude::*;

        fn tenor_pool() -> Vec<String> {
            ["7 Day", "14 Day", "1 Month", "3 Month", "6 Month", "12 Month",
             "91 Day", "182 Day", "364 Day", "2 Year", "Overnight"]
                .iter()
                .map(|t| t.to_string())
                .collect()
        }

        // Parseable and unparseable labels, all distinct.
        fn label_pool() -> Vec<String> {
            ["Jan 24", "Feb 24", "Mar 24", "Dec 23", "Jun 22", "March 2023",
             "Sept 2021", "2024-05", "Qtr1", "Bogus", "Junk 24", ""]
                .iter()
                .map(|l| l.to_string())
                .collect()
        }

        fn wide_strategy() -> impl Strategy<Value = WideYieldTable> {
            let tenors = prop::sample::subsequence(tenor_pool(), 0..=11).prop_shuffle();
            let labels = prop::sample::subsequence(label_pool(), 0..=12).prop_shuffle();
            (tenors, labels)
                .prop_flat_map(|(tenors, labels)| {
                    let cells = prop::collection::vec(
                        prop::collection::vec(prop::option::of(0.0f64..15.0), tenors.len()),
                        labels.len(),
                    );
                    (Just(tenors), Just(labels), cells)
                })
                .prop_map(|(tenors, labels, cells)| {
                    let mut wide = WideYieldTable::new("Period", tenors);
                    for (label, yields) in labels.into_iter().zip(cells) {
                        wide.push_row(label, yields);
                    }
                    wide
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn tidy_len_is_rows_times_tenors(wide in wide_strategy()) {
                prop_assert_eq!(to_tidy(&wide).len(), wide.rows.len() * wide.tenors.len());
            }

            #[test]
            fn chronological_is_idempotent_and_ordered(wide in wide_strategy()) {
                let once = chronological(&to_tidy(&wide));
                prop_assert_eq!(&chronological(&once), &once);

                // Dated rows ascend; undated rows trail.
                let keys: Vec<_> = once.iter().map(|r| chrono_key(&r.timestamp)).collect();
                prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
            }

            #[test]
            fn canonical_tenors_come_first_in_order(wide in wide_strategy()) {
                let tidy = to_tidy(&wide);
                let sorted = by_tenor_order(&tidy);
                prop_assert_eq!(sorted.len(), tidy.len());

                let ranks: Vec<Option<usize>> = sorted.iter().map(|r| tenor_rank(&r.tenor)).collect();
                let split = ranks.iter().position(|r| r.is_none()).unwrap_or(ranks.len());
                prop_assert!(ranks[split..].iter().all(|r| r.is_none()));
                prop_assert!(ranks[..split].windows(2).all(|w| w[0] <= w[1]));

                let unknown_in: Vec<&TidyYieldRow> =
                    tidy.iter().filter(|r| tenor_rank(&r.tenor).is_none()).collect();
                let unknown_out: Vec<&TidyYieldRow> = sorted[split..].iter().collect();
                prop_assert_eq!(unknown_in, unknown_out);
            }

            #[test]
            fn slice_holds_only_the_requested_period(wide in wide_strategy()) {
                let tidy = to_tidy(&wide);
                for row in &wide.rows {
                    let slice = slice_by_period(&tidy, &row.period);
                    prop_assert_eq!(slice.len(), wide.tenors.len());
                    prop_assert!(slice.iter().all(|r| r.period == row.period));
                }
                prop_assert!(slice_by_period(&tidy, "Never").is_empty());
            }

            #[test]
            fn melt_then_pivot_round_trips(wide in wide_strategy()) {
                prop_assume!(!wide.rows.is_empty() && !wide.tenors.is_empty());
                prop_assert_eq!(pivot(&to_tidy(&wide), "Period"), wide);
            }
        }
    }
}
