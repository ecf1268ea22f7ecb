use std::collections::{BTreeMap, BTreeSet};

use super::filter::FilteredView;
use super::model::Polarity;
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Headline figures over every filtered row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineMetrics {
    pub count: usize,
    pub distinct_weeks: usize,
    pub mean: f64,
    /// Minimum for lower-is-better indicators, maximum otherwise.
    pub best: f64,
}

/// One `(coordinator, operator, machine)` group, statistics rounded to two
/// decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSummaryRow {
    pub rank: usize,
    pub coordinator: String,
    pub operator: String,
    pub machine: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorRollup {
    pub coordinator: String,
    pub mean: f64,
    pub stddev: f64,
    pub distinct_operators: usize,
    pub rows: usize,
}

/// Weekly points of one operator on one machine, sorted by week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySeries {
    pub operator: String,
    pub machine: String,
    pub points: Vec<(u32, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub headline: HeadlineMetrics,
    pub ranked: Vec<RankedSummaryRow>,
    pub rollup: Vec<CoordinatorRollup>,
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

/// Round to two decimals, halves away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1). A single value has deviation 0.
fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Headline metrics, ranking and coordinator rollup in one pass.
///
/// An empty view is a precondition violation reported as
/// [`DashboardError::NoData`]; [`super::filter::select`] catches it first.
pub fn summarize(view: &FilteredView<'_>) -> Result<Summary> {
    if view.is_empty() {
        return Err(DashboardError::NoData);
    }
    Ok(Summary {
        headline: headline(view),
        ranked: rank_groups(view),
        rollup: coordinator_rollup(view),
    })
}

fn headline(view: &FilteredView<'_>) -> HeadlineMetrics {
    let values: Vec<f64> = view.records().map(|r| r.value).collect();
    let weeks: BTreeSet<u32> = view.records().map(|r| r.week).collect();
    let best = match view.indicator.polarity() {
        Polarity::LowerIsBetter => min_of(&values),
        Polarity::HigherIsBetter => max_of(&values),
    };
    HeadlineMetrics {
        count: values.len(),
        distinct_weeks: weeks.len(),
        mean: mean(&values),
        best,
    }
}

/// Group by `(coordinator, operator, machine)` and rank best-first.
///
/// Groups start in key order. The sort is stable on the rounded mean, so
/// groups with equal rounded means keep key order and identical input always
/// exports identically. Rank 1 is the best group under the indicator's
/// polarity.
pub fn rank_groups(view: &FilteredView<'_>) -> Vec<RankedSummaryRow> {
    let mut groups: BTreeMap<(&str, &str, &str), Vec<f64>> = BTreeMap::new();
    for r in view.records() {
        groups
            .entry((r.coordinator.as_str(), r.operator.as_str(), r.machine.as_str()))
            .or_default()
            .push(r.value);
    }

    let mut rows: Vec<RankedSummaryRow> = groups
        .into_iter()
        .map(|((coordinator, operator, machine), values)| RankedSummaryRow {
            rank: 0,
            coordinator: coordinator.to_string(),
            operator: operator.to_string(),
            machine: machine.to_string(),
            mean: round2(mean(&values)),
            min: round2(min_of(&values)),
            max: round2(max_of(&values)),
            stddev: round2(sample_stddev(&values)),
            count: values.len(),
        })
        .collect();

    match view.indicator.polarity() {
        Polarity::LowerIsBetter => rows.sort_by(|a, b| a.mean.total_cmp(&b.mean)),
        Polarity::HigherIsBetter => rows.sort_by(|a, b| b.mean.total_cmp(&a.mean)),
    }
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

/// Per-coordinator mean, spread, operator count and row count, sorted by
/// coordinator.
pub fn coordinator_rollup(view: &FilteredView<'_>) -> Vec<CoordinatorRollup> {
    let mut by_coord: BTreeMap<&str, (Vec<f64>, BTreeSet<&str>)> = BTreeMap::new();
    for r in view.records() {
        let (values, operators) = by_coord.entry(r.coordinator.as_str()).or_default();
        values.push(r.value);
        operators.insert(r.operator.as_str());
    }

    by_coord
        .into_iter()
        .map(|(coordinator, (values, operators))| CoordinatorRollup {
            coordinator: coordinator.to_string(),
            mean: mean(&values),
            stddev: sample_stddev(&values),
            distinct_operators: operators.len(),
            rows: values.len(),
        })
        .collect()
}

/// One series per `(operator, machine)` pair present in the view.
pub fn weekly_series(view: &FilteredView<'_>) -> Vec<WeeklySeries> {
    let mut by_pair: BTreeMap<(&str, &str), Vec<(u32, f64)>> = BTreeMap::new();
    for r in view.records() {
        by_pair
            .entry((r.operator.as_str(), r.machine.as_str()))
            .or_default()
            .push((r.week, r.value));
    }

    by_pair
        .into_iter()
        .map(|((operator, machine), mut points)| {
            points.sort_by_key(|&(week, _)| week);
            WeeklySeries {
                operator: operator.to_string(),
                machine: machine.to_string(),
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterSpec};
    use crate::data::model::fixtures::record;
    use crate::data::model::{Indicator, PerformanceTable};

    fn view_all(table: &PerformanceTable, indicator: Indicator) -> FilteredView<'_> {
        let spec = FilterSpec::new(indicator, (1, 52))
            .with_operators(table.operators(None))
            .with_machines(table.machines());
        apply(table, &spec)
    }

    fn two_operator_table(indicator: Indicator) -> PerformanceTable {
        PerformanceTable::from_records(vec![
            record("LC1", "Ana", "M1", indicator, 1, 4.0),
            record("LC1", "Ana", "M1", indicator, 2, 5.0),
            record("LC1", "Ana", "M1", indicator, 3, 6.0),
            record("LC1", "Bruno", "M1", indicator, 1, 2.0),
            record("LC1", "Bruno", "M1", indicator, 2, 3.0),
            record("LC1", "Bruno", "M1", indicator, 3, 4.0),
        ])
    }

    #[test]
    fn lower_is_better_ranks_smallest_mean_first() {
        let table = two_operator_table(Indicator::Updt);
        let summary = summarize(&view_all(&table, Indicator::Updt)).unwrap();

        assert_eq!(summary.ranked[0].operator, "Bruno");
        assert_eq!(summary.ranked[0].mean, 3.0);
        assert_eq!(summary.ranked[0].rank, 1);
        assert_eq!(summary.ranked[1].operator, "Ana");
        assert_eq!(summary.ranked[1].mean, 5.0);
        assert_eq!(summary.ranked[1].rank, 2);
        assert_eq!(summary.headline.best, 2.0);
    }

    #[test]
    fn higher_is_better_ranks_largest_mean_first() {
        let table = two_operator_table(Indicator::Mtbf);
        let summary = summarize(&view_all(&table, Indicator::Mtbf)).unwrap();

        assert_eq!(summary.ranked[0].operator, "Ana");
        assert_eq!(summary.headline.best, 6.0);
    }

    #[test]
    fn group_statistics_are_rounded_sample_statistics() {
        let table = two_operator_table(Indicator::Updt);
        let ranked = rank_groups(&view_all(&table, Indicator::Updt));
        let ana = ranked.iter().find(|r| r.operator == "Ana").unwrap();

        assert_eq!((ana.min, ana.max, ana.count), (4.0, 6.0, 3));
        assert_eq!(ana.stddev, 1.0);
    }

    #[test]
    fn single_row_group_has_zero_stddev() {
        let table = PerformanceTable::from_records(vec![record("LC1", "Ana", "M1", Indicator::Updt, 3, 7.25)]);
        let ranked = rank_groups(&view_all(&table, Indicator::Updt));
        assert_eq!(ranked[0].stddev, 0.0);
        assert!(!ranked[0].stddev.is_nan());
    }

    #[test]
    fn ties_keep_grouping_order() {
        let table = PerformanceTable::from_records(vec![
            record("LC2", "Zoe", "M1", Indicator::Updt, 1, 2.0),
            record("LC1", "Bruno", "M1", Indicator::Updt, 1, 2.0),
            record("LC1", "Ana", "M2", Indicator::Updt, 1, 2.004),
        ]);
        let ranked = rank_groups(&view_all(&table, Indicator::Updt));
        let order: Vec<&str> = ranked.iter().map(|r| r.operator.as_str()).collect();
        assert_eq!(order, vec!["Ana", "Bruno", "Zoe"]);
    }

    #[test]
    fn headline_counts_rows_and_weeks() {
        let table = two_operator_table(Indicator::Updt);
        let headline = summarize(&view_all(&table, Indicator::Updt)).unwrap().headline;
        assert_eq!(headline.count, 6);
        assert_eq!(headline.distinct_weeks, 3);
        assert_eq!(headline.mean, 4.0);
    }

    #[test]
    fn rollup_counts_operators_per_coordinator() {
        let table = PerformanceTable::from_records(vec![
            record("LC2", "Zoe", "M1", Indicator::Updt, 1, 1.0),
            record("LC1", "Ana", "M1", Indicator::Updt, 1, 2.0),
            record("LC1", "Ana", "M2", Indicator::Updt, 2, 4.0),
            record("LC1", "Bruno", "M1", Indicator::Updt, 1, 6.0),
        ]);
        let rollup = coordinator_rollup(&view_all(&table, Indicator::Updt));

        assert_eq!(rollup.len(), 2);
        assert_eq!(rollup[0].coordinator, "LC1");
        assert_eq!(rollup[0].mean, 4.0);
        assert_eq!(rollup[0].distinct_operators, 2);
        assert_eq!(rollup[0].rows, 3);
        assert_eq!(rollup[1].stddev, 0.0);
    }

    #[test]
    fn weekly_series_are_sorted_by_week() {
        let table = PerformanceTable::from_records(vec![
            record("LC1", "Ana", "M1", Indicator::Updt, 5, 1.0),
            record("LC1", "Ana", "M1", Indicator::Updt, 3, 2.0),
            record("LC1", "Ana", "M2", Indicator::Updt, 4, 3.0),
        ]);
        let series = weekly_series(&view_all(&table, Indicator::Updt));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].points, vec![(3, 2.0), (5, 1.0)]);
        assert_eq!(series[1].machine, "M2");
    }

    #[test]
    fn empty_view_is_rejected() {
        let table = two_operator_table(Indicator::Updt);
        let view = view_all(&table, Indicator::RejectRate);
        assert!(matches!(summarize(&view), Err(DashboardError::NoData)));
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(0.125), 0.13);
    }
}
