use std::collections::BTreeSet;

use super::model::{Indicator, PerformanceRecord, PerformanceTable};
use crate::error::{DashboardError, Result, SelectionKind};

// ---------------------------------------------------------------------------
// FilterSpec – one user interaction's worth of selections
// ---------------------------------------------------------------------------

/// The conjunction of predicates for one recomputation pass. Built fresh from
/// the widgets on every change and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Narrows the operator choice set; rows are filtered by `operators`.
    pub coordinator: Option<String>,
    pub operators: BTreeSet<String>,
    pub machines: BTreeSet<String>,
    pub indicator: Indicator,
    /// Inclusive `(min, max)` week range.
    pub week_range: (u32, u32),
}

impl FilterSpec {
    pub fn new(indicator: Indicator, week_range: (u32, u32)) -> Self {
        FilterSpec {
            coordinator: None,
            operators: BTreeSet::new(),
            machines: BTreeSet::new(),
            indicator,
            week_range,
        }
    }

    pub fn with_coordinator(mut self, coordinator: Option<String>) -> Self {
        self.coordinator = coordinator;
        self
    }

    pub fn with_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operators = operators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_machines<I, S>(mut self, machines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.machines = machines.into_iter().map(Into::into).collect();
        self
    }

    /// Default selection for a freshly loaded table: the first `preselect`
    /// operators and machines, the first indicator present, every week.
    pub fn initial(table: &PerformanceTable, preselect: usize) -> Self {
        let indicator = table
            .indicators()
            .first()
            .copied()
            .unwrap_or(Indicator::Mtbf);
        let weeks = table.week_bounds().unwrap_or((1, 1));
        FilterSpec::new(indicator, weeks)
            .with_operators(table.operators(None).into_iter().take(preselect))
            .with_machines(table.machines().into_iter().take(preselect))
    }

    /// The operators selectable under the chosen coordinator.
    pub fn operator_choices(&self, table: &PerformanceTable) -> Vec<String> {
        table.operators(self.coordinator.as_deref())
    }

    /// Whether a single row satisfies every predicate.
    pub fn matches(&self, record: &PerformanceRecord) -> bool {
        let (week_min, week_max) = self.week_range;
        self.operators.contains(&record.operator)
            && self.machines.contains(&record.machine)
            && record.indicator == self.indicator
            && (week_min..=week_max).contains(&record.week)
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of a table that passed a [`FilterSpec`], in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub table: &'a PerformanceTable,
    pub indices: Vec<usize>,
    pub indicator: Indicator,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a PerformanceRecord> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.records[i])
    }
}

/// Return indices of rows that pass the filter. Pure: the same table and
/// spec always give the same indices. No match gives an empty vector.
pub fn filtered_indices(table: &PerformanceTable, spec: &FilterSpec) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| spec.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Apply the filter without judging the outcome.
pub fn apply<'a>(table: &'a PerformanceTable, spec: &FilterSpec) -> FilteredView<'a> {
    FilteredView {
        table,
        indices: filtered_indices(table, spec),
        indicator: spec.indicator,
    }
}

/// Apply the filter and classify the outcome the way the dashboard reports
/// it: an empty operator or machine selection is
/// [`DashboardError::EmptySelection`], a valid selection matching nothing is
/// [`DashboardError::NoData`].
pub fn select<'a>(table: &'a PerformanceTable, spec: &FilterSpec) -> Result<FilteredView<'a>> {
    if spec.operators.is_empty() {
        return Err(DashboardError::EmptySelection(SelectionKind::Operators));
    }
    if spec.machines.is_empty() {
        return Err(DashboardError::EmptySelection(SelectionKind::Machines));
    }
    let view = apply(table, spec);
    if view.is_empty() {
        return Err(DashboardError::NoData);
    }
    log::debug!("Filter kept {} of {} rows", view.len(), table.len());
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    fn table() -> PerformanceTable {
        PerformanceTable::from_records(vec![
            record("LC1", "Ana", "M1", Indicator::Updt, 3, 5.0),
            record("LC1", "Ana", "M2", Indicator::Updt, 4, 6.0),
            record("LC1", "Bruno", "M1", Indicator::Updt, 5, 3.0),
            record("LC2", "Carla", "M1", Indicator::Updt, 3, 2.0),
            record("LC1", "Ana", "M1", Indicator::Mtbf, 3, 90.0),
        ])
    }

    #[test]
    fn keeps_rows_matching_every_predicate() {
        let table = table();
        let spec = FilterSpec::new(Indicator::Updt, (3, 4))
            .with_operators(["Ana", "Carla"])
            .with_machines(["M1"]);
        assert_eq!(filtered_indices(&table, &spec), vec![0, 3]);
    }

    #[test]
    fn week_range_is_inclusive() {
        let table = table();
        let spec = FilterSpec::new(Indicator::Updt, (5, 5))
            .with_operators(["Bruno"])
            .with_machines(["M1"]);
        assert_eq!(filtered_indices(&table, &spec), vec![2]);
    }

    #[test]
    fn zero_matches_is_an_empty_view_not_an_error() {
        let table = table();
        let spec = FilterSpec::new(Indicator::RejectRate, (1, 52))
            .with_operators(["Ana"])
            .with_machines(["M1"]);
        assert!(apply(&table, &spec).is_empty());
        assert!(matches!(select(&table, &spec), Err(DashboardError::NoData)));
    }

    #[test]
    fn empty_selections_are_reported_before_filtering() {
        let table = table();
        let no_ops = FilterSpec::new(Indicator::Updt, (1, 52)).with_machines(["M1"]);
        let no_machines = FilterSpec::new(Indicator::Updt, (1, 52)).with_operators(["Ana"]);
        assert!(matches!(
            select(&table, &no_ops),
            Err(DashboardError::EmptySelection(SelectionKind::Operators))
        ));
        assert!(matches!(
            select(&table, &no_machines),
            Err(DashboardError::EmptySelection(SelectionKind::Machines))
        ));
    }

    #[test]
    fn coordinator_only_narrows_operator_choices() {
        let table = table();
        let spec = FilterSpec::new(Indicator::Updt, (1, 52))
            .with_coordinator(Some("LC2".into()))
            .with_operators(["Ana"])
            .with_machines(["M1"]);
        assert_eq!(spec.operator_choices(&table), vec!["Carla"]);
        // Rows are still selected by operator.
        assert_eq!(filtered_indices(&table, &spec), vec![0]);
    }

    #[test]
    fn filtering_twice_gives_identical_views() {
        let table = table();
        let spec = FilterSpec::initial(&table, 2);
        assert_eq!(apply(&table, &spec).indices, apply(&table, &spec).indices);
    }

    #[test]
    fn initial_spec_preselects_leading_choices() {
        let table = table();
        let spec = FilterSpec::initial(&table, 2);
        assert_eq!(spec.indicator, Indicator::Mtbf);
        assert_eq!(spec.week_range, (3, 5));
        assert_eq!(spec.operators.iter().collect::<Vec<_>>(), vec!["Ana", "Bruno"]);
        assert_eq!(spec.machines.len(), 2);
    }
}
