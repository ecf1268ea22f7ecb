use chrono::NaiveDate;

use super::filter::FilteredView;
use super::model::{
    Indicator, PerformanceRecord, PerformanceTable, COL_COORDINATOR, COL_INDICATOR, COL_MACHINE,
    COL_OPERATOR, COL_PERIOD_END, COL_PERIOD_START, COL_VALUE, COL_WEEK,
};
use super::summary::RankedSummaryRow;
use crate::error::Result;

/// Column names of the ranked summary export. Downstream consumers parse
/// these; keep names and order.
pub const SUMMARY_HEADER: [&str; 9] = [
    "Ranking",
    "Coordinador",
    "Operador",
    "Maquina",
    "Promedio",
    "Mínimo",
    "Máximo",
    "Desv. Est.",
    "Weeks",
];

/// Render a float the way pandas writes it: integral values keep one
/// decimal (`5.0`), everything else uses the shortest exact form.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn cell_value(table: &PerformanceTable, record: &PerformanceRecord, column: &str) -> String {
    match column {
        COL_COORDINATOR => record.coordinator.clone(),
        COL_OPERATOR => record.operator.clone(),
        COL_MACHINE => record.machine.clone(),
        COL_INDICATOR => record.indicator.code().to_string(),
        COL_WEEK => record.week.to_string(),
        COL_VALUE => format_float(record.value),
        COL_PERIOD_START => record.period_start.format("%Y-%m-%d").to_string(),
        COL_PERIOD_END => record.period_end.format("%Y-%m-%d").to_string(),
        extra => table
            .extra_columns
            .iter()
            .position(|c| c == extra)
            .and_then(|i| record.extras.get(i))
            .cloned()
            .unwrap_or_default(),
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// The filtered rows with every source column, in source column order.
pub fn filtered_csv(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let table = view.table;
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for record in view.records() {
        writer.write_record(table.columns.iter().map(|c| cell_value(table, record, c)))?;
    }
    finish(writer)
}

/// The ranked summary table with [`SUMMARY_HEADER`] columns.
pub fn summary_csv(rows: &[RankedSummaryRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SUMMARY_HEADER)?;
    for row in rows {
        writer.write_record([
            row.rank.to_string(),
            row.coordinator.clone(),
            row.operator.clone(),
            row.machine.clone(),
            format_float(row.mean),
            format_float(row.min),
            format_float(row.max),
            format_float(row.stddev),
            row.count.to_string(),
        ])?;
    }
    finish(writer)
}

/// Download name such as `resumen_UPDT_20251020.csv`.
pub fn file_name(prefix: &str, indicator: Indicator, date: NaiveDate) -> String {
    format!("{prefix}_{}_{}.csv", indicator.code(), date.format("%Y%m%d"))
}
