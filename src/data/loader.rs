use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::export::format_float;
use super::model::{
    Indicator, PerformanceRecord, PerformanceTable, COL_COORDINATOR, COL_INDICATOR, COL_MACHINE,
    COL_OPERATOR, COL_PERIOD_END, COL_PERIOD_START, COL_VALUE, COL_WEEK, REQUIRED_COLUMNS,
};
use crate::error::{DashboardError, Result};
use crate::survey::{SurveyRecord, SurveyTable, REQUIRED_SURVEY_COLUMNS};

/// Name reported for formats that hold exactly one table.
pub const SINGLE_SHEET: &str = "Única hoja";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the weekly performance dataset. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the required column names
/// * `.json`    – `[{ "Coordinador": "...", "Week": 3, ... }, ...]`
/// * `.parquet` – flat columns; dates as `Date32`, timestamps or text
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – one sheet, first row is the header
///
/// `sheet` selects a spreadsheet sheet by name and is ignored for the
/// single-table formats. Any unparseable cell fails the whole load.
pub fn load_performance(path: &Path, sheet: Option<&str>) -> Result<PerformanceTable> {
    let raw = read_table(path, sheet)?;
    let table = performance_from_raw(raw)?;
    log::info!(
        "Loaded {} performance rows from {} (extra columns: {:?})",
        table.len(),
        path.display(),
        table.extra_columns
    );
    Ok(table)
}

/// Load an open-ended survey export with `ASIGNATURA, PREGUNTA, RESPUESTA`.
pub fn load_survey(path: &Path, sheet: Option<&str>) -> Result<SurveyTable> {
    let raw = read_table(path, sheet)?;
    let table = survey_from_raw(raw)?;
    log::info!("Loaded {} survey responses from {}", table.len(), path.display());
    Ok(table)
}

/// List the sheets a file offers. Single-table formats report one
/// pseudo-sheet named [`SINGLE_SHEET`].
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    match Format::from_path(path)? {
        Format::Spreadsheet => Ok(open_workbook_auto(path)?.sheet_names()),
        _ => Ok(vec![SINGLE_SHEET.to_string()]),
    }
}

// ---------------------------------------------------------------------------
// Raw cells – what every reader produces before typing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl Cell {
    fn text(s: &str) -> Cell {
        if s.is_empty() {
            Cell::Null
        } else {
            Cell::Text(s.to_string())
        }
    }

    fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Integer(i) => i.to_string(),
            Cell::Float(v) => format_float(*v),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Null => String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
    Parquet,
    Spreadsheet,
}

impl Format {
    fn from_path(path: &Path) -> Result<Format> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "parquet" | "pq" => Ok(Format::Parquet),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Format::Spreadsheet),
            other => Err(DashboardError::UnsupportedFormat(other.to_string())),
        }
    }
}

fn read_table(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    match Format::from_path(path)? {
        Format::Csv => read_csv(path),
        Format::Json => read_json(path),
        Format::Parquet => read_parquet(path),
        Format::Spreadsheet => read_spreadsheet(path, sheet),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(Cell::text).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Columns are collected in first-seen order across records.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| DashboardError::JsonShape("expected a top-level array".into()))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DashboardError::JsonShape(format!("row {} is not an object", i + 1)))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(Cell::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::text(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect::<Result<Vec<Cell>>>()?;
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => Cell::text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Cell::text(col.as_string::<i64>().value(row)),
        DataType::Int32 => Cell::Integer(i64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => Cell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Cell::Float(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => Cell::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Bool(col.as_boolean().value(row)),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map_or(Cell::Null, Cell::Date),
        // Timestamps, dictionaries and the rest go through Arrow's formatter.
        _ => Cell::text(&array_value_to_string(col.as_ref(), row)?),
    };
    Ok(cell)
}

// ---------------------------------------------------------------------------
// Spreadsheet reader
// ---------------------------------------------------------------------------

fn read_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let name = choose_sheet(&workbook.sheet_names(), sheet)?;
    log::debug!("Reading sheet '{name}' from {}", path.display());

    let range = workbook.worksheet_range(&name)?;
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| sheet_cell(c).to_text())
            .collect(),
        None => Vec::new(),
    };
    let rows = rows
        .map(|r| r.iter().map(sheet_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

/// The requested sheet, or the first one when none is named.
fn choose_sheet(names: &[String], wanted: Option<&str>) -> Result<String> {
    match wanted {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownSheet(wanted.to_string())),
        None => names
            .first()
            .cloned()
            .ok_or_else(|| DashboardError::UnknownSheet(String::from("<first>"))),
    }
}

fn sheet_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        // Serial day number; the date parser understands it.
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        _ => Cell::Null,
    }
}

// ---------------------------------------------------------------------------
// Schema check and typed conversion
// ---------------------------------------------------------------------------

/// Resolve the index of every required column or report all that are absent.
fn require_columns(headers: &[String], required: &[&str]) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match headers.iter().position(|h| h == name) {
            Some(i) => indices.push(i),
            None => missing.push(name.to_string()),
        }
    }
    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(DashboardError::Schema { missing })
    }
}

/// Borrowed cell plus its location, for error messages.
struct Field<'a> {
    cell: &'a Cell,
    row: usize,
    column: &'a str,
}

impl Field<'_> {
    fn fail(&self, reason: &str) -> DashboardError {
        DashboardError::Parse {
            row: self.row,
            column: self.column.to_string(),
            value: self.cell.to_text(),
            reason: reason.to_string(),
        }
    }

    fn text(&self) -> String {
        self.cell.to_text()
    }

    fn week(&self) -> Result<u32> {
        let week = match self.cell {
            Cell::Integer(i) => Some(*i),
            Cell::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Cell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0)
                        .map(|f| f as i64)
                })
            }
            _ => None,
        };
        let week = week.ok_or_else(|| self.fail("expected an integer week"))?;
        u32::try_from(week)
            .ok()
            .filter(|w| *w >= 1)
            .ok_or_else(|| self.fail("week must be >= 1"))
    }

    fn value(&self) -> Result<f64> {
        let value = match self.cell {
            Cell::Float(f) => Some(*f),
            Cell::Integer(i) => Some(*i as f64),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.fail("expected a finite number"))
    }

    fn date(&self) -> Result<NaiveDate> {
        let date = match self.cell {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_date(s),
            Cell::Float(f) => serial_to_date(*f),
            Cell::Integer(i) => serial_to_date(*i as f64),
            _ => None,
        };
        date.ok_or_else(|| self.fail("expected a calendar date"))
    }

    fn indicator(&self) -> Result<Indicator> {
        self.text().parse::<Indicator>().map_err(|e| self.fail(&e.to_string()))
    }
}

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Spreadsheet serial day number (1900 date system, epoch 1899-12-30).
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(chrono::Duration::days(serial.floor() as i64))
}

fn performance_from_raw(raw: RawTable) -> Result<PerformanceTable> {
    let idx = require_columns(&raw.headers, &REQUIRED_COLUMNS)?;
    let extra_idx: Vec<usize> = (0..raw.headers.len())
        .filter(|i| !idx.contains(i))
        .collect();
    let extra_columns: Vec<String> = extra_idx.iter().map(|&i| raw.headers[i].clone()).collect();

    let null = Cell::Null;
    let mut records = Vec::with_capacity(raw.rows.len());

    for (row_no, row) in raw.rows.iter().enumerate() {
        let field = |pos: usize, column: &'static str| Field {
            cell: row.get(idx[pos]).unwrap_or(&null),
            row: row_no + 1,
            column,
        };

        let period_start = field(6, COL_PERIOD_START).date()?;
        let end_field = field(7, COL_PERIOD_END);
        let period_end = end_field.date()?;
        if period_start > period_end {
            return Err(end_field.fail("period ends before it starts"));
        }

        records.push(PerformanceRecord {
            coordinator: field(0, COL_COORDINATOR).text(),
            operator: field(1, COL_OPERATOR).text(),
            machine: field(2, COL_MACHINE).text(),
            indicator: field(3, COL_INDICATOR).indicator()?,
            week: field(4, COL_WEEK).week()?,
            value: field(5, COL_VALUE).value()?,
            period_start,
            period_end,
            extras: extra_idx
                .iter()
                .map(|&i| row.get(i).unwrap_or(&null).to_text())
                .collect(),
        });
    }

    Ok(PerformanceTable {
        records,
        columns: raw.headers,
        extra_columns,
    })
}

fn survey_from_raw(raw: RawTable) -> Result<SurveyTable> {
    let idx = require_columns(&raw.headers, &REQUIRED_SURVEY_COLUMNS)?;

    let records = raw
        .rows
        .iter()
        .map(|row| {
            let cell = |pos: usize| row.get(idx[pos]).filter(|c| **c != Cell::Null);
            SurveyRecord {
                subject: cell(0).map(Cell::to_text).unwrap_or_default(),
                question: cell(1).map(Cell::to_text).unwrap_or_default(),
                response: cell(2).map(Cell::to_text),
            }
        })
        .collect();

    Ok(SurveyTable { records })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray, TimestampNanosecondArray};
    use arrow::record_batch::RecordBatch;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "Coordinador,Operador,Maquina,Indicador,Week,Valor_Promedio,Fecha_Inicio,Fecha_Fin";

    fn write_file(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_csv_with_passthrough_columns() {
        let file = write_file(
            ".csv",
            "Turnos,Coordinador,Operador,Maquina,Indicador,Week,Valor_Promedio,Fecha_Inicio,Fecha_Fin\n\
             3,LC1,Ana,M1,UPDT,3,4.5,2025-01-13,2025-01-19\n\
             2,LC1,Ana,M1,Reject_Rate,4,0.8,2025-01-20 00:00:00,2025-01-26 00:00:00\n",
        );
        let table = load_performance(file.path(), None).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.extra_columns, vec!["Turnos"]);
        assert_eq!(table.columns[0], "Turnos");
        let first = &table.records[0];
        assert_eq!(first.indicator, Indicator::Updt);
        assert_eq!(first.week, 3);
        assert_eq!(first.value, 4.5);
        assert_eq!(first.period_start, NaiveDate::from_ymd_opt(2025, 1, 13).unwrap());
        assert_eq!(first.extras, vec!["3"]);
        assert_eq!(table.records[1].period_end, NaiveDate::from_ymd_opt(2025, 1, 26).unwrap());
    }

    #[test]
    fn missing_columns_fail_with_schema_error() {
        let file = write_file(".csv", "Coordinador,Operador,Maquina,Indicador\nLC1,Ana,M1,UPDT\n");
        match load_performance(file.path(), None) {
            Err(DashboardError::Schema { missing }) => assert_eq!(
                missing,
                vec!["Week", "Valor_Promedio", "Fecha_Inicio", "Fecha_Fin"]
            ),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_fails_the_whole_load() {
        let file = write_file(
            ".csv",
            &format!("{HEADER}\nLC1,Ana,M1,UPDT,3,4.5,2025-01-13,2025-01-19\nLC1,Ana,M1,UPDT,4,4.5,soon,2025-01-26\n"),
        );
        match load_performance(file.path(), None) {
            Err(DashboardError::Parse { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Fecha_Inicio");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn inverted_period_is_rejected() {
        let file = write_file(
            ".csv",
            &format!("{HEADER}\nLC1,Ana,M1,UPDT,3,4.5,2025-01-19,2025-01-13\n"),
        );
        assert!(matches!(
            load_performance(file.path(), None),
            Err(DashboardError::Parse { .. })
        ));
    }

    #[test]
    fn unknown_indicator_is_a_parse_error() {
        let file = write_file(
            ".csv",
            &format!("{HEADER}\nLC1,Ana,M1,OEE,3,4.5,2025-01-13,2025-01-19\n"),
        );
        assert!(matches!(
            load_performance(file.path(), None),
            Err(DashboardError::Parse { ref column, .. }) if column == "Indicador"
        ));
    }

    #[test]
    fn loads_json_records() {
        let file = write_file(
            ".json",
            r#"[{"Coordinador":"LC1","Operador":"Ana","Maquina":"M1","Indicador":"MTBF",
                 "Week":3.0,"Valor_Promedio":120,"Fecha_Inicio":"2025-01-13","Fecha_Fin":"13/01/2025"}]"#,
        );
        let table = load_performance(file.path(), None).unwrap();
        assert_eq!(table.records[0].week, 3);
        assert_eq!(table.records[0].value, 120.0);
        assert_eq!(table.records[0].period_end, table.records[0].period_start);
    }

    #[test]
    fn loads_survey_and_keeps_missing_responses_absent() {
        let file = write_file(
            ".csv",
            "ASIGNATURA,PREGUNTA,RESPUESTA,Extra\nMate,¿Qué mejorar?,Más ejercicios,x\nMate,¿Qué mejorar?,,y\n",
        );
        let table = load_survey(file.path(), Some("ignored for csv")).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].response.as_deref(), Some("Más ejercicios"));
        assert_eq!(table.records[1].response, None);
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let file = write_file(".txt", "hello");
        assert!(matches!(
            load_performance(file.path(), None),
            Err(DashboardError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn single_table_formats_report_one_sheet() {
        let file = write_file(".csv", HEADER);
        assert_eq!(sheet_names(file.path()).unwrap(), vec![SINGLE_SHEET]);
    }

    #[test]
    fn serial_dates_follow_the_1900_system() {
        assert_eq!(serial_to_date(45663.0), NaiveDate::from_ymd_opt(2025, 1, 6));
        assert_eq!(serial_to_date(0.0), None);
    }

    // -----------------------------------------------------------------------
    // Parquet
    // -----------------------------------------------------------------------

    fn column<A: Array + 'static>(array: A) -> ArrayRef {
        Arc::new(array)
    }

    /// One weekly row with the given period columns and a float passthrough.
    fn parquet_file(start: ArrayRef, end: ArrayRef) -> tempfile::NamedTempFile {
        let batch = RecordBatch::try_from_iter(vec![
            (COL_COORDINATOR, column(StringArray::from(vec!["LC1"]))),
            (COL_OPERATOR, column(StringArray::from(vec!["Ana"]))),
            (COL_MACHINE, column(StringArray::from(vec!["M1"]))),
            (COL_INDICATOR, column(StringArray::from(vec!["UPDT"]))),
            (COL_WEEK, column(Int64Array::from(vec![3]))),
            (COL_VALUE, column(Float64Array::from(vec![4.5]))),
            (COL_PERIOD_START, start),
            (COL_PERIOD_END, end),
            ("Turnos", column(Float64Array::from(vec![3.0]))),
        ])
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_week_three(table: &PerformanceTable) {
        assert_eq!(table.len(), 1);
        let record = &table.records[0];
        assert_eq!(record.week, 3);
        assert_eq!(record.value, 4.5);
        assert_eq!(record.indicator, Indicator::Updt);
        assert_eq!(record.period_start, ymd(2025, 1, 13));
        assert_eq!(record.period_end, ymd(2025, 1, 19));
        assert_eq!(table.extra_columns, vec!["Turnos"]);
        assert_eq!(record.extras, vec!["3.0"]);
    }

    #[test]
    fn loads_parquet_with_date32_periods() {
        let epoch = ymd(1970, 1, 1);
        let days = |d: NaiveDate| (d - epoch).num_days() as i32;
        let file = parquet_file(
            column(Date32Array::from(vec![days(ymd(2025, 1, 13))])),
            column(Date32Array::from(vec![days(ymd(2025, 1, 19))])),
        );

        assert_week_three(&load_performance(file.path(), None).unwrap());
    }

    #[test]
    fn loads_parquet_with_nanosecond_timestamps() {
        let nanos = |d: NaiveDate| {
            d.and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc()
                .timestamp_nanos_opt()
                .unwrap()
        };
        let file = parquet_file(
            column(TimestampNanosecondArray::from(vec![nanos(ymd(2025, 1, 13))])),
            column(TimestampNanosecondArray::from(vec![nanos(ymd(2025, 1, 19))])),
        );

        assert_week_three(&load_performance(file.path(), None).unwrap());
        assert_eq!(sheet_names(file.path()).unwrap(), vec![SINGLE_SHEET]);
    }

    // -----------------------------------------------------------------------
    // Spreadsheet cells
    // -----------------------------------------------------------------------

    fn date_of(cell: &Cell) -> Result<NaiveDate> {
        Field { cell, row: 1, column: COL_PERIOD_START }.date()
    }

    #[test]
    fn spreadsheet_datetime_is_a_serial_day() {
        let data = Data::DateTime(ExcelDateTime::new(45670.0, ExcelDateTimeType::DateTime, false));
        let cell = sheet_cell(&data);
        assert_eq!(cell, Cell::Float(45670.0));
        assert_eq!(date_of(&cell).unwrap(), ymd(2025, 1, 13));
    }

    #[test]
    fn spreadsheet_iso_datetime_parses_as_text() {
        let cell = sheet_cell(&Data::DateTimeIso("2025-01-13T00:00:00".to_string()));
        assert_eq!(cell, Cell::Text("2025-01-13T00:00:00".to_string()));
        assert_eq!(date_of(&cell).unwrap(), ymd(2025, 1, 13));
    }

    #[test]
    fn spreadsheet_headers_and_blanks() {
        assert_eq!(sheet_cell(&Data::String("Operador".into())).to_text(), "Operador");
        assert_eq!(sheet_cell(&Data::Int(3)), Cell::Integer(3));
        assert_eq!(sheet_cell(&Data::Empty), Cell::Null);
        assert_eq!(sheet_cell(&Data::String(String::new())), Cell::Null);
    }

    #[test]
    fn sheet_choice_defaults_to_first_and_rejects_unknown_names() {
        let names = vec!["Respuestas".to_string(), "Resumen".to_string()];
        assert_eq!(choose_sheet(&names, None).unwrap(), "Respuestas");
        assert_eq!(choose_sheet(&names, Some("Resumen")).unwrap(), "Resumen");
        assert!(matches!(
            choose_sheet(&names, Some("Hoja3")),
            Err(DashboardError::UnknownSheet(name)) if name == "Hoja3"
        ));
        assert!(matches!(choose_sheet(&[], None), Err(DashboardError::UnknownSheet(_))));
    }

    #[test]
    fn float_cells_render_like_pandas() {
        assert_eq!(Cell::Float(3.0).to_text(), "3.0");
        assert_eq!(Cell::Float(2.25).to_text(), "2.25");
        assert_eq!(Cell::Integer(3).to_text(), "3");
    }
}
