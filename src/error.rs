use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy shared by the loaders, the filter engine and the exports
// ---------------------------------------------------------------------------

/// Which multi-select came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Operators,
    Machines,
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKind::Operators => write!(f, "operator"),
            SelectionKind::Machines => write!(f, "machine"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Required columns are absent; the load produced nothing.
    #[error("missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// The user deselected every operator or every machine.
    #[error("select at least one {0}")]
    EmptySelection(SelectionKind),

    /// A valid filter that matches zero rows.
    #[error("no data available for the selected filters")]
    NoData,

    /// A cell that could not be converted to its declared type.
    /// `row` is the 1-based data row (header excluded).
    #[error("row {row}, column '{column}': cannot parse '{value}' ({reason})")]
    Parse {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("sheet '{0}' not found")]
    UnknownSheet(String),

    #[error("malformed JSON records: {0}")]
    JsonShape(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Spreadsheet(#[from] calamine::Error),
}

impl DashboardError {
    /// Selection problems the user can fix by changing a widget; the pipeline
    /// keeps running and shows a notice instead of results.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DashboardError::EmptySelection(_) | DashboardError::NoData
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_missing_column() {
        let err = DashboardError::Schema {
            missing: vec!["Week".into(), "Fecha_Fin".into()],
        };
        assert_eq!(err.to_string(), "missing required columns: Week, Fecha_Fin");
    }

    #[test]
    fn selection_and_no_data_are_recoverable() {
        assert!(DashboardError::EmptySelection(SelectionKind::Machines).is_recoverable());
        assert!(DashboardError::NoData.is_recoverable());
        assert!(!DashboardError::Schema { missing: vec![] }.is_recoverable());
    }
}
