use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Indicator – the four tracked manufacturing metrics
// ---------------------------------------------------------------------------

/// Whether higher or lower values represent better performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

/// Static display configuration for one indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorMeta {
    pub display_name: &'static str,
    pub polarity: Polarity,
    /// sRGB colour used for the indicator in charts.
    pub color: [u8; 3],
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Mtbf,
    RejectRate,
    StrategicPr,
    Updt,
}

const MTBF_META: IndicatorMeta = IndicatorMeta {
    display_name: "MTBF (Mean Time Between Failures)",
    polarity: Polarity::HigherIsBetter,
    color: [0x2e, 0xcc, 0x71],
    description: "Mayor es mejor - Tiempo promedio entre fallas",
};

const REJECT_RATE_META: IndicatorMeta = IndicatorMeta {
    display_name: "Reject Rate",
    polarity: Polarity::LowerIsBetter,
    color: [0xe7, 0x4c, 0x3c],
    description: "Menor es mejor - Porcentaje de productos rechazados",
};

const STRATEGIC_PR_META: IndicatorMeta = IndicatorMeta {
    display_name: "Strategic PR (Production Rate)",
    polarity: Polarity::HigherIsBetter,
    color: [0x34, 0x98, 0xdb],
    description: "Mayor es mejor - Tasa de producción estratégica",
};

const UPDT_META: IndicatorMeta = IndicatorMeta {
    display_name: "UPDT (Unplanned Downtime)",
    polarity: Polarity::LowerIsBetter,
    color: [0xf3, 0x9c, 0x12],
    description: "Menor es mejor - Tiempo de inactividad no planificado",
};

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::Mtbf,
        Indicator::RejectRate,
        Indicator::StrategicPr,
        Indicator::Updt,
    ];

    /// The code used in the `Indicador` column and in export file names.
    pub fn code(self) -> &'static str {
        match self {
            Indicator::Mtbf => "MTBF",
            Indicator::RejectRate => "Reject_Rate",
            Indicator::StrategicPr => "Strategic_PR",
            Indicator::Updt => "UPDT",
        }
    }

    pub fn meta(self) -> &'static IndicatorMeta {
        match self {
            Indicator::Mtbf => &MTBF_META,
            Indicator::RejectRate => &REJECT_RATE_META,
            Indicator::StrategicPr => &STRATEGIC_PR_META,
            Indicator::Updt => &UPDT_META,
        }
    }

    pub fn polarity(self) -> Polarity {
        self.meta().polarity
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIndicator(pub String);

impl fmt::Display for UnknownIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown indicator '{}'", self.0)
    }
}

impl std::error::Error for UnknownIndicator {}

impl FromStr for Indicator {
    type Err = UnknownIndicator;

    /// Accepts the dataset codes plus the underscore-free spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MTBF" => Ok(Indicator::Mtbf),
            "Reject_Rate" | "RejectRate" => Ok(Indicator::RejectRate),
            "Strategic_PR" | "StrategicPR" => Ok(Indicator::StrategicPr),
            "UPDT" => Ok(Indicator::Updt),
            other => Err(UnknownIndicator(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PerformanceRecord – one row of the weekly dataset
// ---------------------------------------------------------------------------

/// Column names the loader requires, in canonical order.
pub const COL_COORDINATOR: &str = "Coordinador";
pub const COL_OPERATOR: &str = "Operador";
pub const COL_MACHINE: &str = "Maquina";
pub const COL_INDICATOR: &str = "Indicador";
pub const COL_WEEK: &str = "Week";
pub const COL_VALUE: &str = "Valor_Promedio";
pub const COL_PERIOD_START: &str = "Fecha_Inicio";
pub const COL_PERIOD_END: &str = "Fecha_Fin";

pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_COORDINATOR,
    COL_OPERATOR,
    COL_MACHINE,
    COL_INDICATOR,
    COL_WEEK,
    COL_VALUE,
    COL_PERIOD_START,
    COL_PERIOD_END,
];

/// A single shift-averaged weekly measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    pub coordinator: String,
    pub operator: String,
    pub machine: String,
    pub indicator: Indicator,
    pub week: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub value: f64,
    /// Values of the non-required columns, aligned with
    /// [`PerformanceTable::extra_columns`].
    pub extras: Vec<String>,
}

// ---------------------------------------------------------------------------
// PerformanceTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded dataset. Never mutated after loading; every derived view
/// borrows it.
#[derive(Debug, Clone, Default)]
pub struct PerformanceTable {
    pub records: Vec<PerformanceRecord>,
    /// Every source column in source order (required + passthrough).
    pub columns: Vec<String>,
    /// The passthrough columns only, in source order.
    pub extra_columns: Vec<String>,
}

impl PerformanceTable {
    /// Build a table with only the required columns.
    pub fn from_records(records: Vec<PerformanceRecord>) -> Self {
        PerformanceTable {
            records,
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            extra_columns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct coordinators.
    pub fn coordinators(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.coordinator.as_str()))
    }

    /// Sorted distinct operators, restricted to one coordinator when given.
    pub fn operators(&self, coordinator: Option<&str>) -> Vec<String> {
        distinct(
            self.records
                .iter()
                .filter(|r| coordinator.map_or(true, |c| r.coordinator == c))
                .map(|r| r.operator.as_str()),
        )
    }

    /// Sorted distinct machines.
    pub fn machines(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.machine.as_str()))
    }

    /// Indicators present in the data, in declaration order.
    pub fn indicators(&self) -> Vec<Indicator> {
        let present: BTreeSet<Indicator> = self.records.iter().map(|r| r.indicator).collect();
        present.into_iter().collect()
    }

    /// `(min, max)` week over the whole table.
    pub fn week_bounds(&self) -> Option<(u32, u32)> {
        let min = self.records.iter().map(|r| r.week).min()?;
        let max = self.records.iter().map(|r| r.week).max()?;
        Some((min, max))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn indicator_codes_round_trip_through_from_str() {
        for ind in Indicator::ALL {
            assert_eq!(ind.code().parse::<Indicator>(), Ok(ind));
        }
        assert_eq!("RejectRate".parse::<Indicator>(), Ok(Indicator::RejectRate));
        assert!("OEE".parse::<Indicator>().is_err());
    }

    #[test]
    fn polarity_matches_indicator_semantics() {
        assert_eq!(Indicator::Mtbf.polarity(), Polarity::HigherIsBetter);
        assert_eq!(Indicator::StrategicPr.polarity(), Polarity::HigherIsBetter);
        assert_eq!(Indicator::RejectRate.polarity(), Polarity::LowerIsBetter);
        assert_eq!(Indicator::Updt.polarity(), Polarity::LowerIsBetter);
    }

    #[test]
    fn operator_choices_depend_on_coordinator() {
        let table = PerformanceTable::from_records(vec![
            record("LC2", "Zoe", "M1", Indicator::Updt, 3, 1.0),
            record("LC1", "Ana", "M1", Indicator::Updt, 3, 1.0),
            record("LC1", "Bruno", "M2", Indicator::Updt, 4, 1.0),
            record("LC1", "Ana", "M2", Indicator::Mtbf, 5, 1.0),
        ]);

        assert_eq!(table.coordinators(), vec!["LC1", "LC2"]);
        assert_eq!(table.operators(None), vec!["Ana", "Bruno", "Zoe"]);
        assert_eq!(table.operators(Some("LC1")), vec!["Ana", "Bruno"]);
        assert!(table.operators(Some("LC9")).is_empty());
        assert_eq!(table.machines(), vec!["M1", "M2"]);
        assert_eq!(table.indicators(), vec![Indicator::Mtbf, Indicator::Updt]);
        assert_eq!(table.week_bounds(), Some((3, 5)));
    }

    #[test]
    fn empty_table_has_no_week_bounds() {
        assert_eq!(PerformanceTable::default().week_bounds(), None);
    }
}
