use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

use opdash::data::model::{
    Indicator, COL_COORDINATOR, COL_INDICATOR, COL_MACHINE, COL_OPERATOR, COL_PERIOD_END,
    COL_PERIOD_START, COL_VALUE, COL_WEEK, REQUIRED_COLUMNS,
};
use opdash::survey::REQUIRED_SURVEY_COLUMNS;

const FIRST_WEEK: u32 = 3;
const LAST_WEEK: u32 = 42;

/// Coordinator, operator, the machines they run and a skill factor in [0, 1].
const CREW: [(&str, &str, [&str; 2], f64); 9] = [
    ("LC1", "Ana Torres", ["KDF-01", "KDF-02"], 0.9),
    ("LC1", "Bruno Díaz", ["KDF-01", "KDF-03"], 0.6),
    ("LC1", "Carla Ruiz", ["KDF-02", "KDF-04"], 0.4),
    ("LC2", "Diego Mora", ["KDF-03", "KDF-04"], 0.8),
    ("LC2", "Elena Vidal", ["KDF-05", "KDF-06"], 0.5),
    ("LC2", "Fabián Rojas", ["KDF-05", "KDF-01"], 0.3),
    ("LC3", "Gabriela Soto", ["KDF-06", "KDF-02"], 0.7),
    ("LC3", "Hugo Castro", ["KDF-03", "KDF-05"], 0.55),
    ("LC3", "Irene Paz", ["KDF-04", "KDF-06"], 0.2),
];

struct Row {
    coordinator: &'static str,
    operator: &'static str,
    machine: &'static str,
    indicator: Indicator,
    week: u32,
    start: NaiveDate,
    end: NaiveDate,
    value: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Monday of `week`; week 2 starts on 2025-01-06.
fn week_start(week: u32) -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap_or_default();
    base + Duration::weeks(i64::from(week) - 2)
}

/// Weekly average of one indicator; better operators sit closer to the good end.
fn indicator_value(indicator: Indicator, skill: f64, week: u32, rng: &mut SimpleRng) -> f64 {
    let trend = f64::from(week - FIRST_WEEK) / f64::from(LAST_WEEK - FIRST_WEEK);
    let v = match indicator {
        Indicator::Mtbf => rng.gauss(60.0 + 90.0 * skill + 10.0 * trend, 12.0).max(5.0),
        Indicator::RejectRate => rng.gauss(4.0 - 2.5 * skill, 0.4).max(0.1),
        Indicator::StrategicPr => rng.gauss(70.0 + 20.0 * skill + 3.0 * trend, 3.0).clamp(0.0, 100.0),
        Indicator::Updt => rng.gauss(9.0 - 6.0 * skill - trend, 1.0).max(0.2),
    };
    (v * 100.0).round() / 100.0
}

fn performance_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(coordinator, operator, machines, skill) in &CREW {
        for machine in machines {
            for indicator in Indicator::ALL {
                for week in FIRST_WEEK..=LAST_WEEK {
                    // Roughly one week in ten has no production.
                    if rng.next_f64() < 0.1 {
                        continue;
                    }
                    let start = week_start(week);
                    rows.push(Row {
                        coordinator,
                        operator,
                        machine,
                        indicator,
                        week,
                        start,
                        end: start + Duration::days(6),
                        value: indicator_value(indicator, skill, week, rng),
                    });
                }
            }
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[Row]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(REQUIRED_COLUMNS)?;
    for r in rows {
        writer.write_record([
            r.coordinator.to_string(),
            r.operator.to_string(),
            r.machine.to_string(),
            r.indicator.code().to_string(),
            r.week.to_string(),
            r.value.to_string(),
            r.start.format("%Y-%m-%d").to_string(),
            r.end.format("%Y-%m-%d").to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> anyhow::Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let days = |d: NaiveDate| (d - epoch).num_days() as i32;

    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_COORDINATOR, DataType::Utf8, false),
        Field::new(COL_OPERATOR, DataType::Utf8, false),
        Field::new(COL_MACHINE, DataType::Utf8, false),
        Field::new(COL_INDICATOR, DataType::Utf8, false),
        Field::new(COL_WEEK, DataType::Int64, false),
        Field::new(COL_VALUE, DataType::Float64, false),
        Field::new(COL_PERIOD_START, DataType::Date32, false),
        Field::new(COL_PERIOD_END, DataType::Date32, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.coordinator))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.operator))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.machine))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.indicator.code()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| i64::from(r.week)))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.value))),
            Arc::new(Date32Array::from_iter_values(rows.iter().map(|r| days(r.start)))),
            Arc::new(Date32Array::from_iter_values(rows.iter().map(|r| days(r.end)))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Survey responses
// ---------------------------------------------------------------------------

const SUBJECTS: [&str; 3] = ["Física", "Matemáticas", "Programación"];

const QUESTIONS: [&str; 2] = [
    "¿Qué aspectos de la asignatura mejorarías?",
    "¿Qué es lo que más te ha gustado?",
];

const IMPROVEMENTS: [&str; 6] = [
    "Más clases prácticas y menos teoría",
    "Los exámenes deberían ser más cortos",
    "Más ejercicios resueltos en clase",
    "El material de apoyo llega tarde, más ejercicios resueltos",
    "Necesitamos más clases prácticas en el laboratorio",
    "Mejor coordinación entre teoría y prácticas",
];

const LIKES: [&str; 5] = [
    "El profesor explica muy bien los conceptos",
    "Las clases prácticas en el laboratorio",
    "Los ejercicios resueltos paso a paso",
    "El profesor explica con ejemplos reales",
    "La relación entre teoría y prácticas",
];

fn write_survey(path: &Path, rng: &mut SimpleRng) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(REQUIRED_SURVEY_COLUMNS)?;

    let mut count = 0;
    for subject in SUBJECTS {
        for (qi, &question) in QUESTIONS.iter().enumerate() {
            let pool: &[&str] = if qi == 0 { &IMPROVEMENTS } else { &LIKES };
            for _ in 0..12 {
                // Some students leave the answer blank.
                let response = if rng.next_f64() < 0.1 { "" } else { *rng.pick(pool) };
                writer.write_record([subject, question, response])?;
                count += 1;
            }
        }
    }
    writer.flush()?;
    Ok(count)
}

fn main() -> anyhow::Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)?;

    let mut rng = SimpleRng::new(42);
    let rows = performance_rows(&mut rng);

    let csv_path = out_dir.join("data_weekly_processed.csv");
    write_csv(&csv_path, &rows)?;
    let parquet_path = out_dir.join("data_weekly_processed.parquet");
    write_parquet(&parquet_path, &rows)?;
    println!(
        "Wrote {} weekly rows (weeks {FIRST_WEEK}-{LAST_WEEK}) to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );

    let survey_path = out_dir.join("encuesta_sample.csv");
    let responses = write_survey(&survey_path, &mut rng)?;
    println!("Wrote {responses} survey responses to {}", survey_path.display());
    Ok(())
}
