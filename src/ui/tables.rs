use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::{format_float, SUMMARY_HEADER};
use crate::data::model::{Indicator, Polarity};
use crate::data::summary::{CoordinatorRollup, HeadlineMetrics, RankedSummaryRow};

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

pub fn headline(ui: &mut Ui, metrics: &HeadlineMetrics, indicator: Indicator) {
    let best_label = match indicator.polarity() {
        Polarity::LowerIsBetter => "Mejor Valor (mín.)",
        Polarity::HigherIsBetter => "Mejor Valor (máx.)",
    };
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Registros Totales", metrics.count.to_string());
        metric(ui, "Weeks Analizadas", metrics.distinct_weeks.to_string());
        metric(ui, "Promedio", format!("{:.2}", metrics.mean));
        metric(ui, best_label, format!("{:.2}", metrics.best));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(label);
            ui.label(RichText::new(value).heading().strong());
        });
    });
}

// ---------------------------------------------------------------------------
// Ranked comparison table
// ---------------------------------------------------------------------------

pub fn ranked_table(ui: &mut Ui, rows: &[RankedSummaryRow]) {
    TableBuilder::new(ui)
        .id_salt("ranked_table")
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .column(Column::auto())
        .columns(Column::auto().at_least(70.0), 3)
        .columns(Column::auto().at_least(60.0), 5)
        .header(20.0, |mut header| {
            for title in SUMMARY_HEADER {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                body.row(18.0, |mut cells| {
                    let values = [
                        row.rank.to_string(),
                        row.coordinator.clone(),
                        row.operator.clone(),
                        row.machine.clone(),
                        format_float(row.mean),
                        format_float(row.min),
                        format_float(row.max),
                        format_float(row.stddev),
                        row.count.to_string(),
                    ];
                    for value in values {
                        cells.col(|ui: &mut Ui| {
                            ui.label(value);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Coordinator statistics
// ---------------------------------------------------------------------------

pub fn rollup_grid(ui: &mut Ui, rollup: &[CoordinatorRollup]) {
    egui::Grid::new("rollup_grid")
        .striped(true)
        .num_columns(5)
        .show(ui, |ui: &mut Ui| {
            for title in ["Coordinador", "Promedio", "Desv. Std", "Operadores", "Registros"] {
                ui.strong(title);
            }
            ui.end_row();

            for row in rollup {
                ui.label(row.coordinator.as_str());
                ui.label(format!("{:.2}", row.mean));
                ui.label(format!("{:.2}", row.stddev));
                ui.label(row.distinct_operators.to_string());
                ui.label(row.rows.to_string());
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Survey lists
// ---------------------------------------------------------------------------

pub fn questions(ui: &mut Ui, questions: &[String], responses: usize) {
    ui.label(RichText::new(format!("Preguntas encontradas: {}", questions.len())).strong());
    for question in questions {
        ui.label(format!("• {question}"));
    }
    ui.label(format!("Total de respuestas: {responses}"));
}

/// Responses containing each selected n-gram, numbered from 1.
pub fn ngram_matches(ui: &mut Ui, matches: &[(String, Vec<String>)]) {
    for (gram, responses) in matches {
        egui::CollapsingHeader::new(
            RichText::new(format!("\"{gram}\"  ({} respuestas)", responses.len())).strong(),
        )
        .id_salt(("ngram_matches", gram.as_str()))
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if responses.is_empty() {
                ui.label("Ninguna respuesta contiene este n-grama.");
            }
            for (i, response) in responses.iter().enumerate() {
                ui.label(format!("{}. {response}", i + 1));
            }
        });
    }
}
