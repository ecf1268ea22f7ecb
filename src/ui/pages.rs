use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use super::{panels, plot, tables};
use crate::data::export;
use crate::state::AppState;

enum Export {
    Filtered,
    Summary,
}

// ---------------------------------------------------------------------------
// Performance dashboard (central panel)
// ---------------------------------------------------------------------------

pub fn performance_page(ui: &mut Ui, state: &mut AppState) {
    let perf = &state.performance;
    if perf.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to begin  (File → Open dataset…)");
        });
        return;
    }
    if let Some(notice) = &perf.notice {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(notice).heading().color(Color32::from_rgb(0xe6, 0x7e, 0x22)));
        });
        return;
    }
    let Some(view) = &perf.view else {
        return;
    };

    let indicator = view.spec.indicator;
    let mut requested: Option<Export> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(format!("Métricas - {}", indicator.meta().display_name));
            tables::headline(ui, &view.summary.headline, indicator);
            ui.separator();

            ui.heading(format!("Evolución Temporal - {}", indicator.meta().display_name));
            plot::evolution_plot(ui, perf, view);
            ui.separator();

            ui.heading("Tabla Comparativa de Performance");
            tables::ranked_table(ui, &view.summary.ranked);
            ui.separator();

            ui.heading("Resumen por Coordinador (LC)");
            ui.columns(2, |cols: &mut [Ui]| {
                plot::coordinator_chart(&mut cols[0], &view.summary.rollup);
                tables::rollup_grid(&mut cols[1], &view.summary.rollup);
            });
            ui.separator();

            ui.heading("Exportar Datos");
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Descargar datos filtrados (CSV)").clicked() {
                    requested = Some(Export::Filtered);
                }
                if ui.button("Descargar tabla resumen (CSV)").clicked() {
                    requested = Some(Export::Summary);
                }
            });
        });

    let Some(kind) = requested else {
        return;
    };
    let today = chrono::Local::now().date_naive();
    let (name, bytes) = match kind {
        Export::Filtered => (
            export::file_name("datos_filtrados", indicator, today),
            perf.export_filtered(),
        ),
        Export::Summary => (
            export::file_name("resumen", indicator, today),
            perf.export_summary(),
        ),
    };
    let Some(bytes) = bytes else {
        return;
    };
    match panels::save_csv_dialog(&name, bytes) {
        Ok(_) => state.status_message = None,
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Survey analyzer (central panel)
// ---------------------------------------------------------------------------

pub fn survey_page(ui: &mut Ui, state: &mut AppState) {
    let survey = &state.survey;
    if survey.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a survey export to begin  (File → Open survey…)");
        });
        return;
    }

    let mut toggled: Option<String> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            tables::questions(ui, &survey.questions, survey.response_count);
            ui.separator();

            ui.heading("Frecuencia de n-gramas");
            let columns = survey.ngrams.len().max(1);
            ui.columns(columns, |cols: &mut [Ui]| {
                for (col, (n, entries)) in cols.iter_mut().zip(&survey.ngrams) {
                    col.strong(format!("Top {} {}", entries.len(), ngram_label(*n)));
                    if entries.is_empty() {
                        col.label("No se encontraron n-gramas significativos.");
                    } else {
                        plot::ngram_chart(col, &format!("ngram_chart_{n}"), entries, plot::ngram_color(*n));
                    }
                }
            });
            ui.separator();

            ui.heading("Filtrar respuestas por n-gramas");
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for option in survey.ngram_options() {
                    let selected = survey.selected_ngrams.contains(&option);
                    if ui.selectable_label(selected, option.as_str()).clicked() {
                        toggled = Some(option);
                    }
                }
            });
            tables::ngram_matches(ui, &survey.matches);
        });

    if let Some(gram) = toggled {
        state.survey.toggle_ngram(&gram);
    }
}

fn ngram_label(n: usize) -> String {
    match n {
        1 => "Palabras".to_string(),
        2 => "Bigramas".to_string(),
        3 => "Trigramas".to_string(),
        n => format!("{n}-gramas"),
    }
}
