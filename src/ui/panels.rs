use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Indicator;
use crate::state::{AppState, PerformanceState, Tab};

/// Extensions offered by the open dialogs.
const TABLE_EXTENSIONS: [&str; 8] = ["csv", "json", "parquet", "pq", "xlsx", "xlsm", "xls", "ods"];

// ---------------------------------------------------------------------------
// Left side panel – performance filters
// ---------------------------------------------------------------------------

/// Render the performance filter panel.
pub fn performance_filters(ui: &mut Ui, perf: &mut PerformanceState) {
    ui.heading("Filtros");
    ui.separator();

    let dataset = match &perf.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Owned copies so the state can be mutated inside the widgets.
    let coordinators = dataset.coordinators();
    let machines = dataset.machines();
    let (week_lo, week_hi) = dataset.week_bounds().unwrap_or((1, 1));
    let operators = perf.operator_choices();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Coordinator ----
            ui.strong("Coordinador (LC)");
            let current = perf.coordinator.clone();
            let mut chosen: Option<Option<String>> = None;
            egui::ComboBox::from_id_salt("coordinator")
                .selected_text(current.clone().unwrap_or_else(|| "Todos".to_string()))
                .show_ui(ui, |ui: &mut Ui| {
                    if ui.selectable_label(current.is_none(), "Todos").clicked() {
                        chosen = Some(None);
                    }
                    for c in &coordinators {
                        let is_current = current.as_deref() == Some(c.as_str());
                        if ui.selectable_label(is_current, c.as_str()).clicked() {
                            chosen = Some(Some(c.clone()));
                        }
                    }
                });
            if let Some(c) = chosen {
                perf.set_coordinator(c);
            }
            ui.separator();

            // ---- Operators ----
            let header = format!("Operadores  ({}/{})", perf.operators.len(), operators.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("operators")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            perf.select_all_operators();
                        }
                        if ui.small_button("None").clicked() {
                            perf.select_no_operators();
                        }
                    });
                    for op in &operators {
                        let mut checked = perf.operators.contains(op);
                        let mut text = RichText::new(op.as_str());
                        if let Some(cm) = &perf.color_map {
                            text = text.color(cm.color_for(op));
                        }
                        if ui.checkbox(&mut checked, text).changed() {
                            perf.toggle_operator(op);
                        }
                    }
                });

            // ---- Machines ----
            let header = format!("Máquinas  ({}/{})", perf.machines.len(), machines.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("machines")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            perf.select_all_machines();
                        }
                        if ui.small_button("None").clicked() {
                            perf.select_no_machines();
                        }
                    });
                    for m in &machines {
                        let mut checked = perf.machines.contains(m);
                        if ui.checkbox(&mut checked, m.as_str()).changed() {
                            perf.toggle_machine(m);
                        }
                    }
                });
            ui.separator();

            // ---- Indicator ----
            ui.strong("Indicador");
            let mut indicator = perf.indicator;
            egui::ComboBox::from_id_salt("indicator")
                .selected_text(indicator.meta().display_name)
                .show_ui(ui, |ui: &mut Ui| {
                    for ind in Indicator::ALL {
                        ui.selectable_value(&mut indicator, ind, ind.meta().display_name);
                    }
                });
            if indicator != perf.indicator {
                perf.set_indicator(indicator);
            }
            ui.label(RichText::new(perf.indicator.meta().description).italics());
            ui.separator();

            // ---- Weeks ----
            ui.strong("Rango de Weeks");
            let (mut lo, mut hi) = perf.week_range;
            let from = ui.add(egui::Slider::new(&mut lo, week_lo..=week_hi).text("desde"));
            let to = ui.add(egui::Slider::new(&mut hi, week_lo..=week_hi).text("hasta"));
            if from.changed() || to.changed() {
                perf.set_week_range((lo, hi));
            }
            ui.separator();

            // ---- Filter summary ----
            ui.strong("Resumen de Filtros");
            ui.label(format!(
                "Coordinador: {}",
                perf.coordinator.as_deref().unwrap_or("Todos")
            ));
            ui.label(format!("Operadores: {}", perf.operators.len()));
            ui.label(format!("Máquinas: {}", perf.machines.len()));
            ui.label(format!("Indicador: {}", perf.indicator.meta().display_name));
        });
}

// ---------------------------------------------------------------------------
// Left side panel – survey selections
// ---------------------------------------------------------------------------

/// Render the sheet and subject selectors for the survey tab.
pub fn survey_filters(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Encuesta");
    ui.separator();

    let subjects = match &state.survey.table {
        Some(table) => table.subjects(),
        None => {
            ui.label("No survey loaded.");
            return;
        }
    };

    let sheets = state.survey.sheets.clone();
    if sheets.len() > 1 {
        ui.strong("Hoja");
        let current = state.survey.sheet.clone().unwrap_or_default();
        let mut chosen: Option<String> = None;
        egui::ComboBox::from_id_salt("sheet")
            .selected_text(current.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                for sheet in &sheets {
                    if ui.selectable_label(*sheet == current, sheet.as_str()).clicked() {
                        chosen = Some(sheet.clone());
                    }
                }
            });
        if let Some(sheet) = chosen {
            state.select_survey_sheet(&sheet);
        }
        ui.separator();
    }

    ui.strong(format!(
        "Asignaturas  ({}/{})",
        state.survey.subjects.len(),
        subjects.len()
    ));
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for subject in &subjects {
                let mut checked = state.survey.subjects.contains(subject);
                if ui.checkbox(&mut checked, subject.as_str()).changed() {
                    state.survey.toggle_subject(subject);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_dataset_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open survey…").clicked() {
                open_survey_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.selectable_value(&mut state.tab, Tab::Performance, "Performance");
        ui.selectable_value(&mut state.tab, Tab::Survey, "Encuesta");
        ui.separator();

        match state.tab {
            Tab::Performance => {
                if let Some(ds) = &state.performance.dataset {
                    let visible = state
                        .performance
                        .view
                        .as_ref()
                        .filter(|_| state.performance.notice.is_none())
                        .map_or(0, |v| v.indices.len());
                    ui.label(format!("{} rows loaded, {visible} visible", ds.len()));
                }
            }
            Tab::Survey => {
                if let Some(table) = &state.survey.table {
                    ui.label(format!(
                        "{} responses loaded, {} selected",
                        table.len(),
                        state.survey.response_count
                    ));
                }
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_dataset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open performance data")
        .add_filter("Supported files", &TABLE_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .pick_file();

    if let Some(path) = file {
        state.open_dataset(&path);
    }
}

pub fn open_survey_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey responses")
        .add_filter("Supported files", &TABLE_EXTENSIONS)
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_survey(&path);
    }
}

/// Ask where to save an export and write it. `Ok(false)` when cancelled.
pub fn save_csv_dialog(file_name: &str, bytes: crate::error::Result<Vec<u8>>) -> anyhow::Result<bool> {
    let bytes = bytes.context("building CSV export")?;
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save CSV")
        .set_file_name(file_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return Ok(false);
    };
    std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {}", path.display());
    Ok(true)
}
