use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::export;
use crate::data::filter::{select, FilterSpec, FilteredView};
use crate::data::loader;
use crate::data::model::{Indicator, PerformanceTable};
use crate::data::summary::{summarize, weekly_series, Summary, WeeklySeries};
use crate::error::Result;
use crate::survey::{SurveyCorpus, SurveyTable};
use crate::text::{NGramEntry, StopWords};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Performance,
    Survey,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub tab: Tab,
    pub performance: PerformanceState,
    pub survey: SurveyState,
    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the session from config, loading whatever files it names.
    pub fn from_config(config: &DashboardConfig) -> Self {
        let stopwords = match &config.stopwords_path {
            Some(path) => StopWords::from_file(path).unwrap_or_else(|e| {
                log::error!("Failed to read stop words from {}: {e}; using built-in list", path.display());
                StopWords::spanish()
            }),
            None => StopWords::spanish(),
        };

        let mut state = AppState {
            tab: Tab::Performance,
            performance: PerformanceState::new(config.default_selection),
            survey: SurveyState::new(stopwords, config.ngram_sizes.clone(), config.ngram_top_k),
            status_message: None,
        };

        if let Some(path) = &config.dataset_path {
            state.open_dataset(path);
        }
        if let Some(path) = &config.survey_path {
            state.open_survey(path);
        }
        state
    }

    /// Load a performance dataset, keeping the current one on failure.
    pub fn open_dataset(&mut self, path: &Path) {
        match loader::load_performance(path, None) {
            Ok(table) => {
                self.performance.set_dataset(table, path);
                self.status_message = None;
                self.tab = Tab::Performance;
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Load a survey file (first sheet), keeping the current one on failure.
    pub fn open_survey(&mut self, path: &Path) {
        match self.survey.open(path) {
            Ok(()) => {
                self.status_message = None;
                self.tab = Tab::Survey;
            }
            Err(e) => {
                log::error!("Failed to load survey: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn select_survey_sheet(&mut self, sheet: &str) {
        if let Err(e) = self.survey.select_sheet(sheet) {
            log::error!("Failed to load sheet '{sheet}': {e}");
            self.status_message = Some(format!("Error: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Performance dashboard
// ---------------------------------------------------------------------------

/// Everything derived from one successful filter pass.
#[derive(Debug, Clone)]
pub struct PerformanceView {
    pub spec: FilterSpec,
    pub indices: Vec<usize>,
    pub summary: Summary,
    pub series: Vec<WeeklySeries>,
}

pub struct PerformanceState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<PerformanceTable>,
    pub source: Option<PathBuf>,

    // Widget selections; a FilterSpec is built from these on every change.
    pub coordinator: Option<String>,
    pub operators: BTreeSet<String>,
    pub machines: BTreeSet<String>,
    pub indicator: Indicator,
    pub week_range: (u32, u32),

    /// Last successful pass. Kept when a later pass fails.
    pub view: Option<PerformanceView>,
    /// Why the current selection shows no results.
    pub notice: Option<String>,

    /// Operator colours, stable across filter changes.
    pub color_map: Option<ColorMap>,

    preselect: usize,
}

impl PerformanceState {
    pub fn new(preselect: usize) -> Self {
        Self {
            dataset: None,
            source: None,
            coordinator: None,
            operators: BTreeSet::new(),
            machines: BTreeSet::new(),
            indicator: Indicator::Mtbf,
            week_range: (1, 1),
            view: None,
            notice: None,
            color_map: None,
            preselect,
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, table: PerformanceTable, source: &Path) {
        let initial = FilterSpec::initial(&table, self.preselect);
        self.coordinator = None;
        self.operators = initial.operators;
        self.machines = initial.machines;
        self.indicator = initial.indicator;
        self.week_range = initial.week_range;
        self.color_map = Some(ColorMap::new(&table.operators(None)));

        self.dataset = Some(table);
        self.source = Some(source.to_path_buf());
        self.view = None;
        self.refresh();
    }

    /// Snapshot the widgets into an immutable filter.
    pub fn spec(&self) -> FilterSpec {
        FilterSpec::new(self.indicator, self.week_range)
            .with_coordinator(self.coordinator.clone())
            .with_operators(self.operators.iter().cloned())
            .with_machines(self.machines.iter().cloned())
    }

    pub fn operator_choices(&self) -> Vec<String> {
        match &self.dataset {
            Some(ds) => ds.operators(self.coordinator.as_deref()),
            None => Vec::new(),
        }
    }

    /// Recompute every derived output for the current selections.
    pub fn refresh(&mut self) {
        let Some(table) = &self.dataset else {
            return;
        };
        let spec = self.spec();
        let outcome = select(table, &spec).and_then(|view| {
            Ok(PerformanceView {
                summary: summarize(&view)?,
                series: weekly_series(&view),
                indices: view.indices,
                spec: spec.clone(),
            })
        });

        match outcome {
            Ok(view) => {
                log::debug!(
                    "Recomputed {} rows into {} ranked groups",
                    view.indices.len(),
                    view.summary.ranked.len()
                );
                self.view = Some(view);
                self.notice = None;
            }
            Err(e) if e.is_recoverable() => {
                log::warn!("{e}");
                self.notice = Some(e.to_string());
            }
            Err(e) => {
                log::error!("Recomputation failed: {e}");
                self.notice = Some(e.to_string());
            }
        }
    }

    /// Changing the coordinator resets the operator selection to the leading
    /// operators of the new choice set.
    pub fn set_coordinator(&mut self, coordinator: Option<String>) {
        self.coordinator = coordinator;
        self.operators = self
            .operator_choices()
            .into_iter()
            .take(self.preselect)
            .collect();
        self.refresh();
    }

    pub fn toggle_operator(&mut self, operator: &str) {
        toggle(&mut self.operators, operator);
        self.refresh();
    }

    pub fn toggle_machine(&mut self, machine: &str) {
        toggle(&mut self.machines, machine);
        self.refresh();
    }

    pub fn select_all_operators(&mut self) {
        self.operators = self.operator_choices().into_iter().collect();
        self.refresh();
    }

    pub fn select_no_operators(&mut self) {
        self.operators.clear();
        self.refresh();
    }

    pub fn select_all_machines(&mut self) {
        self.machines = match &self.dataset {
            Some(ds) => ds.machines().into_iter().collect(),
            None => BTreeSet::new(),
        };
        self.refresh();
    }

    pub fn select_no_machines(&mut self) {
        self.machines.clear();
        self.refresh();
    }

    pub fn set_indicator(&mut self, indicator: Indicator) {
        self.indicator = indicator;
        self.refresh();
    }

    /// Clamp to the dataset's week bounds and keep `min <= max`.
    /// Does nothing until a non-empty dataset is loaded.
    pub fn set_week_range(&mut self, (lo, hi): (u32, u32)) {
        let Some((min, max)) = self.dataset.as_ref().and_then(|ds| ds.week_bounds()) else {
            return;
        };
        let lo = lo.clamp(min, max);
        let hi = hi.clamp(lo, max);
        self.week_range = (lo, hi);
        self.refresh();
    }

    /// Whether the current selections have displayable results.
    pub fn has_results(&self) -> bool {
        self.notice.is_none() && self.view.is_some()
    }

    fn filtered_view(&self) -> Option<FilteredView<'_>> {
        let table = self.dataset.as_ref()?;
        let view = self.view.as_ref()?;
        Some(FilteredView {
            table,
            indices: view.indices.clone(),
            indicator: view.spec.indicator,
        })
    }

    /// CSV bytes of the filtered rows of the last successful pass.
    pub fn export_filtered(&self) -> Option<Result<Vec<u8>>> {
        self.filtered_view().map(|v| export::filtered_csv(&v))
    }

    /// CSV bytes of the ranked table of the last successful pass.
    pub fn export_summary(&self) -> Option<Result<Vec<u8>>> {
        self.view
            .as_ref()
            .map(|v| export::summary_csv(&v.summary.ranked))
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

// ---------------------------------------------------------------------------
// Survey analyzer
// ---------------------------------------------------------------------------

pub struct SurveyState {
    pub source: Option<PathBuf>,
    pub sheets: Vec<String>,
    pub sheet: Option<String>,
    pub table: Option<SurveyTable>,

    /// Selected subjects.
    pub subjects: BTreeSet<String>,
    /// Selected n-grams, as space-joined text.
    pub selected_ngrams: Vec<String>,

    // Derived from the subject selection.
    pub questions: Vec<String>,
    pub response_count: usize,
    /// `(n, top n-grams)` for every configured size.
    pub ngrams: Vec<(usize, Vec<NGramEntry>)>,
    /// `(n-gram text, raw responses containing it)` for each selected n-gram.
    pub matches: Vec<(String, Vec<String>)>,

    stopwords: StopWords,
    ngram_sizes: Vec<usize>,
    top_k: usize,
}

impl SurveyState {
    pub fn new(stopwords: StopWords, ngram_sizes: Vec<usize>, top_k: usize) -> Self {
        Self {
            source: None,
            sheets: Vec::new(),
            sheet: None,
            table: None,
            subjects: BTreeSet::new(),
            selected_ngrams: Vec::new(),
            questions: Vec::new(),
            response_count: 0,
            ngrams: Vec::new(),
            matches: Vec::new(),
            stopwords,
            ngram_sizes,
            top_k,
        }
    }

    /// Open a file on its first sheet.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let sheets = loader::sheet_names(path)?;
        let sheet = sheets.first().cloned();
        let table = loader::load_survey(path, sheet.as_deref())?;

        self.source = Some(path.to_path_buf());
        self.sheets = sheets;
        self.sheet = sheet;
        self.set_table(table);
        Ok(())
    }

    /// Re-read the current file from another sheet.
    pub fn select_sheet(&mut self, sheet: &str) -> Result<()> {
        let Some(path) = self.source.clone() else {
            return Ok(());
        };
        let table = loader::load_survey(&path, Some(sheet))?;
        self.sheet = Some(sheet.to_string());
        self.set_table(table);
        Ok(())
    }

    /// The first subject starts selected.
    pub fn set_table(&mut self, table: SurveyTable) {
        self.subjects = table.subjects().into_iter().take(1).collect();
        self.selected_ngrams.clear();
        self.table = Some(table);
        self.refresh();
    }

    pub fn toggle_subject(&mut self, subject: &str) {
        toggle(&mut self.subjects, subject);
        self.refresh();
    }

    pub fn toggle_ngram(&mut self, ngram: &str) {
        match self.selected_ngrams.iter().position(|g| g == ngram) {
            Some(i) => {
                self.selected_ngrams.remove(i);
            }
            None => self.selected_ngrams.push(ngram.to_string()),
        }
        self.refresh();
    }

    /// Every n-gram currently offered for selection, smallest n first.
    pub fn ngram_options(&self) -> Vec<String> {
        self.ngrams
            .iter()
            .flat_map(|(_, entries)| entries.iter().map(NGramEntry::text))
            .collect()
    }

    /// Rebuild the corpus for the selected subjects and every derived list.
    pub fn refresh(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let subjects: Vec<String> = self.subjects.iter().cloned().collect();
        let corpus = SurveyCorpus::new(table, &subjects, &self.stopwords);

        self.response_count = corpus.len();
        self.questions = corpus.questions().into_iter().map(str::to_string).collect();
        self.ngrams = self
            .ngram_sizes
            .iter()
            .map(|&n| (n, corpus.top_ngrams(n, self.top_k)))
            .collect();

        let options = self.ngram_options();
        self.selected_ngrams.retain(|g| options.contains(g));
        self.matches = self
            .selected_ngrams
            .iter()
            .map(|g| {
                let responses = corpus
                    .responses_containing(g)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (g.clone(), responses)
            })
            .collect();
    }
}
