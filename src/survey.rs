use std::collections::BTreeSet;

use crate::text::{normalize, response_lookup, top_ngrams, NGramEntry, StopWords};

pub const COL_SUBJECT: &str = "ASIGNATURA";
pub const COL_QUESTION: &str = "PREGUNTA";
pub const COL_RESPONSE: &str = "RESPUESTA";

pub const REQUIRED_SURVEY_COLUMNS: [&str; 3] = [COL_SUBJECT, COL_QUESTION, COL_RESPONSE];

// ---------------------------------------------------------------------------
// Survey rows
// ---------------------------------------------------------------------------

/// One open-ended answer. Missing subject/question cells load as `""`;
/// a missing answer stays `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    pub subject: String,
    pub question: String,
    pub response: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SurveyTable {
    pub records: Vec<SurveyRecord>,
}

impl SurveyTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct non-empty subjects.
    pub fn subjects(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.subject.as_str())
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SurveyCorpus – the answers for a subject selection, cleaned once
// ---------------------------------------------------------------------------

/// The rows of the selected subjects together with their cleaned text.
/// Rebuilt whenever the subject selection changes.
#[derive(Debug, Clone)]
pub struct SurveyCorpus<'a> {
    records: Vec<&'a SurveyRecord>,
    cleaned: Vec<String>,
}

impl<'a> SurveyCorpus<'a> {
    pub fn new(table: &'a SurveyTable, subjects: &[String], stopwords: &StopWords) -> Self {
        let records: Vec<&SurveyRecord> = table
            .records
            .iter()
            .filter(|r| subjects.iter().any(|s| *s == r.subject))
            .collect();
        let cleaned = records
            .iter()
            .map(|r| normalize(r.response.as_deref(), stopwords))
            .collect();
        log::debug!("Survey corpus: {} responses for {:?}", records.len(), subjects);
        SurveyCorpus { records, cleaned }
    }

    /// Number of responses (answered or not) in the selection.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-empty questions in first-seen order.
    pub fn questions(&self) -> Vec<&'a str> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .copied()
            .map(|r| r.question.as_str())
            .filter(|q| !q.is_empty() && seen.insert(*q))
            .collect()
    }

    pub fn cleaned_texts(&self) -> &[String] {
        &self.cleaned
    }

    pub fn top_ngrams(&self, n: usize, top_k: usize) -> Vec<NGramEntry> {
        top_ngrams(&self.cleaned, n, top_k)
    }

    /// Raw answers whose cleaned text contains `ngram_text`, in table order.
    /// Rows without an answer are never returned.
    pub fn responses_containing(&self, ngram_text: &str) -> Vec<&'a str> {
        let (cleaned, raw): (Vec<&str>, Vec<&'a str>) = self
            .records
            .iter()
            .copied()
            .zip(&self.cleaned)
            .filter_map(|(r, cleaned)| r.response.as_deref().map(|raw| (cleaned.as_str(), raw)))
            .unzip();
        response_lookup(&cleaned, &raw, ngram_text)
    }
}
