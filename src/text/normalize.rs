use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

/// Built-in Spanish stop-word list, one word per line.
const SPANISH_STOPWORDS: &str = include_str!("stopwords_es.txt");

/// Tokens this short or shorter never survive normalization.
pub const MIN_TOKEN_CHARS: usize = 3;

// ---------------------------------------------------------------------------
// Stop-word set
// ---------------------------------------------------------------------------

/// A static set of words dropped during normalization. Supplied at
/// initialization so the language can be swapped without touching
/// [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The standard Spanish list.
    pub fn spanish() -> Self {
        Self::from_words(SPANISH_STOPWORDS.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        StopWords {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Newline-separated word file; blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let set = Self::from_words(text.lines().filter(|l| !l.trim_start().starts_with('#')));
        log::info!("Loaded {} stop words from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Letters kept besides ASCII `a-z`.
fn is_spanish_letter(c: char) -> bool {
    c.is_ascii_lowercase() || matches!(c, 'á' | 'é' | 'í' | 'ó' | 'ú' | 'ñ' | 'ü')
}

/// Clean one free-text answer.
///
/// Lowercases, deletes every character that is neither a Spanish letter nor
/// whitespace (digits and punctuation vanish without leaving a gap), splits
/// on whitespace, drops stop words and tokens of at most two characters, and
/// rejoins with single spaces. A missing answer yields `""`.
pub fn normalize(raw: Option<&str>, stopwords: &StopWords) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let stripped: String = raw
        .to_lowercase()
        .chars()
        .filter(|&c| is_spanish_letter(c) || c.is_whitespace())
        .collect();

    stripped
        .split_whitespace()
        .filter(|t| !stopwords.contains(t) && t.chars().count() >= MIN_TOKEN_CHARS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_empty_input_yield_empty_string() {
        let sw = StopWords::spanish();
        assert_eq!(normalize(None, &sw), "");
        assert_eq!(normalize(Some(""), &sw), "");
        assert_eq!(normalize(Some("  ¡¿!?  "), &sw), "");
    }

    #[test]
    fn strips_digits_punctuation_and_stop_words() {
        let sw = StopWords::spanish();
        assert_eq!(
            normalize(Some("El Operador-23 paró la Máquina!!"), &sw),
            "operador paró máquina"
        );
    }

    #[test]
    fn punctuation_is_removed_without_splitting_tokens() {
        let sw = StopWords::from_words(Vec::<&str>::new());
        assert_eq!(normalize(Some("auto-gestión"), &sw), "autogestión");
        assert_eq!(normalize(Some("ÑANDÚ PINGÜINO"), &sw), "ñandú pingüino");
    }

    #[test]
    fn short_tokens_are_dropped_even_without_stop_words() {
        let sw = StopWords::from_words(["clase"]);
        assert_eq!(normalize(Some("la clase fue muy útil"), &sw), "fue muy útil");
    }

    #[test]
    fn characters_outside_the_spanish_alphabet_are_deleted() {
        let sw = StopWords::default();
        assert_eq!(normalize(Some("café crème"), &sw), "café crme");
    }

    #[test]
    fn spanish_list_has_the_standard_size() {
        let sw = StopWords::spanish();
        assert_eq!(sw.len(), 313);
        assert!(sw.contains("el"));
        assert!(sw.contains("también"));
        assert!(!sw.contains("operador"));
    }

    #[test]
    fn stop_words_load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# custom list\nclase\n\nProfesor").unwrap();
        let sw = StopWords::from_file(file.path()).unwrap();
        assert_eq!(sw.len(), 2);
        assert!(sw.contains("profesor"));
    }
}
