use std::collections::HashMap;

// ---------------------------------------------------------------------------
// N-gram frequency table
// ---------------------------------------------------------------------------

/// One contiguous token window and how often it occurs in the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NGramEntry {
    pub tokens: Vec<String>,
    pub frequency: usize,
}

impl NGramEntry {
    /// Tokens joined with single spaces, the form used for lookups.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// The `top_k` most frequent `n`-grams across all `cleaned_texts`.
///
/// Each text is split on whitespace and contributes every window of `n`
/// consecutive tokens; texts shorter than `n` contribute nothing. Counts are
/// pooled across the whole corpus. Equal frequencies keep the order in which
/// the n-grams were first seen during one left-to-right pass over the texts.
/// `n == 0` or `top_k == 0` yields an empty table.
pub fn top_ngrams<S: AsRef<str>>(cleaned_texts: &[S], n: usize, top_k: usize) -> Vec<NGramEntry> {
    if n == 0 || top_k == 0 {
        log::warn!("Ignoring n-gram request with n={n}, top_k={top_k}");
        return Vec::new();
    }

    let mut counts: HashMap<Vec<&str>, usize> = HashMap::new();
    let mut first_seen: Vec<Vec<&str>> = Vec::new();

    for text in cleaned_texts {
        let tokens: Vec<&str> = text.as_ref().split_whitespace().collect();
        for window in tokens.windows(n) {
            let count = counts.entry(window.to_vec()).or_insert_with(|| {
                first_seen.push(window.to_vec());
                0
            });
            *count += 1;
        }
    }

    let mut entries: Vec<NGramEntry> = first_seen
        .into_iter()
        .map(|gram| NGramEntry {
            frequency: counts[&gram],
            tokens: gram.into_iter().map(str::to_string).collect(),
        })
        .collect();

    // Stable: ties stay in first-seen order.
    entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    entries.truncate(top_k);
    entries
}

// ---------------------------------------------------------------------------
// Response lookup
// ---------------------------------------------------------------------------

/// Raw responses whose cleaned text contains `ngram_text`.
///
/// Plain substring containment on the space-joined cleaned text, so a short
/// n-gram can match across a token boundary ("do o" inside "buscando otro").
/// Cleaned and raw texts are paired by position.
pub fn response_lookup<'a, C>(cleaned_texts: &[C], raw_texts: &[&'a str], ngram_text: &str) -> Vec<&'a str>
where
    C: AsRef<str>,
{
    cleaned_texts
        .iter()
        .zip(raw_texts.iter().copied())
        .filter(|(cleaned, _)| cleaned.as_ref().contains(ngram_text))
        .map(|(_, raw)| raw)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[NGramEntry]) -> Vec<(String, usize)> {
        entries.iter().map(|e| (e.text(), e.frequency)).collect()
    }

    #[test]
    fn counts_overlapping_windows() {
        let grams = top_ngrams(&["a b a b"], 2, 5);
        assert_eq!(
            pairs(&grams),
            vec![("a b".to_string(), 2), ("b a".to_string(), 1)]
        );
        assert_eq!(grams[0].tokens, vec!["a", "b"]);
    }

    #[test]
    fn counts_pool_across_texts_but_windows_do_not_span_them() {
        let grams = top_ngrams(&["clase práctica", "práctica útil", "clase práctica"], 2, 10);
        assert_eq!(
            pairs(&grams),
            vec![
                ("clase práctica".to_string(), 2),
                ("práctica útil".to_string(), 1)
            ]
        );
    }

    #[test]
    fn ties_keep_first_seen_order_and_top_k_truncates() {
        let grams = top_ngrams(&["zeta alfa", "beta gama", "alfa beta"], 1, 3);
        assert_eq!(
            pairs(&grams),
            vec![
                ("alfa".to_string(), 2),
                ("beta".to_string(), 2),
                ("zeta".to_string(), 1)
            ]
        );
    }

    #[test]
    fn short_texts_and_degenerate_parameters_yield_nothing() {
        assert!(top_ngrams(&["solo dos"], 3, 5).is_empty());
        assert!(top_ngrams(&["uno dos tres"], 0, 5).is_empty());
        assert!(top_ngrams(&["uno dos tres"], 1, 0).is_empty());
        assert!(top_ngrams::<&str>(&[], 2, 5).is_empty());
    }

    #[test]
    fn lookup_matches_substrings_across_token_boundaries() {
        let cleaned = ["buscando otro", "clase práctica", ""];
        let raw = ["Buscando otro enfoque", "La clase práctica", "..."];
        assert_eq!(response_lookup(&cleaned, &raw, "do o"), vec!["Buscando otro enfoque"]);
        assert_eq!(response_lookup(&cleaned, &raw, "clase práctica"), vec!["La clase práctica"]);
        assert!(response_lookup(&cleaned, &raw, "nada").is_empty());
    }
}
