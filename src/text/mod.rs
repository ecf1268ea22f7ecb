/// Text layer: free-text cleanup and n-gram statistics.
///
/// ```text
///   raw answer ──► normalize ──► cleaned text ──► ngram ──► top n-grams
///                      ▲                              │
///                  StopWords                          ▼
///                                            response lookup
/// ```

pub mod ngram;
pub mod normalize;

pub use ngram::{response_lookup, top_ngrams, NGramEntry};
pub use normalize::{normalize, StopWords};
