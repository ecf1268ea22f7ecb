use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Environment variable pointing at a JSON config file.
pub const CONFIG_ENV: &str = "OPDASH_CONFIG";
/// Config file picked up from the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "opdash.json";

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Performance dataset loaded at startup.
    pub dataset_path: Option<PathBuf>,
    /// Survey export loaded at startup.
    pub survey_path: Option<PathBuf>,
    /// How many operators and machines start selected.
    pub default_selection: usize,
    /// N-gram sizes charted for the survey.
    pub ngram_sizes: Vec<usize>,
    pub ngram_top_k: usize,
    /// Replaces the built-in Spanish stop words.
    pub stopwords_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            survey_path: None,
            default_selection: 2,
            ngram_sizes: vec![2, 3],
            ngram_top_k: 15,
            stopwords_path: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// `$OPDASH_CONFIG`, else `./opdash.json`, else defaults.
    pub fn discover() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            log::info!("Reading config from {path} (${CONFIG_ENV})");
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            log::info!("Reading config from {}", local.display());
            return Self::from_file(local);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"dataset_path": "data_weekly_processed.csv", "ngram_top_k": 10}}"#).unwrap();
        let config = DashboardConfig::from_file(file.path()).unwrap();

        assert_eq!(config.dataset_path, Some(PathBuf::from("data_weekly_processed.csv")));
        assert_eq!(config.ngram_top_k, 10);
        assert_eq!(config.ngram_sizes, vec![2, 3]);
        assert_eq!(config.default_selection, 2);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(DashboardConfig::from_file(file.path()).is_err());
    }
}
