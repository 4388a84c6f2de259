//! Localized Text
//!
//! Flat key/value string tables loaded from `lang/<code>.json`. A missing
//! key resolves to the key itself so untranslated text shows up on screen
//! instead of failing.

use log::{info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Language used when the configured one cannot be loaded
pub const FALLBACK_LANGUAGE: &str = "en";

#[derive(thiserror::Error, Debug)]
pub enum LocaleError {
    #[error("unable to read string table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid string table: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Strings {
    table: HashMap<String, String>,
}

impl Strings {
    /// Builds a table directly (used for tests and empty fallbacks)
    pub fn from_map(table: HashMap<String, String>) -> Self {
        Strings { table }
    }

    /// Reads `<dir>/<language>.json`
    pub fn load_file(dir: &Path, language: &str) -> Result<Self, LocaleError> {
        let json = fs::read_to_string(dir.join(format!("{}.json", language)))?;
        let table: HashMap<String, String> = serde_json::from_str(&json)?;
        Ok(Self::from_map(table))
    }

    /// Loads `language`, falling back to English and then to an empty table
    pub fn load(dir: &Path, language: &str) -> Self {
        match Self::load_file(dir, language) {
            Ok(strings) => {
                info!("loaded {} strings for '{}'", strings.table.len(), language);
                return strings;
            }
            Err(err) => warn!("language '{}' unavailable: {}", language, err),
        }

        if language != FALLBACK_LANGUAGE {
            if let Ok(strings) = Self::load_file(dir, FALLBACK_LANGUAGE) {
                return strings;
            }
        }

        warn!("no string table found in {}, showing raw keys", dir.display());
        Self::from_map(HashMap::new())
    }

    /// Looks up `key`, returning the key itself when untranslated
    pub fn get<'s>(&'s self, key: &'s str) -> &'s str {
        self.table.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// Language codes with a string table in `dir`, sorted
pub fn available_languages(dir: &Path) -> Vec<String> {
    let mut codes: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
                .collect()
        })
        .unwrap_or_default();

    codes.sort();
    if codes.is_empty() {
        codes.push(FALLBACK_LANGUAGE.to_string());
    }
    codes
}
