//! Localization resolver.

use std::collections::HashMap;

use academy_core::error::GameError;
use academy_core::language::Language;
use tracing::debug;

const EN_TABLE: &str = include_str!("../locales/en.yaml");
const ES_TABLE: &str = include_str!("../locales/es.yaml");

/// Resolves display strings by key and language.
///
/// Lookups never fail: a key missing from the requested language falls back
/// to the default language, and a key missing everywhere renders as `[key]`.
#[derive(Debug, Clone)]
pub struct Localizer {
    fallback: Language,
    tables: HashMap<Language, HashMap<String, String>>,
}

impl Localizer {
    /// Creates an empty localizer. Every lookup renders as `[key]` until
    /// tables are added.
    #[must_use]
    pub fn new(fallback: Language) -> Self {
        Self {
            fallback,
            tables: HashMap::new(),
        }
    }

    /// Builds a localizer from the string tables compiled into this crate.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if an embedded table is not a flat
    /// YAML map of strings.
    pub fn builtin() -> Result<Self, GameError> {
        Self::new(Language::default())
            .with_table(Language::En, EN_TABLE)?
            .with_table(Language::Es, ES_TABLE)
    }

    /// Adds (or extends) the table for `language` from a flat YAML map.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if `yaml` does not parse.
    pub fn with_table(mut self, language: Language, yaml: &str) -> Result<Self, GameError> {
        let entries: HashMap<String, String> = serde_yaml::from_str(yaml).map_err(|e| {
            GameError::Validation(format!("invalid {language} string table: {e}"))
        })?;
        self.tables.entry(language).or_default().extend(entries);
        Ok(self)
    }

    /// Returns the fallback language.
    #[must_use]
    pub fn fallback(&self) -> Language {
        self.fallback
    }

    /// Resolves `key` in `language`.
    #[must_use]
    pub fn resolve(&self, key: &str, language: Language) -> String {
        self.lookup(key, language)
            .or_else(|| self.lookup(key, self.fallback))
            .map_or_else(
                || {
                    debug!(key, %language, "missing translation");
                    format!("[{key}]")
                },
                str::to_owned,
            )
    }

    /// Resolves `key` and substitutes each `{name}` placeholder with its
    /// argument.
    #[must_use]
    pub fn resolve_with(&self, key: &str, language: Language, args: &[(&str, &str)]) -> String {
        let mut text = self.resolve(key, language);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    fn lookup(&self, key: &str, language: Language) -> Option<&str> {
        self.tables
            .get(&language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }
}
