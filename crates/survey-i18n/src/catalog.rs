#![forbid(unsafe_code)]

//! String catalog with locale fallback.
//!
//! Lookups walk a fallback chain: the exact tag (`pt-BR`), then its
//! language prefix (`pt`), then the catalog's default locale. A key missing
//! from a partial translation therefore resolves to the default locale's
//! text instead of failing.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

/// Errors from strict catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// No strings are registered for the locale or any of its fallbacks.
    UnknownLocale(String),
    /// The key exists in no locale of the fallback chain.
    MissingKey { locale: String, key: String },
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLocale(locale) => write!(f, "unknown locale: {locale}"),
            Self::MissingKey { locale, key } => {
                write!(f, "missing string '{key}' for locale '{locale}'")
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// Strings registered for one locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleStrings {
    strings: HashMap<String, String>,
}

impl LocaleStrings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a string.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocaleStrings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut strings = Self::new();
        for (k, v) in iter {
            strings.insert(k, v);
        }
        strings
    }
}

/// Per-locale translation coverage relative to the union of all keys.
#[derive(Debug, Clone)]
pub struct LocaleCoverage {
    pub locale: String,
    pub present: usize,
    pub missing: Vec<String>,
    pub coverage_percent: f64,
}

/// Coverage of every registered locale.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub total_keys: usize,
    pub locales: Vec<LocaleCoverage>,
}

/// Catalog of locales with a default fallback.
#[derive(Debug, Clone)]
pub struct StringCatalog {
    locales: BTreeMap<String, LocaleStrings>,
    names: BTreeMap<String, String>,
    default_locale: String,
}

impl Default for StringCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StringCatalog {
    /// Empty catalog whose default locale is `en`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locales: BTreeMap::new(),
            names: BTreeMap::new(),
            default_locale: "en".to_string(),
        }
    }

    /// Change the locale used as the last fallback.
    pub fn set_default_locale(&mut self, locale: impl Into<String>) {
        self.default_locale = locale.into();
    }

    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Register (or replace) the strings of a locale.
    pub fn add_locale(&mut self, locale: impl Into<String>, strings: LocaleStrings) {
        self.locales.insert(locale.into(), strings);
    }

    /// Register the native display name of a locale, e.g. `pt` -> `português`.
    pub fn set_locale_name(&mut self, locale: impl Into<String>, name: impl Into<String>) {
        self.names.insert(locale.into(), name.into());
    }

    /// Native display names keyed by locale code.
    #[must_use]
    pub fn locale_names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    /// Registered locale codes in sorted order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    /// Locales consulted for `locale`, most specific first, without duplicates.
    #[must_use]
    pub fn fallback_chain(&self, locale: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::with_capacity(3);
        let mut push = |code: &str| {
            if !code.is_empty() && !chain.iter().any(|c| c == code) {
                chain.push(code.to_string());
            }
        };
        push(locale);
        if let Some((lang, _)) = locale.split_once(['-', '_']) {
            push(lang);
        }
        push(&self.default_locale);
        chain
    }

    /// Resolve `key` through the fallback chain of `locale`.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.fallback_chain(locale)
            .iter()
            .filter_map(|code| self.locales.get(code))
            .find_map(|strings| strings.get(key))
    }

    /// Like [`get`](Self::get) but reports why a lookup failed.
    pub fn try_get(&self, locale: &str, key: &str) -> Result<&str, I18nError> {
        let chain = self.fallback_chain(locale);
        if !chain.iter().any(|code| self.locales.contains_key(code)) {
            return Err(I18nError::UnknownLocale(locale.to_string()));
        }
        self.get(locale, key).ok_or_else(|| I18nError::MissingKey {
            locale: locale.to_string(),
            key: key.to_string(),
        })
    }

    /// Resolve `key` and substitute `{name}` placeholders.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        let template = self.get(locale, key)?;
        Some(interpolate(template, |name| {
            args.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }))
    }

    /// Resolve `key` and substitute `{0}`, `{1}`, ... placeholders.
    #[must_use]
    pub fn format_positional(&self, locale: &str, key: &str, args: &[&str]) -> Option<String> {
        let template = self.get(locale, key)?;
        Some(interpolate(template, |name| {
            name.parse::<usize>().ok().and_then(|i| args.get(i).copied())
        }))
    }

    /// Coverage of each locale against the union of all registered keys.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let mut all_keys: Vec<&str> = self.locales.values().flat_map(|s| s.keys()).collect();
        all_keys.sort_unstable();
        all_keys.dedup();
        let total_keys = all_keys.len();

        let locales = self
            .locales
            .iter()
            .map(|(locale, strings)| {
                let missing: Vec<String> = all_keys
                    .iter()
                    .filter(|k| strings.get(k).is_none())
                    .map(|k| (*k).to_string())
                    .collect();
                let present = total_keys - missing.len();
                let coverage_percent = if total_keys == 0 {
                    100.0
                } else {
                    present as f64 * 100.0 / total_keys as f64
                };
                LocaleCoverage {
                    locale: locale.clone(),
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            total_keys,
            locales,
        }
    }
}

/// Single-pass placeholder substitution. Replacement text is never rescanned;
/// unknown or unterminated placeholders are copied verbatim.
fn interpolate<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match lookup(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
