#![forbid(unsafe_code)]

//! Survey-wide settings.
//!
//! A [`SurveySettings`] value is owned by the [`SurveyModel`](crate::SurveyModel)
//! and read once when a drag session or a question is created, so changing
//! settings mid-gesture never affects the gesture in flight.
//!
//! # Loading
//!
//! ```toml
//! support_creator_v2 = true
//! lazy_load_page_size = 30
//! locale = "pt"
//! ```
//!
//! ```rust,ignore
//! let settings = SurveySettings::from_toml_file("survey.toml")?;
//! ```

#[cfg(feature = "settings-config")]
use std::path::Path;

#[cfg(feature = "settings-config")]
use serde::{Deserialize, Serialize};

/// Default number of choices requested per lazy-load page.
pub const DEFAULT_LAZY_LOAD_PAGE_SIZE: usize = 25;

/// Tunables shared by every element of a survey.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "settings-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "settings-config", serde(default))]
pub struct SurveySettings {
    /// Enables the editor row heuristics and line-break repair while the
    /// survey is in design mode.
    pub support_creator_v2: bool,

    /// Default for tagbox questions that do not set `close_on_select`.
    pub tagbox_close_on_select: bool,

    /// Default lazy-load page size for tagbox questions.
    pub lazy_load_page_size: usize,

    /// Locale used for built-in item titles.
    pub locale: String,
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            support_creator_v2: false,
            tagbox_close_on_select: false,
            lazy_load_page_size: DEFAULT_LAZY_LOAD_PAGE_SIZE,
            locale: "en".to_string(),
        }
    }
}

impl SurveySettings {
    /// Load from a TOML string.
    #[cfg(feature = "settings-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(s).map_err(SettingsError::Toml)?;
        settings.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "settings-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SettingsError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "settings-config")]
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(s).map_err(SettingsError::Json)?;
        settings.validated()
    }

    /// Check every field. An empty list means the settings are usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.lazy_load_page_size == 0 {
            errors.push("lazy_load_page_size must be > 0".into());
        }
        if self.locale.trim().is_empty() {
            errors.push("locale must not be empty".into());
        }
        errors
    }

    /// `self` if [`validate`](Self::validate) reports nothing.
    pub fn validated(self) -> Result<Self, SettingsError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SettingsError::Validation(errors))
        }
    }
}

/// Errors from loading or validating settings.
#[derive(Debug)]
pub enum SettingsError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "settings-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "settings-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "settings-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "settings-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "invalid settings: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "settings-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "settings-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = SurveySettings::default();
        assert!(settings.validate().is_empty());
        assert!(!settings.support_creator_v2);
        assert_eq!(settings.lazy_load_page_size, 25);
        assert_eq!(settings.locale, "en");
    }

    #[test]
    fn zero_page_size_rejected() {
        let settings = SurveySettings {
            lazy_load_page_size: 0,
            locale: " ".into(),
            ..SurveySettings::default()
        };
        let errors = settings.clone().validate();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            settings.validated(),
            Err(SettingsError::Validation(v)) if v.len() == 2
        ));
    }

    #[cfg(feature = "settings-config")]
    #[test]
    fn toml_partial_uses_defaults() {
        let settings = SurveySettings::from_toml_str("support_creator_v2 = true\nlocale = \"pt\"\n")
            .expect("valid toml");
        assert!(settings.support_creator_v2);
        assert_eq!(settings.locale, "pt");
        assert_eq!(settings.lazy_load_page_size, 25);
    }

    #[cfg(feature = "settings-config")]
    #[test]
    fn json_validation_runs() {
        let err = SurveySettings::from_json_str(r#"{"lazy_load_page_size":0}"#).unwrap_err();
        assert!(err.to_string().contains("lazy_load_page_size"));
    }

    #[cfg(feature = "settings-config")]
    #[test]
    fn toml_file_roundtrip() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "tagbox_close_on_select = true").expect("write");
        let settings = SurveySettings::from_toml_file(file.path()).expect("load");
        assert!(settings.tagbox_close_on_select);
    }

    #[cfg(feature = "settings-config")]
    #[test]
    fn missing_file_is_io_error() {
        let err = SurveySettings::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
