#![forbid(unsafe_code)]

//! Localization for survey UI strings.
//!
//! Provides a key-based [`StringCatalog`] with locale fallback chains and
//! placeholder interpolation (`{0}` positional, `{name}` named), plus the
//! built-in string tables shipped with the survey model.
//!
//! The crate has no dependency on the survey model itself, so tables can be
//! extended or replaced by hosts without touching `survey-core`.

pub mod catalog;
pub mod locales;

pub use catalog::{CoverageReport, I18nError, LocaleCoverage, LocaleStrings, StringCatalog};
pub use locales::default_catalog;
