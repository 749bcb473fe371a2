#![forbid(unsafe_code)]

//! Built-in string tables.

mod english;
mod portuguese;

use crate::catalog::{LocaleStrings, StringCatalog};

/// The complete English table.
#[must_use]
pub fn english() -> LocaleStrings {
    english::STRINGS.iter().copied().collect()
}

/// The Portuguese table. Keys it lacks fall back to English through the catalog.
#[must_use]
pub fn portuguese() -> LocaleStrings {
    portuguese::STRINGS.iter().copied().collect()
}

/// Catalog with every built-in locale registered and `en` as default.
#[must_use]
pub fn default_catalog() -> StringCatalog {
    let mut catalog = StringCatalog::new();
    catalog.add_locale("en", english());
    catalog.set_locale_name("en", "english");
    catalog.add_locale("pt", portuguese());
    catalog.set_locale_name("pt", "português");
    catalog
}
