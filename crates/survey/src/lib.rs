#![forbid(unsafe_code)]

//! Survey public facade crate.
//!
//! Re-exports the element tree, drag-and-drop controllers, question models,
//! localization and reactive primitives from the internal crates, and offers
//! a prelude for day-to-day usage.

use std::fmt;

// --- Model re-exports ------------------------------------------------------

pub use survey_core::{
    Element, ElementId, ElementKind, LayoutType, Row, RowId, RowRef, SurveyModel,
};

// --- Drag and drop re-exports ----------------------------------------------

pub use survey_core::{
    DragDropAllowEvent, DragDropAllowHook, DragDropInfo, DragOverNode, DropTargetNode,
    MoveDirection, RankingArea, RankingDragDrop, RankingDropTarget,
};

// --- Question re-exports ---------------------------------------------------

pub use survey_core::{
    ActionKind, ChoiceDisplayValueResolver, ChoicesLazyLoadHandler, DisplayValueResponder,
    FocusTarget, ItemValue, LazyLoadRequest, LazyLoadResponder, ListAction, MultiSelectListModel,
    NONE_VALUE, OTHER_VALUE, RankingQuestion, SELECT_ALL_ID, SelectAllState, TagboxQuestion,
};

// --- Settings and errors ---------------------------------------------------

pub use survey_core::{
    DEFAULT_LAZY_LOAD_PAGE_SIZE, DragDropError, ModelError, SettingsError, SurveySettings,
};

// --- Localization and reactive re-exports ----------------------------------

pub use survey_i18n::{I18nError, StringCatalog, default_catalog};
pub use survey_reactive::{BatchScope, Observable, Subscription};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for survey hosts.
#[derive(Debug)]
pub enum Error {
    /// A drag gesture was misused (busy page, unknown choice, ...).
    DragDrop(DragDropError),
    /// An edit of the element tree was invalid.
    Model(ModelError),
    /// Settings could not be read or failed validation.
    Settings(SettingsError),
    /// A strict string lookup failed.
    I18n(I18nError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DragDrop(err) => write!(f, "drag and drop: {err}"),
            Self::Model(err) => write!(f, "survey model: {err}"),
            Self::Settings(err) => write!(f, "settings: {err}"),
            Self::I18n(err) => write!(f, "localization: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DragDrop(err) => Some(err),
            Self::Model(err) => Some(err),
            Self::Settings(err) => Some(err),
            Self::I18n(err) => Some(err),
        }
    }
}

impl From<DragDropError> for Error {
    fn from(err: DragDropError) -> Self {
        Self::DragDrop(err)
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

impl From<SettingsError> for Error {
    fn from(err: SettingsError) -> Self {
        Self::Settings(err)
    }
}

impl From<I18nError> for Error {
    fn from(err: I18nError) -> Self {
        Self::I18n(err)
    }
}

/// Standard result type for survey APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Convenience ------------------------------------------------------------

/// Drag an existing element to a new position in one call.
///
/// Starts a gesture on the element's page with a copy of it, points it at
/// `destination` and commits. Returns the element now standing in for
/// `source`, or `None` when the move was rejected.
pub fn move_element_to(
    survey: &mut SurveyModel,
    source: ElementId,
    destination: ElementId,
    is_bottom: bool,
) -> Result<Option<ElementId>> {
    let page = survey
        .page_of(source)
        .ok_or(ModelError::UnknownElement(source))?;
    let target = survey.copy_element(source)?;
    survey.drag_drop_start(page, Some(source), target, None)?;
    if !survey.drag_drop_move_to(page, Some(destination), is_bottom, false) {
        survey.drag_drop_finish(page, true);
        tracing::debug!(target: "survey", source = %source, destination = %destination, "move rejected");
        return Ok(None);
    }
    Ok(survey.drag_drop_finish(page, false))
}

/// Load and validate settings from a TOML file.
#[cfg(feature = "settings-config")]
pub fn load_settings(path: impl AsRef<std::path::Path>) -> Result<SurveySettings> {
    let settings = SurveySettings::from_toml_file(path)?;
    tracing::info!(target: "survey", locale = %settings.locale, "settings loaded");
    Ok(settings)
}

/// Install a JSON log subscriber filtered by the `SURVEY_LOG` environment
/// variable (default `warn`). Returns `false` if a global subscriber was
/// already set.
#[cfg(feature = "tracing-json")]
pub fn init_tracing() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("SURVEY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DragOverNode, ElementId, Error, ItemValue, RankingArea, RankingDragDrop, RankingQuestion,
        Result, SurveyModel, SurveySettings, TagboxQuestion,
    };

    pub use crate::{core, i18n, reactive};
}

pub use survey_core as core;
pub use survey_i18n as i18n;
pub use survey_reactive as reactive;
