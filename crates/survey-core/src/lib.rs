#![forbid(unsafe_code)]

//! Survey Core
//!
//! Headless model of a survey's interactive structure: pages, panels and
//! questions laid out in rows, plus the controllers that rearrange them.
//!
//! # Key Components
//!
//! - [`SurveyModel`] - Arena of pages, panels and questions with derived rows
//! - [`dragdrop`] - Page drag and drop, ranking drag and drop
//! - [`RankingQuestion`] - Ranked list and unranked pool of choices
//! - [`tagbox`] - Multi-select dropdown with lazy-loaded choices
//! - [`SurveySettings`] - Survey-wide tunables resolved once per gesture
//!
//! # Threading
//!
//! Everything here is single-threaded: state is shared through
//! [`survey_reactive::Observable`] handles (`Rc`-based) and mutated from UI
//! event handlers one at a time.

pub mod dragdrop;
pub mod element;
pub mod error;
pub mod item_value;
pub mod panel;
pub mod ranking;
pub mod settings;
pub mod survey;
pub mod tagbox;

pub use dragdrop::{
    DragDropAllowEvent, DragDropAllowHook, DragDropInfo, DragOverNode, DropTargetNode,
    MoveDirection, RankingArea, RankingDragDrop, RankingDropTarget,
};
pub use element::{Element, ElementId, ElementKind, LayoutType};
pub use error::{DragDropError, ModelError};
pub use item_value::ItemValue;
pub use panel::{Row, RowId, RowRef};
pub use ranking::RankingQuestion;
pub use settings::{DEFAULT_LAZY_LOAD_PAGE_SIZE, SettingsError, SurveySettings};
pub use survey::SurveyModel;
pub use tagbox::{
    ActionKind, ChoiceDisplayValueResolver, ChoicesLazyLoadHandler, DisplayValueResponder,
    FocusTarget, LazyLoadRequest, LazyLoadResponder, ListAction, MultiSelectListModel,
    NONE_VALUE, OTHER_VALUE, SELECT_ALL_ID, SelectAllState, TagboxQuestion,
};
