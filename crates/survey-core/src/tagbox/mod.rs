#![forbid(unsafe_code)]

//! Tagbox: a multi-select dropdown over static or lazily loaded choices.
//!
//! - [`question`]: the question model, answer, popup state and lazy paging.
//! - [`list`]: the popup list view with select-all, none and other entries.
//! - [`lazy`]: host hooks for paged loading and display-text lookup.

pub mod lazy;
pub mod list;
pub mod question;

pub use lazy::{
    ChoiceDisplayValueResolver, ChoicesLazyLoadHandler, DisplayValueResponder, LazyLoadRequest,
    LazyLoadResponder,
};
pub use list::{ActionKind, ListAction, MultiSelectListModel};
pub use question::{
    FocusTarget, NONE_VALUE, OTHER_VALUE, SELECT_ALL_ID, SelectAllState, TagboxQuestion,
};
