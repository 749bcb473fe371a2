#![forbid(unsafe_code)]

//! Error types for survey-core.
//!
//! Rejected drag moves are not errors: `drag_drop_move_to` reports them as
//! `false` and `drag_drop_finish` as `None`. Errors cover misuse of the API
//! (unknown ids, a second gesture on a busy page) and invalid tree edits.

use std::fmt;

use crate::element::ElementId;

/// Errors raised by drag-and-drop controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragDropError {
    /// A gesture is already in progress on this page; finish or cancel it first.
    SessionActive { page: ElementId },
    /// The id does not name an element of this survey.
    UnknownElement(ElementId),
    /// The id names an element that is not a page.
    NotAPage(ElementId),
    /// A ranking gesture is already in progress on this question.
    GestureActive,
    /// The drag target must be detached from the tree when the gesture starts.
    TargetAttached(ElementId),
    /// A moved element must be placed in the survey when the gesture starts.
    SourceDetached(ElementId),
    /// The dragged value is not one of the question's choices.
    UnknownChoice,
}

impl fmt::Display for DragDropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionActive { page } => {
                write!(f, "a drag gesture is already active on page {page}")
            }
            Self::UnknownElement(id) => write!(f, "unknown element {id}"),
            Self::NotAPage(id) => write!(f, "element {id} is not a page"),
            Self::GestureActive => write!(f, "a ranking drag gesture is already active"),
            Self::TargetAttached(id) => {
                write!(f, "drag target {id} is already placed in the survey")
            }
            Self::SourceDetached(id) => {
                write!(f, "drag source {id} is not placed in the survey")
            }
            Self::UnknownChoice => write!(f, "dragged value is not a choice of this question"),
        }
    }
}

impl std::error::Error for DragDropError {}

/// Errors raised by structural edits of the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The id does not name an element of this survey.
    UnknownElement(ElementId),
    /// Children can only be added to pages and panels.
    NotAContainer(ElementId),
    /// Pages cannot be nested.
    PageNotAllowed(ElementId),
    /// The panel would end up inside itself.
    WouldCreateCycle { panel: ElementId, container: ElementId },
    /// Another placed element already uses the name.
    DuplicateName(String),
    /// A running drag gesture still refers to the element.
    DragInProgress(ElementId),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElement(id) => write!(f, "unknown element {id}"),
            Self::NotAContainer(id) => write!(f, "element {id} cannot hold children"),
            Self::PageNotAllowed(id) => write!(f, "page {id} cannot be placed inside a container"),
            Self::WouldCreateCycle { panel, container } => {
                write!(f, "panel {panel} cannot be placed inside {container}")
            }
            Self::DuplicateName(name) => write!(f, "an element named '{name}' already exists"),
            Self::DragInProgress(id) => write!(f, "element {id} is part of a running drag gesture"),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_element() {
        let err = DragDropError::SessionActive { page: ElementId(3) };
        assert_eq!(err.to_string(), "a drag gesture is already active on page #3");
        let err = ModelError::WouldCreateCycle {
            panel: ElementId(1),
            container: ElementId(2),
        };
        assert!(err.to_string().contains("#1"));
    }
}
