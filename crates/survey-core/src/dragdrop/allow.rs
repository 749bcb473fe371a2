#![forbid(unsafe_code)]

//! Host veto over drag moves.

use crate::element::ElementId;
use crate::survey::SurveyModel;

/// Description of a candidate move handed to the host.
///
/// `insert_before` and `insert_after` are the siblings the target would sit
/// between once dropped: for a drop above the destination, `insert_before`
/// is the destination itself and `insert_after` its previous sibling; for a
/// drop below, `insert_after` is the destination and `insert_before` its
/// next sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragDropAllowEvent {
    /// Set to `false` to veto the move.
    pub allow: bool,
    pub target: ElementId,
    pub source: Option<ElementId>,
    /// Container that would receive the target.
    pub parent: Option<ElementId>,
    pub insert_after: Option<ElementId>,
    pub insert_before: Option<ElementId>,
}

/// Host callback consulted before a drag move is shown.
pub trait DragDropAllowHook {
    fn allow(&self, survey: &SurveyModel, event: &mut DragDropAllowEvent);
}

impl<F> DragDropAllowHook for F
where
    F: Fn(&SurveyModel, &mut DragDropAllowEvent),
{
    fn allow(&self, survey: &SurveyModel, event: &mut DragDropAllowEvent) {
        self(survey, event);
    }
}
