#![forbid(unsafe_code)]

//! State of one page drag gesture.

use crate::element::ElementId;

/// Captured at `drag_drop_start`, updated by every `drag_drop_move_to` and
/// dropped by `drag_drop_finish`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragDropInfo {
    pub(crate) source: Option<ElementId>,
    pub(crate) target: ElementId,
    pub(crate) destination: Option<ElementId>,
    pub(crate) is_bottom: bool,
    pub(crate) is_edge: bool,
    pub(crate) nested_panel_depth: Option<usize>,
    pub(crate) design_v2: bool,
}

impl DragDropInfo {
    pub(crate) fn new(
        source: Option<ElementId>,
        target: ElementId,
        nested_panel_depth: Option<usize>,
        design_v2: bool,
    ) -> Self {
        Self {
            source,
            target,
            destination: None,
            is_bottom: false,
            is_edge: false,
            nested_panel_depth,
            design_v2,
        }
    }

    /// Element being moved; `None` when a new element is dropped in.
    #[must_use]
    pub fn source(&self) -> Option<ElementId> {
        self.source
    }

    /// Element placed at the drop position when the gesture finishes.
    #[must_use]
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Element or container currently under the pointer.
    #[must_use]
    pub fn destination(&self) -> Option<ElementId> {
        self.destination
    }

    /// Drop after the destination instead of before it.
    #[must_use]
    pub fn is_bottom(&self) -> bool {
        self.is_bottom
    }

    /// Drop beside a panel instead of inside it.
    #[must_use]
    pub fn is_edge(&self) -> bool {
        self.is_edge
    }

    /// Deepest panel level the target may be dropped into; `None` means any.
    #[must_use]
    pub fn nested_panel_depth(&self) -> Option<usize> {
        self.nested_panel_depth
    }

    /// Editor row heuristics were enabled when the gesture started.
    #[must_use]
    pub fn is_design_v2(&self) -> bool {
        self.design_v2
    }
}
