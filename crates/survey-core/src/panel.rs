#![forbid(unsafe_code)]

//! Rows: the derived visual grouping of a container's children.
//!
//! A container stores its children as one flat ordered list. Rows are a view
//! over that list: the first child always opens a row and every later child
//! whose line-break flag is set opens another. Rows are rebuilt after every
//! structural change. While a drag gesture is active the page controller
//! edits rows directly to show the dragged element at its candidate
//! position; those edits are discarded when the gesture ends.

use crate::element::ElementId;
use crate::survey::SurveyModel;

/// Identity of a row that survives insertion and removal of other rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(pub(crate) u64);

/// A horizontal group of elements inside one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub(crate) id: RowId,
    pub(crate) elements: Vec<ElementId>,
}

impl Row {
    #[must_use]
    pub fn id(&self) -> RowId {
        self.id
    }

    #[must_use]
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn contains(&self, element: ElementId) -> bool {
        self.elements.contains(&element)
    }

    #[must_use]
    pub fn position(&self, element: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| *e == element)
    }
}

/// Locates a row: the container holding it plus its stable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRef {
    pub container: ElementId,
    pub row: RowId,
}

/// Group `elements` into rows. `starts_new_line` reports each element's
/// line-break flag; `next_id` supplies fresh row ids.
pub(crate) fn build_rows(
    elements: &[ElementId],
    starts_new_line: impl Fn(ElementId) -> bool,
    next_id: &mut u64,
) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    for &element in elements {
        match rows.last_mut() {
            Some(row) if !starts_new_line(element) => row.elements.push(element),
            _ => {
                *next_id += 1;
                rows.push(Row {
                    id: RowId(*next_id),
                    elements: vec![element],
                });
            }
        }
    }
    rows
}

impl SurveyModel {
    /// Find the row holding `element`, searching `scope`'s own rows first
    /// and then every nested panel. Pages are never inside a row.
    #[must_use]
    pub fn find_row(&self, scope: ElementId, element: ElementId) -> Option<RowRef> {
        let container = self.element(scope)?;
        if let Some(row) = container.rows.iter().find(|r| r.contains(element)) {
            return Some(RowRef {
                container: scope,
                row: row.id,
            });
        }
        container
            .elements
            .iter()
            .filter(|child| self.element(**child).is_some_and(|e| e.is_panel()))
            .find_map(|panel| self.find_row(*panel, element))
    }

    /// The row named by `row_ref`, if it still exists.
    #[must_use]
    pub fn row(&self, row_ref: RowRef) -> Option<&Row> {
        self.element(row_ref.container)?
            .rows
            .iter()
            .find(|r| r.id == row_ref.row)
    }

    /// Position of the row within its container's row list.
    #[must_use]
    pub fn row_index(&self, row_ref: RowRef) -> Option<usize> {
        self.element(row_ref.container)?
            .rows
            .iter()
            .position(|r| r.id == row_ref.row)
    }

    pub(crate) fn row_mut(&mut self, row_ref: RowRef) -> Option<&mut Row> {
        self.element_mut(row_ref.container)?
            .rows
            .iter_mut()
            .find(|r| r.id == row_ref.row)
    }

    pub(crate) fn new_row(&mut self, elements: Vec<ElementId>) -> Row {
        self.next_row_id += 1;
        Row {
            id: RowId(self.next_row_id),
            elements,
        }
    }

    /// Remove `element` from the row; a row left empty is dropped.
    pub(crate) fn remove_from_row(&mut self, element: ElementId, row_ref: Option<RowRef>) {
        let Some(row_ref) = row_ref else {
            return;
        };
        let now_empty = match self.row_mut(row_ref) {
            Some(row) => match row.position(element) {
                Some(index) => {
                    row.elements.remove(index);
                    row.elements.is_empty()
                }
                None => return,
            },
            None => return,
        };
        if now_empty
            && let Some(container) = self.element_mut(row_ref.container)
        {
            container.rows.retain(|r| r.id != row_ref.row);
        }
    }

    /// Regroup the children of `container` from their line-break flags.
    pub(crate) fn rebuild_rows(&mut self, container: ElementId) {
        let Some(elements) = self.element(container).map(|c| c.elements.clone()) else {
            return;
        };
        let mut next_id = self.next_row_id;
        let rows = build_rows(
            &elements,
            |id| self.element(id).is_some_and(|e| e.start_with_new_line),
            &mut next_id,
        );
        self.next_row_id = next_id;
        if let Some(c) = self.element_mut(container) {
            c.rows = rows;
        }
    }

    /// Rebuild rows of `container` and of every panel nested in it.
    pub(crate) fn rebuild_rows_deep(&mut self, container: ElementId) {
        self.rebuild_rows(container);
        let panels: Vec<ElementId> = self
            .elements_of(container)
            .iter()
            .copied()
            .filter(|id| self.element(*id).is_some_and(|e| e.is_panel()))
            .collect();
        for panel in panels {
            self.rebuild_rows_deep(panel);
        }
    }
}
