#![forbid(unsafe_code)]

//! Page drag and drop of questions and panels.
//!
//! A gesture places a *target* element: either a brand-new element dropped
//! in from outside (no source) or a detached copy of the *source* element
//! being moved (see [`SurveyModel::copy_element`]). While the pointer moves,
//! the target is shown at its candidate position by editing rows only; the
//! flat element lists change once, when the gesture finishes.
//!
//! # Row placement
//!
//! - Destination is a page, or a panel entered from inside: the target gets
//!   its own row at the top (at the bottom when dropping below or the
//!   container is empty).
//! - Otherwise the target joins the destination's row when it does not start
//!   a new line, or gets a new row next to the destination row when it does.
//!   With editor heuristics on, the choice depends on whether the
//!   destination row holds more than one element instead.
//! - Placements that would leave the target exactly where it already is, or
//!   beside the source's own singleton row, are skipped.

use survey_reactive::BatchScope;
use tracing::{debug, trace, warn};

use super::allow::DragDropAllowEvent;
use super::info::DragDropInfo;
use crate::element::ElementId;
use crate::error::{DragDropError, ModelError};
use crate::panel::RowRef;
use crate::survey::SurveyModel;

impl SurveyModel {
    /// Begin a gesture on `page`.
    ///
    /// `target` must be detached and `source`, when given, placed.
    /// `nested_panel_depth` limits how deep into
    /// nested panels the target may be dropped; `None` means no limit.
    pub fn drag_drop_start(
        &mut self,
        page: ElementId,
        source: Option<ElementId>,
        target: ElementId,
        nested_panel_depth: Option<usize>,
    ) -> Result<(), DragDropError> {
        let page_element = self
            .element(page)
            .ok_or(DragDropError::UnknownElement(page))?;
        if !page_element.is_page() {
            return Err(DragDropError::NotAPage(page));
        }
        if self.sessions.contains_key(&page) {
            return Err(DragDropError::SessionActive { page });
        }
        let target_element = self
            .element(target)
            .ok_or(DragDropError::UnknownElement(target))?;
        if target_element.is_page() || target_element.parent.is_some() {
            return Err(DragDropError::TargetAttached(target));
        }
        if let Some(source) = source {
            let source_element = self
                .element(source)
                .ok_or(DragDropError::UnknownElement(source))?;
            if source_element.parent.is_none() {
                return Err(DragDropError::SourceDetached(source));
            }
        }

        let design_v2 = self.design_mode && self.settings.support_creator_v2;
        self.sessions.insert(
            page,
            DragDropInfo::new(source, target, nested_panel_depth, design_v2),
        );
        debug!(
            target: "survey::dragdrop",
            page = %page,
            target = %target,
            source = ?source,
            design_v2,
            "drag started"
        );
        Ok(())
    }

    /// Live gesture state of `page`.
    #[must_use]
    pub fn drag_drop_info(&self, page: ElementId) -> Option<&DragDropInfo> {
        self.sessions.get(&page)
    }

    #[must_use]
    pub fn is_dragging(&self, page: ElementId) -> bool {
        self.sessions.contains_key(&page)
    }

    /// Point the gesture at `destination`.
    ///
    /// Returns `true` when the target is now shown at the resolved position.
    /// On `false` the move was rejected; if the gesture has a source, the
    /// target is also removed from whatever row previewed it.
    pub fn drag_drop_move_to(
        &mut self,
        page: ElementId,
        destination: Option<ElementId>,
        is_bottom: bool,
        is_edge: bool,
    ) -> bool {
        let Some(mut info) = self.sessions.get(&page).cloned() else {
            return false;
        };
        info.destination = destination;
        info.is_bottom = is_bottom;
        info.is_edge = is_edge;
        self.correct_drag_drop_info(&mut info);

        let accepted = self.drag_drop_move_core(page, &mut info);
        self.sessions.insert(page, info);
        accepted
    }

    fn drag_drop_move_core(&mut self, page: ElementId, info: &mut DragDropInfo) -> bool {
        if !self.drag_drop_can_drop_target(info) {
            debug!(
                target: "survey::dragdrop",
                page = %page,
                destination = ?info.destination,
                accepted = false,
                reason = "invalid destination",
                "move rejected"
            );
            return false;
        }

        let reason = if !self.drag_drop_can_drop_source(page, info) {
            Some("source")
        } else if !self.drag_drop_allow_from_survey(info) {
            Some("host veto")
        } else {
            None
        };
        if let Some(reason) = reason {
            if info.source.is_some() {
                let row = self.find_row(page, info.target);
                if row.is_some() {
                    self.remove_from_row(info.target, row);
                    self.bump_layout();
                }
            }
            debug!(
                target: "survey::dragdrop",
                page = %page,
                destination = ?info.destination,
                accepted = false,
                reason,
                "move rejected"
            );
            return false;
        }

        self.drag_drop_add_target(page, info);
        self.bump_layout();
        trace!(
            target: "survey::dragdrop",
            page = %page,
            destination = ?info.destination,
            is_bottom = info.is_bottom,
            is_edge = info.is_edge,
            accepted = true,
            "move accepted"
        );
        true
    }

    /// A target that cannot live in a panel's children layout goes beside
    /// the panel instead of inside it.
    fn correct_drag_drop_info(&self, info: &mut DragDropInfo) {
        let Some(panel) = info.destination.and_then(|d| self.element(d)) else {
            return;
        };
        if !panel.is_panel() {
            return;
        }
        let layout = panel.children_layout;
        if !self
            .element(info.target)
            .is_some_and(|t| t.supports_layout(layout))
        {
            info.is_edge = true;
        }
    }

    fn drag_drop_can_drop_target(&self, info: &DragDropInfo) -> bool {
        let Some(destination) = info.destination else {
            return true;
        };
        match self.element(destination) {
            None => false,
            Some(d) if d.is_page() => true,
            Some(_) => self.drag_drop_can_drop_core(info.target, Some(destination)),
        }
    }

    fn drag_drop_can_drop_source(&self, page: ElementId, info: &DragDropInfo) -> bool {
        let Some(source) = info.source else {
            return true;
        };
        if !self.drag_drop_can_drop_core(source, info.destination) {
            return false;
        }
        if info.design_v2
            && let Some(destination) = info.destination
        {
            let row_source = self.find_row(page, source);
            let row_destination = self.find_row(page, destination);
            if row_source != row_destination
                && self.starts_new_line(source) != self.starts_new_line(destination)
            {
                return true;
            }
            if row_destination
                .and_then(|r| self.row(r))
                .is_some_and(|r| r.len() == 1)
            {
                return true;
            }
        }
        self.drag_drop_can_drop_not_next(source, info.destination, info.is_edge, info.is_bottom)
    }

    /// False when `destination` is `target` (by id or name), or when
    /// `target` is a panel that contains `destination` or an element sharing
    /// its name.
    #[must_use]
    pub fn drag_drop_can_drop_core(
        &self,
        target: ElementId,
        destination: Option<ElementId>,
    ) -> bool {
        let Some(destination) = destination else {
            return true;
        };
        if self.is_same_element(destination, target) {
            return false;
        }
        let (Some(t), Some(d)) = (self.element(target), self.element(destination)) else {
            return false;
        };
        if t.is_panel()
            && (self.contains_element(target, destination)
                || self.element_by_name(target, &d.name).is_some())
        {
            return false;
        }
        true
    }

    /// False when dropping `source` at `destination` would put it back at
    /// its current index in the shared parent.
    #[must_use]
    pub fn drag_drop_can_drop_not_next(
        &self,
        source: ElementId,
        destination: Option<ElementId>,
        is_edge: bool,
        is_bottom: bool,
    ) -> bool {
        let Some(destination) = destination else {
            return true;
        };
        let Some(dest) = self.element(destination) else {
            return true;
        };
        if dest.is_panel() && !is_edge {
            return true;
        }
        let Some(parent) = self.parent_of(source) else {
            return true;
        };
        if dest.parent != Some(parent) {
            return true;
        }
        let elements = self.elements_of(parent);
        let index_of = |id: ElementId| {
            elements
                .iter()
                .position(|e| *e == id)
                .map_or(-1, |i| i as isize)
        };
        let src_index = index_of(source);
        let mut dest_index = index_of(destination);
        if dest_index < src_index && !is_bottom {
            dest_index -= 1;
        }
        if is_bottom {
            dest_index += 1;
        }
        if src_index < dest_index {
            dest_index - src_index > 1
        } else {
            src_index - dest_index > 0
        }
    }

    fn drag_drop_allow_from_survey(&self, info: &DragDropInfo) -> bool {
        let Some(destination) = info.destination else {
            return true;
        };
        let Some(hook) = self.allow_hook.as_deref() else {
            return true;
        };
        let Some(dest) = self.element(destination) else {
            return true;
        };

        let parent = if dest.is_page() || (!info.is_edge && dest.is_panel()) {
            Some(destination)
        } else {
            dest.parent
        };
        let mut insert_before = None;
        let mut insert_after = None;
        if !dest.is_page()
            && let Some(container) = dest.parent
        {
            let elements = self.elements_of(container);
            if let Some(index) = elements.iter().position(|e| *e == destination) {
                insert_before = Some(destination);
                insert_after = Some(destination);
                if info.is_bottom {
                    insert_before = elements.get(index + 1).copied();
                } else {
                    insert_after = index
                        .checked_sub(1)
                        .and_then(|i| elements.get(i))
                        .copied();
                }
            }
        }

        let mut event = DragDropAllowEvent {
            allow: true,
            target: info.target,
            source: info.source,
            parent,
            insert_after,
            insert_before,
        };
        hook.allow(self, &mut event);
        event.allow
    }

    fn starts_new_line(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|e| e.start_with_new_line)
    }

    // -----------------------------------------------------------------------
    // Transient row placement
    // -----------------------------------------------------------------------

    fn drag_drop_add_target(&mut self, page: ElementId, info: &mut DragDropInfo) {
        let prev_row = self.find_row(page, info.target);
        if self.drag_drop_add_target_to_row(page, info, prev_row) {
            self.remove_from_row(info.target, prev_row);
        }
    }

    /// Returns `true` when the target now sits in a different row than
    /// `prev_row`, so the caller must take it out of `prev_row`.
    fn drag_drop_add_target_to_row(
        &mut self,
        page: ElementId,
        info: &mut DragDropInfo,
        prev_row: Option<RowRef>,
    ) -> bool {
        let Some(destination) = info.destination else {
            return true;
        };
        if self.drag_drop_add_target_to_empty_panel(info) {
            return true;
        }
        let Some(dest_row) = self.find_row(page, destination) else {
            return true;
        };
        let join_existing = if info.design_v2 {
            self.row(dest_row).is_some_and(|r| r.len() > 1)
        } else {
            !self.starts_new_line(info.target)
        };
        if join_existing {
            self.drag_drop_add_target_to_existing_row(page, info, dest_row, prev_row)
        } else {
            self.drag_drop_add_target_to_new_row(page, info, dest_row, prev_row)
        }
    }

    fn drag_drop_add_target_to_empty_panel(&mut self, info: &DragDropInfo) -> bool {
        let Some(destination) = info.destination else {
            return false;
        };
        let Some(dest) = self.element(destination) else {
            return false;
        };
        if dest.is_page() {
            self.drag_drop_add_target_to_empty_panel_core(destination, info.target, info.is_bottom);
            return true;
        }
        if dest.is_panel() && !info.is_edge {
            let depth = self.depth(destination);
            if info.nested_panel_depth.is_none_or(|max| max >= depth) {
                self.drag_drop_add_target_to_empty_panel_core(
                    destination,
                    info.target,
                    info.is_bottom,
                );
                return true;
            }
        }
        false
    }

    fn drag_drop_add_target_to_empty_panel_core(
        &mut self,
        container: ElementId,
        target: ElementId,
        is_bottom: bool,
    ) {
        let row = self.new_row(vec![target]);
        if let Some(c) = self.element_mut(container) {
            if c.elements.is_empty() || is_bottom {
                c.rows.push(row);
            } else {
                c.rows.insert(0, row);
            }
        }
    }

    fn drag_drop_add_target_to_existing_row(
        &mut self,
        page: ElementId,
        info: &mut DragDropInfo,
        dest_row: RowRef,
        prev_row: Option<RowRef>,
    ) -> bool {
        let Some(destination) = info.destination else {
            return false;
        };
        let Some(row_elements) = self.row(dest_row).map(|r| r.elements.clone()) else {
            return false;
        };
        let mut index = row_elements
            .iter()
            .position(|e| *e == destination)
            .unwrap_or(0);

        // Dropping before a row that starts a new line lands at the end of
        // the previous row instead.
        if index == 0
            && !info.is_bottom
            && !info.design_v2
            && row_elements
                .first()
                .is_some_and(|first| self.starts_new_line(*first))
        {
            let row_index = self.row_index(dest_row).unwrap_or(0);
            if row_index == 0 {
                return self.drag_drop_add_target_to_new_row(page, info, dest_row, prev_row);
            }
            let Some(prev) = self.rows_of(dest_row.container).get(row_index - 1) else {
                return false;
            };
            let prev_ref = RowRef {
                container: dest_row.container,
                row: prev.id,
            };
            info.is_bottom = true;
            info.destination = prev.elements.last().copied();
            return self.drag_drop_add_target_to_existing_row(page, info, prev_ref, prev_row);
        }

        let prev_row_index = if prev_row == Some(dest_row) {
            row_elements.iter().position(|e| *e == info.target)
        } else {
            None
        };
        if info.is_bottom {
            index += 1;
        }
        if let Some(source) = info.source
            && self.find_row(page, source) == Some(dest_row)
            && row_elements.iter().position(|e| *e == source) == Some(index)
        {
            return false;
        }
        if prev_row_index == Some(index) {
            return false;
        }

        let Some(row) = self.row_mut(dest_row) else {
            return false;
        };
        if let Some(prev_index) = prev_row_index {
            row.elements.remove(prev_index);
            if prev_index < index {
                index -= 1;
            }
        }
        let at = index.min(row.elements.len());
        row.elements.insert(at, info.target);
        prev_row_index.is_none()
    }

    fn drag_drop_add_target_to_new_row(
        &mut self,
        page: ElementId,
        info: &DragDropInfo,
        dest_row: RowRef,
        prev_row: Option<RowRef>,
    ) -> bool {
        let container = dest_row.container;
        let Some(mut index) = self.row_index(dest_row) else {
            return false;
        };
        if info.is_bottom {
            index += 1;
        }
        if let Some(prev) = prev_row
            && prev.container == container
            && self.row_index(prev) == Some(index)
        {
            return false;
        }
        if let Some(source) = info.source
            && let Some(src_row) = self.find_row(page, source)
            && src_row.container == container
            && self.row(src_row).is_some_and(|r| r.len() == 1)
            && self.row_index(src_row) == Some(index)
        {
            return false;
        }

        let row = self.new_row(vec![info.target]);
        if let Some(c) = self.element_mut(container) {
            let at = index.min(c.rows.len());
            c.rows.insert(at, row);
        }
        true
    }

    // -----------------------------------------------------------------------
    // Finish
    // -----------------------------------------------------------------------

    /// Flat index in the row's container of `element`, counting every
    /// element of the rows before it.
    #[must_use]
    pub fn drag_drop_element_index(&self, row: RowRef, element: ElementId) -> Option<usize> {
        let index = self.row(row)?.position(element)?;
        let row_index = self.row_index(row)?;
        if row_index == 0 {
            return Some(index);
        }
        let prev_row = self.rows_of(row.container).get(row_index - 1)?;
        let prev_element = prev_row.elements.last()?;
        let offset = self
            .elements_of(row.container)
            .iter()
            .position(|e| e == prev_element)
            .map_or(0, |p| p + 1);
        Some(index + offset)
    }

    /// Replace `source` with `target` inside `container`, placing `target`
    /// at `index` as counted before `source` was removed.
    pub fn move_element(
        &mut self,
        container: ElementId,
        source: ElementId,
        target: ElementId,
        index: usize,
    ) -> Result<(), ModelError> {
        let mut index = index;
        if let Some(src_index) = self.elements_of(container).iter().position(|e| *e == source)
            && index > src_index
        {
            index -= 1;
        }
        self.remove_element(source)?;
        self.add_element(container, target, Some(index))
    }

    /// End the gesture on `page`.
    ///
    /// Unless cancelled, the target is committed at its previewed position:
    /// within the same container it replaces the source, across containers
    /// the source is removed and the target inserted. Rows of the page are
    /// rebuilt either way.
    ///
    /// The gesture owns what it leaves behind: a source replaced by its
    /// target is deleted, and so is a target that ends up unplaced (cancelled,
    /// or never accepted anywhere). Returns the placed target, or `None` when
    /// nothing was placed or no gesture was active.
    pub fn drag_drop_finish(&mut self, page: ElementId, is_cancel: bool) -> Option<ElementId> {
        let info = self.sessions.remove(&page)?;
        let _batch = BatchScope::new();
        let target = info.target;
        let source = info.source;
        let destination = info.destination;

        let row = self.find_row(page, target);
        let mut target_index = row.and_then(|r| self.drag_drop_element_index(r, target));
        let row_elements: Vec<ElementId> = row
            .and_then(|r| self.row(r))
            .map(|r| r.elements.iter().copied().filter(|e| *e != target).collect())
            .unwrap_or_default();
        self.remove_from_row(target, row);

        let mut set_new_line: Vec<ElementId> = Vec::new();
        let mut reset_new_line: Vec<ElementId> = Vec::new();
        if !is_cancel && let Some(row) = row {
            let container = row.container;
            if info.design_v2 {
                let at_index =
                    target_index.and_then(|i| self.elements_of(container).get(i).copied());
                let at_index_new_line = at_index.is_some_and(|e| self.starts_new_line(e));
                let target_new_line = self.starts_new_line(target);
                let source_row: Option<Vec<ElementId>> = source.and_then(|s| {
                    let parent = self.parent_of(s)?;
                    let r = self.find_row(parent, s)?;
                    self.row(r).map(|r| r.elements.clone())
                });

                if let Some(occupant) = at_index
                    && at_index_new_line
                    && row_elements.len() > 1
                    && at_index == destination
                {
                    set_new_line.push(target);
                    reset_new_line.push(occupant);
                }
                if target_new_line && row_elements.len() > 1 && !at_index_new_line {
                    reset_new_line.push(target);
                }
                if let (Some(s), Some(src_row)) = (source, source_row.as_ref())
                    && src_row.first() == Some(&s)
                    && let Some(second) = src_row.get(1)
                {
                    set_new_line.push(*second);
                }
                if row_elements.len() <= 1 {
                    set_new_line.push(target);
                }
                if target_new_line
                    && row_elements.len() > 1
                    && row_elements.first().copied() != destination
                {
                    reset_new_line.push(target);
                }
            }

            if let Some(source) = source
                && let Some(source_parent) = self.parent_of(source)
            {
                self.moving_question.set(true);
                if source_parent == container {
                    if let Some(index) = target_index
                        && let Err(err) = self.move_element(container, source, target, index)
                    {
                        warn!(target: "survey::dragdrop", %err, "move within container failed");
                    }
                    target_index = None;
                } else if let Err(err) = self.remove_element(source) {
                    warn!(target: "survey::dragdrop", %err, "source removal failed");
                }
            }
            if let Some(index) = target_index
                && let Err(err) = self.add_element(container, target, Some(index))
            {
                warn!(target: "survey::dragdrop", %err, "target insertion failed");
            }
            self.moving_question.set(false);
        }

        for id in &set_new_line {
            if let Some(e) = self.element_mut(*id) {
                e.start_with_new_line = true;
            }
        }
        for id in &reset_new_line {
            if let Some(e) = self.element_mut(*id) {
                e.start_with_new_line = false;
            }
        }
        self.rebuild_rows_deep(page);
        self.bump_layout();

        let placed = !is_cancel && self.parent_of(target).is_some();
        let leftover = if placed {
            source.filter(|s| self.element(*s).is_some_and(|e| e.parent.is_none()))
        } else {
            Some(target).filter(|t| self.parent_of(*t).is_none())
        };
        let released = leftover.map_or(0, |id| self.release(id));

        debug!(
            target: "survey::dragdrop",
            page = %page,
            target = %target,
            source = ?source,
            destination = ?destination,
            cancelled = is_cancel,
            line_breaks_set = set_new_line.len(),
            line_breaks_reset = reset_new_line.len(),
            released,
            "drag finished"
        );
        placed.then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::LayoutType;
    use crate::settings::SurveySettings;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn names(survey: &SurveyModel, ids: &[ElementId]) -> Vec<String> {
        ids.iter()
            .map(|id| survey.element(*id).map(|e| e.name().to_string()).unwrap_or_default())
            .collect()
    }

    fn row_names(survey: &SurveyModel, container: ElementId) -> Vec<Vec<String>> {
        survey
            .rows_of(container)
            .iter()
            .map(|r| names(survey, r.elements()))
            .collect()
    }

    /// One page with questions q1..q4, each on its own row.
    fn four_questions() -> (SurveyModel, ElementId, Vec<ElementId>) {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let qs = (1..=4)
            .map(|i| survey.add_question(page, format!("q{i}")).unwrap())
            .collect();
        (survey, page, qs)
    }

    #[test]
    fn new_element_dropped_below_destination() {
        let (mut survey, page, qs) = four_questions();
        let new = survey.create_question("new");
        survey.drag_drop_start(page, None, new, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(qs[1]), true, false));
        assert_eq!(
            row_names(&survey, page),
            vec![vec!["q1"], vec!["q2"], vec!["new"], vec!["q3"], vec!["q4"]]
        );
        assert_eq!(survey.elements_of(page).len(), 4, "preview does not touch elements");

        assert_eq!(survey.drag_drop_finish(page, false), Some(new));
        assert_eq!(
            names(&survey, survey.elements_of(page)),
            vec!["q1", "q2", "new", "q3", "q4"]
        );
        assert!(!survey.is_dragging(page));
    }

    #[test]
    fn same_container_move_replaces_source() {
        let (mut survey, page, qs) = four_questions();
        let copy = survey.copy_element(qs[0]).unwrap();
        survey.drag_drop_start(page, Some(qs[0]), copy, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(qs[2]), true, false));
        assert_eq!(survey.drag_drop_finish(page, false), Some(copy));

        assert_eq!(
            names(&survey, survey.elements_of(page)),
            vec!["q2", "q3", "q1", "q4"]
        );
        assert_eq!(survey.elements_of(page)[2], copy);
        assert_eq!(survey.parent_of(qs[0]), None);
        assert_eq!(survey.rows_of(page).len(), 4);
    }

    #[test]
    fn drop_next_to_itself_is_rejected() {
        let (mut survey, page, qs) = four_questions();
        let copy = survey.copy_element(qs[0]).unwrap();
        survey.drag_drop_start(page, Some(qs[0]), copy, None).unwrap();
        assert!(!survey.drag_drop_move_to(page, Some(qs[1]), false, false));
        assert!(!survey.drag_drop_move_to(page, Some(qs[0]), true, false));
        assert_eq!(survey.rows_of(page).len(), 4);
    }

    #[test]
    fn rejected_move_evicts_previous_preview() {
        let (mut survey, page, qs) = four_questions();
        let copy = survey.copy_element(qs[0]).unwrap();
        survey.drag_drop_start(page, Some(qs[0]), copy, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(qs[2]), true, false));
        assert_eq!(survey.rows_of(page).len(), 5);
        assert!(!survey.drag_drop_move_to(page, Some(qs[1]), false, false));
        assert_eq!(survey.rows_of(page).len(), 4);
        assert!(survey.find_row(page, copy).is_none());
    }

    #[test]
    fn not_next_predicts_post_move_index() {
        let (survey, _page, qs) = four_questions();
        // source index 2, destination index 3, above: lands back at 2
        assert!(!survey.drag_drop_can_drop_not_next(qs[2], Some(qs[3]), false, false));
        // source index 2, destination index 1, below: lands back at 2
        assert!(!survey.drag_drop_can_drop_not_next(qs[2], Some(qs[1]), false, true));
        assert!(survey.drag_drop_can_drop_not_next(qs[2], Some(qs[0]), false, false));
        assert!(survey.drag_drop_can_drop_not_next(qs[0], Some(qs[3]), false, true));
        assert!(survey.drag_drop_can_drop_not_next(qs[0], None, false, false));
    }

    #[test]
    fn cancel_changes_nothing() {
        let (mut survey, page, qs) = four_questions();
        let before_rows = row_names(&survey, page);
        let before_elements = survey.elements_of(page).to_vec();
        let copy = survey.copy_element(qs[3]).unwrap();
        survey.drag_drop_start(page, Some(qs[3]), copy, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(qs[0]), false, false));
        assert_eq!(survey.drag_drop_finish(page, true), None);
        assert_eq!(row_names(&survey, page), before_rows);
        assert_eq!(survey.elements_of(page), &before_elements[..]);
        assert!(survey.drag_drop_info(page).is_none());
    }

    #[test]
    fn finish_without_gesture_is_noop() {
        let (mut survey, page, _qs) = four_questions();
        assert_eq!(survey.drag_drop_finish(page, false), None);
        assert!(!survey.drag_drop_move_to(page, None, false, false));
    }

    #[test]
    fn second_start_fails_fast() {
        let (mut survey, page, qs) = four_questions();
        let a = survey.create_question("a");
        let b = survey.create_question("b");
        survey.drag_drop_start(page, None, a, None).unwrap();
        assert_eq!(
            survey.drag_drop_start(page, None, b, None),
            Err(DragDropError::SessionActive { page })
        );
        assert_eq!(survey.drag_drop_info(page).map(|i| i.target()), Some(a));
        assert_eq!(
            survey.drag_drop_start(qs[0], None, b, None),
            Err(DragDropError::NotAPage(qs[0]))
        );
    }

    #[test]
    fn detached_source_rejected() {
        let (mut survey, page, qs) = four_questions();
        let loose = survey.create_question("loose");
        let copy = survey.copy_element(loose).unwrap();
        assert_eq!(
            survey.drag_drop_start(page, Some(loose), copy, None),
            Err(DragDropError::SourceDetached(loose))
        );
        assert!(!survey.is_dragging(page));
        assert_eq!(
            survey.drag_drop_start(page, Some(page), copy, None),
            Err(DragDropError::SourceDetached(page))
        );
        assert_eq!(names(&survey, survey.elements_of(page)), vec!["q1", "q2", "q3", "q4"]);
        assert!(qs.iter().all(|q| survey.parent_of(*q) == Some(page)));
    }

    #[test]
    fn repeated_moves_reuse_arena_slots() {
        let (mut survey, page, _qs) = four_questions();
        let baseline = survey.slot_count();
        for round in 0..200 {
            let elements = survey.elements_of(page).to_vec();
            let source = elements[0];
            let copy = survey.copy_element(source).unwrap();
            survey.drag_drop_start(page, Some(source), copy, None).unwrap();
            assert!(survey.drag_drop_move_to(page, Some(elements[3]), true, false));
            assert_eq!(survey.drag_drop_finish(page, false), Some(copy), "round {round}");
            assert!(survey.element(source).is_none());
        }
        assert_eq!(survey.element_count(), 5);
        assert_eq!(survey.slot_count(), baseline + 1);
        assert_eq!(names(&survey, survey.elements_of(page)), vec!["q1", "q2", "q3", "q4"]);
    }

    #[test]
    fn abandoned_targets_are_released() {
        let (mut survey, page, qs) = four_questions();
        let live = survey.element_count();

        let copy = survey.copy_element(qs[1]).unwrap();
        survey.drag_drop_start(page, Some(qs[1]), copy, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(qs[3]), true, false));
        assert_eq!(survey.drag_drop_finish(page, true), None);
        assert!(survey.element(copy).is_none());

        let new = survey.create_question("new");
        survey.drag_drop_start(page, None, new, None).unwrap();
        assert!(!survey.drag_drop_move_to(page, Some(new), false, false));
        assert_eq!(survey.drag_drop_finish(page, false), None);
        assert!(survey.element(new).is_none());

        assert_eq!(survey.element_count(), live);
        assert!(qs.iter().all(|q| survey.parent_of(*q) == Some(page)));
    }

    #[test]
    fn panel_copies_release_their_children() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let q1 = survey.add_question(page, "q1").unwrap();
        let panel = survey.add_panel(page, "panel1").unwrap();
        for name in ["a", "b", "c"] {
            survey.add_question(panel, name).unwrap();
        }
        let live = survey.element_count();

        for _ in 0..10 {
            let copy = survey.copy_element(panel).unwrap();
            survey.drag_drop_start(page, Some(panel), copy, None).unwrap();
            survey.drag_drop_move_to(page, Some(q1), false, true);
            assert_eq!(survey.drag_drop_finish(page, true), None);
        }
        assert_eq!(survey.element_count(), live);
        assert_eq!(survey.slot_count(), live + 4);
    }

    #[test]
    fn attached_target_rejected() {
        let (mut survey, page, qs) = four_questions();
        assert_eq!(
            survey.drag_drop_start(page, Some(qs[0]), qs[0], None),
            Err(DragDropError::TargetAttached(qs[0]))
        );
    }

    #[test]
    fn host_veto_reports_siblings_and_evicts() {
        let (mut survey, page, qs) = four_questions();
        let seen: Rc<RefCell<Vec<DragDropAllowEvent>>> = Rc::default();
        let allow = Rc::new(std::cell::Cell::new(true));
        {
            let seen = Rc::clone(&seen);
            let allow = Rc::clone(&allow);
            survey.set_allow_hook(move |_: &SurveyModel, event: &mut DragDropAllowEvent| {
                seen.borrow_mut().push(event.clone());
                event.allow = allow.get();
            });
        }
        let copy = survey.copy_element(qs[0]).unwrap();
        survey.drag_drop_start(page, Some(qs[0]), copy, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(qs[2]), false, false));
        {
            let seen = seen.borrow();
            let event = &seen[0];
            assert_eq!(event.parent, Some(page));
            assert_eq!(event.insert_before, Some(qs[2]));
            assert_eq!(event.insert_after, Some(qs[1]));
            assert_eq!(event.source, Some(qs[0]));
            assert_eq!(event.target, copy);
        }
        assert!(survey.find_row(page, copy).is_some());

        allow.set(false);
        assert!(!survey.drag_drop_move_to(page, Some(qs[3]), true, false));
        assert!(survey.find_row(page, copy).is_none());
        let seen = seen.borrow();
        assert_eq!(seen[1].insert_after, Some(qs[3]));
        assert_eq!(seen[1].insert_before, None);
    }

    #[test]
    fn cross_panel_move() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let q1 = survey.add_question(page, "q1").unwrap();
        let panel = survey.add_panel(page, "panel1").unwrap();
        let a = survey.add_question(panel, "a").unwrap();
        let b = survey.add_question(panel, "b").unwrap();

        let copy = survey.copy_element(q1).unwrap();
        survey.drag_drop_start(page, Some(q1), copy, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(a), true, false));
        assert_eq!(survey.drag_drop_finish(page, false), Some(copy));

        assert_eq!(survey.elements_of(page), &[panel]);
        assert_eq!(survey.elements_of(panel), &[a, copy, b]);
        assert_eq!(survey.parent_of(copy), Some(panel));
    }

    #[test]
    fn panel_cannot_enter_itself() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let panel = survey.add_panel(page, "panel1").unwrap();
        let inner = survey.add_question(panel, "inner").unwrap();
        let copy = survey.copy_element(panel).unwrap();
        survey.drag_drop_start(page, Some(panel), copy, None).unwrap();
        assert!(!survey.drag_drop_move_to(page, Some(inner), false, false));
        assert!(!survey.drag_drop_move_to(page, Some(panel), false, false));
        assert!(survey.drag_drop_can_drop_core(copy, Some(page)));
    }

    #[test]
    fn drop_into_empty_panel() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let panel = survey.add_panel(page, "panel1").unwrap();
        let new = survey.create_question("new");
        survey.drag_drop_start(page, None, new, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(panel), false, false));
        assert_eq!(row_names(&survey, panel), vec![vec!["new"]]);
        assert_eq!(survey.drag_drop_finish(page, false), Some(new));
        assert_eq!(survey.elements_of(panel), &[new]);
    }

    #[test]
    fn nested_depth_limit_keeps_target_beside_panel() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let panel = survey.add_panel(page, "panel1").unwrap();
        let new = survey.create_question("new");
        survey.drag_drop_start(page, None, new, Some(0)).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(panel), true, false));
        assert!(survey.rows_of(panel).is_empty());
        assert_eq!(survey.drag_drop_finish(page, false), Some(new));
        assert_eq!(survey.elements_of(page), &[panel, new]);
    }

    #[test]
    fn incompatible_layout_forces_edge() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let panel = survey.add_panel(page, "panel1").unwrap();
        survey.set_children_layout(panel, LayoutType::Flow).unwrap();
        let new = survey.create_question("new");
        survey.drag_drop_start(page, None, new, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(panel), false, false));
        assert!(survey.drag_drop_info(page).is_some_and(|i| i.is_edge()));
        assert!(survey.rows_of(panel).is_empty());

        survey.set_flow_capable(new, true).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(panel), false, false));
        assert!(survey.drag_drop_info(page).is_some_and(|i| !i.is_edge()));
        assert_eq!(survey.rows_of(panel).len(), 1);
    }

    #[test]
    fn inline_target_joins_destination_row() {
        let (mut survey, page, qs) = four_questions();
        let new = survey.create_question("new");
        survey.set_start_with_new_line(new, false).unwrap();
        survey.drag_drop_start(page, None, new, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(qs[1]), true, false));
        assert_eq!(
            row_names(&survey, page),
            vec![vec!["q1"], vec!["q2", "new"], vec!["q3"], vec!["q4"]]
        );
        // Above a row start: moves to the end of the previous row.
        assert!(survey.drag_drop_move_to(page, Some(qs[3]), false, false));
        assert_eq!(
            row_names(&survey, page),
            vec![vec!["q1"], vec!["q2"], vec!["q3", "new"], vec!["q4"]]
        );
        assert_eq!(survey.drag_drop_finish(page, false), Some(new));
        assert_eq!(
            names(&survey, survey.elements_of(page)),
            vec!["q1", "q2", "q3", "new", "q4"]
        );
        assert_eq!(
            row_names(&survey, page),
            vec![vec!["q1"], vec!["q2"], vec!["q3", "new"], vec!["q4"]]
        );
    }

    #[test]
    fn element_index_counts_previous_rows() {
        let (mut survey, page, qs) = four_questions();
        survey.set_start_with_new_line(qs[1], false).unwrap();
        // rows: [q1 q2] [q3] [q4]
        let row = survey.find_row(page, qs[3]).unwrap();
        assert_eq!(survey.drag_drop_element_index(row, qs[3]), Some(3));
        let row = survey.find_row(page, qs[1]).unwrap();
        assert_eq!(survey.drag_drop_element_index(row, qs[1]), Some(1));
    }

    fn editor_survey() -> (SurveyModel, ElementId, Vec<ElementId>) {
        let settings = SurveySettings {
            support_creator_v2: true,
            ..SurveySettings::default()
        };
        let mut survey = SurveyModel::new(settings);
        survey.set_design_mode(true);
        let page = survey.add_page("page1");
        let qs: Vec<ElementId> = (1..=3)
            .map(|i| survey.add_question(page, format!("q{i}")).unwrap())
            .collect();
        survey.set_start_with_new_line(qs[1], false).unwrap();
        // rows: [q1 q2] [q3]
        (survey, page, qs)
    }

    #[test]
    fn singleton_row_target_starts_new_line() {
        let (mut survey, page, qs) = editor_survey();
        let new = survey.create_question("new");
        survey.set_start_with_new_line(new, false).unwrap();
        survey.drag_drop_start(page, None, new, None).unwrap();
        assert!(survey.drag_drop_info(page).is_some_and(|i| i.is_design_v2()));
        assert!(survey.drag_drop_move_to(page, Some(qs[2]), true, false));
        assert_eq!(survey.drag_drop_finish(page, false), Some(new));
        assert!(survey.element(new).is_some_and(|e| e.start_with_new_line()));
        assert_eq!(
            row_names(&survey, page),
            vec![vec!["q1", "q2"], vec!["q3"], vec!["new"]]
        );
    }

    #[test]
    fn row_start_passes_line_break_to_next_element() {
        let (mut survey, page, qs) = editor_survey();
        let copy = survey.copy_element(qs[0]).unwrap();
        survey.drag_drop_start(page, Some(qs[0]), copy, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(qs[2]), true, false));
        assert_eq!(survey.drag_drop_finish(page, false), Some(copy));
        assert!(survey.element(qs[1]).is_some_and(|e| e.start_with_new_line()));
        assert_eq!(
            row_names(&survey, page),
            vec![vec!["q2"], vec!["q3"], vec!["q1"]]
        );
    }

    #[test]
    fn moving_flag_raised_during_commit() {
        let (mut survey, page, qs) = four_questions();
        let seen: Rc<RefCell<Vec<bool>>> = Rc::default();
        let s = Rc::clone(&seen);
        let _sub = survey
            .moving_question()
            .subscribe(move |v| s.borrow_mut().push(*v));
        let copy = survey.copy_element(qs[0]).unwrap();
        survey.drag_drop_start(page, Some(qs[0]), copy, None).unwrap();
        assert!(survey.drag_drop_move_to(page, Some(qs[3]), true, false));
        survey.drag_drop_finish(page, false);
        assert!(!survey.is_moving_question());
        // Raised and lowered inside one batch: a single notification.
        assert_eq!(*seen.borrow(), vec![false]);
    }
}
