#![forbid(unsafe_code)]

//! The survey element tree.
//!
//! [`SurveyModel`] is an arena: every page, panel and question lives in one
//! vector and is addressed by its [`ElementId`]. Containers keep an ordered
//! list of child ids plus the rows derived from it.
//!
//! Slots of deleted elements go on a free list and are handed out again by
//! later creations, so an id stops being meaningful once its element is
//! deleted. Drag gestures delete the copies and sources they leave behind.
//!
//! # Invariants
//!
//! 1. A placed element is listed in exactly one container's children, and
//!    its `parent` names that container.
//! 2. Outside a drag gesture every placed element belongs to exactly one
//!    row of its parent.
//! 3. A panel never contains itself, directly or through nested panels.
//! 4. `layout_revision` grows whenever children or line breaks change.
//! 5. A slot is either live or on the free list, never both.

use std::fmt;

use ahash::AHashMap;
use survey_reactive::Observable;
use tracing::debug;

use crate::dragdrop::{DragDropAllowHook, DragDropInfo};
use crate::element::{Element, ElementId, ElementKind, LayoutType};
use crate::error::ModelError;
use crate::panel::Row;
use crate::settings::SurveySettings;

/// Pages, panels and questions of one survey.
pub struct SurveyModel {
    elements: Vec<Option<Element>>,
    free_list: Vec<u32>,
    pub(crate) pages: Vec<ElementId>,
    pub(crate) settings: SurveySettings,
    pub(crate) design_mode: bool,
    pub(crate) allow_hook: Option<Box<dyn DragDropAllowHook>>,
    pub(crate) sessions: AHashMap<ElementId, DragDropInfo>,
    pub(crate) next_row_id: u64,
    layout_revision: Observable<u64>,
    pub(crate) moving_question: Observable<bool>,
}

impl Default for SurveyModel {
    fn default() -> Self {
        Self::new(SurveySettings::default())
    }
}

impl fmt::Debug for SurveyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurveyModel")
            .field("elements", &self.element_count())
            .field("slots", &self.elements.len())
            .field("pages", &self.pages)
            .field("design_mode", &self.design_mode)
            .field("has_allow_hook", &self.allow_hook.is_some())
            .field("active_sessions", &self.sessions.len())
            .finish()
    }
}

impl SurveyModel {
    #[must_use]
    pub fn new(settings: SurveySettings) -> Self {
        Self {
            elements: Vec::new(),
            free_list: Vec::new(),
            pages: Vec::new(),
            settings,
            design_mode: false,
            allow_hook: None,
            sessions: AHashMap::new(),
            next_row_id: 0,
            layout_revision: Observable::named("layoutRevision", 0),
            moving_question: Observable::named("isMovingQuestion", false),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SurveySettings {
        &self.settings
    }

    /// Replace the settings. Gestures already in progress keep the values
    /// they captured at start.
    pub fn set_settings(&mut self, settings: SurveySettings) {
        self.settings = settings;
    }

    #[must_use]
    pub fn is_design_mode(&self) -> bool {
        self.design_mode
    }

    pub fn set_design_mode(&mut self, design_mode: bool) {
        self.design_mode = design_mode;
    }

    /// Install the host hook consulted before every drag move.
    pub fn set_allow_hook(&mut self, hook: impl DragDropAllowHook + 'static) {
        self.allow_hook = Some(Box::new(hook));
    }

    pub fn clear_allow_hook(&mut self) {
        self.allow_hook = None;
    }

    /// Bumped on every structural or line-break change.
    #[must_use]
    pub fn layout_revision(&self) -> &Observable<u64> {
        &self.layout_revision
    }

    /// True while a drag gesture is committing its structural move.
    #[must_use]
    pub fn is_moving_question(&self) -> bool {
        self.moving_question.get()
    }

    /// Observable form of [`is_moving_question`](Self::is_moving_question).
    #[must_use]
    pub fn moving_question(&self) -> &Observable<bool> {
        &self.moving_question
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    fn alloc(&mut self, name: impl Into<String>, kind: ElementKind) -> ElementId {
        match self.free_list.pop() {
            Some(slot) => {
                let id = ElementId(slot);
                self.elements[slot as usize] = Some(Element::new(id, name, kind));
                id
            }
            None => {
                let id = ElementId(self.elements.len() as u32);
                self.elements.push(Some(Element::new(id, name, kind)));
                id
            }
        }
    }

    /// Free the slots of `id` and everything nested in it. Returns the number
    /// of slots freed.
    pub(crate) fn release(&mut self, id: ElementId) -> usize {
        let mut freed = 0;
        for child in self.elements_of(id).to_vec() {
            freed += self.release(child);
        }
        if let Some(slot) = self.elements.get_mut(id.0 as usize)
            && slot.take().is_some()
        {
            self.free_list.push(id.0);
            freed += 1;
        }
        freed
    }

    /// Append a new empty page.
    pub fn add_page(&mut self, name: impl Into<String>) -> ElementId {
        let id = self.alloc(name, ElementKind::Page);
        self.pages.push(id);
        self.bump_layout();
        id
    }

    /// Create a question that is not placed anywhere yet.
    pub fn create_question(&mut self, name: impl Into<String>) -> ElementId {
        self.alloc(name, ElementKind::Question)
    }

    /// Create a panel that is not placed anywhere yet.
    pub fn create_panel(&mut self, name: impl Into<String>) -> ElementId {
        self.alloc(name, ElementKind::Panel)
    }

    /// Create a question and append it to `container`.
    pub fn add_question(
        &mut self,
        container: ElementId,
        name: impl Into<String>,
    ) -> Result<ElementId, ModelError> {
        self.add_new(container, name.into(), ElementKind::Question)
    }

    /// Create a panel and append it to `container`.
    pub fn add_panel(
        &mut self,
        container: ElementId,
        name: impl Into<String>,
    ) -> Result<ElementId, ModelError> {
        self.add_new(container, name.into(), ElementKind::Panel)
    }

    fn add_new(
        &mut self,
        container: ElementId,
        name: String,
        kind: ElementKind,
    ) -> Result<ElementId, ModelError> {
        self.container(container)?;
        if self.find_by_name(&name).is_some() {
            return Err(ModelError::DuplicateName(name));
        }
        let id = self.alloc(name, kind);
        self.add_element(container, id, None)?;
        Ok(id)
    }

    /// Detached copy of `id` with the same name and flags. Panel children
    /// are copied recursively. Used as the stand-in a drag gesture places.
    pub fn copy_element(&mut self, id: ElementId) -> Result<ElementId, ModelError> {
        let source = self.element(id).ok_or(ModelError::UnknownElement(id))?.clone();
        if source.is_page() {
            return Err(ModelError::PageNotAllowed(id));
        }
        let copy = self.alloc(source.name.clone(), source.kind);
        let mut children = Vec::with_capacity(source.elements.len());
        for child in &source.elements {
            let child_copy = self.copy_element(*child)?;
            if let Some(c) = self.element_mut(child_copy) {
                c.parent = Some(copy);
            }
            children.push(child_copy);
        }
        if let Some(c) = self.element_mut(copy) {
            c.start_with_new_line = source.start_with_new_line;
            c.flow_capable = source.flow_capable;
            c.children_layout = source.children_layout;
            c.elements = children;
        }
        self.rebuild_rows(copy);
        Ok(copy)
    }

    // -----------------------------------------------------------------------
    // Structural edits
    // -----------------------------------------------------------------------

    /// Place `id` into `container` at `index` (appended when `None` or past
    /// the end). An element that is already placed is moved.
    pub fn add_element(
        &mut self,
        container: ElementId,
        id: ElementId,
        index: Option<usize>,
    ) -> Result<(), ModelError> {
        self.container(container)?;
        let element = self.element(id).ok_or(ModelError::UnknownElement(id))?;
        if element.is_page() {
            return Err(ModelError::PageNotAllowed(id));
        }
        if element.is_panel() && (container == id || self.contains_element(id, container)) {
            return Err(ModelError::WouldCreateCycle {
                panel: id,
                container,
            });
        }
        if element.parent.is_some() {
            self.remove_element(id)?;
        }

        let Some(c) = self.element_mut(container) else {
            return Err(ModelError::UnknownElement(container));
        };
        let at = index.map_or(c.elements.len(), |i| i.min(c.elements.len()));
        c.elements.insert(at, id);
        if let Some(e) = self.element_mut(id) {
            e.parent = Some(container);
        }
        self.rebuild_rows(container);
        self.bump_layout();
        debug!(target: "survey::model", element = %id, container = %container, index = at, "element added");
        Ok(())
    }

    /// Detach `id` from its container. Returns `false` if it was not placed.
    pub fn remove_element(&mut self, id: ElementId) -> Result<bool, ModelError> {
        let element = self.element(id).ok_or(ModelError::UnknownElement(id))?;
        if element.is_page() {
            return Err(ModelError::PageNotAllowed(id));
        }
        let Some(parent) = element.parent else {
            return Ok(false);
        };
        if let Some(c) = self.element_mut(parent) {
            c.elements.retain(|e| *e != id);
        }
        if let Some(e) = self.element_mut(id) {
            e.parent = None;
        }
        self.rebuild_rows(parent);
        self.bump_layout();
        debug!(target: "survey::model", element = %id, container = %parent, "element removed");
        Ok(true)
    }

    /// Detach `id` and delete it together with everything nested in it.
    ///
    /// Elements referenced by a running drag gesture cannot be deleted.
    pub fn delete_element(&mut self, id: ElementId) -> Result<(), ModelError> {
        let element = self.element(id).ok_or(ModelError::UnknownElement(id))?;
        if element.is_page() {
            return Err(ModelError::PageNotAllowed(id));
        }
        let doomed = self.descendants(id);
        let in_use = self.sessions.values().any(|info| {
            std::iter::once(info.target)
                .chain(info.source)
                .any(|e| e == id || doomed.contains(&e))
        });
        if in_use {
            return Err(ModelError::DragInProgress(id));
        }
        self.remove_element(id)?;
        let freed = self.release(id);
        debug!(target: "survey::model", element = %id, freed, "element deleted");
        Ok(())
    }

    /// Set the line-break flag and regroup the parent's rows.
    pub fn set_start_with_new_line(&mut self, id: ElementId, value: bool) -> Result<(), ModelError> {
        let element = self.element_mut(id).ok_or(ModelError::UnknownElement(id))?;
        if element.start_with_new_line == value {
            return Ok(());
        }
        element.start_with_new_line = value;
        if let Some(parent) = element.parent {
            self.rebuild_rows(parent);
        }
        self.bump_layout();
        Ok(())
    }

    /// Choose how a container lays out its children.
    pub fn set_children_layout(
        &mut self,
        container: ElementId,
        layout: LayoutType,
    ) -> Result<(), ModelError> {
        self.container(container)?;
        if let Some(c) = self.element_mut(container) {
            c.children_layout = layout;
        }
        Ok(())
    }

    /// Allow or forbid placing the element inside flow layouts.
    pub fn set_flow_capable(&mut self, id: ElementId, value: bool) -> Result<(), ModelError> {
        self.element_mut(id)
            .ok_or(ModelError::UnknownElement(id))?
            .flow_capable = value;
        Ok(())
    }

    pub(crate) fn bump_layout(&self) {
        self.layout_revision.update(|rev| *rev += 1);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)?.as_ref()
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0 as usize)?.as_mut()
    }

    /// Live elements, placed or detached, pages included.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len() - self.free_list.len()
    }

    /// Arena slots ever allocated, live or free.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.elements.len()
    }

    fn container(&self, id: ElementId) -> Result<&Element, ModelError> {
        let element = self.element(id).ok_or(ModelError::UnknownElement(id))?;
        if element.is_container() {
            Ok(element)
        } else {
            Err(ModelError::NotAContainer(id))
        }
    }

    /// Pages in survey order.
    #[must_use]
    pub fn pages(&self) -> &[ElementId] {
        &self.pages
    }

    /// Children of a container in flat order; empty for anything else.
    #[must_use]
    pub fn elements_of(&self, container: ElementId) -> &[ElementId] {
        self.element(container).map_or(&[], |c| c.elements.as_slice())
    }

    /// Rows of a container; empty for anything else.
    #[must_use]
    pub fn rows_of(&self, container: ElementId) -> &[Row] {
        self.element(container).map_or(&[], |c| c.rows.as_slice())
    }

    #[must_use]
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.element(id)?.parent
    }

    /// The page an element is placed on, or the element itself for pages.
    #[must_use]
    pub fn page_of(&self, id: ElementId) -> Option<ElementId> {
        let mut current = self.element(id)?;
        loop {
            if current.is_page() {
                return Some(current.id);
            }
            current = self.element(current.parent?)?;
        }
    }

    /// Number of ancestors: 0 for pages and detached elements, 1 for
    /// children of a page.
    #[must_use]
    pub fn depth(&self, id: ElementId) -> usize {
        let mut depth = 0;
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent_of(parent);
        }
        depth
    }

    /// True if `element` is nested anywhere inside `panel`.
    #[must_use]
    pub fn contains_element(&self, panel: ElementId, element: ElementId) -> bool {
        self.elements_of(panel)
            .iter()
            .any(|child| *child == element || self.contains_element(*child, element))
    }

    /// First element named `name` nested anywhere inside `panel`.
    #[must_use]
    pub fn element_by_name(&self, panel: ElementId, name: &str) -> Option<ElementId> {
        self.elements_of(panel).iter().find_map(|child| {
            if self.element(*child)?.name == name {
                Some(*child)
            } else {
                self.element_by_name(*child, name)
            }
        })
    }

    /// First placed element named `name`, searching pages in order.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        self.pages.iter().find_map(|page| self.element_by_name(*page, name))
    }

    /// Every element nested in `container`, depth first.
    #[must_use]
    pub fn descendants(&self, container: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        for child in self.elements_of(container) {
            out.push(*child);
            out.extend(self.descendants(*child));
        }
        out
    }

    /// Identity used by drag-and-drop: same id, or same name. A drag target
    /// is usually a copy of its source and shares the source's name.
    #[must_use]
    pub fn is_same_element(&self, a: ElementId, b: ElementId) -> bool {
        if a == b {
            return true;
        }
        match (self.element(a), self.element(b)) {
            (Some(a), Some(b)) => a.name == b.name,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn row_names(survey: &SurveyModel, container: ElementId) -> Vec<Vec<String>> {
        survey
            .rows_of(container)
            .iter()
            .map(|r| {
                r.elements()
                    .iter()
                    .map(|id| survey.element(*id).map(|e| e.name().to_string()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn add_questions_builds_rows() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let q1 = survey.add_question(page, "q1").unwrap();
        let q2 = survey.add_question(page, "q2").unwrap();
        survey.set_start_with_new_line(q2, false).unwrap();
        assert_eq!(survey.elements_of(page), &[q1, q2]);
        assert_eq!(row_names(&survey, page), vec![vec!["q1", "q2"]]);
        assert_eq!(survey.parent_of(q1), Some(page));
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        survey.add_question(page, "q1").unwrap();
        assert_eq!(
            survey.add_question(page, "q1"),
            Err(ModelError::DuplicateName("q1".into()))
        );
    }

    #[test]
    fn questions_cannot_hold_children() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let q1 = survey.add_question(page, "q1").unwrap();
        assert_eq!(survey.add_question(q1, "q2"), Err(ModelError::NotAContainer(q1)));
    }

    #[test]
    fn panel_cycle_rejected() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let outer = survey.add_panel(page, "outer").unwrap();
        let inner = survey.add_panel(outer, "inner").unwrap();
        assert!(matches!(
            survey.add_element(inner, outer, None),
            Err(ModelError::WouldCreateCycle { .. })
        ));
        assert!(matches!(
            survey.add_element(outer, outer, None),
            Err(ModelError::WouldCreateCycle { .. })
        ));
    }

    #[test]
    fn add_element_moves_placed_element() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let panel = survey.add_panel(page, "panel1").unwrap();
        let q1 = survey.add_question(page, "q1").unwrap();
        survey.add_element(panel, q1, Some(0)).unwrap();
        assert_eq!(survey.elements_of(page), &[panel]);
        assert_eq!(survey.elements_of(panel), &[q1]);
        assert_eq!(survey.depth(q1), 2);
        assert_eq!(survey.depth(panel), 1);
        assert_eq!(survey.page_of(q1), Some(page));
    }

    #[test]
    fn remove_detaches() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let q1 = survey.add_question(page, "q1").unwrap();
        assert_eq!(survey.remove_element(q1), Ok(true));
        assert_eq!(survey.remove_element(q1), Ok(false));
        assert!(survey.rows_of(page).is_empty());
        assert_eq!(survey.parent_of(q1), None);
    }

    #[test]
    fn recursive_queries() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let outer = survey.add_panel(page, "outer").unwrap();
        let inner = survey.add_panel(outer, "inner").unwrap();
        let deep = survey.add_question(inner, "deep").unwrap();
        assert!(survey.contains_element(outer, deep));
        assert!(!survey.contains_element(inner, outer));
        assert_eq!(survey.element_by_name(outer, "deep"), Some(deep));
        assert_eq!(survey.find_by_name("inner"), Some(inner));
        assert_eq!(survey.descendants(page), vec![outer, inner, deep]);
    }

    #[test]
    fn copy_keeps_name_and_children() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let panel = survey.add_panel(page, "panel1").unwrap();
        survey.add_question(panel, "q1").unwrap();
        let copy = survey.copy_element(panel).unwrap();
        assert_ne!(copy, panel);
        assert_eq!(survey.parent_of(copy), None);
        assert!(survey.is_same_element(copy, panel));
        let children = survey.elements_of(copy).to_vec();
        assert_eq!(children.len(), 1);
        assert_eq!(survey.parent_of(children[0]), Some(copy));
        assert_eq!(survey.rows_of(copy).len(), 1);
    }

    #[test]
    fn delete_frees_subtree_for_reuse() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let panel = survey.add_panel(page, "panel1").unwrap();
        let inner = survey.add_question(panel, "inner").unwrap();
        assert_eq!(survey.element_count(), 3);

        survey.delete_element(panel).unwrap();
        assert!(survey.elements_of(page).is_empty());
        assert!(survey.element(panel).is_none());
        assert!(survey.element(inner).is_none());
        assert_eq!(survey.element_count(), 1);
        assert_eq!(survey.find_by_name("inner"), None);

        let q1 = survey.add_question(page, "inner").unwrap();
        let q2 = survey.add_question(page, "q2").unwrap();
        assert!([panel, inner].contains(&q1));
        assert!([panel, inner].contains(&q2));
        assert_eq!(survey.slot_count(), 3);
        assert_eq!(
            survey.delete_element(page),
            Err(ModelError::PageNotAllowed(page))
        );
    }

    #[test]
    fn delete_refuses_elements_of_running_gesture() {
        let mut survey = SurveyModel::default();
        let page = survey.add_page("page1");
        let panel = survey.add_panel(page, "panel1").unwrap();
        let inner = survey.add_question(panel, "inner").unwrap();
        let copy = survey.copy_element(inner).unwrap();
        survey.drag_drop_start(page, Some(inner), copy, None).unwrap();

        assert_eq!(survey.delete_element(panel), Err(ModelError::DragInProgress(panel)));
        assert_eq!(survey.delete_element(copy), Err(ModelError::DragInProgress(copy)));
        survey.drag_drop_finish(page, true);
        assert_eq!(survey.delete_element(panel), Ok(()));
    }

    #[test]
    fn layout_revision_notifies() {
        let mut survey = SurveyModel::default();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = survey.layout_revision().subscribe(move |_| h.set(h.get() + 1));
        let page = survey.add_page("page1");
        survey.add_question(page, "q1").unwrap();
        assert_eq!(hits.get(), 2);
    }
}
