#![forbid(unsafe_code)]

//! Survey elements: pages, panels and questions.

use std::fmt;

use crate::panel::Row;

/// Stable key of an element. Ids are never reused within one survey, so an
/// id held across a drag gesture always names the same element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Page,
    Panel,
    Question,
}

impl ElementKind {
    /// Pages and panels hold child elements.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Page | Self::Panel)
    }
}

/// How a container arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutType {
    /// Children are grouped into rows by their line-break flags.
    #[default]
    Row,
    /// Children wrap inline like text.
    Flow,
}

/// One node of the survey tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) name: String,
    pub(crate) kind: ElementKind,
    pub(crate) parent: Option<ElementId>,
    pub(crate) start_with_new_line: bool,
    pub(crate) flow_capable: bool,
    pub(crate) children_layout: LayoutType,
    pub(crate) elements: Vec<ElementId>,
    pub(crate) rows: Vec<Row>,
}

impl Element {
    pub(crate) fn new(id: ElementId, name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            parent: None,
            // Pages never share a row with anything.
            start_with_new_line: kind != ElementKind::Page,
            flow_capable: false,
            children_layout: LayoutType::Row,
            elements: Vec::new(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub fn is_page(&self) -> bool {
        self.kind == ElementKind::Page
    }

    /// True for panels only; a page is a container but not a panel.
    #[must_use]
    pub fn is_panel(&self) -> bool {
        self.kind == ElementKind::Panel
    }

    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Containing page or panel, `None` for pages and detached elements.
    #[must_use]
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Whether the element opens a new visual row.
    #[must_use]
    pub fn start_with_new_line(&self) -> bool {
        self.start_with_new_line
    }

    /// Whether the element can be placed in a container using `layout`.
    #[must_use]
    pub fn supports_layout(&self, layout: LayoutType) -> bool {
        match layout {
            LayoutType::Row => true,
            LayoutType::Flow => self.flow_capable,
        }
    }

    /// Layout a container applies to its children.
    #[must_use]
    pub fn children_layout(&self) -> LayoutType {
        self.children_layout
    }

    /// Children in flat order. Empty for questions.
    #[must_use]
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Rows derived from [`elements`](Self::elements). Empty for questions.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_start_new_line_by_default() {
        let q = Element::new(ElementId(1), "q1", ElementKind::Question);
        assert!(q.start_with_new_line());
        assert!(!q.is_container());
        let p = Element::new(ElementId(2), "page1", ElementKind::Page);
        assert!(!p.start_with_new_line());
        assert!(p.is_container());
        assert!(!p.is_panel());
    }

    #[test]
    fn flow_support_is_opt_in() {
        let mut q = Element::new(ElementId(1), "q1", ElementKind::Question);
        assert!(q.supports_layout(LayoutType::Row));
        assert!(!q.supports_layout(LayoutType::Flow));
        q.flow_capable = true;
        assert!(q.supports_layout(LayoutType::Flow));
    }

    #[test]
    fn id_display() {
        assert_eq!(ElementId(7).to_string(), "#7");
        assert_eq!(ElementId(7).get(), 7);
    }
}
