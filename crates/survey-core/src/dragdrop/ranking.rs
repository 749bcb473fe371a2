#![forbid(unsafe_code)]

//! Drag and drop inside a ranking question.
//!
//! The controller keeps the gesture state; the lists it rearranges live on
//! the [`RankingQuestion`] as observables, so every hover commits a new
//! order that views render right away. Cancelling restores the lists
//! captured at start.
//!
//! Hovering is described by a [`DragOverNode`]: the choice under the
//! pointer (if any) and the area it belongs to. While nothing is ranked,
//! only the ranked area itself accepts a drop.

use serde_json::Value;
use survey_reactive::BatchScope;
use tracing::{debug, trace};

use crate::error::DragDropError;
use crate::item_value::{ItemValue, position_of};
use crate::ranking::RankingQuestion;

/// Region of a ranking question under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingArea {
    Ranked,
    Unranked,
    Outside,
}

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOverNode {
    /// Value of the choice under the pointer.
    pub item: Option<Value>,
    pub area: RankingArea,
}

impl DragOverNode {
    #[must_use]
    pub fn item(value: impl Into<Value>, area: RankingArea) -> Self {
        Self {
            item: Some(value.into()),
            area,
        }
    }

    #[must_use]
    pub fn area(area: RankingArea) -> Self {
        Self { item: None, area }
    }
}

/// Node resolved as a drop candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum DropTargetNode {
    Item(Value),
    /// The ranked list itself, used while it is empty.
    ToContainer,
}

/// Drop target resolved against the question's choices.
#[derive(Debug, Clone, PartialEq)]
pub enum RankingDropTarget {
    Item(ItemValue),
    ToContainer,
}

/// Direction the hovered choice slides to make room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone)]
struct RankingSession {
    dragged: ItemValue,
    drop_target: Option<RankingDropTarget>,
    shortcut_index: Option<usize>,
    move_direction: Option<MoveDirection>,
    ranked_before: Vec<ItemValue>,
    unranked_before: Vec<ItemValue>,
}

/// Controller for one ranking question's drag gestures.
#[derive(Debug, Clone, Default)]
pub struct RankingDragDrop {
    session: Option<RankingSession>,
}

impl RankingDragDrop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging the choice with `value`.
    pub fn start(&mut self, question: &RankingQuestion, value: &Value) -> Result<(), DragDropError> {
        if self.session.is_some() {
            return Err(DragDropError::GestureActive);
        }
        let dragged = question
            .choice(value)
            .cloned()
            .ok_or(DragDropError::UnknownChoice)?;
        debug!(
            target: "survey::dragdrop",
            question = question.name(),
            item = %dragged.display_text(),
            "ranking drag started"
        );
        self.session = Some(RankingSession {
            dragged,
            drop_target: None,
            shortcut_index: None,
            move_direction: None,
            ranked_before: question.ranked().get(),
            unranked_before: question.unranked().get(),
        });
        Ok(())
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn dragged(&self) -> Option<&ItemValue> {
        self.session.as_ref().map(|s| &s.dragged)
    }

    #[must_use]
    pub fn drop_target(&self) -> Option<&RankingDropTarget> {
        self.session.as_ref().and_then(|s| s.drop_target.as_ref())
    }

    /// 1-based rank shown on the dragged shortcut.
    #[must_use]
    pub fn shortcut_index(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.shortcut_index)
    }

    #[must_use]
    pub fn move_direction(&self) -> Option<MoveDirection> {
        self.session.as_ref().and_then(|s| s.move_direction)
    }

    /// Handle the pointer moving over `node`. Returns `true` when dropping
    /// here is allowed.
    pub fn drag_over(&mut self, question: &RankingQuestion, node: &DragOverNode) -> bool {
        if self.session.is_none() {
            return false;
        }
        let target = self
            .find_drop_target_node_by_drag_over_node(question, node)
            .and_then(|n| self.get_drop_target_by_node(question, &n));
        let Some(target) = target.filter(|t| self.is_drop_target_valid(t)) else {
            trace!(target: "survey::dragdrop", question = question.name(), "ranking drop banned");
            return false;
        };
        if let Some(session) = self.session.as_mut() {
            if session.drop_target.as_ref() == Some(&target) {
                return true;
            }
            session.drop_target = Some(target);
        }
        self.after_drag_over(question);
        true
    }

    /// Resolve the hovered node to a drop candidate.
    #[must_use]
    pub fn find_drop_target_node_by_drag_over_node(
        &self,
        question: &RankingQuestion,
        node: &DragOverNode,
    ) -> Option<DropTargetNode> {
        if question.is_empty() {
            return (node.area == RankingArea::Ranked).then_some(DropTargetNode::ToContainer);
        }
        if node.area == RankingArea::Outside {
            return None;
        }
        node.item.clone().map(DropTargetNode::Item)
    }

    #[must_use]
    pub fn get_drop_target_by_node(
        &self,
        question: &RankingQuestion,
        node: &DropTargetNode,
    ) -> Option<RankingDropTarget> {
        match node {
            DropTargetNode::ToContainer => Some(RankingDropTarget::ToContainer),
            DropTargetNode::Item(value) => question
                .choice(value)
                .cloned()
                .map(RankingDropTarget::Item),
        }
    }

    /// Any choice other than the dragged one, or the container.
    #[must_use]
    pub fn is_drop_target_valid(&self, target: &RankingDropTarget) -> bool {
        match target {
            RankingDropTarget::ToContainer => true,
            RankingDropTarget::Item(item) => self
                .session
                .as_ref()
                .is_some_and(|s| !item.has_value(&s.dragged.value)),
        }
    }

    /// Rearrange the question's lists for the current drop target.
    pub fn after_drag_over(&mut self, question: &RankingQuestion) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(target) = session.drop_target.clone() else {
            return;
        };
        let dragged = session.dragged.clone();
        let mut ranked = question.ranked().get();
        let mut unranked = question.unranked().get();
        let dragged_index = position_of(&ranked, &dragged.value);

        let _batch = BatchScope::new();
        let target_index = match &target {
            RankingDropTarget::ToContainer if ranked.is_empty() => {
                if let Some(i) = position_of(&unranked, &dragged.value) {
                    unranked.remove(i);
                }
                ranked.push(dragged);
                question.ranked().set(ranked);
                question.unranked().set(unranked);
                session.shortcut_index = Some(1);
                return;
            }
            RankingDropTarget::ToContainer => ranked.len(),
            RankingDropTarget::Item(item) => match position_of(&ranked, &item.value) {
                Some(i) => i,
                None => {
                    // Target sits in the pool: send the dragged choice back there.
                    if let Some(i) = dragged_index {
                        ranked.remove(i);
                    }
                    if let Some(i) = position_of(&unranked, &dragged.value) {
                        unranked.remove(i);
                    }
                    let at = position_of(&unranked, &item.value).unwrap_or(unranked.len());
                    unranked.insert(at, dragged);
                    question.ranked().set(ranked);
                    question.unranked().set(unranked);
                    session.shortcut_index = None;
                    session.move_direction = None;
                    return;
                }
            },
        };

        if let Some(i) = dragged_index {
            ranked.remove(i);
        }
        let at = target_index.min(ranked.len());
        ranked.insert(at, dragged.clone());
        if let Some(i) = position_of(&unranked, &dragged.value) {
            unranked.remove(i);
        }
        question.ranked().set(ranked);
        question.unranked().set(unranked);
        session.shortcut_index = Some(at + 1);

        let from = dragged_index.map_or(-1, |i| i as isize);
        let to = target_index as isize;
        if from != to {
            session.move_direction = None;
        }
        if from > to {
            session.move_direction = Some(MoveDirection::Down);
        }
        if from < to {
            session.move_direction = Some(MoveDirection::Up);
        }
        trace!(
            target: "survey::dragdrop",
            question = question.name(),
            from,
            to,
            "ranking reordered"
        );
    }

    /// End the gesture, keeping the current order. Returns the answer.
    pub fn finish(&mut self, question: &RankingQuestion) -> Option<Vec<Value>> {
        self.session.take()?;
        let value = question.value();
        debug!(
            target: "survey::dragdrop",
            question = question.name(),
            ranked = value.len(),
            "ranking drag finished"
        );
        Some(value)
    }

    /// End the gesture and restore the lists captured at start. Returns
    /// `false` when no gesture was active.
    pub fn cancel(&mut self, question: &RankingQuestion) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        let _batch = BatchScope::new();
        question.ranked().set(session.ranked_before);
        question.unranked().set(session.unranked_before);
        debug!(target: "survey::dragdrop", question = question.name(), "ranking drag cancelled");
        true
    }
}
