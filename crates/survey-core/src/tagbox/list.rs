#![forbid(unsafe_code)]

//! Multi-select list shown in the tagbox popup.
//!
//! [`MultiSelectListModel`] is a view over a [`TagboxQuestion`]: every call
//! to [`actions`](MultiSelectListModel::actions) rebuilds the entries from
//! the question's current answer and loaded choices, so enabled and visible
//! flags are always up to date. Clicks write the answer back through the
//! question.

use serde_json::Value;
use tracing::trace;

use super::question::{NONE_VALUE, OTHER_VALUE, SELECT_ALL_ID, SelectAllState, TagboxQuestion};
use crate::item_value::value_to_string;

/// Role of a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    SelectAll,
    Choice,
    None,
    Other,
}

/// One entry of the popup list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListAction {
    /// `"selectall"`, `"none"`, `"other"`, or the choice value as a string.
    pub id: String,
    pub kind: ActionKind,
    pub value: Value,
    pub title: String,
    pub enabled: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct MultiSelectListModel<'a> {
    question: &'a TagboxQuestion,
}

impl<'a> MultiSelectListModel<'a> {
    pub(crate) fn new(question: &'a TagboxQuestion) -> Self {
        Self { question }
    }

    /// Entries in display order: select-all, choices, none, other.
    #[must_use]
    pub fn actions(&self) -> Vec<ListAction> {
        let q = self.question;
        let mut actions = Vec::with_capacity(q.loaded_count() + 3);
        if q.has_select_all() {
            actions.push(self.action(
                SELECT_ALL_ID.to_string(),
                ActionKind::SelectAll,
                Value::from(SELECT_ALL_ID),
                q.titles.select_all.clone(),
            ));
        }
        for choice in q.choices() {
            let title = choice.display_text();
            actions.push(self.action(
                value_to_string(&choice.value),
                ActionKind::Choice,
                choice.value,
                title,
            ));
        }
        if q.has_none() {
            actions.push(self.action(
                NONE_VALUE.to_string(),
                ActionKind::None,
                Value::from(NONE_VALUE),
                q.titles.none.clone(),
            ));
        }
        if q.has_other() {
            actions.push(self.action(
                OTHER_VALUE.to_string(),
                ActionKind::Other,
                Value::from(OTHER_VALUE),
                q.titles.other.clone(),
            ));
        }
        actions
    }

    /// Entries currently rendered: everything loaded so far.
    #[must_use]
    pub fn rendered_actions(&self) -> Vec<ListAction> {
        self.actions()
    }

    fn action(&self, id: String, kind: ActionKind, value: Value, title: String) -> ListAction {
        let mut action = ListAction {
            id,
            kind,
            value,
            title,
            enabled: true,
            visible: true,
        };
        action.enabled = self.is_enabled(&action);
        action.visible = self.is_shown(&action);
        action
    }

    fn is_enabled(&self, action: &ListAction) -> bool {
        let q = self.question;
        match action.kind {
            ActionKind::SelectAll => q.max_selected_choices().is_none(),
            ActionKind::None => true,
            ActionKind::Choice | ActionKind::Other => {
                self.is_item_selected(action) || !q.is_max_reached()
            }
        }
    }

    fn is_shown(&self, action: &ListAction) -> bool {
        !(self.question.hide_selected_items()
            && action.kind == ActionKind::Choice
            && self.is_item_selected(action))
    }

    /// Select-all reads as selected only in the `All` state.
    #[must_use]
    pub fn is_item_selected(&self, action: &ListAction) -> bool {
        match action.kind {
            ActionKind::SelectAll => self.select_all_state() == SelectAllState::All,
            _ => self.question.is_value_selected(&action.value),
        }
    }

    #[must_use]
    pub fn select_all_state(&self) -> SelectAllState {
        self.question.select_all_state()
    }

    /// Shown and matching the filter text (case-insensitive substring).
    #[must_use]
    pub fn is_item_visible(&self, action: &ListAction) -> bool {
        self.is_shown(action) && matches_filter(&action.title, &self.question.filter_string())
    }

    /// Entries that currently look selected.
    #[must_use]
    pub fn selected_actions(&self) -> Vec<ListAction> {
        self.actions()
            .into_iter()
            .filter(|a| self.is_item_selected(a))
            .collect()
    }

    #[must_use]
    pub fn filter_string(&self) -> String {
        self.question.filter_string()
    }

    pub fn set_filter_string(&self, filter: impl Into<String>) {
        self.question.set_filter_string(filter);
    }

    /// Apply a click on `action`. Disabled entries are ignored.
    pub fn on_item_click(&self, action: &ListAction) {
        let q = self.question;
        if !self.is_enabled(action) {
            trace!(target: "survey::tagbox", question = q.name(), id = %action.id, "click on disabled item ignored");
            return;
        }
        match action.kind {
            ActionKind::SelectAll => q.toggle_select_all(),
            ActionKind::None => q.toggle_none(),
            ActionKind::Choice => {
                if let Some(choice) = q.choices().into_iter().find(|c| c.has_value(&action.value)) {
                    q.remember_item(&choice);
                }
                q.toggle_value(&action.value);
            }
            ActionKind::Other => q.toggle_value(&action.value),
        }
        q.set_filter_string(String::new());
        if q.close_on_select() && !q.is_touch() {
            q.close_popup();
        }
        trace!(
            target: "survey::tagbox",
            question = q.name(),
            id = %action.id,
            selected = q.value().len(),
            "item clicked"
        );
    }
}

fn matches_filter(title: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || title.to_lowercase().contains(&filter.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_value::ItemValue;
    use crate::settings::SurveySettings;
    use serde_json::json;

    fn tagbox(names: &[&str]) -> TagboxQuestion {
        TagboxQuestion::new("question1", &SurveySettings::default())
            .with_choices(names.iter().map(|n| ItemValue::from(*n)).collect())
    }

    fn selected_count(list: &MultiSelectListModel<'_>) -> usize {
        list.actions().iter().filter(|a| list.is_item_selected(a)).count()
    }

    #[test]
    fn clicks_toggle_and_append() {
        let q = tagbox(&["item1", "item2", "item3", "item4"])
            .with_default_value(vec![json!("item1")]);
        let list = q.list();
        let actions = list.actions();
        assert_eq!(actions.len(), 4);
        assert_eq!(selected_count(&list), 1);

        list.on_item_click(&actions[0]);
        assert_eq!(q.value(), Vec::<Value>::new());
        list.on_item_click(&actions[3]);
        list.on_item_click(&actions[0]);
        assert_eq!(q.value(), vec![json!("item4"), json!("item1")]);
        assert_eq!(selected_count(&list), 2);
    }

    #[test]
    fn action_order_and_ids() {
        let q = tagbox(&["item1", "item2", "item3", "item4", "item5"])
            .with_select_all(true)
            .with_none(true)
            .with_other(true);
        let ids: Vec<String> = q.list().actions().into_iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            vec!["selectall", "item1", "item2", "item3", "item4", "item5", "none", "other"]
        );
    }

    #[test]
    fn filter_matches_case_insensitively() {
        assert!(matches_filter("Item 1", "item"));
        assert!(matches_filter("Item 1", "  "));
        assert!(!matches_filter("Item 2", "1"));
    }

    #[test]
    fn filter_hides_and_click_resets_it() {
        let q = tagbox(&["item1", "item2", "item3", "item4"]);
        let list = q.list();
        list.set_filter_string("1");
        let visible: Vec<ListAction> = list
            .rendered_actions()
            .into_iter()
            .filter(|a| list.is_item_visible(a))
            .collect();
        assert_eq!(visible.len(), 1);
        list.on_item_click(&visible[0]);
        assert_eq!(list.filter_string(), "");
        assert_eq!(q.value(), vec![json!("item1")]);
    }

    #[test]
    fn close_on_select_closes_popup() {
        let q = tagbox(&["a", "b"]).with_close_on_select(true);
        q.open_popup();
        let list = q.list();
        list.on_item_click(&list.actions()[1]);
        assert!(!q.is_popup_visible());
    }
}
