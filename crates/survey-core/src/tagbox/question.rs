#![forbid(unsafe_code)]

//! Tagbox question: multi-select dropdown with optional lazy loading.
//!
//! The answer is the only selection state. Which list entries look selected,
//! which are disabled and which selected items the tagbox shows are all
//! derived from the answer and the loaded choice window on demand.
//!
//! # Invariants
//!
//! 1. Loading, reloading or filtering choices never changes the answer.
//! 2. A selected value keeps its display text after its page is unloaded:
//!    texts come from the loaded window, then from items picked in the list,
//!    then from the host resolver.
//! 3. `"none"` is exclusive: it is either the whole answer or absent.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use survey_i18n::StringCatalog;
use survey_reactive::{BatchScope, Observable};
use tracing::debug;

use super::lazy::{
    ChoiceDisplayValueResolver, ChoicesLazyLoadHandler, DisplayValueResponder, LazyLoadRequest,
    LazyLoadResponder,
};
use super::list::MultiSelectListModel;
use crate::item_value::{ItemValue, position_of};
use crate::settings::SurveySettings;

/// Answer value of the "none" entry.
pub const NONE_VALUE: &str = "none";
/// Answer value of the "other" entry.
pub const OTHER_VALUE: &str = "other";
/// Action id of the "select all" entry.
pub const SELECT_ALL_ID: &str = "selectall";

/// Entry that receives focus when the popup opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    FirstItem,
    FirstSelectedItem,
}

/// What the select-all entry shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    /// Every loaded choice is selected.
    All,
    /// Some choice is selected, but not every loaded one.
    Partial,
    /// No choice is selected. "None" on its own counts as nothing.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SpecialTitles {
    pub(crate) select_all: String,
    pub(crate) none: String,
    pub(crate) other: String,
}

impl SpecialTitles {
    fn from_catalog(catalog: &StringCatalog, locale: &str) -> Self {
        let text = |key: &str, fallback: &str| {
            catalog.get(locale, key).unwrap_or(fallback).to_string()
        };
        Self {
            select_all: text("selectAllItemText", "Select All"),
            none: text("noneItemText", "None"),
            other: text("otherItemText", "Other"),
        }
    }
}

pub struct TagboxQuestion {
    name: String,
    has_select_all: bool,
    has_none: bool,
    has_other: bool,
    max_selected_choices: Option<usize>,
    hide_selected_items: bool,
    close_on_select: Option<bool>,
    default_close_on_select: bool,
    lazy_load_enabled: bool,
    lazy_load_page_size: usize,
    is_touch: bool,
    pub(crate) titles: SpecialTitles,
    choices: Observable<Vec<ItemValue>>,
    total_count: Observable<usize>,
    value: Observable<Vec<Value>>,
    filter_string: Observable<String>,
    popup_visible: Observable<bool>,
    value_on_open: RefCell<Option<Vec<Value>>>,
    display_cache: Observable<Vec<ItemValue>>,
    lazy_handler: Option<Rc<dyn ChoicesLazyLoadHandler>>,
    display_resolver: Option<Rc<dyn ChoiceDisplayValueResolver>>,
}

impl fmt::Debug for TagboxQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagboxQuestion")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("loaded", &self.choices.with(Vec::len))
            .field("total_count", &self.total_count.get())
            .field("lazy_load_enabled", &self.lazy_load_enabled)
            .field("has_lazy_handler", &self.lazy_handler.is_some())
            .field("has_display_resolver", &self.display_resolver.is_some())
            .finish_non_exhaustive()
    }
}

impl TagboxQuestion {
    /// Empty tagbox using the survey's settings for defaults and locale.
    #[must_use]
    pub fn new(name: impl Into<String>, settings: &SurveySettings) -> Self {
        let catalog = survey_i18n::default_catalog();
        Self {
            name: name.into(),
            has_select_all: false,
            has_none: false,
            has_other: false,
            max_selected_choices: None,
            hide_selected_items: false,
            close_on_select: None,
            default_close_on_select: settings.tagbox_close_on_select,
            lazy_load_enabled: false,
            lazy_load_page_size: settings.lazy_load_page_size,
            is_touch: false,
            titles: SpecialTitles::from_catalog(&catalog, &settings.locale),
            choices: Observable::named("visibleChoices", Vec::new()),
            total_count: Observable::named("choicesLazyLoadTotal", 0),
            value: Observable::named("value", Vec::new()),
            filter_string: Observable::named("filterString", String::new()),
            popup_visible: Observable::named("isPopupVisible", false),
            value_on_open: RefCell::new(None),
            display_cache: Observable::named("selectedChoices", Vec::new()),
            lazy_handler: None,
            display_resolver: None,
        }
    }

    #[must_use]
    pub fn with_choices(self, choices: Vec<ItemValue>) -> Self {
        self.total_count.set(choices.len());
        self.choices.set(choices);
        self
    }

    #[must_use]
    pub fn with_select_all(mut self, enabled: bool) -> Self {
        self.has_select_all = enabled;
        self
    }

    #[must_use]
    pub fn with_none(mut self, enabled: bool) -> Self {
        self.has_none = enabled;
        self
    }

    #[must_use]
    pub fn with_other(mut self, enabled: bool) -> Self {
        self.has_other = enabled;
        self
    }

    #[must_use]
    pub fn with_max_selected_choices(mut self, max: usize) -> Self {
        self.max_selected_choices = (max > 0).then_some(max);
        self
    }

    #[must_use]
    pub fn with_hide_selected_items(mut self, hide: bool) -> Self {
        self.hide_selected_items = hide;
        self
    }

    #[must_use]
    pub fn with_close_on_select(mut self, close: bool) -> Self {
        self.close_on_select = Some(close);
        self
    }

    /// Load choices page by page from a [`ChoicesLazyLoadHandler`].
    #[must_use]
    pub fn with_lazy_load(mut self, enabled: bool) -> Self {
        self.lazy_load_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_lazy_load_page_size(mut self, page_size: usize) -> Self {
        self.lazy_load_page_size = page_size.max(1);
        self
    }

    /// Touch devices confirm the popup with done/cancel.
    #[must_use]
    pub fn with_touch(mut self, is_touch: bool) -> Self {
        self.is_touch = is_touch;
        self
    }

    #[must_use]
    pub fn with_default_value(self, values: Vec<Value>) -> Self {
        self.set_value(values);
        self
    }

    /// Resolve built-in entry titles from `catalog`.
    #[must_use]
    pub fn with_catalog(mut self, catalog: &StringCatalog, locale: &str) -> Self {
        self.titles = SpecialTitles::from_catalog(catalog, locale);
        self
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn has_select_all(&self) -> bool {
        self.has_select_all
    }

    #[must_use]
    pub fn has_none(&self) -> bool {
        self.has_none
    }

    #[must_use]
    pub fn has_other(&self) -> bool {
        self.has_other
    }

    #[must_use]
    pub fn max_selected_choices(&self) -> Option<usize> {
        self.max_selected_choices
    }

    pub fn set_max_selected_choices(&mut self, max: Option<usize>) {
        self.max_selected_choices = max.filter(|m| *m > 0);
    }

    #[must_use]
    pub fn hide_selected_items(&self) -> bool {
        self.hide_selected_items
    }

    pub fn set_hide_selected_items(&mut self, hide: bool) {
        self.hide_selected_items = hide;
    }

    /// Explicit setting, else the survey-wide default.
    #[must_use]
    pub fn close_on_select(&self) -> bool {
        self.close_on_select.unwrap_or(self.default_close_on_select)
    }

    pub fn set_close_on_select(&mut self, close: Option<bool>) {
        self.close_on_select = close;
    }

    #[must_use]
    pub fn is_lazy_load_enabled(&self) -> bool {
        self.lazy_load_enabled
    }

    #[must_use]
    pub fn lazy_load_page_size(&self) -> usize {
        self.lazy_load_page_size
    }

    #[must_use]
    pub fn is_touch(&self) -> bool {
        self.is_touch
    }

    pub fn set_lazy_load_handler(&mut self, handler: impl ChoicesLazyLoadHandler + 'static) {
        self.lazy_handler = Some(Rc::new(handler));
    }

    /// Install the display-text lookup and resolve the current answer.
    pub fn set_display_value_resolver(
        &mut self,
        resolver: impl ChoiceDisplayValueResolver + 'static,
    ) {
        self.display_resolver = Some(Rc::new(resolver));
        self.request_display_values();
    }

    /// Loaded choices: every choice, or the lazily loaded window.
    #[must_use]
    pub fn choices(&self) -> Vec<ItemValue> {
        self.choices.get()
    }

    #[must_use]
    pub fn choices_observable(&self) -> &Observable<Vec<ItemValue>> {
        &self.choices
    }

    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.choices.with(Vec::len)
    }

    /// Total reported by the last lazy page, or the static choice count.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count.get()
    }

    #[must_use]
    pub fn has_more_choices(&self) -> bool {
        self.lazy_load_enabled && self.loaded_count() < self.total_count()
    }

    // -----------------------------------------------------------------------
    // Value
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn value(&self) -> Vec<Value> {
        self.value.get()
    }

    #[must_use]
    pub fn value_observable(&self) -> &Observable<Vec<Value>> {
        &self.value
    }

    /// Replace the answer. Values outside the loaded window are sent to the
    /// display resolver.
    pub fn set_value(&self, values: Vec<Value>) {
        self.value.set(values);
        self.request_display_values();
    }

    /// Answer as edited in the tagbox input: duplicates are dropped and
    /// `"none"` only survives on its own.
    pub fn set_rendered_value(&self, values: Vec<Value>) {
        let mut rendered: Vec<Value> = Vec::with_capacity(values.len());
        for v in values {
            if !rendered.contains(&v) {
                rendered.push(v);
            }
        }
        let none = Value::from(NONE_VALUE);
        if rendered.len() > 1 && rendered.contains(&none) {
            rendered.retain(|v| *v != none);
        }
        self.set_value(rendered);
    }

    /// Drop answer values that match no choice. Does nothing while lazy
    /// loading, because the loaded window is only part of the choices.
    pub fn clear_incorrect_values(&self) {
        if self.lazy_load_enabled {
            return;
        }
        let choices = self.choices.get();
        self.value.update(|values| {
            values.retain(|v| {
                position_of(&choices, v).is_some()
                    || (self.has_none && v.as_str() == Some(NONE_VALUE))
                    || (self.has_other && v.as_str() == Some(OTHER_VALUE))
            });
        });
    }

    /// Items for the current answer, in answer order.
    #[must_use]
    pub fn selected_items(&self) -> Vec<ItemValue> {
        let choices = self.choices.get();
        let cache = self.display_cache.get();
        self.value.with(|values| {
            values
                .iter()
                .map(|v| self.item_for_value(v, &choices, &cache))
                .collect()
        })
    }

    fn item_for_value(&self, value: &Value, choices: &[ItemValue], cache: &[ItemValue]) -> ItemValue {
        if let Some(i) = position_of(choices, value) {
            return choices[i].clone();
        }
        if let Some(i) = position_of(cache, value) {
            return cache[i].clone();
        }
        match value.as_str() {
            Some(NONE_VALUE) if self.has_none => {
                ItemValue::with_text(NONE_VALUE, self.titles.none.clone())
            }
            Some(OTHER_VALUE) if self.has_other => {
                ItemValue::with_text(OTHER_VALUE, self.titles.other.clone())
            }
            _ => ItemValue::new(value.clone()),
        }
    }

    /// Remember an item picked from the list so its text outlives its page.
    pub(crate) fn remember_item(&self, item: &ItemValue) {
        if item.text.is_none() {
            return;
        }
        self.display_cache.update(|cache| match position_of(cache, &item.value) {
            Some(i) => cache[i] = item.clone(),
            None => cache.push(item.clone()),
        });
    }

    fn request_display_values(&self) {
        if !self.lazy_load_enabled {
            return;
        }
        let Some(resolver) = self.display_resolver.clone() else {
            return;
        };
        let choices = self.choices.get();
        let cache = self.display_cache.get();
        let missing: Vec<Value> = self.value.with(|values| {
            values
                .iter()
                .filter(|v| position_of(&choices, v).is_none() && position_of(&cache, v).is_none())
                .filter(|v| !matches!(v.as_str(), Some(NONE_VALUE | OTHER_VALUE)))
                .cloned()
                .collect()
        });
        if missing.is_empty() {
            return;
        }
        debug!(target: "survey::tagbox", question = %self.name, values = missing.len(), "resolving display values");
        resolver.resolve(
            &self.name,
            DisplayValueResponder {
                values: missing,
                cache: self.display_cache.clone(),
            },
        );
    }

    // -----------------------------------------------------------------------
    // Selection helpers
    // -----------------------------------------------------------------------

    pub(crate) fn is_value_selected(&self, value: &Value) -> bool {
        self.value.with(|values| values.contains(value))
    }

    /// State of the select-all entry. Selected values outside the loaded
    /// window make the state `Partial` until the whole window is selected.
    #[must_use]
    pub fn select_all_state(&self) -> SelectAllState {
        let any_selected = self
            .value
            .with(|values| values.iter().any(|v| v.as_str() != Some(NONE_VALUE)));
        if !any_selected {
            SelectAllState::None
        } else if self.is_all_selected() {
            SelectAllState::All
        } else {
            SelectAllState::Partial
        }
    }

    /// Every loaded choice is selected.
    pub(crate) fn is_all_selected(&self) -> bool {
        self.choices.with(|choices| {
            !choices.is_empty() && choices.iter().all(|c| self.is_value_selected(&c.value))
        })
    }

    pub(crate) fn is_max_reached(&self) -> bool {
        let Some(max) = self.max_selected_choices else {
            return false;
        };
        let count = self
            .value
            .with(|values| values.iter().filter(|v| v.as_str() != Some(NONE_VALUE)).count());
        count >= max
    }

    pub(crate) fn toggle_value(&self, value: &Value) {
        let none = Value::from(NONE_VALUE);
        self.value.update(|values| {
            if let Some(i) = values.iter().position(|v| v == value) {
                values.remove(i);
            } else {
                values.retain(|v| *v != none);
                values.push(value.clone());
            }
        });
    }

    pub(crate) fn toggle_none(&self) {
        let none = Value::from(NONE_VALUE);
        if self.is_value_selected(&none) {
            self.value.set(Vec::new());
        } else {
            self.value.set(vec![none]);
        }
    }

    /// Select every loaded choice, keeping selected values outside the
    /// window; clears the answer when everything is already selected.
    pub(crate) fn toggle_select_all(&self) {
        if self.is_all_selected() {
            self.value.set(Vec::new());
            return;
        }
        let mut next: Vec<Value> = self
            .choices
            .with(|choices| choices.iter().map(|c| c.value.clone()).collect());
        let off_page: Vec<Value> = self.value.with(|values| {
            values
                .iter()
                .filter(|v| !next.contains(v))
                .filter(|v| !matches!(v.as_str(), Some(NONE_VALUE | OTHER_VALUE)))
                .cloned()
                .collect()
        });
        next.extend(off_page);
        self.value.set(next);
    }

    // -----------------------------------------------------------------------
    // Filter and popup
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn filter_string(&self) -> String {
        self.filter_string.get()
    }

    /// Change the typed filter. While the popup is open a lazy tagbox
    /// reloads its first page with the new filter.
    pub fn set_filter_string(&self, filter: impl Into<String>) {
        let filter = filter.into();
        if self.filter_string.with(|f| *f == filter) {
            return;
        }
        self.filter_string.set(filter);
        if self.lazy_load_enabled && self.is_popup_visible() {
            self.request_page(0);
        }
    }

    #[must_use]
    pub fn is_popup_visible(&self) -> bool {
        self.popup_visible.get()
    }

    #[must_use]
    pub fn popup_visible_observable(&self) -> &Observable<bool> {
        &self.popup_visible
    }

    /// Open the popup. A lazy tagbox requests its first page, replacing
    /// whatever was loaded before.
    pub fn open_popup(&self) {
        if self.is_popup_visible() {
            return;
        }
        *self.value_on_open.borrow_mut() = Some(self.value.get());
        self.popup_visible.set(true);
        if self.lazy_load_enabled {
            self.request_page(0);
        }
    }

    pub fn close_popup(&self) {
        let _batch = BatchScope::new();
        self.value_on_open.borrow_mut().take();
        self.popup_visible.set(false);
        self.set_filter_string(String::new());
    }

    pub fn toggle_popup(&self) {
        if self.is_popup_visible() {
            self.close_popup();
        } else {
            self.open_popup();
        }
    }

    /// Request the next page after the loaded window. Returns `false` when
    /// everything is loaded or lazy loading is off.
    pub fn load_more(&self) -> bool {
        if !self.has_more_choices() {
            return false;
        }
        self.request_page(self.loaded_count());
        true
    }

    fn request_page(&self, skip: usize) {
        let Some(handler) = self.lazy_handler.clone() else {
            return;
        };
        let request = LazyLoadRequest {
            question: self.name.clone(),
            skip,
            take: self.lazy_load_page_size,
            filter: self.filter_string.get(),
        };
        debug!(
            target: "survey::tagbox",
            question = %self.name,
            skip,
            take = request.take,
            loaded = self.loaded_count(),
            total = self.total_count(),
            "lazy load requested"
        );
        let responder = LazyLoadResponder {
            skip,
            take: request.take,
            choices: self.choices.clone(),
            total: self.total_count.clone(),
        };
        handler.load(&request, responder);
    }

    // -----------------------------------------------------------------------
    // Touch popup footer
    // -----------------------------------------------------------------------

    /// Done is offered once the answer differs from the one the popup
    /// opened with.
    #[must_use]
    pub fn popup_done_enabled(&self) -> bool {
        self.is_touch
            && self.is_popup_visible()
            && self
                .value_on_open
                .borrow()
                .as_ref()
                .is_some_and(|before| self.value.with(|v| v != before))
    }

    /// Keep the edited answer and close.
    pub fn popup_apply(&self) {
        self.close_popup();
    }

    /// Restore the answer the popup opened with and close.
    pub fn popup_cancel(&self) {
        let before = self.value_on_open.borrow_mut().take();
        if let Some(before) = before {
            self.value.set(before);
        }
        self.close_popup();
    }

    #[must_use]
    pub fn focus_target(&self) -> FocusTarget {
        let has_value = self.value.with(|v| !v.is_empty());
        if self.is_touch && !self.hide_selected_items && has_value {
            FocusTarget::FirstSelectedItem
        } else {
            FocusTarget::FirstItem
        }
    }

    /// List view over this question's choices.
    #[must_use]
    pub fn list(&self) -> MultiSelectListModel<'_> {
        MultiSelectListModel::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(names: &[&str]) -> Vec<ItemValue> {
        names.iter().map(|n| ItemValue::from(*n)).collect()
    }

    #[test]
    fn close_on_select_defaults_from_settings() {
        let settings = SurveySettings::default();
        let q = TagboxQuestion::new("q1", &settings);
        assert!(!q.close_on_select());
        assert!(TagboxQuestion::new("q2", &settings).with_close_on_select(true).close_on_select());

        let settings = SurveySettings {
            tagbox_close_on_select: true,
            ..SurveySettings::default()
        };
        let mut q = TagboxQuestion::new("q3", &settings);
        assert!(q.close_on_select());
        q.set_close_on_select(Some(false));
        assert!(!q.close_on_select());
    }

    #[test]
    fn clear_incorrect_values_drops_unknown_answers() {
        let q = TagboxQuestion::new("q1", &SurveySettings::default())
            .with_choices(items(&["a", "b"]))
            .with_none(true)
            .with_default_value(vec![json!("a"), json!("zzz"), json!("none")]);
        q.clear_incorrect_values();
        assert_eq!(q.value(), vec![json!("a"), json!("none")]);
    }

    #[test]
    fn rendered_value_dedups_and_drops_none() {
        let q = TagboxQuestion::new("q1", &SurveySettings::default())
            .with_choices(items(&["a", "b"]));
        q.set_rendered_value(vec![json!("a"), json!("a"), json!("none"), json!("b")]);
        assert_eq!(q.value(), vec![json!("a"), json!("b")]);
        q.set_rendered_value(vec![json!("none")]);
        assert_eq!(q.value(), vec![json!("none")]);
    }

    #[test]
    fn selected_items_use_special_titles() {
        let q = TagboxQuestion::new("q1", &SurveySettings::default())
            .with_choices(items(&["a"]))
            .with_none(true)
            .with_default_value(vec![json!("none")]);
        assert_eq!(q.selected_items(), vec![ItemValue::with_text("none", "None")]);
    }

    #[test]
    fn portuguese_titles() {
        let settings = SurveySettings {
            locale: "pt".into(),
            ..SurveySettings::default()
        };
        let q = TagboxQuestion::new("q1", &settings);
        assert_eq!(q.titles.select_all, "Selecionar Todos");
        assert_eq!(q.titles.none, "Nenhum");
    }

    #[test]
    fn focus_target_on_touch() {
        let mut q = TagboxQuestion::new("q1", &SurveySettings::default())
            .with_choices(items(&["a", "b"]))
            .with_touch(true);
        assert_eq!(q.focus_target(), FocusTarget::FirstItem);
        q.set_value(vec![json!("a")]);
        assert_eq!(q.focus_target(), FocusTarget::FirstSelectedItem);
        q.set_hide_selected_items(true);
        assert_eq!(q.focus_target(), FocusTarget::FirstItem);
    }

    #[test]
    fn load_more_without_lazy_loading_is_noop() {
        let q = TagboxQuestion::new("q1", &SurveySettings::default())
            .with_choices(items(&["a"]));
        assert!(!q.load_more());
        assert_eq!(q.total_count(), 1);
    }
}
