#![forbid(unsafe_code)]

//! Paged choice loading and display-text resolution.
//!
//! Both hooks follow a request/response shape: the question hands the host a
//! request plus a responder handle, and the host answers through the handle
//! whenever its data arrives, immediately or later. Responders write straight
//! into the question's observables, so a late answer lands even if the popup
//! closed or reopened in between.

use serde_json::Value;
use survey_reactive::{BatchScope, Observable};
use tracing::debug;

use crate::item_value::{ItemValue, position_of};

/// One page of choices to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyLoadRequest {
    pub question: String,
    pub skip: usize,
    pub take: usize,
    /// Text typed into the tagbox when the request was made.
    pub filter: String,
}

/// Handle used to deliver one page of choices.
///
/// A page requested with `skip == 0` replaces the loaded window; any other
/// page is appended to it.
#[derive(Debug, Clone)]
pub struct LazyLoadResponder {
    pub(crate) skip: usize,
    pub(crate) take: usize,
    pub(crate) choices: Observable<Vec<ItemValue>>,
    pub(crate) total: Observable<usize>,
}

impl LazyLoadResponder {
    /// Deliver `items` and the total number of choices available.
    pub fn set_items(&self, items: Vec<ItemValue>, total: usize) {
        let received = items.len();
        let _batch = BatchScope::new();
        if self.skip == 0 {
            self.choices.set(items);
        } else {
            self.choices.update(|loaded| loaded.extend(items));
        }
        self.total.set(total);
        debug!(
            target: "survey::tagbox",
            skip = self.skip,
            take = self.take,
            received,
            total,
            loaded = self.choices.with(Vec::len),
            "lazy load page applied"
        );
    }
}

/// Host data source for lazily loaded choices.
pub trait ChoicesLazyLoadHandler {
    fn load(&self, request: &LazyLoadRequest, responder: LazyLoadResponder);
}

impl<F> ChoicesLazyLoadHandler for F
where
    F: Fn(&LazyLoadRequest, LazyLoadResponder),
{
    fn load(&self, request: &LazyLoadRequest, responder: LazyLoadResponder) {
        self(request, responder);
    }
}

/// Handle used to deliver display texts for values outside the loaded window.
#[derive(Debug, Clone)]
pub struct DisplayValueResponder {
    pub(crate) values: Vec<Value>,
    pub(crate) cache: Observable<Vec<ItemValue>>,
}

impl DisplayValueResponder {
    /// Values whose texts were requested, in request order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Texts for [`values`](Self::values), matched by position. Extra texts
    /// are ignored; values without a text keep showing their raw form.
    pub fn set_items(&self, texts: Vec<String>) {
        let resolved = texts.len().min(self.values.len());
        self.cache.update(|cache| {
            for (value, text) in self.values.iter().zip(texts) {
                match position_of(cache, value) {
                    Some(i) => cache[i].text = Some(text),
                    None => cache.push(ItemValue::with_text(value.clone(), text)),
                }
            }
        });
        debug!(target: "survey::tagbox", requested = self.values.len(), resolved, "display values resolved");
    }
}

/// Host lookup of display texts for answer values that are not loaded.
pub trait ChoiceDisplayValueResolver {
    fn resolve(&self, question: &str, responder: DisplayValueResponder);
}

impl<F> ChoiceDisplayValueResolver for F
where
    F: Fn(&str, DisplayValueResponder),
{
    fn resolve(&self, question: &str, responder: DisplayValueResponder) {
        self(question, responder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn responder(skip: usize, choices: &Observable<Vec<ItemValue>>) -> LazyLoadResponder {
        LazyLoadResponder {
            skip,
            take: 2,
            choices: choices.clone(),
            total: Observable::new(0),
        }
    }

    #[test]
    fn first_page_replaces_later_pages_append() {
        let choices = Observable::new(vec![ItemValue::new(99)]);
        responder(0, &choices).set_items(vec![ItemValue::new(1), ItemValue::new(2)], 4);
        responder(2, &choices).set_items(vec![ItemValue::new(3)], 4);
        let values: Vec<Value> = choices.get().into_iter().map(|i| i.value).collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn display_texts_update_cache_in_place() {
        let cache = Observable::new(vec![ItemValue::with_text(5, "old")]);
        let responder = DisplayValueResponder {
            values: vec![json!(5), json!(6)],
            cache: cache.clone(),
        };
        responder.set_items(vec!["five".into()]);
        assert_eq!(cache.get(), vec![ItemValue::with_text(5, "five")]);
        responder.set_items(vec!["five".into(), "six".into(), "extra".into()]);
        assert_eq!(cache.get().len(), 2);
    }
}
