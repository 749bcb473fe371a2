#![forbid(unsafe_code)]

//! Ranking question model.
//!
//! A ranking orders its choices. In the default mode every choice is ranked
//! and the answer is the ranked order. With select-to-rank enabled the
//! choices start in an unranked pool and respondents move the ones they
//! care about into the ranked list; the answer holds only ranked choices.

use serde_json::Value;
use survey_reactive::{BatchScope, Observable};

use crate::item_value::{ItemValue, position_of};

#[derive(Debug, Clone)]
pub struct RankingQuestion {
    name: String,
    choices: Vec<ItemValue>,
    select_to_rank_enabled: bool,
    ranked: Observable<Vec<ItemValue>>,
    unranked: Observable<Vec<ItemValue>>,
}

impl RankingQuestion {
    /// A ranking with every choice ranked in declaration order.
    #[must_use]
    pub fn new(name: impl Into<String>, choices: Vec<ItemValue>) -> Self {
        Self {
            name: name.into(),
            ranked: Observable::named("rankingChoices", choices.clone()),
            unranked: Observable::named("unRankingChoices", Vec::new()),
            choices,
            select_to_rank_enabled: false,
        }
    }

    /// Switch select-to-rank mode. Resets both lists.
    #[must_use]
    pub fn with_select_to_rank(mut self, enabled: bool) -> Self {
        self.select_to_rank_enabled = enabled;
        self.reset_lists();
        self
    }

    fn reset_lists(&self) {
        let _batch = BatchScope::new();
        if self.select_to_rank_enabled {
            self.ranked.set(Vec::new());
            self.unranked.set(self.choices.clone());
        } else {
            self.ranked.set(self.choices.clone());
            self.unranked.set(Vec::new());
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn choices(&self) -> &[ItemValue] {
        &self.choices
    }

    #[must_use]
    pub fn choice(&self, value: &Value) -> Option<&ItemValue> {
        self.choices.iter().find(|c| c.has_value(value))
    }

    #[must_use]
    pub fn is_select_to_rank_enabled(&self) -> bool {
        self.select_to_rank_enabled
    }

    /// Ranked choices, observable.
    #[must_use]
    pub fn ranked(&self) -> &Observable<Vec<ItemValue>> {
        &self.ranked
    }

    /// Unranked pool, observable. Always empty unless select-to-rank is on.
    #[must_use]
    pub fn unranked(&self) -> &Observable<Vec<ItemValue>> {
        &self.unranked
    }

    /// True when nothing is ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.with(Vec::is_empty)
    }

    /// Current answer: values of the ranked choices in order.
    #[must_use]
    pub fn value(&self) -> Vec<Value> {
        self.ranked
            .with(|ranked| ranked.iter().map(|i| i.value.clone()).collect())
    }

    /// Set the answer. Unknown values are ignored. In select-to-rank mode the
    /// remaining choices go to the pool; otherwise they follow the given
    /// values in declaration order.
    pub fn set_value(&self, values: &[Value]) {
        let mut ranked: Vec<ItemValue> = Vec::with_capacity(self.choices.len());
        for v in values {
            if let Some(choice) = self.choice(v)
                && position_of(&ranked, v).is_none()
            {
                ranked.push(choice.clone());
            }
        }
        let rest: Vec<ItemValue> = self
            .choices
            .iter()
            .filter(|c| position_of(&ranked, &c.value).is_none())
            .cloned()
            .collect();

        let _batch = BatchScope::new();
        if self.select_to_rank_enabled {
            self.ranked.set(ranked);
            self.unranked.set(rest);
        } else {
            ranked.extend(rest);
            self.ranked.set(ranked);
        }
    }
}
