use crate::{
    clause::Value,
    resolve::DateSupport,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

///
/// IndexInfoResolver
///
/// Maps a caller-facing value onto the term(s) it is indexed as. A value
/// may map to several terms (a name shared by two ids) or to none.
///

pub trait IndexInfoResolver: Send + Sync {
    fn indexed_values(&self, value: &Value) -> Vec<String>;
}

///
/// TextIndexInfoResolver
///
/// Values are indexed as their raw text, optionally case-folded.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TextIndexInfoResolver {
    casefold: bool,
}

impl TextIndexInfoResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self { casefold: false }
    }

    #[must_use]
    pub const fn casefolded() -> Self {
        Self { casefold: true }
    }
}

impl IndexInfoResolver for TextIndexInfoResolver {
    fn indexed_values(&self, value: &Value) -> Vec<String> {
        let text = value.as_text();
        if self.casefold {
            vec![text.to_lowercase()]
        } else {
            vec![text]
        }
    }
}

///
/// NumberIndexInfoResolver
///
/// Numbers are indexed in a fixed-width, sign-flipped form so lexical
/// order matches numeric order.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NumberIndexInfoResolver;

impl NumberIndexInfoResolver {
    #[must_use]
    pub fn encode(n: i64) -> String {
        format!("{:020}", n.cast_unsigned() ^ (1u64 << 63))
    }
}

impl IndexInfoResolver for NumberIndexInfoResolver {
    fn indexed_values(&self, value: &Value) -> Vec<String> {
        match value {
            Value::Number(n) => vec![Self::encode(*n)],
            Value::Text(text) => text
                .trim()
                .parse::<i64>()
                .map(|n| vec![Self::encode(n)])
                .unwrap_or_default(),
            Value::Date(_) => Vec::new(),
        }
    }
}

///
/// DateIndexInfoResolver
///
/// Dates are indexed at the lower bound of the range their literal implies.
///

#[derive(Clone)]
pub struct DateIndexInfoResolver {
    dates: Arc<dyn DateSupport>,
}

impl DateIndexInfoResolver {
    #[must_use]
    pub fn new(dates: Arc<dyn DateSupport>) -> Self {
        Self { dates }
    }
}

impl IndexInfoResolver for DateIndexInfoResolver {
    fn indexed_values(&self, value: &Value) -> Vec<String> {
        self.dates
            .range_of(value)
            .map(|range| vec![self.dates.index_value(range.lower)])
            .unwrap_or_default()
    }
}

///
/// NameIdIndexInfoResolver
///
/// Named domain objects (catalogs, statuses, users) indexed by id. Names
/// match case-insensitively; a literal that already is a known id maps to
/// itself.
///

#[derive(Clone, Debug, Default)]
pub struct NameIdIndexInfoResolver {
    by_name: BTreeMap<String, BTreeSet<String>>,
    ids: BTreeSet<String>,
}

impl NameIdIndexInfoResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as a display name for `id`.
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, name: &str) -> Self {
        let id = id.into();
        self.by_name
            .entry(name.to_lowercase())
            .or_default()
            .insert(id.clone());
        self.ids.insert(id);
        self
    }
}

impl IndexInfoResolver for NameIdIndexInfoResolver {
    fn indexed_values(&self, value: &Value) -> Vec<String> {
        match value {
            Value::Text(text) => {
                if let Some(ids) = self.by_name.get(&text.to_lowercase()) {
                    return ids.iter().cloned().collect();
                }
                if self.ids.contains(text) {
                    return vec![text.clone()];
                }
                Vec::new()
            }
            Value::Number(n) => {
                let id = n.to_string();
                if self.ids.contains(&id) {
                    vec![id]
                } else {
                    Vec::new()
                }
            }
            Value::Date(_) => Vec::new(),
        }
    }
}
