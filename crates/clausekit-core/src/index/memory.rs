use crate::{
    error::InternalError,
    history::{
        CHANGE_ACTOR, CHANGE_DATE, CHANGE_ENTITY, CHANGE_FIELD, CHANGE_FROM, CHANGE_TO,
        ChangeHistoryIndex, ChangeRecord,
    },
    query::{BoolQuery, EMPTY_TERM, Occur, SearchQuery, VISIBLE_FIELD_IDS},
    resolve::DateSupport,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Bound,
};

type Postings = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

///
/// Document
///
/// Field name → indexed terms. Fields added through `with_*` are also
/// listed under the visibility field.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Visible field holding one exact term.
    #[must_use]
    pub fn with_field(self, field: &str, term: impl Into<String>) -> Self {
        self.visible(field).raw(field, term)
    }

    /// Visible field holding the empty sentinel.
    #[must_use]
    pub fn with_empty(self, field: &str) -> Self {
        self.visible(field).raw(field, EMPTY_TERM)
    }

    /// Visible text field, tokenized the way LIKE queries expect.
    #[must_use]
    pub fn with_text(self, field: &str, text: &str) -> Self {
        let mut doc = self.visible(field);
        for token in text.split_whitespace() {
            doc = doc.raw(field, token.to_lowercase());
        }
        doc
    }

    /// Term with no visibility bookkeeping.
    #[must_use]
    pub fn raw(mut self, field: &str, term: impl Into<String>) -> Self {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(term.into());
        self
    }

    /// Change document for one recorded transition.
    #[must_use]
    pub fn from_change(id: impl Into<String>, change: &ChangeRecord, dates: &dyn DateSupport) -> Self {
        Self::new(id)
            .raw(CHANGE_ENTITY, &change.entity)
            .raw(CHANGE_FIELD, &change.field)
            .raw(CHANGE_FROM, change.from_term())
            .raw(CHANGE_TO, change.to_term())
            .raw(CHANGE_ACTOR, &change.actor)
            .raw(CHANGE_DATE, dates.index_value(change.at))
    }

    fn visible(self, field: &str) -> Self {
        let listed = self
            .fields
            .get(VISIBLE_FIELD_IDS)
            .is_some_and(|fields| fields.iter().any(|f| f == field));
        if listed {
            self
        } else {
            self.raw(VISIBLE_FIELD_IDS, field)
        }
    }
}

///
/// MemoryIndex
///
/// Postings keyed by field then term. Boolean groups follow the usual
/// inverted-index reading: every MUST applies, SHOULDs are alternatives
/// only when there is no MUST, MUST_NOTs subtract, and a group without a
/// positive clause matches nothing.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryIndex {
    documents: BTreeMap<String, Document>,
    postings: Postings,
}

impl MemoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `doc`, replacing any document with the same id.
    pub fn insert(&mut self, doc: Document) {
        self.remove(&doc.id);
        for (field, terms) in &doc.fields {
            let field_postings = self.postings.entry(field.clone()).or_default();
            for term in terms {
                field_postings
                    .entry(term.clone())
                    .or_default()
                    .insert(doc.id.clone());
            }
        }
        self.documents.insert(doc.id.clone(), doc);
    }

    pub fn remove(&mut self, id: &str) -> Option<Document> {
        let doc = self.documents.remove(id)?;
        for (field, terms) in &doc.fields {
            let Some(field_postings) = self.postings.get_mut(field) else {
                continue;
            };
            for term in terms {
                if let Some(ids) = field_postings.get_mut(term) {
                    ids.remove(id);
                    if ids.is_empty() {
                        field_postings.remove(term);
                    }
                }
            }
        }

        Some(doc)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Ids of every document matching `query`.
    #[must_use]
    pub fn search(&self, query: &SearchQuery) -> BTreeSet<String> {
        match query {
            SearchQuery::MatchAll => self.documents.keys().cloned().collect(),
            SearchQuery::MatchNone => BTreeSet::new(),
            SearchQuery::Term { field, value } => self
                .postings
                .get(field)
                .and_then(|terms| terms.get(value))
                .cloned()
                .unwrap_or_default(),
            SearchQuery::Range {
                field,
                lower,
                upper,
            } => self.union_terms(field, |term| in_range(term, lower, upper)),
            SearchQuery::Prefix { field, prefix } => {
                self.union_terms(field, |term| term.starts_with(prefix.as_str()))
            }
            SearchQuery::Bool(group) => self.search_bool(group),
            SearchQuery::IdSet(ids) => ids
                .iter()
                .filter(|id| self.documents.contains_key(id.as_str()))
                .cloned()
                .collect(),
        }
    }

    fn search_bool(&self, group: &BoolQuery) -> BTreeSet<String> {
        if group.is_all_negative() {
            return BTreeSet::new();
        }

        let clauses = |occur: Occur| {
            group
                .clauses
                .iter()
                .filter(move |(o, _)| *o == occur)
                .map(|(_, query)| query)
        };

        let mut musts = clauses(Occur::Must).map(|query| self.search(query));
        let mut matched = match musts.next() {
            Some(first) => musts.fold(first, |acc, ids| &acc & &ids),
            None => clauses(Occur::Should)
                .flat_map(|query| self.search(query))
                .collect(),
        };
        for query in clauses(Occur::MustNot) {
            if matched.is_empty() {
                break;
            }
            matched = &matched - &self.search(query);
        }

        matched
    }

    fn union_terms(&self, field: &str, keep: impl Fn(&str) -> bool) -> BTreeSet<String> {
        self.postings
            .get(field)
            .into_iter()
            .flat_map(|terms| terms.iter())
            .filter(|(term, _)| keep(term.as_str()))
            .flat_map(|(_, ids)| ids.iter().cloned())
            .collect()
    }
}

impl ChangeHistoryIndex for MemoryIndex {
    fn matching_entities(&self, query: &SearchQuery) -> Result<BTreeSet<String>, InternalError> {
        if contains_id_set(query) {
            return Err(InternalError::index_unsupported(
                "change-history search cannot filter on entity ids",
            ));
        }

        let entities = self
            .search(query)
            .iter()
            .filter_map(|id| self.documents.get(id))
            .filter_map(|doc| doc.fields.get(CHANGE_ENTITY))
            .flatten()
            .cloned()
            .collect();

        Ok(entities)
    }
}

fn in_range(term: &str, lower: &Bound<String>, upper: &Bound<String>) -> bool {
    let above = match lower {
        Bound::Included(low) => term >= low.as_str(),
        Bound::Excluded(low) => term > low.as_str(),
        Bound::Unbounded => true,
    };
    let below = match upper {
        Bound::Included(high) => term <= high.as_str(),
        Bound::Excluded(high) => term < high.as_str(),
        Bound::Unbounded => true,
    };

    above && below
}

fn contains_id_set(query: &SearchQuery) -> bool {
    match query {
        SearchQuery::IdSet(_) => true,
        SearchQuery::Bool(group) => group.clauses.iter().any(|(_, q)| contains_id_set(q)),
        _ => false,
    }
}
