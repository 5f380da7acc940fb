use crate::catalog::TermKey;
use crate::error::{Error, Result};
use crate::indexer::TermIndex;
use std::collections::HashMap;

/// Every term's search index, keyed by term
#[derive(Default)]
pub struct TermIndexStore {
    indexes: HashMap<TermKey, TermIndex>,
}

impl TermIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: TermIndex) {
        self.indexes.insert(index.term().clone(), index);
    }

    /// Index of `term`, or `UnknownTerm` if none was built
    pub fn get_index(&self, term: &TermKey) -> Result<&TermIndex> {
        self.indexes
            .get(term)
            .ok_or_else(|| Error::UnknownTerm(term.clone()))
    }

    /// Terms with an index, sorted
    pub fn terms(&self) -> Vec<&TermKey> {
        let mut terms: Vec<&TermKey> = self.indexes.keys().collect();
        terms.sort();
        terms
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}
