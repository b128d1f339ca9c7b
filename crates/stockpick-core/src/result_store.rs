use serde::Serialize;

use crate::{ResultPage, Stock};

/// Merged result list for the active stable query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultStore {
    entries: Vec<Stock>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the store to exactly the entries of `page`.
    pub fn replace(&mut self, page: ResultPage) {
        self.entries = page.entries;
    }

    /// Append the entries of `page` after the existing ones, in fetch order.
    pub fn append(&mut self, page: ResultPage) {
        self.entries.extend(page.entries);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[Stock] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Stock> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What the result area should show.
///
/// `NoQuery` and `NoResults` are both "empty" but mean different things and
/// must be rendered differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RenderState {
    NoQuery,
    Loading,
    Results { count: usize },
    NoResults,
    Failed { code: String, message: String },
}
