//! The running set of stocks the user picked across queries.

use tracing::{debug, warn};

use crate::{IdentityKey, SelectedStock, Stock, ValidationError};

/// Result of a [`SelectionSet::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
}

/// Ordered selection keyed by [`IdentityKey`].
///
/// Holds at most one entry per key. Entries keep insertion order and are
/// never touched by result-list resets or fetch failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: Vec<SelectedStock>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deselect `stock` if its key is present, otherwise select it under the
    /// stable query `debounced_value`.
    pub fn toggle(
        &mut self,
        stock: &Stock,
        debounced_value: &str,
    ) -> Result<ToggleOutcome, ValidationError> {
        let key = stock.identity_key().inspect_err(|error| {
            warn!(asset_id = stock.asset_id, %error, "refusing to toggle stock without identity");
        })?;

        if self.remove_key(&key) {
            return Ok(ToggleOutcome::Deselected);
        }

        debug!(key = %key, query = debounced_value, "stock selected");
        self.entries
            .push(SelectedStock::new(stock.clone(), key, debounced_value));
        Ok(ToggleOutcome::Selected)
    }

    /// Remove `stock` by identity. Returns whether anything was removed.
    pub fn remove(&mut self, stock: &Stock) -> bool {
        match stock.identity_key() {
            Ok(key) => self.remove_key(&key),
            Err(_) => false,
        }
    }

    pub fn remove_key(&mut self, key: &IdentityKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|selected| selected.identity_key() != key);
        let removed = self.entries.len() != before;
        if removed {
            debug!(key = %key, "stock deselected");
        }
        removed
    }

    /// Membership by identity; stocks without identity are never selected.
    pub fn is_selected(&self, stock: &Stock) -> bool {
        stock
            .identity_key()
            .map(|key| self.contains_key(&key))
            .unwrap_or(false)
    }

    pub fn contains_key(&self, key: &IdentityKey) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &IdentityKey) -> Option<&SelectedStock> {
        self.entries
            .iter()
            .find(|selected| selected.identity_key() == key)
    }

    /// Look up an entry by the text of its key, whichever code it came from.
    pub fn find_by_code(&self, code: &str) -> Option<&SelectedStock> {
        self.entries
            .iter()
            .find(|selected| selected.identity_key().as_str() == code)
    }

    /// Update the free-form quantity. Returns `false` if `key` is not selected.
    pub fn set_count(&mut self, key: &IdentityKey, count: impl Into<String>) -> bool {
        match self.get_mut(key) {
            Some(selected) => {
                selected.count = count.into();
                true
            }
            None => false,
        }
    }

    /// Update the free-form price. Returns `false` if `key` is not selected.
    pub fn set_price(&mut self, key: &IdentityKey, price: impl Into<String>) -> bool {
        match self.get_mut(key) {
            Some(selected) => {
                selected.price = price.into();
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[SelectedStock] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedStock> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn get_mut(&mut self, key: &IdentityKey) -> Option<&mut SelectedStock> {
        self.entries
            .iter_mut()
            .find(|selected| selected.identity_key() == key)
    }
}
