use serde::{Deserialize, Serialize};

use crate::{IdentityKey, Stock};

/// A stock the user picked, with the fields they fill in afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedStock {
    #[serde(flatten)]
    pub stock: Stock,
    identity_key: IdentityKey,
    /// Free-form quantity; validated by whoever consumes the selection.
    pub count: String,
    /// Free-form unit price.
    pub price: String,
    /// Stable query that was active when the stock was selected.
    pub debounced_value: String,
}

impl SelectedStock {
    pub(crate) fn new(stock: Stock, identity_key: IdentityKey, debounced_value: &str) -> Self {
        Self {
            stock,
            identity_key,
            count: String::new(),
            price: String::new(),
            debounced_value: debounced_value.to_owned(),
        }
    }

    pub fn identity_key(&self) -> &IdentityKey {
        &self.identity_key
    }
}
