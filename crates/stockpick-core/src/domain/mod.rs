//! # Domain Models
//!
//! Catalog types returned by the search service and the selection record
//! built from them.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Stock`] | Immutable catalog entry |
//! | [`IdentityKey`] | Ticker-or-stock-code key used for all matching |
//! | [`SelectedStock`] | A picked stock plus user-editable count and price |
//! | [`CountryType`], [`MarketType`], [`AssetCategoryType`] | Listing metadata |
//!
//! Identity is always derived through [`IdentityKey::derive`]; two stocks are
//! "the same" for selection purposes when their keys are equal, regardless of
//! any other field.

mod selected;
mod stock;

pub use selected::SelectedStock;
pub use stock::{AssetCategoryType, CountryType, IdentityKey, MarketType, Stock};
