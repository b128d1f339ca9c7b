use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Listing country of a stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CountryType {
    Kor,
    Usa,
}

impl CountryType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kor => "KOR",
            Self::Usa => "USA",
        }
    }
}

impl Display for CountryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchange or market segment a stock trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketType {
    Krx,
    KrxKospi,
    KrxKosdaq,
    KrxKonex,
    Nyse,
    Amex,
    Nasdaq,
    #[serde(other)]
    Unknown,
}

impl MarketType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Krx => "KRX",
            Self::KrxKospi => "KRX_KOSPI",
            Self::KrxKosdaq => "KRX_KOSDAQ",
            Self::KrxKonex => "KRX_KONEX",
            Self::Nyse => "NYSE",
            Self::Amex => "AMEX",
            Self::Nasdaq => "NASDAQ",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl Display for MarketType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketType {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_uppercase().as_str() {
            "KRX" => Self::Krx,
            "KRX_KOSPI" => Self::KrxKospi,
            "KRX_KOSDAQ" => Self::KrxKosdaq,
            "KRX_KONEX" => Self::KrxKonex,
            "NYSE" => Self::Nyse,
            "AMEX" => Self::Amex,
            "NASDAQ" => Self::Nasdaq,
            _ => Self::Unknown,
        })
    }
}

/// Instrument category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetCategoryType {
    Stock,
    Etf,
    Etn,
}

impl AssetCategoryType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "STOCK",
            Self::Etf => "ETF",
            Self::Etn => "ETN",
        }
    }
}

/// Identity used for every selection and membership comparison.
///
/// The variant records which code the key was derived from, so a ticker and a
/// stock code with the same text never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum IdentityKey {
    Ticker(String),
    StockCode(String),
}

impl IdentityKey {
    /// Derive the key for a stock: the ticker code when non-empty, otherwise
    /// the stock code.
    pub fn derive(stock: &Stock) -> Result<Self, ValidationError> {
        match (stock.ticker_code.as_deref(), stock.stock_code.as_deref()) {
            (Some(ticker), _) if !ticker.is_empty() => Ok(Self::Ticker(ticker.to_owned())),
            (_, Some(code)) if !code.is_empty() => Ok(Self::StockCode(code.to_owned())),
            _ => Err(ValidationError::InvalidIdentity {
                asset_id: stock.asset_id,
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ticker(code) | Self::StockCode(code) => code,
        }
    }
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry returned by the search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub asset_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_code: Option<String>,
    pub name: String,
    pub country_type: CountryType,
    pub market_type: MarketType,
    pub asset_category_type: AssetCategoryType,
}

impl Stock {
    /// Korean listing identified by its six-digit stock code.
    pub fn krx(
        asset_id: u64,
        stock_code: impl Into<String>,
        name: impl Into<String>,
        market_type: MarketType,
        asset_category_type: AssetCategoryType,
    ) -> Self {
        Self {
            asset_id,
            ticker_code: None,
            stock_code: Some(stock_code.into()),
            name: name.into(),
            country_type: CountryType::Kor,
            market_type,
            asset_category_type,
        }
    }

    /// US listing identified by its ticker.
    pub fn us(
        asset_id: u64,
        ticker_code: impl Into<String>,
        name: impl Into<String>,
        market_type: MarketType,
        asset_category_type: AssetCategoryType,
    ) -> Self {
        Self {
            asset_id,
            ticker_code: Some(ticker_code.into()),
            stock_code: None,
            name: name.into(),
            country_type: CountryType::Usa,
            market_type,
            asset_category_type,
        }
    }

    pub fn identity_key(&self) -> Result<IdentityKey, ValidationError> {
        IdentityKey::derive(self)
    }
}
