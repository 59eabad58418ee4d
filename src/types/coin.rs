//! Coin amounts
//!
//! Parses user supplied coin strings such as `"100uatom,5stake"` into a
//! sorted set of positive amounts with unique denominations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static DENOM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9]{2,15}$").expect("denom pattern is valid")
});

/// Coin parsing and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinError {
    #[error("invalid coin expression: {0}")]
    Malformed(String),
    #[error("negative coin amount: {0}")]
    Negative(String),
    #[error("coin amount out of range: {0}")]
    Overflow(String),
    #[error("coin amount must be positive: {0}")]
    Zero(String),
    #[error("invalid denom: {0}")]
    InvalidDenom(String),
    #[error("duplicate denomination {0}")]
    Duplicate(String),
    #[error("coins are not sorted by denom")]
    Unsorted,
}

/// A single amount of one denomination
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "amount_string")]
    pub amount: u128,
}

impl Coin {
    pub fn new(amount: u128, denom: &str) -> Result<Self, CoinError> {
        validate_denom(denom)?;
        Ok(Self {
            denom: denom.to_string(),
            amount,
        })
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn validate(&self) -> Result<(), CoinError> {
        validate_denom(&self.denom)?;
        if !self.is_positive() {
            return Err(CoinError::Zero(self.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinError;

    /// Parse `<amount><denom>`, allowing whitespace between the two parts
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(CoinError::Negative(s.to_string()));
        }

        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinError::Malformed(s.to_string()))?;
        let (digits, denom) = s.split_at(split);
        if digits.is_empty() {
            return Err(CoinError::Malformed(s.to_string()));
        }

        let amount = digits
            .parse::<u128>()
            .map_err(|_| CoinError::Overflow(s.to_string()))?;

        Coin::new(amount, denom.trim_start())
    }
}

/// A set of coins, sorted by denom with no duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Sort and validate a list of coins
    pub fn new(mut coins: Vec<Coin>) -> Result<Self, CoinError> {
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        let coins = Self(coins);
        coins.validate()?;
        Ok(coins)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// Amount held for `denom`, zero when absent
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or(0)
    }

    /// Every coin positive with a valid denom, strictly sorted by denom
    pub fn validate(&self) -> Result<(), CoinError> {
        for coin in &self.0 {
            coin.validate()?;
        }
        for pair in self.0.windows(2) {
            match pair[0].denom.cmp(&pair[1].denom) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => {
                    return Err(CoinError::Duplicate(pair[1].denom.clone()))
                }
                std::cmp::Ordering::Greater => return Err(CoinError::Unsorted),
            }
        }
        Ok(())
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for Coins {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coins(s)
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse a comma separated coin list. An empty string is the empty set.
pub fn parse_coins(s: &str) -> Result<Coins, CoinError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Coins::empty());
    }

    let coins = s
        .split(',')
        .map(Coin::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    Coins::new(coins)
}

fn validate_denom(denom: &str) -> Result<(), CoinError> {
    if DENOM_RE.is_match(denom) {
        Ok(())
    } else {
        Err(CoinError::InvalidDenom(denom.to_string()))
    }
}

/// Amounts travel as decimal strings so large values survive JSON tooling
mod amount_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
