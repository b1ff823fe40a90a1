//! Coin detection
//!
//! Finds which known cryptocurrencies a text talks about. Every coin has a
//! canonical ticker plus aliases (usually the ticker itself and common
//! names); any alias matching on word boundaries counts as a mention of the
//! coin.

use herald_core::CoinSymbol;
use serde::{Deserialize, Serialize};

use crate::boundary::{find_bounded, normalize};
use crate::error::LexiconError;

/// A recognized coin and the spellings that refer to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinDefinition {
    /// Canonical ticker reported in results, e.g. `BTC`
    pub symbol: CoinSymbol,
    /// Lowercase spellings matched against normalized text
    pub aliases: Vec<String>,
}

impl CoinDefinition {
    /// Coin matched by its lowercased ticker and the given aliases
    pub fn new(symbol: &str, aliases: &[&str]) -> Self {
        Self::build(symbol, vec![symbol.to_lowercase()], aliases)
    }

    /// Coin matched by its aliases only. For tickers that are everyday
    /// words ("link", "dot", "uni").
    pub fn named(symbol: &str, aliases: &[&str]) -> Self {
        Self::build(symbol, Vec::new(), aliases)
    }

    fn build(symbol: &str, mut all: Vec<String>, aliases: &[&str]) -> Self {
        for alias in aliases {
            let alias = normalize(alias);
            if !alias.is_empty() && !all.contains(&alias) {
                all.push(alias);
            }
        }
        Self {
            symbol: symbol.to_uppercase(),
            aliases: all,
        }
    }

    /// Earliest boundary-anchored match of any alias in normalized text
    fn first_position(&self, normalized: &str) -> Option<usize> {
        self.aliases
            .iter()
            .filter_map(|alias| find_bounded(normalized, alias))
            .min()
    }
}

/// Default vocabulary. Spellings that are everyday English words are not
/// aliases: names like "avalanche" are omitted, and the LINK, DOT and UNI
/// tickers only match by project name.
fn default_vocabulary() -> Vec<CoinDefinition> {
    vec![
        CoinDefinition::new("BTC", &["bitcoin", "xbt"]),
        CoinDefinition::new("ETH", &["ethereum", "ether"]),
        CoinDefinition::new("BNB", &["binance coin"]),
        CoinDefinition::new("SOL", &["solana"]),
        CoinDefinition::new("XRP", &["ripple"]),
        CoinDefinition::new("ADA", &["cardano"]),
        CoinDefinition::new("DOGE", &["dogecoin"]),
        CoinDefinition::named("DOT", &["polkadot"]),
        CoinDefinition::new("AVAX", &[]),
        CoinDefinition::new("MATIC", &["polygon"]),
        CoinDefinition::named("LINK", &["chainlink"]),
        CoinDefinition::new("LTC", &["litecoin"]),
        CoinDefinition::new("TRX", &["tron"]),
        CoinDefinition::new("SHIB", &["shiba inu"]),
        CoinDefinition::named("UNI", &["uniswap"]),
        CoinDefinition::new("USDT", &["tether"]),
        CoinDefinition::new("USDC", &[]),
    ]
}

/// Detects mentioned coins, in order of first mention
#[derive(Debug, Clone)]
pub struct CoinDetector {
    coins: Vec<CoinDefinition>,
}

impl Default for CoinDetector {
    fn default() -> Self {
        Self {
            coins: default_vocabulary(),
        }
    }
}

impl CoinDetector {
    /// Build a detector over a custom vocabulary
    pub fn new(coins: Vec<CoinDefinition>) -> Result<Self, LexiconError> {
        for coin in &coins {
            if coin.symbol.trim().is_empty() || coin.aliases.iter().all(|a| a.is_empty()) {
                return Err(LexiconError::EmptyCoin {
                    symbol: coin.symbol.clone(),
                });
            }
        }
        Ok(Self { coins })
    }

    pub fn vocabulary(&self) -> &[CoinDefinition] {
        &self.coins
    }

    /// Distinct canonical symbols mentioned in `text`, ordered by first
    /// mention. Coins first mentioned at the same offset keep vocabulary
    /// order.
    pub fn detect(&self, text: &str) -> Vec<CoinSymbol> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut found: Vec<(usize, &CoinDefinition)> = self
            .coins
            .iter()
            .filter_map(|coin| coin.first_position(&normalized).map(|pos| (pos, coin)))
            .collect();
        found.sort_by_key(|(pos, _)| *pos);

        found
            .into_iter()
            .map(|(_, coin)| coin.symbol.clone())
            .collect()
    }

    /// Coins of `first` followed by coins only found in `second`
    pub fn detect_ordered(&self, first: &str, second: &str) -> Vec<CoinSymbol> {
        let mut coins = self.detect(first);
        for coin in self.detect(second) {
            if !coins.contains(&coin) {
                coins.push(coin);
            }
        }
        coins
    }
}
