//! Binary-market order book snapshots

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::series::Platform;

/// A price level in the order book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price at this level
    pub price: Decimal,
    /// Total size available
    pub size: Decimal,
}

/// Bids on both outcomes of a binary market
///
/// A NO bid at `p` is an implied YES ask at `1 - p`, so the two bid ladders
/// describe the whole book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinaryBook {
    /// YES bids, sorted best (highest) to worst
    #[serde(default)]
    pub yes_bids: Vec<PriceLevel>,
    /// NO bids, sorted best (highest) to worst
    #[serde(default)]
    pub no_bids: Vec<PriceLevel>,
}

impl BinaryBook {
    /// Get best YES bid price
    pub fn best_yes_bid(&self) -> Option<Decimal> {
        self.yes_bids.first().map(|l| l.price)
    }

    /// Get best NO bid price
    pub fn best_no_bid(&self) -> Option<Decimal> {
        self.no_bids.first().map(|l| l.price)
    }

    /// Implied YES ask from the best NO bid
    pub fn implied_yes_ask(&self) -> Option<Decimal> {
        self.best_no_bid().map(|p| Decimal::ONE - p)
    }

    /// Get mid price
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_yes_bid(), self.implied_yes_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Get spread
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_yes_bid(), self.implied_yes_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}

/// Books of both platforms captured at the same instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedSnapshot {
    /// Capture time in epoch milliseconds
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
    #[serde(rename = "polymarket", alias = "a")]
    pub a: BinaryBook,
    #[serde(rename = "kalshi", alias = "b")]
    pub b: BinaryBook,
}

impl PairedSnapshot {
    /// Book of one platform
    pub fn book(&self, platform: Platform) -> &BinaryBook {
        match platform {
            Platform::A => &self.a,
            Platform::B => &self.b,
        }
    }
}

/// Top-level layout of a snapshot capture file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub snapshots: Vec<PairedSnapshot>,
}
