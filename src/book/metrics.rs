//! Per-snapshot order book variables
//!
//! Nineteen measures per platform, grouped the same way as the default
//! analysis tiers: prices, depth, imbalances and book structure.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::types::{BinaryBook, PriceLevel};

/// Variable names in output column order
pub const VARIABLES: [&str; 19] = [
    "mid",
    "spread",
    "best_bid_yes",
    "best_bid_no",
    "depth_best_yes",
    "depth_best_no",
    "depth_top3_yes",
    "depth_top3_no",
    "total_depth_yes",
    "total_depth_no",
    "depth_5c_yes",
    "depth_5c_no",
    "imbalance_best",
    "imbalance_top3",
    "imbalance_total",
    "num_levels_yes",
    "num_levels_no",
    "vwap_yes",
    "vwap_no",
];

/// Levels summed for top-of-book depth
const TOP_LEVELS: usize = 3;

/// Price distance from the best bid counted as near-touch depth
const NEAR_TOUCH_RANGE: Decimal = dec!(0.05);

/// Measures of one binary book
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookMetrics {
    pub mid: Option<Decimal>,
    pub spread: Option<Decimal>,
    pub best_bid_yes: Option<Decimal>,
    pub best_bid_no: Option<Decimal>,
    /// Size at the best level, absent for an empty side
    pub depth_best_yes: Option<Decimal>,
    pub depth_best_no: Option<Decimal>,
    pub depth_top3_yes: Decimal,
    pub depth_top3_no: Decimal,
    pub total_depth_yes: Decimal,
    pub total_depth_no: Decimal,
    pub depth_5c_yes: Decimal,
    pub depth_5c_no: Decimal,
    pub imbalance_best: Option<Decimal>,
    pub imbalance_top3: Option<Decimal>,
    pub imbalance_total: Option<Decimal>,
    pub num_levels_yes: usize,
    pub num_levels_no: usize,
    pub vwap_yes: Option<Decimal>,
    pub vwap_no: Option<Decimal>,
}

fn depth(levels: &[PriceLevel]) -> Decimal {
    levels.iter().map(|l| l.size).sum()
}

fn depth_near_touch(levels: &[PriceLevel]) -> Decimal {
    match levels.first() {
        Some(best) => {
            let threshold = best.price - NEAR_TOUCH_RANGE;
            levels
                .iter()
                .filter(|l| l.price >= threshold)
                .map(|l| l.size)
                .sum()
        }
        None => Decimal::ZERO,
    }
}

fn vwap(levels: &[PriceLevel]) -> Option<Decimal> {
    let size = depth(levels);
    if size.is_zero() {
        return None;
    }
    let value: Decimal = levels.iter().map(|l| l.price * l.size).sum();
    value.checked_div(size)
}

/// `(yes - no) / (yes + no)`, absent when both sides are empty
fn imbalance(yes: Option<Decimal>, no: Option<Decimal>) -> Option<Decimal> {
    let yes = yes.unwrap_or_default();
    let no = no.unwrap_or_default();
    let total = yes + no;
    if total.is_zero() {
        return None;
    }
    (yes - no).checked_div(total)
}

impl BookMetrics {
    /// Compute every measure of a book
    pub fn from_book(book: &BinaryBook) -> Self {
        let yes = &book.yes_bids;
        let no = &book.no_bids;
        let top = |levels: &[PriceLevel]| depth(&levels[..levels.len().min(TOP_LEVELS)]);

        let depth_best_yes = yes.first().map(|l| l.size);
        let depth_best_no = no.first().map(|l| l.size);
        let depth_top3_yes = top(yes);
        let depth_top3_no = top(no);
        let total_depth_yes = depth(yes);
        let total_depth_no = depth(no);

        Self {
            mid: book.mid_price(),
            spread: book.spread(),
            best_bid_yes: book.best_yes_bid(),
            best_bid_no: book.best_no_bid(),
            depth_best_yes,
            depth_best_no,
            depth_top3_yes,
            depth_top3_no,
            total_depth_yes,
            total_depth_no,
            depth_5c_yes: depth_near_touch(yes),
            depth_5c_no: depth_near_touch(no),
            imbalance_best: imbalance(depth_best_yes, depth_best_no),
            imbalance_top3: imbalance(Some(depth_top3_yes), Some(depth_top3_no)),
            imbalance_total: imbalance(Some(total_depth_yes), Some(total_depth_no)),
            num_levels_yes: yes.len(),
            num_levels_no: no.len(),
            vwap_yes: vwap(yes),
            vwap_no: vwap(no),
        }
    }

    /// Value of a named variable as a float, `None` if absent or unknown
    pub fn value(&self, variable: &str) -> Option<f64> {
        let decimal = match variable {
            "mid" => self.mid,
            "spread" => self.spread,
            "best_bid_yes" => self.best_bid_yes,
            "best_bid_no" => self.best_bid_no,
            "depth_best_yes" => self.depth_best_yes,
            "depth_best_no" => self.depth_best_no,
            "depth_top3_yes" => Some(self.depth_top3_yes),
            "depth_top3_no" => Some(self.depth_top3_no),
            "total_depth_yes" => Some(self.total_depth_yes),
            "total_depth_no" => Some(self.total_depth_no),
            "depth_5c_yes" => Some(self.depth_5c_yes),
            "depth_5c_no" => Some(self.depth_5c_no),
            "imbalance_best" => self.imbalance_best,
            "imbalance_top3" => self.imbalance_top3,
            "imbalance_total" => self.imbalance_total,
            "num_levels_yes" => Some(Decimal::from(self.num_levels_yes)),
            "num_levels_no" => Some(Decimal::from(self.num_levels_no)),
            "vwap_yes" => self.vwap_yes,
            "vwap_no" => self.vwap_no,
            _ => None,
        };
        decimal.and_then(|d| d.to_f64())
    }

    /// All variables in [`VARIABLES`] order
    pub fn values(&self) -> [Option<f64>; 19] {
        VARIABLES.map(|v| self.value(v))
    }
}
