use std::sync::OnceLock;

use regex::Regex;

pub const DEFAULT_PRICE_PER_TON: f64 = 8000.0;

/// Estimated production cost as a share of revenue.
pub const COST_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropProfit {
    /// Whole EGP.
    pub total: i64,
    /// Whole EGP per ton; zero when the quantity is zero.
    pub per_unit: i64,
}

fn quantity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9.]+").expect("quantity pattern must compile"))
}

/// Pulls the first digit-and-dot run out of free text and reads its
/// longest valid numeric prefix, so "2.5.3 tons" yields 2.5 and a run
/// with no valid prefix yields 0.
pub fn parse_quantity(quantity_text: &str) -> f64 {
    let Some(run) = quantity_pattern().find(quantity_text) else {
        return 0.0;
    };

    let run = run.as_str();
    let mut parsed = None;
    for end in 1..=run.len() {
        if let Ok(value) = run[..end].parse::<f64>() {
            parsed = Some(value);
        }
    }
    parsed.unwrap_or(0.0)
}

/// Market rate per ton in EGP, keyed on the trimmed lowercased crop
/// name. Unlisted crops fall back to the default rate.
pub fn price_per_ton(crop_name: &str) -> f64 {
    match crop_name.trim().to_lowercase().as_str() {
        "wheat" => 8500.0,
        "corn" => 7200.0,
        "rice" => 12000.0,
        "soybean" | "soybeans" => 9500.0,
        "tomato" | "tomatoes" => 15000.0,
        "lettuce" => 8000.0,
        "carrot" | "carrots" => 10000.0,
        "green bean" | "green beans" | "greenbeans" => 12000.0,
        "potato" | "potatoes" => 6000.0,
        "onion" | "onions" => 7000.0,
        "cucumber" | "cucumbers" => 9000.0,
        _ => DEFAULT_PRICE_PER_TON,
    }
}

/// Deterministic revenue-minus-cost estimate. Total and per-unit are
/// each rounded from the unrounded profit, so neither figure inherits
/// the other's rounding error.
pub fn estimate_crop_profit(quantity_text: &str, crop_name: &str) -> CropProfit {
    let quantity = parse_quantity(quantity_text);
    let revenue = quantity * price_per_ton(crop_name);
    let cost = revenue * COST_RATIO;
    let profit = revenue - cost;

    let per_unit = if quantity > 0.0 {
        profit / quantity
    } else {
        0.0
    };

    CropProfit {
        total: profit.round() as i64,
        per_unit: per_unit.round() as i64,
    }
}
