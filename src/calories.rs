//! Calorie model: BMR/TDEE formulas and weight carry-forward resolution.
//!
//! BMR uses a sex-averaged Mifflin-St Jeor variant since biological sex is
//! not modeled. Weight resolution is last-known-value carry-forward over the
//! full measurement history, unbounded in how far back it looks.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{day_key, Lifestyle, WeightRecord};

/// Energy density of body fat (kcal per kg).
pub const KCAL_PER_KG_FAT: f64 = 7700.0;

/// Calculates Basal Metabolic Rate.
///
/// Formula:
/// ```text
/// BMR = 10 × weight + 6.25 × height − 5 × age − 78
/// ```
///
/// The −78 offset is the average of the standard male (+5) and female (−161)
/// constants. The result is returned raw: extreme inputs can produce a
/// negative number, and callers decide whether that is meaningful.
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) - 78.0
}

/// Calculates Total Daily Energy Expenditure from BMR and activity category.
///
/// An absent category defaults to sedentary (factor 1.20), deliberately the
/// most conservative expenditure estimate.
pub fn tdee(bmr: f64, lifestyle: Option<Lifestyle>) -> f64 {
    let factor = lifestyle
        .map(|l| l.activity_factor())
        .unwrap_or(Lifestyle::Sedentary.activity_factor());
    bmr * factor
}

/// Builds a map of UTC day -> weight from measurement records.
///
/// If multiple weights are logged on the same day, the last one in input
/// order wins; the pick is deterministic for a fixed input ordering.
pub fn build_weight_map(weights: &[WeightRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut map = BTreeMap::new();
    for record in weights {
        map.insert(day_key(record.timestamp), record.weight_kg);
    }
    map
}

/// Resolves the weight in effect on `day`.
///
/// Returns the weight from the latest measurement on or before `day`,
/// carrying the last known value forward across gaps of any length.
/// `None` if no measurement exists on or before `day`.
pub fn resolve_weight_for_day(day: NaiveDate, weights: &BTreeMap<NaiveDate, f64>) -> Option<f64> {
    weights.range(..=day).next_back().map(|(_, &w)| w)
}
