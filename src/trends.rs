//! Dashboard-facing trend and quality signals over the recent window.
//!
//! A lighter-weight sibling of the full analytics pass: it looks at the 7
//! most recent daily records (or fewer when fewer exist) and the weight
//! history, and produces deficit, pace, plateau and macro-quality signals.

use serde::Serialize;

use crate::calories::KCAL_PER_KG_FAT;
use crate::domain::{DailyRecord, SustainabilityMode, WeightRecord};

// === Constants ===

/// Number of most recent daily records inspected.
pub const TREND_WINDOW_DAYS: usize = 7;

/// Average deficit below which a plateau becomes plausible (kcal/day).
pub const PLATEAU_DEFICIT_THRESHOLD: f64 = -150.0;

/// Maximum spread of the 3 most recent weights for a plateau (kg).
pub const PLATEAU_WEIGHT_SPREAD_KG: f64 = 0.2;

/// Weight samples required before plateau detection applies.
pub const PLATEAU_MIN_WEIGHT_SAMPLES: usize = 3;

/// Calories per gram of protein.
const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// Fraction of intake that must come from protein for a high-protein day.
const HIGH_PROTEIN_RATIO: f64 = 0.25;

/// Signals computed over the recent window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSignals {
    /// Mean net calories over the window; `None` when the window is empty.
    pub avg_deficit: Option<f64>,
    /// `avg_deficit * 7 / 7700`, kg per week; `None` when the window is empty.
    pub projected_kg_per_week: Option<f64>,
    /// Consecutive days, newest first, with a ratio-to-TDEE below the
    /// sustainability-mode threshold.
    pub extreme_deficit_streak: u32,
    /// Sustained deficit without corresponding weight movement.
    pub plateau_detected: bool,
    /// Days in the window with any protein logged.
    pub protein_tracked_days: u32,
    /// Days where protein supplies at least a quarter of intake.
    pub high_protein_days: u32,
}

/// Computes trend signals over at most the [`TREND_WINDOW_DAYS`] most recent
/// records.
///
/// Both inputs are newest-first: `daily` in the aggregator's native order and
/// `weights` the full measurement history. Fewer records than the window
/// length is never an error.
pub fn trends(
    daily: &[DailyRecord],
    weights: &[WeightRecord],
    mode: SustainabilityMode,
) -> TrendSignals {
    let window = &daily[..daily.len().min(TREND_WINDOW_DAYS)];

    let avg_deficit = if window.is_empty() {
        None
    } else {
        Some(window.iter().map(|d| d.net_calories).sum::<f64>() / window.len() as f64)
    };
    let projected_kg_per_week = avg_deficit.map(|d| d * 7.0 / KCAL_PER_KG_FAT);

    TrendSignals {
        avg_deficit,
        projected_kg_per_week,
        extreme_deficit_streak: extreme_deficit_streak(window, mode),
        plateau_detected: plateau_detected(avg_deficit, weights),
        protein_tracked_days: window.iter().filter(|d| d.protein > 0.0).count() as u32,
        high_protein_days: window
            .iter()
            .filter(|d| {
                d.calories_consumed > 0.0
                    && d.protein * KCAL_PER_G_PROTEIN >= HIGH_PROTEIN_RATIO * d.calories_consumed
            })
            .count() as u32,
    }
}

/// Counts consecutive extreme-deficit days walking backward from the most
/// recent one; stops at the first day that fails the test or has no ratio.
fn extreme_deficit_streak(window: &[DailyRecord], mode: SustainabilityMode) -> u32 {
    let threshold = mode.extreme_deficit_threshold();
    let mut streak = 0u32;
    for day in window {
        match day.ratio_to_tdee {
            Some(ratio) if ratio < threshold => streak += 1,
            _ => break,
        }
    }
    streak
}

/// A plateau is a sustained deficit with no movement in the 3 most recent
/// weight measurements.
fn plateau_detected(avg_deficit: Option<f64>, weights: &[WeightRecord]) -> bool {
    if weights.len() < PLATEAU_MIN_WEIGHT_SAMPLES {
        return false;
    }
    let Some(deficit) = avg_deficit else {
        return false;
    };
    if deficit >= PLATEAU_DEFICIT_THRESHOLD {
        return false;
    }

    let recent = &weights[..PLATEAU_MIN_WEIGHT_SAMPLES];
    let max = recent.iter().map(|w| w.weight_kg).fold(f64::NEG_INFINITY, f64::max);
    let min = recent.iter().map(|w| w.weight_kg).fold(f64::INFINITY, f64::min);
    max - min < PLATEAU_WEIGHT_SPREAD_KG
}
