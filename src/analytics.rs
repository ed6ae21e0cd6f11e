//! Statistical summaries over the daily energy-balance series.
//!
//! Consumes the date-ascending daily series and produces moving averages,
//! z-score intake outliers, deficit/maintenance/surplus classification,
//! completeness streaks, a templated narrative and a linear weight-change
//! projection.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::calories::KCAL_PER_KG_FAT;
use crate::domain::{day_key, DailyRecord, ExerciseRecord, FoodRecord};

// === Constants ===

/// Trailing window length for moving averages (days).
pub const MOVING_AVG_WINDOW_DAYS: usize = 7;

/// Z-score beyond which an intake day is flagged as an outlier.
pub const OUTLIER_SIGMA: f64 = 2.0;

/// Classification band half-width around a ratio of 1.0 (±5%).
pub const MAINTENANCE_BAND: f64 = 0.05;

/// Best streak length above which the narrative calls a trend "sustained".
pub const SUSTAINED_STREAK_DAYS: u32 = 5;

/// Weight delta below which the narrative reports "flat" (kg).
const FLAT_WEIGHT_BAND_KG: f64 = 0.1;

/// Weight delta below which the trend descriptor is "stable" (kg).
const STABLE_TREND_BAND_KG: f64 = 0.5;

/// Narrative returned for an empty series.
pub const NO_DATA_NARRATIVE: &str = "No data available for this period.";

/// Case-insensitive substrings that mark a food entry as alcoholic.
const ALCOHOL_KEYWORDS: &[&str] = &[
    "beer", "wine", "alcohol", "vodka", "whisky", "whiskey", "cocktail", "gin", "rum", "tequila",
];

// === Data Structures ===

/// Why a day was flagged as an intake outlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierReason {
    HighIntake,
    LowIntake,
    AlcoholAboveAverage,
}

impl std::fmt::Display for OutlierReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            OutlierReason::HighIntake => "unusually high intake",
            OutlierReason::LowIntake => "unusually low intake",
            OutlierReason::AlcoholAboveAverage => "day with alcohol and above-average intake",
        };
        write!(f, "{}", text)
    }
}

/// A flagged intake day. At most one flag per day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlier {
    pub date: NaiveDate,
    pub calories_consumed: f64,
    pub reason: OutlierReason,
}

/// Day counts per energy-balance class, over days with a known TDEE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub deficit: usize,
    pub maintenance: usize,
    pub surplus: usize,
}

/// Logging-completeness streaks, in days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    /// Longest run of complete days anywhere in the series.
    pub best: u32,
    /// Run of complete days ending at the most recent day.
    pub current: u32,
}

/// Full analytics output over a daily series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    /// Trailing moving average of resolved weight, one slot per input day.
    pub moving_avg_weight: Vec<Option<f64>>,
    /// Trailing moving average of calories consumed, one slot per input day.
    pub moving_avg_calories: Vec<Option<f64>>,
    pub outliers: Vec<Outlier>,
    pub classification: Classification,
    pub streaks: Streaks,
    pub narrative: String,
    /// Mean of net calories over the whole series; zero for an empty series.
    pub avg_deficit: f64,
    /// `avg_deficit * 7 / 7700`, kg per week. A linear approximation of
    /// energy balance, not a metabolic simulation.
    pub projected_kg_per_week: f64,
}

impl Stats {
    /// The well-defined result for an empty input series.
    pub fn empty() -> Self {
        Self {
            moving_avg_weight: Vec::new(),
            moving_avg_calories: Vec::new(),
            outliers: Vec::new(),
            classification: Classification::default(),
            streaks: Streaks::default(),
            narrative: NO_DATA_NARRATIVE.to_string(),
            avg_deficit: 0.0,
            projected_kg_per_week: 0.0,
        }
    }
}

// === Analysis ===

/// Analyzes a date-ascending daily series.
///
/// The caller is responsible for the sort direction: the aggregator's native
/// order is newest-first and must be reversed before calling this. Raw food
/// and exercise records are consulted only for names (alcohol heuristic,
/// most frequent exercise); their numbers never re-enter the computation.
///
/// An empty series yields [`Stats::empty`]; no error paths exist here.
pub fn analyze(daily: &[DailyRecord], foods: &[FoodRecord], exercises: &[ExerciseRecord]) -> Stats {
    if daily.is_empty() {
        return Stats::empty();
    }

    let weights: Vec<Option<f64>> = daily.iter().map(|d| d.weight_kg).collect();
    let calories: Vec<Option<f64>> = daily.iter().map(|d| Some(d.calories_consumed)).collect();

    let outliers = detect_outliers(daily, foods);
    let classification = classify_days(daily);
    let streaks = compute_streaks(daily);

    let avg_deficit =
        daily.iter().map(|d| d.net_calories).sum::<f64>() / daily.len() as f64;
    let projected_kg_per_week = avg_deficit * 7.0 / KCAL_PER_KG_FAT;

    let narrative = build_narrative(daily, exercises, outliers.len(), streaks.best);

    debug!(
        "analyzed {} days: {} outliers, best streak {}",
        daily.len(),
        outliers.len(),
        streaks.best
    );

    Stats {
        moving_avg_weight: trailing_average(&weights),
        moving_avg_calories: trailing_average(&calories),
        outliers,
        classification,
        streaks,
        narrative,
        avg_deficit,
        projected_kg_per_week,
    }
}

/// Trailing moving average over up to [`MOVING_AVG_WINDOW_DAYS`] samples.
///
/// Windows at the series start are partial, not null-padded; a window with
/// no non-null samples yields `None` at that index.
fn trailing_average(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = i.saturating_sub(MOVING_AVG_WINDOW_DAYS - 1);
        let mut sum = 0.0;
        let mut count = 0usize;
        for value in values[start..=i].iter().flatten() {
            sum += value;
            count += 1;
        }
        result.push(if count > 0 { Some(sum / count as f64) } else { None });
    }
    result
}

fn food_name_is_alcoholic(name: &str) -> bool {
    let lower = name.to_lowercase();
    ALCOHOL_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Days on which at least one food entry matches the alcohol keyword list.
fn alcohol_days(foods: &[FoodRecord]) -> BTreeSet<NaiveDate> {
    foods
        .iter()
        .filter(|f| food_name_is_alcoholic(&f.name))
        .map(|f| day_key(f.timestamp))
        .collect()
}

/// Flags intake outliers against the whole-series mean and population
/// standard deviation.
///
/// Rules are checked in priority order per day (statistical high, then
/// statistical low, then alcohol-with-above-average intake); the first match
/// wins and a day is never double-flagged.
fn detect_outliers(daily: &[DailyRecord], foods: &[FoodRecord]) -> Vec<Outlier> {
    let n = daily.len() as f64;
    let mean = daily.iter().map(|d| d.calories_consumed).sum::<f64>() / n;
    let variance = daily
        .iter()
        .map(|d| {
            let dev = d.calories_consumed - mean;
            dev * dev
        })
        .sum::<f64>()
        / n;
    let sigma = variance.sqrt();

    let alcohol = alcohol_days(foods);

    let mut outliers = Vec::new();
    for day in daily {
        let consumed = day.calories_consumed;
        let reason = if consumed > mean + OUTLIER_SIGMA * sigma {
            OutlierReason::HighIntake
        } else if consumed > 0.0 && consumed < mean - OUTLIER_SIGMA * sigma {
            OutlierReason::LowIntake
        } else if alcohol.contains(&day.date) && consumed > mean {
            OutlierReason::AlcoholAboveAverage
        } else {
            continue;
        };
        outliers.push(Outlier {
            date: day.date,
            calories_consumed: consumed,
            reason,
        });
    }
    outliers
}

/// Classifies each day with a known TDEE by its intake-to-expenditure ratio.
///
/// The ratio here uses total expenditure (TDEE plus exercise), unlike the
/// per-record `ratio_to_tdee`. Days with `tdee == 0` are excluded from every
/// bucket.
fn classify_days(daily: &[DailyRecord]) -> Classification {
    let mut classification = Classification::default();
    for day in daily {
        if day.tdee <= 0.0 {
            continue;
        }
        let ratio = day.calories_consumed / (day.tdee + day.calories_burnt);
        if ratio < 1.0 - MAINTENANCE_BAND {
            classification.deficit += 1;
        } else if ratio > 1.0 + MAINTENANCE_BAND {
            classification.surplus += 1;
        } else {
            classification.maintenance += 1;
        }
    }
    classification
}

fn is_complete_day(day: &DailyRecord) -> bool {
    day.calories_consumed > 0.0 && (day.weight_kg.is_some() || day.calories_burnt > 0.0)
}

/// Computes best and current completeness streaks in one chronological scan.
///
/// `current` is the trailing run length at the end of the scan, so it is
/// always bounded by `best`.
fn compute_streaks(daily: &[DailyRecord]) -> Streaks {
    let mut best = 0u32;
    let mut run = 0u32;
    for day in daily {
        if is_complete_day(day) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    Streaks { best, current: run }
}

/// Most frequent exercise name; ties broken by first occurrence in input
/// order, which keeps the reduction deterministic.
fn most_frequent_exercise(exercises: &[ExerciseRecord]) -> Option<&str> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for exercise in exercises {
        *counts.entry(exercise.name.as_str()).or_default() += 1;
    }

    let mut top: Option<(&str, u32)> = None;
    for exercise in exercises {
        let count = counts[exercise.name.as_str()];
        match top {
            Some((_, best)) if best >= count => {}
            _ => top = Some((exercise.name.as_str(), count)),
        }
    }
    top.map(|(name, _)| name)
}

/// Weight delta from the first to the last day with a resolved weight.
fn weight_delta(daily: &[DailyRecord]) -> Option<f64> {
    let first = daily.iter().find_map(|d| d.weight_kg)?;
    let last = daily.iter().rev().find_map(|d| d.weight_kg)?;
    Some(last - first)
}

/// Fills the fixed narrative template.
///
/// Deterministic by construction; localization happens at the call site by
/// substituting a different template set, never here.
fn build_narrative(
    daily: &[DailyRecord],
    exercises: &[ExerciseRecord],
    outlier_count: usize,
    best_streak: u32,
) -> String {
    let delta = weight_delta(daily);

    let mut sentences: Vec<String> = Vec::new();

    match delta {
        Some(d) if d.abs() < FLAT_WEIGHT_BAND_KG => {
            sentences.push("Weight stayed flat over the period.".to_string());
        }
        Some(d) => {
            let direction = if d > 0.0 { "up" } else { "down" };
            sentences.push(format!("Weight went {} {:.1} kg over the period.", direction, d.abs()));
        }
        None => sentences.push("No weight measurements were recorded.".to_string()),
    }

    if let Some(name) = most_frequent_exercise(exercises) {
        sentences.push(format!("Most frequent exercise: {}.", name));
    }

    if outlier_count == 1 {
        sentences.push("1 unusual intake day was flagged.".to_string());
    } else if outlier_count > 1 {
        sentences.push(format!("{} unusual intake days were flagged.", outlier_count));
    }

    let trend = match delta {
        Some(d) if d > STABLE_TREND_BAND_KG => "upward",
        Some(d) if d < -STABLE_TREND_BAND_KG => "downward",
        _ => "stable",
    };
    let consistency = if best_streak > SUSTAINED_STREAK_DAYS {
        "sustained"
    } else {
        "developing"
    };
    sentences.push(format!("Overall trend: {} ({}).", trend, consistency));

    sentences.join(" ")
}
