//! Domain types for weight, food and exercise logs.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::error::ParseError;

/// Returns the calendar-day key for a record timestamp.
///
/// Day keys are pinned to UTC: the bucket is determined solely by the UTC
/// year/month/day of the timestamp, never by the caller's local timezone.
/// Entries logged near midnight therefore never shift buckets depending on
/// where the caller runs.
pub fn day_key(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Activity categories used to scale BMR into TDEE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifestyle {
    Sedentary,
    Moderate,
    Active,
}

impl Lifestyle {
    /// Returns the TDEE multiplier for this activity category.
    pub fn activity_factor(&self) -> f64 {
        match self {
            Lifestyle::Sedentary => 1.20,
            Lifestyle::Moderate => 1.55,
            Lifestyle::Active => 1.725,
        }
    }

    /// Returns the display name for the category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Lifestyle::Sedentary => "sedentary",
            Lifestyle::Moderate => "moderate",
            Lifestyle::Active => "active",
        }
    }
}

impl FromStr for Lifestyle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(Lifestyle::Sedentary),
            "moderate" => Ok(Lifestyle::Moderate),
            "active" => Ok(Lifestyle::Active),
            _ => Err(ParseError::UnknownLifestyle(s.to_string())),
        }
    }
}

impl std::fmt::Display for Lifestyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How aggressively the trend insights treat sustained deficits.
///
/// Strict mode lowers the ratio below which a day counts toward the
/// extreme-deficit streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SustainabilityMode {
    Standard,
    Strict,
}

impl SustainabilityMode {
    /// Ratio-to-TDEE below which a day counts as an extreme deficit.
    pub fn extreme_deficit_threshold(&self) -> f64 {
        match self {
            SustainabilityMode::Standard => 0.6,
            SustainabilityMode::Strict => 0.5,
        }
    }
}

impl FromStr for SustainabilityMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(SustainabilityMode::Standard),
            "strict" => Ok(SustainabilityMode::Strict),
            _ => Err(ParseError::UnknownSustainabilityMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for SustainabilityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SustainabilityMode::Standard => write!(f, "standard"),
            SustainabilityMode::Strict => write!(f, "strict"),
        }
    }
}

/// Profile data needed to derive BMR/TDEE.
///
/// Every field except the sustainability mode may be absent; missing height
/// or age degrades the derived BMR/TDEE to zero rather than failing.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub height_cm: Option<f64>,
    pub age_years: Option<u32>,
    pub lifestyle: Option<Lifestyle>,
    pub sustainability_mode: SustainabilityMode,
}

/// A single logged bodyweight measurement.
#[derive(Debug, Clone, Serialize)]
pub struct WeightRecord {
    pub weight_kg: f64,
    pub timestamp: DateTime<Utc>,
}

impl WeightRecord {
    pub fn new(weight_kg: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            weight_kg,
            timestamp,
        }
    }
}

/// A single logged food entry.
///
/// Macro fields are independently optional; `None` means the macro was not
/// tracked for this entry, which is distinct from a tracked zero.
#[derive(Debug, Clone, Serialize)]
pub struct FoodRecord {
    pub name: String,
    pub calories: f64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl FoodRecord {
    /// Creates a food entry with no macro data.
    pub fn new(name: impl Into<String>, calories: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            calories,
            protein: None,
            carbs: None,
            fat: None,
            fiber: None,
            sugar: None,
            timestamp,
        }
    }
}

/// A single logged exercise entry.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseRecord {
    pub name: String,
    pub calories: f64,
    pub duration_min: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

impl ExerciseRecord {
    pub fn new(name: impl Into<String>, calories: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            calories,
            duration_min: None,
            timestamp,
        }
    }
}

/// One derived record per calendar day that has food or exercise data.
///
/// Days carrying only a weight measurement do not appear in the series;
/// only food and exercise entries create day buckets. The record is treated
/// as immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub calories_consumed: f64,
    pub calories_burnt: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub has_exercise: bool,
    /// Last known weight on or before this day; `None` if never measured.
    pub weight_kg: Option<f64>,
    /// Zero when weight, height or age is unknown for this day.
    pub bmr: f64,
    /// Zero when BMR is unresolvable.
    pub tdee: f64,
    /// `calories_consumed - (tdee + calories_burnt)`, no rounding applied.
    pub net_calories: f64,
    /// `calories_consumed / tdee` when `tdee > 0`, otherwise `None`.
    pub ratio_to_tdee: Option<f64>,
}
