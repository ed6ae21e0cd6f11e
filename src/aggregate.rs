//! Daily aggregation of raw food and exercise records.
//!
//! Buckets raw records into one record per UTC calendar day, folds in the
//! carry-forward weight and derived BMR/TDEE, and computes net calories.
//! The series is rebuilt from scratch on every call; there is no cached
//! derived state.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;

use crate::calories::{bmr, build_weight_map, resolve_weight_for_day, tdee};
use crate::domain::{day_key, DailyRecord, ExerciseRecord, FoodRecord, UserProfile, WeightRecord};
use crate::error::InvalidInput;

/// Mutable per-day accumulator, private to the aggregation pass.
#[derive(Debug, Default)]
struct DayBucket {
    calories_consumed: f64,
    calories_burnt: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
    sugar: f64,
    has_exercise: bool,
}

fn ensure_finite(record: &'static str, field: &'static str, value: f64) -> Result<f64, InvalidInput> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidInput::NonFinite {
            record,
            field,
            value,
        })
    }
}

fn ensure_finite_opt(
    record: &'static str,
    field: &'static str,
    value: Option<f64>,
) -> Result<f64, InvalidInput> {
    match value {
        Some(v) => ensure_finite(record, field, v),
        // Untracked macros contribute zero to the daily sum.
        None => Ok(0.0),
    }
}

/// Aggregates raw records into one [`DailyRecord`] per calendar day.
///
/// A day appears in the output iff it has at least one food or exercise
/// record; weight-only days produce no record. Weight is resolved against
/// the full history, not just the aggregated window. BMR/TDEE are zero
/// unless weight, height and age are all known for the day.
///
/// The returned series is sorted descending by date (newest first);
/// consumers needing ascending order sort it themselves.
///
/// # Errors
/// Returns [`InvalidInput`] if any record carries a non-finite number.
/// Missing profile fields or an empty weight history are not errors.
pub fn aggregate(
    profile: &UserProfile,
    exercises: &[ExerciseRecord],
    foods: &[FoodRecord],
    weights: &[WeightRecord],
) -> Result<Vec<DailyRecord>, InvalidInput> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for exercise in exercises {
        let burnt = ensure_finite("exercise", "calories", exercise.calories)?;
        let bucket = buckets.entry(day_key(exercise.timestamp)).or_default();
        bucket.calories_burnt += burnt;
        bucket.has_exercise = true;
    }

    for food in foods {
        let consumed = ensure_finite("food", "calories", food.calories)?;
        let bucket = buckets.entry(day_key(food.timestamp)).or_default();
        bucket.calories_consumed += consumed;
        bucket.protein += ensure_finite_opt("food", "protein", food.protein)?;
        bucket.carbs += ensure_finite_opt("food", "carbs", food.carbs)?;
        bucket.fat += ensure_finite_opt("food", "fat", food.fat)?;
        bucket.fiber += ensure_finite_opt("food", "fiber", food.fiber)?;
        bucket.sugar += ensure_finite_opt("food", "sugar", food.sugar)?;
    }

    for weight in weights {
        ensure_finite("weight", "weight_kg", weight.weight_kg)?;
    }
    let weight_map = build_weight_map(weights);

    // BTreeMap iteration is ascending; reverse for the canonical newest-first
    // output order.
    let mut records: Vec<DailyRecord> = buckets
        .into_iter()
        .map(|(date, bucket)| {
            let weight_kg = resolve_weight_for_day(date, &weight_map);

            let (day_bmr, day_tdee) = match (weight_kg, profile.height_cm, profile.age_years) {
                (Some(w), Some(h), Some(a)) => {
                    let b = bmr(w, h, a);
                    (b, tdee(b, profile.lifestyle))
                }
                _ => (0.0, 0.0),
            };

            let net_calories = bucket.calories_consumed - (day_tdee + bucket.calories_burnt);
            let ratio_to_tdee = if day_tdee > 0.0 {
                Some(bucket.calories_consumed / day_tdee)
            } else {
                None
            };

            DailyRecord {
                date,
                calories_consumed: bucket.calories_consumed,
                calories_burnt: bucket.calories_burnt,
                protein: bucket.protein,
                carbs: bucket.carbs,
                fat: bucket.fat,
                fiber: bucket.fiber,
                sugar: bucket.sugar,
                has_exercise: bucket.has_exercise,
                weight_kg,
                bmr: day_bmr,
                tdee: day_tdee,
                net_calories,
                ratio_to_tdee,
            }
        })
        .collect();
    records.reverse();

    debug!(
        "aggregated {} days from {} food, {} exercise, {} weight records",
        records.len(),
        foods.len(),
        exercises.len(),
        weights.len()
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SustainabilityMode;
    use chrono::{TimeZone, Utc};

    fn ts(year: i32, month: u32, day: u32, hour: u32, min: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, 0).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            height_cm: Some(180.0),
            age_years: Some(30),
            lifestyle: None,
            sustainability_mode: SustainabilityMode::Standard,
        }
    }

    fn empty_profile() -> UserProfile {
        UserProfile {
            height_cm: None,
            age_years: None,
            lifestyle: None,
            sustainability_mode: SustainabilityMode::Standard,
        }
    }

    #[test]
    fn test_empty_inputs_yield_empty_series() {
        let records = aggregate(&profile(), &[], &[], &[]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_midnight_boundary_buckets_split_on_utc_date() {
        let foods = vec![
            FoodRecord::new("late snack", 300.0, ts(2024, 3, 1, 23, 59)),
            FoodRecord::new("early snack", 200.0, ts(2024, 3, 2, 0, 1)),
        ];

        let records = aggregate(&profile(), &[], &foods, &[]).unwrap();

        assert_eq!(records.len(), 2);
        // Newest first.
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(records[0].calories_consumed, 200.0);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(records[1].calories_consumed, 300.0);
    }

    #[test]
    fn test_food_only_day_has_no_exercise() {
        let foods = vec![FoodRecord::new("lunch", 600.0, ts(2024, 3, 1, 12, 0))];
        let records = aggregate(&profile(), &[], &foods, &[]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].calories_burnt, 0.0);
        assert!(!records[0].has_exercise);
    }

    #[test]
    fn test_exercise_only_day_has_zero_consumed() {
        let exercises = vec![ExerciseRecord::new("run", 400.0, ts(2024, 3, 1, 18, 0))];
        let records = aggregate(&profile(), &exercises, &[], &[]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].calories_consumed, 0.0);
        assert!(records[0].has_exercise);
    }

    #[test]
    fn test_weight_only_day_is_invisible() {
        let weights = vec![WeightRecord::new(80.0, ts(2024, 3, 1, 8, 0))];
        let foods = vec![FoodRecord::new("lunch", 600.0, ts(2024, 3, 3, 12, 0))];

        let records = aggregate(&profile(), &[], &foods, &weights).unwrap();

        // March 1st has only a weight record and creates no daily record,
        // but its weight still carries forward to March 3rd.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(records[0].weight_kg, Some(80.0));
    }

    #[test]
    fn test_macro_sums_treat_none_as_zero() {
        let mut with_macros = FoodRecord::new("steak", 700.0, ts(2024, 3, 1, 12, 0));
        with_macros.protein = Some(50.0);
        with_macros.fat = Some(30.0);
        let without_macros = FoodRecord::new("mystery", 300.0, ts(2024, 3, 1, 19, 0));

        let records = aggregate(&profile(), &[], &[with_macros, without_macros], &[]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].calories_consumed, 1000.0);
        assert_eq!(records[0].protein, 50.0);
        assert_eq!(records[0].fat, 30.0);
        assert_eq!(records[0].carbs, 0.0);
    }

    #[test]
    fn test_net_calories_identity() {
        let foods = vec![FoodRecord::new("meals", 2000.0, ts(2024, 3, 1, 12, 0))];
        let exercises = vec![ExerciseRecord::new("run", 350.0, ts(2024, 3, 1, 18, 0))];
        let weights = vec![WeightRecord::new(80.0, ts(2024, 3, 1, 8, 0))];

        let records = aggregate(&profile(), &exercises, &foods, &weights).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert!(r.tdee > 0.0);
        assert_eq!(r.net_calories, r.calories_consumed - (r.tdee + r.calories_burnt));
        let ratio = r.ratio_to_tdee.unwrap();
        assert!((ratio - r.calories_consumed / r.tdee).abs() < 1e-12);
    }

    #[test]
    fn test_missing_profile_degrades_to_zero_tdee() {
        let foods = vec![FoodRecord::new("meals", 2000.0, ts(2024, 3, 1, 12, 0))];
        let weights = vec![WeightRecord::new(80.0, ts(2024, 3, 1, 8, 0))];

        let records = aggregate(&empty_profile(), &[], &foods, &weights).unwrap();

        assert_eq!(records[0].bmr, 0.0);
        assert_eq!(records[0].tdee, 0.0);
        assert_eq!(records[0].ratio_to_tdee, None);
        // Net calories reduce to consumed minus burnt.
        assert_eq!(records[0].net_calories, 2000.0);
    }

    #[test]
    fn test_no_weights_yields_null_weight_everywhere() {
        let foods = vec![
            FoodRecord::new("a", 500.0, ts(2024, 3, 1, 12, 0)),
            FoodRecord::new("b", 600.0, ts(2024, 3, 2, 12, 0)),
        ];

        let records = aggregate(&profile(), &[], &foods, &[]).unwrap();

        for r in &records {
            assert_eq!(r.weight_kg, None);
            assert_eq!(r.bmr, 0.0);
            assert_eq!(r.tdee, 0.0);
        }
    }

    #[test]
    fn test_non_finite_calories_rejected() {
        let foods = vec![FoodRecord::new("bad", f64::NAN, ts(2024, 3, 1, 12, 0))];
        assert!(aggregate(&profile(), &[], &foods, &[]).is_err());

        let mut food = FoodRecord::new("bad macro", 500.0, ts(2024, 3, 1, 12, 0));
        food.protein = Some(f64::INFINITY);
        assert!(aggregate(&profile(), &[], &[food], &[]).is_err());

        let weights = vec![WeightRecord::new(f64::NAN, ts(2024, 3, 1, 8, 0))];
        assert!(aggregate(&profile(), &[], &[], &weights).is_err());
    }

    #[test]
    fn test_output_sorted_descending() {
        let foods = vec![
            FoodRecord::new("a", 500.0, ts(2024, 3, 5, 12, 0)),
            FoodRecord::new("b", 600.0, ts(2024, 3, 1, 12, 0)),
            FoodRecord::new("c", 700.0, ts(2024, 3, 3, 12, 0)),
        ];

        let records = aggregate(&profile(), &[], &foods, &[]).unwrap();

        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }
}
