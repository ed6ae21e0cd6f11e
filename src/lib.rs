//! Energy balance aggregation and analytics engine.
//!
//! Turns three independent, sparsely-sampled event streams (weight, food and
//! exercise logs) into one derived record per UTC calendar day, then computes
//! statistical summaries over that series: moving averages, intake outliers,
//! deficit classification, completeness streaks, a templated narrative and a
//! linear weight-change projection.
//!
//! The engine is pure: no I/O, no clock reads, no shared mutable state. The
//! same inputs always produce byte-identical output, and everything is
//! recomputed from scratch on each call rather than cached.
//!
//! Typical flow:
//!
//! ```
//! use energymodel::{aggregate, analyze, trends};
//! use energymodel::{SustainabilityMode, UserProfile};
//!
//! let profile = UserProfile {
//!     height_cm: Some(180.0),
//!     age_years: Some(30),
//!     lifestyle: None,
//!     sustainability_mode: SustainabilityMode::Standard,
//! };
//!
//! // Records come from the caller's store; empty here.
//! let daily = aggregate(&profile, &[], &[], &[]).unwrap();
//!
//! let mut ascending = daily.clone();
//! ascending.reverse();
//! let stats = analyze(&ascending, &[], &[]);
//!
//! let signals = trends(&daily, &[], profile.sustainability_mode);
//! assert!(signals.avg_deficit.is_none());
//! assert_eq!(stats.narrative, "No data available for this period.");
//! ```

pub mod aggregate;
pub mod analytics;
pub mod calories;
pub mod domain;
pub mod error;
pub mod trends;

pub use aggregate::aggregate;
pub use analytics::{analyze, Classification, Outlier, OutlierReason, Stats, Streaks};
pub use calories::{bmr, build_weight_map, resolve_weight_for_day, tdee, KCAL_PER_KG_FAT};
pub use domain::{
    day_key, DailyRecord, ExerciseRecord, FoodRecord, Lifestyle, SustainabilityMode, UserProfile,
    WeightRecord,
};
pub use error::{InvalidInput, ParseError};
pub use trends::{trends, TrendSignals};
