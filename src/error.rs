//! Error types for the energy balance engine.

use thiserror::Error;

/// Errors that can occur when parsing profile enumerations.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown lifestyle: {0}")]
    UnknownLifestyle(String),

    #[error("unknown sustainability mode: {0}")]
    UnknownSustainabilityMode(String),
}

/// Caller contract violations detected on raw input records.
///
/// The aggregator rejects non-finite numbers up front so NaN and infinity
/// can never leak into daily sums or downstream statistics. Missing profile
/// data is not an error; it degrades BMR/TDEE to zero instead.
#[derive(Debug, Error)]
pub enum InvalidInput {
    #[error("non-finite {field} value in {record} record: {value}")]
    NonFinite {
        record: &'static str,
        field: &'static str,
        value: f64,
    },
}
