use thiserror::Error;

/// Errors raised by the model layer.
///
/// Construction and mounting never fail; only date handling and JSON text
/// decoding can.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{field} is missing or not a valid date (got {value:?})")]
    MissingOrInvalidDate {
        field: &'static str,
        value: Option<String>,
    },

    #[error("No representable occurrence in year {year}")]
    DateOutOfRange { year: i32 },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
