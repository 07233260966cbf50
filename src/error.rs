use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaizeOpsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid membership function '{term}' on '{variable}': {reason}")]
    InvalidMembership {
        variable: String,
        term: String,
        reason: String,
    },

    #[error("Incomplete rule base: {0}")]
    IncompleteRuleBase(String),

    #[error("Forecast data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid forecast record at day offset {day_offset}: {reason}")]
    InvalidRecord { day_offset: u32, reason: String },

    #[error("{variable} value {value} is not a finite number")]
    NonFiniteInput { variable: String, value: f64 },

    #[error("Start day {day} outside sowing domain [{start}, {end}]")]
    OutOfDomain { day: i64, start: i64, end: i64 },

    #[error("{variable} value {value} outside [{min}, {max}]")]
    OutOfRange {
        variable: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, MaizeOpsError>;
