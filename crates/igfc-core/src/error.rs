use thiserror::Error;

/// Raised when loosely typed profile data cannot become a trusted record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("username is empty after normalization: {raw:?}")]
    EmptyUsername { raw: String },

    #[error("invalid integer for {field}: {value}")]
    InvalidInteger { field: String, value: String },

    #[error("invalid number for {field}: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("timestamp cannot be empty")]
    EmptyTimestamp,

    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("record must be a JSON object, got {0}")]
    NotAnObject(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file '{path}': {source}")]
    SettingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON settings file '{path}': {source}")]
    SettingsJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse YAML settings file '{path}': {source}")]
    SettingsYaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("settings validation error: {0}")]
    Validation(String),
}
