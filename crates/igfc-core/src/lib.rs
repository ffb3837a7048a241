//! Shared domain types for the profile metrics collector: the canonical
//! record shape, the validating normalizer, and request settings.

pub mod error;
pub mod normalize;
pub mod record;
pub mod settings;

pub use error::{ConfigError, ValidationError};
pub use normalize::{
    canonical_profile_url, ensure_int, normalize_username, validate_and_clean,
    validate_collected, RawProfile,
};
pub use record::{CollectedProfile, ProfileRecord, RecordSource, RECORD_FIELDS};
pub use settings::{load_settings, ProxySettings, RequestSettings, Settings};
