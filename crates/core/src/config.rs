//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the record store.
//! Library code never reads environment variables itself; binaries read them and hand the raw
//! values to the parsing helpers here.

use crate::constants::{DEFAULT_FILE_FORMAT, DEFAULT_FILE_URL};
use crate::{RecordError, RecordResult};
use medchain_types::NonEmptyText;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    seed_demo_data: bool,
    default_file_format: String,
    default_file_url: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Text`] if the file format or url defaults are blank.
    pub fn new(
        seed_demo_data: bool,
        default_file_format: impl AsRef<str>,
        default_file_url: impl AsRef<str>,
    ) -> RecordResult<Self> {
        Ok(Self {
            seed_demo_data,
            default_file_format: NonEmptyText::new(default_file_format)?.into_inner(),
            default_file_url: NonEmptyText::new(default_file_url)?.into_inner(),
        })
    }

    pub fn seed_demo_data(&self) -> bool {
        self.seed_demo_data
    }

    pub fn default_file_format(&self) -> &str {
        &self.default_file_format
    }

    pub fn default_file_url(&self) -> &str {
        &self.default_file_url
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
            default_file_format: DEFAULT_FILE_FORMAT.to_string(),
            default_file_url: DEFAULT_FILE_URL.to_string(),
        }
    }
}

/// Parse the demo-data flag from an optional environment value.
///
/// `None` or blank means `true`. Accepts `1/0`, `true/false`, `yes/no`, `on/off`
/// (case-insensitive).
pub fn seed_demo_data_from_env_value(value: Option<String>) -> RecordResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(true),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(RecordError::InvalidInput(format!(
            "unrecognised boolean for demo data flag: '{other}'"
        ))),
    }
}
