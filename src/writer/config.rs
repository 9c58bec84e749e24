//! Writer configuration.

use chrono::NaiveDateTime;

use crate::types::AdifVersion;

/// Output options for [`super::adi::AdiWriter`].
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Target ADIF version; selects the `adif_ver` value and V3-only fields.
    pub version: AdifVersion,
    /// `programid` used when the header does not carry one.
    pub program_id: String,
    /// `programversion` used when the header does not carry one.
    pub program_version: Option<String>,
    /// `created_timestamp` written in V3 headers when the header does not
    /// carry one.
    pub created_timestamp: Option<NaiveDateTime>,
    /// Free text written before the header. ADIF requires a header to start
    /// with something other than `<`.
    pub preamble: String,
    /// Write tag names upper-case.
    pub uppercase_names: bool,
    /// Text between tags within a record. Header tags go one per line.
    pub field_separator: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            version: AdifVersion::V3,
            program_id: "adif-rs".to_string(),
            program_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            created_timestamp: None,
            preamble: "ADIF export".to_string(),
            uppercase_names: true,
            field_separator: " ".to_string(),
        }
    }
}

impl WriterConfig {
    /// Default configuration for `version`.
    pub fn for_version(version: AdifVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }
}
