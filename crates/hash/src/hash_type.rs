//! Hash type registry: tag name, prefix and display label per clinical artifact.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The kind of clinical artifact an audit hash was generated for.
///
/// This enum is deliberately closed. Each variant maps 1:1 to a short prefix that appears at
/// the start of the hash and to a human-readable label used by audit badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HashType {
    /// The top-level medical record ("prontuário").
    Record,
    Consultation,
    Diagnostic,
    Prescription,
    Certificate,
    File,
}

/// Error returned when a tag name does not match any [`HashType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hash type: '{0}'")]
pub struct ParseHashTypeError(pub String);

impl HashType {
    /// Every variant, in registry order.
    pub const ALL: [HashType; 6] = [
        HashType::Record,
        HashType::Consultation,
        HashType::Diagnostic,
        HashType::Prescription,
        HashType::Certificate,
        HashType::File,
    ];

    /// Canonical upper-case tag name (`RECORD`, `CONSULTATION`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            HashType::Record => "RECORD",
            HashType::Consultation => "CONSULTATION",
            HashType::Diagnostic => "DIAGNOSTIC",
            HashType::Prescription => "PRESCRIPTION",
            HashType::Certificate => "CERTIFICATE",
            HashType::File => "FILE",
        }
    }

    /// Short lowercase prefix written at the start of the hash.
    pub fn prefix(&self) -> &'static str {
        match self {
            HashType::Record => "mr",
            HashType::Consultation => "con",
            HashType::Diagnostic => "dia",
            HashType::Prescription => "pre",
            HashType::Certificate => "cert",
            HashType::File => "file",
        }
    }

    /// Display label for audit badges.
    pub fn label(&self) -> &'static str {
        match self {
            HashType::Record => "Prontuário",
            HashType::Consultation => "Consulta",
            HashType::Diagnostic => "Diagnóstico",
            HashType::Prescription => "Prescrição",
            HashType::Certificate => "Atestado",
            HashType::File => "Arquivo",
        }
    }

    /// Looks up the variant owning `prefix`.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.prefix() == prefix)
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for HashType {
    type Err = ParseHashTypeError;

    /// Parses the canonical tag name. Matching is exact; `consultation` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == s)
            .ok_or_else(|| ParseHashTypeError(s.to_string()))
    }
}
