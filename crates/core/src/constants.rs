//! Constants used throughout the MedChain core crate.

/// Format recorded for file attachments when none is given.
pub const DEFAULT_FILE_FORMAT: &str = "PDF";

/// URL recorded for file attachments when none is given.
pub const DEFAULT_FILE_URL: &str = "#";

/// Environment variable controlling whether the demo dataset is loaded at startup.
pub const SEED_DEMO_DATA_ENV: &str = "MEDCHAIN_SEED_DEMO_DATA";

/// Identifier prefixes per entity kind.
pub const DOCTOR_ID_PREFIX: &str = "doc";
pub const PATIENT_ID_PREFIX: &str = "pat";
pub const MEDICAL_RECORD_ID_PREFIX: &str = "mr";
pub const CONSULTATION_ID_PREFIX: &str = "cons";
pub const DIAGNOSTIC_ID_PREFIX: &str = "diag";
pub const PRESCRIPTION_ID_PREFIX: &str = "presc";
pub const CERTIFICATE_ID_PREFIX: &str = "cert";
pub const FILE_ID_PREFIX: &str = "file";
