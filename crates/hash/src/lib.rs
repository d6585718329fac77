//! Type-prefixed audit hashes for clinical records.
//!
//! Every clinical item stored by MedChain (medical record, consultation, diagnostic,
//! prescription, certificate, file) carries an *audit hash*: a short string that identifies
//! the kind of item and fingerprints its content at creation time.
//!
//! ## Format
//!
//! ```text
//! <prefix>-<fingerprint>-<nonce>
//! ```
//!
//! - `prefix` is the lowercase tag of the [`HashType`] (`mr`, `con`, `dia`, `pre`, `cert`,
//!   `file`), or `unk` when an unknown tag name is encoded.
//! - `fingerprint` is a DJB2-style 32-bit hex digest of the canonical payload.
//! - `nonce` is a per-call distinctness token, so identical payloads still get distinct hashes.
//!
//! Everything after the first hyphen is capped at [`MAX_BODY_LEN`] characters.
//!
//! ## Not a cryptographic hash
//!
//! The fingerprint has no collision resistance and offers no tamper evidence. It exists so
//! that audit views can show a stable, type-recognisable tag per item. Do not use it for
//! integrity checks.
//!
//! ## Example
//!
//! ```
//! use medchain_hash::{decode_type_prefix, encode_hash, HashType, Payload};
//!
//! let payload = Payload::new()
//!     .with("chief_complaint", "Headache")
//!     .with("diagnosis", "Tension headache");
//!
//! let hash = encode_hash(HashType::Consultation, &payload);
//! assert!(hash.as_str().starts_with("con-"));
//! assert_eq!(decode_type_prefix(hash.as_str()), Some("con"));
//! assert_eq!(hash.label(), "Consulta");
//! ```

mod encoder;
mod fingerprint;
mod hash_type;
mod nonce;

pub use encoder::{
    decode_type_prefix, decode_type_prefix_value, encode_hash, encode_hash_for_tag,
    label_for_hash, AuditHash, HashEncoder, Payload, GENERIC_LABEL, MAX_BODY_LEN,
    UNKNOWN_PREFIX,
};
pub use fingerprint::{canonical_value, fingerprint, fingerprint_str};
pub use hash_type::{HashType, ParseHashTypeError};
pub use nonce::{NonceSource, SystemNonce};
