//! Encoding and decoding of type-prefixed audit hashes.

use crate::fingerprint::fingerprint;
use crate::hash_type::HashType;
use crate::nonce::{NonceSource, SystemNonce};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Maximum length of the part after the prefix hyphen.
pub const MAX_BODY_LEN: usize = 24;

/// Prefix used when an unrecognised tag name is encoded.
pub const UNKNOWN_PREFIX: &str = "unk";

/// Label shown for hashes whose prefix is missing or unknown.
pub const GENERIC_LABEL: &str = "Registro";

/// Canonical hash input for one clinical item.
///
/// A mapping of field name to JSON value. Keys are held sorted, so insertion order is
/// irrelevant to the fingerprint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Content fingerprint of this payload (no nonce).
    pub fn fingerprint(&self) -> String {
        fingerprint(&Value::Object(self.0.clone()))
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// An audit hash as stored on a clinical item.
///
/// Generated once at creation and never mutated. Serialises as a plain string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditHash(String);

impl AuditHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading type prefix, if the hash is well formed.
    pub fn prefix(&self) -> Option<&str> {
        decode_type_prefix(&self.0)
    }

    /// The hash type encoded in the prefix. `None` for `unk` or malformed hashes.
    pub fn hash_type(&self) -> Option<HashType> {
        self.prefix().and_then(HashType::from_prefix)
    }

    /// Display label, falling back to [`GENERIC_LABEL`].
    pub fn label(&self) -> &'static str {
        label_for_hash(&self.0)
    }
}

impl fmt::Display for AuditHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AuditHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generates audit hashes from a payload and a nonce source.
///
/// This is a generator, not a pure function: two calls with the same arguments return
/// different hashes because the nonce differs. Encoding never fails.
#[derive(Clone, Debug, Default)]
pub struct HashEncoder<N = SystemNonce> {
    nonce: N,
}

impl HashEncoder<SystemNonce> {
    pub fn new() -> Self {
        Self { nonce: SystemNonce }
    }
}

impl<N: NonceSource> HashEncoder<N> {
    /// Uses `nonce` instead of the system source. Mainly for deterministic tests.
    pub fn with_nonce_source(nonce: N) -> Self {
        Self { nonce }
    }

    /// Encodes `payload` under `hash_type`.
    pub fn encode(&self, hash_type: HashType, payload: &Payload) -> AuditHash {
        self.compose(hash_type.prefix(), payload)
    }

    /// Encodes `payload` under a tag name such as `"CONSULTATION"`.
    ///
    /// Unknown tags degrade to the [`UNKNOWN_PREFIX`] instead of being rejected.
    pub fn encode_tag(&self, tag: &str, payload: &Payload) -> AuditHash {
        let prefix = match tag.parse::<HashType>() {
            Ok(t) => t.prefix(),
            Err(e) => {
                tracing::debug!("{e}; encoding with '{UNKNOWN_PREFIX}' prefix");
                UNKNOWN_PREFIX
            }
        };
        self.compose(prefix, payload)
    }

    fn compose(&self, prefix: &str, payload: &Payload) -> AuditHash {
        let combined = format!("{}-{}", payload.fingerprint(), self.nonce.next_nonce());
        let body: String = combined.chars().take(MAX_BODY_LEN).collect();
        AuditHash(format!("{prefix}-{body}"))
    }
}

/// Encodes with the system nonce source.
pub fn encode_hash(hash_type: HashType, payload: &Payload) -> AuditHash {
    HashEncoder::new().encode(hash_type, payload)
}

/// Encodes under a tag name with the system nonce source. Unknown tags give `unk-...`.
pub fn encode_hash_for_tag(tag: &str, payload: &Payload) -> AuditHash {
    HashEncoder::new().encode_tag(tag, payload)
}

/// Returns the leading run of lowercase ASCII letters when it is immediately followed by `-`.
///
/// Returns `None` for empty input or when no such run starts the string.
pub fn decode_type_prefix(hash: &str) -> Option<&str> {
    let end = hash
        .bytes()
        .position(|b| !b.is_ascii_lowercase())
        .unwrap_or(hash.len());

    if end == 0 || hash.as_bytes().get(end) != Some(&b'-') {
        return None;
    }
    Some(&hash[..end])
}

/// [`decode_type_prefix`] for untyped input: anything that is not a JSON string yields `None`.
pub fn decode_type_prefix_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => decode_type_prefix(s).map(str::to_owned),
        _ => None,
    }
}

/// Maps a stored hash to its display label, or [`GENERIC_LABEL`] when the prefix is unknown.
pub fn label_for_hash(hash: &str) -> &'static str {
    decode_type_prefix(hash)
        .and_then(HashType::from_prefix)
        .map(|t| t.label())
        .unwrap_or(GENERIC_LABEL)
}
