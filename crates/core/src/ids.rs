//! Entity identifiers.
//!
//! Generated identifiers have the form `<kind>-<uuid>` where `<uuid>` is a v4 UUID in its
//! canonical simple form (32 lowercase hex characters, no hyphens):
//!
//! ```text
//! cons-550e8400e29b41d4a716446655440000
//! ```
//!
//! The demo dataset keeps short hand-written ids (`doc-1`, `pat-1`, `mr-1`, ...). Lookups treat
//! ids as opaque strings, so both forms coexist.

use uuid::Uuid;

/// Allocates a fresh identifier under `prefix`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
