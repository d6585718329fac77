//! Per-call distinctness tokens.

use crate::fingerprint::fingerprint_str;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

static NONCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Source of nonces appended to audit hashes.
///
/// Implementations only need call-to-call distinctness; unpredictability is not required.
pub trait NonceSource {
    fn next_nonce(&self) -> String;
}

/// Default nonce source.
///
/// Fingerprints `"<unix-ms>-<pid>-<counter>-<random>"`. The process-wide counter makes two
/// calls in the same millisecond differ even if the random draws collide.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemNonce;

impl NonceSource for SystemNonce {
    fn next_nonce(&self) -> String {
        let count = NONCE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let seed = format!(
            "{}-{}-{}-{}",
            Utc::now().timestamp_millis(),
            std::process::id(),
            count,
            rand::random::<u64>()
        );
        fingerprint_str(&seed)
    }
}
