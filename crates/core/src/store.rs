//! The record store.
//!
//! [`RecordStore`] owns the doctor, patient and medical-record repositories and the hash
//! encoder. It is the only way to create clinical items, which guarantees that each one is
//! stamped with its audit hash exactly once, at creation.
//!
//! The store is a plain single-owner value: mutating operations take `&mut self` and run to
//! completion. Callers that share it across tasks wrap it in a lock.

use crate::config::CoreConfig;
use crate::models::{Doctor, MedicalRecord, Patient};
use crate::repositories::memory::Repository;
use crate::{seed, RecordResult};
use chrono::{DateTime, Utc};
use medchain_hash::{AuditHash, HashEncoder, HashType, NonceSource, Payload, SystemNonce};
use std::sync::Arc;

/// Identity and creation time assigned to a new entity.
#[derive(Clone, Debug)]
pub(crate) struct Stamp {
    pub id: String,
    pub at: DateTime<Utc>,
}

impl Stamp {
    /// Fresh generated id, stamped now.
    pub fn fresh(prefix: &str) -> Self {
        Self {
            id: crate::ids::new_id(prefix),
            at: Utc::now(),
        }
    }

    /// Fixed id and time, for seeded data.
    pub fn fixed(id: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            at,
        }
    }
}

/// In-memory store of doctors, patients and medical records.
#[derive(Debug)]
pub struct RecordStore<N = SystemNonce> {
    pub(crate) cfg: Arc<CoreConfig>,
    pub(crate) encoder: HashEncoder<N>,
    pub(crate) doctors: Repository<Doctor>,
    pub(crate) patients: Repository<Patient>,
    pub(crate) records: Repository<MedicalRecord>,
}

impl RecordStore<SystemNonce> {
    /// Creates a store, loading the demo dataset when the configuration asks for it.
    ///
    /// # Errors
    ///
    /// Propagates any error raised while inserting the demo dataset.
    pub fn new(cfg: Arc<CoreConfig>) -> RecordResult<Self> {
        let seed_demo_data = cfg.seed_demo_data();
        let mut store = Self::with_encoder(cfg, HashEncoder::new());
        if seed_demo_data {
            seed::load_demo_data(&mut store)?;
        }
        Ok(store)
    }

    /// Creates a store with no data regardless of configuration.
    pub fn empty(cfg: Arc<CoreConfig>) -> Self {
        Self::with_encoder(cfg, HashEncoder::new())
    }
}

impl<N: NonceSource> RecordStore<N> {
    /// Creates an empty store hashing with `encoder`.
    pub fn with_encoder(cfg: Arc<CoreConfig>, encoder: HashEncoder<N>) -> Self {
        Self {
            cfg,
            encoder,
            doctors: Repository::new(),
            patients: Repository::new(),
            records: Repository::new(),
        }
    }

    /// Generates the audit hash for a new item.
    pub(crate) fn stamp_hash(&self, hash_type: HashType, item_id: &str, payload: &Payload) -> AuditHash {
        let hash = self.encoder.encode(hash_type, payload);
        tracing::debug!(item_id, hash_type = %hash_type, hash = %hash, "audit hash issued");
        hash
    }
}
