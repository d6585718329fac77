//! # MedChain Core
//!
//! Core business logic for the MedChain medical record system.
//!
//! This crate contains pure data operations over an in-memory record store:
//! - Doctors and the patients they manage
//! - Medical records with consultations, prescriptions, diagnostics, certificates and files
//! - Audit hashing of every clinical item at creation (see [`audit`] and `medchain-hash`)
//! - A demo dataset for development
//!
//! **No API concerns**: HTTP servers and command-line handling belong in `api-rest` and
//! `medchain-cli`.

pub mod audit;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod store;

pub use audit::AuditEntry;
pub use config::CoreConfig;
pub use error::{RecordError, RecordResult};
pub use store::RecordStore;

pub use medchain_hash::{AuditHash, HashType};
pub use medchain_types::{EmailAddress, NonEmptyText, TextError};
