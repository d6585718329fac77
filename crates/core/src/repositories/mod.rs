//! Record store repositories.
//!
//! [`memory::Repository`] is the keyed in-memory collection behind every entity type. The
//! remaining modules add the entity-specific operations to [`RecordStore`](crate::RecordStore):
//! doctors, patients, and medical records with their nested clinical items.

pub mod doctors;
pub mod medical_records;
pub mod memory;
pub mod patients;

use crate::models::{Doctor, MedicalRecord, Patient};
use memory::Identified;

impl Identified for Doctor {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Patient {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for MedicalRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
