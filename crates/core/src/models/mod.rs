//! Domain entities held by the record store.
//!
//! - [`people`]: doctors and patients.
//! - [`clinical`]: medical records and the clinical items nested inside them. Every clinical
//!   item carries an immutable [`AuditHash`](medchain_hash::AuditHash).
//! - [`inputs`]: request shapes for create and update operations.

pub mod clinical;
pub mod inputs;
pub mod people;

pub use clinical::{
    Consultation, Diagnostic, MedicalCertificate, MedicalRecord, Prescription, PrescriptionItem,
    RecordFile,
};
pub use inputs::{
    NewCertificate, NewConsultation, NewDiagnostic, NewDoctor, NewFile, NewPatient,
    NewPrescription, PatientUpdate,
};
pub use people::{AccountStatus, Address, Doctor, Gender, Patient};
