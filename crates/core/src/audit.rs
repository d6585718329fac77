//! Canonical hash payloads and audit trails.
//!
//! Each clinical item is hashed once, at creation, over a fixed set of its fields plus the
//! creation timestamp. The payload builders below are the single definition of those field
//! sets; the store calls them and never hashes anything else.
//!
//! | Hash type    | Payload fields                                                        |
//! |--------------|-----------------------------------------------------------------------|
//! | RECORD       | patient_id, doctor_id, created                                        |
//! | CONSULTATION | chief_complaint, history_of_present_illness, diagnosis, treatment_plan, created |
//! | DIAGNOSTIC   | description, issue_date, result, created                              |
//! | PRESCRIPTION | consultation_id, issue_date, items, created                           |
//! | CERTIFICATE  | purpose, period_of_leave, created                                     |
//! | FILE         | url, format, description, created                                     |

use crate::models::{MedicalRecord, PrescriptionItem};
use chrono::{DateTime, SecondsFormat, Utc};
use medchain_hash::{canonical_value, AuditHash, HashType, Payload};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Renders a timestamp the way it enters hash payloads: RFC 3339, UTC, milliseconds.
pub fn payload_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn record_payload(patient_id: &str, doctor_id: &str, created: &DateTime<Utc>) -> Payload {
    Payload::new()
        .with("patient_id", patient_id)
        .with("doctor_id", doctor_id)
        .with("created", payload_timestamp(created))
}

pub fn consultation_payload(
    chief_complaint: &str,
    history_of_present_illness: &str,
    diagnosis: &str,
    treatment_plan: &str,
    created: &DateTime<Utc>,
) -> Payload {
    Payload::new()
        .with("chief_complaint", chief_complaint)
        .with("history_of_present_illness", history_of_present_illness)
        .with("diagnosis", diagnosis)
        .with("treatment_plan", treatment_plan)
        .with("created", payload_timestamp(created))
}

pub fn diagnostic_payload(
    description: &str,
    issue_date: &DateTime<Utc>,
    result: &str,
    created: &DateTime<Utc>,
) -> Payload {
    Payload::new()
        .with("description", description)
        .with("issue_date", payload_timestamp(issue_date))
        .with("result", result)
        .with("created", payload_timestamp(created))
}

pub fn prescription_payload(
    consultation_id: &str,
    issue_date: &DateTime<Utc>,
    items: &[PrescriptionItem],
    created: &DateTime<Utc>,
) -> Payload {
    Payload::new()
        .with("consultation_id", consultation_id)
        .with("issue_date", payload_timestamp(issue_date))
        .with("items", canonical_value(items))
        .with("created", payload_timestamp(created))
}

pub fn certificate_payload(purpose: &str, period_of_leave: u32, created: &DateTime<Utc>) -> Payload {
    Payload::new()
        .with("purpose", purpose)
        .with("period_of_leave", period_of_leave)
        .with("created", payload_timestamp(created))
}

pub fn file_payload(url: &str, format: &str, description: &str, created: &DateTime<Utc>) -> Payload {
    Payload::new()
        .with("url", url)
        .with("format", format)
        .with("description", description)
        .with("created", payload_timestamp(created))
}

/// One hashed item of a medical record, as shown by an audit badge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuditEntry {
    pub item_id: String,
    /// `None` when the stored hash has no recognised prefix.
    #[schema(value_type = Option<String>)]
    pub hash_type: Option<HashType>,
    pub prefix: Option<String>,
    pub label: String,
    #[schema(value_type = String)]
    pub hash: AuditHash,
    pub created_date: DateTime<Utc>,
}

impl AuditEntry {
    fn new(item_id: &str, hash: &AuditHash, created_date: DateTime<Utc>) -> Self {
        Self {
            item_id: item_id.to_string(),
            hash_type: hash.hash_type(),
            prefix: hash.prefix().map(str::to_owned),
            label: hash.label().to_string(),
            hash: hash.clone(),
            created_date,
        }
    }
}

/// Lists every hashed item of `record`: the record itself first, then consultations (each
/// followed by its prescriptions), diagnostics, certificates and files.
pub fn audit_trail(record: &MedicalRecord) -> Vec<AuditEntry> {
    let mut entries = vec![AuditEntry::new(&record.id, &record.hash, record.created_date)];

    for c in &record.consultations {
        entries.push(AuditEntry::new(&c.id, &c.hash, c.created_date));
        for p in &c.prescriptions {
            entries.push(AuditEntry::new(&p.id, &p.hash, p.created_date));
        }
    }
    for d in &record.diagnostics {
        entries.push(AuditEntry::new(&d.id, &d.hash, d.created_date));
    }
    for mc in &record.medical_certificates {
        entries.push(AuditEntry::new(&mc.id, &mc.hash, mc.created_date));
    }
    for f in &record.files {
        entries.push(AuditEntry::new(&f.id, &f.hash, f.created_date));
    }

    entries
}
