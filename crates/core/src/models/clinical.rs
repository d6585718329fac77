use chrono::{DateTime, Utc};
use medchain_hash::AuditHash;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One medication line of a prescription.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PrescriptionItem {
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub treatment_duration: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Prescription {
    pub id: String,
    pub issue_date: DateTime<Utc>,
    pub items: Vec<PrescriptionItem>,
    pub created_date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub hash: AuditHash,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Consultation {
    pub id: String,
    pub chief_complaint: String,
    pub history_of_present_illness: String,
    pub diagnosis: String,
    pub treatment_plan: String,
    pub created_date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub hash: AuditHash,
    pub prescriptions: Vec<Prescription>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Diagnostic {
    pub id: String,
    pub description: String,
    pub issue_date: DateTime<Utc>,
    pub result: String,
    pub created_date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub hash: AuditHash,
}

/// Medical certificate ("atestado").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicalCertificate {
    pub id: String,
    pub purpose: String,
    /// Leave granted, in days.
    pub period_of_leave: u32,
    pub created_date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub hash: AuditHash,
}

/// A file attached to a medical record. Only metadata is stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecordFile {
    pub id: String,
    pub url: String,
    pub format: String,
    pub description: String,
    pub created_date: DateTime<Utc>,
    #[schema(value_type = String)]
    pub hash: AuditHash,
}

/// A patient's medical record and every clinical item appended to it.
///
/// `hash` is set when the record is created. Appending items refreshes `updated_date` but
/// never touches the record's own hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicalRecord {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    #[schema(value_type = String)]
    pub hash: AuditHash,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub consultations: Vec<Consultation>,
    pub diagnostics: Vec<Diagnostic>,
    pub medical_certificates: Vec<MedicalCertificate>,
    pub files: Vec<RecordFile>,
}

impl MedicalRecord {
    pub fn consultation(&self, consultation_id: &str) -> Option<&Consultation> {
        self.consultations.iter().find(|c| c.id == consultation_id)
    }

    pub(crate) fn consultation_mut(&mut self, consultation_id: &str) -> Option<&mut Consultation> {
        self.consultations
            .iter_mut()
            .find(|c| c.id == consultation_id)
    }
}
