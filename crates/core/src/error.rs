#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] medchain_types::TextError),

    #[error("doctor not found: {0}")]
    DoctorNotFound(String),
    #[error("patient not found: {0}")]
    PatientNotFound(String),
    #[error("medical record not found: {0}")]
    MedicalRecordNotFound(String),
    #[error("consultation {consultation_id} not found in medical record {record_id}")]
    ConsultationNotFound {
        record_id: String,
        consultation_id: String,
    },

    #[error("an entry with id '{0}' already exists")]
    DuplicateId(String),
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
}

impl RecordError {
    /// True for the lookup failures a caller should present as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RecordError::DoctorNotFound(_)
                | RecordError::PatientNotFound(_)
                | RecordError::MedicalRecordNotFound(_)
                | RecordError::ConsultationNotFound { .. }
        )
    }
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
