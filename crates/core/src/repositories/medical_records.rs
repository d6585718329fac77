//! Medical record operations.
//!
//! Every create/append operation here follows the same sequence:
//!
//! 1. resolve the parent (record, and consultation for prescriptions) or fail with a
//!    not-found error;
//! 2. validate the input;
//! 3. assign the creation timestamp and id;
//! 4. build the canonical payload from [`crate::audit`] and encode it under the item's
//!    [`HashType`];
//! 5. store the item with that hash and refresh the parent record's `updated_date`.
//!
//! Hashes are never recomputed afterwards. Appending a child does not touch the parent's hash.

use crate::audit::{self, AuditEntry};
use crate::constants::{
    CERTIFICATE_ID_PREFIX, CONSULTATION_ID_PREFIX, DIAGNOSTIC_ID_PREFIX, FILE_ID_PREFIX,
    MEDICAL_RECORD_ID_PREFIX, PRESCRIPTION_ID_PREFIX,
};
use crate::models::{
    Consultation, Diagnostic, MedicalCertificate, MedicalRecord, NewCertificate, NewConsultation,
    NewDiagnostic, NewFile, NewPrescription, Prescription, PrescriptionItem, RecordFile,
};
use crate::store::{RecordStore, Stamp};
use crate::{RecordError, RecordResult};
use medchain_hash::{HashType, NonceSource};
use medchain_types::NonEmptyText;

impl<N: NonceSource> RecordStore<N> {
    pub fn record(&self, id: &str) -> Option<&MedicalRecord> {
        self.records.get(id)
    }

    pub fn records_by_patient(&self, patient_id: &str) -> Vec<&MedicalRecord> {
        self.records
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .collect()
    }

    pub fn records_by_doctor(&self, doctor_id: &str) -> Vec<&MedicalRecord> {
        self.records
            .iter()
            .filter(|r| r.doctor_id == doctor_id)
            .collect()
    }

    /// Every hashed item of a record, in display order.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MedicalRecordNotFound`] if `record_id` is unknown.
    pub fn audit_trail(&self, record_id: &str) -> RecordResult<Vec<AuditEntry>> {
        self.records
            .get(record_id)
            .map(audit::audit_trail)
            .ok_or_else(|| RecordError::MedicalRecordNotFound(record_id.to_string()))
    }

    /// Opens a new, empty medical record for a patient.
    ///
    /// # Errors
    ///
    /// [`RecordError::DoctorNotFound`] or [`RecordError::PatientNotFound`] if either id is
    /// unknown.
    pub fn add_medical_record(
        &mut self,
        doctor_id: &str,
        patient_id: &str,
    ) -> RecordResult<MedicalRecord> {
        self.insert_medical_record(Stamp::fresh(MEDICAL_RECORD_ID_PREFIX), doctor_id, patient_id)
    }

    pub(crate) fn insert_medical_record(
        &mut self,
        stamp: Stamp,
        doctor_id: &str,
        patient_id: &str,
    ) -> RecordResult<MedicalRecord> {
        if !self.doctors.contains(doctor_id) {
            return Err(RecordError::DoctorNotFound(doctor_id.to_string()));
        }
        if !self.patients.contains(patient_id) {
            return Err(RecordError::PatientNotFound(patient_id.to_string()));
        }

        let payload = audit::record_payload(patient_id, doctor_id, &stamp.at);
        let hash = self.stamp_hash(HashType::Record, &stamp.id, &payload);

        let record = MedicalRecord {
            id: stamp.id,
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            hash,
            created_date: stamp.at,
            updated_date: stamp.at,
            consultations: Vec::new(),
            diagnostics: Vec::new(),
            medical_certificates: Vec::new(),
            files: Vec::new(),
        };
        self.records.insert(record).cloned()
    }

    /// Appends a consultation.
    ///
    /// Chief complaint and diagnosis are required. Prescription lines with a medication name
    /// become a first prescription, hashed separately and issued at the consultation time.
    ///
    /// # Errors
    ///
    /// - [`RecordError::MedicalRecordNotFound`] if `record_id` is unknown.
    /// - [`RecordError::Text`] if a required field is blank.
    pub fn add_consultation(
        &mut self,
        record_id: &str,
        new: NewConsultation,
    ) -> RecordResult<Consultation> {
        self.insert_consultation(record_id, Stamp::fresh(CONSULTATION_ID_PREFIX), new)
    }

    pub(crate) fn insert_consultation(
        &mut self,
        record_id: &str,
        stamp: Stamp,
        new: NewConsultation,
    ) -> RecordResult<Consultation> {
        self.require_record(record_id)?;

        let chief_complaint = NonEmptyText::new(&new.chief_complaint)?.into_inner();
        let diagnosis = NonEmptyText::new(&new.diagnosis)?.into_inner();
        let history_of_present_illness = new.history_of_present_illness.trim().to_string();
        let treatment_plan = new.treatment_plan.trim().to_string();

        let payload = audit::consultation_payload(
            &chief_complaint,
            &history_of_present_illness,
            &diagnosis,
            &treatment_plan,
            &stamp.at,
        );
        let hash = self.stamp_hash(HashType::Consultation, &stamp.id, &payload);

        let items: Vec<PrescriptionItem> = new
            .prescription_items
            .into_iter()
            .filter(|i| !i.medication_name.trim().is_empty())
            .collect();
        let prescriptions = if items.is_empty() {
            Vec::new()
        } else {
            let first = Stamp {
                id: crate::ids::new_id(PRESCRIPTION_ID_PREFIX),
                at: stamp.at,
            };
            vec![self.build_prescription(&stamp.id, first, None, items)]
        };

        let consultation = Consultation {
            id: stamp.id,
            chief_complaint,
            history_of_present_illness,
            diagnosis,
            treatment_plan,
            created_date: stamp.at,
            hash,
            prescriptions,
        };

        let record = self.record_mut(record_id)?;
        record.consultations.push(consultation.clone());
        record.updated_date = stamp.at;
        Ok(consultation)
    }

    /// Appends a prescription to an existing consultation. The consultation's own hash is
    /// left as it was.
    ///
    /// # Errors
    ///
    /// [`RecordError::MedicalRecordNotFound`] or [`RecordError::ConsultationNotFound`].
    pub fn add_prescription(
        &mut self,
        record_id: &str,
        consultation_id: &str,
        new: NewPrescription,
    ) -> RecordResult<Prescription> {
        self.insert_prescription(
            record_id,
            consultation_id,
            Stamp::fresh(PRESCRIPTION_ID_PREFIX),
            new,
        )
    }

    pub(crate) fn insert_prescription(
        &mut self,
        record_id: &str,
        consultation_id: &str,
        stamp: Stamp,
        new: NewPrescription,
    ) -> RecordResult<Prescription> {
        let record = self.require_record(record_id)?;
        if record.consultation(consultation_id).is_none() {
            return Err(RecordError::ConsultationNotFound {
                record_id: record_id.to_string(),
                consultation_id: consultation_id.to_string(),
            });
        }

        let at = stamp.at;
        let prescription = self.build_prescription(consultation_id, stamp, new.issue_date, new.items);

        let record = self.record_mut(record_id)?;
        if let Some(consultation) = record.consultation_mut(consultation_id) {
            consultation.prescriptions.push(prescription.clone());
        }
        record.updated_date = at;
        Ok(prescription)
    }

    /// Appends a diagnostic. `issue_date` defaults to the creation time.
    ///
    /// # Errors
    ///
    /// - [`RecordError::MedicalRecordNotFound`] if `record_id` is unknown.
    /// - [`RecordError::Text`] if the description is blank.
    pub fn add_diagnostic(
        &mut self,
        record_id: &str,
        new: NewDiagnostic,
    ) -> RecordResult<Diagnostic> {
        self.insert_diagnostic(record_id, Stamp::fresh(DIAGNOSTIC_ID_PREFIX), new)
    }

    pub(crate) fn insert_diagnostic(
        &mut self,
        record_id: &str,
        stamp: Stamp,
        new: NewDiagnostic,
    ) -> RecordResult<Diagnostic> {
        self.require_record(record_id)?;

        let description = NonEmptyText::new(&new.description)?.into_inner();
        let result = new.result.trim().to_string();
        let issue_date = new.issue_date.unwrap_or(stamp.at);

        let payload = audit::diagnostic_payload(&description, &issue_date, &result, &stamp.at);
        let hash = self.stamp_hash(HashType::Diagnostic, &stamp.id, &payload);

        let diagnostic = Diagnostic {
            id: stamp.id,
            description,
            issue_date,
            result,
            created_date: stamp.at,
            hash,
        };

        let record = self.record_mut(record_id)?;
        record.diagnostics.push(diagnostic.clone());
        record.updated_date = stamp.at;
        Ok(diagnostic)
    }

    /// Appends a medical certificate.
    ///
    /// # Errors
    ///
    /// - [`RecordError::MedicalRecordNotFound`] if `record_id` is unknown.
    /// - [`RecordError::Text`] if the purpose is blank.
    /// - [`RecordError::InvalidInput`] if the period of leave is zero days.
    pub fn add_medical_certificate(
        &mut self,
        record_id: &str,
        new: NewCertificate,
    ) -> RecordResult<MedicalCertificate> {
        self.insert_medical_certificate(record_id, Stamp::fresh(CERTIFICATE_ID_PREFIX), new)
    }

    pub(crate) fn insert_medical_certificate(
        &mut self,
        record_id: &str,
        stamp: Stamp,
        new: NewCertificate,
    ) -> RecordResult<MedicalCertificate> {
        self.require_record(record_id)?;

        let purpose = NonEmptyText::new(&new.purpose)?.into_inner();
        if new.period_of_leave == 0 {
            return Err(RecordError::InvalidInput(
                "period_of_leave must be at least one day".into(),
            ));
        }

        let payload = audit::certificate_payload(&purpose, new.period_of_leave, &stamp.at);
        let hash = self.stamp_hash(HashType::Certificate, &stamp.id, &payload);

        let certificate = MedicalCertificate {
            id: stamp.id,
            purpose,
            period_of_leave: new.period_of_leave,
            created_date: stamp.at,
            hash,
        };

        let record = self.record_mut(record_id)?;
        record.medical_certificates.push(certificate.clone());
        record.updated_date = stamp.at;
        Ok(certificate)
    }

    /// Attaches file metadata. Url and format default to the configured values; the
    /// description defaults to empty.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MedicalRecordNotFound`] if `record_id` is unknown.
    pub fn add_file(&mut self, record_id: &str, new: NewFile) -> RecordResult<RecordFile> {
        self.insert_file(record_id, Stamp::fresh(FILE_ID_PREFIX), new)
    }

    pub(crate) fn insert_file(
        &mut self,
        record_id: &str,
        stamp: Stamp,
        new: NewFile,
    ) -> RecordResult<RecordFile> {
        self.require_record(record_id)?;

        let or_default = |value: Option<String>, default: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let url = or_default(new.url, self.cfg.default_file_url());
        let format = or_default(new.format, self.cfg.default_file_format());
        let description = new.description.unwrap_or_default().trim().to_string();

        let payload = audit::file_payload(&url, &format, &description, &stamp.at);
        let hash = self.stamp_hash(HashType::File, &stamp.id, &payload);

        let file = RecordFile {
            id: stamp.id,
            url,
            format,
            description,
            created_date: stamp.at,
            hash,
        };

        let record = self.record_mut(record_id)?;
        record.files.push(file.clone());
        record.updated_date = stamp.at;
        Ok(file)
    }

    fn build_prescription(
        &self,
        consultation_id: &str,
        stamp: Stamp,
        issue_date: Option<chrono::DateTime<chrono::Utc>>,
        items: Vec<PrescriptionItem>,
    ) -> Prescription {
        let issue_date = issue_date.unwrap_or(stamp.at);
        let payload = audit::prescription_payload(consultation_id, &issue_date, &items, &stamp.at);
        let hash = self.stamp_hash(HashType::Prescription, &stamp.id, &payload);

        Prescription {
            id: stamp.id,
            issue_date,
            items,
            created_date: stamp.at,
            hash,
        }
    }

    fn require_record(&self, record_id: &str) -> RecordResult<&MedicalRecord> {
        self.records
            .get(record_id)
            .ok_or_else(|| RecordError::MedicalRecordNotFound(record_id.to_string()))
    }

    fn record_mut(&mut self, record_id: &str) -> RecordResult<&mut MedicalRecord> {
        self.records
            .get_mut(record_id)
            .ok_or_else(|| RecordError::MedicalRecordNotFound(record_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewDoctor, NewPatient};
    use crate::CoreConfig;
    use medchain_hash::{decode_type_prefix, label_for_hash, HashEncoder, HashType};
    use std::sync::Arc;

    struct Fixture {
        store: RecordStore,
        doctor_id: String,
        patient_id: String,
        record_id: String,
    }

    fn fixture() -> Fixture {
        let mut store = RecordStore::empty(Arc::new(CoreConfig::default()));
        let doctor = store
            .register_doctor(NewDoctor {
                full_name: "Dr. Maria Silva".into(),
                email: "maria.silva@medchain.com".into(),
                crm: "12345-SP".into(),
                specialty: "Clínica Geral".into(),
            })
            .unwrap();
        let patient = store
            .add_patient(
                &doctor.id,
                NewPatient {
                    full_name: "Ana Oliveira".into(),
                    email: "ana.oliveira@email.com".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        let record = store.add_medical_record(&doctor.id, &patient.id).unwrap();

        Fixture {
            store,
            doctor_id: doctor.id,
            patient_id: patient.id,
            record_id: record.id,
        }
    }

    fn headache() -> NewConsultation {
        NewConsultation {
            chief_complaint: "Headache".into(),
            history_of_present_illness: "Five days, worse in the morning".into(),
            diagnosis: "Tension headache".into(),
            treatment_plan: "Rest and hydration".into(),
            prescription_items: vec![],
        }
    }

    fn paracetamol() -> PrescriptionItem {
        PrescriptionItem {
            medication_name: "Paracetamol 750mg".into(),
            dosage: "1 comprimido".into(),
            frequency: "8/8h".into(),
            treatment_duration: "5 dias".into(),
        }
    }

    #[test]
    fn new_record_is_hashed_and_empty() {
        let f = fixture();
        let record = f.store.record(&f.record_id).unwrap();

        assert!(record.hash.as_str().starts_with("mr-"));
        assert_eq!(record.hash.hash_type(), Some(HashType::Record));
        assert!(record.consultations.is_empty());
        assert_eq!(record.patient_id, f.patient_id);
        assert_eq!(f.store.records_by_patient(&f.patient_id).len(), 1);
        assert_eq!(f.store.records_by_doctor(&f.doctor_id).len(), 1);
    }

    #[test]
    fn add_medical_record_checks_both_parties() {
        let mut f = fixture();
        let err = f
            .store
            .add_medical_record("doc-404", &f.patient_id)
            .unwrap_err();
        assert!(matches!(err, RecordError::DoctorNotFound(_)));

        let err = f
            .store
            .add_medical_record(&f.doctor_id, "pat-404")
            .unwrap_err();
        assert!(matches!(err, RecordError::PatientNotFound(_)));
    }

    #[test]
    fn consultation_and_file_scenario() {
        let mut f = fixture();

        let consultation = f.store.add_consultation(&f.record_id, headache()).unwrap();
        let file = f
            .store
            .add_file(
                &f.record_id,
                NewFile {
                    description: Some("Blood test".into()),
                    format: Some("PDF".into()),
                    url: None,
                },
            )
            .unwrap();

        assert!(consultation.hash.as_str().starts_with("con-"));
        assert!(file.hash.as_str().starts_with("file-"));
        assert_eq!(decode_type_prefix(consultation.hash.as_str()), Some("con"));
        assert_eq!(decode_type_prefix(file.hash.as_str()), Some("file"));
        assert_eq!(label_for_hash(consultation.hash.as_str()), "Consulta");
        assert_eq!(label_for_hash(file.hash.as_str()), "Arquivo");
        assert_eq!(file.url, "#");

        let record = f.store.record(&f.record_id).unwrap();
        assert_eq!(record.consultations, vec![consultation]);
        assert_eq!(record.files, vec![file]);
    }

    #[test]
    fn identical_content_gets_distinct_hashes() {
        let mut f = fixture();
        let a = f.store.add_consultation(&f.record_id, headache()).unwrap();
        let b = f.store.add_consultation(&f.record_id, headache()).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn consultation_requires_complaint_and_diagnosis() {
        let mut f = fixture();
        let mut missing = headache();
        missing.diagnosis = "  ".into();

        assert!(matches!(
            f.store.add_consultation(&f.record_id, missing),
            Err(RecordError::Text(_))
        ));
        assert!(f.store.record(&f.record_id).unwrap().consultations.is_empty());
    }

    #[test]
    fn consultation_with_items_creates_hashed_prescription() {
        let mut f = fixture();
        let mut new = headache();
        new.prescription_items = vec![
            paracetamol(),
            PrescriptionItem {
                medication_name: "   ".into(),
                ..Default::default()
            },
        ];

        let consultation = f.store.add_consultation(&f.record_id, new).unwrap();
        assert_eq!(consultation.prescriptions.len(), 1);

        let prescription = &consultation.prescriptions[0];
        assert_eq!(prescription.items, vec![paracetamol()]);
        assert_eq!(prescription.issue_date, consultation.created_date);
        assert!(prescription.hash.as_str().starts_with("pre-"));
    }

    #[test]
    fn consultation_with_only_blank_items_has_no_prescription() {
        let mut f = fixture();
        let mut new = headache();
        new.prescription_items = vec![PrescriptionItem::default()];

        let consultation = f.store.add_consultation(&f.record_id, new).unwrap();
        assert!(consultation.prescriptions.is_empty());
    }

    #[test]
    fn appending_prescription_keeps_parent_hashes() {
        let mut f = fixture();
        let consultation = f.store.add_consultation(&f.record_id, headache()).unwrap();
        let record_hash = f.store.record(&f.record_id).unwrap().hash.clone();

        let prescription = f
            .store
            .add_prescription(
                &f.record_id,
                &consultation.id,
                NewPrescription {
                    issue_date: None,
                    items: vec![paracetamol()],
                },
            )
            .unwrap();

        let record = f.store.record(&f.record_id).unwrap();
        let stored = record.consultation(&consultation.id).unwrap();
        assert_eq!(stored.hash, consultation.hash);
        assert_eq!(stored.prescriptions, vec![prescription.clone()]);
        assert_eq!(record.hash, record_hash);
        assert_eq!(record.updated_date, prescription.created_date);
        assert_eq!(prescription.hash.hash_type(), Some(HashType::Prescription));
    }

    #[test]
    fn prescription_on_unknown_consultation() {
        let mut f = fixture();
        let err = f
            .store
            .add_prescription(&f.record_id, "cons-404", NewPrescription::default())
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::ConsultationNotFound { ref consultation_id, .. } if consultation_id == "cons-404"
        ));
        assert!(err.is_not_found());
    }

    #[test]
    fn diagnostic_defaults_issue_date() {
        let mut f = fixture();
        let diagnostic = f
            .store
            .add_diagnostic(
                &f.record_id,
                NewDiagnostic {
                    description: "Hemograma completo".into(),
                    issue_date: None,
                    result: "Normal".into(),
                },
            )
            .unwrap();

        assert_eq!(diagnostic.issue_date, diagnostic.created_date);
        assert!(diagnostic.hash.as_str().starts_with("dia-"));
    }

    #[test]
    fn certificate_rules() {
        let mut f = fixture();
        let err = f
            .store
            .add_medical_certificate(
                &f.record_id,
                NewCertificate {
                    purpose: "Afastamento laboral".into(),
                    period_of_leave: 0,
                },
            )
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidInput(_)));

        let cert = f
            .store
            .add_medical_certificate(
                &f.record_id,
                NewCertificate {
                    purpose: "Afastamento laboral".into(),
                    period_of_leave: 3,
                },
            )
            .unwrap();
        assert!(cert.hash.as_str().starts_with("cert-"));
        assert_eq!(cert.hash.label(), "Atestado");
    }

    #[test]
    fn file_uses_configured_defaults() {
        let cfg = CoreConfig::new(false, "PNG", "/uploads/pending").unwrap();
        let mut f = fixture();
        f.store.cfg = Arc::new(cfg);

        let file = f.store.add_file(&f.record_id, NewFile::default()).unwrap();
        assert_eq!(file.format, "PNG");
        assert_eq!(file.url, "/uploads/pending");
        assert_eq!(file.description, "");
    }

    #[test]
    fn appends_to_unknown_record_fail() {
        let mut f = fixture();
        assert!(f
            .store
            .add_consultation("mr-404", headache())
            .unwrap_err()
            .is_not_found());
        assert!(f
            .store
            .add_file("mr-404", NewFile::default())
            .unwrap_err()
            .is_not_found());
        assert!(f.store.audit_trail("mr-404").unwrap_err().is_not_found());
    }

    #[test]
    fn audit_trail_lists_every_hashed_item() {
        let mut f = fixture();
        let mut new = headache();
        new.prescription_items = vec![paracetamol()];
        f.store.add_consultation(&f.record_id, new).unwrap();
        f.store
            .add_diagnostic(
                &f.record_id,
                NewDiagnostic {
                    description: "Raio-X".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        f.store
            .add_medical_certificate(
                &f.record_id,
                NewCertificate {
                    purpose: "Repouso".into(),
                    period_of_leave: 2,
                },
            )
            .unwrap();
        f.store.add_file(&f.record_id, NewFile::default()).unwrap();

        let trail = f.store.audit_trail(&f.record_id).unwrap();
        let labels: Vec<&str> = trail.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Prontuário",
                "Consulta",
                "Prescrição",
                "Diagnóstico",
                "Atestado",
                "Arquivo"
            ]
        );
        assert_eq!(trail[0].item_id, f.record_id);
        assert!(trail.iter().all(|e| e.hash_type.is_some() && e.prefix.is_some()));
    }

    #[test]
    fn custom_encoder_is_used() {
        struct Counter(std::cell::Cell<u32>);
        impl NonceSource for Counter {
            fn next_nonce(&self) -> String {
                let n = self.0.get();
                self.0.set(n + 1);
                format!("n{n}")
            }
        }

        let mut store = RecordStore::with_encoder(
            Arc::new(CoreConfig::default()),
            HashEncoder::with_nonce_source(Counter(std::cell::Cell::new(0))),
        );
        let doctor = store
            .register_doctor(NewDoctor {
                full_name: "Dr. Test".into(),
                email: "test@medchain.com".into(),
                crm: "1-SP".into(),
                specialty: String::new(),
            })
            .unwrap();
        let patient = store
            .add_patient(
                &doctor.id,
                NewPatient {
                    full_name: "Pat".into(),
                    email: "pat@email.com".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        let record = store.add_medical_record(&doctor.id, &patient.id).unwrap();

        assert!(record.hash.as_str().ends_with("-n0"));
    }
}
