//! Patient operations.
//!
//! Patients are created by a doctor and linked to that doctor for their lifetime.

use crate::constants::PATIENT_ID_PREFIX;
use crate::models::{AccountStatus, NewPatient, Patient, PatientUpdate};
use crate::store::{RecordStore, Stamp};
use crate::{RecordError, RecordResult};
use chrono::Utc;
use medchain_hash::NonceSource;
use medchain_types::{EmailAddress, NonEmptyText};

impl<N: NonceSource> RecordStore<N> {
    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.get(id)
    }

    pub fn patients_by_doctor(&self, doctor_id: &str) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| p.doctor_id == doctor_id)
            .collect()
    }

    /// Adds a patient under `doctor_id`.
    ///
    /// Missing optional fields default to an empty cellphone, no birth date, gender `OTHER`
    /// and an empty address.
    ///
    /// # Errors
    ///
    /// - [`RecordError::DoctorNotFound`] if `doctor_id` is unknown.
    /// - [`RecordError::Text`] if the name is blank or the email is malformed.
    pub fn add_patient(&mut self, doctor_id: &str, new: NewPatient) -> RecordResult<Patient> {
        self.insert_patient(Stamp::fresh(PATIENT_ID_PREFIX), doctor_id, new)
    }

    pub(crate) fn insert_patient(
        &mut self,
        stamp: Stamp,
        doctor_id: &str,
        new: NewPatient,
    ) -> RecordResult<Patient> {
        if !self.doctors.contains(doctor_id) {
            return Err(RecordError::DoctorNotFound(doctor_id.to_string()));
        }

        let patient = Patient {
            id: stamp.id,
            full_name: NonEmptyText::new(&new.full_name)?,
            email: EmailAddress::parse(&new.email)?,
            status: AccountStatus::Active,
            cellphone: new.cellphone.unwrap_or_default().trim().to_string(),
            birth_date: new.birth_date,
            gender: new.gender.unwrap_or_default(),
            address: new.address.unwrap_or_default(),
            doctor_id: doctor_id.to_string(),
            created_date: stamp.at,
            updated_date: stamp.at,
        };
        tracing::info!(patient_id = %patient.id, doctor_id, "patient added");
        self.patients.insert(patient).cloned()
    }

    /// Applies the fields present in `update` and refreshes `updated_date`.
    ///
    /// Validation happens before anything is written, so a rejected update leaves the patient
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`RecordError::PatientNotFound`] if `id` is unknown.
    /// - [`RecordError::Text`] if a provided name is blank or a provided email is malformed.
    pub fn update_patient(&mut self, id: &str, update: PatientUpdate) -> RecordResult<Patient> {
        let full_name = update.full_name.map(NonEmptyText::new).transpose()?;
        let email = update.email.map(EmailAddress::parse).transpose()?;

        let patient = self
            .patients
            .get_mut(id)
            .ok_or_else(|| RecordError::PatientNotFound(id.to_string()))?;

        if let Some(full_name) = full_name {
            patient.full_name = full_name;
        }
        if let Some(email) = email {
            patient.email = email;
        }
        if let Some(status) = update.status {
            patient.status = status;
        }
        if let Some(cellphone) = update.cellphone {
            patient.cellphone = cellphone.trim().to_string();
        }
        if let Some(birth_date) = update.birth_date {
            patient.birth_date = Some(birth_date);
        }
        if let Some(gender) = update.gender {
            patient.gender = gender;
        }
        if let Some(address) = update.address {
            patient.address = address;
        }
        patient.updated_date = Utc::now();

        tracing::info!(patient_id = id, "patient updated");
        Ok(patient.clone())
    }
}
