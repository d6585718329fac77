//! Doctor operations.

use crate::constants::DOCTOR_ID_PREFIX;
use crate::models::{AccountStatus, Doctor, NewDoctor};
use crate::store::{RecordStore, Stamp};
use crate::{RecordError, RecordResult};
use medchain_hash::NonceSource;
use medchain_types::{EmailAddress, NonEmptyText};

impl<N: NonceSource> RecordStore<N> {
    pub fn doctor(&self, id: &str) -> Option<&Doctor> {
        self.doctors.get(id)
    }

    pub fn doctors(&self) -> Vec<&Doctor> {
        self.doctors.iter().collect()
    }

    pub fn doctor_by_email(&self, email: &str) -> Option<&Doctor> {
        let email = EmailAddress::parse(email).ok()?;
        self.doctors.iter().find(|d| d.email == email)
    }

    /// Registers a new doctor.
    ///
    /// # Errors
    ///
    /// - [`RecordError::Text`] if the name, email or CRM is blank or the email is malformed.
    /// - [`RecordError::DuplicateEmail`] if another doctor already uses the email.
    pub fn register_doctor(&mut self, new: NewDoctor) -> RecordResult<Doctor> {
        self.insert_doctor(Stamp::fresh(DOCTOR_ID_PREFIX), new)
    }

    pub(crate) fn insert_doctor(&mut self, stamp: Stamp, new: NewDoctor) -> RecordResult<Doctor> {
        let full_name = NonEmptyText::new(&new.full_name)?;
        let email = EmailAddress::parse(&new.email)?;
        let crm = NonEmptyText::new(&new.crm)?;

        if self.doctors.iter().any(|d| d.email == email) {
            return Err(RecordError::DuplicateEmail(email.to_string()));
        }

        let doctor = Doctor {
            id: stamp.id,
            full_name,
            email,
            status: AccountStatus::Active,
            crm: crm.into_inner(),
            specialty: new.specialty.trim().to_string(),
            created_date: stamp.at,
            updated_date: stamp.at,
        };
        tracing::info!(doctor_id = %doctor.id, "doctor registered");
        self.doctors.insert(doctor).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreConfig;
    use std::sync::Arc;

    fn store() -> RecordStore {
        RecordStore::empty(Arc::new(CoreConfig::default()))
    }

    fn new_doctor(email: &str) -> NewDoctor {
        NewDoctor {
            full_name: "Dr. Maria Silva".into(),
            email: email.into(),
            crm: "12345-SP".into(),
            specialty: "Clínica Geral".into(),
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut store = store();
        let doctor = store.register_doctor(new_doctor("maria@medchain.com")).unwrap();

        assert!(doctor.id.starts_with("doc-"));
        assert_eq!(doctor.status, AccountStatus::Active);
        assert_eq!(store.doctor(&doctor.id), Some(&doctor));
        assert_eq!(
            store.doctor_by_email("MARIA@medchain.com").map(|d| &d.id),
            Some(&doctor.id)
        );
        assert_eq!(store.doctors().len(), 1);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let mut store = store();
        store.register_doctor(new_doctor("maria@medchain.com")).unwrap();

        let err = store
            .register_doctor(new_doctor("Maria@MedChain.com"))
            .unwrap_err();
        assert!(matches!(err, RecordError::DuplicateEmail(_)));
        assert_eq!(store.doctors().len(), 1);
    }

    #[test]
    fn blank_crm_is_rejected() {
        let mut store = store();
        let mut new = new_doctor("joao@medchain.com");
        new.crm = "  ".into();

        assert!(matches!(
            store.register_doctor(new),
            Err(RecordError::Text(_))
        ));
    }

    #[test]
    fn unknown_doctor_is_none() {
        let store = store();
        assert!(store.doctor("doc-404").is_none());
        assert!(store.doctor_by_email("not an email").is_none());
    }
}
