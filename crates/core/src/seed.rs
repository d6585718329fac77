//! Demo dataset.
//!
//! Two doctors, two patients and two medical records with a few clinical items. Everything is
//! inserted through the normal store operations, so seeded items carry real audit hashes. Ids
//! are the short fixed ones (`doc-1`, `pat-1`, `mr-1`, ...) and timestamps are relative to the
//! moment of seeding.

use crate::models::{
    Address, Gender, NewCertificate, NewConsultation, NewDiagnostic, NewDoctor, NewFile,
    NewPatient, NewPrescription, PrescriptionItem,
};
use crate::store::{RecordStore, Stamp};
use crate::RecordResult;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use medchain_hash::NonceSource;

fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

/// Loads the demo dataset into `store`.
///
/// # Errors
///
/// Fails with [`RecordError::DuplicateId`](crate::RecordError::DuplicateId) or
/// [`RecordError::DuplicateEmail`](crate::RecordError::DuplicateEmail) if the store already
/// holds demo entries.
pub fn load_demo_data<N: NonceSource>(store: &mut RecordStore<N>) -> RecordResult<()> {
    let now = Utc::now();

    store.insert_doctor(
        Stamp::fixed("doc-1", days_ago(now, 365)),
        NewDoctor {
            full_name: "Dr. Maria Silva".into(),
            email: "maria.silva@medchain.com".into(),
            crm: "12345-SP".into(),
            specialty: "Clínica Geral".into(),
        },
    )?;
    store.insert_doctor(
        Stamp::fixed("doc-2", days_ago(now, 200)),
        NewDoctor {
            full_name: "Dr. João Santos".into(),
            email: "joao.santos@medchain.com".into(),
            crm: "67890-SP".into(),
            specialty: "Cardiologia".into(),
        },
    )?;

    store.insert_patient(
        Stamp::fixed("pat-1", days_ago(now, 180)),
        "doc-1",
        NewPatient {
            full_name: "Ana Oliveira".into(),
            email: "ana.oliveira@email.com".into(),
            cellphone: Some("(11) 98765-4321".into()),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 15),
            gender: Some(Gender::Female),
            address: Some(Address {
                street: "Rua das Flores".into(),
                number: "123".into(),
                complement: "Apto 45".into(),
                neighborhood: "Centro".into(),
                city: "São Paulo".into(),
                state: "SP".into(),
            }),
        },
    )?;
    store.insert_patient(
        Stamp::fixed("pat-2", days_ago(now, 90)),
        "doc-1",
        NewPatient {
            full_name: "Carlos Mendes".into(),
            email: "carlos.mendes@email.com".into(),
            cellphone: Some("(11) 91234-5678".into()),
            birth_date: NaiveDate::from_ymd_opt(1985, 11, 20),
            gender: Some(Gender::Male),
            address: Some(Address {
                street: "Av. Paulista".into(),
                number: "1000".into(),
                complement: String::new(),
                neighborhood: "Bela Vista".into(),
                city: "São Paulo".into(),
                state: "SP".into(),
            }),
        },
    )?;

    // mr-1: Ana, headache follow-up with one of each item.
    store.insert_medical_record(Stamp::fixed("mr-1", days_ago(now, 60)), "doc-1", "pat-1")?;
    store.insert_consultation(
        "mr-1",
        Stamp::fixed("cons-1", days_ago(now, 60)),
        NewConsultation {
            chief_complaint: "Dor de cabeça persistente".into(),
            history_of_present_illness: "Paciente relata cefaleia há 5 dias, piorando pela manhã."
                .into(),
            diagnosis: "Cefaleia tensional".into(),
            treatment_plan: "Repouso, hidratação e analgésicos sob demanda".into(),
            prescription_items: Vec::new(),
        },
    )?;
    store.insert_prescription(
        "mr-1",
        "cons-1",
        Stamp::fixed("presc-1", days_ago(now, 60)),
        NewPrescription {
            issue_date: Some(days_ago(now, 60)),
            items: vec![PrescriptionItem {
                medication_name: "Paracetamol 750mg".into(),
                dosage: "1 comprimido".into(),
                frequency: "8/8h".into(),
                treatment_duration: "5 dias".into(),
            }],
        },
    )?;
    store.insert_diagnostic(
        "mr-1",
        Stamp::fixed("diag-1", days_ago(now, 55)),
        NewDiagnostic {
            description: "Exame de sangue - Hemograma completo".into(),
            issue_date: Some(days_ago(now, 55)),
            result: "Resultados dentro da normalidade".into(),
        },
    )?;
    store.insert_medical_certificate(
        "mr-1",
        Stamp::fixed("cert-1", days_ago(now, 58)),
        NewCertificate {
            purpose: "Afastamento laboral".into(),
            period_of_leave: 3,
        },
    )?;
    store.insert_file(
        "mr-1",
        Stamp::fixed("file-1", days_ago(now, 55)),
        NewFile {
            url: Some("/documents/exame.pdf".into()),
            format: Some("PDF".into()),
            description: Some("Resultado hemograma".into()),
        },
    )?;

    // mr-2: Carlos, routine check-up.
    store.insert_medical_record(Stamp::fixed("mr-2", days_ago(now, 30)), "doc-1", "pat-2")?;
    store.insert_consultation(
        "mr-2",
        Stamp::fixed("cons-2", days_ago(now, 30)),
        NewConsultation {
            chief_complaint: "Check-up anual".into(),
            history_of_present_illness: "Paciente assintomático para check-up de rotina.".into(),
            diagnosis: "Paciente saudável".into(),
            treatment_plan: "Manter hábitos saudáveis".into(),
            prescription_items: Vec::new(),
        },
    )?;

    // Seeded appends stamp updated_date with their own (older) timestamps; align each record
    // with its newest item.
    for id in ["mr-1", "mr-2"] {
        if let Some(record) = store.records.get_mut(id) {
            let newest = crate::audit::audit_trail(record)
                .into_iter()
                .map(|e| e.created_date)
                .max()
                .unwrap_or(record.created_date);
            record.updated_date = newest;
        }
    }

    tracing::info!(
        doctors = store.doctors.len(),
        patients = store.patients.len(),
        records = store.records.len(),
        "demo data loaded"
    );
    Ok(())
}
