//! Request shapes for store operations.
//!
//! Optional fields fall back to the defaults the store documents per operation. Text that a
//! form marks as required is validated by the store, not here.

use super::clinical::PrescriptionItem;
use super::people::{AccountStatus, Address, Gender};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Doctor self-registration. Credentials are handled outside the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NewDoctor {
    pub full_name: String,
    pub email: String,
    pub crm: String,
    #[serde(default)]
    pub specialty: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NewPatient {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub cellphone: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Partial update of a patient. `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PatientUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub status: Option<AccountStatus>,
    pub cellphone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub address: Option<Address>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NewConsultation {
    pub chief_complaint: String,
    #[serde(default)]
    pub history_of_present_illness: String,
    pub diagnosis: String,
    #[serde(default)]
    pub treatment_plan: String,
    /// Items for a first prescription issued with the consultation. Lines without a
    /// medication name are dropped; if none remain no prescription is created.
    #[serde(default)]
    pub prescription_items: Vec<PrescriptionItem>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NewDiagnostic {
    pub description: String,
    /// Defaults to the creation time.
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NewPrescription {
    /// Defaults to the creation time.
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<PrescriptionItem>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NewCertificate {
    pub purpose: String,
    pub period_of_leave: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct NewFile {
    pub url: Option<String>,
    pub format: Option<String>,
    pub description: Option<String>,
}
