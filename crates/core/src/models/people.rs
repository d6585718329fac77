use chrono::{DateTime, NaiveDate, Utc};
use medchain_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Female,
    Male,
    #[default]
    Other,
}

/// Postal address. Every field is optional free text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// A registered doctor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Doctor {
    pub id: String,
    #[schema(value_type = String)]
    pub full_name: NonEmptyText,
    #[schema(value_type = String)]
    pub email: EmailAddress,
    pub status: AccountStatus,
    /// Professional council registration (CRM), e.g. `12345-SP`.
    pub crm: String,
    pub specialty: String,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// A patient under the care of one doctor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub id: String,
    #[schema(value_type = String)]
    pub full_name: NonEmptyText,
    #[schema(value_type = String)]
    pub email: EmailAddress,
    pub status: AccountStatus,
    pub cellphone: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub address: Address,
    pub doctor_id: String,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}
