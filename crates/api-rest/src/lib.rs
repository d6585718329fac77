//! # API REST
//!
//! REST API implementation for MedChain.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status codes, CORS)
//!
//! All data operations go through [`medchain_core::RecordStore`]; this crate only maps them to
//! HTTP.

#![warn(rust_2018_idioms)]

pub mod handlers;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use medchain_core::{RecordError, RecordStore};
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Error half of every handler result.
pub type ApiError = (StatusCode, String);
pub type ApiResult<T> = Result<T, ApiError>;

/// Application state shared across REST API handlers.
///
/// The store is a single-owner value; handlers take the lock for exactly one store operation.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<RecordStore>>,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub(crate) fn read(&self) -> ApiResult<RwLockReadGuard<'_, RecordStore>> {
        self.store.read().map_err(|_| poisoned())
    }

    pub(crate) fn write(&self) -> ApiResult<RwLockWriteGuard<'_, RecordStore>> {
        self.store.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> ApiError {
    tracing::error!("record store lock poisoned");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal error".to_string(),
    )
}

/// Maps a store error to an HTTP status, logging it.
pub(crate) fn store_error(e: RecordError) -> ApiError {
    let status = match &e {
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        RecordError::DuplicateId(_) | RecordError::DuplicateEmail(_) => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    tracing::warn!("request rejected ({}): {}", status, e);
    (status, e.to_string())
}

/// JSON request body whose rejections are reported as `400`, the same status the store uses
/// for invalid input.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                tracing::warn!("request body rejected: {}", message);
                Err((StatusCode::BAD_REQUEST, message))
            }
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_doctors,
        handlers::get_doctor,
        handlers::register_doctor,
        handlers::list_doctor_patients,
        handlers::add_patient,
        handlers::list_doctor_records,
        handlers::get_patient,
        handlers::update_patient,
        handlers::list_patient_records,
        handlers::create_record,
        handlers::get_record,
        handlers::get_audit_trail,
        handlers::add_consultation,
        handlers::add_prescription,
        handlers::add_diagnostic,
        handlers::add_certificate,
        handlers::add_file,
        handlers::decode_hash,
    ),
    components(schemas(
        handlers::HealthRes,
        handlers::NewMedicalRecordReq,
        handlers::HashInfoRes,
        medchain_core::models::Doctor,
        medchain_core::models::Patient,
        medchain_core::models::Address,
        medchain_core::models::Gender,
        medchain_core::models::AccountStatus,
        medchain_core::models::MedicalRecord,
        medchain_core::models::Consultation,
        medchain_core::models::Prescription,
        medchain_core::models::PrescriptionItem,
        medchain_core::models::Diagnostic,
        medchain_core::models::MedicalCertificate,
        medchain_core::models::RecordFile,
        medchain_core::models::NewDoctor,
        medchain_core::models::NewPatient,
        medchain_core::models::PatientUpdate,
        medchain_core::models::NewConsultation,
        medchain_core::models::NewPrescription,
        medchain_core::models::NewDiagnostic,
        medchain_core::models::NewCertificate,
        medchain_core::models::NewFile,
        medchain_core::AuditEntry,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI mounted at `/swagger-ui`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/doctors",
            get(handlers::list_doctors).post(handlers::register_doctor),
        )
        .route("/doctors/:id", get(handlers::get_doctor))
        .route(
            "/doctors/:id/patients",
            get(handlers::list_doctor_patients).post(handlers::add_patient),
        )
        .route("/doctors/:id/records", get(handlers::list_doctor_records))
        .route(
            "/patients/:id",
            get(handlers::get_patient).put(handlers::update_patient),
        )
        .route("/patients/:id/records", get(handlers::list_patient_records))
        .route("/records", post(handlers::create_record))
        .route("/records/:id", get(handlers::get_record))
        .route("/records/:id/audit", get(handlers::get_audit_trail))
        .route(
            "/records/:id/consultations",
            post(handlers::add_consultation),
        )
        .route(
            "/records/:id/consultations/:consultation_id/prescriptions",
            post(handlers::add_prescription),
        )
        .route("/records/:id/diagnostics", post(handlers::add_diagnostic))
        .route("/records/:id/certificates", post(handlers::add_certificate))
        .route("/records/:id/files", post(handlers::add_file))
        .route("/hashes/:hash", get(handlers::decode_hash))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
