//! HTTP handlers.
//!
//! Each handler takes the store lock for one operation. Not-found errors become `404`,
//! validation errors `400` and duplicates `409`; see [`crate::store_error`].

use crate::{store_error, ApiResult, AppState, JsonBody};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use medchain_core::models::{
    Consultation, Diagnostic, Doctor, MedicalCertificate, MedicalRecord, NewCertificate,
    NewConsultation, NewDiagnostic, NewDoctor, NewFile, NewPatient, NewPrescription, Patient,
    PatientUpdate, Prescription, RecordFile,
};
use medchain_core::{AuditEntry, RecordError};
use medchain_hash::{decode_type_prefix, label_for_hash, HashType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewMedicalRecordReq {
    pub doctor_id: String,
    pub patient_id: String,
}

/// Decoded view of a stored audit hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HashInfoRes {
    pub hash: String,
    pub prefix: Option<String>,
    pub hash_type: Option<String>,
    pub label: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API.
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "MedChain REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/doctors",
    responses((status = 200, description = "All doctors", body = [Doctor]))
)]
#[axum::debug_handler]
pub async fn list_doctors(State(state): State<AppState>) -> ApiResult<Json<Vec<Doctor>>> {
    let store = state.read()?;
    Ok(Json(store.doctors().into_iter().cloned().collect()))
}

#[utoipa::path(
    post,
    path = "/doctors",
    request_body = NewDoctor,
    responses(
        (status = 201, description = "Doctor registered", body = Doctor),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register_doctor(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewDoctor>,
) -> ApiResult<(StatusCode, Json<Doctor>)> {
    let doctor = state.write()?.register_doctor(req).map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

#[utoipa::path(
    get,
    path = "/doctors/{id}",
    params(("id" = String, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor", body = Doctor),
        (status = 404, description = "Doctor not found")
    )
)]
#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Doctor>> {
    let store = state.read()?;
    store
        .doctor(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| store_error(RecordError::DoctorNotFound(id)))
}

#[utoipa::path(
    get,
    path = "/doctors/{id}/patients",
    params(("id" = String, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Patients managed by the doctor", body = [Patient]),
        (status = 404, description = "Doctor not found")
    )
)]
#[axum::debug_handler]
pub async fn list_doctor_patients(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Patient>>> {
    let store = state.read()?;
    if store.doctor(&id).is_none() {
        return Err(store_error(RecordError::DoctorNotFound(id)));
    }
    Ok(Json(
        store.patients_by_doctor(&id).into_iter().cloned().collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/doctors/{id}/patients",
    params(("id" = String, Path, description = "Doctor id")),
    request_body = NewPatient,
    responses(
        (status = 201, description = "Patient added", body = Patient),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Doctor not found")
    )
)]
#[axum::debug_handler]
pub async fn add_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<NewPatient>,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    let patient = state.write()?.add_patient(&id, req).map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    get,
    path = "/doctors/{id}/records",
    params(("id" = String, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Medical records opened by the doctor", body = [MedicalRecord]),
        (status = 404, description = "Doctor not found")
    )
)]
#[axum::debug_handler]
pub async fn list_doctor_records(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<MedicalRecord>>> {
    let store = state.read()?;
    if store.doctor(&id).is_none() {
        return Err(store_error(RecordError::DoctorNotFound(id)));
    }
    Ok(Json(
        store.records_by_doctor(&id).into_iter().cloned().collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient", body = Patient),
        (status = 404, description = "Patient not found")
    )
)]
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Patient>> {
    let store = state.read()?;
    store
        .patient(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| store_error(RecordError::PatientNotFound(id)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Patient not found")
    )
)]
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<PatientUpdate>,
) -> ApiResult<Json<Patient>> {
    let patient = state
        .write()?
        .update_patient(&id, req)
        .map_err(store_error)?;
    Ok(Json(patient))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/records",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient's medical records", body = [MedicalRecord]),
        (status = 404, description = "Patient not found")
    )
)]
#[axum::debug_handler]
pub async fn list_patient_records(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<MedicalRecord>>> {
    let store = state.read()?;
    if store.patient(&id).is_none() {
        return Err(store_error(RecordError::PatientNotFound(id)));
    }
    Ok(Json(
        store.records_by_patient(&id).into_iter().cloned().collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/records",
    request_body = NewMedicalRecordReq,
    responses(
        (status = 201, description = "Medical record opened", body = MedicalRecord),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "Doctor or patient not found")
    )
)]
#[axum::debug_handler]
pub async fn create_record(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewMedicalRecordReq>,
) -> ApiResult<(StatusCode, Json<MedicalRecord>)> {
    let record = state
        .write()?
        .add_medical_record(&req.doctor_id, &req.patient_id)
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/records/{id}",
    params(("id" = String, Path, description = "Medical record id")),
    responses(
        (status = 200, description = "Medical record", body = MedicalRecord),
        (status = 404, description = "Medical record not found")
    )
)]
#[axum::debug_handler]
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MedicalRecord>> {
    let store = state.read()?;
    store
        .record(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| store_error(RecordError::MedicalRecordNotFound(id)))
}

#[utoipa::path(
    get,
    path = "/records/{id}/audit",
    params(("id" = String, Path, description = "Medical record id")),
    responses(
        (status = 200, description = "Audit trail of every hashed item", body = [AuditEntry]),
        (status = 404, description = "Medical record not found")
    )
)]
#[axum::debug_handler]
pub async fn get_audit_trail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<AuditEntry>>> {
    let trail = state.read()?.audit_trail(&id).map_err(store_error)?;
    Ok(Json(trail))
}

#[utoipa::path(
    post,
    path = "/records/{id}/consultations",
    params(("id" = String, Path, description = "Medical record id")),
    request_body = NewConsultation,
    responses(
        (status = 201, description = "Consultation added", body = Consultation),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Medical record not found")
    )
)]
#[axum::debug_handler]
pub async fn add_consultation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<NewConsultation>,
) -> ApiResult<(StatusCode, Json<Consultation>)> {
    let consultation = state
        .write()?
        .add_consultation(&id, req)
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(consultation)))
}

#[utoipa::path(
    post,
    path = "/records/{id}/consultations/{consultation_id}/prescriptions",
    params(
        ("id" = String, Path, description = "Medical record id"),
        ("consultation_id" = String, Path, description = "Consultation id")
    ),
    request_body = NewPrescription,
    responses(
        (status = 201, description = "Prescription added", body = Prescription),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "Medical record or consultation not found")
    )
)]
#[axum::debug_handler]
pub async fn add_prescription(
    State(state): State<AppState>,
    Path((id, consultation_id)): Path<(String, String)>,
    JsonBody(req): JsonBody<NewPrescription>,
) -> ApiResult<(StatusCode, Json<Prescription>)> {
    let prescription = state
        .write()?
        .add_prescription(&id, &consultation_id, req)
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(prescription)))
}

#[utoipa::path(
    post,
    path = "/records/{id}/diagnostics",
    params(("id" = String, Path, description = "Medical record id")),
    request_body = NewDiagnostic,
    responses(
        (status = 201, description = "Diagnostic added", body = Diagnostic),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Medical record not found")
    )
)]
#[axum::debug_handler]
pub async fn add_diagnostic(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<NewDiagnostic>,
) -> ApiResult<(StatusCode, Json<Diagnostic>)> {
    let diagnostic = state
        .write()?
        .add_diagnostic(&id, req)
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(diagnostic)))
}

#[utoipa::path(
    post,
    path = "/records/{id}/certificates",
    params(("id" = String, Path, description = "Medical record id")),
    request_body = NewCertificate,
    responses(
        (status = 201, description = "Certificate added", body = MedicalCertificate),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Medical record not found")
    )
)]
#[axum::debug_handler]
pub async fn add_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<NewCertificate>,
) -> ApiResult<(StatusCode, Json<MedicalCertificate>)> {
    let certificate = state
        .write()?
        .add_medical_certificate(&id, req)
        .map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

#[utoipa::path(
    post,
    path = "/records/{id}/files",
    params(("id" = String, Path, description = "Medical record id")),
    request_body = NewFile,
    responses(
        (status = 201, description = "File attached", body = RecordFile),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "Medical record not found")
    )
)]
#[axum::debug_handler]
pub async fn add_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<NewFile>,
) -> ApiResult<(StatusCode, Json<RecordFile>)> {
    let file = state.write()?.add_file(&id, req).map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(file)))
}

#[utoipa::path(
    get,
    path = "/hashes/{hash}",
    params(("hash" = String, Path, description = "Stored audit hash")),
    responses((status = 200, description = "Decoded hash prefix and label", body = HashInfoRes))
)]
/// Decodes any string as an audit hash. Unknown or malformed hashes still return `200` with
/// no prefix and the generic label.
#[axum::debug_handler]
pub async fn decode_hash(Path(hash): Path<String>) -> Json<HashInfoRes> {
    let prefix = decode_type_prefix(&hash).map(str::to_owned);
    let hash_type = prefix
        .as_deref()
        .and_then(HashType::from_prefix)
        .map(|t| t.tag().to_string());
    let label = label_for_hash(&hash).to_string();

    Json(HashInfoRes {
        hash,
        prefix,
        hash_type,
        label,
    })
}

#[cfg(test)]
mod tests {
    use crate::{router, AppState};
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use medchain_core::{CoreConfig, RecordStore};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = RecordStore::new(Arc::new(CoreConfig::default())).unwrap();
        router(AppState::new(store))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn seeded_record_is_served_with_hashes() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/records/mr-1", None).await;
        assert_eq!(status, StatusCode::OK);

        let hash = body["hash"].as_str().unwrap();
        assert!(hash.starts_with("mr-"));
        assert!(body["consultations"][0]["hash"]
            .as_str()
            .unwrap()
            .starts_with("con-"));
    }

    #[tokio::test]
    async fn unknown_ids_are_404() {
        let app = app();
        for uri in [
            "/records/mr-404",
            "/records/mr-404/audit",
            "/patients/pat-404",
            "/patients/pat-404/records",
            "/doctors/doc-404",
            "/doctors/doc-404/patients",
            "/doctors/doc-404/records",
        ] {
            let (status, _) = call(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }

        let (status, _) = call(
            &app,
            Method::POST,
            "/records/mr-404/files",
            Some(json!({"description": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn known_owner_without_items_lists_empty() {
        let app = app();
        let (status, records) = call(&app, Method::GET, "/doctors/doc-2/records", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(records, json!([]));
    }

    #[tokio::test]
    async fn consultation_then_file_end_to_end() {
        let app = app();

        let (status, consultation) = call(
            &app,
            Method::POST,
            "/records/mr-2/consultations",
            Some(json!({
                "chief_complaint": "Headache",
                "diagnosis": "Tension headache",
                "prescription_items": [{"medication_name": "Paracetamol 750mg"}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let con_hash = consultation["hash"].as_str().unwrap().to_string();
        assert!(con_hash.starts_with("con-"));
        assert!(consultation["prescriptions"][0]["hash"]
            .as_str()
            .unwrap()
            .starts_with("pre-"));

        let (status, file) = call(
            &app,
            Method::POST,
            "/records/mr-2/files",
            Some(json!({"description": "Blood test", "format": "PDF"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let file_hash = file["hash"].as_str().unwrap().to_string();

        let (_, decoded) = call(&app, Method::GET, &format!("/hashes/{con_hash}"), None).await;
        assert_eq!(decoded["prefix"], "con");
        assert_eq!(decoded["label"], "Consulta");

        let (_, decoded) = call(&app, Method::GET, &format!("/hashes/{file_hash}"), None).await;
        assert_eq!(decoded["prefix"], "file");
        assert_eq!(decoded["hash_type"], "FILE");
        assert_eq!(decoded["label"], "Arquivo");

        let (_, trail) = call(&app, Method::GET, "/records/mr-2/audit", None).await;
        assert_eq!(trail.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn malformed_hash_decodes_to_generic_label() {
        let app = app();
        let (status, decoded) = call(&app, Method::GET, "/hashes/NOPE", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decoded["prefix"], Value::Null);
        assert_eq!(decoded["label"], "Registro");
    }

    #[tokio::test]
    async fn validation_errors_are_400() {
        let app = app();
        let (status, _) = call(
            &app,
            Method::POST,
            "/records/mr-1/certificates",
            Some(json!({"purpose": "Repouso", "period_of_leave": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            Method::POST,
            "/doctors/doc-1/patients",
            Some(json!({"full_name": "  ", "email": "x@y.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_or_mistyped_fields_are_400() {
        let app = app();
        let cases = [
            (
                "/records/mr-1/consultations",
                json!({"chief_complaint": "Headache"}),
            ),
            ("/records/mr-1/diagnostics", json!({"result": "ok"})),
            (
                "/records/mr-1/certificates",
                json!({"purpose": "Repouso", "period_of_leave": -2}),
            ),
            ("/records/mr-1/certificates", json!({"purpose": "Repouso"})),
            ("/doctors", json!({"email": "novo@medchain.com"})),
        ];
        for (uri, body) in cases {
            let (status, _) = call(&app, Method::POST, uri, Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}");
        }

        let (status, record) = call(&app, Method::GET, "/records/mr-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["consultations"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unparseable_body_is_400() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/records/mr-1/files")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn duplicate_doctor_email_is_409() {
        let app = app();
        let (status, _) = call(
            &app,
            Method::POST,
            "/doctors",
            Some(json!({
                "full_name": "Dr. Maria Silva",
                "email": "maria.silva@medchain.com",
                "crm": "12345-SP"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn patient_flow() {
        let app = app();
        let (status, patient) = call(
            &app,
            Method::POST,
            "/doctors/doc-2/patients",
            Some(json!({"full_name": "Beatriz Lima", "email": "bia@email.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let patient_id = patient["id"].as_str().unwrap().to_string();

        let (status, updated) = call(
            &app,
            Method::PUT,
            &format!("/patients/{patient_id}"),
            Some(json!({"cellphone": "(11) 90000-0000"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["cellphone"], "(11) 90000-0000");
        assert_eq!(updated["full_name"], "Beatriz Lima");

        let (status, record) = call(
            &app,
            Method::POST,
            "/records",
            Some(json!({"doctor_id": "doc-2", "patient_id": patient_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(record["hash"].as_str().unwrap().starts_with("mr-"));

        let (_, records) = call(
            &app,
            Method::GET,
            &format!("/patients/{patient_id}/records"),
            None,
        )
        .await;
        assert_eq!(records.as_array().unwrap().len(), 1);

        let (_, patients) = call(&app, Method::GET, "/doctors/doc-2/patients", None).await;
        assert_eq!(patients.as_array().unwrap().len(), 1);
    }
}
