use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::SignatureServiceError;
use crate::persistence::InMemorySignatureDeviceRepositoryProvider;
use crate::service::SignatureService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SignatureService<InMemorySignatureDeviceRepositoryProvider>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            service: Arc::new(SignatureService::new(
                InMemorySignatureDeviceRepositoryProvider::new(),
            )),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v0/health", get(health))
        .route(
            "/api/v0/signature_devices",
            post(create_signature_device).get(list_signature_devices),
        )
        .route("/api/v0/signature_devices/{device_id}", get(find_signature_device))
        .route(
            "/api/v0/signature_devices/{device_id}/signatures",
            post(sign_transaction),
        )
        .with_state(state)
}

pub async fn run(host: String, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, router(AppState::new())).await?;

    Ok(())
}

/// Success body shared by every endpoint.
#[derive(Serialize)]
struct ApiResponse<T> {
    data: T,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSignatureDeviceRequest {
    pub id: String,
    pub algorithm: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignTransactionRequest {
    pub data: String,
}

async fn health() -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthResponse {
            status: "pass",
            version: "v0",
        },
    })
}

async fn create_signature_device(
    State(state): State<AppState>,
    payload: Result<Json<CreateSignatureDeviceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, SignatureServiceError> {
    let Json(request) = payload.map_err(|_| SignatureServiceError::MalformedRequest)?;

    // Key generation is CPU-bound, keep it off the async workers.
    let service = state.service.clone();
    let projection = tokio::task::spawn_blocking(move || {
        service.create_device(&request.id, &request.algorithm, request.label)
    })
    .await
    .map_err(|err| SignatureServiceError::Internal(err.into()))??;

    Ok((StatusCode::CREATED, Json(ApiResponse { data: projection })))
}

async fn sign_transaction(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    payload: Result<Json<SignTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, SignatureServiceError> {
    let Json(request) = payload.map_err(|_| SignatureServiceError::MalformedRequest)?;

    let service = state.service.clone();
    let signed = tokio::task::spawn_blocking(move || {
        service.sign_transaction(&device_id, &request.data)
    })
    .await
    .map_err(|err| SignatureServiceError::Internal(err.into()))??;

    Ok(Json(ApiResponse { data: signed }))
}

async fn find_signature_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<impl IntoResponse, SignatureServiceError> {
    let projection = state.service.find_device(&device_id)?;
    Ok(Json(ApiResponse { data: projection }))
}

async fn list_signature_devices(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, SignatureServiceError> {
    let projections = state.service.list_devices()?;
    Ok(Json(ApiResponse { data: projections }))
}
