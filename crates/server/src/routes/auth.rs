use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Successful registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub identity_ref: String,
    pub created_at: DateTime<Utc>,
    pub photo_path: String,
}

/// Successful verification response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub identity_ref: String,
    pub distance: f64,
}

/// Session introspection response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub identity_ref: String,
}

/// The uploaded photo: raw bytes plus the original filename's extension.
struct PhotoUpload {
    bytes: Vec<u8>,
    extension: String,
}

/// Pull the photo out of the multipart payload.
///
/// Accepts the first field named `photo`; the content type, when present,
/// must be `image/*` as in the original upload contract.
async fn read_photo(mut multipart: Multipart) -> ServerResult<PhotoUpload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("photo") {
            continue;
        }

        if let Some(content_type) = field.content_type() {
            if !content_type.starts_with("image/") {
                return Err(ServerError::BadRequest("File must be an image".into()));
            }
        }

        let extension = field
            .file_name()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_else(|| ".jpg".to_string());

        let bytes = field.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(ServerError::BadRequest("Uploaded photo is empty".into()));
        }

        return Ok(PhotoUpload { bytes, extension });
    }

    Err(ServerError::BadRequest(
        "Missing multipart field 'photo'".into(),
    ))
}

/// Persist the uploaded photo under a unique filename.
async fn save_photo(upload_dir: &str, upload: &PhotoUpload) -> ServerResult<PathBuf> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let file_path = Path::new(upload_dir).join(format!("{}{}", Uuid::new_v4(), upload.extension));
    tokio::fs::write(&file_path, &upload.bytes).await?;
    Ok(file_path)
}

/// Register a new identity from an uploaded photo.
///
/// The photo is stored first; when extraction finds no face the file is
/// removed again and the request fails with `NO_FACE_DETECTED`. Only the
/// first detected face is enrolled.
pub async fn register(
    State(state): State<Arc<ServerState>>,
    multipart: Multipart,
) -> ServerResult<impl IntoResponse> {
    let upload = read_photo(multipart).await?;
    let file_path = save_photo(&state.config.upload_dir, &upload).await?;

    let identity_ref = Uuid::new_v4().to_string();
    let metadata = json!({ "photo_path": file_path.to_string_lossy() });

    // Extraction and the store write are synchronous CPU/disk work; keep
    // them off the async worker threads.
    let enroll_state = state.clone();
    let enroll_id = identity_ref.clone();
    let result = tokio::task::spawn_blocking(move || {
        facegate::enroll_image(
            &upload.bytes,
            &enroll_id,
            enroll_state.extractor.as_ref(),
            &enroll_state.store,
            metadata,
        )
    })
    .await
    .map_err(|e| ServerError::Internal(format!("enrollment task failed: {e}")))?;

    let record = match result {
        Ok(record) => record,
        Err(err) => {
            // Keep the upload dir consistent with the store.
            let _ = tokio::fs::remove_file(&file_path).await;
            return Err(err.into());
        }
    };

    tracing::info!(identity_ref = %record.identity_ref, "registration complete");

    Ok(Json(RegisterResponse {
        identity_ref: record.identity_ref,
        created_at: record.created_at,
        photo_path: file_path.to_string_lossy().into_owned(),
    }))
}

/// Verify an uploaded photo against the enrollment store.
///
/// A match yields a bearer session token; no match is a 401, not a 500 —
/// rejection is the defined negative outcome of verification.
pub async fn login(
    State(state): State<Arc<ServerState>>,
    multipart: Multipart,
) -> ServerResult<impl IntoResponse> {
    let upload = read_photo(multipart).await?;

    let verify_state = state.clone();
    let verify_config = state.config.verify_config();
    let result = tokio::task::spawn_blocking(move || {
        facegate::verify_image(
            &upload.bytes,
            verify_state.extractor.as_ref(),
            &verify_state.matcher,
            verify_config,
        )
    })
    .await
    .map_err(|e| ServerError::Internal(format!("verification task failed: {e}")))??;

    if !result.matched {
        tracing::info!("verification rejected: no enrolled identity within tolerance");
        return Err(ServerError::VerificationFailed);
    }

    // matched == true guarantees both fields are present.
    let identity_ref = result
        .identity_ref
        .ok_or_else(|| ServerError::Internal("matched result without identity".into()))?;
    let distance = result
        .distance
        .ok_or_else(|| ServerError::Internal("matched result without distance".into()))?;

    let access_token = state.tokens.issue(&identity_ref);
    tracing::info!(identity_ref = %identity_ref, distance, "verification accepted");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
        identity_ref,
        distance,
    }))
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(headers: &HeaderMap) -> ServerResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ServerError::InvalidToken)
}

/// Resolve the current session token to its identity.
pub async fn session(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> ServerResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    let identity_ref = state
        .tokens
        .validate(token)
        .ok_or(ServerError::InvalidToken)?;

    Ok(Json(SessionResponse { identity_ref }))
}

/// Invalidate the current session token.
pub async fn logout(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> ServerResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    state.tokens.revoke(token);
    Ok(StatusCode::NO_CONTENT)
}
