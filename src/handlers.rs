use crate::aggregator::aggregate;
use crate::composer::{MessageComposer, MessageSource};
use crate::config::Config;
use crate::errors::AppError;
use crate::ingestion::ingest_csv;
use crate::lead_store::LeadStore;
use crate::models::*;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use moka::future::Cache;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Multipart field carrying the CSV file.
pub const UPLOAD_FIELD: &str = "file";

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (scoring rules included).
    pub config: Config,
    /// Where scored leads live.
    pub store: Arc<dyn LeadStore>,
    /// Drafts follow-up messages for lead detail requests.
    pub composer: MessageComposer,
    /// Generated messages per lead id. `None` when caching is disabled.
    /// Template fallbacks are never cached.
    pub message_cache: Option<Cache<Uuid, AIMessages>>,
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "lead-quality-engine",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/leads/upload
///
/// Accepts a multipart form with a CSV file in the `file` field, scores every
/// row and stores the resulting leads. A single invalid row rejects the
/// whole upload.
///
/// # Returns
///
/// * `Result<Json<UploadResponse>, AppError>` - Number of stored leads or a 400.
pub async fn upload_leads(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut contents = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            contents = Some(bytes);
            break;
        }
    }

    let contents = contents.ok_or_else(|| {
        AppError::BadRequest(format!("Missing '{}' field in upload", UPLOAD_FIELD))
    })?;
    tracing::info!("POST /leads/upload - {} bytes", contents.len());

    let leads = ingest_csv(&contents, &state.config.scoring).map_err(|e| {
        tracing::warn!("Rejected lead upload: {}", e);
        AppError::BadRequest(e.to_string())
    })?;

    state.store.insert_many(&leads).await?;

    let count = leads.len();
    tracing::info!("Uploaded {} lead(s)", count);

    Ok(Json(UploadResponse {
        success: true,
        count,
        message: format!("Successfully uploaded {} leads", count),
    }))
}

/// GET /api/leads
///
/// Lists every lead, highest score first.
pub async fn list_leads(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Lead>>, AppError> {
    let leads = state.store.list_all().await?;
    tracing::debug!("GET /leads - {} lead(s)", leads.len());
    Ok(Json(leads))
}

/// GET /api/leads/:id
///
/// Returns the lead together with drafted follow-up messages. Message
/// generation never fails the request; only an unknown id does.
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LeadWithMessages>, AppError> {
    tracing::info!("GET /leads/{}", id);

    let not_found = || AppError::NotFound("Lead not found".to_string());
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let lead = state.store.get(id).await?.ok_or_else(not_found)?;

    let ai_messages = compose_for(&state, &lead).await;

    Ok(Json(LeadWithMessages { lead, ai_messages }))
}

/// Cached messages if present, otherwise a fresh composition.
async fn compose_for(state: &AppState, lead: &Lead) -> AIMessages {
    if let Some(ref cache) = state.message_cache {
        if let Some(cached) = cache.get(&lead.id).await {
            tracing::debug!("Message cache HIT for lead {}", lead.id);
            return cached;
        }
    }

    let composed = state.composer.compose_detailed(lead).await;

    if composed.source == MessageSource::Generated {
        if let Some(ref cache) = state.message_cache {
            cache.insert(lead.id, composed.messages.clone()).await;
        }
    }

    composed.messages
}

/// GET /api/dashboard
///
/// Aggregated counts per category and source, plus the busiest time of day.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, AppError> {
    let leads = state.store.list_all().await?;
    Ok(Json(aggregate(&leads)))
}

/// DELETE /api/leads
///
/// Removes every lead and drops cached messages.
pub async fn delete_all_leads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted_count = state.store.delete_all().await?;

    if let Some(ref cache) = state.message_cache {
        cache.invalidate_all();
    }

    tracing::info!("Deleted {} lead(s)", deleted_count);
    Ok(Json(DeleteResponse {
        success: true,
        deleted_count,
    }))
}
