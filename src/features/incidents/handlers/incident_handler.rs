use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath, OwnerHeader};
use crate::features::incidents::dtos::{IncidentInputDto, IncidentResponseDto};
use crate::features::incidents::services::IncidentService;
use crate::shared::types::ErrorResponse;

/// List all incidents, newest first
#[utoipa::path(
    get,
    path = "/api/incidents",
    responses(
        (status = 200, description = "Incidents retrieved successfully", body = Vec<IncidentResponseDto>),
        (status = 503, description = "Store did not answer in time", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn list_incidents(
    State(service): State<Arc<IncidentService>>,
) -> Result<Json<Vec<IncidentResponseDto>>> {
    let incidents = service.list().await?;
    Ok(Json(incidents))
}

/// Report a new incident
///
/// Requires the `X-Owner-Id` header; the token becomes the incident owner.
#[utoipa::path(
    post,
    path = "/api/incidents",
    params(
        ("X-Owner-Id" = String, Header, description = "Opaque owner token of the reporter")
    ),
    request_body = IncidentInputDto,
    responses(
        (status = 201, description = "Incident created successfully", body = IncidentResponseDto),
        (status = 400, description = "Validation error or missing owner header", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn create_incident(
    State(service): State<Arc<IncidentService>>,
    OwnerHeader(owner): OwnerHeader,
    AppJson(dto): AppJson<IncidentInputDto>,
) -> Result<(StatusCode, Json<IncidentResponseDto>)> {
    let incident = service.create(owner.as_deref(), dto).await?;
    Ok((StatusCode::CREATED, Json(incident)))
}

/// Update title, description, category and status of an incident
#[utoipa::path(
    put,
    path = "/api/incidents/{id}",
    params(
        ("id" = i64, Path, description = "Incident ID")
    ),
    request_body = IncidentInputDto,
    responses(
        (status = 200, description = "Incident updated successfully", body = IncidentResponseDto),
        (status = 400, description = "Validation error or invalid id", body = ErrorResponse),
        (status = 404, description = "Incident not found", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn update_incident(
    State(service): State<Arc<IncidentService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<IncidentInputDto>,
) -> Result<Json<IncidentResponseDto>> {
    let incident = service.update(id, dto).await?;
    Ok(Json(incident))
}

/// Delete an incident owned by the caller
#[utoipa::path(
    delete,
    path = "/api/incidents/{id}",
    params(
        ("id" = i64, Path, description = "Incident ID"),
        ("X-Owner-Id" = String, Header, description = "Owner token used when the incident was created")
    ),
    responses(
        (status = 204, description = "Incident deleted"),
        (status = 400, description = "Missing owner header or invalid id", body = ErrorResponse),
        (status = 403, description = "Not the owner, or incident does not exist", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn delete_incident(
    State(service): State<Arc<IncidentService>>,
    OwnerHeader(owner): OwnerHeader,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    service.delete(id, owner.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}
