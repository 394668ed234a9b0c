use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::incidents::{
    dtos as incidents_dtos, handlers as incidents_handlers, models as incidents_models,
};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Incidents
        incidents_handlers::list_incidents,
        incidents_handlers::create_incident,
        incidents_handlers::update_incident,
        incidents_handlers::delete_incident,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Incidents
            incidents_models::IncidentCategory,
            incidents_models::IncidentStatus,
            incidents_dtos::IncidentInputDto,
            incidents_dtos::IncidentResponseDto,
        )
    ),
    tags(
        (name = "incidents", description = "Safety and maintenance incident reports"),
    ),
    modifiers(&OwnerHeaderAddon),
    info(
        title = "Incident Tracker API",
        version = "0.1.0",
        description = "Record and manage safety and maintenance incidents",
    )
)]
pub struct ApiDoc;

/// Documents the `X-Owner-Id` header as an API key scheme
struct OwnerHeaderAddon;

impl Modify for OwnerHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "owner_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Owner-Id"))),
            );
        }
    }
}
