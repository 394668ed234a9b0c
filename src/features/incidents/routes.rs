use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::incidents::handlers;
use crate::features::incidents::services::IncidentService;

/// Create routes for the incidents feature
///
/// Create and delete read the owner from `X-Owner-Id`; list and update are open.
pub fn routes(service: Arc<IncidentService>) -> Router {
    Router::new()
        .route(
            "/api/incidents",
            get(handlers::list_incidents).post(handlers::create_incident),
        )
        .route(
            "/api/incidents/{id}",
            put(handlers::update_incident).delete(handlers::delete_incident),
        )
        .with_state(service)
}
