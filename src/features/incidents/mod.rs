//! Incident reports (safety and maintenance issues).
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Owner header | Description |
//! |--------|----------|--------------|-------------|
//! | GET | `/api/incidents` | No | List incidents, newest first |
//! | POST | `/api/incidents` | Yes | Create incident |
//! | PUT | `/api/incidents/{id}` | No | Update incident |
//! | DELETE | `/api/incidents/{id}` | Yes | Delete own incident |
//!
//! The owner header (`X-Owner-Id`) is an opaque, unauthenticated token. It is
//! stored on create and compared on delete; it is never returned to callers.

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod ownership;
pub mod routes;
pub mod services;
pub mod stores;
pub mod validation;

pub use services::IncidentService;
pub use stores::PgIncidentStore;
