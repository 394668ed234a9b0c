use axum::{
    body::Body,
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Header carrying the caller-supplied owner token
pub const OWNER_HEADER: &str = "x-owner-id";

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("invalid json: {}", err.body_text()),
            JsonRejection::JsonSyntaxError(err) => format!("invalid json: {}", err.body_text()),
            JsonRejection::MissingJsonContentType(_) => {
                "invalid json: expected Content-Type: application/json".to_string()
            }
            _ => "invalid json".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Path extractor whose rejections use the service's error body
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(path_error)
    }
}

fn path_error(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            AppError::BadRequest(format!("invalid path parameter: {}", err.body_text()))
        }
        other => AppError::BadRequest(other.body_text()),
    }
}

/// Raw `X-Owner-Id` header value.
///
/// Absence is not a rejection: whether an owner is required is decided by the
/// incident service. A present value is passed through verbatim, and one that
/// is not valid UTF-8 is rejected with its own message.
#[derive(Debug, Clone, Default)]
pub struct OwnerHeader(pub Option<String>);

impl<S> FromRequestParts<S> for OwnerHeader
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(OWNER_HEADER) else {
            return Ok(OwnerHeader(None));
        };

        let owner = value.to_str().map_err(|_| {
            AppError::BadRequest("X-Owner-Id header must be valid UTF-8".to_string())
        })?;

        Ok(OwnerHeader(Some(owner.to_string())))
    }
}
