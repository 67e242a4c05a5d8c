//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use homestead_domain::error::HomesteadError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`HomesteadError`] to an HTTP response with appropriate status code.
///
/// A missing parent is reported like any other missing entity (404); a taken
/// or empty identifying field is a bad request (400).
#[derive(Debug)]
pub struct ApiError(HomesteadError);

impl From<HomesteadError> for ApiError {
    fn from(err: HomesteadError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            HomesteadError::NotFound(_) | HomesteadError::MissingDependency(_) => {
                StatusCode::NOT_FOUND
            }
            HomesteadError::Conflict(_) | HomesteadError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(%status, error = %self.0, "request rejected");
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homestead_domain::error::{
        ConflictError, MissingDependencyError, NotFoundError, ValidationError,
    };

    #[test]
    fn should_map_missing_parent_to_not_found() {
        let err = ApiError::from(HomesteadError::from(MissingDependencyError {
            entity: "House",
            dependency: "User",
            key: "ghost".to_string(),
        }));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_map_unknown_entity_to_not_found() {
        let err = ApiError::from(HomesteadError::from(NotFoundError {
            entity: "Room",
            key: "Attic".to_string(),
        }));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_map_conflict_and_validation_to_bad_request() {
        let conflict = ApiError::from(HomesteadError::from(ConflictError {
            entity: "User",
            field: "username",
            value: "alice123".to_string(),
        }));
        let invalid = ApiError::from(HomesteadError::from(ValidationError::EmptyName {
            entity: "User",
            field: "username",
        }));
        assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
