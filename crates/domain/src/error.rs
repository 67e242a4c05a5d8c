//! Common error types used across the workspace.
//!
//! Each failure mode has its own typed error; [`HomesteadError`] wraps them
//! via `#[from]` so callers can propagate with `?` and adapters can match on
//! the variant to pick a response.

/// Top-level error for every fallible hierarchy operation.
#[derive(Debug, thiserror::Error)]
pub enum HomesteadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    MissingDependency(#[from] MissingDependencyError),
}

/// An entity failed its own invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The identifying field (username or name) is empty.
    #[error("{entity} {field} must not be empty")]
    EmptyName {
        entity: &'static str,
        field: &'static str,
    },
}

/// A lookup by identifying field (or id) found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} '{key}' not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub key: String,
}

/// An identifying field (or id) is already in use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with {field} '{value}' already exists")]
pub struct ConflictError {
    pub entity: &'static str,
    pub field: &'static str,
    pub value: String,
}

/// A required parent does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{dependency} '{key}' required by {entity} not found")]
pub struct MissingDependencyError {
    pub entity: &'static str,
    pub dependency: &'static str,
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_not_found_message() {
        let err: HomesteadError = NotFoundError {
            entity: "User",
            key: "alice123".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "User 'alice123' not found");
    }

    #[test]
    fn should_render_conflict_message() {
        let err: HomesteadError = ConflictError {
            entity: "House",
            field: "name",
            value: "Beach House".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "House with name 'Beach House' already exists"
        );
    }

    #[test]
    fn should_render_missing_dependency_message() {
        let err: HomesteadError = MissingDependencyError {
            entity: "Room",
            dependency: "House",
            key: "Nowhere".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "House 'Nowhere' required by Room not found");
    }
}
