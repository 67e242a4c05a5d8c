//! JSON API handler modules, one per hierarchy level.
//!
//! Every resource is addressed by its identifying field: users by username,
//! everything else by name.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod houses;
#[allow(clippy::missing_errors_doc)]
pub mod rooms;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use axum::Json;
use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;

use homestead_app::ports::HierarchyStore;

use crate::state::AppState;

/// Possible responses from a list endpoint.
pub enum ListResponse<T> {
    Ok(Json<Vec<T>>),
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from a get or update endpoint.
pub enum GetResponse<T> {
    Ok(Json<T>),
}

impl<T: Serialize> IntoResponse for GetResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from a create endpoint.
///
/// A created record is answered with a plain `200 OK`.
pub enum CreateResponse<T> {
    Created(Json<T>),
}

impl<T: Serialize> IntoResponse for CreateResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => json.into_response(),
        }
    }
}

/// Confirmation body returned after a cascading delete.
#[derive(Debug, Serialize)]
pub struct DeletedBody {
    pub message: String,
}

/// Possible responses from a delete endpoint.
pub enum DeleteResponse {
    Deleted(Json<DeletedBody>),
}

impl DeleteResponse {
    fn new(kind: &str, key: &str) -> Self {
        Self::Deleted(Json(DeletedBody {
            message: format!("{kind} '{key}' deleted successfully."),
        }))
    }
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Deleted(json) => json.into_response(),
        }
    }
}

/// Build the resource routes.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    Router::new()
        // Users
        .route("/users", get(users::list::<S>).post(users::create::<S>))
        .route(
            "/users/{username}",
            get(users::get::<S>)
                .put(users::update::<S>)
                .delete(users::delete::<S>),
        )
        // Houses
        .route("/houses", get(houses::list::<S>).post(houses::create::<S>))
        .route(
            "/houses/{name}",
            get(houses::get::<S>)
                .put(houses::update::<S>)
                .delete(houses::delete::<S>),
        )
        // Rooms
        .route("/rooms", get(rooms::list::<S>).post(rooms::create::<S>))
        .route(
            "/rooms/{name}",
            get(rooms::get::<S>)
                .put(rooms::update::<S>)
                .delete(rooms::delete::<S>),
        )
        // Devices
        .route(
            "/devices",
            get(devices::list::<S>).post(devices::create::<S>),
        )
        .route(
            "/devices/{name}",
            get(devices::get::<S>)
                .put(devices::update::<S>)
                .delete(devices::delete::<S>),
        )
}
