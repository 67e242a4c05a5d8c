//! JSON handlers for users.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use homestead_app::ports::HierarchyStore;
use homestead_domain::registry::Registered;
use homestead_domain::user::{User, UserPatch, UserRecord};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a user.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub privileges: String,
    pub email: String,
}

/// Request body for updating a user. Absent fields are left untouched.
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub privileges: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            username: req.username,
            phone: req.phone,
            privileges: req.privileges,
            email: req.email,
        }
    }
}

/// `GET /users`
pub async fn list<S>(State(state): State<AppState<S>>) -> ListResponse<UserRecord>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    ListResponse::Ok(Json(state.user_service.list_users().await))
}

/// `GET /users/{username}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> Result<GetResponse<UserRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let user = state.user_service.get_user(&username).await?;
    Ok(GetResponse::Ok(Json(user)))
}

/// `POST /users`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<CreateResponse<UserRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let user = User::builder()
        .name(req.name)
        .username(req.username)
        .phone(req.phone)
        .privileges(req.privileges)
        .email(req.email)
        .build()?;
    let created = state.user_service.create_user(user).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /users/{username}`
pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<GetResponse<UserRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let updated = state
        .user_service
        .update_user(&username, req.into())
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /users/{username}`
///
/// Removes the user with every house, room and device it owns.
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    state.user_service.delete_user(&username).await?;
    Ok(DeleteResponse::new(User::KIND, &username))
}
