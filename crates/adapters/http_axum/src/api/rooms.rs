//! JSON handlers for rooms.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use homestead_app::ports::HierarchyStore;
use homestead_domain::registry::Registered;
use homestead_domain::room::{Room, RoomPatch, RoomRecord};

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a room inside an existing house.
#[derive(Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub floor: i64,
    pub size: i64,
    pub house_name: String,
    pub room_type: String,
}

/// Request body for updating a room.
#[derive(Deserialize)]
pub struct UpdateRoomRequest {
    pub name: Option<String>,
    pub floor: Option<i64>,
    pub size: Option<i64>,
    pub house_name: Option<String>,
    pub room_type: Option<String>,
}

/// `GET /rooms`
pub async fn list<S>(State(state): State<AppState<S>>) -> ListResponse<RoomRecord>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    ListResponse::Ok(Json(state.room_service.list_rooms().await))
}

/// `GET /rooms/{name}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<GetResponse<RoomRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let room = state.room_service.get_room(&name).await?;
    Ok(GetResponse::Ok(Json(room)))
}

/// `POST /rooms`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<CreateResponse<RoomRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let room = Room::builder()
        .name(req.name)
        .floor(req.floor)
        .size(req.size)
        .room_type(req.room_type)
        .build()?;
    let created = state
        .room_service
        .create_room(room, &req.house_name)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /rooms/{name}`
pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
    Json(req): Json<UpdateRoomRequest>,
) -> Result<GetResponse<RoomRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let patch = RoomPatch {
        name: req.name,
        floor: req.floor,
        size: req.size,
        room_type: req.room_type,
        house: None,
    };
    let updated = state
        .room_service
        .update_room(&name, patch, req.house_name.as_deref())
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /rooms/{name}`
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    state.room_service.delete_room(&name).await?;
    Ok(DeleteResponse::new(Room::KIND, &name))
}
