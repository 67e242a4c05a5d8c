//! JSON handlers for houses.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use homestead_app::ports::HierarchyStore;
use homestead_domain::house::{House, HousePatch, HouseRecord};
use homestead_domain::registry::Registered;

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a house under an existing user.
#[derive(Deserialize)]
pub struct CreateHouseRequest {
    pub name: String,
    pub address: String,
    pub gps: String,
    pub owner_username: String,
}

/// Request body for updating a house. Absent fields are left untouched; a
/// present `owner_username` moves the house to that user.
#[derive(Deserialize)]
pub struct UpdateHouseRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub gps: Option<String>,
    pub owner_username: Option<String>,
}

/// `GET /houses`
pub async fn list<S>(State(state): State<AppState<S>>) -> ListResponse<HouseRecord>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    ListResponse::Ok(Json(state.house_service.list_houses().await))
}

/// `GET /houses/{name}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<GetResponse<HouseRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let house = state.house_service.get_house(&name).await?;
    Ok(GetResponse::Ok(Json(house)))
}

/// `POST /houses`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<CreateHouseRequest>,
) -> Result<CreateResponse<HouseRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let house = House::builder()
        .name(req.name)
        .address(req.address)
        .gps(req.gps)
        .build()?;
    let created = state
        .house_service
        .create_house(house, &req.owner_username)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /houses/{name}`
pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
    Json(req): Json<UpdateHouseRequest>,
) -> Result<GetResponse<HouseRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let patch = HousePatch {
        name: req.name,
        address: req.address,
        gps: req.gps,
        owner: None,
    };
    let updated = state
        .house_service
        .update_house(&name, patch, req.owner_username.as_deref())
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /houses/{name}`
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    state.house_service.delete_house(&name).await?;
    Ok(DeleteResponse::new(House::KIND, &name))
}
