//! JSON handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use homestead_app::ports::HierarchyStore;
use homestead_domain::device::{Attributes, Device, DevicePatch, DeviceRecord};
use homestead_domain::registry::Registered;

use super::{CreateResponse, DeleteResponse, GetResponse, ListResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a device inside an existing room.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub device_type: String,
    pub name: String,
    #[serde(default)]
    pub settings: Attributes,
    #[serde(default)]
    pub data: Attributes,
    pub status: String,
    pub room_name: String,
}

/// Request body for updating a device. `settings` and `data`, when present,
/// replace the stored maps.
#[derive(Deserialize)]
pub struct UpdateDeviceRequest {
    pub device_type: Option<String>,
    pub name: Option<String>,
    pub settings: Option<Attributes>,
    pub data: Option<Attributes>,
    pub status: Option<String>,
    pub room_name: Option<String>,
}

/// `GET /devices`
pub async fn list<S>(State(state): State<AppState<S>>) -> ListResponse<DeviceRecord>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    ListResponse::Ok(Json(state.device_service.list_devices().await))
}

/// `GET /devices/{name}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<GetResponse<DeviceRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let device = state.device_service.get_device(&name).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /devices`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<CreateResponse<DeviceRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let device = Device::builder()
        .name(req.name)
        .device_type(req.device_type)
        .settings(req.settings)
        .data(req.data)
        .status(req.status)
        .build()?;
    let created = state
        .device_service
        .create_device(device, &req.room_name)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /devices/{name}`
pub async fn update<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
    Json(req): Json<UpdateDeviceRequest>,
) -> Result<GetResponse<DeviceRecord>, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    let patch = DevicePatch {
        name: req.name,
        device_type: req.device_type,
        settings: req.settings,
        data: req.data,
        status: req.status,
        room: None,
    };
    let updated = state
        .device_service
        .update_device(&name, patch, req.room_name.as_deref())
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /devices/{name}`
pub async fn delete<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    state.device_service.delete_device(&name).await?;
    Ok(DeleteResponse::new(Device::KIND, &name))
}
