//! Shared application state for axum handlers.

use std::sync::Arc;

use homestead_app::ports::HierarchyStore;
use homestead_app::services::device_service::DeviceService;
use homestead_app::services::house_service::HouseService;
use homestead_app::services::room_service::RoomService;
use homestead_app::services::user_service::UserService;

/// Application state shared across all axum handlers.
///
/// Generic over the store type to avoid dynamic dispatch. All four services
/// are expected to share one store so cross-level lookups (an owner by
/// username, a house by name) see the same hierarchy. `Clone` is implemented
/// manually so the store itself does not need to be `Clone`; only the `Arc`
/// wrappers are cloned.
pub struct AppState<S> {
    /// User CRUD service.
    pub user_service: Arc<UserService<S>>,
    /// House CRUD service.
    pub house_service: Arc<HouseService<S>>,
    /// Room CRUD service.
    pub room_service: Arc<RoomService<S>>,
    /// Device CRUD service.
    pub device_service: Arc<DeviceService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            house_service: Arc::clone(&self.house_service),
            room_service: Arc::clone(&self.room_service),
            device_service: Arc::clone(&self.device_service),
        }
    }
}

impl<S> AppState<S>
where
    S: HierarchyStore + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        user_service: UserService<S>,
        house_service: HouseService<S>,
        room_service: RoomService<S>,
        device_service: DeviceService<S>,
    ) -> Self {
        Self {
            user_service: Arc::new(user_service),
            house_service: Arc::new(house_service),
            room_service: Arc::new(room_service),
            device_service: Arc::new(device_service),
        }
    }
}

impl<S> AppState<S>
where
    S: HierarchyStore + Clone + Send + Sync + 'static,
{
    /// Build every service over clones of one shared store handle.
    pub fn from_store(store: &S) -> Self {
        Self::new(
            UserService::new(store.clone()),
            HouseService::new(store.clone()),
            RoomService::new(store.clone()),
            DeviceService::new(store.clone()),
        )
    }
}
