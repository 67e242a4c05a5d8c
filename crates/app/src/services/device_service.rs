//! Device service — use-cases for managing devices.

use homestead_domain::device::{Device, DevicePatch, DeviceRecord};
use homestead_domain::error::{HomesteadError, MissingDependencyError, NotFoundError};
use homestead_domain::hierarchy::{Hierarchy, Removed};
use homestead_domain::id::{DeviceId, RoomId};
use homestead_domain::registry::Registered;
use homestead_domain::room::Room;

use crate::ports::HierarchyStore;

/// Application service for device CRUD operations.
pub struct DeviceService<S> {
    store: S,
}

impl<S: HierarchyStore> DeviceService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List all devices in registration order.
    pub async fn list_devices(&self) -> Vec<DeviceRecord> {
        self.store
            .read(|h| {
                h.devices()
                    .iter()
                    .map(|device| h.device_record(device))
                    .collect()
            })
            .await
    }

    /// Look up a device by name.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::NotFound`] when no device has `name`.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, name: &str) -> Result<DeviceRecord, HomesteadError> {
        self.store
            .read(|h| {
                let device = h.find_device(name).ok_or_else(|| not_found(name))?;
                Ok::<_, HomesteadError>(h.device_record(device))
            })
            .await
    }

    /// Register a device inside the room called `room`.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Conflict`] when the name is taken.
    /// - [`HomesteadError::MissingDependency`] when no room has that name.
    #[tracing::instrument(skip(self, device), fields(name = %device.name))]
    pub async fn create_device(
        &self,
        device: Device,
        room: &str,
    ) -> Result<DeviceRecord, HomesteadError> {
        self.store
            .write(move |h| {
                h.devices().ensure_key_free(&device.name, None)?;
                let room = resolve_room(h, room)?;
                let id = h.create_device(device, Some(room))?;
                record(h, id)
            })
            .await
    }

    /// Apply a partial update to the device called `name`, moving it to the
    /// room called `room` when one is given.
    ///
    /// `settings` and `data` in the patch replace the stored maps wholesale.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::NotFound`] when no device has `name`.
    /// - [`HomesteadError::Conflict`] when renaming onto a taken name.
    /// - [`HomesteadError::MissingDependency`] when no room has that name.
    /// - [`HomesteadError::Validation`] when renaming to an empty name.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_device(
        &self,
        name: &str,
        mut patch: DevicePatch,
        room: Option<&str>,
    ) -> Result<DeviceRecord, HomesteadError> {
        self.store
            .write(move |h| {
                let id = h.find_device(name).ok_or_else(|| not_found(name))?.id;
                if let Some(new_name) = patch.name.as_deref() {
                    h.devices().ensure_key_free(new_name, Some(id))?;
                }
                if let Some(room) = room {
                    patch.room = Some(resolve_room(h, room)?);
                }
                h.update_device(id, patch)?;
                record(h, id)
            })
            .await
    }

    /// Delete the device called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::NotFound`] when no device has `name`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_device(&self, name: &str) -> Result<Removed, HomesteadError> {
        let removed = self
            .store
            .write(|h| {
                let id = h.find_device(name).ok_or_else(|| not_found(name))?.id;
                Ok::<_, HomesteadError>(h.delete_device(id))
            })
            .await?;
        tracing::info!(devices = removed.devices, "device deleted");
        Ok(removed)
    }
}

fn resolve_room(h: &Hierarchy, name: &str) -> Result<RoomId, MissingDependencyError> {
    h.find_room(name)
        .filter(|_| !name.is_empty())
        .map(|room| room.id)
        .ok_or_else(|| MissingDependencyError {
            entity: Device::KIND,
            dependency: Room::KIND,
            key: name.to_string(),
        })
}

fn record(h: &Hierarchy, id: DeviceId) -> Result<DeviceRecord, HomesteadError> {
    let device = h.device(id).ok_or_else(|| not_found(&id.to_string()))?;
    Ok(h.device_record(device))
}

fn not_found(name: &str) -> NotFoundError {
    NotFoundError {
        entity: Device::KIND,
        key: name.to_string(),
    }
}
