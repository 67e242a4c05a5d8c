//! Device — a physical or virtual appliance placed in a room.

mod attribute_value;

pub use attribute_value::{AttributeValue, Attributes};

use serde::{Deserialize, Serialize};

use crate::error::{HomesteadError, MissingDependencyError, NotFoundError, ValidationError};
use crate::hierarchy::{Hierarchy, Removed};
use crate::id::{DeviceId, RoomId};
use crate::registry::Registered;
use crate::room::Room;

/// An appliance inside a [`Room`].
#[derive(Debug, Clone, Default)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub device_type: String,
    /// Opaque configuration, stored verbatim.
    pub settings: Attributes,
    /// Opaque readings, stored verbatim.
    pub data: Attributes,
    pub status: String,
    pub(crate) room: Option<RoomId>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// A device with every field empty and no room.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn room(&self) -> Option<RoomId> {
        self.room
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(empty_name());
        }
        Ok(())
    }
}

impl Registered for Device {
    type Id = DeviceId;
    const KIND: &'static str = "Device";
    const KEY_FIELD: &'static str = "name";

    fn id(&self) -> DeviceId {
        self.id
    }

    fn key(&self) -> &str {
        &self.name
    }
}

fn empty_name() -> ValidationError {
    ValidationError::EmptyName {
        entity: Device::KIND,
        field: Device::KEY_FIELD,
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    device_type: Option<String>,
    settings: Attributes,
    data: Attributes,
    status: Option<String>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: Attributes) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn data(mut self, data: Attributes) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Device, HomesteadError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            device_type: self.device_type.unwrap_or_default(),
            settings: self.settings,
            data: self.data,
            status: self.status.unwrap_or_default(),
            room: None,
        };
        device.validate()?;
        Ok(device)
    }
}

/// Partial update for a [`Device`]. `None` fields are left untouched.
///
/// `settings` and `data` replace the whole map when present.
#[derive(Debug, Clone, Default)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub settings: Option<Attributes>,
    pub data: Option<Attributes>,
    pub status: Option<String>,
    /// Move the device to another room.
    pub room: Option<RoomId>,
}

/// Serialized form of a [`Device`]: the room by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_type: String,
    pub name: String,
    pub room: Option<String>,
    pub settings: Attributes,
    pub data: Attributes,
    pub status: String,
}

impl Hierarchy {
    /// Register a device and, when `room` is given, append it to the room's
    /// devices.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Conflict`] when the name or id is taken.
    /// - [`HomesteadError::MissingDependency`] when `room` is not registered.
    pub fn create_device(
        &mut self,
        mut device: Device,
        room: Option<RoomId>,
    ) -> Result<DeviceId, HomesteadError> {
        self.devices.ensure_key_free(&device.name, None)?;
        if let Some(room) = room {
            self.ensure_room(room)?;
        }

        let id = device.id;
        device.room = room;
        self.devices.insert(device)?;

        if let Some(room) = room.and_then(|room| self.rooms.get_mut(room)) {
            room.devices.push(id);
        }
        Ok(id)
    }

    /// Register a blank device outside any room. Blank devices are never
    /// reconciled.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Conflict`] if the generated id collides.
    pub fn create_blank_device(&mut self) -> Result<DeviceId, HomesteadError> {
        self.create_device(Device::blank(), None)
    }

    #[must_use]
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    /// First device registered with `name`.
    #[must_use]
    pub fn find_device(&self, name: &str) -> Option<&Device> {
        self.devices.find(name)
    }

    /// Apply `patch` to the device in place, moving it between rooms when the
    /// room changes.
    ///
    /// Nothing is modified when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Validation`] if the patch empties the name.
    /// - [`HomesteadError::NotFound`] if `id` is not registered.
    /// - [`HomesteadError::Conflict`] if the new name is taken.
    /// - [`HomesteadError::MissingDependency`] if the new room is unknown.
    pub fn update_device(
        &mut self,
        id: DeviceId,
        patch: DevicePatch,
    ) -> Result<(), HomesteadError> {
        if patch.name.as_deref() == Some("") {
            return Err(empty_name().into());
        }
        let current_room = self
            .devices
            .get(id)
            .ok_or_else(|| device_not_found(id))?
            .room;
        if let Some(name) = patch.name.as_deref() {
            self.devices.ensure_key_free(name, Some(id))?;
        }
        if let Some(room) = patch.room {
            self.ensure_room(room)?;
        }

        if let Some(room) = patch.room.filter(|room| Some(*room) != current_room) {
            if let Some(old) = current_room.and_then(|old| self.rooms.get_mut(old)) {
                old.devices.retain(|device| *device != id);
            }
            if let Some(new) = self.rooms.get_mut(room) {
                new.devices.push(id);
            }
        }

        let device = self
            .devices
            .get_mut(id)
            .ok_or_else(|| device_not_found(id))?;
        if let Some(name) = patch.name {
            device.name = name;
        }
        if let Some(device_type) = patch.device_type {
            device.device_type = device_type;
        }
        if let Some(settings) = patch.settings {
            device.settings = settings;
        }
        if let Some(data) = patch.data {
            device.data = data;
        }
        if let Some(status) = patch.status {
            device.status = status;
        }
        if let Some(room) = patch.room {
            device.room = Some(room);
        }
        Ok(())
    }

    /// Detach the device from its room and remove it.
    ///
    /// Deleting an unknown device is a no-op.
    pub fn delete_device(&mut self, id: DeviceId) -> Removed {
        let Some(device) = self.devices.get(id) else {
            return Removed::default();
        };
        if let Some(room) = device.room.and_then(|room| self.rooms.get_mut(room)) {
            room.devices.retain(|device| *device != id);
        }

        let mut removed = Removed::default();
        if self.devices.remove(id).is_some() {
            removed.devices += 1;
        }
        removed
    }

    #[must_use]
    pub fn device_record(&self, device: &Device) -> DeviceRecord {
        DeviceRecord {
            device_type: device.device_type.clone(),
            name: device.name.clone(),
            room: device
                .room
                .and_then(|room| self.rooms.get(room))
                .map(|room| room.name.clone()),
            settings: device.settings.clone(),
            data: device.data.clone(),
            status: device.status.clone(),
        }
    }

    fn ensure_room(&self, room: RoomId) -> Result<(), MissingDependencyError> {
        if self.rooms.contains(room) {
            Ok(())
        } else {
            Err(MissingDependencyError {
                entity: Device::KIND,
                dependency: Room::KIND,
                key: room.to_string(),
            })
        }
    }
}

fn device_not_found(id: DeviceId) -> NotFoundError {
    NotFoundError {
        entity: Device::KIND,
        key: id.to_string(),
    }
}
