//! Room — part of a house, holds devices.

use serde::{Deserialize, Serialize};

use crate::device::DeviceRecord;
use crate::error::{HomesteadError, MissingDependencyError, NotFoundError, ValidationError};
use crate::hierarchy::{Hierarchy, Removed};
use crate::house::House;
use crate::id::{DeviceId, HouseId, RoomId};
use crate::registry::Registered;

/// A room inside a [`House`].
#[derive(Debug, Clone, Default)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub floor: i64,
    /// Floor area, unit left to the user.
    pub size: i64,
    pub room_type: String,
    pub(crate) house: Option<HouseId>,
    pub(crate) devices: Vec<DeviceId>,
}

impl Room {
    /// Create a builder for constructing a [`Room`].
    #[must_use]
    pub fn builder() -> RoomBuilder {
        RoomBuilder::default()
    }

    /// A room with every field at its zero value and no house.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn house(&self) -> Option<HouseId> {
        self.house
    }

    /// Devices in this room, in the order they were linked.
    #[must_use]
    pub fn devices(&self) -> &[DeviceId] {
        &self.devices
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

impl Registered for Room {
    type Id = RoomId;
    const KIND: &'static str = "Room";
    const KEY_FIELD: &'static str = "name";

    fn id(&self) -> RoomId {
        self.id
    }

    fn key(&self) -> &str {
        &self.name
    }
}

fn empty_name() -> ValidationError {
    ValidationError::EmptyName {
        entity: Room::KIND,
        field: Room::KEY_FIELD,
    }
}

/// Step-by-step builder for [`Room`].
#[derive(Debug, Default)]
pub struct RoomBuilder {
    id: Option<RoomId>,
    name: Option<String>,
    floor: i64,
    size: i64,
    room_type: Option<String>,
}

impl RoomBuilder {
    #[must_use]
    pub fn id(mut self, id: RoomId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn floor(mut self, floor: i64) -> Self {
        self.floor = floor;
        self
    }

    #[must_use]
    pub fn size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn room_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = Some(room_type.into());
        self
    }

    /// Consume the builder, validate, and return a [`Room`].
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Room, HomesteadError> {
        let room = Room {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            floor: self.floor,
            size: self.size,
            room_type: self.room_type.unwrap_or_default(),
            house: None,
            devices: Vec::new(),
        };
        room.validate()?;
        Ok(room)
    }
}

/// Partial update for a [`Room`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct RoomPatch {
    pub name: Option<String>,
    pub floor: Option<i64>,
    pub size: Option<i64>,
    pub room_type: Option<String>,
    /// Move the room to another house.
    pub house: Option<HouseId>,
}

/// Serialized form of a [`Room`]: the house by name, devices in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub name: String,
    pub floor: i64,
    pub size: i64,
    pub house: Option<String>,
    pub room_type: String,
    pub devices: Vec<DeviceRecord>,
}

impl Hierarchy {
    /// Register a room and, when `house` is given, append it to the house's
    /// rooms.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Conflict`] when the name or id is taken.
    /// - [`HomesteadError::MissingDependency`] when `house` is not registered.
    pub fn create_room(
        &mut self,
        mut room: Room,
        house: Option<HouseId>,
    ) -> Result<RoomId, HomesteadError> {
        self.rooms.ensure_key_free(&room.name, None)?;
        if let Some(house) = house {
            self.ensure_house(house)?;
        }

        let id = room.id;
        room.house = house;
        room.devices.clear();
        self.rooms.insert(room)?;

        if let Some(house) = house.and_then(|house| self.houses.get_mut(house)) {
            house.rooms.push(id);
        }
        Ok(id)
    }

    /// Register a blank room outside any house. Blank rooms are never
    /// reconciled.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Conflict`] if the generated id collides.
    pub fn create_blank_room(&mut self) -> Result<RoomId, HomesteadError> {
        self.create_room(Room::blank(), None)
    }

    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// First room registered with `name`.
    #[must_use]
    pub fn find_room(&self, name: &str) -> Option<&Room> {
        self.rooms.find(name)
    }

    /// Apply `patch` to the room in place, moving it between houses when the
    /// house changes.
    ///
    /// Nothing is modified when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Validation`] if the patch empties the name.
    /// - [`HomesteadError::NotFound`] if `id` is not registered.
    /// - [`HomesteadError::Conflict`] if the new name is taken.
    /// - [`HomesteadError::MissingDependency`] if the new house is unknown.
    pub fn update_room(&mut self, id: RoomId, patch: RoomPatch) -> Result<(), HomesteadError> {
        if patch.name.as_deref() == Some("") {
            return Err(empty_name().into());
        }
        let current_house = self.rooms.get(id).ok_or_else(|| room_not_found(id))?.house;
        if let Some(name) = patch.name.as_deref() {
            self.rooms.ensure_key_free(name, Some(id))?;
        }
        if let Some(house) = patch.house {
            self.ensure_house(house)?;
        }

        if let Some(house) = patch.house.filter(|house| Some(*house) != current_house) {
            if let Some(old) = current_house.and_then(|old| self.houses.get_mut(old)) {
                old.rooms.retain(|room| *room != id);
            }
            if let Some(new) = self.houses.get_mut(house) {
                new.rooms.push(id);
            }
        }

        let room = self.rooms.get_mut(id).ok_or_else(|| room_not_found(id))?;
        if let Some(name) = patch.name {
            room.name = name;
        }
        if let Some(floor) = patch.floor {
            room.floor = floor;
        }
        if let Some(size) = patch.size {
            room.size = size;
        }
        if let Some(room_type) = patch.room_type {
            room.room_type = room_type;
        }
        if let Some(house) = patch.house {
            room.house = Some(house);
        }
        Ok(())
    }

    /// Delete every device in the room, detach the room from its house, then
    /// remove it.
    ///
    /// Deleting an unknown room is a no-op.
    pub fn delete_room(&mut self, id: RoomId) -> Removed {
        let Some(room) = self.rooms.get(id) else {
            return Removed::default();
        };
        let house = room.house;
        let devices = room.devices.clone();

        let mut removed = Removed::default();
        for device in devices {
            removed += self.delete_device(device);
        }
        if let Some(house) = house.and_then(|house| self.houses.get_mut(house)) {
            house.rooms.retain(|room| *room != id);
        }
        if self.rooms.remove(id).is_some() {
            removed.rooms += 1;
        }
        removed
    }

    /// Serialize the room with its devices.
    #[must_use]
    pub fn room_record(&self, room: &Room) -> RoomRecord {
        RoomRecord {
            name: room.name.clone(),
            floor: room.floor,
            size: room.size,
            house: room
                .house
                .and_then(|house| self.houses.get(house))
                .map(|house| house.name.clone()),
            room_type: room.room_type.clone(),
            devices: room
                .devices
                .iter()
                .filter_map(|id| self.devices.get(*id))
                .map(|device| self.device_record(device))
                .collect(),
        }
    }

    fn ensure_house(&self, house: HouseId) -> Result<(), MissingDependencyError> {
        if self.houses.contains(house) {
            Ok(())
        } else {
            Err(MissingDependencyError {
                entity: Room::KIND,
                dependency: House::KIND,
                key: house.to_string(),
            })
        }
    }
}

fn room_not_found(id: RoomId) -> NotFoundError {
    NotFoundError {
        entity: Room::KIND,
        key: id.to_string(),
    }
}
