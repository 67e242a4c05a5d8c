//! Room service — use-cases for managing rooms.

use homestead_domain::error::{HomesteadError, MissingDependencyError, NotFoundError};
use homestead_domain::hierarchy::{Hierarchy, Removed};
use homestead_domain::house::House;
use homestead_domain::id::{HouseId, RoomId};
use homestead_domain::registry::Registered;
use homestead_domain::room::{Room, RoomPatch, RoomRecord};

use crate::ports::HierarchyStore;

/// Application service for room CRUD operations.
pub struct RoomService<S> {
    store: S,
}

impl<S: HierarchyStore> RoomService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List all rooms in registration order.
    pub async fn list_rooms(&self) -> Vec<RoomRecord> {
        self.store
            .read(|h| h.rooms().iter().map(|room| h.room_record(room)).collect())
            .await
    }

    /// Look up a room by name.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::NotFound`] when no room has `name`.
    #[tracing::instrument(skip(self))]
    pub async fn get_room(&self, name: &str) -> Result<RoomRecord, HomesteadError> {
        self.store
            .read(|h| {
                let room = h.find_room(name).ok_or_else(|| not_found(name))?;
                Ok::<_, HomesteadError>(h.room_record(room))
            })
            .await
    }

    /// Register a room inside the house called `house`.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Conflict`] when the name is taken.
    /// - [`HomesteadError::MissingDependency`] when no house has that name.
    #[tracing::instrument(skip(self, room), fields(name = %room.name))]
    pub async fn create_room(&self, room: Room, house: &str) -> Result<RoomRecord, HomesteadError> {
        self.store
            .write(move |h| {
                h.rooms().ensure_key_free(&room.name, None)?;
                let house = resolve_house(h, house)?;
                let id = h.create_room(room, Some(house))?;
                record(h, id)
            })
            .await
    }

    /// Apply a partial update to the room called `name`, moving it to the
    /// house called `house` when one is given.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::NotFound`] when no room has `name`.
    /// - [`HomesteadError::Conflict`] when renaming onto a taken name.
    /// - [`HomesteadError::MissingDependency`] when no house has that name.
    /// - [`HomesteadError::Validation`] when renaming to an empty name.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_room(
        &self,
        name: &str,
        mut patch: RoomPatch,
        house: Option<&str>,
    ) -> Result<RoomRecord, HomesteadError> {
        self.store
            .write(move |h| {
                let id = h.find_room(name).ok_or_else(|| not_found(name))?.id;
                if let Some(new_name) = patch.name.as_deref() {
                    h.rooms().ensure_key_free(new_name, Some(id))?;
                }
                if let Some(house) = house {
                    patch.house = Some(resolve_house(h, house)?);
                }
                h.update_room(id, patch)?;
                record(h, id)
            })
            .await
    }

    /// Delete the room called `name` with its devices.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::NotFound`] when no room has `name`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_room(&self, name: &str) -> Result<Removed, HomesteadError> {
        let removed = self
            .store
            .write(|h| {
                let id = h.find_room(name).ok_or_else(|| not_found(name))?.id;
                Ok::<_, HomesteadError>(h.delete_room(id))
            })
            .await?;
        tracing::info!(devices = removed.devices, "room deleted");
        Ok(removed)
    }
}

fn resolve_house(h: &Hierarchy, name: &str) -> Result<HouseId, MissingDependencyError> {
    h.find_house(name)
        .filter(|_| !name.is_empty())
        .map(|house| house.id)
        .ok_or_else(|| MissingDependencyError {
            entity: Room::KIND,
            dependency: House::KIND,
            key: name.to_string(),
        })
}

fn record(h: &Hierarchy, id: RoomId) -> Result<RoomRecord, HomesteadError> {
    let room = h.room(id).ok_or_else(|| not_found(&id.to_string()))?;
    Ok(h.room_record(room))
}

fn not_found(name: &str) -> NotFoundError {
    NotFoundError {
        entity: Room::KIND,
        key: name.to_string(),
    }
}
