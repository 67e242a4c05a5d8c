//! House — owned by a user, contains rooms.

use serde::{Deserialize, Serialize};

use crate::error::{HomesteadError, MissingDependencyError, NotFoundError, ValidationError};
use crate::hierarchy::{Hierarchy, Removed};
use crate::id::{HouseId, RoomId, UserId};
use crate::registry::Registered;
use crate::room::RoomRecord;
use crate::user::User;

/// A building owned by a [`User`].
#[derive(Debug, Clone, Default)]
pub struct House {
    pub id: HouseId,
    pub name: String,
    pub address: String,
    /// Free-form coordinate string, e.g. `"25.774, -80.196"`.
    pub gps: String,
    pub(crate) owner: Option<UserId>,
    pub(crate) rooms: Vec<RoomId>,
}

impl House {
    /// Create a builder for constructing a [`House`].
    #[must_use]
    pub fn builder() -> HouseBuilder {
        HouseBuilder::default()
    }

    /// A house with every field empty and no owner.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Rooms in this house, in the order they were linked.
    #[must_use]
    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
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

impl Registered for House {
    type Id = HouseId;
    const KIND: &'static str = "House";
    const KEY_FIELD: &'static str = "name";

    fn id(&self) -> HouseId {
        self.id
    }

    fn key(&self) -> &str {
        &self.name
    }
}

fn empty_name() -> ValidationError {
    ValidationError::EmptyName {
        entity: House::KIND,
        field: House::KEY_FIELD,
    }
}

/// Step-by-step builder for [`House`].
///
/// The owner is not part of the builder: it is linked by
/// [`Hierarchy::create_house`].
#[derive(Debug, Default)]
pub struct HouseBuilder {
    id: Option<HouseId>,
    name: Option<String>,
    address: Option<String>,
    gps: Option<String>,
}

impl HouseBuilder {
    #[must_use]
    pub fn id(mut self, id: HouseId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn gps(mut self, gps: impl Into<String>) -> Self {
        self.gps = Some(gps.into());
        self
    }

    /// Consume the builder, validate, and return a [`House`].
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<House, HomesteadError> {
        let house = House {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            gps: self.gps.unwrap_or_default(),
            owner: None,
            rooms: Vec::new(),
        };
        house.validate()?;
        Ok(house)
    }
}

/// Partial update for a [`House`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct HousePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub gps: Option<String>,
    /// Move the house to another owner.
    pub owner: Option<UserId>,
}

/// Serialized form of a [`House`]: the owner by username, rooms in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    pub name: String,
    pub address: String,
    pub gps: String,
    pub owner: Option<String>,
    pub rooms: Vec<RoomRecord>,
}

impl Hierarchy {
    /// Register a house and, when `owner` is given, append it to the owner's
    /// houses.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Conflict`] when the name or id is taken.
    /// - [`HomesteadError::MissingDependency`] when `owner` is not registered.
    pub fn create_house(
        &mut self,
        mut house: House,
        owner: Option<UserId>,
    ) -> Result<HouseId, HomesteadError> {
        self.houses.ensure_key_free(&house.name, None)?;
        if let Some(owner) = owner {
            self.ensure_owner(owner)?;
        }

        let id = house.id;
        house.owner = owner;
        house.rooms.clear();
        self.houses.insert(house)?;

        if let Some(user) = owner.and_then(|owner| self.users.get_mut(owner)) {
            user.houses.push(id);
        }
        Ok(id)
    }

    /// Register a blank, unowned house. Blank houses are never reconciled.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Conflict`] if the generated id collides.
    pub fn create_blank_house(&mut self) -> Result<HouseId, HomesteadError> {
        self.create_house(House::blank(), None)
    }

    #[must_use]
    pub fn house(&self, id: HouseId) -> Option<&House> {
        self.houses.get(id)
    }

    /// First house registered with `name`.
    #[must_use]
    pub fn find_house(&self, name: &str) -> Option<&House> {
        self.houses.find(name)
    }

    /// Apply `patch` to the house in place, moving it between owners when the
    /// owner changes.
    ///
    /// Nothing is modified when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Validation`] if the patch empties the name.
    /// - [`HomesteadError::NotFound`] if `id` is not registered.
    /// - [`HomesteadError::Conflict`] if the new name is taken.
    /// - [`HomesteadError::MissingDependency`] if the new owner is unknown.
    pub fn update_house(&mut self, id: HouseId, patch: HousePatch) -> Result<(), HomesteadError> {
        if patch.name.as_deref() == Some("") {
            return Err(empty_name().into());
        }
        let current_owner = self.houses.get(id).ok_or_else(|| house_not_found(id))?.owner;
        if let Some(name) = patch.name.as_deref() {
            self.houses.ensure_key_free(name, Some(id))?;
        }
        if let Some(owner) = patch.owner {
            self.ensure_owner(owner)?;
        }

        if let Some(owner) = patch.owner.filter(|owner| Some(*owner) != current_owner) {
            if let Some(old) = current_owner.and_then(|old| self.users.get_mut(old)) {
                old.houses.retain(|house| *house != id);
            }
            if let Some(new) = self.users.get_mut(owner) {
                new.houses.push(id);
            }
        }

        let house = self.houses.get_mut(id).ok_or_else(|| house_not_found(id))?;
        if let Some(name) = patch.name {
            house.name = name;
        }
        if let Some(address) = patch.address {
            house.address = address;
        }
        if let Some(gps) = patch.gps {
            house.gps = gps;
        }
        if let Some(owner) = patch.owner {
            house.owner = Some(owner);
        }
        Ok(())
    }

    /// Delete every room in the house, detach the house from its owner, then
    /// remove it.
    ///
    /// Deleting an unknown house is a no-op.
    pub fn delete_house(&mut self, id: HouseId) -> Removed {
        let Some(house) = self.houses.get(id) else {
            return Removed::default();
        };
        let owner = house.owner;
        let rooms = house.rooms.clone();

        let mut removed = Removed::default();
        for room in rooms {
            removed += self.delete_room(room);
        }
        if let Some(user) = owner.and_then(|owner| self.users.get_mut(owner)) {
            user.houses.retain(|house| *house != id);
        }
        if self.houses.remove(id).is_some() {
            removed.houses += 1;
        }
        removed
    }

    /// Serialize the house with its rooms and devices.
    #[must_use]
    pub fn house_record(&self, house: &House) -> HouseRecord {
        HouseRecord {
            name: house.name.clone(),
            address: house.address.clone(),
            gps: house.gps.clone(),
            owner: house
                .owner
                .and_then(|owner| self.users.get(owner))
                .map(|user| user.username.clone()),
            rooms: house
                .rooms
                .iter()
                .filter_map(|id| self.rooms.get(*id))
                .map(|room| self.room_record(room))
                .collect(),
        }
    }

    fn ensure_owner(&self, owner: UserId) -> Result<(), MissingDependencyError> {
        if self.users.contains(owner) {
            Ok(())
        } else {
            Err(MissingDependencyError {
                entity: House::KIND,
                dependency: User::KIND,
                key: owner.to_string(),
            })
        }
    }
}

fn house_not_found(id: HouseId) -> NotFoundError {
    NotFoundError {
        entity: House::KIND,
        key: id.to_string(),
    }
}
