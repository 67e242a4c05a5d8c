//! Hierarchy — the four registries and the lifecycle rules that bind them.
//!
//! Users own houses, houses contain rooms, rooms contain devices. Each level
//! lives in its own [`Registry`]; parents keep an ordered list of their
//! children's ids and every child keeps a back-reference to its parent.
//!
//! The per-level operations (`create_*`, `delete_*`, `update_*`, `*_record`)
//! are implemented next to each entity in [`crate::user`], [`crate::house`],
//! [`crate::room`] and [`crate::device`]. All of them keep the following
//! invariants:
//!
//! - an id listed in a parent's children is registered, and that child points
//!   back at the same parent;
//! - a child with a parent is listed exactly once in that parent's children;
//! - deleting an entity deletes its descendants first, unlinks it from its
//!   parent if it is still listed there, then removes it from its registry.
//!
//! The hierarchy performs no locking. Callers serialize access.

use std::ops::AddAssign;

use crate::device::Device;
use crate::house::House;
use crate::registry::Registry;
use crate::room::Room;
use crate::user::User;

/// Every live user, house, room and device.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    pub(crate) users: Registry<User>,
    pub(crate) houses: Registry<House>,
    pub(crate) rooms: Registry<Room>,
    pub(crate) devices: Registry<Device>,
}

impl Hierarchy {
    /// Create an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn users(&self) -> &Registry<User> {
        &self.users
    }

    #[must_use]
    pub fn houses(&self) -> &Registry<House> {
        &self.houses
    }

    #[must_use]
    pub fn rooms(&self) -> &Registry<Room> {
        &self.rooms
    }

    #[must_use]
    pub fn devices(&self) -> &Registry<Device> {
        &self.devices
    }
}

/// Number of entities a delete removed from each registry.
///
/// Deleting an entity that is already gone yields an empty report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removed {
    pub users: usize,
    pub houses: usize,
    pub rooms: usize,
    pub devices: usize,
}

impl Removed {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.users + self.houses + self.rooms + self.devices
    }
}

impl AddAssign for Removed {
    fn add_assign(&mut self, other: Self) {
        self.users += other.users;
        self.houses += other.houses;
        self.rooms += other.rooms;
        self.devices += other.devices;
    }
}
