//! Registry — the ordered collection of every live entity of one type.
//!
//! A registry keeps entities in registration order, looks them up by id or by
//! identifying field, and refuses a second entity with the same non-empty
//! identifying field. Removal is always remove-if-present.

use std::fmt;

use crate::error::ConflictError;

/// An entity that can be held by a [`Registry`].
pub trait Registered {
    /// Typed identifier of the entity.
    type Id: Copy + Eq + fmt::Display;

    /// Human-readable entity kind, used in error messages.
    const KIND: &'static str;

    /// Name of the identifying field, used in error messages.
    const KEY_FIELD: &'static str;

    fn id(&self) -> Self::Id;

    /// The identifying field (username, house name, …).
    fn key(&self) -> &str;
}

/// Insertion-ordered set of entities of type `T`.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Registered> Registry<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    #[must_use]
    pub fn contains(&self, id: T::Id) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// First entity whose identifying field equals `key`, scanning in
    /// registration order.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Check that `key` may be used by the entity `owner` (or by a new entity
    /// when `owner` is `None`).
    ///
    /// Empty keys belong to blank entities and never conflict.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError`] when another entity already uses `key`.
    pub fn ensure_key_free(&self, key: &str, owner: Option<T::Id>) -> Result<(), ConflictError> {
        if key.is_empty() {
            return Ok(());
        }
        match self.find(key) {
            Some(existing) if Some(existing.id()) != owner => Err(ConflictError {
                entity: T::KIND,
                field: T::KEY_FIELD,
                value: key.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn insert(&mut self, item: T) -> Result<(), ConflictError> {
        if self.contains(item.id()) {
            return Err(ConflictError {
                entity: T::KIND,
                field: "id",
                value: item.id().to_string(),
            });
        }
        self.ensure_key_free(item.key(), None)?;
        self.items.push(item);
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }
}
