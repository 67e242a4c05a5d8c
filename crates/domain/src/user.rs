//! User — root of the ownership tree.

use serde::{Deserialize, Serialize};

use crate::error::{HomesteadError, NotFoundError, ValidationError};
use crate::hierarchy::{Hierarchy, Removed};
use crate::house::HouseRecord;
use crate::id::{HouseId, UserId};
use crate::registry::Registered;

/// A person who owns houses.
#[derive(Debug, Clone, Default)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub phone: String,
    /// Free-form privilege label. Never checked.
    pub privileges: String,
    pub email: String,
    pub(crate) houses: Vec<HouseId>,
}

impl User {
    /// Create a builder for constructing a [`User`].
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// A user with every field empty, for staged population.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Houses owned by this user, in the order they were linked.
    #[must_use]
    pub fn houses(&self) -> &[HouseId] {
        &self.houses
    }

    /// `true` when every field is empty and the user owns nothing.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.username.is_empty()
            && self.phone.is_empty()
            && self.privileges.is_empty()
            && self.email.is_empty()
            && self.houses.is_empty()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `username` is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() {
            return Err(empty_username());
        }
        Ok(())
    }
}

impl Registered for User {
    type Id = UserId;
    const KIND: &'static str = "User";
    const KEY_FIELD: &'static str = "username";

    fn id(&self) -> UserId {
        self.id
    }

    fn key(&self) -> &str {
        &self.username
    }
}

fn empty_username() -> ValidationError {
    ValidationError::EmptyName {
        entity: User::KIND,
        field: User::KEY_FIELD,
    }
}

/// Step-by-step builder for [`User`].
#[derive(Debug, Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    name: Option<String>,
    username: Option<String>,
    phone: Option<String>,
    privileges: Option<String>,
    email: Option<String>,
}

impl UserBuilder {
    #[must_use]
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn privileges(mut self, privileges: impl Into<String>) -> Self {
        self.privileges = Some(privileges.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Consume the builder, validate, and return a [`User`].
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Validation`] if `username` is missing or empty.
    pub fn build(self) -> Result<User, HomesteadError> {
        let user = User {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            privileges: self.privileges.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            houses: Vec::new(),
        };
        user.validate()?;
        Ok(user)
    }
}

/// Partial update for a [`User`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub privileges: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.username.as_deref() {
            Some("") => Err(empty_username()),
            _ => Ok(()),
        }
    }

    fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(privileges) = self.privileges {
            user.privileges = privileges;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
    }
}

/// Serialized form of a [`User`], with every owned house nested in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub username: String,
    pub phone: String,
    pub privileges: String,
    pub email: String,
    pub houses: Vec<HouseRecord>,
}

impl Hierarchy {
    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Conflict`] when the username or id is
    /// already registered.
    pub fn create_user(&mut self, mut user: User) -> Result<UserId, HomesteadError> {
        // houses are only ever linked from the house side
        user.houses.clear();
        let id = user.id;
        self.users.insert(user)?;
        Ok(id)
    }

    /// Drop every blank, childless user, then register a fresh blank one.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Conflict`] if the generated id collides.
    pub fn create_blank_user(&mut self) -> Result<UserId, HomesteadError> {
        self.users.retain(|user| !user.is_blank());
        self.create_user(User::blank())
    }

    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// First user registered with `username`.
    #[must_use]
    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.find(username)
    }

    /// Apply `patch` to the user in place.
    ///
    /// Nothing is modified when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Validation`] if the patch empties the username.
    /// - [`HomesteadError::NotFound`] if `id` is not registered.
    /// - [`HomesteadError::Conflict`] if the new username is taken.
    pub fn update_user(&mut self, id: UserId, patch: UserPatch) -> Result<(), HomesteadError> {
        patch.validate()?;
        if !self.users.contains(id) {
            return Err(user_not_found(id).into());
        }
        if let Some(username) = patch.username.as_deref() {
            self.users.ensure_key_free(username, Some(id))?;
        }
        let user = self.users.get_mut(id).ok_or_else(|| user_not_found(id))?;
        patch.apply(user);
        Ok(())
    }

    /// Delete the user and, first, every house it owns.
    ///
    /// Deleting an unknown user is a no-op.
    pub fn delete_user(&mut self, id: UserId) -> Removed {
        let Some(user) = self.users.get(id) else {
            return Removed::default();
        };
        let houses = user.houses.clone();

        let mut removed = Removed::default();
        for house in houses {
            removed += self.delete_house(house);
        }
        if self.users.remove(id).is_some() {
            removed.users += 1;
        }
        removed
    }

    /// Serialize the user together with its houses, rooms and devices.
    #[must_use]
    pub fn user_record(&self, user: &User) -> UserRecord {
        UserRecord {
            name: user.name.clone(),
            username: user.username.clone(),
            phone: user.phone.clone(),
            privileges: user.privileges.clone(),
            email: user.email.clone(),
            houses: user
                .houses
                .iter()
                .filter_map(|id| self.houses.get(*id))
                .map(|house| self.house_record(house))
                .collect(),
        }
    }
}

fn user_not_found(id: UserId) -> NotFoundError {
    NotFoundError {
        entity: User::KIND,
        key: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::fixtures::{alice, assert_consistent};
    use crate::house::House;

    fn bob() -> User {
        User::builder()
            .name("Bob")
            .username("bob")
            .phone("555-0000")
            .privileges("user")
            .email("bob@mail.com")
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_user_when_username_provided() {
        let user = bob();
        assert_eq!(user.username, "bob");
        assert!(user.houses().is_empty());
    }

    #[test]
    fn should_return_validation_error_when_username_is_empty() {
        let result = User::builder().name("Nobody").build();
        assert!(matches!(
            result,
            Err(HomesteadError::Validation(ValidationError::EmptyName { .. }))
        ));
    }

    #[test]
    fn should_construct_blank_user_with_empty_fields() {
        let user = User::blank();
        assert!(user.is_blank());
        assert_eq!(user.name, "");
        assert_eq!(user.username, "");
        assert_eq!(user.phone, "");
        assert_eq!(user.privileges, "");
        assert_eq!(user.email, "");
    }

    #[test]
    fn should_register_user_when_created() {
        let mut h = Hierarchy::new();
        let id = h.create_user(bob()).unwrap();
        assert_eq!(h.users().len(), 1);
        assert_eq!(h.find_user("bob").map(|u| u.id), Some(id));
    }

    #[test]
    fn should_reject_duplicate_username() {
        let mut h = Hierarchy::new();
        h.create_user(bob()).unwrap();
        let result = h.create_user(bob());
        assert!(matches!(result, Err(HomesteadError::Conflict(_))));
        assert_eq!(h.users().len(), 1);
    }

    #[test]
    fn should_keep_a_single_blank_user_when_created_repeatedly() {
        let mut h = Hierarchy::new();
        h.create_blank_user().unwrap();
        h.create_blank_user().unwrap();
        let last = h.create_blank_user().unwrap();

        assert_eq!(h.users().len(), 1);
        assert_eq!(h.users().iter().next().map(|u| u.id), Some(last));
    }

    #[test]
    fn should_keep_non_blank_users_when_creating_blank_user() {
        let mut h = Hierarchy::new();
        h.create_user(bob()).unwrap();
        let staged = h.create_blank_user().unwrap();
        h.update_user(
            staged,
            UserPatch {
                phone: Some("555-1111".to_string()),
                ..UserPatch::default()
            },
        )
        .unwrap();
        h.create_blank_user().unwrap();

        // bob, the partially populated blank, and the new blank
        assert_eq!(h.users().len(), 3);
    }

    #[test]
    fn should_populate_blank_user_field_by_field() {
        let mut h = Hierarchy::new();
        let id = h.create_blank_user().unwrap();
        h.update_user(
            id,
            UserPatch {
                name: Some("Alice".to_string()),
                username: Some("alice123".to_string()),
                ..UserPatch::default()
            },
        )
        .unwrap();

        let user = h.find_user("alice123").unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.name, "Alice");
    }

    #[test]
    fn should_reject_rename_to_taken_username() {
        let mut a = alice();
        let bob = a.hierarchy.create_user(bob()).unwrap();

        let result = a.hierarchy.update_user(
            bob,
            UserPatch {
                username: Some("alice123".to_string()),
                phone: Some("999".to_string()),
                ..UserPatch::default()
            },
        );

        assert!(matches!(result, Err(HomesteadError::Conflict(_))));
        let bob = a.hierarchy.user(bob).unwrap();
        assert_eq!(bob.username, "bob");
        assert_eq!(bob.phone, "555-0000");
    }

    #[test]
    fn should_allow_rename_to_own_username() {
        let mut a = alice();
        a.hierarchy
            .update_user(
                a.user,
                UserPatch {
                    username: Some("alice123".to_string()),
                    email: Some("alice@example.com".to_string()),
                    ..UserPatch::default()
                },
            )
            .unwrap();
        assert_eq!(a.hierarchy.user(a.user).unwrap().email, "alice@example.com");
    }

    #[test]
    fn should_reject_empty_username_in_patch() {
        let mut a = alice();
        let result = a.hierarchy.update_user(
            a.user,
            UserPatch {
                username: Some(String::new()),
                ..UserPatch::default()
            },
        );
        assert!(matches!(result, Err(HomesteadError::Validation(_))));
    }

    #[test]
    fn should_return_not_found_when_updating_unknown_user() {
        let mut h = Hierarchy::new();
        let result = h.update_user(UserId::new(), UserPatch::default());
        assert!(matches!(result, Err(HomesteadError::NotFound(_))));
    }

    #[test]
    fn should_cascade_delete_through_whole_tree() {
        let mut a = alice();
        let removed = a.hierarchy.delete_user(a.user);

        assert_eq!(
            removed,
            Removed {
                users: 1,
                houses: 1,
                rooms: 1,
                devices: 1,
            }
        );
        assert!(a.hierarchy.users().is_empty());
        assert!(a.hierarchy.houses().is_empty());
        assert!(a.hierarchy.rooms().is_empty());
        assert!(a.hierarchy.devices().is_empty());
    }

    #[test]
    fn should_only_delete_owned_houses() {
        let mut a = alice();
        let bob = a.hierarchy.create_user(bob()).unwrap();
        let cabin = a
            .hierarchy
            .create_house(House::builder().name("Cabin").build().unwrap(), Some(bob))
            .unwrap();

        a.hierarchy.delete_user(a.user);

        assert_eq!(a.hierarchy.users().len(), 1);
        assert!(a.hierarchy.houses().contains(cabin));
        assert_eq!(a.hierarchy.houses().len(), 1);
        assert_consistent(&a.hierarchy);
    }

    #[test]
    fn should_be_noop_when_deleting_user_twice() {
        let mut a = alice();
        let bob = a.hierarchy.create_user(bob()).unwrap();
        a.hierarchy.delete_user(bob);

        let removed = a.hierarchy.delete_user(bob);

        assert!(removed.is_empty());
        assert_eq!(a.hierarchy.users().len(), 1);
        assert_eq!(a.hierarchy.houses().len(), 1);
        assert_consistent(&a.hierarchy);
    }

    #[test]
    fn should_nest_houses_in_record() {
        let a = alice();
        let user = a.hierarchy.user(a.user).unwrap();
        let record = a.hierarchy.user_record(user);

        assert_eq!(record.username, "alice123");
        assert_eq!(record.houses.len(), 1);
        assert_eq!(record.houses[0].name, "Alice's House");
        assert_eq!(record.houses[0].owner.as_deref(), Some("alice123"));
        assert_eq!(record.houses[0].rooms[0].devices[0].name, "Nest Thermostat");
    }

    #[test]
    fn should_reproduce_scalar_fields_on_blank_user() {
        let a = alice();
        let original = a.hierarchy.user_record(a.hierarchy.user(a.user).unwrap());

        let mut fresh = Hierarchy::new();
        let blank = fresh.create_blank_user().unwrap();
        fresh
            .update_user(
                blank,
                UserPatch {
                    name: Some(original.name.clone()),
                    username: Some(original.username.clone()),
                    phone: Some(original.phone.clone()),
                    privileges: Some(original.privileges.clone()),
                    email: Some(original.email.clone()),
                },
            )
            .unwrap();
        let copy = fresh.user_record(fresh.user(blank).unwrap());

        assert_eq!(
            copy,
            UserRecord {
                houses: Vec::new(),
                ..original
            }
        );
    }

    #[test]
    fn should_roundtrip_record_through_serde_json() {
        let a = alice();
        let record = a.hierarchy.user_record(a.hierarchy.user(a.user).unwrap());
        let json = serde_json::to_string(&record).unwrap();
        let parsed: UserRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
