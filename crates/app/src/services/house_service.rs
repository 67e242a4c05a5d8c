//! House service — use-cases for managing houses.

use homestead_domain::error::{HomesteadError, MissingDependencyError, NotFoundError};
use homestead_domain::hierarchy::{Hierarchy, Removed};
use homestead_domain::house::{House, HousePatch, HouseRecord};
use homestead_domain::id::{HouseId, UserId};
use homestead_domain::registry::Registered;
use homestead_domain::user::User;

use crate::ports::HierarchyStore;

/// Application service for house CRUD operations.
///
/// Owners are addressed by username; the service resolves them to ids
/// before handing off to the hierarchy.
pub struct HouseService<S> {
    store: S,
}

impl<S: HierarchyStore> HouseService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List all houses in registration order.
    pub async fn list_houses(&self) -> Vec<HouseRecord> {
        self.store
            .read(|h| h.houses().iter().map(|house| h.house_record(house)).collect())
            .await
    }

    /// Look up a house by name.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::NotFound`] when no house has `name`.
    #[tracing::instrument(skip(self))]
    pub async fn get_house(&self, name: &str) -> Result<HouseRecord, HomesteadError> {
        self.store
            .read(|h| {
                let house = h.find_house(name).ok_or_else(|| not_found(name))?;
                Ok::<_, HomesteadError>(h.house_record(house))
            })
            .await
    }

    /// Register a house owned by the user called `owner`.
    ///
    /// The name is checked before the owner, so a duplicate name is reported
    /// even when the owner is unknown too.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::Conflict`] when the name is taken.
    /// - [`HomesteadError::MissingDependency`] when no user has `owner`.
    #[tracing::instrument(skip(self, house), fields(name = %house.name))]
    pub async fn create_house(
        &self,
        house: House,
        owner: &str,
    ) -> Result<HouseRecord, HomesteadError> {
        self.store
            .write(move |h| {
                h.houses().ensure_key_free(&house.name, None)?;
                let owner = resolve_owner(h, owner)?;
                let id = h.create_house(house, Some(owner))?;
                record(h, id)
            })
            .await
    }

    /// Apply a partial update to the house called `name`, moving it to the
    /// user called `owner` when one is given.
    ///
    /// Nothing is modified when an error is returned.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::NotFound`] when no house has `name`.
    /// - [`HomesteadError::Conflict`] when renaming onto a taken name.
    /// - [`HomesteadError::MissingDependency`] when no user has `owner`.
    /// - [`HomesteadError::Validation`] when renaming to an empty name.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_house(
        &self,
        name: &str,
        mut patch: HousePatch,
        owner: Option<&str>,
    ) -> Result<HouseRecord, HomesteadError> {
        self.store
            .write(move |h| {
                let id = h.find_house(name).ok_or_else(|| not_found(name))?.id;
                if let Some(new_name) = patch.name.as_deref() {
                    h.houses().ensure_key_free(new_name, Some(id))?;
                }
                if let Some(owner) = owner {
                    patch.owner = Some(resolve_owner(h, owner)?);
                }
                h.update_house(id, patch)?;
                record(h, id)
            })
            .await
    }

    /// Delete the house called `name` with its rooms and devices.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::NotFound`] when no house has `name`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_house(&self, name: &str) -> Result<Removed, HomesteadError> {
        let removed = self
            .store
            .write(|h| {
                let id = h.find_house(name).ok_or_else(|| not_found(name))?.id;
                Ok::<_, HomesteadError>(h.delete_house(id))
            })
            .await?;
        tracing::info!(
            rooms = removed.rooms,
            devices = removed.devices,
            "house deleted"
        );
        Ok(removed)
    }
}

/// An empty username never names an owner, even when a blank user exists.
fn resolve_owner(h: &Hierarchy, username: &str) -> Result<UserId, MissingDependencyError> {
    h.find_user(username)
        .filter(|_| !username.is_empty())
        .map(|user| user.id)
        .ok_or_else(|| MissingDependencyError {
            entity: House::KIND,
            dependency: User::KIND,
            key: username.to_string(),
        })
}

fn record(h: &Hierarchy, id: HouseId) -> Result<HouseRecord, HomesteadError> {
    let house = h.house(id).ok_or_else(|| not_found(&id.to_string()))?;
    Ok(h.house_record(house))
}

fn not_found(name: &str) -> NotFoundError {
    NotFoundError {
        entity: House::KIND,
        key: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user_service::UserService;
    use crate::store::InMemoryHierarchyStore;
    use std::sync::Arc;

    struct Fixture {
        users: UserService<Arc<InMemoryHierarchyStore>>,
        houses: HouseService<Arc<InMemoryHierarchyStore>>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryHierarchyStore::new());
        let users = UserService::new(Arc::clone(&store));
        let houses = HouseService::new(store);
        for username in ["alice123", "bob"] {
            users
                .create_user(User::builder().username(username).build().unwrap())
                .await
                .unwrap();
        }
        Fixture { users, houses }
    }

    fn house(name: &str) -> House {
        House::builder()
            .name(name)
            .address("123 Main St")
            .gps("40.7128, -74.0060")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_house_and_link_owner() {
        let f = fixture().await;
        let created = f
            .houses
            .create_house(house("Alice's House"), "alice123")
            .await
            .unwrap();

        assert_eq!(created.owner.as_deref(), Some("alice123"));
        let owner = f.users.get_user("alice123").await.unwrap();
        assert_eq!(owner.houses, [created]);
    }

    #[tokio::test]
    async fn should_return_missing_dependency_when_owner_unknown() {
        let f = fixture().await;
        let result = f.houses.create_house(house("Nowhere"), "ghost").await;

        assert!(matches!(result, Err(HomesteadError::MissingDependency(_))));
        assert!(f.houses.list_houses().await.is_empty());
    }

    #[tokio::test]
    async fn should_report_conflict_before_missing_owner() {
        let f = fixture().await;
        f.houses
            .create_house(house("Alice's House"), "alice123")
            .await
            .unwrap();

        let result = f.houses.create_house(house("Alice's House"), "ghost").await;
        assert!(matches!(result, Err(HomesteadError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_not_resolve_empty_owner_to_blank_user() {
        let store = Arc::new(InMemoryHierarchyStore::new());
        store.write(Hierarchy::create_blank_user).await.unwrap();
        let houses = HouseService::new(store);

        let result = houses.create_house(house("Limbo"), "").await;
        assert!(matches!(result, Err(HomesteadError::MissingDependency(_))));
    }

    #[tokio::test]
    async fn should_move_house_to_new_owner() {
        let f = fixture().await;
        f.houses
            .create_house(house("Alice's House"), "alice123")
            .await
            .unwrap();

        let moved = f
            .houses
            .update_house("Alice's House", HousePatch::default(), Some("bob"))
            .await
            .unwrap();

        assert_eq!(moved.owner.as_deref(), Some("bob"));
        assert!(f.users.get_user("alice123").await.unwrap().houses.is_empty());
        assert_eq!(f.users.get_user("bob").await.unwrap().houses.len(), 1);
    }

    #[tokio::test]
    async fn should_leave_house_untouched_when_new_owner_unknown() {
        let f = fixture().await;
        f.houses
            .create_house(house("Alice's House"), "alice123")
            .await
            .unwrap();

        let result = f
            .houses
            .update_house(
                "Alice's House",
                HousePatch {
                    address: Some("elsewhere".to_string()),
                    ..HousePatch::default()
                },
                Some("ghost"),
            )
            .await;

        assert!(matches!(result, Err(HomesteadError::MissingDependency(_))));
        let house = f.houses.get_house("Alice's House").await.unwrap();
        assert_eq!(house.address, "123 Main St");
        assert_eq!(house.owner.as_deref(), Some("alice123"));
    }

    #[tokio::test]
    async fn should_return_conflict_when_renaming_onto_taken_name() {
        let f = fixture().await;
        f.houses
            .create_house(house("Alice's House"), "alice123")
            .await
            .unwrap();
        f.houses
            .create_house(house("Bob's House"), "bob")
            .await
            .unwrap();

        let result = f
            .houses
            .update_house(
                "Bob's House",
                HousePatch {
                    name: Some("Alice's House".to_string()),
                    ..HousePatch::default()
                },
                Some("ghost"),
            )
            .await;

        assert!(matches!(result, Err(HomesteadError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_house() {
        let f = fixture().await;
        let result = f
            .houses
            .update_house("ghost", HousePatch::default(), None)
            .await;
        assert!(matches!(result, Err(HomesteadError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_house_and_unlink_owner() {
        let f = fixture().await;
        f.houses
            .create_house(house("Alice's House"), "alice123")
            .await
            .unwrap();

        let removed = f.houses.delete_house("Alice's House").await.unwrap();

        assert_eq!(removed.houses, 1);
        assert!(f.users.get_user("alice123").await.unwrap().houses.is_empty());
        let again = f.houses.delete_house("Alice's House").await;
        assert!(matches!(again, Err(HomesteadError::NotFound(_))));
    }
}
