//! User service — use-cases for managing users.

use homestead_domain::error::{HomesteadError, NotFoundError};
use homestead_domain::hierarchy::{Hierarchy, Removed};
use homestead_domain::id::UserId;
use homestead_domain::registry::Registered;
use homestead_domain::user::{User, UserPatch, UserRecord};

use crate::ports::HierarchyStore;

/// Application service for user CRUD operations.
pub struct UserService<S> {
    store: S,
}

impl<S: HierarchyStore> UserService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List all users in registration order, each with its houses nested.
    pub async fn list_users(&self) -> Vec<UserRecord> {
        self.store
            .read(|h| h.users().iter().map(|user| h.user_record(user)).collect())
            .await
    }

    /// Look up a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::NotFound`] when no user has `username`.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, username: &str) -> Result<UserRecord, HomesteadError> {
        self.store
            .read(|h| {
                let user = h.find_user(username).ok_or_else(|| not_found(username))?;
                Ok::<_, HomesteadError>(h.user_record(user))
            })
            .await
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::Conflict`] when the username is taken.
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create_user(&self, user: User) -> Result<UserRecord, HomesteadError> {
        self.store
            .write(move |h| {
                let id = h.create_user(user)?;
                record(h, id)
            })
            .await
    }

    /// Apply a partial update to the user called `username`.
    ///
    /// # Errors
    ///
    /// - [`HomesteadError::NotFound`] when no user has `username`.
    /// - [`HomesteadError::Conflict`] when renaming onto a taken username.
    /// - [`HomesteadError::Validation`] when renaming to an empty username.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_user(
        &self,
        username: &str,
        patch: UserPatch,
    ) -> Result<UserRecord, HomesteadError> {
        self.store
            .write(move |h| {
                let id = h.find_user(username).ok_or_else(|| not_found(username))?.id;
                h.update_user(id, patch)?;
                record(h, id)
            })
            .await
    }

    /// Delete the user called `username` together with everything it owns.
    ///
    /// # Errors
    ///
    /// Returns [`HomesteadError::NotFound`] when no user has `username`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, username: &str) -> Result<Removed, HomesteadError> {
        let removed = self
            .store
            .write(|h| {
                let id = h.find_user(username).ok_or_else(|| not_found(username))?.id;
                Ok::<_, HomesteadError>(h.delete_user(id))
            })
            .await?;
        tracing::info!(
            houses = removed.houses,
            rooms = removed.rooms,
            devices = removed.devices,
            "user deleted"
        );
        Ok(removed)
    }
}

fn record(h: &Hierarchy, id: UserId) -> Result<UserRecord, HomesteadError> {
    let user = h.user(id).ok_or_else(|| not_found(&id.to_string()))?;
    Ok(h.user_record(user))
}

fn not_found(username: &str) -> NotFoundError {
    NotFoundError {
        entity: User::KIND,
        key: username.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::house_service::HouseService;
    use crate::store::InMemoryHierarchyStore;
    use homestead_domain::house::House;
    use std::sync::Arc;

    fn make_service() -> UserService<Arc<InMemoryHierarchyStore>> {
        UserService::new(Arc::new(InMemoryHierarchyStore::new()))
    }

    fn alice() -> User {
        User::builder()
            .name("Alice")
            .username("alice123")
            .phone("555-9999")
            .privileges("user")
            .email("alice@mail.com")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_user_when_valid() {
        let svc = make_service();
        let created = svc.create_user(alice()).await.unwrap();
        assert_eq!(created.username, "alice123");
        assert_eq!(created.name, "Alice");
        assert!(created.houses.is_empty());

        let fetched = svc.get_user("alice123").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn should_return_conflict_when_username_taken() {
        let svc = make_service();
        svc.create_user(alice()).await.unwrap();
        let result = svc.create_user(alice()).await;
        assert!(matches!(result, Err(HomesteadError::Conflict(_))));
        assert_eq!(svc.list_users().await.len(), 1);
    }

    #[tokio::test]
    async fn should_return_not_found_when_user_missing() {
        let svc = make_service();
        let result = svc.get_user("ghost").await;
        assert!(matches!(result, Err(HomesteadError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_users_in_registration_order() {
        let svc = make_service();
        svc.create_user(User::builder().username("zoe").build().unwrap())
            .await
            .unwrap();
        svc.create_user(alice()).await.unwrap();

        let names: Vec<_> = svc
            .list_users()
            .await
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["zoe", "alice123"]);
    }

    #[tokio::test]
    async fn should_update_only_provided_fields() {
        let svc = make_service();
        svc.create_user(alice()).await.unwrap();

        let updated = svc
            .update_user(
                "alice123",
                UserPatch {
                    phone: Some("555-0000".to_string()),
                    privileges: Some("admin".to_string()),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone, "555-0000");
        assert_eq!(updated.privileges, "admin");
        assert_eq!(updated.email, "alice@mail.com");
    }

    #[tokio::test]
    async fn should_rename_user_and_keep_houses() {
        let store = Arc::new(InMemoryHierarchyStore::new());
        let users = UserService::new(Arc::clone(&store));
        let houses = HouseService::new(Arc::clone(&store));
        users.create_user(alice()).await.unwrap();
        houses
            .create_house(House::builder().name("Beach House").build().unwrap(), "alice123")
            .await
            .unwrap();

        users
            .update_user(
                "alice123",
                UserPatch {
                    username: Some("alice".to_string()),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();

        let house = houses.get_house("Beach House").await.unwrap();
        assert_eq!(house.owner.as_deref(), Some("alice"));
        assert!(users.get_user("alice123").await.is_err());
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_user() {
        let svc = make_service();
        let result = svc.update_user("ghost", UserPatch::default()).await;
        assert!(matches!(result, Err(HomesteadError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_user() {
        let svc = make_service();
        svc.create_user(alice()).await.unwrap();

        let removed = svc.delete_user("alice123").await.unwrap();
        assert_eq!(removed.users, 1);

        let result = svc.get_user("alice123").await;
        assert!(matches!(result, Err(HomesteadError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_user() {
        let svc = make_service();
        let result = svc.delete_user("ghost").await;
        assert!(matches!(result, Err(HomesteadError::NotFound(_))));
    }
}
