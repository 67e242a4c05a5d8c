//! Application services — use-case implementations.
//!
//! Each service struct accepts a [`HierarchyStore`](crate::ports::HierarchyStore)
//! via a generic parameter (constructor injection), keeping this layer
//! decoupled from the concrete store. Every use-case runs as a single store
//! transaction: lookups, precondition checks and the mutation happen under the
//! same lock.

pub mod device_service;
pub mod house_service;
pub mod room_service;
pub mod user_service;
