//! # homestead-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** adapters and the composition root rely on:
//!   - `HierarchyStore` — serialized read/write access to the hierarchy
//! - Define **driving/inbound ports** as use-case structs:
//!   - `UserService`, `HouseService`, `RoomService`, `DeviceService` —
//!     list, get, create, update, delete by identifying field
//! - Provide **in-process infrastructure** (the in-memory store) that doesn't
//!   need IO
//! - Orchestrate domain objects without knowing *how* requests arrive
//!
//! ## Dependency rule
//! Depends on `homestead-domain` only (plus `tokio::sync` for the store lock).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod store;
