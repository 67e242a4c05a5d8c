//! # homestead-domain
//!
//! Pure domain model for the homestead home inventory.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Users**, who own **Houses**, which contain **Rooms**, which
//!   contain **Devices**
//! - Keep one [`registry::Registry`] per entity type, grouped in a
//!   [`hierarchy::Hierarchy`]
//! - Enforce the ownership invariants: bidirectional parent/child links,
//!   unique identifying fields, cascading deletes
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod registry;

pub mod device;
pub mod hierarchy;
pub mod house;
pub mod room;
pub mod user;
