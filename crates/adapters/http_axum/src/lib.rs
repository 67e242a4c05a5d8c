//! # homestead-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** over the ownership hierarchy: `/users`, `/houses`,
//!   `/rooms` and `/devices`, each addressed by its identifying field
//! - Map request payloads into domain builders and patches (driving adapter)
//! - Map application results and [`HomesteadError`](homestead_domain::error::HomesteadError)s
//!   into HTTP responses
//!
//! ## Dependency rule
//! Depends on `homestead-app` (for the store port and services) and
//! `homestead-domain` (for the types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
