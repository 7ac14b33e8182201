//! # cadence-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small JSON API to schedule actions, read their history and
//!   status, and remove them (`/api/actions`, `/api/actions/{name}/…`)
//! - Map HTTP requests into [`Scheduler`](cadence_app::Scheduler) calls
//! - Map [`CadenceError`](cadence_domain::error::CadenceError) into status codes
//!
//! ## Dependency rule
//! Depends on `cadence-app` (for the scheduler handle) and `cadence-domain`
//! (for the wire types). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
