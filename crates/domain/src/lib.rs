//! # cadence-domain
//!
//! Pure domain model for the cadence scheduled-action engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Actions** (named, repeatable step sequences with a repeat policy)
//! - Define **Steps** (typed units of work) and their **results**
//! - Define **Run history** (bounded, newest-first execution records + counters)
//! - Define **Gesture requests** decoded from step payloads
//! - Contain all invariant enforcement (validation, eviction, termination)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod action;
pub mod gesture;
pub mod hierarchy;
pub mod history;
pub mod step;
