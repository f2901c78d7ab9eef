//! Finboard is the domain layer behind a family of finance tracking apps
//! (Personal, MEI and Diarista).
//!
//! This library provides the typed entity models and their validation, the
//! service adapter boundary used for persistence, the controllers that turn
//! user intent into adapter calls and notifications, and the dependency
//! container that wires them together.

#![warn(missing_docs)]

pub mod adapter;
pub mod alert;
pub mod app;
pub mod config;
pub mod container;
pub mod controller;
mod error;
mod id;
pub mod logging;
pub mod models;
pub mod outcome;
pub mod schema;
pub mod summary;

#[cfg(test)]
mod test_utils;

pub use app::{App, build_container};
pub use config::{AppConfig, Backend, Variant};
pub use container::Container;
pub use error::Error;
pub use id::EntityId;
pub use outcome::{Outcome, OutcomeKind};
pub use schema::{Validate, ValidationErrors};
