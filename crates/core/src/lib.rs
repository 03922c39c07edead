//! `hbnb-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no persistence, no console).

pub mod entity;
pub mod error;
pub mod id;
pub mod repr;
pub mod timestamp;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{EntityId, storage_key};
