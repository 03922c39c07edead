//! Entity kinds of the hbnb object model.
//!
//! Every kind embeds a [`BaseModel`] (identity + timestamps) and declares a fixed set of
//! typed attributes. [`ModelKind`] is the closed registry of kinds; [`Model`] is the tagged
//! value the store holds.

#[macro_use]
mod macros;

pub mod amenity;
pub mod attr;
pub mod base_model;
pub mod city;
pub mod place;
pub mod registry;
pub mod review;
pub mod state;
pub mod user;

pub use amenity::Amenity;
pub use attr::{AttrType, FieldValue};
pub use base_model::{BaseModel, CLASS_TAG, PROTECTED_FIELDS, is_protected};
pub use city::City;
pub use place::Place;
pub use registry::{Model, ModelKind};
pub use review::Review;
pub use state::State;
pub use user::User;
