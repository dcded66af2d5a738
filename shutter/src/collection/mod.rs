//! Typed document collections.
//!
//! A collection owns the canonical in-memory copy of every document of one
//! declared kind. Callers receive clones, never references into the index,
//! so the only way to mutate stored state is through [`Collection::insert`],
//! [`Collection::update`] and [`Collection::delete`].

mod collection;
mod entity;
mod factory;
mod id_generator;

pub use collection::*;
pub use entity::*;
pub(crate) use factory::*;
pub use id_generator::*;
