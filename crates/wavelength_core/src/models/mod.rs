//! Linkable content models.

pub mod entity;

#[cfg(test)]
mod tests;

pub use entity::{Entity, LinkKind};
