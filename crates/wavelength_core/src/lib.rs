//! Core library for Wavelength Lore mention linking (catalogs, linker,
//! caching, config).

/// Keyed TTL cache for loaded catalogs.
pub mod cache;
/// Entity catalogs and their term index.
pub mod catalog;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Error types for catalog loading and shared state.
pub mod error;
/// Mention linking over prose and HTML fragments.
pub mod linker;
/// Entity and link-kind models.
pub mod models;
/// Term and HTML attribute text helpers.
pub mod text;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{CatalogCache, TtlCache};
pub use catalog::Catalog;
pub use config::Config;
pub use constants::DEFAULT_LINK_KIND;
pub use error::LinkerError;
pub use linker::{link_passes, linkify, LinkOutcome, LinkPass, LinkedMention};
pub use models::{Entity, LinkKind};
