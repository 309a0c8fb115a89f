//! Shared constants used across Wavelength crates.

/// Link kind applied when neither the caller nor the environment picks one.
pub const DEFAULT_LINK_KIND: &str = "lore";

/// Default lifetime of a cached catalog, in seconds.
pub const DEFAULT_CATALOG_TTL_SECS: u64 = 300;

/// Environment variable overriding [`DEFAULT_LINK_KIND`].
pub const ENV_DEFAULT_KIND: &str = "WAVELENGTH_DEFAULT_KIND";
/// Environment variable overriding [`DEFAULT_CATALOG_TTL_SECS`].
pub const ENV_CATALOG_TTL_SECS: &str = "WAVELENGTH_CATALOG_TTL_SECS";
/// Boolean flag toggling the catalog cache.
pub const ENV_CATALOG_CACHE: &str = "WAVELENGTH_CATALOG_CACHE";

/// Default tracing filter for binaries when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "wavelength_core=info,wlore=info";
