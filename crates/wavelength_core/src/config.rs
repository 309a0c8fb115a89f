//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_CATALOG_TTL_SECS, DEFAULT_LINK_KIND, ENV_CATALOG_CACHE, ENV_CATALOG_TTL_SECS,
    ENV_DEFAULT_KIND,
};
use crate::models::LinkKind;
use std::env;
use std::time::Duration;

/// Runtime configuration for linking front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Kind used for a pass when the caller does not name one.
    pub default_kind: LinkKind,
    /// How long a loaded catalog stays valid in the catalog cache.
    pub catalog_ttl: Duration,
    /// Whether loaded catalogs are cached at all.
    pub catalog_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_kind: LinkKind::from(DEFAULT_LINK_KIND),
            catalog_ttl: Duration::from_secs(DEFAULT_CATALOG_TTL_SECS),
            catalog_cache: true,
        }
    }
}

/// Interpret a switch value such as `WAVELENGTH_CATALOG_CACHE=off`.
///
/// `1`, `true`, `yes` and `on` switch on; `0`, `false`, `no`, `off` and an
/// empty value switch off. Case and surrounding whitespace are ignored, and
/// anything else yields `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    const ON: [&str; 4] = ["1", "true", "yes", "on"];
    const OFF: [&str; 4] = ["0", "false", "no", "off"];
    let value = value.trim();
    if value.is_empty() || OFF.iter().any(|off| off.eq_ignore_ascii_case(value)) {
        Some(false)
    } else if ON.iter().any(|on| on.eq_ignore_ascii_case(value)) {
        Some(true)
    } else {
        None
    }
}

/// Read a boolean flag from the environment, falling back to `default` when
/// the variable is missing or unrecognized.
pub fn env_flag_or(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => parse_env_flag(&value).unwrap_or_else(|| {
            tracing::warn!("Unrecognized value {:?} for {}, using {}", value, name, default);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_kind: env::var(ENV_DEFAULT_KIND)
                .ok()
                .filter(|kind| !kind.trim().is_empty())
                .map(|kind| LinkKind::from(kind.as_str()))
                .unwrap_or(defaults.default_kind),
            catalog_ttl: env::var(ENV_CATALOG_TTL_SECS)
                .ok()
                .and_then(|secs| secs.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.catalog_ttl),
            catalog_cache: env_flag_or(ENV_CATALOG_CACHE, defaults.catalog_cache),
        }
    }

    /// TTL to hand to the catalog cache; zero when caching is disabled.
    pub fn effective_catalog_ttl(&self) -> Duration {
        if self.catalog_cache {
            self.catalog_ttl
        } else {
            Duration::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::constants::{
        DEFAULT_CATALOG_TTL_SECS, ENV_CATALOG_CACHE, ENV_CATALOG_TTL_SECS, ENV_DEFAULT_KIND,
    };
    use crate::models::LinkKind;
    use crate::test_support::ScopedEnv;
    use std::time::Duration;

    #[test]
    fn catalog_cache_switch_controls_effective_ttl() {
        let default_ttl = Duration::from_secs(DEFAULT_CATALOG_TTL_SECS);
        let cases = [
            ("on", default_ttl),
            (" YES ", default_ttl),
            ("1", default_ttl),
            ("off", Duration::ZERO),
            ("False", Duration::ZERO),
            ("0", Duration::ZERO),
            ("", Duration::ZERO),
            // Unrecognized values keep the cache on.
            ("sometimes", default_ttl),
        ];
        for (value, expected) in cases {
            let _env = ScopedEnv::lock()
                .unset(ENV_CATALOG_TTL_SECS)
                .set(ENV_CATALOG_CACHE, value);
            assert_eq!(
                Config::from_env().effective_catalog_ttl(),
                expected,
                "{}={:?}",
                ENV_CATALOG_CACHE,
                value
            );
        }
    }

    #[test]
    fn disabled_cache_wins_over_explicit_ttl() {
        let _env = ScopedEnv::lock()
            .set(ENV_CATALOG_TTL_SECS, "600")
            .set(ENV_CATALOG_CACHE, "no");
        let config = Config::from_env();
        assert_eq!(config.catalog_ttl, Duration::from_secs(600));
        assert_eq!(config.effective_catalog_ttl(), Duration::ZERO);
    }

    #[test]
    fn from_env_uses_defaults_when_unset() {
        let _env = ScopedEnv::lock()
            .unset(ENV_DEFAULT_KIND)
            .unset(ENV_CATALOG_TTL_SECS)
            .unset(ENV_CATALOG_CACHE);

        assert_eq!(Config::from_env(), Config::default());
    }

    #[test]
    fn from_env_reads_kind_and_ttl() {
        let _env = ScopedEnv::lock()
            .set(ENV_DEFAULT_KIND, "Character")
            .set(ENV_CATALOG_TTL_SECS, " 42 ")
            .unset(ENV_CATALOG_CACHE);

        let config = Config::from_env();
        assert_eq!(config.default_kind, LinkKind::Character);
        assert_eq!(config.effective_catalog_ttl(), Duration::from_secs(42));
    }

    #[test]
    fn from_env_ignores_garbage_values() {
        let _env = ScopedEnv::lock()
            .set(ENV_DEFAULT_KIND, "   ")
            .set(ENV_CATALOG_TTL_SECS, "soon")
            .set(ENV_CATALOG_CACHE, "sometimes");

        assert_eq!(Config::from_env(), Config::default());
    }
}
