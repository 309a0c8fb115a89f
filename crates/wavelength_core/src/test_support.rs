//! Shared test-only helpers for wavelength_core: entity builders and a
//! scoped environment for config tests.

use crate::models::{Entity, LinkKind};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Character entity at `/characters/<slug>`.
pub(crate) fn character(name: &str, keywords: &[&str]) -> Entity {
    Entity::new(name, format!("/characters/{}", slug(name)), LinkKind::Character)
        .with_keywords(keywords.iter().copied())
}

/// Lore entity at `/lore/<slug>`.
pub(crate) fn lore(name: &str, keywords: &[&str]) -> Entity {
    Entity::new(name, format!("/lore/{}", slug(name)), LinkKind::Lore)
        .with_keywords(keywords.iter().copied())
}

/// Episode entity at `/episodes/<slug>`.
pub(crate) fn episode(name: &str, keywords: &[&str]) -> Entity {
    Entity::new(name, format!("/episodes/{}", slug(name)), LinkKind::Episode)
        .with_keywords(keywords.iter().copied())
}

/// Count opening anchor tags in rendered output.
pub(crate) fn anchor_count(html: &str) -> usize {
    html.matches("<a ").count()
}

/// Exclusive, self-restoring view of the process environment.
///
/// Holds a process-wide lock for its whole lifetime because the harness runs
/// tests on parallel threads. Every variable it touched is put back on drop.
pub(crate) struct ScopedEnv {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    pub(crate) fn lock() -> Self {
        static LOCK: Mutex<()> = Mutex::new(());
        Self {
            saved: Vec::new(),
            _lock: LOCK.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    fn remember(&mut self, key: &'static str) {
        if !self.saved.iter().any(|(saved, _)| *saved == key) {
            self.saved.push((key, std::env::var(key).ok()));
        }
    }

    pub(crate) fn set(mut self, key: &'static str, value: &str) -> Self {
        self.remember(key);
        std::env::set_var(key, value);
        self
    }

    pub(crate) fn unset(mut self, key: &'static str) -> Self {
        self.remember(key);
        std::env::remove_var(key);
        self
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..) {
            match previous {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScopedEnv;

    #[test]
    fn scoped_env_restores_first_seen_value() {
        let key = "WAVELENGTH_TEST_SCOPED_ENV";
        {
            let _env = ScopedEnv::lock().set(key, "outer").set(key, "inner");
            assert_eq!(std::env::var(key).ok().as_deref(), Some("inner"));
        }
        assert!(std::env::var(key).is_err());
    }
}
