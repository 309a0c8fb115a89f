//! Term index over a catalog of linkable entities.
//!
//! Every entity contributes its name and keywords as search terms. Terms are
//! compared case-insensitively; when two entities share a term the one
//! registered first owns it for linking, and later owners are only kept for
//! diagnostics (see [`Catalog::ambiguous_terms`]).

use crate::error::LinkerError;
use crate::models::{Entity, LinkKind};
use crate::text::normalize_term;
use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone)]
struct TermOwner {
    entity: usize,
    original: String,
}

/// One compiled search term, owned by its first-registered entity.
#[derive(Debug)]
pub(crate) struct Term {
    pub(crate) key: String,
    pub(crate) entity: usize,
    pub(crate) pattern: Regex,
    char_len: usize,
}

/// Read-only view of an indexed term.
#[derive(Debug, Clone, Copy)]
pub struct TermView<'a> {
    /// Lower-cased lookup key.
    pub key: &'a str,
    /// Term as written by the owning entity.
    pub original: &'a str,
    /// Entity every occurrence of this term links to.
    pub entity: &'a Entity,
}

/// A term claimed by more than one entity.
#[derive(Debug, Clone)]
pub struct AmbiguousTerm<'a> {
    pub key: &'a str,
    /// Owners in registration order; the first one wins.
    pub entities: Vec<&'a Entity>,
}

/// Entities plus their compiled term index, ordered for linking.
#[derive(Debug)]
pub struct Catalog {
    entities: Vec<Entity>,
    owners: HashMap<String, Vec<TermOwner>>,
    terms: Vec<Term>,
}

/// Case-insensitive literal pattern for a term as written.
///
/// Built from the written form, not the lookup key: lower-casing can change
/// the character sequence (`İ` becomes `i` plus a combining dot) and simple
/// case folding cannot map it back.
fn term_pattern(term: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
}

impl Catalog {
    /// Build the term index for `entities`, preserving registration order.
    ///
    /// Terms are sorted longest first (by character count of the term as
    /// written by its owner); equal lengths
    /// keep registration order. A term whose pattern fails to compile is
    /// logged and left out.
    pub fn new(entities: Vec<Entity>) -> Self {
        let mut owners: HashMap<String, Vec<TermOwner>> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for (index, entity) in entities.iter().enumerate() {
            for term in entity.search_terms() {
                let key = term.to_lowercase();
                let slot = owners.entry(key.clone()).or_default();
                if slot.is_empty() {
                    first_seen.push(key);
                } else if slot.iter().any(|owner| owner.entity == index) {
                    continue;
                }
                slot.push(TermOwner {
                    entity: index,
                    original: term.to_string(),
                });
            }
        }

        let mut terms = Vec::with_capacity(first_seen.len());
        for key in first_seen {
            let Some(owner) = owners.get(&key).and_then(|slot| slot.first()) else {
                continue;
            };
            match term_pattern(&owner.original) {
                Ok(pattern) => terms.push(Term {
                    char_len: owner.original.chars().count(),
                    entity: owner.entity,
                    key,
                    pattern,
                }),
                Err(err) => {
                    tracing::warn!("Skipping term {:?}: pattern build failed: {}", key, err);
                }
            }
        }
        terms.sort_by_key(|term| Reverse(term.char_len));

        Self {
            entities,
            owners,
            terms,
        }
    }

    /// Entities in registration order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub(crate) fn compiled_terms(&self) -> &[Term] {
        &self.terms
    }

    pub(crate) fn entity_at(&self, index: usize) -> &Entity {
        &self.entities[index]
    }

    /// Number of entities sharing `key`; `0` for unknown keys.
    pub(crate) fn owner_count(&self, key: &str) -> usize {
        self.owners.get(key).map(Vec::len).unwrap_or(0)
    }

    /// Terms in the order the linker processes them.
    pub fn terms(&self) -> impl Iterator<Item = TermView<'_>> + '_ {
        self.terms.iter().filter_map(|term| {
            let owner = self.owners.get(&term.key)?.first()?;
            Some(TermView {
                key: term.key.as_str(),
                original: owner.original.as_str(),
                entity: &self.entities[term.entity],
            })
        })
    }

    /// Entity a term links to, matching case-insensitively.
    ///
    /// # Returns
    /// The first-registered owner of `term`, or `None` when no entity claims it.
    pub fn resolve(&self, term: &str) -> Option<&Entity> {
        let key = normalize_term(term)?.to_lowercase();
        let owner = self.owners.get(&key)?.first()?;
        Some(&self.entities[owner.entity])
    }

    /// Terms claimed by more than one entity, in processing order.
    pub fn ambiguous_terms(&self) -> Vec<AmbiguousTerm<'_>> {
        self.terms
            .iter()
            .filter_map(|term| {
                let slot = self.owners.get(&term.key)?;
                if slot.len() < 2 {
                    return None;
                }
                Some(AmbiguousTerm {
                    key: term.key.as_str(),
                    entities: slot
                        .iter()
                        .map(|owner| &self.entities[owner.entity])
                        .collect(),
                })
            })
            .collect()
    }
}

/// Group entities by kind, keeping first-appearance order of kinds and
/// registration order within each group.
pub fn partition_by_kind(entities: Vec<Entity>) -> Vec<(LinkKind, Vec<Entity>)> {
    let mut groups: Vec<(LinkKind, Vec<Entity>)> = Vec::new();
    for entity in entities {
        match groups.iter_mut().find(|(kind, _)| *kind == entity.kind) {
            Some((_, group)) => group.push(entity),
            None => groups.push((entity.kind.clone(), vec![entity])),
        }
    }
    groups
}

fn validate_entities(entities: &[Entity]) -> Result<(), LinkerError> {
    for (index, entity) in entities.iter().enumerate() {
        let reason = if entity.name.trim().is_empty() {
            "name is blank"
        } else if entity.url.trim().is_empty() {
            "url is blank"
        } else {
            continue;
        };
        return Err(LinkerError::InvalidEntity {
            index,
            reason: reason.to_string(),
        });
    }
    Ok(())
}

/// Parse a JSON array of entities.
///
/// # Errors
/// Returns [`LinkerError::Parse`] for malformed JSON and
/// [`LinkerError::InvalidEntity`] when an entity has a blank name or url.
pub fn parse_entities(json: &str) -> Result<Vec<Entity>, LinkerError> {
    let entities: Vec<Entity> = serde_json::from_str(json)?;
    validate_entities(&entities)?;
    Ok(entities)
}

/// Read and parse a catalog file.
///
/// # Errors
/// Returns [`LinkerError::Io`] when the file cannot be read, otherwise the
/// errors of [`parse_entities`].
pub fn load_entities(path: &Path) -> Result<Vec<Entity>, LinkerError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LinkerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entities = parse_entities(&raw)?;
    tracing::debug!("Loaded {} entities from {}", entities.len(), path.display());
    Ok(entities)
}
