//! Entity and link-kind models shared by the catalog and the linker.

use crate::text::normalize_term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag selecting link styling and title wording.
///
/// Unknown tags are kept as [`LinkKind::Other`] and render like lore links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkKind {
    Character,
    #[default]
    Lore,
    Episode,
    Other(String),
}

impl LinkKind {
    /// Tag string for this kind (`character`, `lore`, `episode`, or the
    /// original unknown tag).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Character => "character",
            Self::Lore => "lore",
            Self::Episode => "episode",
            Self::Other(tag) => tag.as_str(),
        }
    }

    /// CSS class put on anchors produced for this kind.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Character => "character-link",
            Self::Episode => "episode-link",
            Self::Lore | Self::Other(_) => "lore-link",
        }
    }

    /// Human-readable `title` attribute for a link to `name`.
    pub fn title_for(&self, name: &str) -> String {
        match self {
            Self::Character => format!("View {}'s character page", name),
            Self::Episode => format!("Watch {}", name),
            Self::Lore | Self::Other(_) => format!("Learn about {}", name),
        }
    }
}

impl From<&str> for LinkKind {
    fn from(tag: &str) -> Self {
        let trimmed = tag.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "character" => Self::Character,
            "lore" => Self::Lore,
            "episode" => Self::Episode,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for LinkKind {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<LinkKind> for String {
    fn from(kind: LinkKind) -> Self {
        match kind {
            LinkKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A linkable target: a character, lore item, or episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Canonical display name, also the primary search term.
    pub name: String,
    /// Extra aliases resolving to this entity, in priority order.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Link destination.
    pub url: String,
    #[serde(default)]
    pub kind: LinkKind,
}

impl Entity {
    /// Create an entity with no aliases.
    pub fn new(name: impl Into<String>, url: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
            url: url.into(),
            kind,
        }
    }

    /// Builder-style alias list.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Name followed by keywords, trimmed, with blank terms skipped.
    ///
    /// Terms keep their original casing; callers lower-case for lookup.
    pub fn search_terms(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.name.as_str())
            .chain(self.keywords.iter().map(String::as_str))
            .filter_map(normalize_term)
    }
}
