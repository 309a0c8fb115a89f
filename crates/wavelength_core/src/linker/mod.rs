//! Mention linker: wraps entity mentions in prose with anchor tags.
//!
//! Terms are processed longest first. Before each scan the buffer's
//! protected spans are known: every complete `<a …>…</a>` element, every
//! HTML comment, and the inside of every other HTML tag. An occurrence touching a protected span is
//! left alone, so anchors produced earlier (in this pass or a previous one)
//! are opaque to later terms and no anchor ever lands inside an attribute.

use crate::catalog::Catalog;
use crate::models::{Entity, LinkKind};
use crate::text::{escape_attr, is_whole_word, next_char_boundary};
use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::sync::OnceLock;


fn anchor_element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a\s*>").expect("anchor pattern is valid"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"</?([A-Za-z][A-Za-z0-9-]*)(?:\s[^<>]*)?/?>").expect("tag pattern is valid")
    })
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<!--.*?-->|(?i:<!doctype\b[^<>]*>)").expect("comment pattern is valid")
    })
}

/// Element names recognised as markup. Anything else between `<` and `>`
/// is prose (`x<y then z>w`) and stays linkable.
const HTML_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "data", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt", "em",
    "embed", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd", "label",
    "legend", "li", "link", "main", "mark", "meta", "nav", "ol", "optgroup", "option", "p",
    "picture", "pre", "q", "s", "samp", "section", "select", "small", "source", "span",
    "strong", "sub", "summary", "sup", "table", "tbody", "td", "template", "textarea",
    "tfoot", "th", "thead", "time", "title", "tr", "u", "ul", "var", "video", "wbr",
];

/// Known HTML element, or a custom element (`lore-card`).
fn is_markup_tag(name: &str) -> bool {
    name.contains('-') || HTML_ELEMENTS.iter().any(|el| el.eq_ignore_ascii_case(name))
}

/// One anchor produced by a linking call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedMention {
    /// Source text that was wrapped, in its original casing.
    pub matched: String,
    /// Canonical name of the linked entity.
    pub entity: String,
    pub url: String,
    pub kind: LinkKind,
}

/// Linked text plus the mentions that were wrapped to produce it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub text: String,
    pub mentions: Vec<LinkedMention>,
}

/// A catalog applied with one link kind, as one step of [`link_passes`].
#[derive(Debug, Clone, Copy)]
pub struct LinkPass<'a> {
    pub catalog: &'a Catalog,
    pub kind: &'a LinkKind,
}

/// Byte ranges of `text` that must not receive new anchors.
///
/// Sorted by start offset. Anchor elements and individual tags may overlap.
pub(crate) fn protected_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = anchor_element_re()
        .find_iter(text)
        .map(|m| m.range())
        .collect();
    spans.extend(comment_re().find_iter(text).map(|m| m.range()));
    spans.extend(tag_re().captures_iter(text).filter_map(|caps| {
        let name = caps.get(1)?;
        if !is_markup_tag(name.as_str()) {
            return None;
        }
        caps.get(0).map(|tag| tag.range())
    }));
    spans.sort_by_key(|span| span.start);
    spans
}

fn overlaps_any(spans: &[Range<usize>], range: &Range<usize>) -> bool {
    spans
        .iter()
        .take_while(|span| span.start < range.end)
        .any(|span| range.start < span.end)
}

/// Whole-word, unprotected, non-overlapping occurrences of `pattern`,
/// left to right.
fn find_occurrences(text: &str, pattern: &Regex, spans: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos <= text.len() {
        let Some(m) = pattern.find_at(text, pos) else {
            break;
        };
        let range = m.range();
        if !range.is_empty() && is_whole_word(text, &range) && !overlaps_any(spans, &range) {
            pos = range.end;
            found.push(range);
        } else {
            // A rejected hit may hide an acceptable one starting inside it.
            pos = next_char_boundary(text, range.start);
        }
    }
    found
}

fn render_anchor(matched: &str, entity: &Entity, kind: &LinkKind) -> String {
    format!(
        r#"<a href="{}" class="{}" title="{}">{}</a>"#,
        escape_attr(&entity.url),
        kind.css_class(),
        escape_attr(&kind.title_for(&entity.name)),
        matched
    )
}

fn link_into(catalog: &Catalog, kind: &LinkKind, outcome: &mut LinkOutcome) {
    if outcome.text.is_empty() || catalog.is_empty() {
        return;
    }

    let mut spans = protected_spans(&outcome.text);
    for term in catalog.compiled_terms() {
        let occurrences = find_occurrences(&outcome.text, &term.pattern, &spans);
        if occurrences.is_empty() {
            continue;
        }

        let entity = catalog.entity_at(term.entity);
        if catalog.owner_count(&term.key) > 1 {
            tracing::debug!(
                "Ambiguous term {:?} linked to first registered entity {:?}",
                term.key,
                entity.name
            );
        }

        let mut mentions = Vec::with_capacity(occurrences.len());
        for range in occurrences.into_iter().rev() {
            let matched = outcome.text[range.clone()].to_string();
            let anchor = render_anchor(&matched, entity, kind);
            outcome.text.replace_range(range, &anchor);
            mentions.push(LinkedMention {
                matched,
                entity: entity.name.clone(),
                url: entity.url.clone(),
                kind: kind.clone(),
            });
        }
        mentions.reverse();
        tracing::debug!("Linked {} occurrence(s) of {:?}", mentions.len(), term.key);
        outcome.mentions.extend(mentions);

        // New anchors change both offsets and what is protected.
        spans = protected_spans(&outcome.text);
    }
}

impl Catalog {
    /// Wrap every unlinked mention of this catalog's terms in `text`.
    ///
    /// # Returns
    /// The annotated text; `text` unchanged when nothing matched.
    pub fn linkify(&self, text: &str, kind: &LinkKind) -> String {
        self.linkify_detailed(text, kind).text
    }

    /// Like [`Catalog::linkify`], also reporting each mention that was wrapped.
    pub fn linkify_detailed(&self, text: &str, kind: &LinkKind) -> LinkOutcome {
        let mut outcome = LinkOutcome {
            text: text.to_string(),
            mentions: Vec::new(),
        };
        link_into(self, kind, &mut outcome);
        outcome
    }
}

/// Link mentions of `entities` in `text`, styling every anchor as `kind`.
///
/// An empty `text` or catalog is a no-op. Builds a fresh [`Catalog`] per
/// call; keep a [`Catalog`] around and call [`Catalog::linkify`] when the
/// same entities are reused.
pub fn linkify(text: &str, entities: &[Entity], kind: impl Into<LinkKind>) -> String {
    if text.is_empty() || entities.is_empty() {
        return text.to_string();
    }
    Catalog::new(entities.to_vec()).linkify(text, &kind.into())
}

/// Run several linking passes in order over the same text.
///
/// Each pass treats anchors from earlier passes as already linked, so a term
/// claimed by an earlier pass is never wrapped again.
pub fn link_passes(text: &str, passes: &[LinkPass<'_>]) -> LinkOutcome {
    let mut outcome = LinkOutcome {
        text: text.to_string(),
        mentions: Vec::new(),
    };
    for pass in passes {
        let before = outcome.mentions.len();
        link_into(pass.catalog, pass.kind, &mut outcome);
        tracing::debug!(
            "{} pass produced {} link(s)",
            pass.kind,
            outcome.mentions.len() - before
        );
    }
    outcome
}
