//! Model-level unit tests.

use super::{Entity, LinkKind};

#[test]
fn link_kind_parses_known_tags_case_insensitively() {
    let cases = [
        ("character", LinkKind::Character),
        ("Character", LinkKind::Character),
        (" LORE ", LinkKind::Lore),
        ("episode", LinkKind::Episode),
        ("forum", LinkKind::Other("forum".to_string())),
    ];
    for (tag, expected) in cases {
        assert_eq!(LinkKind::from(tag), expected, "tag: {tag}");
    }
}

#[test]
fn link_kind_class_and_title_matrix() {
    let cases = [
        (
            LinkKind::Character,
            "character-link",
            "View Ossian's character page",
        ),
        (LinkKind::Lore, "lore-link", "Learn about Ossian"),
        (LinkKind::Episode, "episode-link", "Watch Ossian"),
        (
            LinkKind::Other("forum".to_string()),
            "lore-link",
            "Learn about Ossian",
        ),
    ];
    for (kind, class, title) in cases {
        assert_eq!(kind.css_class(), class, "kind: {kind}");
        assert_eq!(kind.title_for("Ossian"), title, "kind: {kind}");
    }
}

#[test]
fn entity_deserializes_with_defaults() {
    let entity: Entity =
        serde_json::from_str(r#"{"name":"Misery","url":"/lore/misery"}"#).expect("parse");
    assert_eq!(entity.name, "Misery");
    assert!(entity.keywords.is_empty());
    assert_eq!(entity.kind, LinkKind::Lore);
}

#[test]
fn entity_kind_serializes_as_tag() {
    let entity = Entity::new("Kai", "/characters/kai", LinkKind::Character);
    let value = serde_json::to_value(&entity).expect("serialize");
    assert_eq!(value["kind"], "character");

    let unknown: Entity =
        serde_json::from_str(r#"{"name":"Thread","url":"/forum/1","kind":"forum"}"#)
            .expect("parse");
    assert_eq!(serde_json::to_value(&unknown).expect("serialize")["kind"], "forum");
}

#[test]
fn search_terms_skip_blank_and_trim() {
    let entity = Entity::new(" Misery of Goblins ", "/lore/misery", LinkKind::Lore)
        .with_keywords(["", "  goblin horde ", "   ", "Misery"]);
    let terms: Vec<&str> = entity.search_terms().collect();
    assert_eq!(terms, vec!["Misery of Goblins", "goblin horde", "Misery"]);
}
