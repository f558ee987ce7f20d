//! Deck snapshot normalization.
//!
//! A room is seeded from a frozen copy of a deck. Decks reach this module
//! in one of three shapes ([`DeckSource`]): a published deck, an
//! in-progress draft, or loose JSON left behind by older clients. Every
//! shape normalizes to a [`DeckSnapshot`] with an anchor and all five
//! lenses; gaps become visible placeholders instead of errors.
//!
//! Loose JSON is resolved field by field, in priority order:
//!
//! | Slot | 1st | 2nd | 3rd | otherwise |
//! |------|-----|-----|-----|-----------|
//! | anchor | `anchor` object | `anchorText` | `anchorRaw` | [`MISSING_ANCHOR_TEXT`] |
//! | lens | `locked[lens]` | `matches[lens]` | `lockedByLens[lens].postId` in `candidatesByLens[lens]` | [`MISSING_MATCH_TEXT`] |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::curator::{Draft, PublishedDeck};
use crate::lens::{Lens, LensSet};
use crate::models::{Author, Post};

pub const MISSING_ANCHOR_TEXT: &str = "(Missing anchor text)";
pub const MISSING_MATCH_TEXT: &str = "(Missing matched post text)";
pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const ANCHOR_ID: &str = "anchor";

/// The deck shapes a room can be created from.
#[derive(Debug, Clone, Copy)]
pub enum DeckSource<'a> {
    Published(&'a PublishedDeck),
    Draft(&'a Draft),
    Json(&'a Value),
}

/// Minimal post record frozen into a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPost {
    pub id: String,
    pub text: String,
    pub author: Author,
}

impl From<&Post> for SnapshotPost {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            text: post.text.clone(),
            author: post.author.clone(),
        }
    }
}

/// Anchor plus one record per lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    pub anchor: SnapshotPost,
    pub matches: LensSet<SnapshotPost>,
}

impl DeckSnapshot {
    /// Normalizes any [`DeckSource`]. Never fails.
    pub fn from_source(source: DeckSource<'_>) -> Self {
        match source {
            DeckSource::Published(deck) => from_published(deck),
            DeckSource::Draft(draft) => from_draft(draft),
            DeckSource::Json(value) => from_json(value),
        }
    }
}

fn from_published(deck: &PublishedDeck) -> DeckSnapshot {
    DeckSnapshot {
        anchor: SnapshotPost::from(&deck.anchor),
        matches: LensSet::from_fn(|lens| SnapshotPost::from(deck.locked.get(lens))),
    }
}

fn from_draft(draft: &Draft) -> DeckSnapshot {
    DeckSnapshot {
        anchor: SnapshotPost {
            id: ANCHOR_ID.to_string(),
            text: draft.anchor_text.clone(),
            author: draft.owner.clone(),
        },
        matches: LensSet::from_fn(|lens| {
            draft
                .locked
                .get(&lens)
                .map(SnapshotPost::from)
                .unwrap_or_else(|| missing_match(lens))
        }),
    }
}

fn from_json(value: &Value) -> DeckSnapshot {
    let anchor = anchor_from_object(value)
        .or_else(|| anchor_from_text(value))
        .or_else(|| anchor_from_raw(value))
        .unwrap_or_else(missing_anchor);
    let matches = LensSet::from_fn(|lens| {
        match_from_locked(value, lens)
            .or_else(|| match_from_matches(value, lens))
            .or_else(|| match_from_legacy_index(value, lens))
            .unwrap_or_else(|| missing_match(lens))
    });
    DeckSnapshot { anchor, matches }
}

/// `anchor: { text, author, id }`.
pub fn anchor_from_object(deck: &Value) -> Option<SnapshotPost> {
    post_like(deck.get("anchor")?, ANCHOR_ID)
}

/// `anchorText: "..."`, wrapped as an anonymous record.
pub fn anchor_from_text(deck: &Value) -> Option<SnapshotPost> {
    bare_anchor(non_empty_str(deck.get("anchorText")?)?)
}

/// `anchorRaw`, either a string or a post-like object.
pub fn anchor_from_raw(deck: &Value) -> Option<SnapshotPost> {
    let raw = deck.get("anchorRaw")?;
    match raw {
        Value::String(s) => bare_anchor(non_empty_str_ref(s)?),
        other => post_like(other, ANCHOR_ID),
    }
}

pub fn match_from_locked(deck: &Value, lens: Lens) -> Option<SnapshotPost> {
    post_like(deck.get("locked")?.get(lens.id())?, &format!("{}_locked", lens.id()))
}

pub fn match_from_matches(deck: &Value, lens: Lens) -> Option<SnapshotPost> {
    post_like(deck.get("matches")?.get(lens.id())?, &format!("{}_match", lens.id()))
}

/// Legacy indirection: a locked post id resolved against the candidate
/// list stored alongside it.
pub fn match_from_legacy_index(deck: &Value, lens: Lens) -> Option<SnapshotPost> {
    let post_id = id_string(deck.get("lockedByLens")?.get(lens.id())?.get("postId")?)?;
    deck.get("candidatesByLens")?
        .get(lens.id())?
        .as_array()?
        .iter()
        .find(|candidate| candidate.get("id").and_then(id_string).as_deref() == Some(post_id.as_str()))
        .and_then(|candidate| post_like(candidate, &post_id))
}

pub fn missing_match(lens: Lens) -> SnapshotPost {
    SnapshotPost {
        id: format!("{}_missing", lens.id()),
        text: MISSING_MATCH_TEXT.to_string(),
        author: Author::new(UNKNOWN_AUTHOR, ""),
    }
}

fn missing_anchor() -> SnapshotPost {
    SnapshotPost {
        id: ANCHOR_ID.to_string(),
        text: MISSING_ANCHOR_TEXT.to_string(),
        author: Author::new(UNKNOWN_AUTHOR, ""),
    }
}

fn bare_anchor(text: &str) -> Option<SnapshotPost> {
    Some(SnapshotPost {
        id: ANCHOR_ID.to_string(),
        text: text.to_string(),
        author: Author::new(UNKNOWN_AUTHOR, ""),
    })
}

/// Reads a post-like object. Requires non-empty `text`; everything else
/// falls back.
fn post_like(value: &Value, fallback_id: &str) -> Option<SnapshotPost> {
    let text = non_empty_str(value.get("text")?)?;
    let id = value
        .get("id")
        .and_then(id_string)
        .unwrap_or_else(|| fallback_id.to_string());
    Some(SnapshotPost {
        id,
        text: text.to_string(),
        author: author_like(value),
    })
}

/// `author` may be an object, a bare string, or split into
/// `authorName`/`authorHandle`.
fn author_like(value: &Value) -> Author {
    let (name, handle) = match value.get("author") {
        Some(Value::Object(obj)) => (
            obj.get("name").and_then(Value::as_str),
            obj.get("handle").and_then(Value::as_str),
        ),
        Some(Value::String(name)) => (Some(name.as_str()), None),
        _ => (None, None),
    };
    let name = name
        .or_else(|| value.get("authorName").and_then(Value::as_str))
        .and_then(non_empty_str_ref)
        .unwrap_or(UNKNOWN_AUTHOR);
    let handle = handle
        .or_else(|| value.get("authorHandle").and_then(Value::as_str))
        .unwrap_or("");
    Author::new(name, handle)
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    non_empty_str_ref(value.as_str()?)
}

fn non_empty_str_ref(s: &str) -> Option<&str> {
    (!s.trim().is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::LENSES;
    use serde_json::json;

    #[test]
    fn test_empty_object_is_all_placeholders() {
        let snap = DeckSnapshot::from_source(DeckSource::Json(&json!({})));
        assert_eq!(snap.anchor.text, MISSING_ANCHOR_TEXT);
        for (lens, post) in snap.matches.iter() {
            assert_eq!(post.text, MISSING_MATCH_TEXT);
            assert_eq!(post.id, format!("{}_missing", lens.id()));
        }
    }

    #[test]
    fn test_non_object_inputs_are_tolerated() {
        for value in [json!(null), json!([1, 2]), json!("deck"), json!(42)] {
            let snap = DeckSnapshot::from_source(DeckSource::Json(&value));
            assert_eq!(snap.anchor.text, MISSING_ANCHOR_TEXT);
        }
    }

    #[test]
    fn test_anchor_priority() {
        let deck = json!({
            "anchor": { "id": "a1", "text": "from object", "author": { "name": "Ada", "handle": "@ada" } },
            "anchorText": "from text",
            "anchorRaw": "from raw"
        });
        let snap = DeckSnapshot::from_source(DeckSource::Json(&deck));
        assert_eq!(snap.anchor.text, "from object");
        assert_eq!(snap.anchor.author.display_name(), "Ada @ada");

        let deck = json!({ "anchor": { "text": "" }, "anchorText": "from text", "anchorRaw": "from raw" });
        let snap = DeckSnapshot::from_source(DeckSource::Json(&deck));
        assert_eq!(snap.anchor.text, "from text");
        assert_eq!(snap.anchor.id, "anchor");
        assert_eq!(snap.anchor.author.name, "Unknown");

        let deck = json!({ "anchorRaw": { "text": "raw object", "author": "Bo" } });
        let snap = DeckSnapshot::from_source(DeckSource::Json(&deck));
        assert_eq!(snap.anchor.text, "raw object");
        assert_eq!(snap.anchor.author.name, "Bo");
    }

    #[test]
    fn test_match_priority_locked_then_matches() {
        let deck = json!({
            "locked": { "calm": { "id": "p1", "text": "locked calm" } },
            "matches": {
                "calm": { "id": "p2", "text": "matched calm" },
                "bridge": { "id": "p3", "text": "matched bridge" }
            }
        });
        let snap = DeckSnapshot::from_source(DeckSource::Json(&deck));
        assert_eq!(snap.matches.calm.id, "p1");
        assert_eq!(snap.matches.bridge.id, "p3");
        assert_eq!(snap.matches.cynical.text, MISSING_MATCH_TEXT);
    }

    #[test]
    fn test_legacy_indirection() {
        let deck = json!({
            "anchorText": "legacy anchor",
            "lockedByLens": { "playful": { "postId": 7 } },
            "candidatesByLens": {
                "playful": [
                    { "id": 6, "text": "not me" },
                    { "id": 7, "text": "pick me", "authorName": "Lu", "authorHandle": "@lu" }
                ]
            }
        });
        let snap = DeckSnapshot::from_source(DeckSource::Json(&deck));
        assert_eq!(snap.matches.playful.text, "pick me");
        assert_eq!(snap.matches.playful.id, "7");
        assert_eq!(snap.matches.playful.author.display_name(), "Lu @lu");
    }

    #[test]
    fn test_legacy_dangling_id_falls_back() {
        let deck = json!({
            "lockedByLens": { "calm": { "postId": "gone" } },
            "candidatesByLens": { "calm": [{ "id": "other", "text": "x" }] }
        });
        let snap = DeckSnapshot::from_source(DeckSource::Json(&deck));
        assert_eq!(snap.matches.calm.id, "calm_missing");
    }

    #[test]
    fn test_draft_with_gaps() {
        let mut locked = std::collections::BTreeMap::new();
        let post = crate::pool::build_pool(1)
            .into_iter()
            .find(|p| p.id == "t01_bridge_0")
            .unwrap();
        locked.insert(Lens::Bridge, post);
        let draft = Draft {
            id: "d1".to_string(),
            owner: Author::new("Sam", "@sam"),
            anchor_text: "Draft anchor".to_string(),
            topic_id: "t01".to_string(),
            created_at: chrono::Utc::now(),
            locked,
        };
        let snap = DeckSnapshot::from_source(DeckSource::Draft(&draft));
        assert_eq!(snap.anchor.text, "Draft anchor");
        for lens in LENSES {
            let expected_missing = lens != Lens::Bridge;
            assert_eq!(snap.matches.get(lens).text == MISSING_MATCH_TEXT, expected_missing);
        }
    }
}
