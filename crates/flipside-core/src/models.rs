//! Core data models shared by the pool, the curator, and the ledger.
//!
//! A [`Post`] has the same shape whether it is a pool candidate, a draft's
//! locked match, or a published deck's anchor. Decks hold copies, not
//! references; see [`crate::ledger`] for how counters stay in sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lens::Lens;

/// Who wrote something.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub handle: String,
}

impl Author {
    pub fn new(name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
        }
    }

    /// `"{name} {handle}"`, or just the name when the handle is empty.
    pub fn display_name(&self) -> String {
        let handle = self.handle.trim();
        if handle.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, handle)
        }
    }
}

/// A reply attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub author: Author,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    pub fn new(author: Author, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// A piece of text attributable to an author, scoped to a topic.
///
/// `lens == None` marks an anchor-like post; a tagged post may only fill
/// the deck slot for its `(topic_id, lens)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub topic_id: String,
    #[serde(default)]
    pub lens: Option<Lens>,
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Post {
    /// Whether this post may be locked into the `lens` slot of a deck on
    /// `topic_id`.
    pub fn fits_slot(&self, topic_id: &str, lens: Lens) -> bool {
        self.topic_id == topic_id && self.lens == Some(lens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_with_handle() {
        let a = Author::new("Maya Chen", "@maya");
        assert_eq!(a.display_name(), "Maya Chen @maya");
    }

    #[test]
    fn test_display_name_without_handle() {
        assert_eq!(Author::new("Unknown", "").display_name(), "Unknown");
        assert_eq!(Author::new("Unknown", "   ").display_name(), "Unknown");
    }

    #[test]
    fn test_post_defaults_when_deserializing() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": "t01_anchor",
            "text": "hello",
            "author": { "name": "Ada" },
            "created_at": "2025-01-01T00:00:00Z",
            "topic_id": "t01"
        }))
        .unwrap();
        assert_eq!(post.votes, 0);
        assert!(post.replies.is_empty());
        assert_eq!(post.lens, None);
        assert_eq!(post.author.handle, "");
    }
}
