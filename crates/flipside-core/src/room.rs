//! Rooms: chat spaces seeded from a deck snapshot.
//!
//! A room's message log always starts with six seed messages (the anchor,
//! then the five lenses in registry order) followed by chat messages in
//! arrival order. Positions in the log are what solution citations refer
//! to, so seeds are never reordered or removed.
//!
//! Missing rooms are reported as `None`/`false`; the store tolerates local
//! state disappearing underneath it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lens::{get_lens, Lens, LENSES};
use crate::snapshot::{DeckSnapshot, DeckSource, SnapshotPost};

pub const DEFAULT_ROOM_TITLE: &str = "Untitled room";
pub const DEFAULT_CHAT_AUTHOR: &str = "User";
/// Number of seed messages at the head of every room.
pub const SEED_COUNT: usize = 1 + LENSES.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Seed,
    Chat,
}

/// Which deck slot a seed message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SeedTag {
    Anchor,
    Lens(Lens),
}

impl SeedTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SeedTag::Anchor => "anchor",
            SeedTag::Lens(lens) => lens.id(),
        }
    }
}

impl fmt::Display for SeedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "anchor" {
            return Ok(SeedTag::Anchor);
        }
        get_lens(s).map(SeedTag::Lens).map_err(|e| e.to_string())
    }
}

impl TryFrom<String> for SeedTag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeedTag> for String {
    fn from(tag: SeedTag) -> Self {
        tag.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub kind: MessageKind,
    /// Seed messages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens: Option<SeedTag>,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn seed(tag: SeedTag, post: &SnapshotPost, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: MessageKind::Seed,
            lens: Some(tag),
            author: post.author.display_name(),
            content: post.text.clone(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionStatus {
    Draft,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub status: SolutionStatus,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub snapshot: DeckSnapshot,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub solution: Option<Solution>,
}

impl Room {
    /// Creates a room and its six seed messages from a snapshot.
    pub fn from_snapshot(title: &str, snapshot: DeckSnapshot) -> Self {
        let created_at = Utc::now();
        let mut messages = Vec::with_capacity(SEED_COUNT);
        messages.push(Message::seed(SeedTag::Anchor, &snapshot.anchor, created_at));
        for (lens, post) in snapshot.matches.iter() {
            messages.push(Message::seed(SeedTag::Lens(lens), post, created_at));
        }
        let title = title.trim();
        Self {
            id: Uuid::new_v4().to_string(),
            title: if title.is_empty() {
                DEFAULT_ROOM_TITLE.to_string()
            } else {
                title.to_string()
            },
            created_at,
            snapshot,
            messages,
            solution: None,
        }
    }

    pub fn seed_messages(&self) -> &[Message] {
        &self.messages[..SEED_COUNT.min(self.messages.len())]
    }

    pub fn chat_messages(&self) -> &[Message] {
        &self.messages[SEED_COUNT.min(self.messages.len())..]
    }
}

/// The room collection.
#[derive(Debug, Clone)]
pub struct RoomStore {
    rooms: Vec<Room>,
    default_title: String,
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RoomStore {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self {
            rooms,
            default_title: DEFAULT_ROOM_TITLE.to_string(),
        }
    }

    /// Title used when a room is created with a blank one.
    pub fn with_default_title(mut self, title: &str) -> Self {
        if !title.trim().is_empty() {
            self.default_title = title.trim().to_string();
        }
        self
    }

    /// Rooms in storage order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Rooms, most recently created first.
    pub fn list(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.iter().collect();
        rooms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rooms
    }

    pub fn get(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    /// Converts a deck into a new room, stores it, and returns a copy.
    ///
    /// Total over every [`DeckSource`]; malformed input yields placeholder
    /// seed text.
    pub fn from_deck(&mut self, title: &str, source: DeckSource<'_>) -> Room {
        let title = if title.trim().is_empty() {
            self.default_title.as_str()
        } else {
            title
        };
        let room = Room::from_snapshot(title, DeckSnapshot::from_source(source));
        tracing::info!(room = %room.id, title = %room.title, "room created");
        self.upsert(room.clone());
        room
    }

    /// Replaces the room with the same id, or appends it.
    pub fn upsert(&mut self, room: Room) {
        match self.rooms.iter_mut().find(|r| r.id == room.id) {
            Some(existing) => *existing = room,
            None => self.rooms.push(room),
        }
    }

    /// Appends a chat message. Blank authors become `"User"`.
    ///
    /// Returns `None` when the room is missing or `content` is blank.
    pub fn append_chat_message(
        &mut self,
        room_id: &str,
        author_name: &str,
        content: &str,
    ) -> Option<&Message> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        let room = self.rooms.iter_mut().find(|r| r.id == room_id)?;
        let author = author_name.trim();
        room.messages.push(Message {
            id: Uuid::new_v4().to_string(),
            kind: MessageKind::Chat,
            lens: None,
            author: if author.is_empty() {
                DEFAULT_CHAT_AUTHOR.to_string()
            } else {
                author.to_string()
            },
            content: content.to_string(),
            created_at: Utc::now(),
        });
        tracing::debug!(room = room_id, position = room.messages.len(), "chat message appended");
        room.messages.last()
    }

    /// Replaces the room's solution with a fresh draft.
    pub fn set_solution_draft(&mut self, room_id: &str, content: &str) -> bool {
        let Some(room) = self.rooms.iter_mut().find(|r| r.id == room_id) else {
            return false;
        };
        room.solution = Some(Solution {
            status: SolutionStatus::Draft,
            content: content.to_string(),
            created_at: Utc::now(),
        });
        true
    }

    /// Marks the existing solution complete. `false` if there is none.
    pub fn complete_solution(&mut self, room_id: &str) -> bool {
        let solution = self
            .rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .and_then(|r| r.solution.as_mut());
        match solution {
            Some(solution) => {
                solution.status = SolutionStatus::Complete;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, room_id: &str) -> bool {
        let before = self.rooms.len();
        self.rooms.retain(|r| r.id != room_id);
        self.rooms.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curator::CuratorSession;
    use crate::models::Author;
    use crate::pool::build_pool;
    use serde_json::json;

    fn published_room(store: &mut RoomStore) -> Room {
        let mut s = CuratorSession::new(Author::new("Sam Rivera", "@sam"), build_pool(7));
        s.start_draft("Ban phones in school", "t01");
        for lens in LENSES {
            let id = s.candidates(lens)[0].id.clone();
            s.lock(lens, &id);
        }
        let deck = s.publish().unwrap();
        store.from_deck("Phones debate", DeckSource::Published(&deck))
    }

    #[test]
    fn test_seed_messages_in_lens_order() {
        let mut store = RoomStore::default();
        let room = published_room(&mut store);
        assert_eq!(room.title, "Phones debate");
        assert_eq!(room.messages.len(), 6);
        assert_eq!(room.messages[0].lens, Some(SeedTag::Anchor));
        assert_eq!(room.messages[0].content, "Ban phones in school");
        assert_eq!(room.messages[0].author, "Sam Rivera @sam");
        for (i, lens) in LENSES.iter().enumerate() {
            assert_eq!(room.messages[i + 1].lens, Some(SeedTag::Lens(*lens)));
        }
        assert!(room.messages.iter().all(|m| m.kind == MessageKind::Seed));
        assert!(room.messages.iter().all(|m| m.created_at == room.created_at));
        assert_eq!(store.get(&room.id), Some(&room));
    }

    #[test]
    fn test_from_deck_total_over_empty_json() {
        let mut store = RoomStore::default();
        let room = store.from_deck("", DeckSource::Json(&json!({})));
        assert_eq!(room.title, DEFAULT_ROOM_TITLE);
        assert_eq!(room.seed_messages().len(), 6);
        assert_eq!(room.messages[1].lens, Some(SeedTag::Lens(Lens::Calm)));
        assert_eq!(room.messages[1].author, "Unknown");
    }

    #[test]
    fn test_custom_default_title() {
        let mut store = RoomStore::default().with_default_title("Town hall");
        let room = store.from_deck("  ", DeckSource::Json(&json!(null)));
        assert_eq!(room.title, "Town hall");
    }

    #[test]
    fn test_append_chat_message() {
        let mut store = RoomStore::default();
        let room = published_room(&mut store);

        let msg = store.append_chat_message(&room.id, "Alex", "I disagree").unwrap();
        assert_eq!(msg.kind, MessageKind::Chat);
        assert_eq!(msg.lens, None);

        let msg = store.append_chat_message(&room.id, "   ", "Me too").unwrap();
        assert_eq!(msg.author, "User");

        let room = store.get(&room.id).unwrap();
        assert_eq!(room.messages.len(), 8);
        assert_eq!(room.messages[6].content, "I disagree");
        assert_eq!(room.chat_messages().len(), 2);
    }

    #[test]
    fn test_append_to_missing_room_or_blank_content() {
        let mut store = RoomStore::default();
        assert!(store.append_chat_message("nope", "Alex", "hi").is_none());
        let room = published_room(&mut store);
        assert!(store.append_chat_message(&room.id, "Alex", "  ").is_none());
        assert_eq!(store.get(&room.id).unwrap().messages.len(), 6);
    }

    #[test]
    fn test_solution_lifecycle() {
        let mut store = RoomStore::default();
        let room = published_room(&mut store);
        assert!(!store.complete_solution(&room.id));
        assert!(store.set_solution_draft(&room.id, "first"));
        assert!(store.set_solution_draft(&room.id, "second"));
        let solution = store.get(&room.id).unwrap().solution.clone().unwrap();
        assert_eq!(solution.status, SolutionStatus::Draft);
        assert_eq!(solution.content, "second");

        assert!(store.complete_solution(&room.id));
        let solution = store.get(&room.id).unwrap().solution.clone().unwrap();
        assert_eq!(solution.status, SolutionStatus::Complete);
        assert!(!store.set_solution_draft("nope", "x"));
    }

    #[test]
    fn test_delete_and_list() {
        let mut store = RoomStore::default();
        let a = published_room(&mut store);
        let b = store.from_deck("second", DeckSource::Json(&json!({})));
        let listed: Vec<&str> = store.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&a.id.as_str()) && listed.contains(&b.id.as_str()));

        assert!(store.delete(&a.id));
        assert!(!store.delete(&a.id));
        assert!(store.get(&a.id).is_none());
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = RoomStore::default();
        let mut room = published_room(&mut store);
        room.title = "Renamed".to_string();
        store.upsert(room.clone());
        assert_eq!(store.rooms().len(), 1);
        assert_eq!(store.get(&room.id).unwrap().title, "Renamed");
    }

    #[test]
    fn test_seed_tag_serde() {
        let room = published_room(&mut RoomStore::default());
        let msg = &room.messages[2];
        let json = serde_json::to_value(msg).unwrap();
        assert_eq!(json["lens"], "bridge");
        assert_eq!(json["kind"], "seed");
        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(&back, msg);
        assert!(serde_json::from_value::<SeedTag>(json!("nope")).is_err());
    }
}
