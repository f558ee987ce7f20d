//! Engagement ledger: votes and replies with fan-out by post identity.
//!
//! Posts are copied by value into drafts and decks, so one logical vote
//! has to land on every copy. [`EngagementIndex`] maps a post id to every
//! location holding a copy; it is maintained by the curator on each
//! structural change and rebuilt when a session is restored.
//!
//! Locations covered: the pool entry, the draft's locked slots, each
//! deck's anchor, and each deck's lens slots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::curator::{CuratorSession, Draft, PublishedDeck};
use crate::lens::Lens;
use crate::models::{Author, Post, Reply};

/// A single vote step. The counter may go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub fn delta(self) -> i64 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }
}

/// Where a copy of a post lives inside a [`CuratorSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostLocation {
    Pool(usize),
    DraftSlot(Lens),
    /// Deck position in publish order.
    DeckAnchor(usize),
    DeckSlot(usize, Lens),
}

/// Post id → every location holding a copy.
#[derive(Debug, Clone, Default)]
pub struct EngagementIndex {
    by_id: HashMap<String, Vec<PostLocation>>,
}

impl EngagementIndex {
    pub fn build(pool: &[Post], draft: Option<&Draft>, decks: &[PublishedDeck]) -> Self {
        let mut index = Self::default();
        for (i, post) in pool.iter().enumerate() {
            index.insert(&post.id, PostLocation::Pool(i));
        }
        if let Some(draft) = draft {
            for (lens, post) in &draft.locked {
                index.insert(&post.id, PostLocation::DraftSlot(*lens));
            }
        }
        for (d, deck) in decks.iter().enumerate() {
            index.insert(&deck.anchor.id, PostLocation::DeckAnchor(d));
            for (lens, post) in deck.locked.iter() {
                index.insert(&post.id, PostLocation::DeckSlot(d, lens));
            }
        }
        index
    }

    pub fn insert(&mut self, post_id: &str, location: PostLocation) {
        let locations = self.by_id.entry(post_id.to_string()).or_default();
        if !locations.contains(&location) {
            locations.push(location);
        }
    }

    pub fn remove(&mut self, post_id: &str, location: PostLocation) {
        if let Some(locations) = self.by_id.get_mut(post_id) {
            locations.retain(|l| *l != location);
            if locations.is_empty() {
                self.by_id.remove(post_id);
            }
        }
    }

    pub fn locations(&self, post_id: &str) -> &[PostLocation] {
        self.by_id.get(post_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl CuratorSession {
    /// Applies a vote to every copy of `post_id`.
    ///
    /// Returns the number of copies updated; `0` means the post is unknown.
    pub fn vote(&mut self, post_id: &str, vote: Vote) -> usize {
        let locations = self.index.locations(post_id).to_vec();
        let mut touched = 0;
        for location in locations {
            if let Some(post) = self.post_at_mut(location) {
                post.votes += vote.delta();
                touched += 1;
            }
        }
        tracing::debug!(post = post_id, ?vote, copies = touched, "vote applied");
        touched
    }

    /// Appends one reply to every copy of `post_id`.
    ///
    /// All copies receive the same reply identity. Returns `None` when no
    /// copy exists.
    pub fn add_reply(&mut self, post_id: &str, text: &str, author: Author) -> Option<Reply> {
        let locations = self.index.locations(post_id).to_vec();
        if locations.is_empty() {
            return None;
        }
        let reply = Reply::new(author, text.trim());
        for location in locations {
            if let Some(post) = self.post_at_mut(location) {
                post.replies.push(reply.clone());
            }
        }
        tracing::debug!(post = post_id, reply = %reply.id, "reply added");
        Some(reply)
    }

    /// Every copy of `post_id`, in index order.
    pub fn post_copies(&self, post_id: &str) -> Vec<&Post> {
        self.index
            .locations(post_id)
            .iter()
            .filter_map(|location| self.post_at(*location))
            .collect()
    }

    fn post_at(&self, location: PostLocation) -> Option<&Post> {
        match location {
            PostLocation::Pool(i) => self.pool.get(i),
            PostLocation::DraftSlot(lens) => self.draft.as_ref()?.locked.get(&lens),
            PostLocation::DeckAnchor(d) => self.decks.get(d).map(|deck| &deck.anchor),
            PostLocation::DeckSlot(d, lens) => self.decks.get(d).map(|deck| deck.locked.get(lens)),
        }
    }

    fn post_at_mut(&mut self, location: PostLocation) -> Option<&mut Post> {
        match location {
            PostLocation::Pool(i) => self.pool.get_mut(i),
            PostLocation::DraftSlot(lens) => self.draft.as_mut()?.locked.get_mut(&lens),
            PostLocation::DeckAnchor(d) => self.decks.get_mut(d).map(|deck| &mut deck.anchor),
            PostLocation::DeckSlot(d, lens) => {
                self.decks.get_mut(d).map(|deck| deck.locked.get_mut(lens))
            }
        }
    }
}
