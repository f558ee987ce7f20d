//! People Mode deck curator.
//!
//! A [`CuratorSession`] is the explicit context for one user's curation
//! work: the candidate pool, at most one in-progress [`Draft`], and the
//! published decks. The state machine is
//!
//! ```text
//! NoDraft ──start_draft──▶ DraftInProgress(0..5 locked) ──publish──▶ NoDraft
//!    ▲                        │  lock / unlock                           (+1 deck)
//!    └────────── clear ───────┘
//! ```
//!
//! Every "not ready" condition is reported as `false` or `None`. Callers
//! are expected to poll [`CuratorSession::status`] rather than handle
//! errors.
//!
//! # Example
//!
//! ```rust
//! use flipside_core::curator::CuratorSession;
//! use flipside_core::lens::LENSES;
//! use flipside_core::models::Author;
//! use flipside_core::pool::build_pool;
//!
//! let mut session = CuratorSession::new(Author::new("Sam", "@sam"), build_pool(7));
//! assert!(session.start_draft("Ban phones in school", "t01"));
//! for lens in LENSES {
//!     let id = session.candidates(lens)[0].id.clone();
//!     assert!(session.lock(lens, &id));
//! }
//! let deck = session.publish().unwrap();
//! assert_eq!(deck.anchor.text, "Ban phones in school");
//! assert!(session.draft().is_none());
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::{EngagementIndex, PostLocation};
use crate::lens::{Lens, LensSet, LENSES};
use crate::models::{Author, Post};
use crate::pool;

/// The single work-in-progress deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub owner: Author,
    pub anchor_text: String,
    pub topic_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub locked: BTreeMap<Lens, Post>,
}

/// A fully locked, immutable deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedDeck {
    pub id: String,
    pub owner: Author,
    pub created_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
    pub topic_id: String,
    pub anchor: Post,
    pub locked: LensSet<Post>,
}

/// Readiness snapshot of the current draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftStatus {
    pub locked: Vec<Lens>,
    pub missing: Vec<Lens>,
}

impl DraftStatus {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Explicit curation context: pool + draft + published decks.
///
/// Decks are kept in publish order internally so engagement index
/// positions stay stable; [`published_decks`](Self::published_decks)
/// presents them most recent first.
#[derive(Debug, Clone)]
pub struct CuratorSession {
    pub(crate) owner: Author,
    pub(crate) pool: Vec<Post>,
    pub(crate) draft: Option<Draft>,
    pub(crate) decks: Vec<PublishedDeck>,
    pub(crate) index: EngagementIndex,
}

impl CuratorSession {
    /// A fresh session with no draft and no decks.
    pub fn new(owner: Author, pool: Vec<Post>) -> Self {
        Self::restore(owner, pool, None, Vec::new())
    }

    /// Rebuilds a session from persisted parts. `decks` must be in publish
    /// order (oldest first), as returned by [`deck_log`](Self::deck_log).
    pub fn restore(
        owner: Author,
        pool: Vec<Post>,
        draft: Option<Draft>,
        decks: Vec<PublishedDeck>,
    ) -> Self {
        let index = EngagementIndex::build(&pool, draft.as_ref(), &decks);
        Self {
            owner,
            pool,
            draft,
            decks,
            index,
        }
    }

    pub fn owner(&self) -> &Author {
        &self.owner
    }

    pub fn pool(&self) -> &[Post] {
        &self.pool
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Published decks, most recent first.
    pub fn published_decks(&self) -> impl Iterator<Item = &PublishedDeck> {
        self.decks.iter().rev()
    }

    /// Published decks in publish order (oldest first).
    pub fn deck_log(&self) -> &[PublishedDeck] {
        &self.decks
    }

    pub fn deck(&self, deck_id: &str) -> Option<&PublishedDeck> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    /// Opens a new draft, discarding any unpublished one.
    ///
    /// Returns `false` (and changes nothing) when `anchor_text` is blank.
    pub fn start_draft(&mut self, anchor_text: &str, topic_id: &str) -> bool {
        let anchor_text = anchor_text.trim();
        if anchor_text.is_empty() {
            return false;
        }
        self.discard_draft();
        let draft = Draft {
            id: Uuid::new_v4().to_string(),
            owner: self.owner.clone(),
            anchor_text: anchor_text.to_string(),
            topic_id: topic_id.to_string(),
            created_at: Utc::now(),
            locked: BTreeMap::new(),
        };
        tracing::debug!(draft = %draft.id, topic = %draft.topic_id, "draft started");
        self.draft = Some(draft);
        true
    }

    /// Pool posts eligible for `lens` on the draft's topic; empty without a
    /// draft.
    pub fn candidates(&self, lens: Lens) -> Vec<&Post> {
        match &self.draft {
            Some(draft) => pool::filter(&self.pool, &draft.topic_id, lens),
            None => Vec::new(),
        }
    }

    /// Locks a pool post into the draft's `lens` slot, replacing any
    /// previous choice.
    ///
    /// No-op returning `false` without a draft, for an unknown post, or for
    /// a post that does not fit the `(topic, lens)` slot.
    pub fn lock(&mut self, lens: Lens, post_id: &str) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let Some(post) = pool::find(&self.pool, post_id) else {
            return false;
        };
        if !post.fits_slot(&draft.topic_id, lens) {
            tracing::debug!(post = post_id, lens = %lens, "post does not fit slot");
            return false;
        }
        if let Some(previous) = draft.locked.insert(lens, post.clone()) {
            self.index.remove(&previous.id, PostLocation::DraftSlot(lens));
        }
        self.index.insert(post_id, PostLocation::DraftSlot(lens));
        tracing::debug!(post = post_id, lens = %lens, "locked");
        true
    }

    pub fn unlock(&mut self, lens: Lens) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        match draft.locked.remove(&lens) {
            Some(previous) => {
                self.index.remove(&previous.id, PostLocation::DraftSlot(lens));
                true
            }
            None => false,
        }
    }

    /// Drops the draft entirely.
    pub fn clear(&mut self) {
        self.discard_draft();
    }

    pub fn status(&self) -> Option<DraftStatus> {
        let draft = self.draft.as_ref()?;
        let (locked, missing): (Vec<Lens>, Vec<Lens>) = LENSES
            .into_iter()
            .partition(|lens| draft.locked.contains_key(lens));
        Some(DraftStatus { locked, missing })
    }

    /// First lens in registry order that is still open.
    pub fn next_unlocked_lens(&self) -> Option<Lens> {
        let draft = self.draft.as_ref()?;
        LENSES.into_iter().find(|lens| !draft.locked.contains_key(lens))
    }

    /// Publishes the draft once all five lenses are locked.
    ///
    /// Returns `None` and leaves the draft untouched when it is missing or
    /// incomplete.
    pub fn publish(&mut self) -> Option<PublishedDeck> {
        let draft = self.draft.as_ref()?;
        let locked = LensSet::from_fn(|lens| draft.locked.get(&lens).cloned()).transpose()?;

        let now = Utc::now();
        let anchor = Post {
            id: Uuid::new_v4().to_string(),
            text: draft.anchor_text.clone(),
            author: draft.owner.clone(),
            created_at: now,
            topic_id: draft.topic_id.clone(),
            lens: None,
            votes: 0,
            replies: Vec::new(),
        };
        let deck = PublishedDeck {
            id: Uuid::new_v4().to_string(),
            owner: draft.owner.clone(),
            created_at: draft.created_at,
            published_at: now,
            topic_id: draft.topic_id.clone(),
            anchor,
            locked,
        };

        self.discard_draft();
        let position = self.decks.len();
        self.index.insert(&deck.anchor.id, PostLocation::DeckAnchor(position));
        for (lens, post) in deck.locked.iter() {
            self.index.insert(&post.id, PostLocation::DeckSlot(position, lens));
        }
        self.decks.push(deck.clone());
        tracing::info!(deck = %deck.id, topic = %deck.topic_id, "deck published");
        Some(deck)
    }

    fn discard_draft(&mut self) {
        if let Some(draft) = self.draft.take() {
            for (lens, post) in &draft.locked {
                self.index.remove(&post.id, PostLocation::DraftSlot(*lens));
            }
        }
    }
}
