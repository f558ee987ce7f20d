//! Candidate pool: placeholder community posts for the deck curator.
//!
//! For every topic in [`crate::topics::TOPICS`] the pool holds one untagged
//! anchor-like post and, per lens, `5 + ((topic_index + lens_id_len) % 3)`
//! tagged posts. Content is drawn from per-lens phrasing tables and an
//! author roster with a seeded picker, so one seed always yields the same
//! texts, authors, and ids.
//!
//! # Example
//!
//! ```rust
//! use flipside_core::lens::Lens;
//! use flipside_core::pool::{build_pool, filter};
//!
//! let pool = build_pool(7);
//! let calm = filter(&pool, "t01", Lens::Calm);
//! assert!(calm.len() >= 5);
//! assert!(calm.iter().all(|p| p.topic_id == "t01" && p.lens == Some(Lens::Calm)));
//! ```

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};

use crate::lens::{Lens, LENSES};
use crate::models::{Author, Post};
use crate::topics::TOPICS;

/// Minimum number of candidates per `(topic, lens)` pair.
pub const MIN_CANDIDATES: usize = 5;

const AUTHORS: [(&str, &str); 10] = [
    ("Maya Chen", "@maya"),
    ("Jordan Ellis", "@jellis"),
    ("Priya Nair", "@priyan"),
    ("Tomás Ruiz", "@tomasr"),
    ("Ava Brooks", "@avab"),
    ("Kwame Mensah", "@kwame"),
    ("Lena Vogel", "@lvogel"),
    ("Sam Okafor", "@samo"),
    ("Noor Haddad", "@noorh"),
    ("Riley Park", ""),
];

const ANCHOR_PHRASES: [&str; 4] = [
    "Hot take: we should just settle {topic} once and for all.",
    "Unpopular opinion about {topic}: the current rules make no sense.",
    "Can we talk about {topic}? Everyone I know is fed up.",
    "{Topic} is the debate nobody wants to have honestly.",
];

fn phrases(lens: Lens) -> &'static [&'static str] {
    match lens {
        Lens::Calm => &[
            "I see real trade-offs with {topic}; let's look at what the evidence says first.",
            "There are reasonable people on both sides of {topic}. Slower decisions might serve us better.",
            "On {topic}, I'd rather try a small pilot than argue in absolutes.",
            "{Topic} affects people differently. It's worth listening before deciding.",
            "My honest view on {topic}: some change makes sense, but not all at once.",
            "I get why {topic} frustrates people. A gradual approach feels fair.",
            "Could we agree on a few facts about {topic} before picking a side?",
        ],
        Lens::Bridge => &[
            "If you're worried about {topic}, I hear you. What would a fair middle look like?",
            "Both camps on {topic} want the same thing: people doing well. We differ on how.",
            "I lean one way on {topic}, but the other side's concerns about cost are real.",
            "What if we tried {topic} changes with an opt-out, so nobody feels forced?",
            "On {topic}, maybe start where we agree and build from there.",
            "People against {topic} reform aren't villains; they're protecting something they value.",
            "A compromise on {topic}: keep what works, test what doesn't, review in a year.",
        ],
        Lens::Cynical => &[
            "Sure, {topic} will be fixed right after the next press release.",
            "Watch who profits from {topic} staying exactly as it is.",
            "Every year {topic} gets a new committee and the same result.",
            "{Topic}: all announcement, no follow-through, as usual.",
            "The debate about {topic} is mostly people performing for their own side.",
            "Bet the {topic} policy gets quietly reversed once nobody's watching.",
            "Nothing says progress like another survey about {topic}.",
        ],
        Lens::Opposite => &[
            "Honestly, the case for leaving {topic} alone is stronger than people admit.",
            "Changing {topic} could hurt the very people it's meant to help.",
            "The status quo on {topic} exists for reasons we've forgotten.",
            "Most complaints about {topic} come from a loud minority.",
            "{Topic} works better than the headlines suggest; the data is mixed at worst.",
            "Every rule we add around {topic} creates new problems elsewhere.",
            "Individual choice should decide {topic}, not a blanket policy.",
        ],
        Lens::Playful => &[
            "{Topic} discourse is my cardio at this point.",
            "Me explaining my {topic} opinion to my cat: she remains unconvinced.",
            "If {topic} were a group chat, it'd be 400 unread messages and one meme.",
            "Proposal: settle {topic} with a bake-off. Winner writes the policy.",
            "My stance on {topic} changes depending on how much coffee I've had.",
            "{Topic}, but make it a reality show. I'd watch every episode.",
            "Plot twist: {topic} was the friends we argued with along the way.",
        ],
    }
}

/// Number of candidates generated for one `(topic, lens)` pair.
pub fn candidate_count(topic_index: usize, lens: Lens) -> usize {
    MIN_CANDIDATES + (topic_index + lens.id().len()) % 3
}

/// Builds the full pool for `seed`.
pub fn build_pool(seed: u64) -> Vec<Post> {
    let now = Utc::now();
    let mut pool = Vec::new();

    for (t, topic) in TOPICS.iter().enumerate() {
        let anchor_pick = pick(seed, &[topic.id, "anchor"]);
        pool.push(Post {
            id: format!("{}_anchor", topic.id),
            text: fill(ANCHOR_PHRASES[anchor_pick as usize % ANCHOR_PHRASES.len()], topic.label),
            author: roster_author(anchor_pick >> 8),
            created_at: now - Duration::minutes(((anchor_pick >> 16) % 4320) as i64),
            topic_id: topic.id.to_string(),
            lens: None,
            votes: 0,
            replies: Vec::new(),
        });

        for lens in LENSES {
            let table = phrases(lens);
            for n in 0..candidate_count(t, lens) {
                let index = n.to_string();
                let h = pick(seed, &[topic.id, lens.id(), &index]);
                pool.push(Post {
                    id: format!("{}_{}_{}", topic.id, lens.id(), n),
                    text: fill(table[(h as usize + n) % table.len()], topic.label),
                    author: roster_author(h >> 8),
                    created_at: now - Duration::minutes(((h >> 16) % 4320) as i64),
                    topic_id: topic.id.to_string(),
                    lens: Some(lens),
                    votes: ((h >> 32) % 25) as i64,
                    replies: Vec::new(),
                });
            }
        }
    }

    pool
}

/// All pool entries on `topic_id` tagged with `lens`, in pool order.
pub fn filter<'a>(pool: &'a [Post], topic_id: &str, lens: Lens) -> Vec<&'a Post> {
    pool.iter().filter(|p| p.fits_slot(topic_id, lens)).collect()
}

pub fn find<'a>(pool: &'a [Post], post_id: &str) -> Option<&'a Post> {
    pool.iter().find(|p| p.id == post_id)
}

fn pick(seed: u64, parts: &[&str]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

fn roster_author(h: u64) -> Author {
    let (name, handle) = AUTHORS[h as usize % AUTHORS.len()];
    Author::new(name, handle)
}

fn fill(template: &str, label: &str) -> String {
    let lower = label.to_lowercase();
    template.replace("{Topic}", label).replace("{topic}", &lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_pair_has_min_candidates() {
        let pool = build_pool(1);
        for topic in TOPICS.iter() {
            for lens in LENSES {
                let n = filter(&pool, topic.id, lens).len();
                assert!(n >= MIN_CANDIDATES, "{} {} has {}", topic.id, lens, n);
            }
        }
    }

    #[test]
    fn test_counts_follow_formula() {
        let pool = build_pool(1);
        // t01 is index 0; "calm" has 4 letters → 5 + 4 % 3 = 6
        assert_eq!(filter(&pool, "t01", Lens::Calm).len(), 6);
        // "bridge" has 6 letters → 5 + 6 % 3 = 5
        assert_eq!(filter(&pool, "t01", Lens::Bridge).len(), 5);
        assert_eq!(candidate_count(1, Lens::Playful), 5 + (1 + 7) % 3);
    }

    #[test]
    fn test_one_anchor_per_topic() {
        let pool = build_pool(3);
        let anchors: Vec<&Post> = pool.iter().filter(|p| p.lens.is_none()).collect();
        assert_eq!(anchors.len(), TOPICS.len());
        assert!(anchors.iter().all(|p| p.id.ends_with("_anchor")));
    }

    #[test]
    fn test_ids_unique() {
        let pool = build_pool(5);
        let ids: HashSet<&str> = pool.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), pool.len());
    }

    #[test]
    fn test_same_seed_same_content() {
        let a = build_pool(42);
        let b = build_pool(42);
        let texts_a: Vec<&str> = a.iter().map(|p| p.text.as_str()).collect();
        let texts_b: Vec<&str> = b.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts_a, texts_b);
    }

    #[test]
    fn test_filter_unknown_topic_is_empty() {
        let pool = build_pool(1);
        assert!(filter(&pool, "t99", Lens::Calm).is_empty());
    }

    #[test]
    fn test_text_mentions_topic() {
        let pool = build_pool(9);
        let post = find(&pool, "t02_calm_0").unwrap();
        assert!(post.text.to_lowercase().contains("remote work"));
    }
}
