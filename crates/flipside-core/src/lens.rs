//! The lens registry.
//!
//! A lens is one of five fixed rewrite styles. The registry order
//! `[calm, bridge, cynical, opposite, playful]` is load-bearing: it decides
//! the order of seed messages in a room and the default progression when a
//! user locks candidates into a draft.
//!
//! # Example
//!
//! ```rust
//! use flipside_core::lens::{get_lens, list_lenses, Lens};
//!
//! assert_eq!(list_lenses()[0], Lens::Calm);
//! assert_eq!(get_lens("playful").unwrap(), Lens::Playful);
//! assert!(get_lens("sarcastic").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned by [`get_lens`] for an id outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown lens '{0}' (expected one of: calm, bridge, cynical, opposite, playful)")]
pub struct UnknownLensError(pub String);

/// One of the five rewrite styles.
///
/// `Ord` follows registry order, so a `BTreeMap<Lens, _>` iterates in the
/// same order as [`list_lenses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lens {
    Calm,
    Bridge,
    Cynical,
    Opposite,
    Playful,
}

/// All lenses in registry order.
pub const LENSES: [Lens; 5] = [
    Lens::Calm,
    Lens::Bridge,
    Lens::Cynical,
    Lens::Opposite,
    Lens::Playful,
];

/// Returns the lenses in registry order.
pub fn list_lenses() -> [Lens; 5] {
    LENSES
}

/// Looks up a lens by id. Matching ignores ASCII case and surrounding
/// whitespace.
pub fn get_lens(id: &str) -> Result<Lens, UnknownLensError> {
    let wanted = id.trim();
    LENSES
        .iter()
        .copied()
        .find(|lens| lens.id().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| UnknownLensError(id.to_string()))
}

impl Lens {
    /// Stable lowercase identifier, also used as the JSON representation.
    pub fn id(self) -> &'static str {
        match self {
            Lens::Calm => "calm",
            Lens::Bridge => "bridge",
            Lens::Cynical => "cynical",
            Lens::Opposite => "opposite",
            Lens::Playful => "playful",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lens::Calm => "Calm",
            Lens::Bridge => "Bridge",
            Lens::Cynical => "Cynical",
            Lens::Opposite => "Opposite",
            Lens::Playful => "Playful",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Lens::Calm => "🌿",
            Lens::Bridge => "🌉",
            Lens::Cynical => "🙄",
            Lens::Opposite => "🔄",
            Lens::Playful => "🎈",
        }
    }

    /// Rewrite instruction handed to the text generator as its system prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Lens::Calm => {
                "Rewrite the post in a calm, measured tone. Keep the author's position, \
                 remove heat and exaggeration, and keep it under 280 characters."
            }
            Lens::Bridge => {
                "Rewrite the post so it speaks to someone who disagrees. Acknowledge \
                 the strongest concern on the other side and look for shared ground. \
                 Keep it under 280 characters."
            }
            Lens::Cynical => {
                "Rewrite the post as a dry, skeptical observer would. Point at the \
                 incentives and the gap between promise and reality without insults. \
                 Keep it under 280 characters."
            }
            Lens::Opposite => {
                "Write the strongest good-faith version of the opposite position to \
                 the post. Do not strawman. Keep it under 280 characters."
            }
            Lens::Playful => {
                "Rewrite the post with light, friendly humor. Keep the point intact, \
                 punch at ideas rather than people, and keep it under 280 characters."
            }
        }
    }
}

impl fmt::Display for Lens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Lens {
    type Err = UnknownLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        get_lens(s)
    }
}

/// A value for every lens.
///
/// Used wherever a mapping must be total (published decks, room snapshots),
/// so a missing lens is unrepresentable. Serializes as an object keyed by
/// lens id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensSet<T> {
    pub calm: T,
    pub bridge: T,
    pub cynical: T,
    pub opposite: T,
    pub playful: T,
}

impl<T> LensSet<T> {
    /// Builds a set by calling `f` once per lens, in registry order.
    pub fn from_fn(mut f: impl FnMut(Lens) -> T) -> Self {
        Self {
            calm: f(Lens::Calm),
            bridge: f(Lens::Bridge),
            cynical: f(Lens::Cynical),
            opposite: f(Lens::Opposite),
            playful: f(Lens::Playful),
        }
    }

    pub fn get(&self, lens: Lens) -> &T {
        match lens {
            Lens::Calm => &self.calm,
            Lens::Bridge => &self.bridge,
            Lens::Cynical => &self.cynical,
            Lens::Opposite => &self.opposite,
            Lens::Playful => &self.playful,
        }
    }

    pub fn get_mut(&mut self, lens: Lens) -> &mut T {
        match lens {
            Lens::Calm => &mut self.calm,
            Lens::Bridge => &mut self.bridge,
            Lens::Cynical => &mut self.cynical,
            Lens::Opposite => &mut self.opposite,
            Lens::Playful => &mut self.playful,
        }
    }

    /// Iterates `(lens, value)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (Lens, &T)> {
        LENSES.into_iter().map(move |lens| (lens, self.get(lens)))
    }
}

impl<T> LensSet<Option<T>> {
    /// `Some` only when every lens holds a value.
    pub fn transpose(self) -> Option<LensSet<T>> {
        Some(LensSet {
            calm: self.calm?,
            bridge: self.bridge?,
            cynical: self.cynical?,
            opposite: self.opposite?,
            playful: self.playful?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_is_fixed() {
        let ids: Vec<&str> = list_lenses().iter().map(|l| l.id()).collect();
        assert_eq!(ids, ["calm", "bridge", "cynical", "opposite", "playful"]);
    }

    #[test]
    fn test_get_lens_accepts_case_and_whitespace() {
        assert_eq!(get_lens(" Bridge ").unwrap(), Lens::Bridge);
        assert_eq!("OPPOSITE".parse::<Lens>().unwrap(), Lens::Opposite);
    }

    #[test]
    fn test_get_lens_unknown() {
        let err = get_lens("anchor").unwrap_err();
        assert_eq!(err, UnknownLensError("anchor".to_string()));
        assert!(err.to_string().contains("unknown lens 'anchor'"));
    }

    #[test]
    fn test_ord_matches_registry() {
        let mut shuffled = vec![Lens::Playful, Lens::Calm, Lens::Opposite, Lens::Bridge, Lens::Cynical];
        shuffled.sort();
        assert_eq!(shuffled, LENSES.to_vec());
    }

    #[test]
    fn test_lens_serializes_as_id() {
        assert_eq!(serde_json::to_string(&Lens::Cynical).unwrap(), "\"cynical\"");
        let back: Lens = serde_json::from_str("\"playful\"").unwrap();
        assert_eq!(back, Lens::Playful);
    }

    #[test]
    fn test_lens_set_iterates_in_order() {
        let set = LensSet::from_fn(|l| l.id().len());
        let pairs: Vec<(Lens, usize)> = set.iter().map(|(l, v)| (l, *v)).collect();
        assert_eq!(pairs[0], (Lens::Calm, 4));
        assert_eq!(pairs[4], (Lens::Playful, 7));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["opposite"], 8);
    }

    #[test]
    fn test_transpose_requires_every_lens() {
        let full = LensSet::from_fn(Some);
        assert_eq!(full.transpose().map(|s| s.playful), Some(Lens::Playful));

        let partial = LensSet::from_fn(|l| (l != Lens::Bridge).then_some(l));
        assert!(partial.transpose().is_none());
    }
}
