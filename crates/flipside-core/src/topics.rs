//! Static topic catalog.
//!
//! Topic ids are opaque to the curator; an id missing from this table is
//! tolerated and simply has no candidates.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: &'static str,
    pub label: &'static str,
}

pub const TOPICS: [Topic; 8] = [
    Topic { id: "t01", label: "Phones in schools" },
    Topic { id: "t02", label: "Remote work" },
    Topic { id: "t03", label: "City cycling lanes" },
    Topic { id: "t04", label: "AI in classrooms" },
    Topic { id: "t05", label: "Four-day work week" },
    Topic { id: "t06", label: "Tipping culture" },
    Topic { id: "t07", label: "Social media age limits" },
    Topic { id: "t08", label: "Public transit fares" },
];

pub fn list_topics() -> &'static [Topic] {
    &TOPICS
}

pub fn find_topic(id: &str) -> Option<&'static Topic> {
    TOPICS.iter().find(|t| t.id == id)
}
