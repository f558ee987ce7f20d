//! Solution prompt builder.
//!
//! Renders a room's full transcript into a generation prompt that binds the
//! model to what was actually said. Message numbers are 1-based positions
//! in the log, derived on every call, so citations always line up with the
//! transcript as displayed.
//!
//! Transcript lines look like:
//!
//! ```text
//! [1] Seed (anchor) — Sam Rivera @sam: Ban phones in school
//! [7] Chat — Alex: I disagree
//! ```

use crate::room::{Message, MessageKind, Room};

/// Escape hatch the model must use for anything the chat never covered.
pub const NOT_STATED: &str = "Not stated in chat.";

pub const SECTION_CASE: &str = "## The Case for This Approach";
pub const SECTION_PLAN: &str = "## The Plan";
pub const SECTION_RISKS: &str = "## Risks & Unknowns";
pub const SECTION_OUTCOMES: &str = "## Expected Outcomes / Measures";
pub const PROVENANCE_LABEL: &str = "Provenance — cited messages:";

/// One numbered line per message, in log order.
pub fn transcript_lines(room: &Room) -> Vec<String> {
    room.messages
        .iter()
        .enumerate()
        .map(|(i, message)| render_line(i + 1, message))
        .collect()
}

fn render_line(number: usize, message: &Message) -> String {
    let label = match (message.kind, message.lens) {
        (MessageKind::Seed, Some(tag)) => format!("Seed ({})", tag),
        (MessageKind::Seed, None) => "Seed".to_string(),
        (MessageKind::Chat, _) => "Chat".to_string(),
    };
    format!(
        "[{}] {} — {}: {}",
        number,
        label,
        message.author,
        single_line(&message.content)
    )
}

/// Keeps each message on one transcript line.
fn single_line(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the full solution prompt for `room`. Pure and deterministic.
pub fn build_prompt(room: &Room) -> String {
    let transcript = transcript_lines(room).join("\n");
    let last = room.messages.len();

    format!(
        r#"You are writing the solution for a discussion room titled "{title}".
The transcript below is the ONLY source you may use.

Rules:
1. Use only information that appears in the transcript. Do not add outside facts, numbers, names, studies, or examples.
2. If a section needs information the transcript does not contain, write exactly: "{not_stated}"
3. Every concrete claim must end with a bracketed citation of the message number(s) it relies on, for example [2] or [3][{last}]. Valid numbers are 1 through {last}.
4. Do not cite a number for a claim the cited message does not make.
5. Write one flowing Markdown article, not a list of notes. No preamble, no closing remarks outside the structure.

Structure (in this order):
# <A short, specific title drawn from the discussion>
<A two or three sentence lede stating the proposed solution, with citations.>

{case}
<Why this approach, grounded in what participants said.>

{plan}
<Concrete steps that were proposed or agreed in the chat.>

{risks}
<Objections, trade-offs, and open questions raised in the chat.>

{outcomes}
<How participants said success would be recognised or measured.>

---
{provenance} <every message number cited above, ascending, comma-separated>

Transcript:
{transcript}
"#,
        title = room.title,
        not_stated = NOT_STATED,
        last = last,
        case = SECTION_CASE,
        plan = SECTION_PLAN,
        risks = SECTION_RISKS,
        outcomes = SECTION_OUTCOMES,
        provenance = PROVENANCE_LABEL,
        transcript = transcript,
    )
}
