//! Generator-backed operations: lens rewrites of a post and drafted room
//! solutions.
//!
//! Rewrites call the generator once per lens, sequentially, with the lens
//! instruction as the system prompt. A lens whose call fails is left empty
//! and logged; the others still land.

use anyhow::{Context, Result};

use flipside_core::lens::{LensSet, LENSES};
use flipside_core::prompt::build_prompt;
use flipside_core::room::Room;

use crate::generate::TextGenerator;

/// Per-lens rewrite text. `None` means that lens has no rewrite yet.
pub type LensRewrites = LensSet<Option<String>>;

const SOLUTION_SYSTEM_PROMPT: &str = "You draft grounded solutions from discussion transcripts. \
Follow the user's instructions exactly and cite only the numbered messages provided.";

pub async fn rewrite_all(generator: &dyn TextGenerator, text: &str) -> LensRewrites {
    let mut rewrites = LensRewrites::from_fn(|_| None);
    let text = text.trim();
    if text.is_empty() {
        return rewrites;
    }

    for lens in LENSES {
        match generator.generate(lens.instruction(), text).await {
            Ok(rewritten) => {
                tracing::debug!(lens = %lens, model = generator.model_name(), "rewrite ok");
                *rewrites.get_mut(lens) = Some(rewritten);
            }
            Err(e) => {
                tracing::warn!(lens = %lens, error = %e, "rewrite failed");
            }
        }
    }
    rewrites
}

/// Drafts a solution for `room` from its full transcript. The caller stores
/// the result with `RoomStore::set_solution_draft`.
pub async fn solve_room(generator: &dyn TextGenerator, room: &Room) -> Result<String> {
    let prompt = build_prompt(room);
    generator
        .generate(SOLUTION_SYSTEM_PROMPT, &prompt)
        .await
        .with_context(|| format!("Failed to generate a solution for room {}", room.id))
}
