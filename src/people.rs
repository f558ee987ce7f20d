//! People Mode commands: the draft lifecycle, published decks, and
//! engagement (votes and replies).
//!
//! Every command follows the same shape: open the store, restore the
//! [`CuratorSession`], apply one operation, save, print. A refused
//! operation (blank anchor, ineligible post, incomplete draft) is reported
//! as an error so the process exits non-zero; nothing is saved in that case.

use anyhow::{bail, Result};

use flipside_core::curator::{CuratorSession, PublishedDeck};
use flipside_core::ledger::Vote;
use flipside_core::lens::Lens;
use flipside_core::models::Post;
use flipside_core::persist::{load_session, save_session};
use flipside_core::topics::find_topic;

use crate::config::Config;
use crate::display::{format_ts_relative, print_json, truncate};
use crate::sqlite_store::SqliteStore;

async fn open_session(config: &Config) -> Result<(SqliteStore, CuratorSession)> {
    let store = SqliteStore::open(config).await?;
    let session = load_session(&store, config.user.author(), config.pool.seed).await?;
    Ok((store, session))
}

async fn commit(store: SqliteStore, session: &CuratorSession) -> Result<()> {
    save_session(&store, session).await?;
    store.close().await;
    Ok(())
}

fn topic_label(topic_id: &str) -> &str {
    find_topic(topic_id).map(|t| t.label).unwrap_or(topic_id)
}

// ═══════════════════════════════════════════════════════════════════════
// Draft
// ═══════════════════════════════════════════════════════════════════════

pub async fn run_start(config: &Config, anchor: &str, topic_id: &str) -> Result<()> {
    let (store, mut session) = open_session(config).await?;
    if !session.start_draft(anchor, topic_id) {
        bail!("anchor text must not be empty");
    }
    if find_topic(topic_id).is_none() {
        tracing::warn!(topic = topic_id, "topic is not in the catalog; no candidates will match");
    }
    commit(store, &session).await?;

    println!("Draft started on {} ({}).", topic_label(topic_id), topic_id);
    if let Some(lens) = session.next_unlocked_lens() {
        println!("Next: flip draft candidates {}", lens);
    }
    Ok(())
}

pub async fn run_show(config: &Config, json: bool) -> Result<()> {
    let (store, session) = open_session(config).await?;
    store.close().await;

    let (Some(draft), Some(status)) = (session.draft(), session.status()) else {
        if json {
            return print_json(&serde_json::Value::Null);
        }
        println!("No draft in progress.");
        return Ok(());
    };

    if json {
        return print_json(&serde_json::json!({
            "draft": draft,
            "status": status,
            "ready": status.is_ready(),
        }));
    }

    println!("Draft {}", draft.id);
    println!("  Topic:   {} ({})", topic_label(&draft.topic_id), draft.topic_id);
    println!("  Anchor:  {}", draft.anchor_text);
    println!("  Started: {}", format_ts_relative(draft.created_at));
    println!();
    for lens in flipside_core::lens::LENSES {
        match draft.locked.get(&lens) {
            Some(post) => println!(
                "  {} {:<9} {}  {}",
                lens.icon(),
                lens.id(),
                post.id,
                truncate(&post.text, 60)
            ),
            None => println!("  {} {:<9} (open)", lens.icon(), lens.id()),
        }
    }
    println!();
    if status.is_ready() {
        println!("Ready to publish.");
    } else {
        let missing: Vec<&str> = status.missing.iter().map(|l| l.id()).collect();
        println!("Missing: {}", missing.join(", "));
    }
    Ok(())
}

pub async fn run_candidates(config: &Config, lens: Lens, json: bool) -> Result<()> {
    let (store, session) = open_session(config).await?;
    store.close().await;

    let Some(draft) = session.draft() else {
        bail!("no draft in progress; run `flip draft start` first");
    };
    let candidates = session.candidates(lens);
    let locked_id = draft.locked.get(&lens).map(|p| p.id.as_str());

    if json {
        return print_json(&candidates);
    }

    if candidates.is_empty() {
        println!("No candidates for {} on {}.", lens, draft.topic_id);
        return Ok(());
    }

    println!("{} {} candidates on {}:", lens.icon(), lens.label(), topic_label(&draft.topic_id));
    for (i, post) in candidates.iter().enumerate() {
        let marker = if Some(post.id.as_str()) == locked_id { "*" } else { " " };
        println!(
            "{} {}. {:<22} {:>+4}  {}",
            marker,
            i + 1,
            post.id,
            post.votes,
            post.author.display_name()
        );
        println!("     {}", truncate(&post.text, 72));
    }
    Ok(())
}

pub async fn run_lock(config: &Config, lens: Lens, post_id: &str) -> Result<()> {
    let (store, mut session) = open_session(config).await?;
    if session.draft().is_none() {
        bail!("no draft in progress; run `flip draft start` first");
    }
    if !session.lock(lens, post_id) {
        bail!("post {} is not a {} candidate for this draft's topic", post_id, lens);
    }
    commit(store, &session).await?;

    println!("Locked {} → {}", lens, post_id);
    match session.next_unlocked_lens() {
        Some(next) => println!("Next: flip draft candidates {}", next),
        None => println!("All lenses locked. Run `flip draft publish`."),
    }
    Ok(())
}

pub async fn run_unlock(config: &Config, lens: Lens) -> Result<()> {
    let (store, mut session) = open_session(config).await?;
    if !session.unlock(lens) {
        bail!("{} is not locked", lens);
    }
    commit(store, &session).await?;
    println!("Unlocked {}", lens);
    Ok(())
}

pub async fn run_clear(config: &Config) -> Result<()> {
    let (store, mut session) = open_session(config).await?;
    let had_draft = session.draft().is_some();
    session.clear();
    commit(store, &session).await?;
    if had_draft {
        println!("Draft cleared.");
    } else {
        println!("No draft in progress.");
    }
    Ok(())
}

pub async fn run_publish(config: &Config, json: bool) -> Result<()> {
    let (store, mut session) = open_session(config).await?;
    let Some(status) = session.status() else {
        bail!("no draft in progress; run `flip draft start` first");
    };
    let Some(deck) = session.publish() else {
        let missing: Vec<&str> = status.missing.iter().map(|l| l.id()).collect();
        bail!("draft is incomplete; missing: {}", missing.join(", "));
    };
    commit(store, &session).await?;

    if json {
        return print_json(&deck);
    }
    println!("Published deck {}", deck.id);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Decks
// ═══════════════════════════════════════════════════════════════════════

pub async fn run_decks(config: &Config, json: bool) -> Result<()> {
    let (store, session) = open_session(config).await?;
    store.close().await;

    let decks: Vec<&PublishedDeck> = session.published_decks().collect();
    if json {
        return print_json(&decks);
    }
    if decks.is_empty() {
        println!("No published decks.");
        return Ok(());
    }
    for deck in decks {
        println!(
            "{}  {:<24} {:<12} {}",
            deck.id,
            topic_label(&deck.topic_id),
            format_ts_relative(deck.published_at),
            truncate(&deck.anchor.text, 40)
        );
    }
    Ok(())
}

pub async fn run_deck(config: &Config, deck_id: &str, json: bool) -> Result<()> {
    let (store, session) = open_session(config).await?;
    store.close().await;

    let Some(deck) = session.deck(deck_id) else {
        bail!("deck not found: {}", deck_id);
    };
    if json {
        return print_json(deck);
    }

    println!("Deck {}", deck.id);
    println!("  Topic:     {} ({})", topic_label(&deck.topic_id), deck.topic_id);
    println!("  Owner:     {}", deck.owner.display_name());
    println!("  Published: {}", format_ts_relative(deck.published_at));
    println!();
    print_post("anchor", &deck.anchor);
    for (lens, post) in deck.locked.iter() {
        print_post(lens.id(), post);
    }
    Ok(())
}

fn print_post(label: &str, post: &Post) {
    println!(
        "  [{}] {}  {:+} votes, {} replies",
        label,
        post.author.display_name(),
        post.votes,
        post.replies.len()
    );
    println!("      {}", post.text);
    println!("      id: {}", post.id);
}

// ═══════════════════════════════════════════════════════════════════════
// Engagement
// ═══════════════════════════════════════════════════════════════════════

pub async fn run_vote(config: &Config, post_id: &str, vote: Vote) -> Result<()> {
    let (store, mut session) = open_session(config).await?;
    let copies = session.vote(post_id, vote);
    if copies == 0 {
        bail!("post not found: {}", post_id);
    }
    commit(store, &session).await?;

    let votes = session
        .post_copies(post_id)
        .first()
        .map(|p| p.votes)
        .unwrap_or_default();
    println!(
        "{} now at {:+} ({} cop{} updated)",
        post_id,
        votes,
        copies,
        if copies == 1 { "y" } else { "ies" }
    );
    Ok(())
}

pub async fn run_reply(config: &Config, post_id: &str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("reply text must not be empty");
    }
    let (store, mut session) = open_session(config).await?;
    let Some(reply) = session.add_reply(post_id, text, config.user.author()) else {
        bail!("post not found: {}", post_id);
    };
    commit(store, &session).await?;
    println!("Reply {} added to {}", reply.id, post_id);
    Ok(())
}
