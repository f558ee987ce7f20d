//! Room commands: create a room from a deck, chat, render the solution
//! prompt, and manage the room's solution.

use anyhow::{bail, Context, Result};
use std::path::Path;

use flipside_core::persist::{load_rooms, load_session, save_rooms};
use flipside_core::prompt::{build_prompt, transcript_lines};
use flipside_core::room::{Room, RoomStore, SolutionStatus};
use flipside_core::snapshot::DeckSource;

use crate::config::Config;
use crate::display::{format_ts_relative, print_json, truncate};
use crate::generate::create_generator;
use crate::rewrite::solve_room;
use crate::sqlite_store::SqliteStore;

/// Where `flip room create` takes its deck from.
#[derive(Debug, Clone)]
pub enum DeckArg {
    /// A published deck by id.
    Deck(String),
    /// The current draft, as-is.
    Draft,
    /// A JSON deck file, in any legacy shape.
    File(std::path::PathBuf),
    /// The most recently published deck.
    Latest,
}

async fn open_rooms(config: &Config) -> Result<(SqliteStore, RoomStore)> {
    let store = SqliteStore::open(config).await?;
    let rooms = load_rooms(&store)
        .await?
        .with_default_title(&config.rooms.default_title);
    Ok((store, rooms))
}

async fn commit(store: SqliteStore, rooms: &RoomStore) -> Result<()> {
    save_rooms(&store, rooms).await?;
    store.close().await;
    Ok(())
}

fn require<'a>(rooms: &'a RoomStore, room_id: &str) -> Result<&'a Room> {
    rooms
        .get(room_id)
        .with_context(|| format!("room not found: {}", room_id))
}

pub async fn run_create(config: &Config, title: &str, source: DeckArg, json: bool) -> Result<()> {
    let (store, mut rooms) = open_rooms(config).await?;
    let session = load_session(&store, config.user.author(), config.pool.seed).await?;

    let room = match &source {
        DeckArg::Deck(deck_id) => {
            let Some(deck) = session.deck(deck_id) else {
                bail!("deck not found: {}", deck_id);
            };
            rooms.from_deck(title, DeckSource::Published(deck))
        }
        DeckArg::Latest => {
            let Some(deck) = session.published_decks().next() else {
                bail!("no published decks; pass --deck, --draft or --file");
            };
            rooms.from_deck(title, DeckSource::Published(deck))
        }
        DeckArg::Draft => {
            let Some(draft) = session.draft() else {
                bail!("no draft in progress");
            };
            rooms.from_deck(title, DeckSource::Draft(draft))
        }
        DeckArg::File(path) => {
            let value = read_json(path)?;
            rooms.from_deck(title, DeckSource::Json(&value))
        }
    };
    commit(store, &rooms).await?;

    if json {
        return print_json(&room);
    }
    println!("Created room {} \"{}\"", room.id, room.title);
    Ok(())
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

pub async fn run_list(config: &Config, json: bool) -> Result<()> {
    let (store, rooms) = open_rooms(config).await?;
    store.close().await;

    let list = rooms.list();
    if json {
        return print_json(&list);
    }
    if list.is_empty() {
        println!("No rooms.");
        return Ok(());
    }
    for room in list {
        let solution = match room.solution.as_ref().map(|s| s.status) {
            Some(SolutionStatus::Complete) => "solved",
            Some(SolutionStatus::Draft) => "draft",
            None => "-",
        };
        println!(
            "{}  {:<28} {:>3} msgs  {:<6} {}",
            room.id,
            truncate(&room.title, 28),
            room.messages.len(),
            solution,
            format_ts_relative(room.created_at)
        );
    }
    Ok(())
}

pub async fn run_show(config: &Config, room_id: &str, json: bool) -> Result<()> {
    let (store, rooms) = open_rooms(config).await?;
    store.close().await;
    let room = require(&rooms, room_id)?;

    if json {
        return print_json(room);
    }
    println!("{}  ({})", room.title, room.id);
    println!("Created {}", format_ts_relative(room.created_at));
    println!();
    for line in transcript_lines(room) {
        println!("{}", line);
    }
    if let Some(solution) = &room.solution {
        println!();
        println!("Solution ({:?}):", solution.status);
        println!("{}", solution.content);
    }
    Ok(())
}

pub async fn run_say(config: &Config, room_id: &str, author: Option<&str>, text: &str) -> Result<()> {
    let (store, mut rooms) = open_rooms(config).await?;
    require(&rooms, room_id)?;
    let author = author.unwrap_or(config.user.name.as_str());

    if rooms.append_chat_message(room_id, author, text).is_none() {
        bail!("message must not be empty");
    }
    let position = require(&rooms, room_id)?.messages.len();
    commit(store, &rooms).await?;
    println!("[{}] posted to {}", position, room_id);
    Ok(())
}

/// Prints the solution prompt for a stored room, or for a room JSON file.
pub async fn run_prompt(config: &Config, room_id: Option<&str>, file: Option<&Path>) -> Result<()> {
    let prompt = match (room_id, file) {
        (_, Some(path)) => {
            let room: Room = serde_json::from_value(read_json(path)?)
                .with_context(|| format!("{} is not a room", path.display()))?;
            build_prompt(&room)
        }
        (Some(room_id), None) => {
            let (store, rooms) = open_rooms(config).await?;
            store.close().await;
            build_prompt(require(&rooms, room_id)?)
        }
        (None, None) => bail!("pass a room id or --file"),
    };
    print!("{}", prompt);
    Ok(())
}

pub async fn run_solve(config: &Config, room_id: &str) -> Result<()> {
    let generator = create_generator(&config.generation)?;
    let (store, mut rooms) = open_rooms(config).await?;
    let content = solve_room(generator.as_ref(), require(&rooms, room_id)?).await?;

    rooms.set_solution_draft(room_id, &content);
    commit(store, &rooms).await?;
    tracing::info!(room = room_id, model = generator.model_name(), "solution drafted");
    println!("{}", content);
    Ok(())
}

/// Shows the solution, or replaces it with a hand-written draft.
pub async fn run_solution(config: &Config, room_id: &str, content: Option<&str>) -> Result<()> {
    let (store, mut rooms) = open_rooms(config).await?;
    require(&rooms, room_id)?;

    match content {
        Some(content) => {
            if content.trim().is_empty() {
                bail!("solution must not be empty");
            }
            rooms.set_solution_draft(room_id, content);
            commit(store, &rooms).await?;
            println!("Solution draft saved for {}", room_id);
        }
        None => {
            store.close().await;
            match &require(&rooms, room_id)?.solution {
                Some(solution) => println!("{}", solution.content),
                None => println!("No solution yet. Try `flip room solve {}`.", room_id),
            }
        }
    }
    Ok(())
}

pub async fn run_complete(config: &Config, room_id: &str) -> Result<()> {
    let (store, mut rooms) = open_rooms(config).await?;
    require(&rooms, room_id)?;
    if !rooms.complete_solution(room_id) {
        bail!("room {} has no solution to complete", room_id);
    }
    commit(store, &rooms).await?;
    println!("Solution marked complete.");
    Ok(())
}

pub async fn run_delete(config: &Config, room_id: &str) -> Result<()> {
    let (store, mut rooms) = open_rooms(config).await?;
    if !rooms.delete(room_id) {
        bail!("room not found: {}", room_id);
    }
    commit(store, &rooms).await?;
    println!("Deleted room {}", room_id);
    Ok(())
}
