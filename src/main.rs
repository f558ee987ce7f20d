//! # Flipside CLI (`flip`)
//!
//! The `flip` binary drives People Mode and Rooms against a local SQLite
//! database.
//!
//! ## Usage
//!
//! ```bash
//! flip --config ./config/flip.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `flip init` | Create the SQLite database and schema |
//! | `flip lenses` / `flip topics` | Show the lens registry and topic catalog |
//! | `flip draft start "<anchor>" --topic <id>` | Open a new draft |
//! | `flip draft candidates <lens>` | List eligible posts for a lens |
//! | `flip draft lock <lens> <post>` | Lock a post into a lens slot |
//! | `flip draft publish` | Publish a fully locked draft |
//! | `flip decks list` | Published decks, newest first |
//! | `flip vote <post> up\|down` | Vote on every copy of a post |
//! | `flip room create` | Turn a deck into a room |
//! | `flip room say <room> "<text>"` | Append a chat message |
//! | `flip room prompt <room>` | Print the solution prompt |
//! | `flip room solve <room>` | Draft a solution with the generator |
//! | `flip rewrite "<text>"` | Rewrite text through all five lenses |
//!
//! Logging goes to stderr and is controlled by `FLIPSIDE_LOG` (or
//! `RUST_LOG`), e.g. `FLIPSIDE_LOG=flipside_core=debug`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use flipside::rooms::DeckArg;
use flipside::{catalog, config, generate, migrate, people, rewrite, rooms};
use flipside_core::ledger::Vote;
use flipside_core::lens::Lens;

/// Flipside — curate five-lens decks and discuss them in rooms.
#[derive(Parser)]
#[command(
    name = "flip",
    about = "Flipside People Mode — curate five-lens decks and turn them into discussion rooms",
    version
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "./config/flip.toml")]
    config: PathBuf,

    /// Log at debug level unless FLIPSIDE_LOG / RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and schema. Safe to run repeatedly.
    Init,

    /// List the five lenses.
    Lenses {
        #[arg(long)]
        json: bool,
    },

    /// List the topic catalog.
    Topics {
        #[arg(long)]
        json: bool,
    },

    /// Work on the in-progress deck.
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Browse published decks.
    Decks {
        #[command(subcommand)]
        action: DecksAction,
    },

    /// Vote on a post. Every copy (pool, draft, decks) is updated.
    Vote {
        post_id: String,
        #[arg(value_enum)]
        direction: Direction,
    },

    /// Reply to a post as the configured user.
    Reply { post_id: String, text: String },

    /// Discussion rooms.
    Room {
        #[command(subcommand)]
        action: RoomAction,
    },

    /// Rewrite text through every lens with the configured generator.
    Rewrite {
        text: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Open a new draft, replacing any unpublished one.
    Start {
        anchor: String,
        #[arg(long)]
        topic: String,
    },
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Posts eligible for a lens on the draft's topic.
    Candidates {
        lens: Lens,
        #[arg(long)]
        json: bool,
    },
    Lock {
        lens: Lens,
        post_id: String,
    },
    Unlock {
        lens: Lens,
    },
    /// Discard the draft.
    Clear,
    /// Publish once all five lenses are locked.
    Publish {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DecksAction {
    List {
        #[arg(long)]
        json: bool,
    },
    Show {
        deck_id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RoomAction {
    /// Create a room from a deck (latest published deck by default).
    Create {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, conflicts_with_all = ["draft", "file"])]
        deck: Option<String>,
        #[arg(long, conflicts_with = "file")]
        draft: bool,
        /// A deck as JSON, in any supported shape.
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    List {
        #[arg(long)]
        json: bool,
    },
    Show {
        room_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Append a chat message.
    Say {
        room_id: String,
        text: String,
        /// Defaults to the configured user name.
        #[arg(long)]
        author: Option<String>,
    },
    /// Print the transcript-bound solution prompt.
    Prompt {
        #[arg(required_unless_present = "file")]
        room_id: Option<String>,
        /// A room exported with `flip room show --json`.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Draft a solution with the configured generator.
    Solve { room_id: String },
    /// Show the solution, or save CONTENT as the solution draft.
    Solution {
        room_id: String,
        content: Option<String>,
    },
    /// Mark the solution complete.
    Complete { room_id: String },
    Delete { room_id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

impl From<Direction> for Vote {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => Vote::Up,
            Direction::Down => Vote::Down,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("FLIPSIDE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Commands that don't require config
    match &cli.command {
        Commands::Lenses { json } => return catalog::run_lenses(*json),
        Commands::Topics { json } => return catalog::run_topics(*json),
        Commands::Room {
            action: RoomAction::Prompt {
                room_id: None,
                file: Some(file),
            },
        } => {
            let cfg = config::Config::minimal();
            return rooms::run_prompt(&cfg, None, Some(file.as_path())).await;
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Lenses { .. } | Commands::Topics { .. } => {}
        Commands::Draft { action } => match action {
            DraftAction::Start { anchor, topic } => {
                people::run_start(&cfg, &anchor, &topic).await?;
            }
            DraftAction::Show { json } => people::run_show(&cfg, json).await?,
            DraftAction::Candidates { lens, json } => {
                people::run_candidates(&cfg, lens, json).await?;
            }
            DraftAction::Lock { lens, post_id } => people::run_lock(&cfg, lens, &post_id).await?,
            DraftAction::Unlock { lens } => people::run_unlock(&cfg, lens).await?,
            DraftAction::Clear => people::run_clear(&cfg).await?,
            DraftAction::Publish { json } => people::run_publish(&cfg, json).await?,
        },
        Commands::Decks { action } => match action {
            DecksAction::List { json } => people::run_decks(&cfg, json).await?,
            DecksAction::Show { deck_id, json } => people::run_deck(&cfg, &deck_id, json).await?,
        },
        Commands::Vote { post_id, direction } => {
            people::run_vote(&cfg, &post_id, direction.into()).await?;
        }
        Commands::Reply { post_id, text } => people::run_reply(&cfg, &post_id, &text).await?,
        Commands::Room { action } => match action {
            RoomAction::Create {
                title,
                deck,
                draft,
                file,
                json,
            } => {
                let source = match (deck, draft, file) {
                    (Some(id), _, _) => DeckArg::Deck(id),
                    (None, true, _) => DeckArg::Draft,
                    (None, false, Some(path)) => DeckArg::File(path),
                    (None, false, None) => DeckArg::Latest,
                };
                rooms::run_create(&cfg, &title, source, json).await?;
            }
            RoomAction::List { json } => rooms::run_list(&cfg, json).await?,
            RoomAction::Show { room_id, json } => rooms::run_show(&cfg, &room_id, json).await?,
            RoomAction::Say {
                room_id,
                text,
                author,
            } => rooms::run_say(&cfg, &room_id, author.as_deref(), &text).await?,
            RoomAction::Prompt { room_id, file } => {
                rooms::run_prompt(&cfg, room_id.as_deref(), file.as_deref()).await?;
            }
            RoomAction::Solve { room_id } => rooms::run_solve(&cfg, &room_id).await?,
            RoomAction::Solution { room_id, content } => {
                rooms::run_solution(&cfg, &room_id, content.as_deref()).await?;
            }
            RoomAction::Complete { room_id } => rooms::run_complete(&cfg, &room_id).await?,
            RoomAction::Delete { room_id } => rooms::run_delete(&cfg, &room_id).await?,
        },
        Commands::Rewrite { text, json } => {
            let generator = generate::create_generator(&cfg.generation)?;
            let rewrites = rewrite::rewrite_all(generator.as_ref(), &text).await;
            if json {
                flipside::display::print_json(&rewrites)?;
            } else {
                for (lens, rewritten) in rewrites.iter() {
                    match rewritten {
                        Some(text) => println!("{} {:<9} {}", lens.icon(), lens.id(), text),
                        None => println!("{} {:<9} (no rewrite)", lens.icon(), lens.id()),
                    }
                }
            }
        }
    }

    Ok(())
}
