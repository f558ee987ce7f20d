//! # Flipside
//!
//! People Mode and Rooms for Flipside: curate a deck of five
//! community posts (one per lens) around an anchor post, publish it, and
//! turn it into a discussion room whose transcript drives a grounded
//! solution prompt.
//!
//! Domain logic lives in [`flipside_core`]; this crate adds the SQLite
//! store, TOML configuration, the text generator, and the `flip` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────┐
//! │ flip (CLI)   │──▶│ flipside-core│──▶│  SQLite  │
//! │ draft/room   │   │ curator/room │   │  kv blobs│
//! └──────┬───────┘   └──────────────┘   └──────────┘
//!        │
//!        ▼
//!  ┌────────────┐
//!  │ generator  │  (disabled | openai)
//!  └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! flip init
//! flip draft start "Ban phones in school" --topic t01
//! flip draft candidates calm
//! flip draft lock calm t01_calm_1
//! flip draft publish
//! flip room create --title "Phones debate"
//! flip room prompt <room-id>
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool |
//! | [`migrate`] | Schema for the `kv` table |
//! | [`sqlite_store`] | `Store` implementation over SQLite |
//! | [`generate`] | Text generator trait and providers |
//! | [`rewrite`] | Lens rewrites and room solutions via a generator |
//! | [`catalog`] | `flip lenses` / `flip topics` |
//! | [`people`] | Draft, deck, vote, and reply commands |
//! | [`rooms`] | Room commands |
//! | [`display`] | Terminal formatting helpers |

pub mod catalog;
pub mod config;
pub mod db;
pub mod display;
pub mod generate;
pub mod migrate;
pub mod people;
pub mod rewrite;
pub mod rooms;
pub mod sqlite_store;
