//! # Flipside Core
//!
//! Runtime-agnostic logic for Flipside People Mode and Rooms: the lens
//! registry, the candidate pool, the deck curator state machine, the
//! engagement ledger, room snapshots and transcripts, and the solution
//! prompt builder.
//!
//! This crate contains no tokio, sqlx, HTTP, or filesystem I/O. Storage is
//! reached only through the [`store::Store`] trait.
//!
//! ```text
//! lens ─▶ pool ─▶ curator ─▶ snapshot ─▶ room ─▶ prompt
//!                   │
//!                 ledger
//! ```

pub mod curator;
pub mod ledger;
pub mod lens;
pub mod models;
pub mod persist;
pub mod pool;
pub mod prompt;
pub mod room;
pub mod snapshot;
pub mod store;
pub mod topics;
