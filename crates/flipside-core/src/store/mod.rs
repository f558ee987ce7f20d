//! Storage abstraction for Flipside state.
//!
//! The prototype keeps its state as JSON blobs under a handful of fixed
//! keys. The [`Store`] trait is that key-value surface; backends decide
//! where the blobs live (in memory, SQLite).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

/// Candidate pool, including its vote and reply counters.
pub const POOL_KEY: &str = "people.pool.v1";
/// The single in-progress draft (absent when there is none).
pub const DRAFT_KEY: &str = "people.draft.v1";
/// Published decks, oldest first.
pub const DECKS_KEY: &str = "people.decks.v1";
/// All rooms.
pub const ROOMS_KEY: &str = "rooms.v1";

/// Abstract key-value blob store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_blob`](Store::get_blob) | Read a blob, `None` when absent |
/// | [`put_blob`](Store::put_blob) | Insert or overwrite a blob |
/// | [`delete_blob`](Store::delete_blob) | Remove a blob, reporting whether it existed |
/// | [`list_keys`](Store::list_keys) | All keys, sorted |
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_blob(&self, key: &str) -> Result<Option<String>>;

    /// Last write wins; there is no conflict detection.
    async fn put_blob(&self, key: &str, value: &str) -> Result<()>;

    async fn delete_blob(&self, key: &str) -> Result<bool>;

    async fn list_keys(&self) -> Result<Vec<String>>;
}
