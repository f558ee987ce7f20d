//! Loading and saving Flipside state through a [`Store`].
//!
//! State is best-effort: a blob that fails to parse is treated as absent
//! (logged, never returned as an error), so a corrupt key resets that piece
//! of state instead of wedging the app. Store I/O failures still propagate.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::curator::{CuratorSession, Draft, PublishedDeck};
use crate::models::{Author, Post};
use crate::pool::build_pool;
use crate::room::{Room, RoomStore};
use crate::store::{Store, DECKS_KEY, DRAFT_KEY, POOL_KEY, ROOMS_KEY};

/// Reads and parses `key`. Missing or corrupt blobs yield `None`.
pub async fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    let Some(raw) = store.get_blob(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring corrupt state blob");
            Ok(None)
        }
    }
}

pub async fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    let raw = serde_json::to_string(value)
        .with_context(|| format!("Failed to serialize state for '{}'", key))?;
    store.put_blob(key, &raw).await
}

/// Loads the curator session, generating (and not yet saving) a fresh pool
/// from `seed` when none is stored.
pub async fn load_session<S>(store: &S, owner: Author, seed: u64) -> Result<CuratorSession>
where
    S: Store + ?Sized,
{
    let pool = match load_json::<Vec<Post>, _>(store, POOL_KEY).await? {
        Some(pool) if !pool.is_empty() => pool,
        _ => {
            tracing::debug!(seed, "building candidate pool");
            build_pool(seed)
        }
    };
    let draft: Option<Draft> = load_json(store, DRAFT_KEY).await?;
    let decks: Vec<PublishedDeck> = load_json(store, DECKS_KEY).await?.unwrap_or_default();
    Ok(CuratorSession::restore(owner, pool, draft, decks))
}

/// Writes pool, draft, and decks. An absent draft deletes its key.
pub async fn save_session<S>(store: &S, session: &CuratorSession) -> Result<()>
where
    S: Store + ?Sized,
{
    save_json(store, POOL_KEY, session.pool()).await?;
    match session.draft() {
        Some(draft) => save_json(store, DRAFT_KEY, draft).await?,
        None => {
            store.delete_blob(DRAFT_KEY).await?;
        }
    }
    save_json(store, DECKS_KEY, session.deck_log()).await
}

pub async fn load_rooms<S>(store: &S) -> Result<RoomStore>
where
    S: Store + ?Sized,
{
    let rooms: Vec<Room> = load_json(store, ROOMS_KEY).await?.unwrap_or_default();
    Ok(RoomStore::new(rooms))
}

pub async fn save_rooms<S>(store: &S, rooms: &RoomStore) -> Result<()>
where
    S: Store + ?Sized,
{
    save_json(store, ROOMS_KEY, rooms.rooms()).await
}
