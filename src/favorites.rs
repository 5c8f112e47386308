use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Context as _;
use tokio::sync::Mutex;

use crate::formats::BookId;
use crate::kv_store::KeyValueStore;

pub const WISHLIST_KEY: &str = "wishlist";

/// Persisted set of favorited book ids.
///
/// The in-memory list only changes after the new list has been written, so a
/// failed write leaves both sides as they were. All mutations take the same
/// lock, which makes read-modify-persist atomic even if handlers overlap.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    ids: Mutex<Vec<BookId>>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore").finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Reads the persisted list. A missing or unreadable value is an empty
    /// set; duplicates are dropped keeping the first occurrence.
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let raw = storage
            .get(WISHLIST_KEY)
            .await
            .context("read favorites")?;
        let ids = match raw {
            Some(raw) => parse_ids(&raw),
            None => Vec::new(),
        };
        tracing::debug!(favorites = ids.len(), "favorites loaded");

        Ok(Self {
            storage,
            ids: Mutex::new(ids),
        })
    }

    pub async fn is_favorite(&self, id: BookId) -> bool {
        self.ids.lock().await.contains(&id)
    }

    /// Snapshot of the ids in insertion order.
    pub async fn ids(&self) -> Vec<BookId> {
        self.ids.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.ids.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ids.lock().await.is_empty()
    }

    /// Removes `id` if present, otherwise adds it. Returns whether `id` is a
    /// favorite afterwards.
    pub async fn toggle(&self, id: BookId) -> anyhow::Result<bool> {
        let mut ids = self.ids.lock().await;
        let mut next = ids.clone();
        let now_favorite = match next.iter().position(|existing| *existing == id) {
            Some(index) => {
                next.remove(index);
                false
            }
            None => {
                next.push(id);
                true
            }
        };

        self.persist(&next).await?;
        *ids = next;
        tracing::info!(id, favorite = now_favorite, "favorite toggled");
        Ok(now_favorite)
    }

    /// Removes `id`. Returns `false` without writing when it was not present.
    pub async fn remove(&self, id: BookId) -> anyhow::Result<bool> {
        let mut ids = self.ids.lock().await;
        let Some(index) = ids.iter().position(|existing| *existing == id) else {
            return Ok(false);
        };

        let mut next = ids.clone();
        next.remove(index);
        self.persist(&next).await?;
        *ids = next;
        tracing::info!(id, "favorite removed");
        Ok(true)
    }

    async fn persist(&self, ids: &[BookId]) -> anyhow::Result<()> {
        let serialized = serde_json::to_string(ids).context("serialize favorites")?;
        self.storage
            .put(WISHLIST_KEY, &serialized)
            .await
            .context("persist favorites")
    }
}

/// Accepts numbers and numeric strings (ids stored by a browser front end
/// may be either). Anything else makes the whole value unreadable.
fn parse_ids(raw: &str) -> Vec<BookId> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(err) => {
            tracing::warn!(error = %err, "stored favorites are malformed; starting empty");
            return Vec::new();
        }
    };

    let mut parsed = Vec::with_capacity(values.len());
    for value in values {
        let id = match &value {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse::<BookId>().ok(),
            _ => None,
        };
        match id {
            Some(id) => parsed.push(id),
            None => {
                tracing::warn!(%value, "stored favorites contain a non-id entry; starting empty");
                return Vec::new();
            }
        }
    }

    let mut seen = HashSet::new();
    parsed.retain(|id| seen.insert(*id));
    parsed
}
