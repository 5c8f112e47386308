use std::sync::Arc;

use anyhow::Context as _;

use crate::kv_store::KeyValueStore;
use crate::query::{FilterState, GenreFilter};

pub const SEARCH_KEY: &str = "search_books";
pub const GENRE_KEY: &str = "filter_books";

/// Last search text and genre selection, restored on the next browse session.
#[derive(Clone)]
pub struct Preferences {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Absent or malformed values restore as empty; storage errors are
    /// logged and treated the same way.
    pub async fn restore(&self) -> FilterState {
        let search = self.read_string(SEARCH_KEY).await;
        let genre = self.read_string(GENRE_KEY).await;
        FilterState::new(search, GenreFilter::from_selector(&genre))
    }

    pub async fn save(&self, filter: &FilterState) -> anyhow::Result<()> {
        let search = serde_json::to_string(filter.search_text()).context("serialize search")?;
        let genre =
            serde_json::to_string(filter.genre().selector_value()).context("serialize genre")?;
        self.storage
            .put(SEARCH_KEY, &search)
            .await
            .context("persist search text")?;
        self.storage
            .put(GENRE_KEY, &genre)
            .await
            .context("persist genre filter")?;
        Ok(())
    }

    async fn read_string(&self, key: &str) -> String {
        let raw = match self.storage.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return String::new(),
            Err(err) => {
                tracing::warn!(key, error = %format!("{err:#}"), "read preference failed");
                return String::new();
            }
        };
        match serde_json::from_str::<String>(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "stored preference is malformed; ignoring");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv_store::MemoryKeyValueStore;

    #[tokio::test]
    async fn save_then_restore() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let prefs = Preferences::new(storage.clone());

        let mut filter = FilterState::new("Dick", GenreFilter::from_selector("Fiction"));
        filter.set_page(3);
        prefs.save(&filter).await.unwrap();

        assert_eq!(
            storage.get(SEARCH_KEY).await.unwrap().as_deref(),
            Some("\"Dick\"")
        );
        assert_eq!(
            storage.get(GENRE_KEY).await.unwrap().as_deref(),
            Some("\"fiction\"")
        );

        let restored = prefs.restore().await;
        assert_eq!(restored.search_text(), "Dick");
        assert_eq!(restored.genre(), &GenreFilter::Genre("fiction".to_owned()));
        assert_eq!(restored.current_page(), 1);
    }

    #[tokio::test]
    async fn absent_or_malformed_values_restore_empty() {
        let prefs = Preferences::new(Arc::new(MemoryKeyValueStore::new()));
        assert_eq!(prefs.restore().await, FilterState::default());

        let prefs = Preferences::new(Arc::new(MemoryKeyValueStore::with_entries([
            (SEARCH_KEY, "dick"),
            (GENRE_KEY, "[1,2]"),
        ])));
        assert_eq!(prefs.restore().await, FilterState::default());
    }

    #[tokio::test]
    async fn empty_genre_restores_as_any() {
        let prefs = Preferences::new(Arc::new(MemoryKeyValueStore::with_entries([
            (SEARCH_KEY, "\"dick\""),
            (GENRE_KEY, "\"\""),
        ])));
        let restored = prefs.restore().await;
        assert_eq!(restored, FilterState::new("dick", GenreFilter::Any));
    }
}
