use crate::catalog::{CatalogError, CatalogSource};
use crate::favorites::FavoritesStore;
use crate::formats::{Book, BookId};
use crate::view::{BookCard, WISHLIST_ERROR_MESSAGE};

/// Full records for the given favorite ids. An empty id list resolves to an
/// empty sequence without touching the network.
pub async fn resolve(
    ids: &[BookId],
    source: &dyn CatalogSource,
) -> Result<Vec<Book>, CatalogError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    source.fetch_by_ids(ids).await
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistState {
    Loaded(Vec<Book>),
    Failed(String),
}

/// The favorites-only view. Removing a book here removes it from the
/// favorites store first, then from the displayed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistView {
    state: WishlistState,
}

impl WishlistView {
    pub async fn load(favorites: &FavoritesStore, source: &dyn CatalogSource) -> Self {
        let ids = favorites.ids().await;
        let state = match resolve(&ids, source).await {
            Ok(books) => {
                tracing::info!(requested = ids.len(), returned = books.len(), "wishlist resolved");
                WishlistState::Loaded(books)
            }
            Err(err) => {
                tracing::error!(error = %err, "wishlist lookup failed");
                WishlistState::Failed(WISHLIST_ERROR_MESSAGE.to_owned())
            }
        };
        Self { state }
    }

    pub fn state(&self) -> &WishlistState {
        &self.state
    }

    pub fn books(&self) -> &[Book] {
        match &self.state {
            WishlistState::Loaded(books) => books.as_slice(),
            WishlistState::Failed(_) => &[],
        }
    }

    /// True once loaded with nothing left to show.
    pub fn is_empty(&self) -> bool {
        matches!(&self.state, WishlistState::Loaded(books) if books.is_empty())
    }

    pub fn cards(&self) -> Vec<BookCard> {
        self.books()
            .iter()
            .map(|book| BookCard::new(book, true))
            .collect()
    }

    /// Returns whether anything changed in either the store or the view.
    pub async fn remove(&mut self, favorites: &FavoritesStore, id: BookId) -> anyhow::Result<bool> {
        let removed_from_store = favorites.remove(id).await?;
        let removed_from_view = match &mut self.state {
            WishlistState::Loaded(books) => {
                let before = books.len();
                books.retain(|book| book.id != id);
                books.len() != before
            }
            WishlistState::Failed(_) => false,
        };
        Ok(removed_from_store || removed_from_view)
    }
}
