use std::collections::HashSet;

use crate::catalog::{CatalogError, CatalogSource, CatalogStore, Genre, LoadState};
use crate::favorites::FavoritesStore;
use crate::formats::BookId;
use crate::preferences::Preferences;
use crate::query::{self, FilterState, GenreFilter};
use crate::view::{BookCard, LOAD_ERROR_MESSAGE, Listing, PageView};

/// A user action on the browse view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Search(String),
    SelectGenre(String),
    GoToPage(usize),
    NextPage,
    PreviousPage,
    ToggleFavorite(BookId),
}

/// Side information for the renderer about what an intent did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    None,
    FavoriteAdded(BookId),
    FavoriteRemoved(BookId),
}

/// Browse session state: the loaded catalog, the favorites, the saved
/// preferences and the current filter. Every intent goes through
/// [`Session::dispatch`]; the visible page is derived by [`Session::view`].
#[derive(Debug)]
pub struct Session {
    catalog: CatalogStore,
    favorites: FavoritesStore,
    preferences: Option<Preferences>,
    filter: FilterState,
    page_size: usize,
}

impl Session {
    pub fn new(favorites: FavoritesStore, page_size: usize) -> Self {
        Self {
            catalog: CatalogStore::new(),
            favorites,
            preferences: None,
            filter: FilterState::default(),
            page_size: page_size.max(1),
        }
    }

    /// Search text and genre are saved on change and restored after load.
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn genres(&self) -> &[Genre] {
        self.catalog.genres()
    }

    /// Fetches the catalog once, then restores saved preferences when the
    /// load succeeded.
    pub async fn load(&mut self, source: &dyn CatalogSource) -> Result<(), CatalogError> {
        self.catalog.load(source).await?;
        if let Some(preferences) = &self.preferences {
            self.filter = preferences.restore().await;
            tracing::debug!(
                search = self.filter.search_text(),
                genre = self.filter.genre().selector_value(),
                "restored preferences"
            );
        }
        Ok(())
    }

    pub async fn dispatch(&mut self, intent: Intent) -> anyhow::Result<Feedback> {
        tracing::debug!(?intent, "dispatch");
        match intent {
            Intent::Search(text) => {
                self.filter.set_search_text(text);
                self.save_preferences().await;
            }
            Intent::SelectGenre(genre) => {
                self.filter.set_genre(GenreFilter::from_selector(&genre));
                self.save_preferences().await;
            }
            Intent::GoToPage(page) => {
                self.filter.set_page(page);
                self.clamp_page();
            }
            Intent::NextPage => {
                self.filter
                    .set_page(self.filter.current_page().saturating_add(1));
                self.clamp_page();
            }
            Intent::PreviousPage => {
                self.filter
                    .set_page(self.filter.current_page().saturating_sub(1));
                self.clamp_page();
            }
            Intent::ToggleFavorite(id) => {
                let now_favorite = self.favorites.toggle(id).await?;
                return Ok(if now_favorite {
                    Feedback::FavoriteAdded(id)
                } else {
                    Feedback::FavoriteRemoved(id)
                });
            }
        }
        Ok(Feedback::None)
    }

    pub async fn view(&self) -> PageView {
        let page = query::filtered_page(self.catalog.books(), &self.filter, self.page_size);
        let controls = match self.catalog.state() {
            LoadState::Ready => query::pagination_controls(page.page, page.total_pages),
            _ => Vec::new(),
        };

        let listing = match self.catalog.state() {
            LoadState::Unloaded => Listing::Loading,
            LoadState::Failed(_) => Listing::Failed(LOAD_ERROR_MESSAGE.to_owned()),
            LoadState::Ready if page.books.is_empty() => Listing::Empty,
            LoadState::Ready => {
                let favorites: HashSet<BookId> = self.favorites.ids().await.into_iter().collect();
                Listing::Books(
                    page.books
                        .iter()
                        .map(|book| BookCard::new(book, favorites.contains(&book.id)))
                        .collect(),
                )
            }
        };

        PageView {
            listing,
            page: page.page,
            total_pages: page.total_pages,
            controls,
        }
    }

    fn clamp_page(&mut self) {
        let matches = query::filtered_page(self.catalog.books(), &self.filter, self.page_size)
            .total_matches;
        self.filter
            .clamp_to(query::total_pages(matches, self.page_size));
    }

    async fn save_preferences(&self) {
        let Some(preferences) = &self.preferences else {
            return;
        };
        if let Err(err) = preferences.save(&self.filter).await {
            tracing::warn!(error = %format!("{err:#}"), "save preferences failed");
        }
    }
}
