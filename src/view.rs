use crate::formats::{Book, BookId};
use crate::query::PageControl;

pub const LOAD_ERROR_MESSAGE: &str = "Error loading books. Please try again later.";
pub const WISHLIST_ERROR_MESSAGE: &str = "Error loading wishlist. Please try again later.";
pub const NO_RESULTS_MESSAGE: &str = "No books found.";
pub const EMPTY_WISHLIST_MESSAGE: &str = "Your wishlist is empty.";
pub const LOADING_BOOKS_MESSAGE: &str = "Loading books...";
pub const LOADING_WISHLIST_MESSAGE: &str = "Loading wishlist...";
pub const ADDED_MESSAGE: &str = "Book has been added to your wishlist.";
pub const REMOVED_MESSAGE: &str = "Book has been removed from your wishlist.";

const GENRES_SHORT_MAX_CHARS: usize = 40;

/// Everything the renderer needs to draw one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCard {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genres: String,
    pub genres_short: String,
    pub cover_url: String,
    pub favorite: bool,
}

impl BookCard {
    pub fn new(book: &Book, favorite: bool) -> Self {
        let genres = book.genres_line();
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author_name().to_owned(),
            genres_short: truncate_chars(&genres, GENRES_SHORT_MAX_CHARS),
            genres,
            cover_url: book.cover_url().to_owned(),
            favorite,
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Loading,
    Failed(String),
    Empty,
    Books(Vec<BookCard>),
}

/// Derived state of the browse view. Rebuilt after every intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub listing: Listing,
    pub page: usize,
    pub total_pages: usize,
    pub controls: Vec<PageControl>,
}
