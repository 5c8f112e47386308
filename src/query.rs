use crate::formats::Book;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenreFilter {
    #[default]
    Any,
    Genre(String),
}

impl GenreFilter {
    /// Empty (after trimming) selects every genre.
    pub fn from_selector(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            Self::Any
        } else {
            Self::Genre(raw.to_lowercase())
        }
    }

    /// Value persisted and shown in the selector; `""` for [`GenreFilter::Any`].
    pub fn selector_value(&self) -> &str {
        match self {
            Self::Any => "",
            Self::Genre(genre) => genre,
        }
    }

    fn matches(&self, book: &Book) -> bool {
        match self {
            Self::Any => true,
            Self::Genre(needle) => {
                let needle = needle.to_lowercase();
                book.subjects
                    .iter()
                    .any(|subject| subject.to_lowercase().contains(&needle))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search_text: String,
    genre: GenreFilter,
    current_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            genre: GenreFilter::Any,
            current_page: 1,
        }
    }
}

impl FilterState {
    pub fn new(search_text: impl Into<String>, genre: GenreFilter) -> Self {
        Self {
            search_text: search_text.into(),
            genre,
            current_page: 1,
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn genre(&self) -> &GenreFilter {
        &self.genre
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Resets to the first page.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.current_page = 1;
    }

    /// Resets to the first page.
    pub fn set_genre(&mut self, genre: GenreFilter) {
        self.genre = genre;
        self.current_page = 1;
    }

    /// Pages below 1 become 1. The upper bound depends on the catalog and is
    /// enforced by [`FilterState::clamp_to`].
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn clamp_to(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }

    fn matches(&self, book: &Book) -> bool {
        let query = self.search_text.to_lowercase();
        book.title.to_lowercase().contains(&query) && self.genre.matches(book)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredPage<'a> {
    pub books: Vec<&'a Book>,
    /// Page the slice was taken from, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

pub fn total_pages(matches: usize, page_size: usize) -> usize {
    matches.div_ceil(page_size.max(1))
}

/// Selects, paginates and slices the catalog. Pure: the same inputs always
/// give the same page.
pub fn filtered_page<'a>(
    catalog: &'a [Book],
    filter: &FilterState,
    page_size: usize,
) -> FilteredPage<'a> {
    let page_size = page_size.max(1);
    let selected: Vec<&Book> = catalog.iter().filter(|book| filter.matches(book)).collect();

    let total_matches = selected.len();
    let total_pages = total_pages(total_matches, page_size);
    let page = filter.current_page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let books = selected.into_iter().skip(start).take(page_size).collect();

    FilteredPage {
        books,
        page,
        total_pages,
        total_matches,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Previous { target: usize },
    Page { number: usize, active: bool },
    Next { target: usize },
}

/// Controls for `total_pages` pages with `current` active. Empty when there
/// are no pages.
pub fn pagination_controls(current: usize, total_pages: usize) -> Vec<PageControl> {
    if total_pages == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total_pages);
    let mut controls = Vec::with_capacity(total_pages + 2);
    if current > 1 {
        controls.push(PageControl::Previous {
            target: current - 1,
        });
    }
    controls.extend((1..=total_pages).map(|number| PageControl::Page {
        number,
        active: number == current,
    }));
    if current < total_pages {
        controls.push(PageControl::Next {
            target: current + 1,
        });
    }
    controls
}
