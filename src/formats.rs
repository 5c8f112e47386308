use std::collections::HashMap;

use serde::Deserialize;

pub type BookId = u64;

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const NO_GENRES: &str = "No genres available";
pub const PLACEHOLDER_COVER: &str = "default-book-cover.jpg";
pub const COVER_FORMAT: &str = "image/jpeg";

/// Response body of the catalog endpoint. Paging fields (`count`, `next`)
/// are ignored; a body without `results` is not a catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    pub results: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<Person>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub formats: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Person {
    pub name: String,
}

impl Book {
    pub fn author_name(&self) -> &str {
        self.authors
            .first()
            .map(|author| author.name.as_str())
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn genres_line(&self) -> String {
        if self.subjects.is_empty() {
            return NO_GENRES.to_owned();
        }
        self.subjects.join(", ")
    }

    pub fn cover_url(&self) -> &str {
        self.formats
            .get(COVER_FORMAT)
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(PLACEHOLDER_COVER)
    }
}
