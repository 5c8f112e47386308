use std::io::Write;

use anyhow::Context as _;

use crate::catalog::Genre;
use crate::query::PageControl;
use crate::view::{
    BookCard, EMPTY_WISHLIST_MESSAGE, LOADING_BOOKS_MESSAGE, LOADING_WISHLIST_MESSAGE, Listing,
    NO_RESULTS_MESSAGE, PageView,
};
use crate::wishlist::{WishlistState, WishlistView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingTarget {
    Books,
    Wishlist,
}

/// Draws derived views. Implementations hold no session state.
pub trait Renderer {
    fn show_loading(&mut self, target: LoadingTarget) -> anyhow::Result<()>;
    fn hide_loading(&mut self, target: LoadingTarget) -> anyhow::Result<()>;
    fn page(&mut self, view: &PageView) -> anyhow::Result<()>;
    fn wishlist(&mut self, view: &WishlistView) -> anyhow::Result<()>;
    fn genres(&mut self, genres: &[Genre]) -> anyhow::Result<()>;
    fn notice(&mut self, message: &str) -> anyhow::Result<()>;
}

/// Plain-text renderer for a terminal or any other byte sink.
#[derive(Debug)]
pub struct TerminalRenderer<W> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn card(&mut self, card: &BookCard) -> anyhow::Result<()> {
        let heart = if card.favorite { "♥" } else { "♡" };
        writeln!(self.out, "{heart} [{}] {}", card.id, card.title)?;
        writeln!(self.out, "    Author: {}", card.author)?;
        writeln!(self.out, "    Genre: {}", card.genres_short)?;
        writeln!(self.out, "    Cover: {}", card.cover_url)?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn show_loading(&mut self, target: LoadingTarget) -> anyhow::Result<()> {
        let message = match target {
            LoadingTarget::Books => LOADING_BOOKS_MESSAGE,
            LoadingTarget::Wishlist => LOADING_WISHLIST_MESSAGE,
        };
        writeln!(self.out, "{message}").context("write loading indicator")?;
        self.out.flush().context("flush output")
    }

    fn hide_loading(&mut self, target: LoadingTarget) -> anyhow::Result<()> {
        // Text already written cannot be taken back; the next render follows it.
        tracing::debug!(?target, "loading finished");
        Ok(())
    }

    fn page(&mut self, view: &PageView) -> anyhow::Result<()> {
        match &view.listing {
            Listing::Loading => writeln!(self.out, "{LOADING_BOOKS_MESSAGE}")?,
            Listing::Failed(message) => writeln!(self.out, "{message}")?,
            Listing::Empty => writeln!(self.out, "{NO_RESULTS_MESSAGE}")?,
            Listing::Books(cards) => {
                for card in cards {
                    self.card(card)?;
                }
            }
        }

        if !view.controls.is_empty() {
            let controls = view
                .controls
                .iter()
                .map(|control| match control {
                    PageControl::Previous { .. } => "< Previous".to_owned(),
                    PageControl::Page {
                        number,
                        active: true,
                    } => format!("[{number}]"),
                    PageControl::Page { number, .. } => number.to_string(),
                    PageControl::Next { .. } => "Next >".to_owned(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(self.out, "{controls}")?;
        }
        self.out.flush().context("flush output")
    }

    fn wishlist(&mut self, view: &WishlistView) -> anyhow::Result<()> {
        match view.state() {
            WishlistState::Failed(message) => writeln!(self.out, "{message}")?,
            WishlistState::Loaded(books) if books.is_empty() => {
                writeln!(self.out, "{EMPTY_WISHLIST_MESSAGE}")?
            }
            WishlistState::Loaded(_) => {
                for card in view.cards() {
                    self.card(&card)?;
                }
            }
        }
        self.out.flush().context("flush output")
    }

    fn genres(&mut self, genres: &[Genre]) -> anyhow::Result<()> {
        for genre in genres {
            writeln!(self.out, "{}\t{}", genre.value, genre.display)?;
        }
        self.out.flush().context("flush output")
    }

    fn notice(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush().context("flush output")
    }
}
