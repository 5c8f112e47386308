use anyhow::Context as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};

use crate::catalog::CatalogSource;
use crate::favorites::FavoritesStore;
use crate::formats::BookId;
use crate::render::{LoadingTarget, Renderer};
use crate::session::{Feedback, Intent, Session};
use crate::view::{ADDED_MESSAGE, REMOVED_MESSAGE};
use crate::wishlist::WishlistView;

pub const BROWSE_HELP: &str = "\
commands:
  search <text>   filter by title (empty clears)
  genre <name>    filter by genre (empty clears)
  page <n>        go to page n
  next | prev     move one page
  fav <id>        add or remove a book from the wishlist
  genres          list genres in the catalog
  reload          fetch the catalog again
  help            show this help
  quit            leave";

pub const WISHLIST_HELP: &str = "\
commands:
  remove <id>     remove a book from the wishlist
  help            show this help
  quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Intent(Intent),
    Genres,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistCommand {
    Remove(BookId),
    Help,
    Quit,
}

/// `Ok(None)` for a blank line.
pub fn parse_browse_command(line: &str) -> anyhow::Result<Option<BrowseCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = split_verb(line);

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => BrowseCommand::Intent(Intent::Search(rest.to_owned())),
        "genre" | "g" => BrowseCommand::Intent(Intent::SelectGenre(rest.to_owned())),
        "page" => BrowseCommand::Intent(Intent::GoToPage(parse_number(rest, "page")?)),
        "next" | "n" => BrowseCommand::Intent(Intent::NextPage),
        "prev" | "previous" | "p" => BrowseCommand::Intent(Intent::PreviousPage),
        "fav" | "toggle" | "f" => {
            BrowseCommand::Intent(Intent::ToggleFavorite(parse_number(rest, "id")?))
        }
        "genres" => BrowseCommand::Genres,
        "reload" => BrowseCommand::Reload,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => anyhow::bail!("unknown command: {other} (type `help`)"),
    };
    Ok(Some(command))
}

pub fn parse_wishlist_command(line: &str) -> anyhow::Result<Option<WishlistCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = split_verb(line);

    let command = match verb.to_ascii_lowercase().as_str() {
        "remove" | "rm" | "fav" => WishlistCommand::Remove(parse_number(rest, "id")?),
        "help" | "?" => WishlistCommand::Help,
        "quit" | "exit" | "q" => WishlistCommand::Quit,
        other => anyhow::bail!("unknown command: {other} (type `help`)"),
    };
    Ok(Some(command))
}

fn split_verb(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> anyhow::Result<T> {
    if raw.is_empty() {
        anyhow::bail!("missing {what}");
    }
    raw.parse::<T>()
        .map_err(|_| anyhow::anyhow!("invalid {what}: {raw:?}"))
}

/// Loads the catalog behind a loading indicator and renders the result.
pub async fn load_and_render(
    session: &mut Session,
    source: &dyn CatalogSource,
    renderer: &mut dyn Renderer,
) -> anyhow::Result<bool> {
    renderer.show_loading(LoadingTarget::Books)?;
    let loaded = session.load(source).await;
    renderer.hide_loading(LoadingTarget::Books)?;

    renderer.page(&session.view().await)?;
    Ok(loaded.is_ok())
}

/// Event loop of the browse view: one line of `input` is one intent, handled
/// to completion before the next line is read.
pub async fn run_browse<R>(
    session: &mut Session,
    source: &dyn CatalogSource,
    input: R,
    renderer: &mut dyn Renderer,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    load_and_render(session, source, renderer).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("read input")? {
        let command = match parse_browse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                renderer.notice(&err.to_string())?;
                continue;
            }
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => renderer.notice(BROWSE_HELP)?,
            BrowseCommand::Genres => renderer.genres(session.genres())?,
            BrowseCommand::Reload => {
                load_and_render(session, source, renderer).await?;
            }
            BrowseCommand::Intent(intent) => match session.dispatch(intent).await {
                Ok(feedback) => {
                    match feedback {
                        Feedback::FavoriteAdded(_) => renderer.notice(ADDED_MESSAGE)?,
                        Feedback::FavoriteRemoved(_) => renderer.notice(REMOVED_MESSAGE)?,
                        Feedback::None => {}
                    }
                    renderer.page(&session.view().await)?;
                }
                Err(err) => {
                    tracing::warn!(error = %format!("{err:#}"), "intent failed");
                    renderer.notice(&format!("error: {err:#}"))?;
                }
            },
        }
    }

    Ok(())
}

/// Resolves the wishlist behind a loading indicator (skipped when there is
/// nothing to fetch) and renders it.
pub async fn load_wishlist(
    favorites: &FavoritesStore,
    source: &dyn CatalogSource,
    renderer: &mut dyn Renderer,
) -> anyhow::Result<WishlistView> {
    let fetches = !favorites.is_empty().await;
    if fetches {
        renderer.show_loading(LoadingTarget::Wishlist)?;
    }
    let view = WishlistView::load(favorites, source).await;
    if fetches {
        renderer.hide_loading(LoadingTarget::Wishlist)?;
    }
    renderer.wishlist(&view)?;
    Ok(view)
}

pub async fn run_wishlist<R>(
    favorites: &FavoritesStore,
    source: &dyn CatalogSource,
    input: R,
    renderer: &mut dyn Renderer,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut view = load_wishlist(favorites, source, renderer).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("read input")? {
        let command = match parse_wishlist_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                renderer.notice(&err.to_string())?;
                continue;
            }
        };

        match command {
            WishlistCommand::Quit => break,
            WishlistCommand::Help => renderer.notice(WISHLIST_HELP)?,
            WishlistCommand::Remove(id) => match view.remove(favorites, id).await {
                Ok(true) => {
                    renderer.notice(REMOVED_MESSAGE)?;
                    renderer.wishlist(&view)?;
                }
                Ok(false) => renderer.notice(&format!("book {id} is not in your wishlist"))?,
                Err(err) => {
                    tracing::warn!(error = %format!("{err:#}"), "remove failed");
                    renderer.notice(&format!("error: {err:#}"))?;
                }
            },
        }
    }

    Ok(())
}
