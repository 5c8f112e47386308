use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context as _;

use crate::catalog::HttpCatalogClient;
use crate::cli::{FavoriteCommand, ListArgs, WishlistArgs};
use crate::config::Settings;
use crate::favorites::FavoritesStore;
use crate::kv_store::{KeyValueStore, LocalFsKeyValueStore};
use crate::preferences::Preferences;
use crate::render::{Renderer, TerminalRenderer};
use crate::session::{Intent, Session};
use crate::shell;
use crate::view::{ADDED_MESSAGE, EMPTY_WISHLIST_MESSAGE, REMOVED_MESSAGE};
use crate::wishlist::WishlistState;

fn catalog_client(settings: &Settings) -> anyhow::Result<HttpCatalogClient> {
    HttpCatalogClient::new(settings.api_url.clone(), settings.http_timeout)
}

fn storage(settings: &Settings) -> Arc<dyn KeyValueStore> {
    Arc::new(LocalFsKeyValueStore::new(&settings.data_dir))
}

async fn favorites(storage: Arc<dyn KeyValueStore>) -> anyhow::Result<FavoritesStore> {
    FavoritesStore::load(storage).await.context("load favorites")
}

pub async fn browse(settings: &Settings) -> anyhow::Result<()> {
    let source = catalog_client(settings)?;
    let storage = storage(settings);
    let favorites = favorites(Arc::clone(&storage)).await?;
    let mut session =
        Session::new(favorites, settings.page_size).with_preferences(Preferences::new(storage));

    tracing::info!(api_url = %settings.api_url, data_dir = %settings.data_dir.display(), "browse");

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut renderer = TerminalRenderer::new(std::io::stdout());
    shell::run_browse(&mut session, &source, input, &mut renderer).await
}

/// One-shot page render. Saved preferences are neither read nor written.
pub async fn list(settings: &Settings, args: ListArgs) -> anyhow::Result<()> {
    let source = catalog_client(settings)?;
    let favorites = favorites(storage(settings)).await?;
    let mut session = Session::new(favorites, settings.page_size);
    let mut renderer = TerminalRenderer::new(std::io::stdout());

    if let Err(err) = session.load(&source).await {
        renderer.page(&session.view().await)?;
        return Err(err).context("load catalog");
    }

    session.dispatch(Intent::Search(args.search)).await?;
    session.dispatch(Intent::SelectGenre(args.genre)).await?;
    session.dispatch(Intent::GoToPage(args.page)).await?;
    renderer.page(&session.view().await)
}

pub async fn genres(settings: &Settings) -> anyhow::Result<()> {
    let source = catalog_client(settings)?;
    let favorites = favorites(storage(settings)).await?;
    let mut session = Session::new(favorites, settings.page_size);
    let mut renderer = TerminalRenderer::new(std::io::stdout());

    if let Err(err) = session.load(&source).await {
        renderer.page(&session.view().await)?;
        return Err(err).context("load catalog");
    }
    renderer.genres(session.genres())
}

pub async fn favorite(settings: &Settings, command: FavoriteCommand) -> anyhow::Result<()> {
    let favorites = favorites(storage(settings)).await?;

    let lines = match command {
        FavoriteCommand::Toggle(args) => {
            let message = if favorites.toggle(args.id).await? {
                ADDED_MESSAGE
            } else {
                REMOVED_MESSAGE
            };
            vec![message.to_owned()]
        }
        FavoriteCommand::List => {
            let ids = favorites.ids().await;
            if ids.is_empty() {
                vec![EMPTY_WISHLIST_MESSAGE.to_owned()]
            } else {
                ids.iter().map(ToString::to_string).collect()
            }
        }
    };

    let mut out = std::io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush().context("flush output")
}

pub async fn wishlist(settings: &Settings, args: WishlistArgs) -> anyhow::Result<()> {
    let source = catalog_client(settings)?;
    let favorites = favorites(storage(settings)).await?;
    let mut renderer = TerminalRenderer::new(std::io::stdout());

    if args.once {
        let view = shell::load_wishlist(&favorites, &source, &mut renderer).await?;
        if let WishlistState::Failed(message) = view.state() {
            anyhow::bail!("{message}");
        }
        return Ok(());
    }

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    shell::run_wishlist(&favorites, &source, input, &mut renderer).await
}
