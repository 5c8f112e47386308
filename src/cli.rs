use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Catalog endpoint [env: GUTENSHELF_API_URL] [default: https://gutendex.com/books].
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding the wishlist and saved filters [env: GUTENSHELF_DATA_DIR].
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Books per page [env: GUTENSHELF_PAGE_SIZE] [default: 6].
    #[arg(long, global = true)]
    pub page_size: Option<usize>,
}

impl GlobalArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            data_dir: self.data_dir.clone(),
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive catalog browser reading commands from stdin.
    Browse,
    /// Render one page of the catalog and exit.
    List(ListArgs),
    /// Print the genres found in the catalog.
    Genres,
    Favorite {
        #[command(subcommand)]
        command: FavoriteCommand,
    },
    /// Show the wishlist (favorited books).
    Wishlist(WishlistArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive title filter.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Case-insensitive genre filter (substring of a subject).
    #[arg(long, default_value = "")]
    pub genre: String,

    /// Page to show (clamped to the available pages).
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Debug, Subcommand)]
pub enum FavoriteCommand {
    /// Add the book if absent, remove it if present.
    Toggle(FavoriteToggleArgs),
    /// Print favorited ids, one per line.
    List,
}

#[derive(Debug, Args)]
pub struct FavoriteToggleArgs {
    #[arg(long)]
    pub id: u64,
}

#[derive(Debug, Args)]
pub struct WishlistArgs {
    /// Render once and exit instead of reading commands from stdin.
    #[arg(long)]
    pub once: bool,
}
