use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://gutendex.com/books";
pub const DEFAULT_DATA_DIR: &str = "gutenshelf-data";
pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const API_URL_ENV: &str = "GUTENSHELF_API_URL";
const DATA_DIR_ENV: &str = "GUTENSHELF_DATA_DIR";
const PAGE_SIZE_ENV: &str = "GUTENSHELF_PAGE_SIZE";
const HTTP_TIMEOUT_ENV: &str = "GUTENSHELF_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: Url,
    pub data_dir: PathBuf,
    pub page_size: usize,
    pub http_timeout: Duration,
}

/// Values given on the command line; anything left `None` falls back to the
/// environment and then to the built-in default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub page_size: Option<usize>,
}

impl Settings {
    pub fn resolve(overrides: Overrides) -> anyhow::Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(
        overrides: Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let lookup = |key: &str| {
            env(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let api_url = match overrides.api_url {
            Some(raw) => parse_api_url(&raw).context("invalid --api-url")?,
            None => match lookup(API_URL_ENV) {
                Some(raw) => parse_api_url(&raw)
                    .with_context(|| format!("invalid {API_URL_ENV}={raw:?}"))?,
                None => parse_api_url(DEFAULT_API_URL)?,
            },
        };

        let data_dir = overrides
            .data_dir
            .or_else(|| lookup(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let page_size = match overrides.page_size {
            Some(size) => check_page_size(size).context("invalid --page-size")?,
            None => match lookup(PAGE_SIZE_ENV) {
                Some(raw) => parse_page_size(&raw)
                    .with_context(|| format!("invalid {PAGE_SIZE_ENV}={raw:?}"))?,
                None => DEFAULT_PAGE_SIZE,
            },
        };

        let http_timeout = match lookup(HTTP_TIMEOUT_ENV) {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .with_context(|| format!("invalid {HTTP_TIMEOUT_ENV}={raw:?}"))?;
                if secs == 0 {
                    anyhow::bail!("{HTTP_TIMEOUT_ENV} must be > 0");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            data_dir,
            page_size,
            http_timeout,
        })
    }
}

pub fn parse_api_url(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        anyhow::bail!("api url is empty");
    }
    let url = Url::parse(raw).with_context(|| format!("parse api url: {raw}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("api url must be http/https: {url}");
    }
    Ok(url)
}

fn parse_page_size(raw: &str) -> anyhow::Result<usize> {
    let size = raw.parse::<usize>().context("parse page size")?;
    check_page_size(size)
}

fn check_page_size(size: usize) -> anyhow::Result<usize> {
    if size == 0 {
        anyhow::bail!("page size must be > 0");
    }
    Ok(size)
}
