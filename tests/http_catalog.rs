mod catalog_stub;

use std::sync::Arc;
use std::time::Duration;

use catalog_stub::{CatalogStub, StubBehavior, sample_catalog};
use gutenshelf::catalog::{CatalogError, CatalogSource, HttpCatalogClient};
use gutenshelf::favorites::FavoritesStore;
use gutenshelf::kv_store::{KeyValueStore, LocalFsKeyValueStore};
use gutenshelf::wishlist::{WishlistState, WishlistView};
use predicates::prelude::*;
use url::Url;

fn client(stub: &CatalogStub) -> HttpCatalogClient {
    let endpoint = Url::parse(&stub.books_url()).expect("stub url");
    HttpCatalogClient::new(endpoint, Duration::from_secs(5)).expect("build client")
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_all_decodes_every_record() -> anyhow::Result<()> {
    let stub = CatalogStub::spawn(StubBehavior::Catalog(sample_catalog()));
    let books = client(&stub).fetch_all().await?;

    assert_eq!(books.len(), 8);
    assert_eq!(books[0].id, 2701);
    assert_eq!(books[6].author_name(), "Unknown Author");
    assert_eq!(stub.requests(), ["/books"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn non_json_and_error_status_are_typed_failures() {
    let stub = CatalogStub::spawn(StubBehavior::NotJson);
    let err = client(&stub).fetch_all().await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode { .. }), "{err}");

    let stub = CatalogStub::spawn(StubBehavior::Unavailable);
    let err = client(&stub).fetch_all().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { .. }), "{err}");

    let stub = CatalogStub::spawn(StubBehavior::NotFound);
    let err = client(&stub).fetch_all().await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode { .. }), "{err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn wishlist_requests_comma_joined_ids() -> anyhow::Result<()> {
    let stub = CatalogStub::spawn(StubBehavior::Catalog(sample_catalog()));
    let temp = tempfile::TempDir::new()?;
    let storage = Arc::new(LocalFsKeyValueStore::new(temp.path()));
    storage.put("wishlist", "[345,84]").await?;

    let favorites = FavoritesStore::load(storage.clone()).await?;
    let mut view = WishlistView::load(&favorites, &client(&stub)).await;

    assert_eq!(stub.requests(), ["/books?ids=345,84"]);
    let titles: Vec<&str> = view.books().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["Dracula", "Frankenstein"]);

    assert!(view.remove(&favorites, 84).await?);
    assert_eq!(storage.get("wishlist").await?.as_deref(), Some("[345]"));
    assert!(view.remove(&favorites, 345).await?);
    assert!(view.is_empty());
    assert_eq!(stub.requests().len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_wishlist_never_calls_the_api() -> anyhow::Result<()> {
    let stub = CatalogStub::spawn(StubBehavior::Catalog(sample_catalog()));
    let temp = tempfile::TempDir::new()?;
    let favorites = FavoritesStore::load(Arc::new(LocalFsKeyValueStore::new(temp.path()))).await?;

    let view = WishlistView::load(&favorites, &client(&stub)).await;
    assert_eq!(view.state(), &WishlistState::Loaded(Vec::new()));
    assert!(stub.requests().is_empty());
    Ok(())
}

#[test]
fn wishlist_cli_once_renders_favorites() -> anyhow::Result<()> {
    let stub = CatalogStub::spawn(StubBehavior::Catalog(sample_catalog()));
    let temp = tempfile::TempDir::new()?;
    std::fs::write(temp.path().join("wishlist.json"), "[2701, 11]")?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("gutenshelf");
    cmd.args([
        "--api-url",
        &stub.books_url(),
        "--data-dir",
        temp.path().to_str().unwrap(),
        "wishlist",
        "--once",
    ])
    .assert()
    .success()
    .stdout(predicate::str::starts_with("Loading wishlist...\n"))
    .stdout(predicate::str::contains("♥ [2701] Moby Dick; Or, The Whale"))
    .stdout(predicate::str::contains("♥ [11] Alice's Adventures in Wonderland"));

    assert_eq!(stub.requests(), ["/books?ids=2701,11"]);
    Ok(())
}

#[test]
fn wishlist_cli_empty_state_makes_no_request() -> anyhow::Result<()> {
    let stub = CatalogStub::spawn(StubBehavior::Catalog(sample_catalog()));
    let temp = tempfile::TempDir::new()?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("gutenshelf");
    cmd.args([
        "--api-url",
        &stub.books_url(),
        "--data-dir",
        temp.path().to_str().unwrap(),
        "wishlist",
        "--once",
    ])
    .assert()
    .success()
    .stdout("Your wishlist is empty.\n");

    assert!(stub.requests().is_empty());
    Ok(())
}

#[test]
fn wishlist_cli_remove_until_empty() -> anyhow::Result<()> {
    let stub = CatalogStub::spawn(StubBehavior::Catalog(sample_catalog()));
    let temp = tempfile::TempDir::new()?;
    std::fs::write(temp.path().join("wishlist.json"), "[345, 84]")?;

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("gutenshelf");
    cmd.args([
        "--api-url",
        &stub.books_url(),
        "--data-dir",
        temp.path().to_str().unwrap(),
        "wishlist",
    ])
    .write_stdin("remove 84\nremove 345\nquit\n")
    .assert()
    .success()
    .stdout(predicate::str::contains("♥ [84] Frankenstein"))
    .stdout(predicate::str::contains("Book has been removed from your wishlist.\n"))
    .stdout(predicate::str::ends_with("Your wishlist is empty.\n"));

    assert_eq!(stub.requests(), ["/books?ids=345,84"]);
    let stored = std::fs::read_to_string(temp.path().join("wishlist.json"))?;
    assert_eq!(stored, "[]");
    Ok(())
}
