use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::Value;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Serve `books` on the catalog path; `?ids=` filters them.
    Catalog(Vec<Value>),
    /// Answer 200 with an HTML body.
    NotJson,
    /// Answer 503.
    Unavailable,
    /// Answer 200 with a JSON object that has no `results`.
    NotFound,
}

/// Minimal stand-in for the gutendex `/books` endpoint that records every
/// request URL it sees.
pub struct CatalogStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

#[allow(dead_code)]
impl CatalogStub {
    pub fn spawn(behavior: StubBehavior) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start catalog stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                seen.lock().expect("lock request log").push(url.clone());

                let (path, query) = match url.split_once('?') {
                    Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
                    None => (url.clone(), None),
                };
                if path != "/books" {
                    let _ = request.respond(
                        tiny_http::Response::from_string("not found").with_status_code(404),
                    );
                    continue;
                }

                let books = match &behavior {
                    StubBehavior::Catalog(books) => books,
                    StubBehavior::NotJson => {
                        let _ = request.respond(
                            tiny_http::Response::from_string("<html>maintenance</html>")
                                .with_status_code(200),
                        );
                        continue;
                    }
                    StubBehavior::Unavailable => {
                        let _ = request.respond(
                            tiny_http::Response::from_string("unavailable").with_status_code(503),
                        );
                        continue;
                    }
                    StubBehavior::NotFound => {
                        let _ = request.respond(
                            tiny_http::Response::from_string(r#"{"detail":"Not found."}"#)
                                .with_status_code(200),
                        );
                        continue;
                    }
                };

                let wanted_ids = query.as_deref().and_then(parse_ids_param);
                let results: Vec<&Value> = books
                    .iter()
                    .filter(|book| match &wanted_ids {
                        Some(ids) => book
                            .get("id")
                            .and_then(Value::as_u64)
                            .is_some_and(|id| ids.contains(&id)),
                        None => true,
                    })
                    .collect();

                let body = serde_json::json!({
                    "count": results.len(),
                    "next": null,
                    "previous": null,
                    "results": results,
                });

                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                let response = tiny_http::Response::from_string(body.to_string())
                    .with_status_code(200)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn books_url(&self) -> String {
        format!("{}/books", self.base_url)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock request log").clone()
    }
}

impl Drop for CatalogStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn parse_ids_param(query: &str) -> Option<Vec<u64>> {
    let raw = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("ids="))?;
    Some(
        raw.split(',')
            .filter_map(|id| id.trim().parse::<u64>().ok())
            .collect(),
    )
}

#[allow(dead_code)]
pub fn book(id: u64, title: &str, author: Option<&str>, subjects: &[&str]) -> Value {
    let authors = match author {
        Some(name) => serde_json::json!([{ "name": name, "birth_year": null, "death_year": null }]),
        None => serde_json::json!([]),
    };
    serde_json::json!({
        "id": id,
        "title": title,
        "authors": authors,
        "subjects": subjects,
        "formats": {
            "image/jpeg": format!("https://covers.example/{id}.jpg"),
            "text/plain; charset=us-ascii": format!("https://text.example/{id}.txt"),
        },
        "download_count": 1000 + id,
    })
}

/// Eight books across two pages; only one title contains "dick".
#[allow(dead_code)]
pub fn sample_catalog() -> Vec<Value> {
    vec![
        book(
            2701,
            "Moby Dick; Or, The Whale",
            Some("Melville, Herman"),
            &["Whales -- Fiction", "Sea stories"],
        ),
        book(345, "Dracula", Some("Stoker, Bram"), &["Horror tales", "Vampires -- Fiction"]),
        book(1342, "Pride and Prejudice", Some("Austen, Jane"), &["Love stories"]),
        book(84, "Frankenstein", Some("Shelley, Mary"), &["Science fiction", "Horror tales"]),
        book(11, "Alice's Adventures in Wonderland", Some("Carroll, Lewis"), &["Fantasy fiction"]),
        book(98, "A Tale of Two Cities", Some("Dickens, Charles"), &["Historical fiction"]),
        book(1080, "A Modest Proposal", None, &[]),
        book(64317, "The Great Gatsby", Some("Fitzgerald, F. Scott"), &["Fiction"]),
    ]
}
