//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, temporary upload
//! and static directories, and a full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use pw_core::config::Config;
use pw_db::pool::{init_memory_pool, DbPool};
use pw_server::context::AppContext;
use pw_server::router::build_router;
use tempfile::TempDir;

pub const LANDING_PAGE: &str = "<html><body>photowall test page</body></html>";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a temporary directory tree:
///
/// ```text
/// <tmp>/uploads/
/// <tmp>/static/index.html
/// ```
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub tmp: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration pointed at temp dirs.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let static_dir = tmp.path().join("static");
        std::fs::create_dir_all(&static_dir).expect("failed to create static dir");
        std::fs::write(static_dir.join("index.html"), LANDING_PAGE)
            .expect("failed to write landing page");

        let mut config = Config::default();
        config.server.upload_dir = tmp.path().join("uploads");
        config.server.static_dir = Some(static_dir);
        config.server.db_path = tmp.path().join("unused.db");

        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(config, db.clone());
        ctx.uploads.ensure().expect("failed to create upload dir");

        Self { ctx, db, tmp }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Directory the server stores uploads in.
    pub fn upload_dir(&self) -> PathBuf {
        self.ctx.uploads.root().to_path_buf()
    }

    /// Names of the files currently in the upload directory.
    pub fn files_on_disk(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir())
            .expect("failed to read upload dir")
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// POST a file to `/upload` under the `photo` field.
pub async fn upload(addr: SocketAddr, filename: &str, data: &[u8]) -> reqwest::Response {
    let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename.to_string());
    let form = reqwest::multipart::Form::new().part("photo", part);
    reqwest::Client::new()
        .post(format!("http://{addr}/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

/// GET `/api/photos` and return the parsed array.
pub async fn list(addr: SocketAddr) -> Vec<serde_json::Value> {
    let resp = reqwest::get(format!("http://{addr}/api/photos")).await.unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

/// Filenames from `/api/photos`, in listing order.
pub async fn list_names(addr: SocketAddr) -> Vec<String> {
    list(addr)
        .await
        .iter()
        .map(|p| p["filename"].as_str().unwrap().to_string())
        .collect()
}

/// POST a JSON order to `/api/reorder`.
pub async fn reorder(addr: SocketAddr, order: &[&str]) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/api/reorder"))
        .json(&order)
        .send()
        .await
        .unwrap()
}

/// DELETE `/api/photos/{raw_segment}`. The segment is sent as given.
pub async fn delete(addr: SocketAddr, raw_segment: &str) -> reqwest::Response {
    reqwest::Client::new()
        .delete(format!("http://{addr}/api/photos/{raw_segment}"))
        .send()
        .await
        .unwrap()
}
