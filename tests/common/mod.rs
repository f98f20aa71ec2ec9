//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use ersatz::definitions::load_dir;
use ersatz::{ErsatzConfig, HttpServer, Registry, Shutdown};
use ersatz_client::ErsatzClient;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const DEFAULT_JSON: &str =
    r#"{ "response_code": 200, "headers": { "header-1": "some value" }, "body": { "a":1, "b":2, "c":3 }}"#;

/// One method directory and the variant files inside it.
pub struct DefinitionFile {
    pub method: &'static str,
    pub endpoint: &'static [&'static str],
    pub variants: Vec<(&'static str, String)>,
}

impl DefinitionFile {
    pub fn new(method: &'static str, endpoint: &'static [&'static str]) -> Self {
        Self {
            method,
            endpoint,
            variants: Vec::new(),
        }
    }

    pub fn variant(mut self, file: &'static str, json: impl Into<String>) -> Self {
        self.variants.push((file, json.into()));
        self
    }

    /// URL path of the endpoint, with a leading slash.
    pub fn path(&self) -> String {
        format!("/{}", self.endpoint.join("/"))
    }
}

/// Write a definition tree into a fresh temporary directory.
pub fn definition_tree(files: &[DefinitionFile]) -> TempDir {
    let root = tempfile::tempdir().unwrap();
    for df in files {
        let mut dir = root.path().to_path_buf();
        dir.extend(df.endpoint);
        dir.push(df.method);
        std::fs::create_dir_all(&dir).unwrap();

        for (file, json) in &df.variants {
            std::fs::write(dir.join(file), json).unwrap();
        }
    }
    root
}

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: Arc<Registry>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn client(&self) -> ErsatzClient {
        ErsatzClient::new(&self.url("")).with_client(http_client())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Load `root` and serve it. The listener is bound before this returns.
pub async fn start_server(root: &Path) -> TestServer {
    let registry = Arc::new(load_dir(root).expect("definitions should load"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ErsatzConfig::default();
    config.apply_start_args(addr.port(), root.to_path_buf(), Some("127.0.0.1"));

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::clone(&registry));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        registry,
        shutdown,
    }
}

/// HTTP client that never goes through a proxy and never pools.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
