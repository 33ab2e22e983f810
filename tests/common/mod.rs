#![allow(dead_code)]

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::header::HeaderMap;
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use monocle::config::{AppState, Config};
use monocle::error::ServerError;
use monocle::server;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const MAX_BODY_SIZE: u64 = 1024;

/// Server running in-process on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), ServerError>>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestServer {
    pub async fn start(static_root: &Path) -> Self {
        let mut cfg = Config::load_with_env(None, config::Map::new()).unwrap();
        cfg.static_files.root = static_root.display().to_string();
        cfg.logging.access_log = false;
        cfg.http.max_body_size = MAX_BODY_SIZE;
        cfg.performance.shutdown_grace_period = 2;

        let listener = server::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let state = Arc::new(AppState::new(cfg));
        let handle = tokio::spawn(server::run(listener, state, async move {
            let _ = rx.await;
            "test shutdown"
        }));

        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    pub async fn send(&self, method: Method, path: &str, body: &str) -> TestResponse {
        self.send_with(method, path, &[], body).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Method::GET, path, "").await
    }

    pub async fn send_with(
        &self,
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> TestResponse {
        let stream = TcpStream::connect(self.addr).await.unwrap();
        let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", self.addr.to_string());
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = builder
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap();

        let resp = sender.send_request(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

/// Static root with a small frontend build
pub fn frontend_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        "<!doctype html><title>Monocle</title>",
    )
    .unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/app.js"), "console.log('monocle');").unwrap();
    std::fs::write(dir.path().join("assets/site.css"), "body{margin:0}").unwrap();
    dir
}
