//! Minimal in-process HTTP responder standing in for the POWER API in tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct Route {
    path: &'static str,
    status: u16,
    body: String,
    hang: bool,
}

impl Route {
    pub fn ok(path: &'static str, body: impl Into<String>) -> Self {
        Self::status(path, 200, body)
    }

    pub fn status(path: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self {
            path,
            status,
            body: body.into(),
            hang: false,
        }
    }

    /// Accepts the request and never answers.
    pub fn hang(path: &'static str) -> Self {
        Self {
            path,
            status: 200,
            body: String::new(),
            hang: true,
        }
    }
}

pub struct MockPower {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockPower {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let seen = Arc::clone(&seen);
                tokio::spawn(async move { respond(socket, &routes, &seen).await });
            }
        });

        Self {
            base_url,
            requests,
            handle,
        }
    }

    /// Base URL of a port nothing listens on.
    pub async fn unused_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    /// Request targets (path and query) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockPower {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(mut socket: TcpStream, routes: &[Route], seen: &Mutex<Vec<String>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    seen.lock().unwrap().push(target.clone());

    let route = routes.iter().find(|r| target.starts_with(r.path));
    let (status, body) = match route {
        Some(r) if r.hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            return;
        }
        Some(r) => (r.status, r.body.as_str()),
        None => (404, "not found"),
    };

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}
