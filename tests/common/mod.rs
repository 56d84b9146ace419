//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Router;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Methods exercised by the behaviour matrix, with the body each one sends.
pub const METHODS: &[(&str, &str)] = &[
    ("GET", ""),
    ("POST", "ping"),
    ("PUT", "ping"),
    ("PATCH", "ping"),
    ("DELETE", ""),
    ("HEAD", ""),
    ("OPTIONS", ""),
];

/// What a backend answers to the n-th request it sees.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: &'static str,
    pub delay: Duration,
}

impl Reply {
    pub fn new(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Script = Arc<dyn Fn(u32) -> Reply + Send + Sync>;

#[derive(Clone)]
struct Shared {
    hits: Arc<AtomicU32>,
    bodies: Arc<Mutex<Vec<Bytes>>>,
    script: Script,
}

/// Handle to a running recording backend.
pub struct Backend {
    pub addr: SocketAddr,
    shared: Shared,
}

impl Backend {
    pub fn url(&self) -> String {
        format!("http://{}/ping", self.addr)
    }

    pub fn hits(&self) -> u32 {
        self.shared.hits.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<Bytes> {
        self.shared.bodies.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.shared.hits.store(0, Ordering::SeqCst);
        self.shared.bodies.lock().unwrap().clear();
    }
}

async fn record(State(shared): State<Shared>, body: Bytes) -> (StatusCode, &'static str) {
    let n = shared.hits.fetch_add(1, Ordering::SeqCst) + 1;
    shared.bodies.lock().unwrap().push(body);

    let reply = (shared.script)(n);
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (StatusCode::from_u16(reply.status).unwrap(), reply.body)
}

/// Start an axum backend on an ephemeral port that records every request
/// body and answers according to `script(request_number)`.
pub async fn start_recording_backend<F>(script: F) -> Backend
where
    F: Fn(u32) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shared = Shared {
        hits: Arc::new(AtomicU32::new(0)),
        bodies: Arc::new(Mutex::new(Vec::new())),
        script: Arc::new(script),
    };

    let app = Router::new().fallback(record).with_state(shared.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Backend { addr, shared }
}

/// Read one request head (and any Content-Length body) off a raw socket.
async fn drain_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + length {
            return;
        }
    }
}

/// Start a raw TCP backend whose status and body come from an async closure.
/// Returns the bound address and the number of connections served.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Arc<AtomicU32>)
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    tokio::spawn(async move {
                        drain_request(&mut socket).await;
                        let (status, body) = f(n).await;
                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");

                        let response_str = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            });
        }
    });

    (addr, hits)
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
