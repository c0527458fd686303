//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a mock backend that answers every request with a fixed body.
/// Binds an ephemeral port and returns it.
pub async fn start_mock_backend(body: &'static str) -> SocketAddr {
    let (addr, _) = start_counting_backend(body).await;
    addr
}

/// Start a mock backend that counts the requests it serves.
pub async fn start_counting_backend(body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let counter = counter.clone();
            tokio::spawn(async move {
                let _ = read_request(&mut socket).await;
                counter.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, hits)
}

/// Start a mock backend that echoes the raw request bytes it received as
/// its response body, so tests can assert what actually hit the wire.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let raw = read_request(&mut socket).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nx-echo: 1\r\nConnection: close\r\n\r\n",
                    raw.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.write_all(&raw).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a mock backend that accepts connections and drops them without
/// answering, counting each attempt. Every request against it becomes a
/// transport failure, so tests can count the gateway's outbound attempts.
pub async fn start_resetting_backend() -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            drop(socket);
        }
    });

    (addr, hits)
}

/// An address nothing is listening on: connections are refused.
pub fn dead_backend_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Read one HTTP/1.1 request (content-length, chunked, or bodyless) and
/// return the raw bytes.
async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];
    loop {
        if let Some(head_end) = find_subslice(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            if let Some(len) = parse_content_length(&head) {
                if buf.len() >= head_end + 4 + len {
                    return buf;
                }
            } else if head.contains("transfer-encoding: chunked") {
                if buf.ends_with(b"0\r\n\r\n") {
                    return buf;
                }
            } else {
                return buf;
            }
        }
        match socket.read(&mut tmp).await {
            Ok(0) | Err(_) => return buf,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn parse_content_length(head: &str) -> Option<usize> {
    head.lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse().ok())
}
