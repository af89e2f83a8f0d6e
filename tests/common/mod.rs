#![allow(dead_code)]

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const EXPOSITION: &str = "\
# HELP node_load1 1m load average.
# TYPE node_load1 gauge
node_load1 0.31
node_load5 0.27
node_load15 0.2
node_memory_MemAvailable_bytes 250
node_memory_MemTotal_bytes 1000
node_filesystem_free_bytes{device=\"/dev/sda2\",fstype=\"ext4\",mountpoint=\"/\"} 300
node_filesystem_size_bytes{device=\"/dev/sda2\",fstype=\"ext4\",mountpoint=\"/\"} 1200
node_cpu_seconds_total{cpu=\"0\",mode=\"idle\"} 120
node_cpu_seconds_total{cpu=\"0\",mode=\"user\"} 30
";

pub fn response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: text/plain; version=0.0.4\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Answers every connection with the same canned response.
pub async fn serve(response: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let response = response.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    url(addr)
}

/// Accepts connections and never answers.
pub async fn serve_silence() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    url(addr)
}

/// An address nothing listens on.
pub async fn refused() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    url(addr)
}

fn url(addr: SocketAddr) -> String {
    format!("http://{addr}/metrics")
}
