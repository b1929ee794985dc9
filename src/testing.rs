//! One-shot local HTTP server for exercising the real clients.
//!
//! Accepts a single connection, captures the raw request text,
//! then either answers with a canned response or never answers.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

pub enum Reply {
    Respond {
        status: u16,
        reason: &'static str,
        body: String,
    },

    /// Read the request, then hold the connection open without answering
    Stall,
}

impl Reply {
    pub fn status(status: u16, reason: &'static str, body: &str) -> Self {
        Reply::Respond {
            status,
            reason,
            body: body.to_string(),
        }
    }
}

pub struct OneShotServer {
    pub base_url: String,

    /// Raw request (head + body) as received
    pub request: oneshot::Receiver<String>,
}

pub async fn serve_once(reply: Reply) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let raw = read_request(&mut socket).await;
        let _ = tx.send(raw);

        match reply {
            Reply::Respond { status, reason, body } => {
                let response = format!(
                    "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
            Reply::Stall => {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
        }
    });

    OneShotServer {
        base_url: format!("http://{}", addr),
        request: rx,
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if request_complete(&buf) {
            break;
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(head_end) = text.find("\r\n\r\n") else {
        return false;
    };

    let head = text[..head_end].to_ascii_lowercase();
    let body = &text[head_end + 4..];

    if head.contains("transfer-encoding: chunked") {
        return body.ends_with("0\r\n\r\n");
    }

    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    body.len() >= content_length
}
