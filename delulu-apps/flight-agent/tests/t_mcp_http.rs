//!  Delulu Travel Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! MCP server integration tests using HTTP transport.

#![cfg(feature = "mcp")]

use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::Duration;
use tracing::debug;

// The HTTP server never exits on its own, reads are bounded by this.
const TIMEOUT: Duration = Duration::from_secs(3);

fn get_free_port() -> u16 {
    use std::net::TcpListener;
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn spawn_http_server(port: u16) -> Result<Child> {
    Command::new(env!("CARGO_BIN_EXE_delulu-flight-mcp"))
        .args(["http", "--host", "127.0.0.1", "--port", &port.to_string()])
        .env("AMADEUS_CLIENT_ID", "test-id")
        .env("AMADEUS_CLIENT_SECRET", "test-secret")
        .env("AMADEUS_BASE_URL", "http://127.0.0.1:9")
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .context("Failed to spawn delulu-flight-mcp http")
}

async fn connect_with_retry(port: u16) -> Result<TcpStream> {
    let start = std::time::Instant::now();
    loop {
        match TcpStream::connect(("127.0.0.1", port)).await {
            Ok(stream) => return Ok(stream),
            Err(e) if start.elapsed() < Duration::from_secs(10) => {
                debug!("Server not ready yet: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Err(e) => return Err(e).context("Server never started listening"),
        }
    }
}

async fn post_mcp(stream: &mut TcpStream, port: u16, body: &str) -> Result<String> {
    let request = format!(
        "POST /mcp HTTP/1.1\r\nHost: 127.0.0.1:{}\r\nContent-Type: application/json\r\nAccept: application/json, text/event-stream\r\nContent-Length: {}\r\n\r\n{}",
        port,
        body.len(),
        body
    );
    stream.write_all(request.as_bytes()).await?;

    let mut response = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        match tokio::time::timeout(TIMEOUT, stream.read(&mut buf)).await {
            Ok(Ok(0)) | Ok(Err(_)) | Err(_) => break,
            Ok(Ok(n)) => {
                response.extend_from_slice(&buf[..n]);
                if String::from_utf8_lossy(&response).contains("\"serverInfo\"") {
                    break;
                }
            }
        }
    }
    Ok(String::from_utf8_lossy(&response).into_owned())
}

#[tokio::test]
async fn test_mcp_http_initialize_opens_session() -> Result<()> {
    let port = get_free_port();
    let _server = spawn_http_server(port)?;
    let mut stream = connect_with_retry(port).await?;

    let init = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test-client","version":"1.0"}}}"#;
    let response = post_mcp(&mut stream, port, init).await?;
    debug!("initialize response: {}", response);

    assert!(response.starts_with("HTTP/1.1 200"), "response: {}", response);
    assert!(
        response
            .lines()
            .any(|l| l.to_ascii_lowercase().starts_with("mcp-session-id:")),
        "No session ID in: {}",
        response
    );
    assert!(response.contains("\"tools\""), "tools capability missing: {}", response);
    Ok(())
}
