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

//! MCP server integration tests using subprocess with stdio transport.

#![cfg(feature = "mcp")]


use anyhow::{Context, Result};
use mcp_helpers::{binary, read_response, send, spawn_stdio_server, stream_stderr_to_console};
use serde_json::{Value, json};
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio::process::{ChildStdin, ChildStdout, Command};

fn load_schema_from_file(name: &str) -> Result<Value> {
    let schema_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("schemas")
        .join(name);
    let content = std::fs::read_to_string(&schema_path)
        .context(format!("Failed to read schema file: {:?}", schema_path))?;
    serde_json::from_str(&content).context(format!("Failed to parse schema file: {:?}", schema_path))
}

fn validate_json_schema(instance: &Value, schema: &Value, schema_name: &str) -> Result<()> {
    let validator = jsonschema::Validator::new(schema)
        .map_err(|e| anyhow::anyhow!("Failed to create validator for {}: {}", schema_name, e))?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{}: {}", schema_name, e))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!(
            "Schema validation failed for {}:\n{}",
            schema_name,
            errors.join("\n")
        )
    }
}

async fn mcp_initialize(stdin: &mut ChildStdin, stdout: &mut BufReader<ChildStdout>) -> Result<Value> {
    let init = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "test-client", "version": "1.0"}
        }
    });
    send(stdin, &init).await?;
    let response = read_response(stdout, 1).await?;

    send(
        stdin,
        &json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await?;
    Ok(response)
}

#[tokio::test]
async fn test_mcp_help_output() -> Result<()> {
    let output = Command::new(binary()).arg("--help").output().await?;

    assert!(output.status.success(), "Help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("delulu-flight-mcp"), "Help should show binary name");
    assert!(stdout.contains("stdio"), "Help should show stdio command");
    assert!(stdout.contains("http"), "Help should show http command");
    assert!(stdout.contains("--amadeus-hostname"), "Help should show Amadeus flags");
    Ok(())
}

#[tokio::test]
async fn test_mcp_version_output() -> Result<()> {
    let output = Command::new(binary()).arg("--version").output().await?;

    assert!(output.status.success(), "Version should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.1.0"), "Version should show 0.1.0");
    Ok(())
}

#[tokio::test]
async fn test_mcp_requires_credentials() -> Result<()> {
    let output = Command::new(binary())
        .arg("stdio")
        .env_remove("AMADEUS_CLIENT_ID")
        .env_remove("AMADEUS_CLIENT_SECRET")
        .output()
        .await?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--amadeus-client-id"), "stderr: {}", stderr);
    Ok(())
}

#[tokio::test]
async fn test_mcp_stdio_lists_tools() -> Result<()> {
    let mut child = spawn_stdio_server()?;
    let mut stdin = child.stdin.take().context("stdin")?;
    let mut stdout = BufReader::new(child.stdout.take().context("stdout")?);
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(stream_stderr_to_console(stderr));
    }

    let init = mcp_initialize(&mut stdin, &mut stdout).await?;
    assert_eq!(
        init["result"]["capabilities"]["tools"].is_object(),
        true,
        "tools capability advertised: {}",
        init
    );

    send(
        &mut stdin,
        &json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list", "params": {}}),
    )
    .await?;
    let response = read_response(&mut stdout, 2).await?;
    let result = &response["result"];

    let schema = load_schema_from_file("tools-list.json")?;
    validate_json_schema(result, &schema, "tools-list")?;

    let mut names: Vec<&str> = result["tools"]
        .as_array()
        .context("tools array")?
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    names.sort();
    assert_eq!(names, vec!["closest_airport", "single_flight_search"]);

    drop(stdin);
    Ok(())
}

#[tokio::test]
async fn test_mcp_stdio_multi_day_window_returns_empty_list() -> Result<()> {
    let mut child = spawn_stdio_server()?;
    let mut stdin = child.stdin.take().context("stdin")?;
    let mut stdout = BufReader::new(child.stdout.take().context("stdout")?);
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(stream_stderr_to_console(stderr));
    }

    mcp_initialize(&mut stdin, &mut stdout).await?;

    // Rejected before any request, so the unreachable API host is never hit.
    send(
        &mut stdin,
        &json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {
                "name": "single_flight_search",
                "arguments": {
                    "originLocationCode": "BOM",
                    "destinationLocationCode": "JFK",
                    "departureDateTimeEarliest": "2024-05-01T22:00:00",
                    "departureDateTimeLatest": "2024-05-02T06:00:00"
                }
            }
        }),
    )
    .await?;
    let response = read_response(&mut stdout, 3).await?;
    let content = &response["result"]["content"][0];
    assert_eq!(content["type"], "text", "response: {}", response);
    assert_eq!(content["text"], "[]");
    assert_ne!(response["result"]["isError"], json!(true));

    drop(stdin);
    Ok(())
}

#[tokio::test]
async fn test_mcp_stdio_bad_timestamp_is_tool_error() -> Result<()> {
    let mut child = spawn_stdio_server()?;
    let mut stdin = child.stdin.take().context("stdin")?;
    let mut stdout = BufReader::new(child.stdout.take().context("stdout")?);
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(stream_stderr_to_console(stderr));
    }

    mcp_initialize(&mut stdin, &mut stdout).await?;

    send(
        &mut stdin,
        &json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {
                "name": "single_flight_search",
                "arguments": {
                    "originLocationCode": "BOM",
                    "destinationLocationCode": "JFK",
                    "departureDateTimeEarliest": "tomorrow morning",
                    "departureDateTimeLatest": "2024-05-01T20:00:00"
                }
            }
        }),
    )
    .await?;
    let response = read_response(&mut stdout, 4).await?;
    assert_eq!(response["result"]["isError"], json!(true), "response: {}", response);
    let text = response["result"]["content"][0]["text"].as_str().unwrap_or_default();
    assert!(text.contains("departureDateTimeEarliest"), "text: {}", text);

    drop(stdin);
    Ok(())
}
