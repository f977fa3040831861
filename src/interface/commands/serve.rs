//! # Serve Command
//!
//! Line-delimited JSON tool calls over stdin/stdout. Strict call/response cadence:
//! each request is answered before the next line is read, and a bad request never
//! ends the loop. Only EOF on stdin (or a broken stdout) stops it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::SplitStream;

use crate::application::dispatcher::ToolDispatcher;
use crate::domain::errors::{OperationResult, ToolError};
use crate::domain::types::{Envelope, ToolOutput};
use crate::strings::logs;

#[derive(Debug, Deserialize)]
struct Request {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize)]
struct Response<'a> {
    name: Option<&'a str>,
    result: Envelope<'a, ToolOutput>,
}

pub async fn handle_serve(dispatcher: Arc<ToolDispatcher>) -> Result<()> {
    tracing::info!("{}", logs::SERVE_START);

    let handled = serve(
        &dispatcher,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    tracing::info!("{}", logs::serve_handled(handled));
    tracing::info!("{}", logs::SERVE_EOF);
    Ok(())
}

/// Answers newline-delimited requests from `reader` until EOF. Returns the number
/// of requests answered.
async fn serve<R, W>(dispatcher: &Arc<ToolDispatcher>, reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // Raw segments: a line that is not UTF-8 is a bad request, not a broken stream
    let mut lines = SplitStream::new(reader.split(b'\n'));
    let mut handled = 0;

    while let Some(line) = lines.next().await {
        let mut line = line.context("Failed to read request")?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        let reply = match String::from_utf8(line) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => respond(dispatcher, &line).await?,
            Err(e) => reject(format!("request line is not valid UTF-8 ({e})"))?,
        };

        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        handled += 1;
    }

    Ok(handled)
}

/// Answers one request line with one response line (without the newline).
async fn respond(dispatcher: &Arc<ToolDispatcher>, line: &str) -> Result<String> {
    let request = match serde_json::from_str::<Request>(line) {
        Ok(request) => request,
        Err(e) => {
            return reject(format!(
                "request must be {{\"name\": <tool>, \"args\": <object>}} ({e})"
            ));
        }
    };

    let worker = Arc::clone(dispatcher);
    let name = request.name.clone();
    // File I/O blocks; keep it off the async thread but still await it
    let result: OperationResult<ToolOutput> =
        tokio::task::spawn_blocking(move || worker.invoke(&request.name, request.args))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("{}", logs::dispatch_panicked(&e.to_string()));
                Err(ToolError::failed(
                    "Tool execution failed",
                    io::Error::other(e.to_string()),
                ))
            });

    render(Some(name.as_str()), &result)
}

/// Failure line for input that never became a tool call.
fn reject(reason: String) -> Result<String> {
    tracing::warn!("{}", logs::serve_bad_line(&reason));
    render(None, &Err(ToolError::invalid(reason)))
}

fn render(name: Option<&str>, result: &OperationResult<ToolOutput>) -> Result<String> {
    let response = Response {
        name,
        result: Envelope(result),
    };
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::tools::sandbox::PathGuard;
    use crate::infrastructure::tools::store::FileStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn dispatcher() -> (TempDir, Arc<ToolDispatcher>) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(PathGuard::new(temp_dir.path()).unwrap());
        (temp_dir, Arc::new(ToolDispatcher::new(store)))
    }

    async fn round(dispatcher: &Arc<ToolDispatcher>, line: &str) -> Value {
        let reply = respond(dispatcher, line).await.unwrap();
        assert!(!reply.contains('\n'));
        serde_json::from_str(&reply).unwrap()
    }

    #[tokio::test]
    async fn test_respond_success_and_failure() {
        let (_temp, dispatcher) = dispatcher();

        let created = round(
            &dispatcher,
            r#"{"name": "create_file", "args": {"file_path": "a.txt", "content": "hi\nthere"}}"#,
        )
        .await;
        assert_eq!(created["name"], json!("create_file"));
        assert_eq!(created["result"]["size"], json!(8));
        assert!(created["result"].get("error").is_none());

        let missing = round(
            &dispatcher,
            r#"{"name": "read_file", "args": {"file_path": "b.txt"}}"#,
        )
        .await;
        assert_eq!(missing["result"]["kind"], json!("not_found"));
    }

    #[tokio::test]
    async fn test_respond_to_malformed_line() {
        let (_temp, dispatcher) = dispatcher();

        let reply = round(&dispatcher, "this is not json").await;
        assert_eq!(reply["name"], Value::Null);
        assert_eq!(reply["result"]["kind"], json!("invalid_parameters"));

        let reply = round(&dispatcher, r#"{"args": {}}"#).await;
        assert_eq!(reply["result"]["kind"], json!("invalid_parameters"));
    }

    #[tokio::test]
    async fn test_respond_without_args_lists_root() {
        let (temp, dispatcher) = dispatcher();
        std::fs::write(temp.path().join("one.txt"), "1").unwrap();

        let reply = round(&dispatcher, r#"{"name": "list_directory"}"#).await;
        assert_eq!(reply["result"]["count"], json!(1));
        assert_eq!(reply["result"]["items"][0]["name"], json!("one.txt"));
    }

    #[tokio::test]
    async fn test_serve_continues_past_undecodable_line() {
        let (_temp, dispatcher) = dispatcher();
        let input: &[u8] =
            b"{\"name\": \"list_directory\"}\n\xff\xfe bad\n\n{\"name\": \"list_directory\"}\r\n";
        let mut output = Vec::new();

        let handled = serve(&dispatcher, input, &mut output).await.unwrap();

        assert_eq!(handled, 3);
        let replies: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["result"]["count"], json!(0));
        assert_eq!(replies[1]["name"], Value::Null);
        assert_eq!(replies[1]["result"]["kind"], json!("invalid_parameters"));
        assert_eq!(replies[2]["name"], json!("list_directory"));
        assert!(replies[2]["result"].get("error").is_none());
    }

    #[tokio::test]
    async fn test_serve_answers_final_line_without_newline() {
        let (_temp, dispatcher) = dispatcher();
        let input: &[u8] = b"not json\n{\"name\": \"read_file\", \"args\": {\"file_path\": \"x\"}}";
        let mut output = Vec::new();

        let handled = serve(&dispatcher, input, &mut output).await.unwrap();

        assert_eq!(handled, 2);
        let last: Value =
            serde_json::from_str(String::from_utf8(output).unwrap().lines().last().unwrap())
                .unwrap();
        assert_eq!(last["result"]["kind"], json!("not_found"));
    }

    #[tokio::test]
    async fn test_respond_unknown_tool() {
        let (_temp, dispatcher) = dispatcher();
        let reply = round(&dispatcher, r#"{"name": "delete_file", "args": {}}"#).await;
        assert_eq!(reply["name"], json!("delete_file"));
        assert_eq!(reply["result"]["kind"], json!("unknown_tool"));
    }
}
