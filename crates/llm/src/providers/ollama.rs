//! Streaming client for the Ollama `/api/generate` endpoint.
//!
//! The server answers with newline-delimited JSON objects, each carrying an
//! incremental `response` fragment and a `done` flag. Fragments are
//! accumulated until `done` is seen or the stream ends.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use pdfsum_core::config::OllamaConfig;

use crate::provider::{Generator, LlmError};

/// Returned when the stream ends without producing any text.
pub const NO_RESPONSE_FALLBACK: &str = "No response generated by the model.";

/// What to do with a response line that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedLine {
    /// Abort with `LlmError::Parse` (the document pipeline path).
    Fail,
    /// Log a warning and keep reading later lines (the `ask` path).
    SkipAndLog,
}

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

// ── Line accumulation ───────────────────────────────────────────────

/// Folds streamed NDJSON lines into one output string, tracking the
/// completion flag. Pure so the stream logic is testable without a server.
struct Accumulator {
    output: String,
    done: bool,
    policy: MalformedLine,
}

impl Accumulator {
    fn new(policy: MalformedLine) -> Self {
        Self {
            output: String::new(),
            done: false,
            policy,
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }

    /// Consume one line. Empty lines are ignored; lines after `done` are
    /// never fed in (the caller stops reading).
    fn push_line(&mut self, line: &str) -> Result<(), LlmError> {
        if line.is_empty() {
            return Ok(());
        }
        match serde_json::from_str::<GenerateChunk>(line) {
            Ok(chunk) => {
                self.output.push_str(&chunk.response);
                if chunk.done {
                    self.done = true;
                }
                Ok(())
            }
            Err(e) => match self.policy {
                MalformedLine::Fail => Err(LlmError::Parse(e.to_string())),
                MalformedLine::SkipAndLog => {
                    warn!(error = %e, line = %line, "skipping malformed response line");
                    Ok(())
                }
            },
        }
    }

    /// Trimmed accumulated text, or the fixed fallback when nothing came.
    fn finish(self) -> String {
        let output = self.output.trim().to_string();
        if output.is_empty() {
            NO_RESPONSE_FALLBACK.to_string()
        } else {
            output
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────

pub struct OllamaClient {
    client: reqwest::Client,
    url: String,
    model: String,
    malformed: MalformedLine,
}

impl OllamaClient {
    /// Build a client from config. The timeout bounds the whole request,
    /// streaming included.
    pub fn new(config: &OllamaConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
            malformed: MalformedLine::Fail,
        })
    }

    /// Override the malformed-line policy (default: `Fail`).
    pub fn with_malformed_line(mut self, policy: MalformedLine) -> Self {
        self.malformed = policy;
        self
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
        });

        debug!(model = %self.model, url = %url, "starting generate request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let mut bytes = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut acc = Accumulator::new(self.malformed);

        // Buffer raw bytes and decode only complete lines: a multi-byte
        // character may arrive split across stream chunks, so decoding
        // per-chunk would mangle it into replacement characters.
        'read: while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            buffer.extend_from_slice(&chunk);

            while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();
                let line = String::from_utf8_lossy(&line_bytes);
                acc.push_line(line.trim_end_matches('\n').trim_end_matches('\r'))?;
                if acc.is_done() {
                    break 'read;
                }
            }
        }

        // A final line without a trailing newline still counts.
        if !acc.is_done() {
            let tail = String::from_utf8_lossy(&buffer);
            let tail = tail.trim();
            if !tail.is_empty() {
                acc.push_line(tail)?;
            }
        }

        Ok(acc.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(acc: &mut Accumulator, lines: &[&str]) {
        for line in lines {
            if acc.is_done() {
                break;
            }
            acc.push_line(line).unwrap();
        }
    }

    #[test]
    fn fragments_accumulate_until_done() {
        let mut acc = Accumulator::new(MalformedLine::Fail);
        feed(
            &mut acc,
            &[
                r#"{"response":"Hel","done":false}"#,
                r#"{"response":"lo","done":true}"#,
                r#"{"response":" ignored","done":false}"#,
            ],
        );
        assert!(acc.is_done());
        assert_eq!(acc.finish(), "Hello");
    }

    #[test]
    fn empty_stream_returns_fallback() {
        let acc = Accumulator::new(MalformedLine::Fail);
        assert_eq!(acc.finish(), NO_RESPONSE_FALLBACK);
    }

    #[test]
    fn whitespace_only_output_returns_fallback() {
        let mut acc = Accumulator::new(MalformedLine::Fail);
        feed(&mut acc, &[r#"{"response":"  \n ","done":true}"#]);
        assert_eq!(acc.finish(), NO_RESPONSE_FALLBACK);
    }

    #[test]
    fn result_is_trimmed() {
        let mut acc = Accumulator::new(MalformedLine::Fail);
        feed(
            &mut acc,
            &[
                r#"{"response":"  answer","done":false}"#,
                r#"{"response":" text \n","done":true}"#,
            ],
        );
        assert_eq!(acc.finish(), "answer text");
    }

    #[test]
    fn empty_lines_are_ignored() {
        let mut acc = Accumulator::new(MalformedLine::Fail);
        acc.push_line("").unwrap();
        feed(&mut acc, &[r#"{"response":"ok","done":true}"#]);
        assert_eq!(acc.finish(), "ok");
    }

    #[test]
    fn missing_fields_default() {
        let mut acc = Accumulator::new(MalformedLine::Fail);
        // Extra fields are ignored, absent ones default.
        feed(
            &mut acc,
            &[
                r#"{"model":"m","created_at":"now","response":"hi"}"#,
                r#"{"done":true}"#,
            ],
        );
        assert!(acc.is_done());
        assert_eq!(acc.finish(), "hi");
    }

    #[test]
    fn malformed_line_fails_under_fail_policy() {
        let mut acc = Accumulator::new(MalformedLine::Fail);
        let err = acc.push_line("not json").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn malformed_line_is_skipped_under_skip_policy() {
        let mut acc = Accumulator::new(MalformedLine::SkipAndLog);
        acc.push_line("not json").unwrap();
        feed(&mut acc, &[r#"{"response":"still here","done":true}"#]);
        assert_eq!(acc.finish(), "still here");
    }

    /// Serves one canned HTTP response, written in two segments with a
    /// pause between them, then closes the connection.
    async fn serve_split_response(first: Vec<u8>, second: Vec<u8>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;

            let head = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n";
            socket.write_all(head).await.unwrap();
            socket.write_all(&first).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            socket.write_all(&second).await.unwrap();
            socket.flush().await.unwrap();
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn multibyte_char_survives_a_chunk_boundary() {
        let body = "{\"response\":\"café? no: café\",\"done\":true}\n".as_bytes();
        // Cut one byte into the first 'é' (0xC3 in one write, 0xA9 in the next).
        let split = body.iter().position(|&b| b == 0xC3).unwrap() + 1;
        let url =
            serve_split_response(body[..split].to_vec(), body[split..].to_vec()).await;

        let config = OllamaConfig {
            url,
            model: "test-model".to_string(),
            timeout_secs: 5,
        };
        let client = OllamaClient::new(&config).unwrap();
        let reply = client.generate("hello").await.unwrap();
        assert_eq!(reply, "café? no: café");
    }

    #[tokio::test]
    async fn final_line_without_trailing_newline_counts() {
        let body = "{\"response\":\"no newline after me\",\"done\":true}".as_bytes();
        let split = body.len() / 2;
        let url =
            serve_split_response(body[..split].to_vec(), body[split..].to_vec()).await;

        let config = OllamaConfig {
            url,
            model: "test-model".to_string(),
            timeout_secs: 5,
        };
        let client = OllamaClient::new(&config).unwrap();
        let reply = client.generate("hello").await.unwrap();
        assert_eq!(reply, "no newline after me");
    }
}
