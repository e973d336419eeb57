// Chat client module: a small blocking HTTP client that talks to the local
// Ollama chat endpoint. Each query is a single POST with `stream: true`; the
// reply body is handed back as a lazy iterator of raw NDJSON lines so the
// caller can print fragments while the model is still generating.

use crate::config::ChatConfig;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader, Write};
use thiserror::Error;

/// System message that frames every conversation.
pub const SYSTEM_PROMPT: &str = "Eres un asistente experto en programación de Python.";

/// Who authored a chat message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /api/chat`. Built fresh for every query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl ChatRequest {
    /// System message plus the given prompt as the user turn, streamed.
    pub fn new(model: &str, prompt: &str) -> Self {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: prompt.to_string(),
                },
            ],
            stream: true,
        }
    }
}

/// Ways a chat request can fail before any reply line is read.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Error de conexión: Asegúrate de que Ollama esté en ejecución y el modelo esté descargado.")]
    Connect(#[source] reqwest::Error),
    #[error("Tiempo de espera agotado esperando la respuesta de Ollama.")]
    Timeout(#[source] reqwest::Error),
    #[error("Error en la petición a Ollama: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ChatError::Connect(err)
        } else if err.is_timeout() {
            ChatError::Timeout(err)
        } else {
            ChatError::Request(err)
        }
    }
}

/// Forward-only sequence of reply lines. Every `next()` blocks until the
/// server sends another line or closes the connection. An empty sequence
/// means the request produced no content.
///
/// Lines are decoded lossily: a line with invalid UTF-8 still comes through
/// (and fails to parse as a fragment later) instead of ending the reply.
pub struct ResponseLines {
    inner: Option<BufReader<Response>>,
}

impl ResponseLines {
    pub fn empty() -> Self {
        ResponseLines { inner: None }
    }

    fn from_response(response: Response) -> Self {
        ResponseLines {
            inner: Some(BufReader::new(response)),
        }
    }
}

impl Iterator for ResponseLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let reader = self.inner.as_mut()?;
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.inner = None;
                None
            }
            Ok(_) => {
                if buf.ends_with(b"\n") {
                    buf.pop();
                    if buf.ends_with(b"\r") {
                        buf.pop();
                    }
                }
                Some(String::from_utf8_lossy(&buf).into_owned())
            }
            Err(e) => {
                // Connection dropped mid-reply; what was printed stays printed.
                log::warn!("Stopped reading chat stream: {}", e);
                self.inner = None;
                None
            }
        }
    }
}

/// Anything the menu can ask a question and get streamed lines back from.
/// Failures are reported on `out` and turn into an empty sequence.
pub trait Assistant {
    type Lines: Iterator<Item = String>;

    fn ask(&self, prompt: &str, out: &mut dyn Write) -> io::Result<Self::Lines>;
}

/// Blocking client for the Ollama chat API.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    /// Build a client from an explicit configuration. Without a configured
    /// timeout the client waits on the server indefinitely.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ChatClient { client, config })
    }

    /// POST the prompt and return the unread reply stream on HTTP 200.
    pub fn try_send(&self, prompt: &str) -> Result<ResponseLines, ChatError> {
        let request = ChatRequest::new(&self.config.model, prompt);
        log::debug!(
            "POST {} (model {})",
            self.config.endpoint,
            self.config.model
        );

        let res = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()?;

        let status = res.status();
        log::debug!("Chat endpoint answered {}", status);
        if status != StatusCode::OK {
            let body = res.text().unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(ResponseLines::from_response(res))
    }

    /// Like `try_send`, but prints any failure to `out` and returns an empty
    /// sequence instead.
    pub fn send(&self, prompt: &str, out: &mut dyn Write) -> io::Result<ResponseLines> {
        match self.try_send(prompt) {
            Ok(lines) => Ok(lines),
            Err(err @ ChatError::Status { .. }) => {
                writeln!(out, "❌ {}", err)?;
                Ok(ResponseLines::empty())
            }
            Err(err) => {
                log::warn!("Chat request failed: {:?}", err);
                writeln!(out, "\n❌ {}", err)?;
                Ok(ResponseLines::empty())
            }
        }
    }
}

impl Assistant for ChatClient {
    type Lines = ResponseLines;

    fn ask(&self, prompt: &str, out: &mut dyn Write) -> io::Result<ResponseLines> {
        self.send(prompt, out)
    }
}
