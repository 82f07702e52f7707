//! Minimal HTTP/1.1 framing: one request per connection, `Connection: close`.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound for the request line plus headers.
pub const MAX_HEAD_SIZE: usize = 16 * 1024;

/// Upper bound for a request body; bodies are read and discarded.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Errors raised while reading a request.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("connection closed before a request was received")]
    ConnectionClosed,
    #[error("request head exceeds {} bytes", MAX_HEAD_SIZE)]
    HeadTooLarge,
    #[error("request body of {0} bytes exceeds {max} bytes", max = MAX_BODY_SIZE)]
    BodyTooLarge(usize),
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// A parsed request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Request target without its query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A response ready to be written.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// JSON error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl Response {
    pub fn new(status: StatusCode, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body,
        }
    }

    pub fn octet_stream(body: Vec<u8>) -> Self {
        Self::new(StatusCode::OK, "application/octet-stream", body)
    }

    pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        let envelope = ErrorBody {
            code: code.to_string(),
            message: message.into(),
        };
        let body = serde_json::to_vec(&envelope).unwrap_or_default();
        Self::new(status, "application/json", body)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Decode the body as a JSON error envelope.
    pub fn error_body(&self) -> Option<ErrorBody> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Read one request (head and body) from the stream.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head_size = 0;

    let request_line = read_line(reader, &mut head_size)
        .await?
        .ok_or(HttpError::ConnectionClosed)?;

    let mut parts = request_line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next(), parts.next())
    {
        (Some(method), Some(target), Some(version), None) => (method, target, version),
        _ => {
            return Err(HttpError::Malformed(format!(
                "invalid request line: {request_line:?}"
            )))
        }
    };

    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::Malformed(format!(
            "unsupported version: {version}"
        )));
    }

    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| HttpError::Malformed(format!("invalid method: {method}")))?;
    if !target.starts_with('/') {
        return Err(HttpError::Malformed(format!("invalid target: {target}")));
    }
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut headers = Vec::new();
    loop {
        let line = read_line(reader, &mut head_size)
            .await?
            .ok_or_else(|| HttpError::Malformed("unexpected end of request head".into()))?;
        if line.is_empty() {
            break;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HttpError::Malformed(format!("invalid header: {line:?}")))?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    let mut request = Request {
        method,
        path,
        headers,
        body: Vec::new(),
    };

    if let Some(length) = request.header("content-length") {
        let length: usize = length
            .parse()
            .map_err(|_| HttpError::Malformed(format!("invalid content-length: {length}")))?;
        if length > MAX_BODY_SIZE {
            return Err(HttpError::BodyTooLarge(length));
        }
        let mut body = vec![0u8; length];
        reader.read_exact(&mut body).await?;
        request.body = body;
    }

    Ok(request)
}

/// Read a CRLF (or LF) terminated line, `None` on a clean end of stream.
async fn read_line<R>(reader: &mut R, head_size: &mut usize) -> Result<Option<String>, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let remaining = MAX_HEAD_SIZE.saturating_sub(*head_size);
    let mut buf = Vec::new();
    let n = (&mut *reader)
        .take(remaining as u64)
        .read_until(b'\n', &mut buf)
        .await?;
    *head_size += n;

    if n == 0 {
        if remaining == 0 {
            return Err(HttpError::HeadTooLarge);
        }
        return Ok(None);
    }
    if !buf.ends_with(b"\n") {
        if *head_size >= MAX_HEAD_SIZE {
            return Err(HttpError::HeadTooLarge);
        }
        return Err(HttpError::Malformed("unexpected end of request head".into()));
    }

    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| HttpError::Malformed("request head is not valid UTF-8".into()))
}

/// Write a response with `Content-Length` and `Connection: close`.
pub async fn write_response<W>(writer: &mut W, response: &Response) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut head = format!(
        "HTTP/1.1 {} {}\r\n",
        response.status.as_u16(),
        response.status.canonical_reason().unwrap_or("")
    );
    for (name, value) in &response.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    head.push_str("Connection: close\r\n\r\n");

    writer.write_all(head.as_bytes()).await?;
    writer.write_all(&response.body).await?;
    writer.flush().await
}
