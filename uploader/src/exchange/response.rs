use encoding_rs::WINDOWS_1251;

use crate::constants::protocol;
use crate::errors::{ExchangeError, Result};

/// Status carried on the first line of every response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Progress,
    Fail,
}

impl Status {
    pub fn from_token(token: &str) -> Self {
        match token {
            protocol::STATUS_SUCCESS => Status::Success,
            protocol::STATUS_PROGRESS => Status::Progress,
            _ => Status::Fail,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

/// Reinterpret a raw body from the server's single-byte code page.
///
/// Bytes are always read as Windows-1251; a leading byte-order mark is not
/// treated specially.
pub fn decode_body(raw: &[u8]) -> String {
    let (text, _had_errors) = WINDOWS_1251.decode_without_bom_handling(raw);
    text.into_owned()
}

/// One decoded response, consumed right after the request that produced it
#[derive(Debug, Clone)]
pub struct ProtocolResponse {
    pub status: Status,
    mode: String,
    lines: Vec<String>,
}

impl ProtocolResponse {
    pub fn parse(mode: &str, raw: &[u8]) -> Self {
        let text = decode_body(raw);
        let lines: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        let status = Status::from_token(lines.first().map(String::as_str).unwrap_or_default());

        Self {
            status,
            mode: mode.to_string(),
            lines,
        }
    }

    /// All lines, status line included, in server order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Human-readable message on line 1, empty when the server sent none
    pub fn message(&self) -> &str {
        self.lines.get(1).map(String::as_str).unwrap_or_default()
    }

    /// Raw line at `index`; a missing line is a decoding error
    pub fn field(&self, index: usize) -> Result<&str> {
        self.lines
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                ExchangeError::decode(
                    &self.mode,
                    format!("expected at least {} lines, got {}", index + 1, self.lines.len()),
                )
            })
    }

    /// Split line `index` on its first `=` into name and value
    pub fn pair(&self, index: usize) -> Result<(&str, &str)> {
        let line = self.field(index)?;
        line.split_once('=').ok_or_else(|| {
            ExchangeError::decode(
                &self.mode,
                format!("line {} '{}' has no '=' separator", index, line),
            )
        })
    }

    /// Value part of the `key=value` line at `index`
    pub fn param(&self, index: usize) -> Result<&str> {
        self.pair(index).map(|(_, value)| value)
    }

    /// Decoded body for tracing
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
