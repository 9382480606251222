use std::fmt;

use crate::http::request::{Method, RequestLine};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing was received.
    Empty,
    /// The first line has fewer than two tokens.
    Malformed,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty request"),
            ParseError::Malformed => write!(f, "malformed request line"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses the request line out of the first chunk read from a client.
///
/// Anything after the first line (headers, body) is ignored. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn parse_request_line(buf: &[u8]) -> Result<RequestLine, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    let text = String::from_utf8_lossy(buf);
    let line = text.lines().next().unwrap_or("");

    let mut parts = line.split_whitespace();
    let method = parts.next().ok_or(ParseError::Malformed)?;
    let target = parts.next().ok_or(ParseError::Malformed)?;
    let version = parts.next();

    Ok(RequestLine {
        method: Method::from_token(method),
        target: target.to_string(),
        version: version.map(str::to_string),
        raw: line.to_string(),
    })
}
