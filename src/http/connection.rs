use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::http::access_log;
use crate::http::parser::parse_request_line;
use crate::http::request::RequestLine;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::static_files::{DocumentRoot, StaticFile};

/// Bytes read from the client. Only the request line matters, so one read suffices.
pub const READ_BUFFER_SIZE: usize = 4096;

/// Handles exactly one request on one connection, then closes it.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    root: Arc<DocumentRoot>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(RequestLine),
    Writing(ResponseWriter, Exchange),
    Closed,
}

/// What gets recorded in the access log once the response is out.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request_line: String,
    pub status: StatusCode,
    pub resource: String,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, root: Arc<DocumentRoot>) -> Self {
        Self {
            stream,
            peer,
            root,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection to completion.
    ///
    /// An error means the exchange was aborted; dropping the connection
    /// afterwards closes the socket.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(req) => ConnectionState::Processing(req),
                    None => ConnectionState::Closed,
                },

                ConnectionState::Processing(req) => {
                    let (response, exchange) = Self::handle_request(&self.root, req).await?;
                    ConnectionState::Writing(ResponseWriter::new(&response), exchange)
                }

                ConnectionState::Writing(mut writer, exchange) => {
                    writer
                        .write_to_stream(&mut self.stream)
                        .await
                        .context("sending response")?;
                    access_log::log_request(
                        self.peer,
                        &exchange.request_line,
                        exchange.status,
                        &exchange.resource,
                    );
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        if let Err(e) = self.stream.shutdown().await {
            debug!(peer = %self.peer, error = %e, "shutdown after exchange failed");
        }
        Ok(())
    }

    /// Reads once and parses the request line.
    ///
    /// Returns `None` when the client sent nothing or a malformed line; such
    /// connections are closed without a response.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<RequestLine>> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let n = self.stream.read(&mut buf).await.context("reading request")?;

        match parse_request_line(&buf[..n]) {
            Ok(req) => Ok(Some(req)),
            Err(e) => {
                debug!(peer = %self.peer, reason = %e, "closing without response");
                Ok(None)
            }
        }
    }

    async fn handle_request(
        root: &DocumentRoot,
        req: RequestLine,
    ) -> anyhow::Result<(Response, Exchange)> {
        if !req.method.is_supported() {
            return Ok((
                Response::not_implemented(),
                Exchange {
                    request_line: req.raw,
                    status: StatusCode::NotImplemented,
                    resource: req.target,
                },
            ));
        }

        let filename = DocumentRoot::filename_for(&req.target).to_string();
        let not_found = |request_line: String, filename: String| {
            (
                Response::not_found(&filename),
                Exchange {
                    request_line,
                    status: StatusCode::NotFound,
                    resource: filename,
                },
            )
        };

        let resolved = match root.resolve(&req.target).await {
            Ok(resolved) => resolved,
            Err(reason) => {
                debug!(request_target = %req.target, %reason, "resolution rejected");
                return Ok(not_found(req.raw, filename));
            }
        };

        let file = match StaticFile::read(resolved).await {
            Ok(file) => {
                debug!(path = %file.path.display(), bytes = file.contents.len(), "serving file");
                file
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(request_target = %req.target, "file vanished before read");
                return Ok(not_found(req.raw, filename));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", filename));
            }
        };

        Ok((
            Response::ok(file.content_type, file.contents),
            Exchange {
                request_line: req.raw,
                status: StatusCode::Ok,
                resource: file.filename,
            },
        ))
    }
}
