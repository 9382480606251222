//! Static file lookup and loading.

pub mod resolver;

use std::path::PathBuf;

pub use resolver::{DocumentRoot, ResolveError, ResolvedPath};

use crate::http::mime::content_type_for;

/// A resolved file with its full contents, built per request and never cached.
#[derive(Debug, Clone)]
pub struct StaticFile {
    pub filename: String,
    pub path: PathBuf,
    pub content_type: &'static str,
    pub contents: Vec<u8>,
}

impl StaticFile {
    /// Reads the whole file into memory.
    pub async fn read(resolved: ResolvedPath) -> std::io::Result<Self> {
        let contents = tokio::fs::read(&resolved.path).await?;
        Ok(Self {
            content_type: content_type_for(&resolved.filename),
            filename: resolved.filename,
            path: resolved.path,
            contents,
        })
    }
}
