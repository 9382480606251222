//! Maps request targets to files beneath the document root.
//!
//! Containment is decided only by comparing canonical paths, so `..` segments,
//! absolute components and symlinks are all handled the same way: whatever the
//! target finally points at must sit strictly inside the canonical root.

use std::fmt;
use std::path::{Path, PathBuf};

/// Filename served for `/` and `/index.html`.
pub const INDEX_FILE: &str = "index.html";

/// Why a target could not be resolved.
///
/// Every variant is answered with the same 404; the distinction exists for
/// server-side logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing left after stripping the leading separator.
    EmptyName,
    /// The canonical path is not strictly inside the canonical root.
    OutsideRoot,
    /// Missing, not canonicalizable, or not a regular file.
    NotAFile,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::EmptyName => write!(f, "empty file name"),
            ResolveError::OutsideRoot => write!(f, "path escapes document root"),
            ResolveError::NotAFile => write!(f, "no such file"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// A target that passed containment and refers to an existing regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Relative filename derived from the target, e.g. `images/logo.png`.
    pub filename: String,
    /// Canonical absolute path of the file.
    pub path: PathBuf,
}

/// The directory all served files must live in.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    path: PathBuf,
}

impl DocumentRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Derives the relative filename for a request target.
    ///
    /// `/` and `/index.html` both name the index file; otherwise exactly one
    /// leading `/` is stripped.
    ///
    /// ```
    /// # use warden::static_files::resolver::DocumentRoot;
    /// assert_eq!(DocumentRoot::filename_for("/"), "index.html");
    /// assert_eq!(DocumentRoot::filename_for("/css/site.css"), "css/site.css");
    /// assert_eq!(DocumentRoot::filename_for("//etc/passwd"), "/etc/passwd");
    /// ```
    pub fn filename_for(target: &str) -> &str {
        if target == "/" || target == "/index.html" {
            return INDEX_FILE;
        }
        target.strip_prefix('/').unwrap_or(target)
    }

    /// Resolves a raw request target to a file inside the root.
    pub async fn resolve(&self, target: &str) -> Result<ResolvedPath, ResolveError> {
        let filename = Self::filename_for(target);
        if filename.is_empty() {
            return Err(ResolveError::EmptyName);
        }

        let root = tokio::fs::canonicalize(&self.path)
            .await
            .map_err(|_| ResolveError::NotAFile)?;
        let candidate = tokio::fs::canonicalize(self.path.join(filename))
            .await
            .map_err(|_| ResolveError::NotAFile)?;

        // Component-wise, so a sibling like `www2` never matches `www`.
        if candidate == root || !candidate.starts_with(&root) {
            return Err(ResolveError::OutsideRoot);
        }

        match tokio::fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => Ok(ResolvedPath {
                filename: filename.to_string(),
                path: candidate,
            }),
            _ => Err(ResolveError::NotAFile),
        }
    }
}
