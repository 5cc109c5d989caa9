//! Static file resolution under a fixed root.
//!
//! Request targets are treated as paths relative to the root. Traversal
//! that would leave the root is refused, and the joined candidate must still
//! start with `root + separator` before anything touches the filesystem.

use crate::config::StaticFilesConfig;
use crate::http::mime::MimeTypes;
use crate::http::response::Response;
use std::io::ErrorKind;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};
use tokio::fs;

/// Result of resolving a request path against the static root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticFileOutcome {
    Served { content: Vec<u8>, content_type: String },
    Forbidden,
    /// Missing, or not a regular file. Directories are never listed.
    NotFound,
    ServerError(String),
}

impl StaticFileOutcome {
    pub fn into_response(self) -> Response {
        match self {
            StaticFileOutcome::Served { content, content_type } => {
                Response::ok(content, content_type)
            }
            StaticFileOutcome::Forbidden => Response::forbidden(),
            StaticFileOutcome::NotFound => Response::not_found(),
            StaticFileOutcome::ServerError(_) => Response::internal_error(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    default_file: String,
    mime: MimeTypes,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>, default_file: impl Into<String>, mime: MimeTypes) -> Self {
        Self {
            root: root.into(),
            default_file: default_file.into(),
            mime,
        }
    }

    pub fn from_config(cfg: &StaticFilesConfig) -> Self {
        Self::new(
            cfg.root.clone(),
            cfg.default_file.clone(),
            MimeTypes::new(cfg.mime_types.clone()),
        )
    }

    /// Maps `requested_path` to a file under the root.
    pub async fn resolve(&self, requested_path: &str) -> StaticFileOutcome {
        let default_path;
        let requested = if requested_path == "/" {
            default_path = format!("/{}", self.default_file);
            default_path.as_str()
        } else {
            requested_path
        };

        let Some(relative) = normalize(requested) else {
            tracing::warn!(path = %requested_path, "Path traversal attempt blocked");
            return StaticFileOutcome::Forbidden;
        };

        let candidate = self.root.join(&relative);
        if !is_contained(&self.root, &candidate) {
            tracing::warn!(
                path = %requested_path,
                candidate = %candidate.display(),
                "Resolved path escapes static root"
            );
            return StaticFileOutcome::Forbidden;
        }

        let metadata = match fs::metadata(&candidate).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return StaticFileOutcome::NotFound,
            Err(e) => return server_error(&candidate, e),
        };

        if !metadata.is_file() {
            return StaticFileOutcome::NotFound;
        }

        let content = match fs::read(&candidate).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return StaticFileOutcome::NotFound,
            Err(e) => return server_error(&candidate, e),
        };

        let extension = candidate.extension().and_then(|e| e.to_str());
        let content_type = self.mime.content_type(extension).to_string();

        StaticFileOutcome::Served { content, content_type }
    }
}

fn server_error(path: &Path, err: std::io::Error) -> StaticFileOutcome {
    tracing::error!(path = %path.display(), error = %err, "Failed to read static file");
    StaticFileOutcome::ServerError(err.to_string())
}

/// Collapses `.` and `..` segments of a request target into a relative path.
///
/// A trailing separator survives, so `/page.html/` never matches a file.
/// Returns `None` when a `..` would climb above the root.
fn normalize(requested: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in requested.split(std::path::is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }

    let mut relative = segments.join(MAIN_SEPARATOR_STR);
    if !relative.is_empty() && requested.ends_with(std::path::is_separator) {
        relative.push(MAIN_SEPARATOR);
    }
    Some(relative)
}

// Plain string prefix check; symlinks are not resolved.
fn is_contained(root: &Path, candidate: &Path) -> bool {
    let mut prefix = root.to_string_lossy().into_owned();
    if !prefix.ends_with(MAIN_SEPARATOR) {
        prefix.push(MAIN_SEPARATOR);
    }
    candidate.to_string_lossy().starts_with(&prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(normalize("/a/./b/../c.txt").as_deref(), Some("a/c.txt"));
        assert_eq!(normalize("//index.html").as_deref(), Some("index.html"));
        assert_eq!(normalize("/").as_deref(), Some(""));
    }

    #[test]
    fn normalize_keeps_trailing_separator() {
        assert_eq!(normalize("/a/b/").as_deref(), Some("a/b/"));
        assert_eq!(normalize("/a/./").as_deref(), Some("a/"));
        assert_eq!(normalize("/a/..").as_deref(), Some(""));
    }

    #[test]
    fn normalize_refuses_escape() {
        assert_eq!(normalize("/../secret.txt"), None);
        assert_eq!(normalize("/a/../../secret.txt"), None);
        assert_eq!(normalize(".."), None);
    }

    #[test]
    fn containment_is_a_prefix_check() {
        let root = Path::new("/srv/www");
        assert!(is_contained(root, Path::new("/srv/www/index.html")));
        assert!(!is_contained(root, Path::new("/srv/www")));
        assert!(!is_contained(root, Path::new("/srv/wwwx/index.html")));
    }
}
