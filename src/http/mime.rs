//! MIME type detection based on file extensions.
//!
//! `text/*` types are returned bare; the writer adds the charset.

use crate::http::response::OCTET_STREAM;
use std::collections::HashMap;

/// Built-in content type for a lower-cased extension (without the dot).
///
/// # Examples
/// ```
/// use rawhttpd::http::mime::builtin_content_type;
/// assert_eq!(builtin_content_type("html"), Some("text/html"));
/// assert_eq!(builtin_content_type("xyz"), None);
/// ```
pub fn builtin_content_type(extension: &str) -> Option<&'static str> {
    let ty = match extension {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // JavaScript/WASM
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Audio/Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",

        _ => return None,
    };
    Some(ty)
}

/// Extension lookup with configured overrides taking precedence.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct MimeTypes {
    overrides: HashMap<String, String>,
}

impl MimeTypes {
    /// Keys may be given with or without a leading dot, in any case.
    pub fn new(overrides: HashMap<String, String>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(ext, ty)| (ext.trim_start_matches('.').to_ascii_lowercase(), ty))
            .collect();
        Self { overrides }
    }

    pub fn content_type(&self, extension: Option<&str>) -> &str {
        let Some(ext) = extension.map(str::to_ascii_lowercase) else {
            return OCTET_STREAM;
        };

        if let Some(ty) = self.overrides.get(&ext) {
            return ty;
        }
        builtin_content_type(&ext).unwrap_or(OCTET_STREAM)
    }
}
