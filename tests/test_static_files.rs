use std::collections::HashMap;
use std::fs;

use rawhttpd::http::mime::MimeTypes;
use rawhttpd::http::static_files::{StaticFileOutcome, StaticFiles};
use rawhttpd::http::writer::serialize_response;
use tempfile::TempDir;

const INDEX: &[u8] = b"<!DOCTYPE html><h1>home</h1>";

/// `<tmp>/secret.txt` sits next to the served root `<tmp>/www`.
fn fixture() -> (TempDir, StaticFiles) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("www");
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::write(dir.path().join("secret.txt"), b"top secret").unwrap();
    fs::write(root.join("index.html"), INDEX).unwrap();
    fs::write(root.join("assets/app.CSS"), b"body{}").unwrap();
    fs::write(root.join("blob.unknownext"), [0u8, 159, 146, 150]).unwrap();
    fs::write(root.join("noext"), b"plain").unwrap();

    let files = StaticFiles::new(root, "index.html", MimeTypes::default());
    (dir, files)
}

#[tokio::test]
async fn test_root_serves_default_file() {
    let (_dir, files) = fixture();

    assert_eq!(
        files.resolve("/").await,
        StaticFileOutcome::Served {
            content: INDEX.to_vec(),
            content_type: "text/html".to_string(),
        }
    );
}

#[tokio::test]
async fn test_extension_is_lowercased_for_lookup() {
    let (_dir, files) = fixture();

    match files.resolve("/assets/app.CSS").await {
        StaticFileOutcome::Served { content_type, .. } => assert_eq!(content_type, "text/css"),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_or_missing_extension_is_binary() {
    let (_dir, files) = fixture();

    for path in ["/blob.unknownext", "/noext"] {
        match files.resolve(path).await {
            StaticFileOutcome::Served { content_type, .. } => {
                assert_eq!(content_type, "application/octet-stream")
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_traversal_outside_root_is_forbidden() {
    let (_dir, files) = fixture();

    for path in [
        "/../secret.txt",
        "/assets/../../secret.txt",
        "/./../secret.txt",
        "../secret.txt",
        "..",
    ] {
        assert_eq!(files.resolve(path).await, StaticFileOutcome::Forbidden, "{path}");
    }
}

#[tokio::test]
async fn test_dot_segments_inside_root_are_collapsed() {
    let (_dir, files) = fixture();

    match files.resolve("/assets/../index.html").await {
        StaticFileOutcome::Served { content, .. } => assert_eq!(content, INDEX),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let (_dir, files) = fixture();

    assert_eq!(files.resolve("/missing.css").await, StaticFileOutcome::NotFound);
}

#[tokio::test]
async fn test_directory_is_not_found() {
    let (_dir, files) = fixture();

    assert_eq!(files.resolve("/assets").await, StaticFileOutcome::NotFound);
    assert_eq!(files.resolve("/assets/").await, StaticFileOutcome::NotFound);
}

#[tokio::test]
async fn test_file_used_as_directory_is_server_error() {
    let (_dir, files) = fixture();

    // The parent is a regular file, so stat fails with ENOTDIR rather than ENOENT.
    for path in ["/index.html/x", "/index.html/"] {
        match files.resolve(path).await {
            StaticFileOutcome::ServerError(detail) => assert!(!detail.is_empty()),
            other => panic!("{path}: unexpected outcome {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_repeated_leading_slashes_are_collapsed() {
    let (_dir, files) = fixture();

    match files.resolve("//index.html").await {
        StaticFileOutcome::Served { content, .. } => assert_eq!(content, INDEX),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_query_string_is_part_of_the_path() {
    let (_dir, files) = fixture();

    assert_eq!(files.resolve("/index.html?v=1").await, StaticFileOutcome::NotFound);
}

#[tokio::test]
async fn test_configured_mime_override() {
    let (dir, _) = fixture();
    let mime = MimeTypes::new(HashMap::from([(
        "unknownext".to_string(),
        "application/x-custom".to_string(),
    )]));
    let files = StaticFiles::new(dir.path().join("www"), "index.html", mime);

    match files.resolve("/blob.unknownext").await {
        StaticFileOutcome::Served { content_type, .. } => {
            assert_eq!(content_type, "application/x-custom")
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_served_content_length_matches_file_size() {
    let (dir, files) = fixture();
    let on_disk = fs::read(dir.path().join("www/blob.unknownext")).unwrap();

    let response = files.resolve("/blob.unknownext").await.into_response();
    let wire = String::from_utf8_lossy(&serialize_response(&response, false)).into_owned();

    let content_length: usize = wire
        .lines()
        .find_map(|l| l.strip_prefix("Content-Length: "))
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(content_length, on_disk.len());
}

#[tokio::test]
async fn test_outcomes_map_to_status_codes() {
    use rawhttpd::http::response::StatusCode;

    assert_eq!(StaticFileOutcome::Forbidden.into_response().status, StatusCode::Forbidden);
    assert_eq!(StaticFileOutcome::NotFound.into_response().status, StatusCode::NotFound);
    assert_eq!(
        StaticFileOutcome::ServerError("disk on fire".into()).into_response().status,
        StatusCode::InternalServerError
    );
}
