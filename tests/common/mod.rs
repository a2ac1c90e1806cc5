#![allow(dead_code)]

use std::path::Path;

use actix_web::test::TestRequest;
use catalog_api::{db, server::AppState};
use tempfile::TempDir;

pub const BOUNDARY: &str = "----catalog-api-test-boundary";

pub fn state(dir: &TempDir) -> AppState {
    state_with_cap(dir, 1024 * 1024)
}

pub fn state_with_cap(dir: &TempDir, max_upload_bytes: usize) -> AppState {
    let pool = db::establish_pool(&dir.path().join("catalog.db")).expect("test pool");
    AppState {
        pool,
        content_dir: dir.path().join("content"),
        max_upload_bytes,
    }
}

/// Number of entries in the content dir; a dir that was never created
/// counts as empty.
pub fn content_file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

/// Assemble a multipart body from `(part name, optional filename, payload)`
/// triples.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}
