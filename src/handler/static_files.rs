//! Static file serving module
//!
//! Serves the prebuilt web frontend: path resolution inside the static root,
//! directory index files, MIME type detection, conditional and range requests.

use crate::config::StaticConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Where a request path points inside the static root
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    /// Directory requested without trailing slash; carries the corrected location
    Redirect(String),
    NotFound,
}

/// Serve a request from the static root
pub async fn serve(ctx: &RequestContext<'_>, config: &StaticConfig) -> Response<Full<Bytes>> {
    match ctx.method {
        &Method::GET | &Method::HEAD => {}
        &Method::OPTIONS => return http::build_options_response(),
        _ => return http::build_405_response(),
    }

    let file_path = match resolve(Path::new(&config.root), ctx.path, &config.index_files).await {
        Resolved::File(path) => path,
        Resolved::Redirect(location) => {
            let target = match ctx.query {
                Some(q) => format!("{location}?{q}"),
                None => location,
            };
            return http::build_redirect_response(&target);
        }
        Resolved::NotFound => return http::build_404_response(),
    };

    let content = match fs::read(&file_path).await {
        Ok(c) => Bytes::from(c),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response();
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    build_static_file_response(ctx, content, content_type)
}

/// Resolve the still percent-encoded `request_path` against `root`
///
/// Paths that escape the root (via `..`, encoded or not, or symlinks) and paths
/// that do not decode to UTF-8 are treated as missing.
pub async fn resolve(root: &Path, request_path: &str, index_files: &[String]) -> Resolved {
    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{}': {e}",
                root.display()
            ));
            return Resolved::NotFound;
        }
    };

    let Ok(decoded) = percent_decode_str(request_path).decode_utf8() else {
        logger::log_warning(&format!("Request path is not valid UTF-8: {request_path}"));
        return Resolved::NotFound;
    };

    let relative = Path::new(decoded.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return Resolved::NotFound;
    }

    let mut file_path = root_canonical.join(relative);
    let Ok(meta) = fs::metadata(&file_path).await else {
        // Missing files are routine, no need to log
        return Resolved::NotFound;
    };

    if meta.is_dir() {
        if !request_path.ends_with('/') {
            return Resolved::Redirect(format!("{request_path}/"));
        }
        let mut index = None;
        for name in index_files {
            let candidate = file_path.join(name);
            if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
                index = Some(candidate);
                break;
            }
        }
        let Some(index) = index else {
            return Resolved::NotFound;
        };
        file_path = index;
    }

    let Ok(canonical) = fs::canonicalize(&file_path).await else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            canonical.display()
        ));
        return Resolved::NotFound;
    }

    Resolved::File(canonical)
}

/// Build static file response with `ETag` and Range support
fn build_static_file_response(
    ctx: &RequestContext<'_>,
    data: Bytes,
    content_type: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);
    let policy = cache::CachePolicy::for_content_type(content_type);
    let total_size = data.len();
    let is_head = ctx.is_head();

    if cache::check_etag_match(ctx.if_none_match, &etag) {
        return http::build_304_response(&etag, policy);
    }

    match http::parse_range_header(ctx.range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let slice = data.slice(range.start..=range.end);
            http::response::build_partial_response(
                slice,
                content_type,
                &etag,
                range,
                total_size,
                is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            http::response::build_file_response(data, content_type, &etag, policy, is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string()]
    }

    fn scratch_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Monocle</h1>").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "main();").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_resolve_root_uses_index() {
        let dir = scratch_root();
        let resolved = resolve(dir.path(), "/", &index_files()).await;
        let Resolved::File(path) = resolved else {
            panic!("expected index file, got {resolved:?}");
        };
        assert!(path.ends_with("index.html"));
    }

    #[tokio::test]
    async fn test_resolve_nested_file() {
        let dir = scratch_root();
        assert!(matches!(
            resolve(dir.path(), "/assets/app.js", &index_files()).await,
            Resolved::File(_)
        ));
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let dir = scratch_root();
        assert_eq!(
            resolve(dir.path(), "/assets", &index_files()).await,
            Resolved::Redirect("/assets/".to_string())
        );
    }

    #[tokio::test]
    async fn test_directory_without_index_is_missing() {
        let dir = scratch_root();
        assert_eq!(
            resolve(dir.path(), "/assets/", &index_files()).await,
            Resolved::NotFound
        );
    }

    #[tokio::test]
    async fn test_missing_and_traversal() {
        let dir = scratch_root();
        assert_eq!(
            resolve(dir.path(), "/nope.js", &index_files()).await,
            Resolved::NotFound
        );
        assert_eq!(
            resolve(dir.path(), "/../etc/passwd", &index_files()).await,
            Resolved::NotFound
        );
        assert_eq!(
            resolve(dir.path(), "/assets/../../secret", &index_files()).await,
            Resolved::NotFound
        );
    }

    #[tokio::test]
    async fn test_percent_encoded_names() {
        let dir = scratch_root();
        std::fs::write(dir.path().join("assets/my font.ttf"), "font").unwrap();

        let resolved = resolve(dir.path(), "/assets/my%20font.ttf", &index_files()).await;
        let Resolved::File(path) = resolved else {
            panic!("expected font file, got {resolved:?}");
        };
        assert!(path.ends_with("assets/my font.ttf"));

        assert_eq!(
            resolve(dir.path(), "/assets/%2e%2e/%2e%2e/secret", &index_files()).await,
            Resolved::NotFound
        );
        assert_eq!(
            resolve(dir.path(), "/assets%2F..%2F..%2Fsecret", &index_files()).await,
            Resolved::NotFound
        );
        assert_eq!(
            resolve(dir.path(), "/assets/%ff.js", &index_files()).await,
            Resolved::NotFound
        );
    }

    #[tokio::test]
    async fn test_missing_root() {
        let dir = scratch_root();
        let gone = dir.path().join("does-not-exist");
        assert_eq!(resolve(&gone, "/", &index_files()).await, Resolved::NotFound);
    }
}
