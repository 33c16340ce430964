//! File intake: normalise a user-supplied source into a [`CanonicalFile`].
//!
//! Four sources exist — a picked file, dropped bytes, a pasted clipboard
//! image and a remote URL — and exactly one is accepted per call. Whatever
//! the source, the result is either a fully encoded [`CanonicalFile`] or a
//! [`DocuError`] whose [`DocuError::user_message`] is fit for an alert.
//!
//! Remote fetches are capped twice: once on `Content-Length` before the body
//! is read, then incrementally while streaming, so a lying server cannot push
//! an unbounded body into memory.

use crate::config::ConversionConfig;
use crate::error::DocuError;
use crate::file::{CanonicalFile, SupportedMime};
use crate::pipeline::encode::{check_size, encode_document, mime_from_extension, sniff_mime};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Filename used when a URL has no usable last path segment.
pub const URL_FALLBACK_NAME: &str = "image_from_url.jpg";

/// MIME reported for bytes that match no known signature.
const UNKNOWN_MIME: &str = "application/octet-stream";

/// One user-provided document source.
#[derive(Debug, Clone)]
pub enum IntakeSource {
    /// A file chosen from disk.
    Path(PathBuf),
    /// Bytes dropped onto the application. `mime` is the type the drop
    /// carried, if any.
    Dropped {
        name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
    /// A clipboard image. Clipboard payloads carry no filename.
    Paste { mime: String, bytes: Vec<u8> },
    /// A remote image to download.
    Url(String),
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Map a command-line argument to a source: URLs are fetched, anything else
/// is treated as a local path.
pub fn resolve_source(input: &str) -> IntakeSource {
    if is_url(input) {
        IntakeSource::Url(input.to_string())
    } else {
        IntakeSource::Path(PathBuf::from(input))
    }
}

/// Turn any source into a [`CanonicalFile`].
pub async fn intake(
    source: IntakeSource,
    config: &ConversionConfig,
) -> Result<CanonicalFile, DocuError> {
    let max = config.max_file_bytes;
    let file = match source {
        IntakeSource::Path(path) => from_path(&path, max).await?,
        IntakeSource::Dropped { name, mime, bytes } => {
            from_dropped(&name, mime.as_deref(), &bytes, max)?
        }
        IntakeSource::Paste { mime, bytes } => from_paste(&mime, &bytes, Utc::now(), max)?,
        IntakeSource::Url(url) => fetch_url(&url, config.download_timeout_secs, max).await?,
    };
    info!(
        "Accepted '{}' ({}, {} bytes)",
        file.name(),
        file.mime_type(),
        file.size()
    );
    Ok(file)
}

/// Read a local file.
///
/// The MIME type comes from the extension, like a browser file picker. A
/// recognised but unsupported extension is rejected before the file is read;
/// an unknown extension falls back to sniffing the content.
pub async fn from_path(path: &Path, max_bytes: u64) -> Result<CanonicalFile, DocuError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| io_error(path, e))?;
    if !meta.is_file() {
        return Err(DocuError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let declared = mime_from_extension(path);
    if let Some(mime) = declared {
        if SupportedMime::parse(mime).is_none() {
            return Err(DocuError::UnsupportedFileType {
                name,
                mime: mime.to_string(),
            });
        }
    }
    check_size(&name, meta.len(), max_bytes)?;

    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    let mime = match declared {
        Some(m) => m,
        None => sniff_mime(&bytes).map(|m| m.as_str()).unwrap_or(UNKNOWN_MIME),
    };
    debug!("Resolved local file {} as {}", path.display(), mime);
    encode_document(&name, mime, &bytes, max_bytes)
}

/// Accept bytes from a drag-and-drop.
///
/// The declared type wins; without one, the name's extension and then the
/// content signature are consulted.
pub fn from_dropped(
    name: &str,
    mime: Option<&str>,
    bytes: &[u8],
    max_bytes: u64,
) -> Result<CanonicalFile, DocuError> {
    let mime = match mime.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m,
        None => mime_from_extension(Path::new(name))
            .or_else(|| sniff_mime(bytes).map(|m| m.as_str()))
            .unwrap_or(UNKNOWN_MIME),
    };
    encode_document(name, mime, bytes, max_bytes)
}

/// Accept a pasted clipboard image, naming it after `now`.
pub fn from_paste(
    mime: &str,
    bytes: &[u8],
    now: DateTime<Utc>,
    max_bytes: u64,
) -> Result<CanonicalFile, DocuError> {
    encode_document(&screenshot_name(now), mime, bytes, max_bytes)
}

/// `screenshot_2026-10-16T09-05-33.png`
pub fn screenshot_name(now: DateTime<Utc>) -> String {
    format!("screenshot_{}.png", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Download a remote image.
///
/// * non-2xx status → [`DocuError::DownloadFailed`]
/// * content type not `image/*` → [`DocuError::NotAnImage`]
/// * no response at all → [`DocuError::FetchFailed`] / [`DocuError::DownloadTimeout`]
///
/// An `image/*` type outside the allow-list (e.g. GIF) passes the fetch
/// checks and is then rejected by the usual validation.
pub async fn fetch_url(
    url: &str,
    timeout_secs: u64,
    max_bytes: u64,
) -> Result<CanonicalFile, DocuError> {
    info!("Downloading image from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DocuError::Internal(format!("HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_error(url, timeout_secs, e))?;

    if !response.status().is_success() {
        return Err(DocuError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .unwrap_or_default();
    if !content_type.starts_with("image/") {
        return Err(DocuError::NotAnImage {
            url: url.to_string(),
            content_type: if content_type.is_empty() {
                "<none>".to_string()
            } else {
                content_type
            },
        });
    }

    let name = filename_from_url(url);
    if let Some(len) = response.content_length() {
        check_size(&name, len, max_bytes)?;
    }

    let mut data = Vec::new();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| transport_error(url, timeout_secs, e))?;
        data.extend_from_slice(&chunk);
        check_size(&name, data.len() as u64, max_bytes)?;
    }
    debug!("Downloaded {} bytes ({})", data.len(), content_type);

    encode_document(&name, &content_type, &data, max_bytes)
}

/// Last non-empty URL path segment, without the query string.
pub fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|last| !last.is_empty())
        .unwrap_or_else(|| URL_FALLBACK_NAME.to_string())
}

fn transport_error(url: &str, timeout_secs: u64, e: reqwest::Error) -> DocuError {
    if e.is_timeout() {
        DocuError::DownloadTimeout {
            url: url.to_string(),
            secs: timeout_secs,
        }
    } else {
        DocuError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> DocuError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => DocuError::PermissionDenied {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::NotFound => DocuError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => DocuError::Internal(format!("reading {}: {e}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MAX: u64 = 1024 * 1024;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/scan.png"));
        assert!(is_url("http://example.com/scan.png"));
        assert!(!is_url("/tmp/scan.png"));
        assert!(!is_url("scan.png"));
        assert!(!is_url(""));
    }

    #[test]
    fn resolve_source_splits_urls_and_paths() {
        assert!(matches!(
            resolve_source("https://a.b/c.png"),
            IntakeSource::Url(_)
        ));
        assert!(matches!(resolve_source("c.png"), IntakeSource::Path(_)));
    }

    #[test]
    fn screenshot_name_uses_dashed_timestamp() {
        let t = Utc.with_ymd_and_hms(2026, 10, 16, 9, 5, 33).unwrap();
        assert_eq!(screenshot_name(t), "screenshot_2026-10-16T09-05-33.png");
    }

    #[test]
    fn paste_keeps_clipboard_mime() {
        let t = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let f = from_paste("image/png", b"\x89PNG....", t, MAX).unwrap();
        assert_eq!(f.name(), "screenshot_2026-01-02T03-04-05.png");
        assert_eq!(f.mime_type(), SupportedMime::Png);
    }

    #[test]
    fn filename_from_url_variants() {
        assert_eq!(filename_from_url("https://x.org/img/cat.png"), "cat.png");
        assert_eq!(filename_from_url("https://x.org/img/cat.png?w=200"), "cat.png");
        assert_eq!(filename_from_url("https://x.org/img/"), URL_FALLBACK_NAME);
        assert_eq!(filename_from_url("https://x.org"), URL_FALLBACK_NAME);
        assert_eq!(filename_from_url("not a url"), URL_FALLBACK_NAME);
    }

    #[test]
    fn dropped_prefers_declared_mime() {
        let f = from_dropped("scan.bin", Some("application/pdf"), b"%PDF-1.7", MAX).unwrap();
        assert_eq!(f.mime_type(), SupportedMime::Pdf);
    }

    #[test]
    fn dropped_without_mime_uses_extension_then_signature() {
        let f = from_dropped("scan.webp", None, b"whatever", MAX).unwrap();
        assert_eq!(f.mime_type(), SupportedMime::Webp);

        let f = from_dropped("scan", Some(""), b"%PDF-1.7", MAX).unwrap();
        assert_eq!(f.mime_type(), SupportedMime::Pdf);

        let err = from_dropped("notes", None, b"plain text", MAX).unwrap_err();
        assert!(matches!(err, DocuError::UnsupportedFileType { .. }));
    }

    #[tokio::test]
    async fn local_pdf_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7\nbody").unwrap();

        let f = from_path(&path, MAX).await.unwrap();
        assert_eq!(f.name(), "report.pdf");
        assert_eq!(f.mime_type(), SupportedMime::Pdf);
        assert_eq!(f.size(), 13);
        assert_eq!(f.decode().unwrap(), b"%PDF-1.7\nbody");
    }

    #[tokio::test]
    async fn local_unknown_extension_is_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.dat");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        let f = from_path(&path, MAX).await.unwrap();
        assert_eq!(f.mime_type(), SupportedMime::Pdf);
    }

    #[tokio::test]
    async fn local_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        let err = from_path(&path, MAX).await.unwrap_err();
        assert!(matches!(err, DocuError::UnsupportedFileType { ref mime, .. } if mime == "text/plain"));
    }

    #[tokio::test]
    async fn local_missing_file() {
        let err = from_path(Path::new("/definitely/not/here.png"), MAX)
            .await
            .unwrap_err();
        assert!(matches!(err, DocuError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn local_file_over_cap_rejected_before_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, vec![0u8; 64]).unwrap();
        let err = from_path(&path, 32).await.unwrap_err();
        assert!(matches!(err, DocuError::FileTooLarge { size: 64, max: 32, .. }));
    }

    #[tokio::test]
    async fn unreachable_url_is_a_fetch_failure() {
        // Port 9 on localhost: nothing listens there in a test sandbox.
        let err = fetch_url("http://127.0.0.1:9/img.png", 5, MAX)
            .await
            .unwrap_err();
        assert!(err.is_fetch_error(), "got: {err:?}");
        assert!(matches!(
            err,
            DocuError::FetchFailed { .. } | DocuError::DownloadTimeout { .. }
        ));
    }
}
