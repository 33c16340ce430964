//! Offline workflow tests: intake → controller → presenter.
//!
//! The extraction service is scripted and remote URLs are served by a
//! throwaway HTTP server on localhost, so nothing here needs an API key.
//!
//! Run with:
//!   cargo test --test workflow

use async_trait::async_trait;
use docuconvert::messages;
use docuconvert::pipeline::llm::finish_text;
use docuconvert::{
    intake, AppController, CanonicalFile, ConversionConfig, DocuError, Extraction,
    ExtractionService, FsDownloadSink, IntakeSource, Locale, ProcessingStatus, ResultPresenter,
    SupportedMime,
};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Answers every request with a fixed raw model response, cleaned the same
/// way the real extractor cleans it.
struct ScriptedService {
    raw: Result<String, String>,
    locale: Locale,
    calls: AtomicUsize,
}

impl ScriptedService {
    fn answering(raw: &str) -> Arc<Self> {
        Arc::new(Self {
            raw: Ok(raw.to_string()),
            locale: Locale::English,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            raw: Err(detail.to_string()),
            locale: Locale::English,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionService for ScriptedService {
    async fn extract(&self, _file: &CanonicalFile) -> Result<Extraction, DocuError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.raw {
            Ok(raw) => Ok(Extraction {
                text: finish_text(raw, self.locale),
                input_tokens: 1200,
                output_tokens: 40,
                duration_ms: 5,
            }),
            Err(detail) => Err(DocuError::ExtractionFailed {
                detail: detail.clone(),
            }),
        }
    }
}

fn png_bytes() -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::new(4, 4))
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

/// Serve exactly one HTTP response on a random local port and return the
/// base URL.
async fn serve_once(status: &'static str, content_type: Option<&'static str>, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = sock.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let mut head = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n",
            body.len()
        );
        if let Some(ct) = content_type {
            head.push_str(&format!("Content-Type: {ct}\r\n"));
        }
        head.push_str("\r\n");
        // The client may hang up early (size cap); that is not a failure here.
        if sock.write_all(head.as_bytes()).await.is_ok() {
            sock.write_all(&body).await.ok();
        }
        sock.shutdown().await.ok();
    });
    format!("http://{addr}")
}

// ── Paste → convert → export ─────────────────────────────────────────────────

#[tokio::test]
async fn pasted_screenshot_converts_and_exports() {
    let config = ConversionConfig::default();
    let service = ScriptedService::answering("```\n# Title\n| A | B |\n```");
    let controller = AppController::new(service.clone(), config.locale);

    let file = intake(
        IntakeSource::Paste {
            mime: "image/png".into(),
            bytes: png_bytes(),
        },
        &config,
    )
    .await
    .unwrap();
    assert!(file.name().starts_with("screenshot_"));
    assert!(file.name().ends_with(".png"));
    assert_eq!(file.mime_type(), SupportedMime::Png);

    controller.select_file(Some(file)).unwrap();
    let extraction = controller.convert().await.unwrap().expect("a file was selected");
    assert_eq!(extraction.text, "# Title\n| A | B |");

    let state = controller.snapshot();
    assert_eq!(state.status, ProcessingStatus::Success);
    assert_eq!(state.result, "# Title\n| A | B |");
    assert_eq!(service.calls(), 1);

    let mut presenter = ResultPresenter::new(Locale::English);
    presenter.set_content(&state.result);
    let dir = tempfile::tempdir().unwrap();
    let sink = FsDownloadSink::new(dir.path());

    let md = presenter.export_markdown(&sink).unwrap().unwrap();
    assert_eq!(std::fs::read_to_string(md).unwrap(), "# Title\n| A | B |");

    let doc = presenter.export_word(&sink).unwrap().unwrap();
    assert!(doc.ends_with("conversion_result.doc"));
    let html = std::fs::read_to_string(doc).unwrap();
    assert!(html.contains("<body># Title\n| A | B |</body>"));
}

#[tokio::test]
async fn empty_answer_becomes_fallback_text() {
    let controller = AppController::new(ScriptedService::answering("  \n"), Locale::English);
    controller
        .select_file(Some(CanonicalFile::new("blank.png", SupportedMime::Png, &png_bytes())))
        .unwrap();
    controller.convert().await.unwrap();

    let state = controller.snapshot();
    assert_eq!(state.status, ProcessingStatus::Success);
    assert_eq!(state.result, messages::empty_extraction(Locale::English));
}

#[tokio::test]
async fn convert_without_file_sends_nothing() {
    let service = ScriptedService::answering("unused");
    let controller = AppController::new(service.clone(), Locale::English);
    assert!(controller.convert().await.unwrap().is_none());
    assert_eq!(controller.status(), ProcessingStatus::Idle);
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn service_failure_shows_generic_message_and_placeholder() {
    let controller = AppController::new(ScriptedService::failing("401 invalid key"), Locale::English);
    controller
        .select_file(Some(CanonicalFile::new("a.pdf", SupportedMime::Pdf, b"%PDF-1.7")))
        .unwrap();
    assert!(controller.convert().await.is_err());

    let state = controller.snapshot();
    assert_eq!(state.status, ProcessingStatus::Error);
    assert_eq!(
        state.error.as_deref(),
        Some(messages::service_failed(Locale::English))
    );

    let mut presenter = ResultPresenter::new(Locale::English);
    presenter.set_content(&state.result);
    assert_eq!(presenter.rendered(), messages::result_placeholder(Locale::English));
}

// ── Intake validation ────────────────────────────────────────────────────────

#[tokio::test]
async fn oversized_drop_is_rejected() {
    let config = ConversionConfig::builder().max_file_bytes(16).build().unwrap();
    let err = intake(
        IntakeSource::Dropped {
            name: "big.png".into(),
            mime: Some("image/png".into()),
            bytes: png_bytes(),
        },
        &config,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DocuError::FileTooLarge { max: 16, .. }));
}

#[tokio::test]
async fn unsupported_drop_is_rejected_with_localised_message() {
    let err = intake(
        IntakeSource::Dropped {
            name: "anim.gif".into(),
            mime: Some("image/gif".into()),
            bytes: b"GIF89a".to_vec(),
        },
        &ConversionConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DocuError::UnsupportedFileType { .. }));
    assert_eq!(
        err.user_message(Locale::Vietnamese),
        messages::unsupported_file_type(Locale::Vietnamese)
    );
}

// ── Remote URLs ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn url_404_is_download_failure_with_paste_hint() {
    let base = serve_once("404 Not Found", Some("text/plain"), b"nope".to_vec()).await;
    let err = intake(
        IntakeSource::Url(format!("{base}/missing.png")),
        &ConversionConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DocuError::DownloadFailed { .. }), "got {err:?}");
    assert!(err
        .user_message(Locale::English)
        .contains(messages::paste_hint(Locale::English)));
}

#[tokio::test]
async fn url_serving_html_is_not_an_image() {
    let base = serve_once("200 OK", Some("text/html; charset=utf-8"), b"<html></html>".to_vec()).await;
    let err = intake(
        IntakeSource::Url(format!("{base}/page")),
        &ConversionConfig::default(),
    )
    .await
    .unwrap_err();
    match err {
        DocuError::NotAnImage { content_type, .. } => assert_eq!(content_type, "text/html"),
        other => panic!("expected NotAnImage, got {other:?}"),
    }
}

#[tokio::test]
async fn url_image_is_named_after_last_segment() {
    let png = png_bytes();
    let base = serve_once("200 OK", Some("image/png"), png.clone()).await;
    let file = intake(
        IntakeSource::Url(format!("{base}/scans/receipt.png?size=full")),
        &ConversionConfig::default(),
    )
    .await
    .unwrap();
    assert_eq!(file.name(), "receipt.png");
    assert_eq!(file.mime_type(), SupportedMime::Png);
    assert_eq!(file.decode().unwrap(), png);
}

#[tokio::test]
async fn url_without_path_uses_fallback_name() {
    let base = serve_once("200 OK", Some("image/jpeg"), b"\xFF\xD8\xFF\xE0jpeg".to_vec()).await;
    let file = intake(IntakeSource::Url(format!("{base}/")), &ConversionConfig::default())
        .await
        .unwrap();
    assert_eq!(file.name(), "image_from_url.jpg");
    assert_eq!(file.mime_type(), SupportedMime::Jpeg);
}

#[tokio::test]
async fn url_body_over_cap_is_rejected() {
    let base = serve_once("200 OK", Some("image/png"), png_bytes()).await;
    let config = ConversionConfig::builder().max_file_bytes(8).build().unwrap();
    let err = intake(IntakeSource::Url(format!("{base}/big.png")), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, DocuError::FileTooLarge { .. }));
}
