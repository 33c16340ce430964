//! Result presenter: cleaned display text, clipboard copy and file export.
//!
//! The presenter never talks to the OS directly. Copying goes through a
//! [`Clipboard`]; exports go through a [`DownloadSink`], which in the CLI is
//! an [`FsDownloadSink`] rooted at the output directory.

use crate::clipboard::Clipboard;
use crate::error::DocuError;
use crate::messages::{self, Locale};
use crate::pipeline::postprocess::clean_text;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long the "copied" acknowledgement stays visible.
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

/// File stem used when the caller does not name the export.
pub const DEFAULT_EXPORT_STEM: &str = "conversion_result";

pub const MARKDOWN_MIME: &str = "text/markdown";
pub const WORD_MIME: &str = "application/msword";

/// Destination for exported documents.
pub trait DownloadSink {
    /// Store `bytes` under `file_name` and return where they ended up.
    fn save(&self, file_name: &str, mime: &str, bytes: &[u8]) -> Result<PathBuf, DocuError>;
}

/// Writes exports into a directory.
///
/// Each file is written to a temporary sibling first and then renamed over
/// the target, so a crash never leaves a half-written export behind.
#[derive(Debug, Clone)]
pub struct FsDownloadSink {
    dir: PathBuf,
}

impl FsDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FsDownloadSink {
    fn save(&self, file_name: &str, mime: &str, bytes: &[u8]) -> Result<PathBuf, DocuError> {
        let target = self.dir.join(file_name);
        let write_err = |source: std::io::Error| DocuError::OutputWriteFailed {
            path: target.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(bytes).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        tmp.persist(&target).map_err(|e| write_err(e.error))?;

        debug!("Saved {} ({}, {} bytes)", target.display(), mime, bytes.len());
        Ok(target)
    }
}

/// Holds the text shown in the result pane.
#[derive(Debug, Default)]
pub struct ResultPresenter {
    display: String,
    copied_at: Option<Instant>,
    locale: Locale,
}

impl ResultPresenter {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Replace the content; it is cleaned on every change.
    pub fn set_content(&mut self, content: &str) {
        self.display = clean_text(content);
        self.copied_at = None;
    }

    /// The cleaned text (empty when there is nothing to show).
    pub fn display_text(&self) -> &str {
        &self.display
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    /// What the pane shows: the text, or the empty-state placeholder.
    pub fn rendered(&self) -> &str {
        if self.is_empty() {
            messages::result_placeholder(self.locale)
        } else {
            &self.display
        }
    }

    /// Copy the display text to `clipboard`.
    ///
    /// Returns `true` on success and opens the acknowledgement window.
    /// Failures are logged and otherwise swallowed.
    pub fn copy(&mut self, clipboard: &dyn Clipboard) -> bool {
        self.copy_at(clipboard, Instant::now())
    }

    fn copy_at(&mut self, clipboard: &dyn Clipboard, now: Instant) -> bool {
        if self.is_empty() {
            return false;
        }
        match clipboard.write_text(&self.display) {
            Ok(()) => {
                self.copied_at = Some(now);
                true
            }
            Err(e) => {
                warn!("Failed to copy: {}", e);
                false
            }
        }
    }

    pub fn copy_acknowledged(&self) -> bool {
        self.copy_acknowledged_at(Instant::now())
    }

    /// Whether `now` falls inside the two-second window after a copy.
    pub fn copy_acknowledged_at(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|t| now.saturating_duration_since(t) < COPY_ACK_DURATION)
    }

    /// Label for the copy control.
    pub fn copy_label(&self) -> Option<&'static str> {
        self.copy_acknowledged().then(|| messages::copied(self.locale))
    }

    /// Export as `conversion_result.md`.
    pub fn export_markdown(&self, sink: &dyn DownloadSink) -> Result<Option<PathBuf>, DocuError> {
        self.export_markdown_as(sink, &format!("{DEFAULT_EXPORT_STEM}.md"))
    }

    /// Export the display text verbatim as Markdown.
    ///
    /// Returns `Ok(None)` without touching the sink when there is no content.
    pub fn export_markdown_as(
        &self,
        sink: &dyn DownloadSink,
        file_name: &str,
    ) -> Result<Option<PathBuf>, DocuError> {
        if self.is_empty() {
            return Ok(None);
        }
        let path = sink.save(file_name, MARKDOWN_MIME, self.display.as_bytes())?;
        info!("Exported Markdown to {}", path.display());
        Ok(Some(path))
    }

    /// Export as `conversion_result.doc`.
    pub fn export_word(&self, sink: &dyn DownloadSink) -> Result<Option<PathBuf>, DocuError> {
        self.export_word_as(sink, &format!("{DEFAULT_EXPORT_STEM}.doc"))
    }

    /// Export the display text wrapped in a Word-compatible HTML document.
    pub fn export_word_as(
        &self,
        sink: &dyn DownloadSink,
        file_name: &str,
    ) -> Result<Option<PathBuf>, DocuError> {
        if self.is_empty() {
            return Ok(None);
        }
        let html = word_document(&self.display);
        let path = sink.save(file_name, WORD_MIME, html.as_bytes())?;
        info!("Exported Word document to {}", path.display());
        Ok(Some(path))
    }
}

/// Wrap `text` in the HTML shell Word opens as a `.doc`.
///
/// `pre-wrap` keeps the pipe tables and line breaks as typed.
pub fn word_document(text: &str) -> String {
    format!(
        "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
xmlns:w='urn:schemas-microsoft-com:office:word' \
xmlns='http://www.w3.org/TR/REC-html40'>
<head>
<meta charset=\"utf-8\">
<title>Export to Word</title>
<style>
body {{
  font-family: 'Calibri', 'Segoe UI', sans-serif;
  font-size: 11pt;
  line-height: 1.5;
  white-space: pre-wrap;
  padding: 20px;
}}
</style>
</head>
<body>{}</body>
</html>
",
        escape_html(text)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::tests::MemoryClipboard;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        saved: RefCell<Vec<(String, String, Vec<u8>)>>,
    }

    impl DownloadSink for RecordingSink {
        fn save(&self, file_name: &str, mime: &str, bytes: &[u8]) -> Result<PathBuf, DocuError> {
            self.saved
                .borrow_mut()
                .push((file_name.to_string(), mime.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(file_name))
        }
    }

    fn presenter(text: &str) -> ResultPresenter {
        let mut p = ResultPresenter::new(Locale::English);
        p.set_content(text);
        p
    }

    #[test]
    fn content_is_cleaned_on_set() {
        let p = presenter("```markdown\nHello\n```");
        assert_eq!(p.display_text(), "Hello");
    }

    #[test]
    fn empty_content_shows_placeholder() {
        let p = presenter("   ");
        assert!(p.is_empty());
        assert_eq!(p.rendered(), messages::result_placeholder(Locale::English));

        let p = ResultPresenter::new(Locale::Vietnamese);
        assert_eq!(p.rendered(), messages::result_placeholder(Locale::Vietnamese));
    }

    #[test]
    fn copy_writes_text_and_acknowledges_for_two_seconds() {
        let cb = MemoryClipboard::default();
        let mut p = presenter("# Title");
        let t0 = Instant::now();
        assert!(p.copy_at(&cb, t0));
        assert_eq!(cb.text.borrow().as_deref(), Some("# Title"));
        assert!(p.copy_acknowledged_at(t0 + Duration::from_millis(1999)));
        assert!(!p.copy_acknowledged_at(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn copy_failure_is_swallowed() {
        let cb = MemoryClipboard {
            fail: true,
            ..Default::default()
        };
        let mut p = presenter("text");
        assert!(!p.copy(&cb));
        assert!(!p.copy_acknowledged());
        assert!(p.copy_label().is_none());
    }

    #[test]
    fn copy_label_while_acknowledged() {
        let cb = MemoryClipboard::default();
        let mut p = presenter("text");
        assert!(p.copy(&cb));
        assert_eq!(p.copy_label(), Some("COPIED"));
    }

    #[test]
    fn new_content_clears_acknowledgement() {
        let cb = MemoryClipboard::default();
        let mut p = presenter("one");
        p.copy(&cb);
        p.set_content("two");
        assert!(!p.copy_acknowledged());
    }

    #[test]
    fn markdown_export_is_verbatim() {
        let sink = RecordingSink::default();
        let p = presenter("# T\n| a | b |");
        let path = p.export_markdown(&sink).unwrap().unwrap();
        assert_eq!(path, PathBuf::from("conversion_result.md"));

        let saved = sink.saved.borrow();
        assert_eq!(saved[0].1, MARKDOWN_MIME);
        assert_eq!(saved[0].2, b"# T\n| a | b |");
    }

    #[test]
    fn word_export_wraps_in_html() {
        let sink = RecordingSink::default();
        let p = presenter("| a | b |");
        p.export_word(&sink).unwrap();

        let saved = sink.saved.borrow();
        assert_eq!(saved[0].0, "conversion_result.doc");
        assert_eq!(saved[0].1, WORD_MIME);
        let html = String::from_utf8(saved[0].2.clone()).unwrap();
        assert!(html.contains("urn:schemas-microsoft-com:office:word"));
        assert!(html.contains("white-space: pre-wrap;"));
        assert!(html.contains("font-size: 11pt;"));
        assert!(html.contains("<body>| a | b |</body>"));
    }

    #[test]
    fn word_export_escapes_markup() {
        let html = word_document("a < b && c > d");
        assert!(html.contains("<body>a &lt; b &amp;&amp; c &gt; d</body>"));
    }

    #[test]
    fn empty_presenter_exports_nothing() {
        let sink = RecordingSink::default();
        let p = presenter("");
        assert!(p.export_markdown(&sink).unwrap().is_none());
        assert!(p.export_word(&sink).unwrap().is_none());
        assert!(sink.saved.borrow().is_empty());
    }

    #[test]
    fn fs_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDownloadSink::new(dir.path().join("out"));
        let path = sink.save("r.md", MARKDOWN_MIME, b"hello").unwrap();
        assert_eq!(path, dir.path().join("out").join("r.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");

        sink.save("r.md", MARKDOWN_MIME, b"again").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "again");
        assert_eq!(std::fs::read_dir(sink.dir()).unwrap().count(), 1);
    }
}
