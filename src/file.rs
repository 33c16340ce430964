//! The canonical in-memory document handed from intake to the extractor.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::fmt;

/// The MIME types the extraction service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SupportedMime {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/webp")]
    Webp,
    #[serde(rename = "image/heic")]
    Heic,
}

impl SupportedMime {
    pub const ALL: [SupportedMime; 5] = [
        SupportedMime::Pdf,
        SupportedMime::Png,
        SupportedMime::Jpeg,
        SupportedMime::Webp,
        SupportedMime::Heic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SupportedMime::Pdf => "application/pdf",
            SupportedMime::Png => "image/png",
            SupportedMime::Jpeg => "image/jpeg",
            SupportedMime::Webp => "image/webp",
            SupportedMime::Heic => "image/heic",
        }
    }

    /// Parse a MIME string against the allow-list.
    ///
    /// Case-insensitive; parameters after `;` are ignored.
    pub fn parse(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.as_str() == essence)
    }

    pub fn is_image(self) -> bool {
        !matches!(self, SupportedMime::Pdf)
    }

    /// Short label for UI badges, e.g. `PNG`.
    pub fn label(self) -> &'static str {
        match self {
            SupportedMime::Pdf => "PDF",
            SupportedMime::Png => "PNG",
            SupportedMime::Jpeg => "JPEG",
            SupportedMime::Webp => "WEBP",
            SupportedMime::Heic => "HEIC",
        }
    }
}

impl fmt::Display for SupportedMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-supplied document, normalised for the extraction service.
///
/// `data` always decodes to exactly `size` bytes: the only constructor
/// encodes the bytes itself, and the fields are not mutable from outside.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalFile {
    name: String,
    mime_type: SupportedMime,
    #[serde(skip_serializing)]
    data: String,
    size: usize,
}

impl CanonicalFile {
    /// Base64-encode `bytes` into a canonical file.
    pub fn new(name: impl Into<String>, mime_type: SupportedMime, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            mime_type,
            data: STANDARD.encode(bytes),
            size: bytes.len(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> SupportedMime {
        self.mime_type
    }

    /// Base64 payload (standard alphabet, padded).
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Size of the decoded payload in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Decode the payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }

    /// Human summary such as `PNG • 12.3 KB`.
    pub fn summary(&self) -> String {
        format!(
            "{} \u{2022} {:.1} KB",
            self.mime_type.label(),
            self.size as f64 / 1024.0
        )
    }
}

impl fmt::Debug for CanonicalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanonicalFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("data", &format_args!("<{} base64 chars>", self.data.len()))
            .field("size", &self.size)
            .finish()
    }
}
