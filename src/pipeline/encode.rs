//! MIME resolution and validated encoding: raw bytes → [`CanonicalFile`].
//!
//! The allow-list and size checks run before the base64 pass. Every entry
//! point in [`crate::pipeline::input`] funnels through [`encode_document`].

use crate::error::DocuError;
use crate::file::{CanonicalFile, SupportedMime};
use image::ImageFormat;
use std::path::Path;
use tracing::debug;

/// Map a file extension to a MIME string, the way a browser file picker would.
///
/// Unknown extensions return `None`; callers then fall back to [`sniff_mime`].
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "webp" => "image/webp",
        "heic" | "heif" => "image/heic",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return None,
    };
    Some(mime)
}

/// Identify a supported document from its leading bytes.
///
/// PDF and HEIC are checked by hand; PNG, JPEG and WebP go through
/// [`image::guess_format`].
pub fn sniff_mime(bytes: &[u8]) -> Option<SupportedMime> {
    if bytes.starts_with(b"%PDF") {
        return Some(SupportedMime::Pdf);
    }
    if is_heic(bytes) {
        return Some(SupportedMime::Heic);
    }
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some(SupportedMime::Png),
        ImageFormat::Jpeg => Some(SupportedMime::Jpeg),
        ImageFormat::WebP => Some(SupportedMime::Webp),
        _ => None,
    }
}

/// ISO-BMFF container whose `ftyp` major brand is one of the HEIF brands.
fn is_heic(bytes: &[u8]) -> bool {
    if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
        return false;
    }
    matches!(
        &bytes[8..12],
        b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" | b"mif1" | b"msf1"
    )
}

/// Validate `declared_mime` against the allow-list and the size cap, then
/// base64-encode `bytes`.
///
/// Rejection happens before any encoding work.
pub fn encode_document(
    name: &str,
    declared_mime: &str,
    bytes: &[u8],
    max_bytes: u64,
) -> Result<CanonicalFile, DocuError> {
    let mime = SupportedMime::parse(declared_mime).ok_or_else(|| DocuError::UnsupportedFileType {
        name: name.to_string(),
        mime: declared_mime.to_string(),
    })?;
    check_size(name, bytes.len() as u64, max_bytes)?;

    let file = CanonicalFile::new(name, mime, bytes);
    debug!(
        "Encoded '{}' ({}) → {} bytes base64",
        name,
        mime,
        file.data().len()
    );
    Ok(file)
}

/// Reject payloads above `max_bytes`.
pub fn check_size(name: &str, size: u64, max_bytes: u64) -> Result<(), DocuError> {
    if size > max_bytes {
        return Err(DocuError::FileTooLarge {
            name: name.to_string(),
            size,
            max: max_bytes,
        });
    }
    Ok(())
}
