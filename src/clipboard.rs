//! System clipboard access.
//!
//! Two directions are needed: reading a pasted screenshot into the intake
//! path and writing the result text out for "copy". Both go through the
//! [`Clipboard`] trait so the presenter and tests never touch the OS
//! clipboard directly.

use crate::error::DocuError;

/// Image bytes read from the clipboard, already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), DocuError>;

    /// Read the first image on the clipboard, if any.
    ///
    /// Returns `Ok(None)` when the clipboard holds no image; non-image
    /// content is ignored.
    fn read_image(&self) -> Result<Option<ClipboardImage>, DocuError>;
}

#[cfg(feature = "clipboard")]
pub use system::SystemClipboard;

#[cfg(feature = "clipboard")]
mod system {
    use super::{Clipboard, ClipboardImage};
    use crate::error::DocuError;
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use std::io::Cursor;
    use tracing::debug;

    /// The OS clipboard via `arboard`.
    ///
    /// A fresh handle is opened per call; on X11 a long-lived handle would
    /// keep ownership of the selection after the process stops caring.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SystemClipboard;

    impl SystemClipboard {
        fn open() -> Result<arboard::Clipboard, DocuError> {
            arboard::Clipboard::new().map_err(|e| DocuError::Clipboard(e.to_string()))
        }
    }

    impl Clipboard for SystemClipboard {
        fn write_text(&self, text: &str) -> Result<(), DocuError> {
            let mut cb = Self::open()?;
            cb.set_text(text.to_string())
                .map_err(|e| DocuError::Clipboard(e.to_string()))
        }

        fn read_image(&self) -> Result<Option<ClipboardImage>, DocuError> {
            let mut cb = Self::open()?;
            let img = match cb.get_image() {
                Ok(img) => img,
                Err(arboard::Error::ContentNotAvailable) => return Ok(None),
                Err(e) => return Err(DocuError::Clipboard(e.to_string())),
            };
            debug!("Clipboard image: {}x{}", img.width, img.height);
            let bytes = encode_png(img.width, img.height, img.bytes.into_owned())?;
            Ok(Some(ClipboardImage {
                mime: "image/png".to_string(),
                bytes,
            }))
        }
    }

    /// Encode raw RGBA pixels as PNG.
    pub(super) fn encode_png(
        width: usize,
        height: usize,
        rgba: Vec<u8>,
    ) -> Result<Vec<u8>, DocuError> {
        let buffer = RgbaImage::from_raw(width as u32, height as u32, rgba).ok_or_else(|| {
            DocuError::Clipboard(format!("pixel buffer does not match {width}x{height}"))
        })?;
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(buffer)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .map_err(|e| DocuError::Clipboard(e.to_string()))?;
        Ok(out)
    }
}
