//! User-facing strings, one table per supported locale.
//!
//! Library diagnostics (`Display` on [`crate::error::DocuError`], tracing
//! output) stay in English. Everything an end user reads in a banner, an
//! alert or the result pane goes through this module instead, so a new
//! locale is one more match arm per function.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used for user-facing messages. Default: English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    English,
    Vietnamese,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "vi" | "vietnamese" => Ok(Locale::Vietnamese),
            other => Err(format!("unknown locale '{other}' (expected: en, vi)")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::English => "en",
            Locale::Vietnamese => "vi",
        })
    }
}

/// Substituted for the result when the service answers with no text.
pub fn empty_extraction(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Cannot extract text from this document.",
        Locale::Vietnamese => "Không thể trích xuất văn bản từ tài liệu này.",
    }
}

/// Generic banner for any extraction-service failure.
pub fn service_failed(locale: Locale) -> &'static str {
    match locale {
        Locale::English => {
            "Something went wrong while processing the document. Please check the file or try again later."
        }
        Locale::Vietnamese => {
            "Đã có lỗi xảy ra khi xử lý tài liệu. Vui lòng kiểm tra lại file hoặc thử lại sau."
        }
    }
}

pub fn unsupported_file_type(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Only PDF files and images (PNG, JPG, WEBP, HEIC) are supported.",
        Locale::Vietnamese => "Chỉ hỗ trợ file PDF và file ảnh (PNG, JPG, WEBP, HEIC).",
    }
}

pub fn file_too_large(locale: Locale, max_bytes: u64) -> String {
    let mb = max_bytes as f64 / (1024.0 * 1024.0);
    match locale {
        Locale::English => format!("The file is too large (limit: {mb:.1} MB)."),
        Locale::Vietnamese => format!("File quá lớn (giới hạn: {mb:.1} MB)."),
    }
}

pub fn file_unreadable(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "The file could not be opened. Check that it exists and is readable.",
        Locale::Vietnamese => "Không thể mở file. Hãy kiểm tra file có tồn tại và có quyền đọc.",
    }
}

pub fn download_failed(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "Cannot download the image from this link.",
        Locale::Vietnamese => "Không thể tải ảnh từ đường dẫn này.",
    }
}

pub fn not_an_image(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "This URL is not a valid image file.",
        Locale::Vietnamese => "URL này không phải là file ảnh hợp lệ.",
    }
}

pub fn fetch_blocked(locale: Locale) -> &'static str {
    match locale {
        Locale::English => {
            "Cannot load the image from this link (access may be blocked by the remote site)."
        }
        Locale::Vietnamese => {
            "Không thể tải ảnh từ link này (có thể do chặn quyền truy cập/CORS)."
        }
    }
}

/// Remediation appended to every remote-fetch failure.
pub fn paste_hint(locale: Locale) -> &'static str {
    match locale {
        Locale::English => {
            "Tip: open the image, choose 'Copy Image', then paste it here (docuconvert --paste)."
        }
        Locale::Vietnamese => {
            "Mẹo: Hãy mở ảnh đó ra, chọn 'Sao chép hình ảnh' (Copy Image) rồi dán vào đây (docuconvert --paste)."
        }
    }
}

pub fn conversion_in_progress(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "A conversion is already running. Wait for it to finish.",
        Locale::Vietnamese => "Đang có một tác vụ chuyển đổi. Vui lòng chờ hoàn tất.",
    }
}

pub fn provider_missing(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "The extraction service is not configured (missing or invalid API key).",
        Locale::Vietnamese => "Dịch vụ trích xuất chưa được cấu hình (thiếu hoặc sai API key).",
    }
}

pub fn clipboard_empty(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "The clipboard does not contain an image.",
        Locale::Vietnamese => "Bộ nhớ tạm không chứa hình ảnh.",
    }
}

pub fn output_write_failed(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "The result could not be saved. Check the destination folder and free space.",
        Locale::Vietnamese => "Không thể lưu kết quả. Hãy kiểm tra thư mục đích và dung lượng trống.",
    }
}

pub fn clipboard_failed(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "The clipboard is not available right now.",
        Locale::Vietnamese => "Không thể truy cập bộ nhớ tạm lúc này.",
    }
}

pub fn invalid_settings(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "The conversion settings are invalid. Run with --help to see the accepted values.",
        Locale::Vietnamese => "Cấu hình chuyển đổi không hợp lệ. Chạy với --help để xem các giá trị hợp lệ.",
    }
}

pub fn unknown_error(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "An unknown error occurred.",
        Locale::Vietnamese => "Đã có lỗi không xác định.",
    }
}

/// Shown by the result pane while there is nothing to display.
pub fn result_placeholder(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "The conversion result will appear here.",
        Locale::Vietnamese => "Kết quả chuyển đổi sẽ hiển thị tại đây",
    }
}

pub fn copied(locale: Locale) -> &'static str {
    match locale {
        Locale::English => "COPIED",
        Locale::Vietnamese => "ĐÃ COPY",
    }
}
