//! Post-processing: deterministic cleanup of model output.
//!
//! The instruction text asks for no code fences and no invented image links,
//! and models still produce both now and then. Two entry points exist:
//!
//! * [`clean_text`] — strip outer fence markers and trim. Used by the result
//!   presenter on every content change, so it must be idempotent.
//! * [`sanitize_response`] — everything `clean_text` does, plus line-ending
//!   normalisation, invisible-character removal and the placeholder-image
//!   rewrite. Applied once to each raw service response.
//!
//! Table rows, blank lines and trailing spaces are left as the model wrote
//! them; the text is pasted into a word processor as-is.

use once_cell::sync::Lazy;
use regex::Regex;

/// Full cleanup of a raw service response.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, …)
/// 3. Rewrite hallucinated image links to an inline annotation
/// 4. [`clean_text`]: strip outer fences and trim, to a fixed point
pub fn sanitize_response(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = annotate_placeholder_images(&s);
    clean_text(&s)
}

/// Strip a leading fence marker (with optional language tag) and a trailing
/// fence marker, then trim surrounding whitespace.
///
/// Repeats until nothing changes, so nested wrappers (a fenced block inside
/// another) are fully unwrapped and `clean_text(clean_text(x)) == clean_text(x)`.
pub fn clean_text(input: &str) -> String {
    let mut current = input.trim().to_string();
    loop {
        let next = strip_fences(&current).trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 3: Annotate hallucinated image links ───────────────────────────────
//
// The model cannot return cropped images, yet sometimes emits `![alt](x.png)`
// pointing at nothing. Those become `*[Image: alt]*`, matching the bracketed
// annotation the instruction text asks for. Links to real absolute HTTP(S)
// URLs are kept.

static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap());

fn is_placeholder_url(url: &str) -> bool {
    let u = url.trim();
    if u.is_empty() {
        return true;
    }
    if !u.starts_with("http://") && !u.starts_with("https://") {
        return true;
    }
    let fake_domains = [
        "example.com",
        "placeholder.com",
        "via.placeholder.com",
        "dummyimage.com",
        "placehold.it",
    ];
    fake_domains.iter().any(|d| u.contains(d))
}

fn annotate_placeholder_images(input: &str) -> String {
    RE_IMAGE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let alt = caps[1].trim();
            if !is_placeholder_url(&caps[2]) {
                caps[0].to_string()
            } else if alt.is_empty() {
                String::new()
            } else {
                format!("*[Image: {}]*", alt)
            }
        })
        .to_string()
}

// ── Rule 4: Strip outer fence markers ────────────────────────────────────────

static RE_LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\A```[a-z0-9_+.-]*[ \t]*\n").unwrap());
static RE_TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n```[ \t]*\z").unwrap());

fn strip_fences(input: &str) -> String {
    let s = RE_LEADING_FENCE.replace(input, "");
    RE_TRAILING_FENCE.replace(&s, "").into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────
