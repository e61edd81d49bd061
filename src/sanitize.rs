//! # String sanitizer.
//!
//! Removes display-hostile content from logged text so it renders cleanly in
//! a monospace panel. Passes run in a fixed order because styling directives
//! are often nested inside styled strings:
//!
//! ```text
//! "\x1b[31m%cERR%c background: red; ▌x▌"
//!   1. ANSI escapes      ─► "%cERR%c background: red; ▌x▌"
//!   2. %c + CSS fragments ─► "ERR  ▌x▌"
//!   3. whitespace        ─► "ERR ▌x▌"
//!   4. banner glyphs     ─► "ERR x"
//! ```

use std::sync::LazyLock;

use regex::Regex;

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ansi pattern"));

static STYLE_DIRECTIVES: LazyLock<[Regex; 6]> = LazyLock::new(|| {
    [
        r"%c",
        r"(?i)background:\s*[^;]+;?",
        r"(?i)color:\s*[^;]+;?",
        r"(?i)border-radius:\s*[^;]+;?",
        r"(?i)light-dark\([^)]+\)",
        r"(?i)rgba?\([^)]+\)",
    ]
    .map(|p| Regex::new(p).expect("valid style pattern"))
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Glyphs reserved for the banner; stripped from logged text.
pub const BANNER_GLYPHS: [char; 2] = ['▐', '▌'];

/// Returns `input` with escape sequences, style directives, redundant
/// whitespace and banner glyphs removed. Never fails; may return `""`.
///
/// # Example
/// ```
/// assert_eq!(logpeek::sanitize("\x1b[31mRed text\x1b[0m"), "Red text");
/// ```
pub fn sanitize(input: &str) -> String {
    let mut clean = ANSI_ESCAPE.replace_all(input, "").into_owned();
    for re in STYLE_DIRECTIVES.iter() {
        clean = re.replace_all(&clean, "").into_owned();
    }
    let clean = WHITESPACE.replace_all(&clean, " ");
    clean.trim().replace(BANNER_GLYPHS, "")
}
