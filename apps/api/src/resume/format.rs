//! Inline formatter for description text.
//!
//! A light markup pass, not Markdown: `_x_` → italic, `*x*` → bold and
//! `` `x` `` → code, applied in that order. Only the first run of each
//! delimiter type on a line is converted.

use once_cell::sync::Lazy;
use regex::Regex;

static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(.+?)_").expect("valid italic regex"));
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("valid bold regex"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").expect("valid code regex"));

/// Formats `text` line by line.
pub fn format_inline(text: &str) -> String {
    text.split('\n')
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(line: &str) -> String {
    let line = ITALIC_RE.replace(line, "<i>$1</i>");
    let line = BOLD_RE.replace(&line, "<b>$1</b>");
    let line = CODE_RE.replace(&line, "<code>$1</code>");
    line.into_owned()
}
