//! Task-line metadata tokens.
//!
//! Task lines carry trailing annotations after the display text: priority
//! glyphs, emoji date fields, tags, a completion-action payload and
//! dataview-style `[key:: value]` fields. This module recognizes and strips
//! those tokens so that two renderings of the same task can be compared by
//! their "core text" alone, and so copies made by the archive/duplicate
//! actions can drop annotations that no longer apply.

/// Glyph introducing an inline onCompletion payload.
pub const ON_COMPLETION_GLYPH: &str = "\u{1F3C1}"; // 🏁

/// Completion date glyph (`✅ 2025-01-31`).
pub const COMPLETED_GLYPH: &str = "\u{2705}";

/// Scheduled date glyph (`⏳ 2025-01-31`).
pub const SCHEDULED_GLYPH: &str = "\u{23F3}";

/// Due date glyph.
pub const DUE_GLYPH: &str = "\u{1F4C5}";

/// Start date glyph.
pub const START_GLYPH: &str = "\u{1F6EB}";

/// Created date glyph.
pub const CREATED_GLYPH: &str = "\u{2795}";

/// Cancelled date glyph.
pub const CANCELLED_GLYPH: &str = "\u{274C}";

/// Glyphs that take a `YYYY-MM-DD` argument.
const DATE_GLYPHS: [&str; 6] = [
    COMPLETED_GLYPH,
    SCHEDULED_GLYPH,
    DUE_GLYPH,
    START_GLYPH,
    CREATED_GLYPH,
    CANCELLED_GLYPH,
];

/// Standalone priority glyphs.
const PRIORITY_GLYPHS: [&str; 6] = [
    "\u{1F53A}", // 🔺 highest
    "\u{23EB}",  // ⏫ high
    "\u{1F53C}", // 🔼 medium
    "\u{1F53D}", // 🔽 low
    "\u{23EC}",  // ⏬ lowest
    "\u{1F51F}",
];

/// A parsed checkbox line: leading indentation, list bullet, status marker
/// and the text after the checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxLine<'a> {
    pub indent: &'a str,
    pub bullet: char,
    pub status: char,
    pub rest: &'a str,
}

/// Split a task line into its checkbox parts.
///
/// Recognizes `- [ ] text`, `* [x] text` and `+ [/] text` with arbitrary
/// leading whitespace. Returns `None` for anything that is not a checkbox
/// line (headings, plain text, blank lines).
pub fn parse_checkbox_line(line: &str) -> Option<CheckboxLine<'_>> {
    let trimmed_start = line.trim_start();
    let indent_len = line.len() - trimmed_start.len();
    let indent = &line[..indent_len];

    let mut chars = trimmed_start.chars();
    let bullet = chars.next()?;
    if !matches!(bullet, '-' | '*' | '+') {
        return None;
    }
    let after_bullet = chars.as_str();
    let after_bullet = after_bullet.strip_prefix(' ')?;
    let after_open = after_bullet.strip_prefix('[')?;
    let mut box_chars = after_open.chars();
    let status = box_chars.next()?;
    let after_status = box_chars.as_str();
    let after_close = after_status.strip_prefix(']')?;
    let rest = after_close.strip_prefix(' ').unwrap_or(after_close);
    Some(CheckboxLine {
        indent,
        bullet,
        status,
        rest,
    })
}

/// Rebuild a checkbox line with a different status marker, leaving
/// indentation, bullet and text untouched. Non-checkbox lines pass through.
pub fn with_status(line: &str, status: char) -> String {
    match parse_checkbox_line(line) {
        Some(parts) => format!(
            "{}{} [{}] {}",
            parts.indent, parts.bullet, status, parts.rest
        ),
        None => line.to_string(),
    }
}

/// True if the status marker counts as completed.
pub fn is_completed_marker(status: char) -> bool {
    matches!(status, 'x' | 'X')
}

fn is_date_like(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
}

fn is_tag_token(token: &str) -> bool {
    let Some(rest) = token.strip_prefix('#') else {
        return false;
    };
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '/'))
}

fn is_bracket_priority(token: &str) -> bool {
    token.len() == 4 && token.starts_with("[#") && token.ends_with(']')
}

/// Remove an inline onCompletion payload (`🏁 ...` to end of text) and any
/// dataview `[onCompletion:: ...]` field.
pub fn strip_on_completion(text: &str) -> String {
    let mut out = match text.find(ON_COMPLETION_GLYPH) {
        Some(pos) => text[..pos].to_string(),
        None => text.to_string(),
    };
    out = strip_bracket_field(&out, "onCompletion");
    out.trim_end().to_string()
}

/// Remove a specific dataview `[key:: value]` field wherever it appears.
fn strip_bracket_field(text: &str, key: &str) -> String {
    let needle = format!("[{}::", key);
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(&needle) {
        out.push_str(&rest[..start]);
        match rest[start..].find(']') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Remove a glyph-dated annotation (`✅ 2025-01-31` style) wherever it
/// appears, tolerating a missing date argument.
pub fn strip_date_annotation(text: &str, glyph: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(glyph) {
        out.push_str(rest[..start].trim_end());
        let after = &rest[start + glyph.len()..];
        let after = after.trim_start();
        // Swallow the date argument if one follows.
        let token_end = after
            .find(char::is_whitespace)
            .unwrap_or(after.len());
        if is_date_like(&after[..token_end]) {
            rest = &after[token_end..];
        } else {
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

/// Strip all recognized trailing metadata tokens from a task's display text.
///
/// The result is the "core text" used for content-based matching in Canvas
/// nodes: the same task re-rendered with reordered or edited metadata still
/// reduces to the same core. The input should already have its checkbox
/// prefix removed.
pub fn core_text(text: &str) -> String {
    // The onCompletion payload may contain spaces or JSON, so it cannot be
    // stripped token-by-token from the end.
    let mut work = strip_on_completion(text);

    loop {
        let trimmed = work.trim_end();
        if trimmed.is_empty() {
            break;
        }

        // Dataview fields may contain spaces, so handle a trailing bracket
        // before whitespace tokenization.
        if trimmed.ends_with(']') {
            if let Some(open) = trimmed.rfind('[') {
                let field = &trimmed[open..];
                if field.contains("::") || is_bracket_priority(field) {
                    work = trimmed[..open].to_string();
                    continue;
                }
            }
        }

        let Some(last_start) = trimmed.rfind(char::is_whitespace) else {
            break;
        };
        let token = trimmed[last_start..].trim_start();
        let head = &trimmed[..last_start];

        let strip = if token.is_empty() {
            false
        } else if is_tag_token(token) || is_bracket_priority(token) {
            true
        } else if PRIORITY_GLYPHS.contains(&token) || DATE_GLYPHS.contains(&token) {
            true
        } else if is_date_like(token) {
            // A bare date only counts as metadata when a date glyph precedes it.
            DATE_GLYPHS
                .iter()
                .any(|glyph| head.trim_end().ends_with(glyph))
        } else {
            false
        };

        if !strip {
            break;
        }
        work = head.to_string();
    }

    work.trim().to_string()
}

/// Core text of a full task line (checkbox prefix stripped first).
pub fn core_text_of_line(line: &str) -> String {
    match parse_checkbox_line(line) {
        Some(parts) => core_text(parts.rest),
        None => core_text(line.trim()),
    }
}
