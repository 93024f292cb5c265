//! Deterministic text layout rules.
//!
//! Nothing here measures glyphs. Titles are wrapped by character count and
//! content lines are stacked with a fixed advance, so a given input always
//! produces the same deck regardless of which fonts are installed.

use crate::design::H;

/// Soft character budget per cover-title line.
pub const TITLE_LINE_CHARS: usize = 25;
/// Maximum number of cover-title lines.
pub const TITLE_MAX_LINES: usize = 4;
/// Preview text on the cover is cut to this many characters.
pub const PREVIEW_CHARS: usize = 120;
/// Content lines longer than this get a smaller font and a taller advance.
pub const LONG_LINE_CHARS: usize = 200;
/// Slide titles longer than this get the smaller title size.
pub const LONG_SLIDE_TITLE_CHARS: usize = 60;

/// Content cursor start without / with a slide title.
pub const CONTENT_START: f64 = 2.5;
pub const CONTENT_START_WITH_TITLE: f64 = 2.3;

/// Once the cursor passes this, no further lines are placed.
pub const CONTENT_LIMIT: f64 = H - 2.5;

/// Split a cover title into at most four uppercase lines.
///
/// Words are packed greedily; a word moves to a new line when appending it
/// would push the current line past [`TITLE_LINE_CHARS`]. A single word longer
/// than the budget gets a line to itself. When more than four lines result,
/// neighbouring lines are merged in pairs and only the first four kept, so
/// very long titles lose their tail.
///
/// A blank title yields a single empty line.
pub fn split_title(title: &str) -> Vec<String> {
    let upper = title.to_uppercase();
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in upper.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if candidate_len > TITLE_LINE_CHARS && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        return vec![String::new()];
    }

    if lines.len() > TITLE_MAX_LINES {
        return lines
            .chunks(2)
            .map(|pair| pair.join(" "))
            .take(TITLE_MAX_LINES)
            .collect();
    }

    lines
}

/// Cover title point size: smaller once the title needs all four lines.
pub fn cover_title_font_size(line_count: usize) -> f64 {
    if line_count > 3 {
        60.0
    } else {
        72.0
    }
}

/// Content-slide title point size.
pub fn slide_title_font_size(title: &str) -> f64 {
    if title.chars().count() > LONG_SLIDE_TITLE_CHARS {
        28.0
    } else {
        32.0
    }
}

/// Cut `text` to `limit` characters, ending in `...` when shortened.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
pub fn truncate_text(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Display label for an editorial pillar id.
pub fn pillar_label(pillar: Option<&str>) -> &'static str {
    match pillar {
        Some("pillar_01") => "GROWTH LOOPS",
        Some("pillar_02") => "MEASUREMENT GAP",
        Some("pillar_03") => "THINKING LAYER",
        _ => "ANALYSIS",
    }
}

/// A content line with its vertical position and size.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine<'a> {
    pub text: &'a str,
    /// Top edge in inches.
    pub y: f64,
    pub font_size: f64,
    /// Cursor advance after this line, in inches.
    pub advance: f64,
}

/// Stack content lines from `start_y`, stopping once the cursor passes
/// [`CONTENT_LIMIT`].
///
/// The check happens after a line is placed, so the line that crosses the
/// limit is kept and everything after it dropped.
pub fn plan_content_lines(lines: &[String], start_y: f64) -> Vec<PlacedLine<'_>> {
    let mut placed = Vec::with_capacity(lines.len());
    let mut y = start_y;

    for line in lines {
        let long = line.chars().count() > LONG_LINE_CHARS;
        let (font_size, advance) = if long { (18.0, 0.8) } else { (20.0, 0.7) };

        placed.push(PlacedLine {
            text: line,
            y,
            font_size,
            advance,
        });

        y += advance;
        if y > CONTENT_LIMIT {
            break;
        }
    }

    placed
}
