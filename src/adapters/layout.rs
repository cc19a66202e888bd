//! Line-oriented placement shared by every grammar: where a block of new lines
//! goes, how it is indented, and which span of the result it occupies.

use crate::core::error::FixError;
use crate::model::TextSpan;

// Line searches work on bytes: `\n` never occurs inside a multibyte character,
// so the offsets they return are always character boundaries.

pub fn line_start(text: &str, offset: usize) -> usize {
    let bytes = text.as_bytes();
    bytes[..offset.min(bytes.len())]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1)
}

pub fn line_end(text: &str, offset: usize) -> usize {
    let bytes = text.as_bytes();
    let offset = offset.min(bytes.len());
    bytes[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |i| offset + i)
}

fn blank(text: &str, start: usize, end: usize) -> Option<bool> {
    text.get(start..end).map(|s| s.trim().is_empty())
}

/// Leading spaces and tabs of the line containing `offset`.
pub fn indentation_at(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    let line = text.get(start..line_end(text, start)).unwrap_or_default();
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

fn only_whitespace_before(text: &str, offset: usize) -> Option<bool> {
    blank(text, line_start(text, offset), offset)
}

/// Prefixes each line with `indent` and terminates it with a newline.
/// Empty lines stay empty.
pub fn indent_lines(lines: &[String], indent: &str) -> String {
    let mut out = String::new();
    for line in lines {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

fn misplaced(what: &str, offset: usize) -> FixError {
    FixError::Realization(format!("{} at {} is not on a character boundary", what, offset))
}

/// Text splice together with the span the placed lines occupy afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub span: TextSpan,
    pub replacement: String,
    pub node_span: TextSpan,
}

impl Placement {
    fn new(span: TextSpan, lead: &str, block: &str, indent: &str, trail: &str) -> Self {
        let block_start = span.start + lead.len();
        Self {
            span,
            replacement: format!("{}{}{}", lead, block, trail),
            node_span: TextSpan::new(block_start + indent.len(), block_start + block.len() - 1),
        }
    }
}

/// Places `lines` as the last entries of a block closed by the token at `closer`,
/// one `unit` deeper than the closer's line. `separate` adds a blank line first.
pub fn before_closer(
    text: &str,
    closer: usize,
    unit: &str,
    lines: &[String],
    separate: bool,
) -> Result<Placement, FixError> {
    if lines.is_empty() {
        return Err(FixError::Realization("nothing to insert".to_string()));
    }
    let base = indentation_at(text, closer);
    let indent = format!("{}{}", base, unit);
    let block = indent_lines(lines, &indent);

    let before = text.get(..closer).ok_or_else(|| misplaced("closing token", closer))?;
    if only_whitespace_before(text, closer).unwrap_or(false) {
        let at = line_start(text, closer);
        let lead = if separate { "\n" } else { "" };
        Ok(Placement::new(TextSpan::empty(at), lead, &block, &indent, ""))
    } else {
        // closer shares its line with other tokens, e.g. `class C { }`
        let at = before.trim_end_matches([' ', '\t']).len();
        Ok(Placement::new(
            TextSpan::new(at, closer),
            "\n",
            &block,
            &indent,
            base,
        ))
    }
}

/// Places `lines` right after the body opener ending at `anchor`, one `unit`
/// deeper than `base`, the indentation of the line the body owner starts on.
pub fn after_opener(
    text: &str,
    anchor: usize,
    base: &str,
    unit: &str,
    lines: &[String],
) -> Result<Placement, FixError> {
    if lines.is_empty() {
        return Err(FixError::Realization("nothing to insert".to_string()));
    }
    let indent = format!("{}{}", base, unit);
    let block = indent_lines(lines, &indent);
    let end = line_end(text, anchor);
    let rest = text
        .get(anchor..end)
        .ok_or_else(|| misplaced("body opener", anchor))?;

    if rest.trim().is_empty() {
        if end == text.len() {
            return Err(FixError::Realization(
                "body opener is on the last line".to_string(),
            ));
        }
        Ok(Placement::new(TextSpan::empty(end + 1), "", &block, &indent, ""))
    } else {
        // body continues on the opener's line, e.g. `{ return x; }`
        let content = anchor + (rest.len() - rest.trim_start().len());
        Ok(Placement::new(
            TextSpan::new(anchor, content),
            "\n",
            &block,
            &indent,
            &indent,
        ))
    }
}

/// The range to delete for a node: whole lines when the node is alone on them,
/// otherwise just the node.
pub fn removal_span(text: &str, span: TextSpan) -> TextSpan {
    let start = line_start(text, span.start);
    let end = line_end(text, span.end);
    let alone = blank(text, start, span.start) == Some(true) && blank(text, span.end, end) == Some(true);
    if !alone {
        return span;
    }
    if end < text.len() {
        TextSpan::new(start, end + 1)
    } else {
        TextSpan::new(start, end)
    }
}
