// src/edit.rs
//
// What an editor host needs around the engine: find the paragraph under the
// cursor, reflow a range of lines, and report "no change" so the host can
// skip a no-op edit.

use std::ops::Range;

use memchr::memchr_iter;

use crate::classify::is_blank;
use crate::error::Error;
use crate::scan::{reflow, split_lines};

/// Zero-based, end-exclusive line range of the blank-line-delimited run that
/// contains `line`. `None` for blank or out-of-range lines.
pub fn paragraph_at(document: &str, line: usize) -> Option<Range<usize>> {
    let (lines, _) = split_lines(document);
    if is_blank(lines.get(line)?) {
        return None;
    }
    let start = lines[..line]
        .iter()
        .rposition(|l| is_blank(l))
        .map_or(0, |p| p + 1);
    let end = lines[line..]
        .iter()
        .position(|l| is_blank(l))
        .map_or(lines.len(), |p| line + p);
    Some(start..end)
}

/// Byte offset where each line starts, plus the document length.
fn line_offsets(document: &str) -> Vec<usize> {
    if document.is_empty() {
        return vec![0];
    }
    let len = document.len();
    let mut offsets = vec![0];
    offsets.extend(
        memchr_iter(b'\n', document.as_bytes())
            .map(|nl| nl + 1)
            .filter(|&start| start < len),
    );
    offsets.push(len);
    offsets
}

/// Reflow only `lines` (zero-based, end-exclusive) of `document`.
///
/// Everything outside the range is copied byte for byte. Returns `Ok(None)`
/// when the range is already in shape.
pub fn reflow_lines(document: &str, lines: Range<usize>, width: usize) -> Result<Option<String>, Error> {
    let offsets = line_offsets(document);
    let line_count = offsets.len() - 1;
    if lines.start >= lines.end || lines.end > line_count {
        return Err(Error::LineRange {
            start: lines.start,
            end: lines.end,
            line_count,
        });
    }

    let (from, to) = (offsets[lines.start], offsets[lines.end]);
    let selection = &document[from..to];
    let reflowed = reflow(selection, width);
    if reflowed == selection {
        return Ok(None);
    }

    let mut out = String::with_capacity(document.len() + reflowed.len());
    out.push_str(&document[..from]);
    out.push_str(&reflowed);
    out.push_str(&document[to..]);
    Ok(Some(out))
}

/// Reflow the paragraph containing `line`; `Ok(None)` if there is nothing
/// to do there.
pub fn reflow_paragraph_at(document: &str, line: usize, width: usize) -> Result<Option<String>, Error> {
    match paragraph_at(document, line) {
        Some(range) => reflow_lines(document, range, width),
        None => Ok(None),
    }
}
