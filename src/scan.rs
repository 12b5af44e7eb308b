// src/scan.rs
//
// The single forward pass. Each step takes the scan state and the line under
// the cursor, appends output, and returns where the cursor goes next (list
// items may consume several lines at once). State lives in one `Scan` value
// built fresh per call; nothing is shared between calls.

use log::{debug, trace};
use memchr::memchr_iter;

use crate::block::BlockState;
use crate::classify::{self, classify, Context, LineKind};
use crate::collect::{collect_list_item, Paragraph};

/// Reflow `document` so prose paragraphs fit in `width` columns.
///
/// Lines are split on `\n` or `\r\n`; output uses `\n` and ends with a
/// newline exactly when the input did. Never fails: unterminated blocks run
/// verbatim to the end of the document.
pub fn reflow(document: &str, width: usize) -> String {
    if document.is_empty() {
        return String::new();
    }
    let (lines, terminated) = split_lines(document);

    let mut scan = Scan::new(width, document.len());
    let mut cursor = 0usize;
    while cursor < lines.len() {
        cursor = scan.step(&lines, cursor);
    }
    let mut out = scan.finish();
    if !terminated {
        out.pop();
    }

    debug!(
        "reflowed {} lines at width {width} ({} -> {} bytes)",
        lines.len(),
        document.len(),
        out.len()
    );
    out
}

/// Split on `\n`, dropping a trailing `\r` from each line. The flag tells
/// whether the document ended with a line terminator.
pub(crate) fn split_lines(document: &str) -> (Vec<&str>, bool) {
    let mut lines = Vec::new();
    let mut start = 0usize;
    for nl in memchr_iter(b'\n', document.as_bytes()) {
        lines.push(strip_cr(&document[start..nl]));
        start = nl + 1;
    }
    let terminated = start == document.len();
    if !terminated {
        lines.push(strip_cr(&document[start..]));
    }
    (lines, terminated)
}

#[inline]
fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

struct Scan<'a> {
    width: usize,
    mode: BlockState,
    /// Inside a literal paragraph; lasts until the next blank line.
    literal: bool,
    paragraph: Paragraph<'a>,
    out: String,
}

impl<'a> Scan<'a> {
    fn new(width: usize, capacity: usize) -> Self {
        Scan {
            width,
            mode: BlockState::None,
            literal: false,
            paragraph: Paragraph::default(),
            out: String::with_capacity(capacity + capacity / 20 + 64),
        }
    }

    fn emit(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn emit_all(&mut self, lines: Vec<String>) {
        for line in lines {
            self.emit(&line);
        }
    }

    fn flush(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let paragraph = self.paragraph.take();
        let rendered = paragraph.render(self.width);
        self.emit_all(rendered);
    }

    /// Process `lines[i]` and return the index of the next unprocessed line.
    fn step(&mut self, lines: &[&'a str], i: usize) -> usize {
        let line = lines[i];

        if self.mode.is_active() {
            self.mode = self.mode.step(line);
            if !self.mode.is_active() {
                trace!("line {}: block closed", i + 1);
            }
            self.emit(line);
            return i + 1;
        }

        if self.literal {
            self.literal = !classify::is_blank(line);
            self.emit(line);
            return i + 1;
        }

        let cx = Context {
            paragraph_open: !self.paragraph.is_empty(),
        };
        match classify(line, cx) {
            LineKind::Prose => self.paragraph.push(line),
            // an admonition's own hanging indent reads as indented code
            LineKind::IndentedCode if self.paragraph.is_admonition() => self.paragraph.push(line),
            LineKind::Admonition => {
                self.flush();
                self.paragraph.start_admonition(line);
            }
            LineKind::LiteralParagraphStart => {
                self.literal = true;
                self.emit(line);
            }
            LineKind::ListItemStart | LineKind::DefListItemStart => {
                self.flush();
                if let Some((item, next)) = collect_list_item(lines, i) {
                    let rendered = item.render(self.width);
                    self.emit_all(rendered);
                    return next;
                }
                self.emit(line);
            }
            kind => {
                self.flush();
                if let Some(mode) = BlockState::enter(kind) {
                    trace!("line {}: entering {mode:?}", i + 1);
                    self.mode = mode;
                }
                self.emit(line);
            }
        }
        i + 1
    }

    fn finish(mut self) -> String {
        self.flush();
        if self.mode.is_active() {
            debug!("document ended inside {:?}; remainder kept verbatim", self.mode);
        }
        self.out
    }
}
