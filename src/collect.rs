// src/collect.rs
//
// Paragraph and list-item collection.
//
// A Paragraph buffers contiguous prose lines until something structural shows
// up. A ListItem is gathered in one go by `collect_list_item`, which looks
// ahead from the item head and hands back the index where the caller resumes.
// Items that contain nested items, a `+` continuation or indented code are
// "complex" and come out verbatim; everything else is re-wrapped under a
// hanging indent.
//
// A re-wrapped unit is only emitted if a second pass would collect it back
// into the same unit and wrap it the same way. Otherwise (a wrapped line reads
// as a definition term, a heading, ...) the source lines are kept as they are.

use log::trace;

use crate::classify::{self, classify, has_hard_break, Context, ListHead, LineKind};
use crate::wrap;

/* =============================== Paragraphs ============================== */

#[derive(Debug, Default)]
pub struct Paragraph<'a> {
    lines: Vec<&'a str>,
    /// (label, first body fragment) when opened by `NOTE:` and friends.
    admonition: Option<(&'a str, &'a str)>,
}

impl<'a> Paragraph<'a> {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_admonition(&self) -> bool {
        self.admonition.is_some()
    }

    pub fn push(&mut self, line: &'a str) {
        self.lines.push(line);
    }

    /// Start a fresh paragraph headed by an admonition line.
    pub fn start_admonition(&mut self, line: &'a str) {
        self.lines.clear();
        self.admonition = classify::parse_admonition(line);
        self.lines.push(line);
    }

    /// Empty the buffer, returning the paragraph it held.
    pub fn take(&mut self) -> Paragraph<'a> {
        std::mem::take(self)
    }

    pub fn render(&self, width: usize) -> Vec<String> {
        let wrapped = self.rewrap(width);
        if wrapped == self.lines || self.settles(&wrapped, width) {
            return wrapped;
        }
        trace!("paragraph would not survive a second pass; kept as is");
        self.verbatim()
    }

    /// Does `rendered` come back as one paragraph that wraps to itself?
    fn settles(&self, rendered: &[String], width: usize) -> bool {
        let Some((first, rest)) = rendered.split_first() else {
            return false;
        };
        if classify(first, Context::FRESH) != classify(self.lines[0], Context::FRESH) {
            return false;
        }
        let absorbed = |kind: LineKind| {
            kind == LineKind::Prose || (kind == LineKind::IndentedCode && self.is_admonition())
        };
        if !rest.iter().all(|l| absorbed(classify(l, Context::CONTINUING))) {
            return false;
        }

        let mut again = Paragraph::default();
        if self.is_admonition() {
            again.start_admonition(first);
        } else {
            again.push(first);
        }
        rest.iter().for_each(|l| again.push(l));
        again.rewrap(width) == rendered
    }

    fn rewrap(&self, width: usize) -> Vec<String> {
        if self.lines.is_empty() {
            return Vec::new();
        }
        if self.lines.iter().any(|line| has_hard_break(line)) {
            trace!("paragraph with hard breaks kept as is ({} lines)", self.lines.len());
            return self.verbatim();
        }
        match self.admonition {
            Some((label, first)) => {
                let head = format!("{label}: ");
                let prefix = " ".repeat(classify::display_width(&head));
                let tokens: Vec<&str> = first
                    .split_whitespace()
                    .chain(self.lines[1..].iter().flat_map(|l| l.split_whitespace()))
                    .collect();
                wrap::hang(&head, &prefix, &tokens, width)
            }
            None => {
                let first = self.lines[0];
                let indent = &first[..classify::indent_len(first)];
                let tokens: Vec<&str> = self
                    .lines
                    .iter()
                    .flat_map(|l| l.split_whitespace())
                    .collect();
                wrap::hang(indent, indent, &tokens, width)
            }
        }
    }

    fn verbatim(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.to_string()).collect()
    }
}

/* =============================== List items ============================== */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem<'a> {
    pub head: ListHead<'a>,
    /// Every source line the item consumed, head line first.
    pub lines: Vec<&'a str>,
    /// Plain continuation lines (wrapped along with the head text).
    pub body: Vec<&'a str>,
    pub complex: bool,
}

/// Gather the list or definition-list item starting at `lines[start]`.
///
/// Returns the item and the index of the first line it did not consume, or
/// `None` when `lines[start]` is not an item head. Nested sub-items are
/// absorbed iteratively; nothing here recurses.
pub fn collect_list_item<'a>(lines: &[&'a str], start: usize) -> Option<(ListItem<'a>, usize)> {
    let first = *lines.get(start)?;
    let head = classify::parse_item(first)?;
    let mut item = ListItem {
        head,
        lines: vec![first],
        body: Vec::new(),
        complex: false,
    };

    let mut next = start + 1;
    while let Some(&line) = lines.get(next) {
        let kind = classify(line, Context::CONTINUING);
        if kind.ends_list_item() {
            break;
        }
        match kind {
            LineKind::ContinuationMarker => {
                item.lines.push(line);
                item.complex = true;
                next += 1;
                break;
            }
            LineKind::ListItemStart | LineKind::DefListItemStart => {
                let nested = classify::parse_item(line).is_some_and(|h| item.head.is_parent_of(&h));
                if !nested {
                    break;
                }
                item.lines.push(line);
                item.complex = true;
            }
            LineKind::IndentedCode => {
                item.lines.push(line);
                item.complex = true;
            }
            _ => {
                item.lines.push(line);
                item.body.push(line);
            }
        }
        next += 1;
    }

    trace!(
        "list item `{}` spans {} lines, complex: {}",
        item.head.marker,
        item.lines.len(),
        item.complex
    );
    Some((item, next))
}

impl ListItem<'_> {
    pub fn render(&self, width: usize) -> Vec<String> {
        let wrapped = self.rewrap(width);
        if wrapped == self.lines || Self::settles(&wrapped, width) {
            return wrapped;
        }
        trace!("list item `{}` would not survive a second pass; kept as is", self.head.marker);
        self.verbatim()
    }

    /// Would `rendered` be collected as exactly one item that wraps to itself?
    fn settles(rendered: &[String], width: usize) -> bool {
        let lines: Vec<&str> = rendered.iter().map(String::as_str).collect();
        let starts_item = lines
            .first()
            .is_some_and(|l| classify(l, Context::CONTINUING).is_list_start());
        if !starts_item {
            return false;
        }
        match collect_list_item(&lines, 0) {
            Some((again, next)) => next == lines.len() && again.rewrap(width) == rendered,
            None => false,
        }
    }

    fn rewrap(&self, width: usize) -> Vec<String> {
        if self.complex || self.lines.iter().any(|line| has_hard_break(line)) {
            return self.verbatim();
        }
        let tokens: Vec<&str> = self
            .head
            .text
            .split_whitespace()
            .chain(self.body.iter().flat_map(|l| l.split_whitespace()))
            .collect();
        if tokens.is_empty() {
            return self.verbatim();
        }
        wrap::hang(&self.head.render(), &self.head.hanging_prefix(), &tokens, width)
    }

    fn verbatim(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.to_string()).collect()
    }
}
