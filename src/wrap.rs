// src/wrap.rs
//
// Greedy line wrapper.
//
// Tokens are packed left to right. Exceptions to plain greedy packing:
//   - a URL is never split; one wider than the line gets a line of its own,
//   - any other token at least as wide as the line is cut into line-sized chunks,
//   - a closing line never ends on a word of one or two columns when that word
//     fits on the next line instead,
//   - a line never starts with a token that would read as markup at line
//     start (`*`, `2.`, `//`, `NOTE:`, ...) when the word before it can be
//     carried along,
//   - a closing line that as a whole reads as markup (`[see the note]`,
//     `then the term:: text`) hands trailing words to the next line until it
//     reads as prose again, as far as they fit.

use memchr::memmem;

use crate::classify::{char_width, classify, display_width, is_blank, Context, LineKind};

/// Continuation lines always get at least this many columns.
pub const MIN_WRAP_WIDTH: usize = 20;

/// Words this wide or narrower are not left dangling at the end of a line.
const SHORT_WORD: usize = 2;

/// Columns left for text once a hanging indent of `hang` columns is taken.
pub fn available_width(width: usize, hang: usize) -> usize {
    width.saturating_sub(hang).max(MIN_WRAP_WIDTH)
}

/// `scheme://rest`
pub fn is_url(token: &str) -> bool {
    let bytes = token.as_bytes();
    match memmem::find(bytes, b"://") {
        Some(p) if p > 0 && p + 3 < bytes.len() => bytes[p - 1].is_ascii_alphabetic(),
        _ => false,
    }
}

/// Would a line starting with `token` be read as something other than prose?
fn starts_markup(token: &str) -> bool {
    let sample = format!("{token} x");
    [sample.as_str(), token]
        .iter()
        .any(|line| classify(line, Context::CONTINUING) != LineKind::Prose)
}

#[derive(Default)]
struct Line<'t> {
    tokens: Vec<&'t str>,
    width: usize,
}

impl<'t> Line<'t> {
    fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn fits(&self, token_width: usize, avail: usize) -> bool {
        self.is_empty() || self.width + 1 + token_width <= avail
    }

    fn push(&mut self, token: &'t str, token_width: usize) {
        if !self.is_empty() {
            self.width += 1;
        }
        self.width += token_width;
        self.tokens.push(token);
    }

    fn push_front(&mut self, token: &'t str, token_width: usize) {
        if !self.is_empty() {
            self.width += 1;
        }
        self.width += token_width;
        self.tokens.insert(0, token);
    }

    fn pop(&mut self) -> Option<&'t str> {
        let token = self.tokens.pop()?;
        self.width -= display_width(token);
        if !self.is_empty() {
            self.width -= 1;
        }
        Some(token)
    }

    fn flush_into(&mut self, lines: &mut Vec<String>) {
        if !self.is_empty() {
            lines.push(self.tokens.join(" "));
        }
        *self = Line::default();
    }
}

fn reads_as_prose(line: &Line<'_>) -> bool {
    classify(&line.tokens.join(" "), Context::CONTINUING) == LineKind::Prose
}

/// Move trailing words of `closing` onto the line that `token` starts.
/// `check_closing` is off for a first line that sits behind a head.
fn carry_over<'t>(
    closing: &mut Line<'t>,
    token: &'t str,
    token_width: usize,
    avail: usize,
    check_closing: bool,
) -> Line<'t> {
    let mut next = Line::default();
    next.push(token, token_width);

    if closing.len() > 1 {
        if let Some(&last) = closing.tokens.last() {
            let w = display_width(last);
            if w <= SHORT_WORD && !is_url(last) && w + 1 + next.width <= avail {
                closing.pop();
                next.push_front(last, w);
            }
        }
    }

    while closing.len() > 1
        && (starts_markup(next.tokens[0]) || (check_closing && !reads_as_prose(closing)))
    {
        let Some(&prev) = closing.tokens.last() else {
            break;
        };
        let w = display_width(prev);
        if w + 1 + next.width > avail {
            break;
        }
        closing.pop();
        next.push_front(prev, w);
    }
    next
}

/// Cut `token` into pieces at most `avail` columns wide.
fn split_long(token: &str, avail: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut width = 0usize;
    for (i, ch) in token.char_indices() {
        let w = char_width(ch);
        if width + w > avail && i > start {
            chunks.push(&token[start..i]);
            start = i;
            width = 0;
        }
        width += w;
    }
    chunks.push(&token[start..]);
    chunks
}

/// Pack `tokens` into lines of at most `avail` columns.
pub fn wrap(tokens: &[&str], avail: usize) -> Vec<String> {
    fill(tokens, avail, false)
}

/// `headed`: the first line will follow a list marker or label, so what it
/// reads as on its own does not matter.
fn fill(tokens: &[&str], avail: usize, headed: bool) -> Vec<String> {
    let avail = avail.max(1);
    let mut lines = Vec::new();
    let mut cur = Line::default();

    for &token in tokens {
        let token_width = display_width(token);
        let url = is_url(token);

        if url && token_width > avail {
            cur.flush_into(&mut lines);
            lines.push(token.to_string());
            continue;
        }

        if !url && token_width >= avail {
            cur.flush_into(&mut lines);
            let mut chunks = split_long(token, avail);
            let last = chunks.pop().unwrap_or_default();
            lines.extend(chunks.into_iter().map(str::to_string));
            let last_width = display_width(last);
            if last_width >= avail {
                lines.push(last.to_string());
            } else {
                cur.push(last, last_width);
            }
            continue;
        }

        if cur.fits(token_width, avail) {
            cur.push(token, token_width);
            continue;
        }

        let check_closing = !(headed && lines.is_empty());
        let next = carry_over(&mut cur, token, token_width, avail, check_closing);
        cur.flush_into(&mut lines);
        cur = next;
    }

    cur.flush_into(&mut lines);
    lines
}

/// Wrap `tokens` behind `head`, indenting every later line with `prefix`.
/// Text gets `width` minus the prefix width, but never less than
/// [`MIN_WRAP_WIDTH`] columns.
pub fn hang(head: &str, prefix: &str, tokens: &[&str], width: usize) -> Vec<String> {
    let avail = available_width(width, display_width(prefix));
    fill(tokens, avail, !is_blank(head))
        .into_iter()
        .enumerate()
        .map(|(n, body)| {
            let lead = if n == 0 { head } else { prefix };
            let mut line = String::with_capacity(lead.len() + body.len());
            line.push_str(lead);
            line.push_str(&body);
            line
        })
        .collect()
}
