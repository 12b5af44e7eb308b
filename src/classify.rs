// src/classify.rs
//
// Line classifier: raw line in, exactly one LineKind out.
//
// Categories overlap textually (`[[id]]` is also a `[...]` attribute line,
// `----` is also a run of list bullets, `NOTE:` could open a prose line), so
// the rules live in one ordered table, RULES, and the first match wins.
// Classification never looks at block state; the scanner decides whether the
// kind matters at all.

use unicode_width::UnicodeWidthChar;

/// What a single line is, judged on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    BlockTitle,
    BlockAttribute,
    Anchor,
    Conditional,
    Include,
    BlockMacro,
    TableFence,
    GenericFence,
    OpenBlockFence,
    HorizontalRule,
    PageBreak,
    Heading,
    DocumentAttribute,
    LineComment,
    CommentBlockFence,
    Admonition,
    ListItemStart,
    DefListItemStart,
    ContinuationMarker,
    IndentedCode,
    LiteralParagraphStart,
    Blank,
    Prose,
}

impl LineKind {
    /// Toggles a verbatim block on or off.
    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            LineKind::TableFence
                | LineKind::GenericFence
                | LineKind::OpenBlockFence
                | LineKind::CommentBlockFence
        )
    }

    pub fn is_list_start(self) -> bool {
        matches!(self, LineKind::ListItemStart | LineKind::DefListItemStart)
    }

    /// Lines that end list-item collection without being consumed by it.
    pub fn ends_list_item(self) -> bool {
        self.is_toggle()
            || matches!(
                self,
                LineKind::Blank
                    | LineKind::Heading
                    | LineKind::DocumentAttribute
                    | LineKind::HorizontalRule
                    | LineKind::PageBreak
                    | LineKind::BlockTitle
                    | LineKind::BlockAttribute
                    | LineKind::Anchor
                    | LineKind::Conditional
                    | LineKind::Include
                    | LineKind::BlockMacro
                    | LineKind::LineComment
            )
    }
}

/// The little the classifier needs to know about its surroundings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Context {
    /// A paragraph (or list item) is already collecting lines.
    pub paragraph_open: bool,
}

impl Context {
    pub const FRESH: Context = Context {
        paragraph_open: false,
    };
    pub const CONTINUING: Context = Context {
        paragraph_open: true,
    };
}

/* ============================== Rule table ============================== */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Guard {
    Always,
    /// Only the first line of a not-yet-started paragraph.
    FreshParagraph,
}

struct Rule {
    matches: fn(&str) -> bool,
    guard: Guard,
    kind: LineKind,
}

impl Rule {
    fn applies(&self, line: &str, cx: Context) -> bool {
        let guard_ok = match self.guard {
            Guard::Always => true,
            Guard::FreshParagraph => !cx.paragraph_open,
        };
        guard_ok && (self.matches)(line)
    }
}

const fn rule(matches: fn(&str) -> bool, kind: LineKind) -> Rule {
    Rule {
        matches,
        guard: Guard::Always,
        kind,
    }
}

/// Classification rules, highest precedence first.
const RULES: &[Rule] = &[
    rule(is_comment_block_fence, LineKind::CommentBlockFence),
    rule(is_line_comment, LineKind::LineComment),
    rule(is_anchor, LineKind::Anchor),
    rule(is_block_title, LineKind::BlockTitle),
    rule(is_block_attribute, LineKind::BlockAttribute),
    rule(is_conditional, LineKind::Conditional),
    rule(is_include, LineKind::Include),
    rule(is_block_macro, LineKind::BlockMacro),
    rule(is_horizontal_rule, LineKind::HorizontalRule),
    rule(is_page_break, LineKind::PageBreak),
    rule(is_table_fence, LineKind::TableFence),
    rule(is_generic_fence, LineKind::GenericFence),
    rule(is_open_block_fence, LineKind::OpenBlockFence),
    rule(is_heading, LineKind::Heading),
    rule(is_document_attribute, LineKind::DocumentAttribute),
    rule(is_blank, LineKind::Blank),
    Rule {
        matches: is_literal_start,
        guard: Guard::FreshParagraph,
        kind: LineKind::LiteralParagraphStart,
    },
    rule(is_admonition, LineKind::Admonition),
    rule(is_list_item_start, LineKind::ListItemStart),
    rule(is_def_item_start, LineKind::DefListItemStart),
    rule(is_continuation_marker, LineKind::ContinuationMarker),
    rule(is_indented_code, LineKind::IndentedCode),
];

/// Classify one line. Anything no rule claims is prose.
pub fn classify(line: &str, cx: Context) -> LineKind {
    RULES
        .iter()
        .find(|rule| rule.applies(line, cx))
        .map_or(LineKind::Prose, |rule| rule.kind)
}

/* ============================ Utility predicates ========================= */

#[inline]
pub(crate) fn is_space_tab(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

#[inline]
pub(crate) fn trim_ws(s: &str) -> &str {
    s.trim_matches([' ', '\t'])
}

#[inline]
pub(crate) fn trim_end_ws(s: &str) -> &str {
    s.trim_end_matches([' ', '\t'])
}

/// Byte length of the leading run of spaces and tabs.
#[inline]
pub(crate) fn indent_len(line: &str) -> usize {
    line.bytes().take_while(|&b| is_space_tab(b)).count()
}

#[inline]
fn starts_with_ws(s: &str) -> bool {
    s.starts_with([' ', '\t'])
}

/// Display columns; control characters such as tabs count as one.
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

#[inline]
pub(crate) fn char_width(c: char) -> usize {
    c.width().unwrap_or(1)
}

/* ============================ Single-line kinds ========================== */

pub(crate) fn is_comment_block_fence(line: &str) -> bool {
    trim_end_ws(line) == "////"
}

fn is_line_comment(line: &str) -> bool {
    trim_ws(line).starts_with("//") && !is_comment_block_fence(line)
}

fn is_anchor(line: &str) -> bool {
    let t = trim_ws(line);
    t.len() >= 4 && t.starts_with("[[") && t.ends_with("]]")
}

fn is_block_title(line: &str) -> bool {
    // `.Title`, but not `. text` and not a `....` fence
    let bytes = line.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'.' && !is_space_tab(bytes[1]) && bytes[1] != b'.'
}

fn is_block_attribute(line: &str) -> bool {
    let t = trim_end_ws(line);
    t.len() >= 2 && t.starts_with('[') && t.ends_with(']')
}

fn is_conditional(line: &str) -> bool {
    ["ifdef::", "ifndef::", "ifeval::", "endif::"]
        .iter()
        .any(|p| line.starts_with(p))
}

fn is_include(line: &str) -> bool {
    let Some(rest) = trim_end_ws(line).strip_prefix("include::") else {
        return false;
    };
    match rest.find('[') {
        Some(lb) => lb > 0 && rest.ends_with(']') && !rest[..lb].bytes().any(is_space_tab),
        None => false,
    }
}

#[inline]
fn is_macro_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn is_block_macro(line: &str) -> bool {
    // name::target[attrs]  or  name:[attrs]
    let t = trim_end_ws(line);
    let bytes = t.as_bytes();
    let name_len = bytes.iter().take_while(|&&b| is_macro_name_char(b)).count();
    if name_len == 0 || bytes.get(name_len) != Some(&b':') || !t.ends_with(']') {
        return false;
    }
    let rest = &t[name_len + 1..];
    if let Some(target_and_attrs) = rest.strip_prefix(':') {
        match target_and_attrs.find('[') {
            Some(lb) => !target_and_attrs[..lb].bytes().any(is_space_tab),
            None => false,
        }
    } else {
        rest.starts_with('[')
    }
}

fn is_horizontal_rule(line: &str) -> bool {
    let t = trim_ws(line);
    t.len() >= 3 && t.bytes().all(|b| b == b'\'')
}

fn is_page_break(line: &str) -> bool {
    trim_ws(line) == "<<<"
}

pub(crate) fn is_table_fence(line: &str) -> bool {
    trim_end_ws(line) == "|==="
}

/// The delimiter of a generic fence line (`----`, `====`, `....`, ...), trimmed.
pub fn fence_delimiter(line: &str) -> Option<&str> {
    let t = trim_ws(line);
    let bytes = t.as_bytes();
    let first = *bytes.first()?;
    let fence_char = matches!(first, b'.' | b'_' | b'=' | b'*' | b'+' | b'-');
    (fence_char && bytes.len() >= 4 && bytes.iter().all(|&b| b == first)).then_some(t)
}

pub(crate) fn is_generic_fence(line: &str) -> bool {
    fence_delimiter(line).is_some()
}

pub(crate) fn is_open_block_fence(line: &str) -> bool {
    trim_end_ws(line) == "--"
}

fn is_heading(line: &str) -> bool {
    let bytes = line.as_bytes();
    let level = bytes.iter().take_while(|&&b| b == b'=').count();
    level > 0 && bytes.get(level).is_some_and(|&b| is_space_tab(b))
}

fn is_document_attribute(line: &str) -> bool {
    // :name:  or  :name: value
    let Some(rest) = line.strip_prefix(':') else {
        return false;
    };
    let Some(end) = rest.find(':') else {
        return false;
    };
    let name = &rest[..end];
    let after = &rest[end + 1..];
    !name.is_empty() && !name.bytes().any(is_space_tab) && (after.is_empty() || starts_with_ws(after))
}

pub(crate) fn is_blank(line: &str) -> bool {
    trim_ws(line).is_empty()
}

fn is_literal_start(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 2 && bytes[0] == b' ' && !is_space_tab(bytes[1])
}

fn is_admonition(line: &str) -> bool {
    parse_admonition(line).is_some()
}

fn is_list_item_start(line: &str) -> bool {
    parse_list_item(line).is_some()
}

fn is_def_item_start(line: &str) -> bool {
    parse_def_item(line).is_some()
}

fn is_continuation_marker(line: &str) -> bool {
    trim_ws(line) == "+"
}

fn is_indented_code(line: &str) -> bool {
    line.starts_with('\t') || line.starts_with("    ")
}

/// A prose line ending in whitespace + `+` asks for a hard line break.
pub fn has_hard_break(line: &str) -> bool {
    let bytes = trim_end_ws(line).as_bytes();
    bytes.len() >= 2 && bytes[bytes.len() - 1] == b'+' && is_space_tab(bytes[bytes.len() - 2])
}

/* ============================ Structured heads =========================== */

pub const ADMONITION_LABELS: [&str; 5] = ["NOTE", "TIP", "IMPORTANT", "WARNING", "CAUTION"];

/// `LABEL: body` -> (`LABEL`, `body`).
pub fn parse_admonition(line: &str) -> Option<(&str, &str)> {
    ADMONITION_LABELS.iter().find_map(|label| {
        let rest = line.strip_prefix(label)?.strip_prefix(':')?;
        starts_with_ws(rest).then(|| (&line[..label.len()], trim_ws(rest)))
    })
}

const CHECKLIST_TOKENS: [&str; 4] = ["[ ]", "[x]", "[X]", "[-]"];

/// Hanging indents of checklist items never drop below this many columns.
pub const CHECKLIST_MIN_HANG: usize = 8;

/// The head of a list or definition-list item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListHead<'a> {
    pub indent: &'a str,
    /// Definition-list term, `None` for ordinary list items.
    pub term: Option<&'a str>,
    /// `*`, `**`, `1.`, `a.`, `•`, or the `::` run of a definition list.
    pub marker: &'a str,
    pub depth: usize,
    pub checklist: Option<&'a str>,
    /// First body fragment, trimmed, checklist token removed.
    pub text: &'a str,
}

impl ListHead<'_> {
    /// The head as rendered in front of the first wrapped line.
    pub fn render(&self) -> String {
        let mut head = String::with_capacity(self.indent.len() + self.marker.len() + 8);
        head.push_str(self.indent);
        if let Some(term) = self.term {
            head.push_str(term);
        }
        head.push_str(self.marker);
        head.push(' ');
        if let Some(check) = self.checklist {
            head.push_str(check);
            head.push(' ');
        }
        head
    }

    /// Prefix for every line after the first.
    pub fn hanging_prefix(&self) -> String {
        let mut hang = display_width(&self.render());
        if self.checklist.is_some() {
            hang = hang.max(CHECKLIST_MIN_HANG);
        }
        let mut prefix = String::with_capacity(hang);
        prefix.push_str(self.indent);
        let indent_width = display_width(self.indent);
        prefix.extend(std::iter::repeat(' ').take(hang.saturating_sub(indent_width)));
        prefix
    }

    /// Does `other` sit below this head in the list tree?
    pub fn is_parent_of(&self, other: &ListHead<'_>) -> bool {
        let (mine, theirs) = (self.indent.len(), other.indent.len());
        theirs > mine || (theirs == mine && other.depth > self.depth)
    }
}

/// `[indent]marker text` with marker one of `*`..`******`, `+`.., `-`..,
/// `12.`, `a.`, `•`. Uppercase letters are never markers: "M. Glushkov".
pub fn parse_list_item(line: &str) -> Option<ListHead<'_>> {
    let bytes = line.as_bytes();
    let i = indent_len(line);
    let rest = &line[i..];

    let (marker_len, depth) = if rest.starts_with('•') {
        ('•'.len_utf8(), 1)
    } else {
        match *bytes.get(i)? {
            c @ (b'*' | b'+' | b'-') => {
                let n = bytes[i..].iter().take_while(|&&b| b == c).count();
                if n > 6 {
                    return None;
                }
                (n, n)
            }
            b'0'..=b'9' => {
                let n = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
                if bytes.get(i + n) != Some(&b'.') {
                    return None;
                }
                (n + 1, 1)
            }
            b'a'..=b'z' => {
                if bytes.get(i + 1) != Some(&b'.') {
                    return None;
                }
                (2, 1)
            }
            _ => return None,
        }
    };

    let after = &rest[marker_len..];
    if !starts_with_ws(after) {
        return None;
    }
    let mut text = trim_ws(after);
    if text.is_empty() {
        return None;
    }
    let checklist = CHECKLIST_TOKENS.iter().copied().find(|tok| {
        text.strip_prefix(tok)
            .is_some_and(|r| r.is_empty() || starts_with_ws(r))
    });
    if let Some(tok) = checklist {
        text = trim_ws(&text[tok.len()..]);
    }

    Some(ListHead {
        indent: &line[..i],
        term: None,
        marker: &rest[..marker_len],
        depth,
        checklist,
        text,
    })
}

/// `[indent]term:: text`; the colon run sets the depth (`::` 1, `:::` 2).
pub fn parse_def_item(line: &str) -> Option<ListHead<'_>> {
    let i = indent_len(line);
    let rest = &line[i..];
    let sep = rest.find("::")?;
    let term = &rest[..sep];
    if trim_ws(term).is_empty() || term.contains(':') {
        return None;
    }
    let colons = rest[sep..].bytes().take_while(|&b| b == b':').count();
    let after = &rest[sep + colons..];
    if !after.is_empty() && !starts_with_ws(after) {
        return None;
    }
    Some(ListHead {
        indent: &line[..i],
        term: Some(term),
        marker: &rest[sep..sep + colons],
        depth: colons - 1,
        checklist: None,
        text: trim_ws(after),
    })
}

/// Parse whichever item head `line` carries, list markers first.
pub fn parse_item(line: &str) -> Option<ListHead<'_>> {
    parse_list_item(line).or_else(|| parse_def_item(line))
}
