//! Splitting a progress log into entry-sized segments.
//!
//! Single pass over the lines with two states. While scanning, a delimiter
//! line opens a structured block and a `## YYYY-MM-DD` heading starts a
//! narrative entry. Inside a block every line is buffered verbatim until the
//! closing delimiter. A heading that directly follows a closed block with no
//! heading of its own joins that block, which is what makes a hybrid entry.
//!
//! A delimiter whose first non-blank line is a date heading is a Markdown
//! rule between narrative entries, not a block: the heading starts a
//! narrative entry and the rule is discarded. So is a rule left open at the
//! end of the log.

use regex::Regex;
use std::sync::LazyLock;

use roster_core::frontmatter::is_delimiter;

static DATE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^## \d{4}-\d{2}-\d{2}").expect("static regex"));

pub fn is_date_heading(line: &str) -> bool {
    DATE_HEADING.is_match(line)
}

/// Raw text of one candidate entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 1-based line the segment starts on.
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    InStructuredBlock,
}

#[derive(Default)]
struct Buffer<'a> {
    start: usize,
    lines: Vec<&'a str>,
    /// Opened with a delimiter.
    structured: bool,
    block_closed: bool,
    has_heading: bool,
}

impl<'a> Buffer<'a> {
    fn open(start: usize, first: &'a str, structured: bool) -> Self {
        Self {
            start,
            lines: vec![first],
            structured,
            block_closed: false,
            has_heading: !structured,
        }
    }

    fn accepts_heading(&self) -> bool {
        self.structured && self.block_closed && !self.has_heading
    }

    /// An open block holding nothing but its opening delimiter.
    fn is_bare_rule(&self) -> bool {
        self.structured
            && !self.block_closed
            && self.lines.iter().skip(1).all(|l| l.trim().is_empty())
    }

    fn flush(&mut self, out: &mut Vec<Segment>) {
        let buffer = std::mem::take(self);
        if buffer.is_bare_rule() || buffer.lines.iter().all(|l| l.trim().is_empty()) {
            return;
        }
        out.push(Segment {
            line: buffer.start,
            text: buffer.lines.join("\n"),
        });
    }
}

/// Split `content` into segments, in document order.
///
/// Blank-only segments are dropped. Text before the first entry becomes a
/// segment of its own; format detection decides what to do with it.
pub fn segment(content: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut state = State::Scanning;
    let mut buf = Buffer::default();

    for (i, line) in content.lines().enumerate() {
        let lineno = i + 1;
        match state {
            State::InStructuredBlock if buf.is_bare_rule() && is_date_heading(line) => {
                buf = Buffer::open(lineno, line, false);
                state = State::Scanning;
            }
            State::InStructuredBlock => {
                buf.lines.push(line);
                if is_delimiter(line) {
                    buf.block_closed = true;
                    state = State::Scanning;
                }
            }
            State::Scanning if is_delimiter(line) => {
                buf.flush(&mut out);
                buf = Buffer::open(lineno, line, true);
                state = State::InStructuredBlock;
            }
            State::Scanning if is_date_heading(line) => {
                if buf.accepts_heading() {
                    buf.lines.push(line);
                    buf.has_heading = true;
                } else {
                    buf.flush(&mut out);
                    buf = Buffer::open(lineno, line, false);
                }
            }
            State::Scanning => {
                if buf.lines.is_empty() {
                    buf.start = lineno;
                }
                buf.lines.push(line);
            }
        }
    }
    buf.flush(&mut out);
    out
}
