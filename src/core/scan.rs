//! Line-oriented function scanner for gofmt-formatted Go sources.
//!
//! This is a heuristic, not a parser:
//! - A header is a line starting with `func`, an optional parenthesised
//!   receiver, the name, a parenthesised parameter list and trailing text
//!   ending in `{` (or `{}` / `{ ... }` for one-line bodies).
//! - A parameter list left open on the `func` line continues on the next
//!   lines until the joined text forms a header (`InHeader`).
//! - A body ends at the first line that is exactly `}` at column 0.
//! - Documentation is the run of `//` lines directly above the header.
//!
//! Scanning is sequential and restarts from scratch for every query; no
//! index is kept between calls.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{instrument, trace};

use crate::core::{error::DevError, unit::SourceUnit};

/// `func (recv) Name[T any](params) trailing`; the tail is classified
/// separately so one-line bodies can be told apart from opening lines.
static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^func\s+(?:\((?<receiver>[^)]*)\)\s*)?(?<name>\w+)\s*(?:\[[^\]]*\])?\s*\([^)]*\)(?<tail>.*)$",
    )
    .expect("signature pattern is valid")
});

/// Line comment marker that makes a line part of a documentation block.
const COMMENT: &str = "//";

/// Detected function header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Receiver clause without parentheses, e.g. `t *Theme`
    pub receiver: Option<String>,
    /// Function or method name
    pub name: String,
    /// 0-based index of the (first) header line
    pub line: usize,
}

/// A function: header, documentation block and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    pub signature: FunctionSignature,
    /// Contiguous comment lines above the header, in file order
    pub documentation: Vec<String>,
    /// Header line through closing line, inclusive
    pub body: Vec<String>,
}

impl FunctionRecord {
    pub fn name(&self) -> &str {
        &self.signature.name
    }

    /// Number of lines from header to closing brace.
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// First line of the documentation block (the header if undocumented).
    pub fn doc_start(&self) -> usize {
        self.signature.line - self.documentation.len()
    }

    /// Last line of the body, inclusive.
    pub fn end_line(&self) -> usize {
        self.signature.line + self.body.len() - 1
    }

    /// `(recv)Name` for methods, `Name` otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.signature.receiver {
            Some(receiver) => format!("({receiver}){}", self.signature.name),
            None => self.signature.name.clone(),
        }
    }
}

/// How a header-shaped text ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opening {
    /// Ends in `{`; the body continues on following lines
    Block,
    /// Opens and closes on the same line
    OneLine,
}

/// Parsed header text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    receiver: Option<String>,
    name: String,
    opening: Opening,
}

impl Header {
    /// Parse a (possibly joined) header text.
    fn parse(text: &str) -> Option<Self> {
        let caps = SIGNATURE.captures(text)?;
        let tail = caps.name("tail").map_or("", |m| m.as_str()).trim_end();

        let opening = if tail.ends_with('{') {
            Opening::Block
        } else if tail.ends_with('}') && tail.contains('{') {
            Opening::OneLine
        } else {
            return None;
        };

        Some(Self {
            receiver: caps
                .name("receiver")
                .map(|m| m.as_str().trim().to_owned())
                .filter(|r| !r.is_empty()),
            name: caps["name"].to_owned(),
            opening,
        })
    }
}

/// True for a `func` line whose parameter list is still open.
fn opens_multiline_header(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("func") else {
        return false;
    };
    rest.starts_with(char::is_whitespace)
        && rest.matches('(').count() > rest.matches(')').count()
}

/// True for the column-0 closing brace that ends a body.
fn is_closing_line(line: &str) -> bool {
    line.trim_end() == "}"
}

/// Scanner states. Transitions happen line by line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Between functions, looking for a header
    Outside,
    /// Inside a multi-line parameter list that began at `start`
    InHeader { start: usize },
    /// Inside a body whose header began at `start`
    InBody { start: usize },
}

/// Lazy iterator over the functions of a slice of lines.
pub struct Scanner<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }

    fn record(&self, header: Header, start: usize, end: usize) -> FunctionRecord {
        let documentation = documentation_above(self.lines, start, Some(header.name.as_str()));
        FunctionRecord {
            signature: FunctionSignature {
                receiver: header.receiver,
                name: header.name,
                line: start,
            },
            documentation,
            body: self.lines[start..=end].to_vec(),
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = FunctionRecord;

    fn next(&mut self) -> Option<FunctionRecord> {
        let mut state = ScanState::Outside;
        let mut joined = String::new();
        let mut open: Option<Header> = None;

        while self.pos < self.lines.len() {
            let at = self.pos;
            let line = self.lines[at].as_str();
            self.pos += 1;

            match state {
                ScanState::Outside => {
                    if let Some(header) = Header::parse(line) {
                        trace!(line = at, name = %header.name, "header");
                        if header.opening == Opening::OneLine {
                            return Some(self.record(header, at, at));
                        }
                        open = Some(header);
                        state = ScanState::InBody { start: at };
                    } else if opens_multiline_header(line) {
                        joined = line.trim_end().to_owned();
                        state = ScanState::InHeader { start: at };
                    }
                }
                ScanState::InHeader { start } => {
                    if line.trim().is_empty() || is_closing_line(line) || line.starts_with("func")
                    {
                        // Not a header after all; look at this line afresh.
                        self.pos = at;
                        state = ScanState::Outside;
                        continue;
                    }
                    joined.push(' ');
                    joined.push_str(line.trim());
                    if let Some(header) = Header::parse(&joined) {
                        trace!(line = start, name = %header.name, "multi-line header");
                        if header.opening == Opening::OneLine {
                            return Some(self.record(header, start, at));
                        }
                        open = Some(header);
                        state = ScanState::InBody { start };
                    }
                }
                ScanState::InBody { start } => {
                    if is_closing_line(line) {
                        let header = open.take()?;
                        return Some(self.record(header, start, at));
                    }
                }
            }
        }

        // Unterminated body: it runs to end of file.
        match (state, open) {
            (ScanState::InBody { start }, Some(header)) => {
                Some(self.record(header, start, self.lines.len() - 1))
            }
            _ => None,
        }
    }
}

/// Scan a unit for function records, in line order.
pub fn scan(unit: &SourceUnit) -> Scanner<'_> {
    Scanner::new(&unit.lines)
}

/// The name part of a possibly receiver-qualified target such as
/// `Theme.Name` or `(t *Theme).Name`.
pub fn base_name(target: &str) -> &str {
    target
        .rsplit_once('.')
        .map_or(target, |(_, name)| name)
        .trim()
}

/// First function in `unit` whose name equals the name part of `target`.
#[instrument(level = "debug", skip(unit), fields(unit = %unit.name()))]
pub fn find_by_name(unit: &SourceUnit, target: &str) -> Result<FunctionRecord, DevError> {
    let name = base_name(target);
    scan(unit)
        .find(|record| record.name() == name)
        .ok_or_else(|| DevError::SignatureNotFound {
            name: target.to_owned(),
            file: unit.path.clone(),
        })
}

/// Documentation block of the header at `signature_at`.
///
/// Collects contiguous `//` lines upward; stops early after a line that
/// starts with the whole word `// <name>`. Lines that are not a header get the plain
/// contiguous-comment rule.
pub fn extract_documentation(unit: &SourceUnit, signature_at: usize) -> Vec<String> {
    let name = unit
        .lines
        .get(signature_at)
        .and_then(|line| Header::parse(line))
        .map(|header| header.name);
    documentation_above(&unit.lines, signature_at, name.as_deref())
}

/// True for `// <name>` followed by a non-word character or end of line,
/// so `// More` does not mark the docs of `M`.
fn names_function(line: &str, name: &str) -> bool {
    line.strip_prefix(COMMENT)
        .and_then(|rest| rest.strip_prefix(' '))
        .and_then(|rest| rest.strip_prefix(name))
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
}

fn documentation_above(lines: &[String], signature_at: usize, name: Option<&str>) -> Vec<String> {
    let mut doc: Vec<String> = Vec::new();

    for line in lines[..signature_at.min(lines.len())].iter().rev() {
        if !line.starts_with(COMMENT) {
            break;
        }
        doc.push(line.clone());
        if name.is_some_and(|n| names_function(line, n)) {
            break;
        }
    }

    doc.reverse();
    doc
}
