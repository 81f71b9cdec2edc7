//! Dotenv file parsing using pest
//!
//! Each physical line of an env file is classified as a comment, a blank line,
//! a `KEY=VALUE` assignment or a malformed line. Only assignments are exported;
//! malformed lines are kept so callers can report them.

use crate::error::{ChoreError, Result};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[grammar = "dotenv/dotenv.pest"]
struct DotenvParser;

/// One classified line of an env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Comment,
    Blank,
    Assignment {
        key: String,
        value: String,
        line: usize,
    },
    Malformed {
        raw: String,
        line: usize,
    },
}

/// A parsed env file, lines in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    pub entries: Vec<Entry>,
}

impl EnvFile {
    /// Assignments in file order, duplicates included.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Assignment { key, value, .. } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }

    /// Effective variables: one value per key, the last assignment winning.
    #[must_use]
    pub fn variables(&self) -> Vec<(String, String)> {
        let mut order: Vec<&str> = Vec::new();
        let mut values: BTreeMap<&str, &str> = BTreeMap::new();
        for (key, value) in self.assignments() {
            if values.insert(key, value).is_none() {
                order.push(key);
            }
        }
        order
            .into_iter()
            .filter_map(|key| values.get(key).map(|v| (key.to_string(), (*v).to_string())))
            .collect()
    }

    /// Lines that are neither comments, blanks nor assignments.
    pub fn malformed(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Malformed { raw, line } => Some((*line, raw.as_str())),
            _ => None,
        })
    }
}

/// Parse env file content.
///
/// # Errors
///
/// Returns `Err` only if the grammar rejects the input, which cannot happen for
/// text input since unrecognised lines are classified as malformed. `path` is used
/// for the error location.
pub fn parse(content: &str, path: &Path) -> Result<EnvFile> {
    // Editors on Windows often save with a byte order mark.
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut pairs = DotenvParser::parse(Rule::file, content).map_err(|e| {
        let (line, col) = match e.line_col {
            pest::error::LineColLocation::Pos(pos)
            | pest::error::LineColLocation::Span(pos, _) => pos,
        };
        ChoreError::EnvFileParse {
            path: path.to_path_buf(),
            line,
            col,
            message: e.variant.message().to_string(),
        }
    })?;

    let mut entries = Vec::new();
    let Some(file) = pairs.next() else {
        return Ok(EnvFile { entries });
    };

    for pair in file.into_inner() {
        let line = pair.as_span().start_pos().line_col().0;
        match pair.as_rule() {
            Rule::comment => entries.push(Entry::Comment),
            Rule::blank => entries.push(Entry::Blank),
            Rule::assignment => entries.push(parse_assignment(pair, line)),
            Rule::malformed => entries.push(Entry::Malformed {
                raw: pair.as_str().to_string(),
                line,
            }),
            _ => {}
        }
    }

    Ok(EnvFile { entries })
}

/// Read and parse the env file at `path`.
///
/// # Errors
///
/// Returns `EnvFileMissing` when the file does not exist and `EnvFileRead` for
/// other I/O failures.
pub fn load(path: &Path) -> Result<EnvFile> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ChoreError::EnvFileMissing {
                path: path.to_path_buf(),
            }
        } else {
            ChoreError::EnvFileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse(&content, path)
}

fn parse_assignment(pair: Pair<Rule>, line: usize) -> Entry {
    let mut key = String::new();
    let mut value = String::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::key => key = inner.as_str().to_string(),
            Rule::value => value = parse_value(inner),
            _ => {}
        }
    }

    Entry::Assignment { key, value, line }
}

fn parse_value(pair: Pair<Rule>) -> String {
    let Some(inner) = pair.into_inner().next() else {
        return String::new();
    };

    match inner.as_rule() {
        Rule::single_quoted => inner
            .into_inner()
            .next()
            .map(|p| p.as_str().to_string())
            .unwrap_or_default(),
        Rule::double_quoted => inner
            .into_inner()
            .next()
            .map(|p| unescape_double_quoted(p.as_str()))
            .unwrap_or_default(),
        _ => inner.as_str().trim().to_string(),
    }
}

/// Decode the escapes a double-quoted value may carry. Unknown escapes are kept verbatim.
fn unescape_double_quoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(e @ ('\\' | '"' | '$' | '`')) => out.push(e),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
