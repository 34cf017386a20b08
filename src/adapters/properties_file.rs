// SPDX-License-Identifier: MIT OR Apache-2.0

//! `.properties` file parser.
//!
//! Supports `key=value`, `key: value` and `key value` lines, `#` and `!` comment
//! lines, trailing-backslash line continuations and the `\n`, `\t`, `\\`, `\=`,
//! `\:` escapes.

use crate::domain::{Properties, Result};
use crate::ports::ConfigParser;

/// Parser for `.properties` files.
///
/// # Examples
///
/// ```rust
/// use mapcfg::adapters::PropertiesParser;
/// use mapcfg::ports::ConfigParser;
///
/// let parsed = PropertiesParser::new()
///     .parse("# database\nurl=jdbc:h2:mem\nusername: scott\n")
///     .unwrap();
/// assert_eq!(parsed.get("url").map(String::as_str), Some("jdbc:h2:mem"));
/// assert_eq!(parsed.get("username").map(String::as_str), Some("scott"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a new properties parser.
    pub fn new() -> Self {
        PropertiesParser
    }

    fn logical_lines(content: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current: Option<String> = None;

        for raw in content.lines() {
            let line = match current {
                Some(_) => raw.trim_start(),
                None => {
                    let trimmed = raw.trim_start();
                    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                        continue;
                    }
                    trimmed
                }
            };

            let (text, continues) = match line.strip_suffix('\\') {
                Some(stripped) if !ends_with_escaped_backslash(line) => (stripped, true),
                _ => (line, false),
            };

            let mut acc = current.take().unwrap_or_default();
            acc.push_str(text);
            if continues {
                current = Some(acc);
            } else {
                lines.push(acc);
            }
        }
        if let Some(rest) = current {
            lines.push(rest);
        }
        lines
    }

    fn split_pair(line: &str) -> (String, String) {
        let mut key = String::new();
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        key.push(unescape(next));
                    }
                }
                '=' | ':' => break,
                c if c.is_whitespace() => {
                    while chars.peek().map_or(false, |c| c.is_whitespace()) {
                        chars.next();
                    }
                    if matches!(chars.peek(), Some('=') | Some(':')) {
                        chars.next();
                    }
                    break;
                }
                c => key.push(c),
            }
        }

        let rest: String = chars.collect();
        let mut value = String::new();
        let mut rest_chars = rest.trim_start().chars();
        while let Some(c) = rest_chars.next() {
            if c == '\\' {
                if let Some(next) = rest_chars.next() {
                    value.push(unescape(next));
                }
            } else {
                value.push(c);
            }
        }
        (key, value)
    }
}

fn ends_with_escaped_backslash(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    trailing % 2 == 0
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}

impl ConfigParser for PropertiesParser {
    fn parse(&self, content: &str) -> Result<Properties> {
        Ok(Self::logical_lines(content)
            .iter()
            .map(|line| Self::split_pair(line))
            .filter(|(key, _)| !key.is_empty())
            .collect())
    }

    fn supported_extensions(&self) -> &[&str] {
        &["properties"]
    }
}
