//! Front matter splitting and typed access.

use chrono::NaiveDate;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrontMatterError {
    #[error("front matter opened on line 1 is never closed")]
    Unterminated { end_line: usize },

    #[error("invalid YAML: {message}")]
    InvalidYaml {
        start_line: usize,
        end_line: usize,
        message: String,
    },

    #[error("front matter must be a mapping of keys to values")]
    NotAMapping { start_line: usize, end_line: usize },
}

impl FrontMatterError {
    /// 1-based, inclusive line range of the offending block.
    pub fn line_range(&self) -> (usize, usize) {
        match self {
            FrontMatterError::Unterminated { end_line } => (1, *end_line),
            FrontMatterError::InvalidYaml {
                start_line,
                end_line,
                ..
            }
            | FrontMatterError::NotAMapping {
                start_line,
                end_line,
            } => (*start_line, *end_line),
        }
    }
}

/// Parsed key/value metadata of a page, in source order.
///
/// Values stay dynamically typed (`serde_yaml::Value`); the well-known keys
/// get typed accessors that return `None` instead of guessing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    data: Mapping,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(data: Mapping) -> Self {
        Self { data }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.data.insert(Value::String(key.to_string()), value.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title").filter(|t| !t.trim().is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    /// Publication date. Accepts `YYYY-MM-DD` with an optional time part
    /// (`2024-01-05 10:00` or RFC 3339), which is ignored.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.get_str("date")?.trim();
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Author as a display string: either a plain string or the `name`
    /// (falling back to `username`) of an author mapping.
    pub fn author(&self) -> Option<&str> {
        match self.get("author")? {
            Value::String(name) => Some(name.as_str()),
            Value::Mapping(author) => author
                .get("name")
                .and_then(Value::as_str)
                .or_else(|| author.get("username").and_then(Value::as_str)),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.data.iter()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Split a document into front matter and body.
///
/// The block must start on the first line with `---` and end at the next line
/// that is exactly `---`. A document without an opening delimiter has empty
/// front matter and is returned whole as the body.
pub fn split_front_matter(content: &str) -> Result<(FrontMatter, String), FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((FrontMatter::new(), String::new()));
    };
    if !is_delimiter(first) {
        return Ok((FrontMatter::new(), content.to_string()));
    }

    let mut offset = first.len();
    let yaml_start = offset;
    let mut line_no = 1;
    let mut closing = None;
    for line in lines {
        line_no += 1;
        if is_delimiter(line) {
            closing = Some((offset, offset + line.len(), line_no));
            break;
        }
        offset += line.len();
    }

    let Some((yaml_end, body_start, closing_line)) = closing else {
        return Err(FrontMatterError::Unterminated { end_line: line_no });
    };

    let yaml = &content[yaml_start..yaml_end];
    let data = parse_block(yaml, closing_line)?;
    let body = content[body_start..].trim_start_matches(['\r', '\n']).to_string();
    Ok((FrontMatter::from_mapping(data), body))
}

fn parse_block(yaml: &str, closing_line: usize) -> Result<Mapping, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(yaml).map_err(|e| {
        // Line 1 of the YAML text is line 2 of the file.
        let message = match e.location() {
            Some(loc) => format!("line {}: {}", loc.line() + 1, e),
            None => e.to_string(),
        };
        FrontMatterError::InvalidYaml {
            start_line: 1,
            end_line: closing_line,
            message,
        }
    })?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontMatterError::NotAMapping {
            start_line: 1,
            end_line: closing_line,
        }),
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        let (fm, body) = split_front_matter("---\ntitle: Hi\n---\n# Hi").unwrap();
        assert_eq!(fm.title(), Some("Hi"));
        assert_eq!(fm.len(), 1);
        assert_eq!(body, "# Hi");
    }

    #[test]
    fn test_no_front_matter_keeps_whole_file() {
        let content = "# Just Content\n\nNo front matter here.\n";
        let (fm, body) = split_front_matter(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_horizontal_rule_later_is_not_front_matter() {
        let content = "Intro\n---\nMore\n";
        let (fm, body) = split_front_matter(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = split_front_matter("---\n---\nBody\n").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\n\r\nBody\r\n";
        let (fm, body) = split_front_matter(content).unwrap();
        assert_eq!(fm.title(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_key_order_is_preserved() {
        let (fm, _) = split_front_matter("---\nzeta: 1\nalpha: 2\nmid: 3\n---\n").unwrap();
        let keys: Vec<_> = fm.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_unterminated_block() {
        let err = split_front_matter("---\ntitle: Oops\nbody text\n").unwrap_err();
        assert_eq!(err, FrontMatterError::Unterminated { end_line: 3 });
        assert_eq!(err.line_range(), (1, 3));
    }

    #[test]
    fn test_invalid_yaml_reports_range() {
        let content = "---\ntitle: Test\ninvalid yaml: [unclosed\n---\nContent.";
        let err = split_front_matter(content).unwrap_err();
        assert!(matches!(err, FrontMatterError::InvalidYaml { .. }));
        assert_eq!(err.line_range(), (1, 4));
    }

    #[test]
    fn test_scalar_is_not_a_mapping() {
        let err = split_front_matter("---\njust a string\n---\n").unwrap_err();
        assert_eq!(
            err,
            FrontMatterError::NotAMapping {
                start_line: 1,
                end_line: 3
            }
        );
    }

    #[test]
    fn test_typed_accessors() {
        let content = r#"---
title: Release notes
description: What changed
date: 2024-03-01 09:30
author:
  name: Mira
  username: mira
draft: true
---
"#;
        let (fm, _) = split_front_matter(content).unwrap();
        assert_eq!(fm.title(), Some("Release notes"));
        assert_eq!(fm.description(), Some("What changed"));
        assert_eq!(fm.date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(fm.author(), Some("Mira"));
        assert_eq!(fm.get_bool("draft"), Some(true));
        assert_eq!(fm.get("missing"), None);
    }

    #[test]
    fn test_author_string_and_bad_date() {
        let (fm, _) = split_front_matter("---\nauthor: sam\ndate: soon\n---\n").unwrap();
        assert_eq!(fm.author(), Some("sam"));
        assert_eq!(fm.date(), None);
    }

    #[test]
    fn test_blank_title_is_absent() {
        let (fm, _) = split_front_matter("---\ntitle: \"  \"\n---\n").unwrap();
        assert_eq!(fm.title(), None);
    }
}
