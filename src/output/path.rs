// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Custom column expressions
//!
//! A column is written `HEADER:PATH`. The path is a dotted walk over a wider
//! record, kubectl style:
//!
//! - `.pod.metadata.name` - field access
//! - `.node.metadata.labels.kubernetes\.io/os` - `\.` keeps a dot inside a
//!   label or annotation key
//! - `.pod.spec.containers[0].image` - array index
//! - `.pvcs[*].metadata.name` - every element; matches are joined with `,`
//!
//! The first segment picks the record root: `pod`, `node`, `sa` /
//! `serviceAccount` or `pvc` / `pvcs`. Everything below the root is walked as
//! JSON. A path that leads nowhere renders `<none>`.

use serde_json::Value;

use super::NONE;
use crate::error::Error;
use crate::wider::PodWithWider;

/// One step of a column path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain field name or map key
    Field(String),
    /// Map key that contained an escaped dot, stored unescaped
    EscapedKey(String),
    /// `[n]`
    Index(usize),
    /// `[*]`
    Wildcard,
}

impl Segment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Field(key) | Segment::EscapedKey(key) => Some(key),
            Segment::Index(_) | Segment::Wildcard => None,
        }
    }
}

/// Top-level fields of a wider record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    Pod,
    Node,
    ServiceAccount,
    Pvcs,
}

impl Root {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "pod" => Some(Root::Pod),
            "node" => Some(Root::Node),
            "sa" | "serviceAccount" => Some(Root::ServiceAccount),
            "pvc" | "pvcs" => Some(Root::Pvcs),
            _ => None,
        }
    }

    fn value_of(self, record: &PodWithWider<'_>) -> Option<Value> {
        match self {
            Root::Pod => serde_json::to_value(record.pod).ok(),
            Root::Node => record.node.and_then(|node| serde_json::to_value(node).ok()),
            Root::ServiceAccount => record
                .service_account
                .as_deref()
                .and_then(|sa| serde_json::to_value(sa).ok()),
            Root::Pvcs => serde_json::to_value(&record.pvcs).ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub path: Vec<Segment>,
}

impl ColumnSpec {
    /// Parse a single `HEADER:PATH` entry, splitting at the first colon
    pub fn parse(spec: &str) -> Result<Self, Error> {
        let (name, path) = spec.split_once(':').ok_or_else(|| {
            Error::validation(format!(
                "invalid custom-columns entry '{}': expected <header>:<json-path-expr>",
                spec
            ))
        })?;

        Ok(Self {
            name: name.to_string(),
            path: parse_path(path)?,
        })
    }

    /// Parse the comma separated column list after `custom-columns=`
    pub fn parse_list(spec: &str) -> Result<Vec<Self>, Error> {
        let columns = spec
            .split(',')
            .filter(|entry| !entry.is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(Error::validation(
                "custom-columns format specified but no custom columns given",
            ));
        }
        Ok(columns)
    }

    /// Evaluate this column against a record
    ///
    /// Never fails: anything unresolvable renders as `<none>`.
    pub fn resolve(&self, record: &PodWithWider<'_>) -> String {
        let Some((first, rest)) = self.path.split_first() else {
            return serde_json::to_value(record)
                .map(|v| render_matches(&[&v]))
                .unwrap_or_else(|_| NONE.to_string());
        };

        let Some(root) = first.as_key().and_then(Root::from_key) else {
            return NONE.to_string();
        };
        let Some(value) = root.value_of(record) else {
            return NONE.to_string();
        };

        let mut matches = Vec::new();
        walk(&value, rest, &mut matches);
        render_matches(&matches)
    }
}

fn parse_path(path: &str) -> Result<Vec<Segment>, Error> {
    let path = path
        .strip_prefix('{')
        .and_then(|p| p.strip_suffix('}'))
        .unwrap_or(path);

    let mut segments = Vec::new();
    let mut token = String::new();
    let mut escaped = false;
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                chars.next();
                token.push('.');
                escaped = true;
            }
            '.' => finish_token(&mut segments, &mut token, &mut escaped),
            '[' => {
                finish_token(&mut segments, &mut token, &mut escaped);
                let mut subscript = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(ch) => subscript.push(ch),
                        None => {
                            return Err(Error::validation(format!(
                                "unterminated '[' in column path '{}'",
                                path
                            )));
                        }
                    }
                }
                segments.push(parse_subscript(&subscript, path)?);
            }
            _ => token.push(c),
        }
    }
    finish_token(&mut segments, &mut token, &mut escaped);

    Ok(segments)
}

fn finish_token(segments: &mut Vec<Segment>, token: &mut String, escaped: &mut bool) {
    if !token.is_empty() {
        let key = std::mem::take(token);
        segments.push(if *escaped {
            Segment::EscapedKey(key)
        } else {
            Segment::Field(key)
        });
    }
    *escaped = false;
}

fn parse_subscript(subscript: &str, path: &str) -> Result<Segment, Error> {
    if subscript == "*" {
        return Ok(Segment::Wildcard);
    }
    subscript.parse::<usize>().map(Segment::Index).map_err(|_| {
        Error::validation(format!(
            "invalid array subscript '[{}]' in column path '{}'",
            subscript, path
        ))
    })
}

/// Collect every value the remaining path reaches; nulls count as missing
fn walk<'v>(value: &'v Value, path: &[Segment], out: &mut Vec<&'v Value>) {
    let Some((segment, rest)) = path.split_first() else {
        if !value.is_null() {
            out.push(value);
        }
        return;
    };

    match (segment, value) {
        (Segment::Field(key) | Segment::EscapedKey(key), Value::Object(map)) => {
            if let Some(next) = map.get(key.as_str()) {
                walk(next, rest, out);
            }
        }
        // A field on a list applies to each element
        (Segment::Field(_) | Segment::EscapedKey(_), Value::Array(items)) => {
            for item in items {
                walk(item, path, out);
            }
        }
        (Segment::Index(i), Value::Array(items)) => {
            if let Some(next) = items.get(*i) {
                walk(next, rest, out);
            }
        }
        (Segment::Wildcard, Value::Array(items)) => {
            for item in items {
                walk(item, rest, out);
            }
        }
        _ => {}
    }
}

fn render_matches(matches: &[&Value]) -> String {
    if matches.is_empty() {
        return NONE.to_string();
    }
    matches
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}
