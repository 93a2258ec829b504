//! Rendering of `state` results
//!
//! Formats are given as `type[=format[=error_format]]`:
//!
//! ```text
//! table                    aligned columns (default)
//! text=%r/%h/%u/%a=-/-/-/- counters for status bars
//! json                     the shoots as a JSON array
//! ```
//!
//! Text directives:
//! - `%r` healthy and running
//! - `%h` hibernated
//! - `%u` running but unhealthy or unknown
//! - `%a` all
//! - `%e` error message, only meaningful in the error format
//! - `%%` a literal percent sign


use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::Result;
use crate::ShootList;

pub const DEFAULT_TEXT_FORMAT: &str = "%r/%h/%u/%a";
pub const DEFAULT_ERROR_FORMAT: &str = "-/-/-/-";

const TABLE_HEADER: [&str; 6] = ["NAME", "NAMESPACE", "CREATED BY", "REGION", "STATUS", "AGE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    Text,
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            OutputType::Text => write!(f, "text"),
            OutputType::Table => write!(f, "table"),
            OutputType::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormat {
    pub kind: OutputType,
    pub format: String,
    pub error_format: String,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            kind: OutputType::default(),
            format: DEFAULT_TEXT_FORMAT.to_string(),
            error_format: DEFAULT_ERROR_FORMAT.to_string(),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '=');

        let kind = match parts.next().unwrap_or_default().trim().to_ascii_lowercase().as_str() {
            "" | "table" => OutputType::Table,
            "text" => OutputType::Text,
            "json" => OutputType::Json,
            other => {
                return Err(format!(
                    "unknown output type '{other}', expected one of: text, table, json"
                ))
            }
        };

        Ok(Self {
            kind,
            format: parts.next().unwrap_or(DEFAULT_TEXT_FORMAT).to_string(),
            error_format: parts.next().unwrap_or(DEFAULT_ERROR_FORMAT).to_string(),
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}={}={}", self.kind, self.format, self.error_format)
    }
}

impl OutputFormat {
    /// Renders a query outcome; failures become output, not errors
    pub fn render(
        &self,
        result: &Result<ShootList>,
        now: DateTime<Utc>,
    ) -> String {
        match result {
            Ok(list) => self.render_list(list, now),
            Err(e) => self.render_error(&e.to_string()),
        }
    }

    pub fn render_list(
        &self,
        list: &ShootList,
        now: DateTime<Utc>,
    ) -> String {
        match self.kind {
            OutputType::Text => expand(&self.format, Some(list), ""),
            OutputType::Table => table(list, now),
            OutputType::Json => serde_json::to_string_pretty(&list.items)
                .unwrap_or_else(|e| json_error(&e.to_string())),
        }
    }

    pub fn render_error(
        &self,
        message: &str,
    ) -> String {
        match self.kind {
            OutputType::Text => expand(&self.error_format, None, message),
            OutputType::Table => message.to_string(),
            OutputType::Json => json_error(message),
        }
    }
}

fn json_error(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Substitutes the text directives. Counters are only known when `list` is
/// given; in the error format they stay as written.
fn expand(
    format: &str,
    list: Option<&ShootList>,
    error: &str,
) -> String {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let Some(directive) = chars.next() else {
            out.push('%');
            break;
        };

        match (directive, list) {
            ('%', _) => out.push('%'),
            ('e', _) => out.push_str(error),
            ('r', Some(list)) => out.push_str(&list.healthy().to_string()),
            ('h', Some(list)) => out.push_str(&list.hibernated().to_string()),
            ('u', Some(list)) => out.push_str(&list.unknown().to_string()),
            ('a', Some(list)) => out.push_str(&list.len().to_string()),
            (other, _) => {
                out.push('%');
                out.push(other);
            }
        }
    }

    out
}

fn table(
    list: &ShootList,
    now: DateTime<Utc>,
) -> String {
    let rows: Vec<[String; 6]> = list
        .items
        .iter()
        .map(|shoot| {
            [
                shoot.name.clone(),
                shoot.namespace.clone(),
                shoot.created_by.clone(),
                shoot.region.clone(),
                shoot.status().to_string(),
                age(shoot.creation_timestamp, now),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADER.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &TABLE_HEADER.map(str::to_string), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(
    out: &mut String,
    row: &[String; 6],
    widths: &[usize; 6],
) {
    let last = row.len() - 1;
    for (i, (cell, width)) in row.iter().zip(widths.iter().copied()).enumerate() {
        if i == last {
            out.push_str(cell);
        } else {
            out.push_str(&format!("{cell:<width$}   "));
        }
    }
    out.push('\n');
}

/// Largest whole unit of the elapsed time, as in `12d`, `5h`, `3m` or `40s`
pub fn age(
    since: DateTime<Utc>,
    now: DateTime<Utc>,
) -> String {
    let elapsed = (now - since).num_seconds().max(0);

    match elapsed {
        s if s >= 86_400 => format!("{}d", s / 86_400),
        s if s >= 3_600 => format!("{}h", s / 3_600),
        s if s >= 60 => format!("{}m", s / 60),
        s => format!("{s}s"),
    }
}
