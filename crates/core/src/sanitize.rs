//! Post-processing of raw model output.
//!
//! Two independent concerns live here:
//!
//! - PlantUML repair: find the fenced diagram block, drop dangling commas,
//!   guarantee `@startuml` / `@enduml` markers and re-fence the result.
//! - Markdown table detection and parsing, with rows repaired to the
//!   header's column count.
//!
//! Nothing in this module returns an error; malformed input degrades to the
//! best-effort output described on each function.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// PlantUML
// ---------------------------------------------------------------------------

/// Opening fence written around every sanitized diagram.
pub const PLANTUML_FENCE_OPEN: &str = "```plantuml";

/// Closing fence written around every sanitized diagram.
pub const PLANTUML_FENCE_CLOSE: &str = "```";

/// Matches a ```` ```plantuml ... ``` ```` block, fence marker case-insensitive.
static PLANTUML_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```plantuml\s*(.*?)```").expect("valid regex"));

/// Where the diagram body of a model answer was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantUmlSource<'a> {
    /// A fenced `plantuml` block; holds the text between the fences.
    Fenced(&'a str),
    /// No fence present; the whole answer is treated as the body.
    Bare(&'a str),
    /// Nothing but whitespace (or no answer at all).
    Empty,
}

/// Classify raw output by where its diagram body lives.
pub fn locate_plantuml(text: Option<&str>) -> PlantUmlSource<'_> {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return PlantUmlSource::Empty;
    };
    match PLANTUML_BLOCK_RE.captures(text).and_then(|c| c.get(1)) {
        Some(body) => PlantUmlSource::Fenced(body.as_str()),
        None => PlantUmlSource::Bare(text),
    }
}

/// Repair model output that should be a fenced PlantUML diagram.
///
/// Every line loses trailing whitespace and at most one trailing comma.
/// Missing `@startuml` / `@enduml` markers (checked case-insensitively) are
/// added, and the body is always returned inside a `plantuml` fence. Empty
/// input yields an empty diagram.
pub fn sanitize_plantuml<'a>(text: impl Into<Option<&'a str>>) -> String {
    let body = match locate_plantuml(text.into()) {
        PlantUmlSource::Empty => return fence("@startuml\n@enduml"),
        PlantUmlSource::Fenced(body) | PlantUmlSource::Bare(body) => body,
    };

    let cleaned = body
        .lines()
        .map(strip_dangling_comma)
        .collect::<Vec<_>>()
        .join("\n");
    let mut code = cleaned.trim().to_string();

    let lower = code.to_lowercase();
    if !lower.contains("@startuml") {
        code = format!("@startuml\n{code}");
    }
    if !lower.contains("@enduml") {
        code = format!("{code}\n@enduml");
    }

    fence(code.trim())
}

/// Return the diagram body of sanitized output, without fences.
///
/// Falls back to the trimmed text when no fence is present.
pub fn extract_plantuml_code(output_text: &str) -> String {
    match locate_plantuml(Some(output_text)) {
        PlantUmlSource::Fenced(body) => body.trim().to_string(),
        PlantUmlSource::Bare(text) => text.trim().to_string(),
        PlantUmlSource::Empty => String::new(),
    }
}

fn strip_dangling_comma(line: &str) -> &str {
    let line = line.trim_end();
    match line.strip_suffix(',') {
        Some(rest) => rest.trim_end(),
        None => line,
    }
}

fn fence(code: &str) -> String {
    format!("{PLANTUML_FENCE_OPEN}\n{code}\n{PLANTUML_FENCE_CLOSE}")
}

// ---------------------------------------------------------------------------
// Markdown tables
// ---------------------------------------------------------------------------

/// Minimum number of `|` characters on the header and separator lines.
const MIN_PIPES: usize = 3;

/// A parsed Markdown table. Every row has exactly `header.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn is_separator(line: &str) -> bool {
    line.starts_with('|')
        && line.matches('|').count() >= MIN_PIPES
        && line.chars().all(|c| matches!(c, '|' | ':' | '-' | ' '))
        && line.contains('-')
}

/// Whether `text` starts with a Markdown table (header, separator, first row).
pub fn is_markdown_table(text: &str) -> bool {
    let lines = non_blank_lines(text);
    if lines.len() < 3 {
        return false;
    }
    let header = lines[0];
    header.starts_with('|')
        && header.matches('|').count() >= MIN_PIPES
        && is_separator(lines[1])
        && lines[2].starts_with('|')
}

fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|c| c.trim().to_string()).collect()
}

/// Parse the first run of `|`-prefixed lines as a table.
///
/// Body rows shorter than the header are padded with empty cells; longer
/// rows are truncated. Returns `None` only when fewer than three table lines
/// exist.
pub fn parse_markdown_table(text: &str) -> Option<MarkdownTable> {
    let table_lines: Vec<&str> = non_blank_lines(text)
        .into_iter()
        .skip_while(|l| !l.starts_with('|'))
        .take_while(|l| l.starts_with('|'))
        .collect();

    if table_lines.len() < 3 {
        return None;
    }

    let header = split_row(table_lines[0]);
    let columns = header.len();

    let rows = table_lines[2..]
        .iter()
        .map(|line| {
            let mut cells = split_row(line);
            if cells.len() > columns {
                tracing::debug!(
                    dropped = cells.len() - columns,
                    columns,
                    "Truncating table row to header width"
                );
            }
            cells.resize(columns, String::new());
            cells
        })
        .collect();

    Some(MarkdownTable { header, rows })
}
