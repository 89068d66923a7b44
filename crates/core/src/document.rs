//! Structured output documents.
//!
//! A [`Document`] is an ordered list of headings, paragraphs and tables.
//! Generated artifacts are appended as sections; a section whose content is
//! a Markdown table (and whose action allows it) becomes a real table,
//! everything else becomes one paragraph per line. Documents are saved as
//! `.docx` via [`crate::docx`].

use serde::Serialize;

use crate::docx::{self, DocxError};
use crate::sanitize::{is_markdown_table, parse_markdown_table, MarkdownTable};

/// Heading level of the document title.
pub const TITLE_LEVEL: u8 = 1;

/// Heading level of every section heading.
pub const SECTION_LEVEL: u8 = 2;

/// Suffix appended to the heading of a section whose generation failed.
pub const FAILED_SECTION_SUFFIX: &str = "(ERROR)";

/// A single renderable element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { text: String, level: u8 },
    Paragraph { text: String },
    Table { table: MarkdownTable },
}

/// How a section's content ended up being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLayout {
    Table,
    Paragraphs,
}

/// One section of input to [`Document::assemble`].
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    pub title: &'a str,
    /// Generated text, or the error message of a failed section.
    pub content: &'a str,
    pub allow_table: bool,
    pub failed: bool,
}

impl<'a> Section<'a> {
    pub fn new(title: &'a str, content: &'a str, allow_table: bool) -> Self {
        Self {
            title,
            content,
            allow_table,
            failed: false,
        }
    }

    /// A section whose content could not be generated; `message` says why.
    pub fn failed(title: &'a str, message: &'a str) -> Self {
        Self {
            title,
            content: message,
            allow_table: false,
            failed: true,
        }
    }
}

/// Fixed header written before any section.
#[derive(Debug, Clone)]
pub struct Preamble<'a> {
    pub title: &'a str,
    pub domain: &'a str,
    pub primary_entity: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document opened by the project title, domain and primary entity.
    pub fn with_preamble(preamble: &Preamble<'_>) -> Self {
        let mut doc = Self::new();
        doc.add_heading(preamble.title, TITLE_LEVEL);
        doc.add_paragraph(format!("Domain: {}", preamble.domain));
        doc.add_paragraph(format!("Primary Entity: {}", preamble.primary_entity));
        doc.add_paragraph("");
        doc
    }

    /// Build a preamble document followed by `sections`, in order.
    pub fn assemble<'a>(
        preamble: &Preamble<'_>,
        sections: impl IntoIterator<Item = Section<'a>>,
    ) -> Self {
        let mut doc = Self::with_preamble(preamble);
        for section in sections {
            if section.failed {
                doc.add_failed_section(section.title, section.content);
            } else {
                doc.add_section(section.title, section.content, section.allow_table);
            }
        }
        doc
    }

    /// A document holding `text` as one paragraph per line.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.add_lines(text);
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Texts of all section-level headings, in order.
    pub fn section_titles(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading { text, level } if *level == SECTION_LEVEL => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) {
        self.blocks.push(Block::Heading {
            text: text.into(),
            level,
        });
    }

    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Paragraph { text: text.into() });
    }

    pub fn add_table(&mut self, table: MarkdownTable) {
        self.blocks.push(Block::Table { table });
    }

    fn add_lines(&mut self, content: &str) {
        for line in content.lines() {
            self.add_paragraph(line);
        }
    }

    /// Append a titled section.
    ///
    /// When `allow_table` is set and `content` is a Markdown table, the
    /// section is the heading plus a real table; otherwise the heading is
    /// followed by one paragraph per line. Either way a blank paragraph
    /// closes the section.
    pub fn add_section(&mut self, title: &str, content: &str, allow_table: bool) -> SectionLayout {
        let table = if allow_table && is_markdown_table(content) {
            parse_markdown_table(content)
        } else {
            None
        };

        self.add_heading(title, SECTION_LEVEL);
        let layout = match table {
            Some(table) => {
                self.add_table(table);
                SectionLayout::Table
            }
            None => {
                self.add_lines(content);
                SectionLayout::Paragraphs
            }
        };
        self.add_paragraph("");
        layout
    }

    /// Append a section recording that its content could not be generated.
    pub fn add_failed_section(&mut self, title: &str, message: &str) {
        let heading = format!("{title} {FAILED_SECTION_SUFFIX}");
        self.add_section(&heading, message, false);
    }

    /// Serialize as a `.docx` package.
    pub fn to_docx(&self) -> Result<Vec<u8>, DocxError> {
        docx::write_bytes(self)
    }
}
