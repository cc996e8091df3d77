//! # Document Codec
//!
//! Round-trips a services file through the [`Document`] model.
//!
//! ```text
//! decode:  text ─normalize─▶ serde_yaml::from_str ─▶ Document::from_structural ─┐
//!                     └──────▶ scanner::scan ──────────────────────────▶ merge ◀─┘
//!
//! encode:  Document ─structural(All)─▶ serde_yaml::to_string ─▶ rewriter::rewrite ─▶ text
//! ```
//!
//! `serde_yaml` handles the structure and knows nothing about comments; the
//! scanner and rewriter handle the two comment conventions (hidden entries and
//! disabled health-check fields) and know nothing about YAML beyond line
//! layout. Decoding the output of [`encode`] yields an equal document.

use crate::error::Result;
use crate::model::{Document, Structural, Visibility};
use log::debug;
use serde_yaml::Value;

pub mod layout;
pub mod rewriter;
pub mod scanner;

pub use rewriter::VisibilityPlan;

/// Cleans up hand-edited or uploaded text before any parsing: drops a BOM,
/// document markers and trailing whitespace, and turns tab indentation into
/// spaces.
pub fn normalize(raw: &str) -> String {
    let raw = raw.trim_start_matches('\u{feff}');
    let mut lines = Vec::new();
    for line in raw.lines() {
        let line = line.trim_end();
        if line == "---" || line == "..." {
            continue;
        }
        let body = line.trim_start_matches([' ', '\t']);
        let leading = &line[..line.len() - body.len()];
        let indent: usize = leading
            .chars()
            .map(|c| if c == '\t' { layout::INDENT_WIDTH } else { 1 })
            .sum();
        lines.push(format!("{}{}", " ".repeat(indent), body));
    }
    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

fn has_content(text: &str) -> bool {
    text.lines().any(|l| {
        let t = l.trim();
        !t.is_empty() && !t.starts_with(layout::COMMENT_MARKER)
    })
}

/// Parses the structural tree only, without looking at comments.
pub fn parse_structural(text: &str) -> Result<Structural> {
    if !has_content(text) {
        return Ok(Structural::Empty);
    }
    let value: Value = serde_yaml::from_str(text)?;
    Structural::from_value(value)
}

pub fn decode(raw: &str) -> Result<Document> {
    let text = normalize(raw);
    let mut document = Document::from_structural(parse_structural(&text)?)?;
    let report = scanner::scan(&text);
    debug!(
        "event=decode categories={} scanned_entries={}",
        document.categories.len(),
        report.entries.len()
    );
    scanner::merge(&mut document, report);
    Ok(document)
}

pub fn encode(document: &Document) -> Result<String> {
    let body = if document.is_empty() {
        String::new()
    } else {
        let serialized = serde_yaml::to_string(&document.structural(Visibility::All))?;
        let plan = VisibilityPlan::from_document(document);
        debug!(
            "event=encode hidden={} disabled={}",
            plan.to_hide.len(),
            plan.to_disable_fields.len()
        );
        rewriter::rewrite(&serialized, &plan)
    };

    if document.preamble.is_empty() {
        return Ok(body);
    }
    let mut text = document.preamble.join("\n");
    text.push('\n');
    if !body.is_empty() {
        text.push('\n');
        text.push_str(&body);
    }
    Ok(text)
}

/// The active document as YAML: hidden entries left out, no comments.
pub fn encode_active(document: &Document) -> Result<String> {
    if document.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_yaml::to_string(&document.to_structural())?)
}
