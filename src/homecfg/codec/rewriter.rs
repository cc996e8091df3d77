//! # Visibility Rewriter
//!
//! The encode-side half of the codec. `serde_yaml` writes every entry as live
//! YAML; this pass walks the serialized lines once and puts the comment
//! markers back:
//!
//! - every line of a hidden entry gets `# ` inserted at the entry's column, so
//!   the block keeps its shape relative to the entry and un-commenting it by
//!   hand yields valid YAML again;
//! - in an entry whose health check is disabled, each top-level `ping`,
//!   `server` or `container` line (and its continuation lines) gets `# `
//!   inserted at the field's own column;
//! - top-level `hidden:` / `healthCheckDisabled:` lines are dropped.

use super::layout::{comment_at, is_seq_item, Cursor, Line, Token, COMMENT_MARKER};
use crate::model::{is_health_check_key, is_reserved_key, Document};
use std::collections::HashSet;

type EntryKey = (String, String);

/// Which entries need comment markers, keyed by `(category, entry)`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VisibilityPlan {
    pub to_hide: HashSet<EntryKey>,
    pub to_disable_fields: HashSet<EntryKey>,
}

impl VisibilityPlan {
    pub fn from_document(document: &Document) -> Self {
        let mut plan = Self::default();
        for category in &document.categories {
            for entry in &category.entries {
                let key = (category.name.clone(), entry.name.clone());
                if entry.health_check_disabled {
                    plan.to_disable_fields.insert(key.clone());
                }
                if entry.hidden {
                    plan.to_hide.insert(key);
                }
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.to_hide.is_empty() && self.to_disable_fields.is_empty()
    }
}

struct EntrySpan {
    indent: usize,
    field_indent: Option<usize>,
    hide: bool,
    disable: bool,
    /// Column at which continuation lines of a disabled field are commented.
    commenting_from: Option<usize>,
    dropping: bool,
}

impl EntrySpan {
    /// Returns the rewritten line, or `None` if it is dropped.
    fn rewrite(&mut self, line: &Line) -> Option<String> {
        let field_indent = *self.field_indent.get_or_insert(line.indent);
        let mut out = line.raw.to_string();

        let continuation = line.indent > field_indent
            || (line.indent == field_indent && is_seq_item(line.body));

        if continuation {
            if self.dropping {
                return None;
            }
            if let Some(column) = self.commenting_from {
                out = comment_at(&out, column);
            }
        } else {
            self.commenting_from = None;
            self.dropping = false;
            if !line.commented {
                if let Some(key) = line.map_key() {
                    if is_reserved_key(&key) {
                        self.dropping = true;
                        return None;
                    }
                    if self.disable && is_health_check_key(&key) {
                        out = comment_at(&out, field_indent);
                        self.commenting_from = Some(field_indent);
                    }
                }
            }
        }

        if self.hide {
            out = comment_at(&out, self.indent);
        }
        Some(out)
    }

    /// An empty line inside the span. Only multi-line scalars produce these, so it
    /// carries the same markers as the lines around it or the scalar loses it.
    fn rewrite_blank(&self) -> Option<String> {
        if self.dropping {
            return None;
        }
        let inner = match self.commenting_from {
            Some(column) => bare_marker(column),
            None => String::new(),
        };
        if !self.hide {
            return Some(inner);
        }
        if inner.is_empty() {
            Some(bare_marker(self.indent))
        } else {
            Some(comment_at(&inner, self.indent))
        }
    }
}

fn bare_marker(column: usize) -> String {
    format!("{}{}", " ".repeat(column), COMMENT_MARKER)
}

/// Re-applies hidden/disabled comment markers to freshly serialized text.
pub fn rewrite(serialized: &str, plan: &VisibilityPlan) -> String {
    let mut cursor = Cursor::default();
    let mut span: Option<EntrySpan> = None;
    let mut out: Vec<String> = Vec::new();

    for raw in serialized.lines() {
        let line = Line::parse(raw);
        match cursor.classify(&line) {
            Token::Category(_) => {
                span = None;
                out.push(raw.to_string());
            }
            Token::Entry { name, commented } => {
                let key = (cursor.category().unwrap_or_default().to_string(), name);
                let hide = !commented && plan.to_hide.contains(&key);
                if hide {
                    out.push(comment_at(raw, line.indent));
                } else {
                    out.push(raw.to_string());
                }
                span = Some(EntrySpan {
                    indent: line.indent,
                    field_indent: None,
                    hide,
                    disable: !commented && plan.to_disable_fields.contains(&key),
                    commenting_from: None,
                    dropping: false,
                });
            }
            Token::Blank => match span.as_ref() {
                Some(current) => out.extend(current.rewrite_blank()),
                None => out.push(raw.to_string()),
            },
            Token::Other => match span.as_mut() {
                Some(current) if line.indent > current.indent => {
                    if let Some(rewritten) = current.rewrite(&line) {
                        out.push(rewritten);
                    }
                }
                _ => {
                    span = None;
                    out.push(raw.to_string());
                }
            },
        }
    }

    let mut text = out.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}
