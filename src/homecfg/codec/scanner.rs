//! # Comment State Scanner
//!
//! The decode-side half of the codec. `serde_yaml` drops comments, so the
//! structural parse of a file cannot see hidden entries (commented blocks) or
//! disabled health-check fields (commented lines). This module reads the same
//! text again, line by line, and recovers both.
//!
//! The scan is a small state machine:
//!
//! ```text
//!              category header             entry header
//!   Outside ─────────────────▶ InCategory ───────────────▶ InVisibleEntry
//!                                  │  ▲                         │
//!          commented entry header  │  └── shallower line ───────┘
//!                                  ▼
//!                            InHiddenBlock ── uncommented / shallower line ──▶ InCategory
//! ```
//!
//! Any header (category or entry, commented or not) closes whatever span is
//! open. Closing a span turns it into a [`ScannedEntry`]; [`merge`] folds those
//! into the `Document` built from the structural parse.

use super::layout::{is_seq_item, rebase, Cursor, Line, Token};
use crate::model::{is_health_check_key, strip_reserved, Document, Entry, HEALTH_CHECK_DISABLED_KEY};
use log::{debug, warn};
use serde_yaml::{Mapping, Value};

/// What the scan learned about one entry header.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedEntry {
    pub category: String,
    pub name: String,
    /// 0-based line of the header.
    pub line: usize,
    /// `Some` for hidden entries: the fields parsed out of the commented block.
    pub hidden_fields: Option<Mapping>,
    pub layout: FieldLayout,
}

impl ScannedEntry {
    pub fn is_hidden(&self) -> bool {
        self.hidden_fields.is_some()
    }
}

/// Field-level facts of an entry that only the raw text carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldLayout {
    /// Top-level field keys in file order, commented health-check keys included.
    pub order: Vec<String>,
    /// Values recovered from commented health-check lines.
    pub disabled: Mapping,
    /// At least one commented health-check line was seen.
    pub health_check_disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub preamble: Vec<String>,
    pub entries: Vec<ScannedEntry>,
}

pub fn scan(text: &str) -> ScanReport {
    let mut scanner = Scanner::default();
    for (idx, raw) in text.lines().enumerate() {
        scanner.step(idx, raw);
    }
    scanner.finish()
}

/// Folds scanned comment state into a document built from the structural parse
/// of the same text, then restores file order inside every category.
pub fn merge(document: &mut Document, report: ScanReport) {
    document.preamble = report.preamble;

    for scanned in report.entries {
        if document.category(&scanned.category).is_none() {
            warn!(
                "event=scan_category_missing category={} entry={}",
                scanned.category, scanned.name
            );
        }
        let category = document.ensure_category(&scanned.category);

        match scanned.hidden_fields {
            None => match category.entry_mut(&scanned.name) {
                Some(entry) => {
                    entry.origin_line = Some(scanned.line);
                    if scanned.layout.health_check_disabled {
                        let fields = std::mem::take(&mut entry.fields);
                        entry.fields = restore_disabled(fields, &scanned.layout);
                        entry.health_check_disabled = true;
                    }
                }
                None => warn!(
                    "event=scan_entry_unmatched category={} entry={} line={}",
                    scanned.category, scanned.name, scanned.line
                ),
            },
            Some(fields) => {
                if category.contains(&scanned.name) {
                    // The live entry wins; the commented copy is not kept.
                    warn!(
                        "event=hidden_entry_collision category={} entry={} line={}",
                        scanned.category, scanned.name, scanned.line
                    );
                    continue;
                }
                let mut entry = Entry::new(scanned.name, Mapping::new());
                entry.fields = restore_disabled(fields, &scanned.layout);
                entry.hidden = true;
                entry.health_check_disabled = scanned.layout.health_check_disabled;
                entry.origin_line = Some(scanned.line);
                category.entries.push(entry);
            }
        }
    }

    document.sort_by_origin();
}

/// Re-inserts recovered health-check values, in their original position among
/// the top-level keys. Live values win over commented ones.
fn restore_disabled(fields: Mapping, layout: &FieldLayout) -> Mapping {
    if layout.disabled.is_empty() {
        return fields;
    }

    let mut out = Mapping::new();
    for key in &layout.order {
        let key = Value::String(key.clone());
        if out.contains_key(&key) {
            continue;
        }
        if let Some(value) = fields.get(&key).or_else(|| layout.disabled.get(&key)) {
            out.insert(key, value.clone());
        }
    }
    for (key, value) in fields.into_iter().chain(layout.disabled.clone()) {
        if !out.contains_key(&key) {
            out.insert(key, value);
        }
    }
    out
}

enum State {
    Outside,
    InCategory(String),
    InVisibleEntry(VisibleSpan),
    InHiddenBlock(HiddenBlock),
}

struct VisibleSpan {
    category: String,
    name: String,
    line: usize,
    indent: usize,
    fields: FieldScan,
}

struct HiddenBlock {
    category: String,
    name: String,
    line: usize,
    indent: usize,
    inline: Option<String>,
    bodies: Vec<String>,
}

#[derive(Default)]
struct Scanner {
    cursor: Cursor,
    state: Option<State>,
    preamble: Vec<String>,
    entries: Vec<ScannedEntry>,
}

impl Scanner {
    fn step(&mut self, idx: usize, raw: &str) {
        let line = Line::parse(raw);
        let token = self.cursor.classify(&line);
        let state = self.state.take().unwrap_or(State::Outside);

        let next = match (state, token) {
            (prev, Token::Category(name)) => {
                self.close(prev);
                State::InCategory(name)
            }
            (prev, Token::Entry { name, commented }) => {
                self.close(prev);
                let category = self.cursor.category().unwrap_or_default().to_string();
                if commented {
                    debug!("event=hidden_header category={} entry={} line={}", category, name, idx);
                    State::InHiddenBlock(HiddenBlock {
                        category,
                        name,
                        line: idx,
                        indent: line.indent,
                        inline: line.item_inline_value().map(str::to_string),
                        bodies: Vec::new(),
                    })
                } else {
                    State::InVisibleEntry(VisibleSpan {
                        category,
                        name,
                        line: idx,
                        indent: line.indent,
                        fields: FieldScan::default(),
                    })
                }
            }
            (State::Outside, Token::Blank) => {
                self.preamble.push(String::new());
                State::Outside
            }
            (State::Outside, Token::Other) => {
                if line.commented {
                    self.preamble.push(raw.trim_end().to_string());
                }
                State::Outside
            }
            (State::InHiddenBlock(block), Token::Blank) => State::InHiddenBlock(block),
            (State::InHiddenBlock(mut block), Token::Other)
                if line.commented && line.indent >= block.indent =>
            {
                block.bodies.push(line.body.to_string());
                State::InHiddenBlock(block)
            }
            (State::InHiddenBlock(block), Token::Other) => {
                let category = block.category.clone();
                self.close(State::InHiddenBlock(block));
                State::InCategory(category)
            }
            (State::InVisibleEntry(mut span), Token::Blank) => {
                span.fields.close();
                State::InVisibleEntry(span)
            }
            (State::InVisibleEntry(mut span), Token::Other) if line.indent > span.indent => {
                span.fields.feed(&line);
                State::InVisibleEntry(span)
            }
            (State::InVisibleEntry(span), Token::Other) => {
                let category = span.category.clone();
                self.close(State::InVisibleEntry(span));
                State::InCategory(category)
            }
            (State::InCategory(name), _) => State::InCategory(name),
        };
        self.state = Some(next);
    }

    fn close(&mut self, state: State) {
        match state {
            State::Outside | State::InCategory(_) => {}
            State::InVisibleEntry(span) => self.entries.push(ScannedEntry {
                category: span.category,
                name: span.name,
                line: span.line,
                hidden_fields: None,
                layout: span.fields.finish(),
            }),
            State::InHiddenBlock(block) => {
                let entry = close_hidden(block);
                self.entries.push(entry);
            }
        }
    }

    fn finish(mut self) -> ScanReport {
        if let Some(state) = self.state.take() {
            self.close(state);
        }
        ScanReport {
            preamble: trim_blank_edges(self.preamble),
            entries: self.entries,
        }
    }
}

fn close_hidden(block: HiddenBlock) -> ScannedEntry {
    let bodies = rebase(&block.bodies);
    let mut text = bodies.join("\n");
    text.push('\n');
    let mut fields = parse_fragment(&text, &block.category, &block.name);
    if let Some(inline) = &block.inline {
        let inline_fields = parse_fragment(inline, &block.category, &block.name);
        for (key, value) in inline_fields {
            fields.entry(key).or_insert(value);
        }
    }

    let mut scan = FieldScan::default();
    for body in &bodies {
        let line = Line::parse(body);
        if line.is_blank() {
            scan.close();
        } else {
            scan.feed(&line);
        }
    }
    let mut layout = scan.finish();
    // an old-style `healthCheckDisabled: true` inside the block still counts
    if fields
        .get(HEALTH_CHECK_DISABLED_KEY)
        .is_some_and(|v| v.as_bool() == Some(true))
    {
        layout.health_check_disabled = true;
    }

    ScannedEntry {
        category: block.category,
        name: block.name,
        line: block.line,
        hidden_fields: Some(strip_reserved(fields)),
        layout,
    }
}

/// Parses a commented-out fragment. A fragment that does not parse is logged
/// and treated as empty; it never fails the surrounding load.
fn parse_fragment(text: &str, category: &str, entry: &str) -> Mapping {
    if text.trim().is_empty() {
        return Mapping::new();
    }
    match serde_yaml::from_str::<Value>(text) {
        Ok(Value::Mapping(map)) => map,
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => {
            warn!(
                "event=fragment_not_mapping category={} entry={}",
                category, entry
            );
            Mapping::new()
        }
        Err(err) => {
            warn!(
                "event=fragment_parse_failed category={} entry={} error={}",
                category, entry, err
            );
            Mapping::new()
        }
    }
}

fn trim_blank_edges(mut lines: Vec<String>) -> Vec<String> {
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.is_empty()).count();
    lines.drain(..leading);
    lines
}

/// Tracks the top-level field lines of one entry: their order, and any
/// commented health-check field with its continuation lines.
#[derive(Default)]
struct FieldScan {
    field_indent: Option<usize>,
    order: Vec<String>,
    captures: Vec<Vec<String>>,
    current: Option<Vec<String>>,
    seen_disabled: bool,
}

impl FieldScan {
    fn feed(&mut self, line: &Line) {
        let field_indent = *self.field_indent.get_or_insert(line.indent);
        if line.indent != field_indent {
            self.close();
            return;
        }

        if line.commented {
            // continuation of a commented field: nested lines and indentless
            // sequence items were commented at the field's own column, and a
            // bare marker is an empty line inside its value
            if let Some(current) = self.current.as_mut() {
                if line.body.is_empty()
                    || line.body.starts_with(' ')
                    || is_seq_item(line.body)
                {
                    current.push(line.body.to_string());
                    return;
                }
            }
            self.close();
            if let Some(key) = line.map_key().filter(|k| is_health_check_key(k)) {
                self.order.push(key);
                self.seen_disabled = true;
                self.current = Some(vec![line.body.to_string()]);
            }
            return;
        }

        self.close();
        if let Some(key) = line.map_key() {
            self.order.push(key);
        }
    }

    fn close(&mut self) {
        if let Some(lines) = self.current.take() {
            self.captures.push(lines);
        }
    }

    fn finish(mut self) -> FieldLayout {
        self.close();
        let mut disabled = Mapping::new();
        for capture in &self.captures {
            let mut text = rebase(capture).join("\n");
            text.push('\n');
            match serde_yaml::from_str::<Mapping>(&text) {
                Ok(map) => {
                    for (key, value) in map {
                        disabled.entry(key).or_insert(value);
                    }
                }
                Err(err) => warn!("event=disabled_field_parse_failed error={}", err),
            }
        }
        FieldLayout {
            order: self.order,
            disabled,
            health_check_disabled: self.seen_disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn outside_collects_preamble() {
        let report = scan("# header one\n\n# header two\n\n- Media:\n  - Emby: {}\n");
        assert_eq!(report.preamble, vec!["# header one", "", "# header two"]);
    }

    #[test]
    fn visible_entry_records_line_and_order() {
        let report = scan("- Media:\n  - Emby:\n      href: x\n      icon: y\n");
        assert_eq!(report.entries.len(), 1);
        let emby = &report.entries[0];
        assert_eq!(emby.name, "Emby");
        assert_eq!(emby.category, "Media");
        assert_eq!(emby.line, 1);
        assert!(!emby.is_hidden());
        assert_eq!(emby.layout.order, vec!["href", "icon"]);
        assert!(!emby.layout.health_check_disabled);
    }

    #[test]
    fn commented_header_opens_hidden_block() {
        let report = scan("- Media:\n  # - Plex:\n  #     href: http://y\n  #     widget:\n  #       type: plex\n");
        let plex = &report.entries[0];
        assert!(plex.is_hidden());
        assert_eq!(plex.line, 1);
        let fields = plex.hidden_fields.as_ref().unwrap();
        assert_eq!(fields.get("href"), Some(&s("http://y")));
        let widget = fields.get("widget").and_then(Value::as_mapping).unwrap();
        assert_eq!(widget.get("type"), Some(&s("plex")));
    }

    #[test]
    fn hidden_block_skips_blank_lines() {
        let report = scan("- Media:\n  # - Plex:\n  #     href: y\n\n  #     icon: p.png\n  - Emby: {}\n");
        let fields = report.entries[0].hidden_fields.clone().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(report.entries[1].name, "Emby");
        assert!(!report.entries[1].is_hidden());
    }

    #[test]
    fn hidden_block_ends_at_uncommented_line() {
        let report = scan("- Media:\n  # - Plex:\n  #     href: y\n  stray: 1\n  #     icon: p.png\n");
        let fields = report.entries[0].hidden_fields.clone().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("href"), Some(&s("y")));
    }

    #[test]
    fn hidden_block_ends_at_shallower_comment() {
        let report = scan("- Media:\n    # - Plex:\n    #     href: y\n  # unrelated note\n- Tools: []\n");
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].hidden_fields.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn hidden_block_ends_at_next_commented_header() {
        let report = scan("- Media:\n  # - A:\n  #     href: a\n  # - B:\n  #     href: b\n");
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].name, "A");
        assert_eq!(report.entries[1].name, "B");
        assert_eq!(report.entries[1].line, 3);
    }

    #[test]
    fn broken_hidden_block_yields_empty_fields() {
        let report = scan("- Media:\n  # - Plex:\n  #     href: [unclosed\n");
        assert_eq!(report.entries[0].hidden_fields, Some(Mapping::new()));
    }

    #[test]
    fn hidden_block_keeps_marked_blank_line_in_block_scalar() {
        let report = scan("- Media:\n  # - Plex:\n  #     description: |-\n  #       line1\n  #\n  #       line3\n  #     href: y\n");
        let fields = report.entries[0].hidden_fields.clone().unwrap();
        assert_eq!(fields.get("description"), Some(&s("line1\n\nline3")));
        assert_eq!(fields.get("href"), Some(&s("y")));
    }

    #[test]
    fn disabled_field_keeps_marked_blank_line() {
        let report = scan("- Media:\n  - Plex:\n      href: y\n      # ping: |-\n      #   a\n      #\n      #   b\n");
        let layout = &report.entries[0].layout;
        assert_eq!(layout.disabled.get("ping"), Some(&s("a\n\nb")));
        assert_eq!(layout.order, vec!["href", "ping"]);
    }

    #[test]
    fn hidden_and_disabled_field_keeps_marked_blank_line() {
        let report = scan("- Media:\n  # - Plex:\n  #     href: y\n  #     # ping: |-\n  #     #   a\n  #     #\n  #     #   b\n");
        let plex = &report.entries[0];
        assert!(plex.layout.health_check_disabled);
        assert_eq!(plex.layout.disabled.get("ping"), Some(&s("a\n\nb")));
    }

    #[test]
    fn hidden_inline_value_is_parsed() {
        let report = scan("- Media:\n  # - Plex: {href: y}\n  # - Emby: {}\n");
        assert_eq!(
            report.entries[0].hidden_fields.as_ref().unwrap().get("href"),
            Some(&s("y"))
        );
        assert!(report.entries[1].hidden_fields.as_ref().unwrap().is_empty());
    }

    #[test]
    fn commented_health_key_marks_visible_entry() {
        let report = scan("- Media:\n  - Emby:\n      href: x\n      # ping: http://x\n      #container: emby\n      icon: i\n");
        let layout = &report.entries[0].layout;
        assert!(layout.health_check_disabled);
        assert_eq!(layout.order, vec!["href", "ping", "container", "icon"]);
        assert_eq!(layout.disabled.get("ping"), Some(&s("http://x")));
        assert_eq!(layout.disabled.get("container"), Some(&s("emby")));
    }

    #[test]
    fn other_comments_do_not_disable() {
        let report = scan("- Media:\n  - Emby:\n      href: x\n      # description: old\n      widget:\n        # ping: nested\n");
        assert!(!report.entries[0].layout.health_check_disabled);
    }

    #[test]
    fn disabled_field_continuation_lines_are_captured() {
        let report = scan("- Media:\n  - Emby:\n      # server:\n      #   - a\n      #   - b\n      href: x\n");
        let layout = &report.entries[0].layout;
        let server = layout.disabled.get("server").and_then(Value::as_sequence).unwrap();
        assert_eq!(server.len(), 2);
    }

    #[test]
    fn free_comment_at_entry_level_closes_visible_span() {
        let report = scan("- Media:\n  - Emby:\n      href: x\n  # note\n      # ping: y\n");
        assert!(!report.entries[0].layout.health_check_disabled);
    }

    #[test]
    fn hidden_entry_with_disabled_fields() {
        let report = scan("- Media:\n  # - Plex:\n  #     href: y\n  #     # ping: http://y\n");
        let plex = &report.entries[0];
        assert!(plex.is_hidden());
        assert!(plex.layout.health_check_disabled);
        assert_eq!(plex.layout.disabled.get("ping"), Some(&s("http://y")));
        assert_eq!(plex.hidden_fields.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn reserved_keys_inside_hidden_block_are_dropped() {
        let report = scan("- Media:\n  # - Plex:\n  #     href: y\n  #     hidden: true\n");
        let fields = report.entries[0].hidden_fields.clone().unwrap();
        assert!(fields.get("hidden").is_none());
    }

    #[test]
    fn restore_keeps_original_order_and_live_values() {
        let live: Mapping = serde_yaml::from_str("href: x\nping: live\n").unwrap();
        let layout = FieldLayout {
            order: vec!["server".into(), "href".into(), "ping".into()],
            disabled: serde_yaml::from_str("server: s\nping: old\n").unwrap(),
            health_check_disabled: true,
        };
        let restored = restore_disabled(live, &layout);
        let keys: Vec<_> = restored.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["server", "href", "ping"]);
        assert_eq!(restored.get("ping"), Some(&s("live")));
    }
}
