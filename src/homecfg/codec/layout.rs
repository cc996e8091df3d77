//! Line-level view of a services file shared by the scanner and the rewriter.
//!
//! Nothing here assumes absolute columns. A category's entry indentation is
//! learned from its first sequence item (commented or not) and every later
//! entry header of that category must sit at exactly that column. Anything
//! deeper belongs to the current entry.

/// Width of one indentation level in files we write.
pub const INDENT_WIDTH: usize = 2;

/// Marker that turns a line into hidden or disabled state.
pub const COMMENT_MARKER: char = '#';

/// A raw line split into indentation, comment marker and body.
///
/// For a commented line the body is what follows the first `#` and at most
/// one space, so `  #     href: x` has indent 2 and body `    href: x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub raw: &'a str,
    pub indent: usize,
    pub commented: bool,
    pub body: &'a str,
}

impl<'a> Line<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let trimmed = raw.trim_start_matches(' ');
        let indent = raw.len() - trimmed.len();
        match trimmed.strip_prefix(COMMENT_MARKER) {
            Some(rest) => Line {
                raw,
                indent,
                commented: true,
                body: rest.strip_prefix(' ').unwrap_or(rest),
            },
            None => Line {
                raw,
                indent,
                commented: false,
                body: trimmed,
            },
        }
    }

    pub fn is_blank(&self) -> bool {
        !self.commented && self.body.trim().is_empty()
    }

    /// Key of a `- Key:` sequence item, if the body is one.
    pub fn item_key(&self) -> Option<String> {
        let rest = self.body.strip_prefix("- ")?;
        parse_key(rest.trim_start()).map(|(key, _)| key)
    }

    /// Inline value following the key of a `- Key: value` item.
    pub fn item_inline_value(&self) -> Option<&'a str> {
        let rest = self.body.strip_prefix("- ")?;
        parse_key(rest.trim_start())
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
    }

    /// Key of a `Key: ...` mapping line, if the body starts with one.
    pub fn map_key(&self) -> Option<String> {
        if is_seq_item(self.body) {
            return None;
        }
        parse_key(self.body).map(|(key, _)| key)
    }
}

/// `- x`, `-` and friends: a block sequence item.
pub fn is_seq_item(body: &str) -> bool {
    body == "-" || body.starts_with("- ")
}

/// Splits `key: rest` into the unquoted key and the trimmed rest.
///
/// Handles plain keys and single/double quoted keys; returns `None` for
/// anything that is not a block mapping key (flow collections, comments,
/// bare scalars).
pub fn parse_key(text: &str) -> Option<(String, &str)> {
    let first = text.chars().next()?;
    if first.is_whitespace() || matches!(first, '#' | '{' | '[' | '?' | '|' | '>') {
        return None;
    }

    let (key, after) = if first == '\'' || first == '"' {
        let end = closing_quote(text, first)?;
        let key: String = serde_yaml::from_str(&text[..=end]).ok()?;
        (key, &text[end + 1..])
    } else {
        let end = plain_key_end(text)?;
        let key = text[..end].trim_end();
        if key.is_empty() {
            return None;
        }
        (key.to_string(), &text[end..])
    };

    let value = after.strip_prefix(':')?;
    if !(value.is_empty() || value.starts_with(' ')) {
        return None;
    }
    Some((key, value.trim()))
}

fn plain_key_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    for (idx, &b) in bytes.iter().enumerate() {
        if b == b'#' && idx > 0 && bytes[idx - 1] == b' ' {
            return None;
        }
        if b == b':' && (idx + 1 == bytes.len() || bytes[idx + 1] == b' ') {
            return Some(idx);
        }
    }
    None
}

fn closing_quote(text: &str, quote: char) -> Option<usize> {
    let bytes = text.as_bytes();
    let quote = quote as u8;
    let mut idx = 1;
    while idx < bytes.len() {
        let b = bytes[idx];
        if quote == b'"' && b == b'\\' {
            idx += 2;
            continue;
        }
        if b == quote {
            // '' is an escaped quote inside a single-quoted scalar
            if quote == b'\'' && bytes.get(idx + 1) == Some(&b'\'') {
                idx += 2;
                continue;
            }
            return Some(idx);
        }
        idx += 1;
    }
    None
}

/// Inserts `# ` at `column`, keeping everything after it as the body.
pub fn comment_at(line: &str, column: usize) -> String {
    let column = column.min(line.len() - line.trim_start_matches(' ').len());
    format!("{}{} {}", &line[..column], COMMENT_MARKER, &line[column..])
}

/// Removes the common leading indentation of the non-empty lines.
pub fn rebase(lines: &[String]) -> Vec<String> {
    let base = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l[base..].to_string()
            }
        })
        .collect()
}

/// Top-level layout of the file, decided by its first category header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `- Category:` at column 0.
    Sequence,
    /// `Category:` at column 0.
    Mapping,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Blank,
    Category(String),
    Entry { name: String, commented: bool },
    Other,
}

/// Walks lines in order and tells category headers and entry headers apart
/// from everything else.
#[derive(Debug, Default)]
pub struct Cursor {
    shape: Option<Shape>,
    category: Option<String>,
    entry_indent: Option<usize>,
}

impl Cursor {
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn entry_indent(&self) -> Option<usize> {
        self.entry_indent
    }

    pub fn classify(&mut self, line: &Line) -> Token {
        if line.is_blank() {
            return Token::Blank;
        }

        if !line.commented && line.indent == 0 {
            let header = match self.shape {
                None => line
                    .item_key()
                    .map(|name| (Shape::Sequence, name))
                    .or_else(|| line.map_key().map(|name| (Shape::Mapping, name))),
                Some(Shape::Sequence) => line.item_key().map(|name| (Shape::Sequence, name)),
                Some(Shape::Mapping) => line.map_key().map(|name| (Shape::Mapping, name)),
            };
            if let Some((shape, name)) = header {
                self.shape = Some(shape);
                self.category = Some(name.clone());
                self.entry_indent = None;
                return Token::Category(name);
            }
        }

        if self.category.is_some() {
            if let Some(name) = line.item_key() {
                let at_entry_level = match self.entry_indent {
                    Some(indent) => line.indent == indent,
                    None => line.indent > 0 || self.shape == Some(Shape::Mapping),
                };
                if at_entry_level {
                    self.entry_indent = Some(line.indent);
                    return Token::Entry {
                        name,
                        commented: line.commented,
                    };
                }
            }
        }

        Token::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commented_line() {
        let line = Line::parse("  #     href: x");
        assert_eq!(line.indent, 2);
        assert!(line.commented);
        assert_eq!(line.body, "    href: x");

        let tight = Line::parse("      #ping: x");
        assert_eq!(tight.indent, 6);
        assert_eq!(tight.body, "ping: x");
    }

    #[test]
    fn item_and_map_keys() {
        assert_eq!(Line::parse("  - Emby:").item_key().as_deref(), Some("Emby"));
        assert_eq!(Line::parse("  # - Emby: {}").item_key().as_deref(), Some("Emby"));
        assert_eq!(Line::parse("      - a").item_key(), None);
        assert_eq!(Line::parse("ping: http://x:80").map_key().as_deref(), Some("ping"));
        assert_eq!(Line::parse("- Emby:").map_key(), None);
        assert_eq!(Line::parse("  - Home Assistant:").item_key().as_deref(), Some("Home Assistant"));
    }

    #[test]
    fn quoted_keys_are_unquoted() {
        assert_eq!(parse_key("'8080':").map(|(k, _)| k).as_deref(), Some("8080"));
        assert_eq!(parse_key("'it''s': x").map(|(k, _)| k).as_deref(), Some("it's"));
        assert_eq!(parse_key("\"a: b\": {}").map(|(k, v)| (k, v.to_string())), Some(("a: b".to_string(), "{}".to_string())));
    }

    #[test]
    fn rejects_non_keys() {
        assert!(parse_key("http://x").is_none());
        assert!(parse_key("{a: 1}").is_none());
        assert!(parse_key("just words").is_none());
        assert!(parse_key("text # not: a key").is_none());
    }

    #[test]
    fn comment_at_keeps_relative_indent() {
        assert_eq!(comment_at("      href: x", 2), "  #     href: x");
        assert_eq!(comment_at("      ping: x", 6), "      # ping: x");
        assert_eq!(comment_at("  - Plex:", 2), "  # - Plex:");
    }

    #[test]
    fn rebase_strips_common_indent() {
        let lines = vec!["    href: x".to_string(), String::new(), "    widget:".to_string(), "      type: emby".to_string()];
        assert_eq!(rebase(&lines), vec!["href: x", "", "widget:", "  type: emby"]);
    }

    fn tokens(text: &str) -> Vec<Token> {
        let mut cursor = Cursor::default();
        text.lines().map(|l| cursor.classify(&Line::parse(l))).collect()
    }

    #[test]
    fn cursor_sequence_shape() {
        let toks = tokens("- Media:\n  - Emby:\n      list:\n      - a: 1\n  # - Plex:\n  #     href: y\n- Tools: []\n");
        assert_eq!(toks[0], Token::Category("Media".into()));
        assert_eq!(toks[1], Token::Entry { name: "Emby".into(), commented: false });
        assert_eq!(toks[2], Token::Other);
        assert_eq!(toks[3], Token::Other);
        assert_eq!(toks[4], Token::Entry { name: "Plex".into(), commented: true });
        assert_eq!(toks[5], Token::Other);
        assert_eq!(toks[6], Token::Category("Tools".into()));
    }

    #[test]
    fn cursor_learns_entry_indent_per_category() {
        let mut cursor = Cursor::default();
        for line in ["- Media:", "    - Emby:"] {
            cursor.classify(&Line::parse(line));
        }
        assert_eq!(cursor.entry_indent(), Some(4));
        // a shallower item is not an entry of this category
        assert_eq!(cursor.classify(&Line::parse("  - Stray:")), Token::Other);
        cursor.classify(&Line::parse("- Tools:"));
        assert_eq!(cursor.entry_indent(), None);
        assert_eq!(cursor.category(), Some("Tools"));
    }

    #[test]
    fn cursor_mapping_shape_with_flush_entries() {
        let toks = tokens("Media:\n- Emby:\n    href: x\n# - Plex:\n#     href: y\nTools: []\n");
        assert_eq!(toks[0], Token::Category("Media".into()));
        assert_eq!(toks[1], Token::Entry { name: "Emby".into(), commented: false });
        assert_eq!(toks[3], Token::Entry { name: "Plex".into(), commented: true });
        assert_eq!(toks[5], Token::Category("Tools".into()));
    }

    #[test]
    fn comments_before_first_category_are_other() {
        let toks = tokens("# - Fake:\n- Media:\n");
        assert_eq!(toks[0], Token::Other);
        assert_eq!(toks[1], Token::Category("Media".into()));
    }
}
