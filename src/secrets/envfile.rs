//! Minimal .env file parsing and formatting for import-env/export-env.

/// Parse env-file contents into (key, value) pairs.
///
/// Blank lines and `#` comments are skipped; a leading `export ` prefix and
/// single/double quotes around the value are stripped. Later entries win on
/// duplicate keys.
pub fn parse(contents: &str) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let value = unquote(value.trim());

        if let Some(existing) = entries.iter_mut().find(|(k, _)| k == key) {
            existing.1 = value;
        } else {
            entries.push((key.to_string(), value));
        }
    }

    entries
}

/// Format (key, value) pairs as env-file contents.
///
/// Values with characters the line-based syntax cannot carry verbatim are
/// written double-quoted, with backslash escapes for backslash, double
/// quote and newline. `parse` reverses those escapes.
pub fn format(entries: &[(String, String)]) -> String {
    let mut out = String::new();
    for (key, value) in entries {
        if needs_quoting(value) {
            out.push_str(&format!("{}=\"{}\"\n", key, escape(value)));
        } else {
            out.push_str(&format!("{}={}\n", key, value));
        }
    }
    out
}

fn needs_quoting(value: &str) -> bool {
    value.contains(' ')
        || value.contains('#')
        || value.contains('"')
        || value.contains('\'')
        || value.contains('\\')
        || value.contains('\n')
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Strip surrounding quotes. Double-quoted values are unescaped;
/// single-quoted values are taken literally.
fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == b'"' && last == b'"' {
            return unescape(&value[1..value.len() - 1]);
        }
        if first == b'\'' && last == b'\'' {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let entries = parse("SNOWFLAKE_USER=admin\nSNOWFLAKE_PASSWORD=hunter2\n");
        assert_eq!(
            entries,
            vec![
                ("SNOWFLAKE_USER".to_string(), "admin".to_string()),
                ("SNOWFLAKE_PASSWORD".to_string(), "hunter2".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let entries = parse("# credentials\n\nGONG_API_KEY=abc\n");
        assert_eq!(entries, vec![("GONG_API_KEY".to_string(), "abc".to_string())]);
    }

    #[test]
    fn test_parse_strips_export_and_quotes() {
        let entries = parse("export OPENAI_API_KEY=\"sk-123\"\nPINECONE_API_KEY='pk-9'\n");
        assert_eq!(
            entries,
            vec![
                ("OPENAI_API_KEY".to_string(), "sk-123".to_string()),
                ("PINECONE_API_KEY".to_string(), "pk-9".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let entries = parse("KEY=first\nKEY=second\n");
        assert_eq!(entries, vec![("KEY".to_string(), "second".to_string())]);
    }

    #[test]
    fn test_parse_ignores_lines_without_equals() {
        let entries = parse("not a var\nKEY=value\n");
        assert_eq!(entries, vec![("KEY".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_format_quotes_values_with_spaces() {
        let contents = format(&[
            ("A".to_string(), "plain".to_string()),
            ("B".to_string(), "two words".to_string()),
        ]);
        assert_eq!(contents, "A=plain\nB=\"two words\"\n");
    }

    #[test]
    fn test_roundtrip() {
        let original = vec![
            ("SNOWFLAKE_USER".to_string(), "admin".to_string()),
            ("SNOWFLAKE_PASSWORD".to_string(), "p w".to_string()),
        ];
        assert_eq!(parse(&format(&original)), original);
    }

    #[test]
    fn test_roundtrip_escapes_quotes_backslashes_and_newlines() {
        let original = vec![
            ("A".to_string(), "with \"quotes\"".to_string()),
            ("B".to_string(), "back\\slash".to_string()),
            ("C".to_string(), "two\nlines".to_string()),
        ];
        assert_eq!(parse(&format(&original)), original);
    }

    #[test]
    fn test_format_writes_escaped_value_on_one_line() {
        let contents = format(&[("KEY".to_string(), "a\nb".to_string())]);
        assert_eq!(contents, "KEY=\"a\\nb\"\n");
    }

    #[test]
    fn test_parse_single_quotes_are_literal() {
        let entries = parse(r"KEY='a\nb'");
        assert_eq!(entries, vec![("KEY".to_string(), "a\\nb".to_string())]);
    }
}
