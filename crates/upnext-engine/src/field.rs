//! Content line splitting: `NAME;PARAM=VALUE;...:VALUE`, plus TEXT unescaping.

use std::borrow::Cow;

/// One parsed content line.
///
/// `name` and parameter keys are upper-cased; parameter values have surrounding
/// double quotes removed but are otherwise untouched. `value` is everything after
/// the first colon that is not inside a quoted parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    pub name: String,
    pub params: Vec<(String, String)>,
    pub value: &'a str,
}

impl Field<'_> {
    /// First value of parameter `key` (case-insensitive).
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The `TZID` parameter, if present and non-blank.
    pub fn tzid(&self) -> Option<&str> {
        self.param("TZID").filter(|tz| !tz.trim().is_empty())
    }
}

/// Split a logical line into name, parameters and value.
///
/// Returns `None` when the line has no colon separator; such lines are not fields.
pub fn parse_field(line: &str) -> Option<Field<'_>> {
    let colon = find_value_separator(line)?;
    let head = &line[..colon];
    let value = &line[colon + 1..];

    let mut segments = split_params(head).into_iter();
    let name = segments.next().unwrap_or_default().trim().to_ascii_uppercase();

    let params = segments
        .filter(|seg| !seg.is_empty())
        .map(|seg| match seg.split_once('=') {
            Some((key, val)) => (key.trim().to_ascii_uppercase(), unquote(val).to_string()),
            None => (seg.trim().to_ascii_uppercase(), String::new()),
        })
        .collect();

    Some(Field {
        name,
        params,
        value,
    })
}

/// Byte offset of the first `:` outside double quotes.
fn find_value_separator(line: &str) -> Option<usize> {
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ':' if !quoted => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split `NAME;K=V;K="a;b"` on semicolons that are not inside quotes.
fn split_params(head: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in head.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' if !quoted => {
                parts.push(&head[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&head[start..]);
    parts
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Decode RFC 5545 TEXT escapes: `\n`/`\N`, `\,`, `\;` and `\\`.
///
/// Unknown escapes are kept as-is, backslash included.
pub fn unescape_text(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('n' | 'N') => {
                out.push('\n');
                chars.next();
            }
            Some(&escaped @ (',' | ';' | '\\')) => {
                out.push(escaped);
                chars.next();
            }
            _ => out.push('\\'),
        }
    }
    Cow::Owned(out)
}
