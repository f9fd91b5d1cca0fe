//! Text sanitizing for feed fields.
//!
//! Field values are reduced to [`plain_text`] when an entry is built and
//! go through [`escape_text`] when it is written out.

use std::borrow::Cow;

/// Strip markup and trim surrounding whitespace.
pub fn plain_text(s: &str) -> String {
    strip_tags(s).trim().to_string()
}

/// Drop characters XML 1.0 cannot carry, then escape metacharacters.
pub fn escape_text(s: &str) -> String {
    escape_xml(&drop_illegal_chars(s)).into_owned()
}

/// Remove markup tags, comments and processing instructions.
///
/// A `<` only opens a tag when followed by a letter, `/`, `!` or `?`;
/// otherwise it is kept as text (`a < b`). Quoted attribute values may
/// contain `>`. An unterminated tag swallows the rest of the input.
pub fn strip_tags(s: &str) -> Cow<'_, str> {
    if !s.contains('<') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '<' || !opens_tag(chars.peek().map(|&(_, next)| next)) {
            out.push(c);
            continue;
        }

        if s[i..].starts_with("<!--") {
            match s[i + 4..].find("-->") {
                Some(end) => {
                    let stop = i + 4 + end + 3;
                    while chars.peek().is_some_and(|&(j, _)| j < stop) {
                        chars.next();
                    }
                    continue;
                }
                None => break,
            }
        }

        let mut quote: Option<char> = None;
        let mut closed = false;
        for (_, t) in chars.by_ref() {
            match (quote, t) {
                (Some(q), t) if t == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(t),
                (None, '>') => {
                    closed = true;
                    break;
                }
                (None, _) => {}
            }
        }
        if !closed {
            break;
        }
    }

    Cow::Owned(out)
}

#[inline]
fn opens_tag(next: Option<char>) -> bool {
    matches!(next, Some(c) if c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Drop characters outside the XML 1.0 `Char` production.
fn drop_illegal_chars(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|&c| is_xml_char(c)).collect())
}

#[inline]
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
