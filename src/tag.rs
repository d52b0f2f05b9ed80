//! Field tag parsing.
//!
//! A tag is a string of `key:"value"` pairs separated by spaces. Values are
//! double-quoted with backslash escapes; a value may hold a comma-separated
//! list, which is only split on request through [`expand`].
//!
//! Escapes follow Go string literals: the single-character escapes, `\xHH`
//! and three-digit octal bytes, `\uHHHH` and `\UHHHHHHHH`. The decoded
//! bytes must form valid UTF-8.

use std::collections::HashMap;

/// Iterator over the `(key, value)` pairs of a raw tag string.
///
/// Parsing stops silently at the first malformed pair, leaving the pairs
/// before it available.
pub struct Pairs<'t> {
    rest: &'t str,
}

impl<'t> Pairs<'t> {
    pub fn new(raw: &'t str) -> Self {
        Pairs { rest: raw }
    }
}

impl<'t> Iterator for Pairs<'t> {
    type Item = (&'t str, String);

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.rest.trim_start_matches(' ');
        if tag.is_empty() {
            self.rest = tag;
            return None;
        }

        let bytes = tag.as_bytes();
        let key_len = bytes
            .iter()
            .position(|&b| b <= b' ' || b == b':' || b == b'"' || b == 0x7f)
            .unwrap_or(bytes.len());
        if key_len == 0 || key_len + 1 >= bytes.len() || bytes[key_len] != b':' || bytes[key_len + 1] != b'"' {
            self.rest = "";
            return None;
        }
        let key = &tag[..key_len];

        // Scan the quoted value, skipping escaped characters.
        let quoted = &tag[key_len + 1..];
        let qbytes = quoted.as_bytes();
        let mut i = 1;
        while i < qbytes.len() && qbytes[i] != b'"' {
            if qbytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= qbytes.len() {
            self.rest = "";
            return None;
        }

        let Some(value) = unquote(&quoted[1..i]) else {
            self.rest = "";
            return None;
        };
        self.rest = &quoted[i + 1..];
        Some((key, value))
    }
}

fn unquote(body: &str) -> Option<String> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            push_char(&mut out, c);
            continue;
        }
        match chars.next()? {
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0b),
            '\\' => out.push(b'\\'),
            '\'' => out.push(b'\''),
            '"' => out.push(b'"'),
            'x' => out.push(u8::try_from(digits(&mut chars, 16, 2)?).ok()?),
            'u' => push_char(&mut out, char::from_u32(digits(&mut chars, 16, 4)?)?),
            'U' => push_char(&mut out, char::from_u32(digits(&mut chars, 16, 8)?)?),
            d @ '0'..='7' => {
                let rest = digits(&mut chars, 8, 2)?;
                let value = d.to_digit(8)? * 64 + rest;
                out.push(u8::try_from(value).ok()?);
            }
            _ => return None,
        }
    }
    String::from_utf8(out).ok()
}

/// Read exactly `count` digits in `radix`.
fn digits(chars: &mut std::str::Chars<'_>, radix: u32, count: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..count {
        value = value * radix + chars.next()?.to_digit(radix)?;
    }
    Some(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// Value of `key`, if present. The first occurrence of a key wins.
pub fn lookup(raw: &str, key: &str) -> Option<String> {
    Pairs::new(raw).find(|(k, _)| *k == key).map(|(_, v)| v)
}

/// All key/value pairs of a raw tag string.
pub fn parse(raw: &str) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    for (key, value) in Pairs::new(raw) {
        tags.entry(String::from(key)).or_insert(value);
    }
    tags
}

/// Split a tag value on commas. An empty value expands to no tokens.
pub fn expand(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_keys() {
        let raw = r#"tag:"be" tag2:"1,2,3""#;
        assert_eq!(lookup(raw, "tag").as_deref(), Some("be"));
        assert_eq!(lookup(raw, "tag2").as_deref(), Some("1,2,3"));
        assert_eq!(lookup(raw, "tag3"), None);
    }

    #[test]
    fn parse_all_pairs() {
        let tags = parse(r#"json:"name,omitempty"   db:"person_name""#);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags["json"], "name,omitempty");
        assert_eq!(tags["db"], "person_name");
    }

    #[test]
    fn first_duplicate_wins() {
        let raw = r#"k:"first" k:"second""#;
        assert_eq!(lookup(raw, "k").as_deref(), Some("first"));
        assert_eq!(parse(raw)["k"], "first");
    }

    #[test]
    fn escapes_are_unquoted() {
        let raw = r#"msg:"say \"hi\"\n" path:"a\\b""#;
        assert_eq!(lookup(raw, "msg").as_deref(), Some("say \"hi\"\n"));
        assert_eq!(lookup(raw, "path").as_deref(), Some("a\\b"));
    }

    #[test]
    fn numeric_escapes() {
        let raw = r#"k:"\x41\u00e9\101\U0001F600" bytes:"\xc3\xa9""#;
        assert_eq!(lookup(raw, "k").as_deref(), Some("A\u{e9}A\u{1F600}"));
        assert_eq!(lookup(raw, "bytes").as_deref(), Some("\u{e9}"));
    }

    #[test]
    fn bad_escape_stops_parsing() {
        let raw = r#"ok:"yes" bad:"\q" later:"x""#;
        assert_eq!(lookup(raw, "ok").as_deref(), Some("yes"));
        assert_eq!(lookup(raw, "later"), None);
        assert_eq!(lookup(r#"k:"\xff""#, "k"), None);
        assert_eq!(lookup(r#"k:"\u12""#, "k"), None);
    }

    #[test]
    fn malformed_tail_keeps_earlier_pairs() {
        let raw = r#"ok:"yes" broken:no other:"x""#;
        let pairs: Vec<_> = Pairs::new(raw).collect();
        assert_eq!(pairs, vec![("ok", String::from("yes"))]);
        assert_eq!(lookup(raw, "other"), None);
    }

    #[test]
    fn unterminated_value() {
        assert_eq!(lookup(r#"k:"open"#, "k"), None);
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
    }

    #[test]
    fn expand_values() {
        assert_eq!(expand("1,2,3"), vec!["1", "2", "3"]);
        assert_eq!(expand("be"), vec!["be"]);
        assert_eq!(expand("a,,b"), vec!["a", "", "b"]);
        assert!(expand("").is_empty());
    }
}
