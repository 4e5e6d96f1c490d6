use base64::{prelude::BASE64_STANDARD, Engine};
use tessera_types::Uuid;

use super::{BASE64_ENCODING, ROOT};
use crate::{
    codec::{cursor::Cursor, CodecOptions, DecodeError, DecodeErrorKind},
    value::*,
};

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &[u8] = b"-->";
const CDATA_OPEN: &[u8] = b"<![CDATA[";
const CDATA_CLOSE: &[u8] = b"]]>";

enum Tag<'a> {
    Start {
        name: &'a str,
        attrs: &'a str,
        empty: bool,
    },
    End {
        name: &'a str,
    },
}

pub fn decode(text: &str, options: &CodecOptions) -> Result<Value, DecodeError> {
    log::debug!("Decoding {} bytes of text data with {options:?}", text.len());

    let mut de = Decoder {
        cursor: Cursor::new(text.as_bytes()),
        depth: options.effective_recursion_limit(),
    };

    de.skip_misc()?;
    let at = de.cursor.pos();
    let value = match de.tag()? {
        Tag::Start {
            name: ROOT,
            empty: true,
            ..
        } => Value::Unknown,
        Tag::Start { name: ROOT, .. } => {
            de.skip_misc()?;
            let value = if de.cursor.starts_with(b"</") {
                Value::Unknown
            } else {
                de.value()?
            };
            de.end_tag(ROOT)?;
            value
        }
        Tag::Start { name, .. } => {
            return Err(DecodeError::new(
                at,
                DecodeErrorKind::UnexpectedElement(name.to_owned()),
            ));
        }
        Tag::End { .. } => {
            return Err(DecodeError::new(
                at,
                DecodeErrorKind::Syntax("expected root element"),
            ));
        }
    };

    de.skip_misc()?;
    if !de.cursor.is_empty() {
        return Err(de.cursor.error(DecodeErrorKind::TrailingBytes));
    }

    log::debug!("Decoded text {} value", value.kind());
    Ok(value)
}

struct Decoder<'a> {
    cursor: Cursor<'a>,
    depth: u16,
}

impl<'a> Decoder<'a> {
    fn with_recursion_limit<F, T>(&mut self, f: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&mut Self) -> Result<T, DecodeError>,
    {
        if self.depth == 0 {
            return Err(self.cursor.error(DecodeErrorKind::Recursion));
        }

        self.depth -= 1;
        let res = f(self);
        self.depth += 1;

        res
    }

    fn str_between(&self, start: usize, end: usize) -> Result<&'a str, DecodeError> {
        std::str::from_utf8(self.cursor.slice(start, end))
            .map_err(|e| DecodeError::new(start + e.valid_up_to(), DecodeErrorKind::InvalidUtf8))
    }

    fn skip_whitespace(&mut self) {
        while self.cursor.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.cursor.skip(1);
        }
    }

    /// Advances past the next occurrence of `pattern` and returns the
    /// offset at which it starts.
    fn skip_past(&mut self, pattern: &[u8]) -> Result<usize, DecodeError> {
        match self
            .cursor
            .rest()
            .windows(pattern.len())
            .position(|w| w == pattern)
        {
            Some(found) => {
                let at = self.cursor.pos() + found;
                self.cursor.skip(found + pattern.len());
                Ok(at)
            }
            None => Err(self.cursor.error(DecodeErrorKind::Syntax(
                "unterminated comment or declaration",
            ))),
        }
    }

    /// Skips whitespace, comments, processing instructions and document
    /// type declarations.
    fn skip_misc(&mut self) -> Result<(), DecodeError> {
        loop {
            self.skip_whitespace();

            if self.cursor.starts_with(b"<?") {
                self.skip_past(b"?>")?;
            } else if self.cursor.starts_with(COMMENT_OPEN) {
                self.skip_past(COMMENT_CLOSE)?;
            } else if self.cursor.starts_with(b"<!DOCTYPE") {
                self.skip_past(b">")?;
            } else {
                return Ok(());
            }
        }
    }

    fn tag(&mut self) -> Result<Tag<'a>, DecodeError> {
        let at = self.cursor.pos();
        if self.cursor.byte()? != b'<' {
            return Err(DecodeError::new(at, DecodeErrorKind::Syntax("expected '<'")));
        }

        let closing = self.cursor.peek() == Some(b'/');
        if closing {
            self.cursor.skip(1);
        }

        // Scan to the closing '>', which may also appear in quoted
        // attribute values.
        let start = self.cursor.pos();
        let mut quote = None;
        loop {
            match (quote, self.cursor.byte()?) {
                (None, b'>') => break,
                (None, q @ (b'"' | b'\'')) => quote = Some(q),
                (Some(q), b) if b == q => quote = None,
                _ => {}
            }
        }

        let body = self.str_between(start, self.cursor.pos() - 1)?;
        let (body, empty) = match body.strip_suffix('/') {
            Some(body) => (body, true),
            None => (body, false),
        };
        let body = body.trim_end();
        let (name, attrs) = body
            .split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((body, ""));

        if name.is_empty() {
            return Err(DecodeError::new(
                at,
                DecodeErrorKind::Syntax("missing element name"),
            ));
        }

        if closing {
            if empty || !attrs.is_empty() {
                return Err(DecodeError::new(
                    at,
                    DecodeErrorKind::Syntax("malformed end tag"),
                ));
            }
            Ok(Tag::End { name })
        } else {
            Ok(Tag::Start { name, attrs, empty })
        }
    }

    fn end_tag(&mut self, expected: &str) -> Result<(), DecodeError> {
        self.skip_misc()?;

        let at = self.cursor.pos();
        match self.tag()? {
            Tag::End { name } if name == expected => Ok(()),
            Tag::End { name } => Err(DecodeError::new(
                at,
                DecodeErrorKind::MismatchedEndTag {
                    expected: expected.to_owned(),
                    found: name.to_owned(),
                },
            )),
            Tag::Start { name, .. } => Err(DecodeError::new(
                at,
                DecodeErrorKind::UnexpectedElement(name.to_owned()),
            )),
        }
    }

    /// Reads character data up to the next tag, resolving entity
    /// references and CDATA sections.
    fn text(&mut self) -> Result<String, DecodeError> {
        let mut out = String::new();
        loop {
            let start = self.cursor.pos();
            while self.cursor.peek().is_some_and(|b| b != b'<') {
                self.cursor.skip(1);
            }
            let raw = self.str_between(start, self.cursor.pos())?;
            unescape_into(&mut out, raw, start)?;

            if self.cursor.starts_with(CDATA_OPEN) {
                self.cursor.skip(CDATA_OPEN.len());
                let start = self.cursor.pos();
                let end = self.skip_past(CDATA_CLOSE)?;
                out.push_str(self.str_between(start, end)?);
            } else if self.cursor.starts_with(COMMENT_OPEN) {
                self.skip_past(COMMENT_CLOSE)?;
            } else if self.cursor.is_empty() {
                return Err(self
                    .cursor
                    .error(DecodeErrorKind::UnexpectedEof { need: 1 }));
            } else {
                return Ok(out);
            }
        }
    }

    /// Reads the content of a scalar element along with its offset.
    fn content(&mut self, name: &str, empty: bool) -> Result<(usize, String), DecodeError> {
        let at = self.cursor.pos();
        if empty {
            return Ok((at, String::new()));
        }

        let text = self.text()?;
        self.end_tag(name)?;
        Ok((at, text))
    }

    fn value(&mut self) -> Result<Value, DecodeError> {
        self.skip_misc()?;

        let at = self.cursor.pos();
        let (name, attrs, empty) = match self.tag()? {
            Tag::Start { name, attrs, empty } => (name, attrs, empty),
            Tag::End { name } => {
                return Err(DecodeError::new(
                    at,
                    DecodeErrorKind::UnexpectedElement(format!("/{name}")),
                ));
            }
        };

        let value = match name {
            "undef" => {
                if !empty {
                    self.end_tag(name)?;
                }
                Value::Unknown
            }

            "boolean" => {
                let (at, text) = self.content(name, empty)?;
                match text.trim() {
                    "" | "false" | "0" => Value::Boolean(false),
                    "true" | "1" => Value::Boolean(true),
                    _ => return Err(invalid_literal(at, Kind::Boolean, text)),
                }
            }

            "integer" => {
                let (at, text) = self.content(name, empty)?;
                match text.trim() {
                    "" => Value::Integer(0),
                    t => match t.parse() {
                        Ok(v) => Value::Integer(v),
                        Err(_) => return Err(invalid_literal(at, Kind::Integer, text)),
                    },
                }
            }

            "real" => {
                let (at, text) = self.content(name, empty)?;
                if text.trim().is_empty() {
                    Value::Real(0.0)
                } else {
                    match parse_real(&text) {
                        Some(v) => Value::Real(v),
                        None => return Err(invalid_literal(at, Kind::Real, text)),
                    }
                }
            }

            "string" => Value::String(self.content(name, empty)?.1),

            "uuid" => {
                let (at, text) = self.content(name, empty)?;
                if text.trim().is_empty() {
                    Value::Uuid(Uuid::ZERO)
                } else {
                    match Uuid::parse(&text) {
                        Ok(v) => Value::Uuid(v),
                        Err(_) => return Err(invalid_literal(at, Kind::Uuid, text)),
                    }
                }
            }

            "date" => {
                let (at, text) = self.content(name, empty)?;
                if text.trim().is_empty() {
                    Value::Date(epoch())
                } else {
                    match parse_date(&text) {
                        Some(v) => Value::Date(v),
                        None => return Err(invalid_literal(at, Kind::Date, text)),
                    }
                }
            }

            "uri" => Value::Uri(Uri::parse(&self.content(name, empty)?.1)),

            "binary" => {
                if let Some(encoding) = attribute(attrs, "encoding") {
                    if !encoding.eq_ignore_ascii_case(BASE64_ENCODING) {
                        return Err(DecodeError::new(
                            at,
                            DecodeErrorKind::UnsupportedEncoding(encoding.to_owned()),
                        ));
                    }
                }

                let (at, text) = self.content(name, empty)?;
                let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                match BASE64_STANDARD.decode(compact) {
                    Ok(v) => Value::Binary(v),
                    Err(_) => return Err(invalid_literal(at, Kind::Binary, text)),
                }
            }

            "map" if empty => Value::Map(Map::new()),
            "map" => Value::Map(self.with_recursion_limit(Self::map)?),

            "array" if empty => Value::Array(Array::new()),
            "array" => Value::Array(self.with_recursion_limit(Self::array)?),

            _ => {
                return Err(DecodeError::new(
                    at,
                    DecodeErrorKind::UnexpectedElement(name.to_owned()),
                ));
            }
        };

        Ok(value)
    }

    fn map(&mut self) -> Result<Map, DecodeError> {
        log::trace!("Decoding map at offset {}", self.cursor.pos());

        let mut map = Map::new();
        loop {
            self.skip_misc()?;
            if self.cursor.starts_with(b"</") {
                self.end_tag(Kind::Map.name())?;
                return Ok(map);
            }

            let at = self.cursor.pos();
            let key = match self.tag()? {
                Tag::Start {
                    name: "key",
                    empty: true,
                    ..
                } => String::new(),
                Tag::Start { name: "key", .. } => {
                    let key = self.text()?;
                    self.end_tag("key")?;
                    key
                }
                Tag::Start { name, .. } => {
                    return Err(DecodeError::new(
                        at,
                        DecodeErrorKind::UnexpectedElement(name.to_owned()),
                    ));
                }
                Tag::End { .. } => {
                    return Err(DecodeError::new(
                        at,
                        DecodeErrorKind::Syntax("expected map key"),
                    ));
                }
            };

            let value = self.value()?;
            if let Some(old) = map.insert(key.as_str(), value) {
                log::debug!(
                    "Duplicate map key {key:?} at offset {at}, replacing {} value",
                    old.kind()
                );
            }
        }
    }

    fn array(&mut self) -> Result<Array, DecodeError> {
        log::trace!("Decoding array at offset {}", self.cursor.pos());

        let mut array = Array::new();
        loop {
            self.skip_misc()?;
            if self.cursor.starts_with(b"</") {
                self.end_tag(Kind::Array.name())?;
                return Ok(array);
            }

            array.push(self.value()?);
        }
    }
}

fn invalid_literal(at: usize, kind: Kind, text: String) -> DecodeError {
    DecodeError::new(at, DecodeErrorKind::InvalidLiteral { kind, text })
}

/// Finds the value of attribute `wanted` in the raw attribute list of a
/// start tag.
fn attribute<'t>(attrs: &'t str, wanted: &str) -> Option<&'t str> {
    let mut rest = attrs.trim_start();
    while !rest.is_empty() {
        let (name, after) = rest.split_once('=')?;
        let after = after.trim_start();

        let quote = after.chars().next().filter(|&c| c == '"' || c == '\'')?;
        let (value, tail) = after[1..].split_once(quote)?;
        if name.trim() == wanted {
            return Some(value);
        }

        rest = tail.trim_start();
    }

    None
}

fn unescape_into(out: &mut String, raw: &str, base: usize) -> Result<(), DecodeError> {
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);

        let offset = base + (raw.len() - rest.len()) + amp;
        let after = &rest[amp + 1..];
        let Some(semi) = after.find(';') else {
            return Err(DecodeError::new(
                offset,
                DecodeErrorKind::Syntax("unterminated entity reference"),
            ));
        };

        let name = &after[..semi];
        let c = match name {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => character_reference(name).ok_or_else(|| {
                DecodeError::new(offset, DecodeErrorKind::UnknownEntity(name.to_owned()))
            })?,
        };
        out.push(c);

        rest = &after[semi + 1..];
    }

    out.push_str(rest);
    Ok(())
}

fn character_reference(name: &str) -> Option<char> {
    let number = name.strip_prefix('#')?;
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse().ok()?,
    };

    char::from_u32(code)
}
