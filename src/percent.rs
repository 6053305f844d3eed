//! Percent-encoding helpers shared by key values and query parameters.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when rendering a key value back into a path segment.
const KEY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b',')
    .add(b'/')
    .add(b'?')
    .add(b'[')
    .add(b']');

/// Characters escaped inside a quoted key value, where commas need no escape.
const QUOTED_KEY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?');

/// Characters escaped when rendering a query value.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Returns true if every `%` is followed by two hex digits.
pub(crate) fn is_well_formed(input: &str) -> bool {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3);
            if !matches!(hex, Some([a, b]) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit()) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Decodes percent escapes, rejecting malformed escapes and non-UTF-8 output.
pub(crate) fn decode(input: &str) -> Option<Cow<'_, str>> {
    if !is_well_formed(input) {
        return None;
    }
    percent_decode_str(input).decode_utf8().ok()
}

/// Decodes percent escapes, flagging each output character that came from an escape.
pub(crate) fn decode_marked(input: &str) -> Option<Vec<(char, bool)>> {
    if !is_well_formed(input) {
        return None;
    }

    let decoded = String::from_utf8(percent_decode_str(input).collect()).ok()?;

    // One flag per decoded byte.
    let raw = input.as_bytes();
    let mut escaped = Vec::with_capacity(decoded.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            escaped.push(true);
            i += 3;
        } else {
            escaped.push(false);
            i += 1;
        }
    }

    Some(
        decoded
            .char_indices()
            .map(|(idx, c)| (c, escaped.get(idx).copied().unwrap_or(false)))
            .collect(),
    )
}

/// Encodes a key value for use inside a list-instance segment.
pub(crate) fn encode_key(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, KEY_VALUE).into()
}

/// Encodes the body of a quoted key value.
pub(crate) fn encode_quoted_key(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, QUOTED_KEY_VALUE).into()
}

/// Encodes a query parameter value.
pub(crate) fn encode_query(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, QUERY_VALUE).into()
}
