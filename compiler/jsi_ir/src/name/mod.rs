//! Interned identifiers and identifier decoding.
//!
//! Identifiers reach the pass in their *encoded* form: operator characters
//! are spelled `$plus`, `$eq`, ... and arbitrary characters may be escaped as
//! `$uXXXX`. Rules that match on source-level member names compare the
//! decoded spelling.

use std::borrow::Cow;
use std::fmt;

/// Interned string identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Index into the interner's string table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Suffix the type checker appends to the private field behind a `val`.
pub const LOCAL_SUFFIX: &str = " ";

/// Suffix of setter method names (`x_=`).
pub const SETTER_SUFFIX: &str = "_=";

const OPERATOR_CODES: &[(&str, char)] = &[
    ("tilde", '~'),
    ("eq", '='),
    ("less", '<'),
    ("greater", '>'),
    ("bang", '!'),
    ("hash", '#'),
    ("percent", '%'),
    ("up", '^'),
    ("amp", '&'),
    ("bar", '|'),
    ("times", '*'),
    ("div", '/'),
    ("plus", '+'),
    ("minus", '-'),
    ("colon", ':'),
    ("bslash", '\\'),
    ("qmark", '?'),
    ("at", '@'),
];

/// Decode an encoded identifier back to its source spelling.
///
/// Unknown `$` sequences are kept verbatim. Returns the input unchanged
/// (borrowed) when it contains no `$`.
pub fn decode_name(encoded: &str) -> Cow<'_, str> {
    if !encoded.contains('$') {
        return Cow::Borrowed(encoded);
    }

    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some((len, ch)) = decode_escape(tail) {
            out.push(ch);
            rest = &tail[len..];
        } else {
            out.push('$');
            rest = tail;
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode one escape following a `$`; returns consumed length and character.
fn decode_escape(tail: &str) -> Option<(usize, char)> {
    let unicode = tail
        .strip_prefix('u')
        .and_then(|hex| hex.get(..4))
        .filter(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
        .and_then(|digits| u32::from_str_radix(digits, 16).ok())
        .and_then(char::from_u32);
    if let Some(ch) = unicode {
        return Some((5, ch));
    }
    OPERATOR_CODES
        .iter()
        .find(|(code, _)| tail.starts_with(code))
        .map(|(code, ch)| (code.len(), *ch))
}

/// Strip the local-field suffix from a field name.
pub fn getter_name(name: &str) -> &str {
    name.strip_suffix(LOCAL_SUFFIX).unwrap_or(name)
}

/// Strip the setter suffix, if present.
pub fn setter_base_name(name: &str) -> Option<&str> {
    name.strip_suffix(SETTER_SUFFIX)
}
