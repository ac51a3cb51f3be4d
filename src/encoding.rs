//! UTF-32 conversions for text handed to or read from text entries

use crate::error::{Error, Result};

/// Returns the UTF-32 representation of `s`: one code unit per character, in order
///
/// An empty string gives an empty vector
pub fn utf32(s: &str) -> Vec<u32> {
    s.chars().map(u32::from).collect()
}

/// Decodes UTF-32 code units back into a string
///
/// Fails on the first unit that is a surrogate or lies past U+10FFFF
pub fn from_utf32(units: &[u32]) -> Result<String> {
    units
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            char::from_u32(value).ok_or(Error::InvalidCodePoint { index, value })
        })
        .collect()
}
