//! Identifier codec between storage names and record store keys.
//!
//! Names are cache-safe: the characters `-`, `.` and `@` are spelled out as
//! `-dash-`, `-dot-` and `-at-`. Keys carry the real characters. A name that
//! already contains `@` is taken to be a key and passes through unchanged.

use crate::error::{OwnpadError, Result};

const REPLACEMENTS: [(&str, char); 3] = [("dash", '-'), ("dot", '.'), ("at", '@')];

/// Turn a storage name into its record store key.
///
/// Fails with [`OwnpadError::Codec`] when an escaped token is not one of
/// `dash`, `dot` or `at`.
pub fn encode(name: &str) -> Result<String> {
    if name.contains('@') {
        return Ok(name.to_string());
    }

    let mut key = String::with_capacity(name.len());
    for (i, part) in name.split('-').enumerate() {
        if i % 2 == 0 {
            key.push_str(part);
            continue;
        }
        let replacement = REPLACEMENTS
            .iter()
            .find(|(token, _)| *token == part)
            .map(|(_, c)| *c)
            .ok_or_else(|| {
                OwnpadError::Codec(format!("unknown escape `{part}` in `{name}`"))
            })?;
        key.push(replacement);
    }
    Ok(key)
}

/// Turn a record store key back into a cache-safe storage name.
pub fn decode(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for c in key.chars() {
        match REPLACEMENTS.iter().find(|(_, r)| *r == c) {
            Some((token, _)) => {
                name.push('-');
                name.push_str(token);
                name.push('-');
            }
            None => name.push(c),
        }
    }
    name
}
