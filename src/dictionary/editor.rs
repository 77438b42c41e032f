//! Line-oriented dictionary editor
//!
//! Entries are matched on their first token, so `tipSpeedRatio 3.1;` is
//! found wherever it sits in the file (top level or inside a sub-dictionary).
//! Only the value between the key and the terminating `;` is touched:
//! indentation, alignment and trailing comments survive an edit.

use crate::error::{IoResultExt, Result, SweepError};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Split an entry line into (prefix up to and including the gap, value, suffix from `;`)
fn split_entry<'a>(line: &'a str, key: &str) -> Option<(&'a str, &'a str, &'a str)> {
    let indent = line.len() - line.trim_start().len();
    let rest = line[indent..].strip_prefix(key)?;

    // The key must be a whole token
    let gap = rest.len() - rest.trim_start().len();
    if gap == 0 {
        return None;
    }

    let after_gap = &rest[gap..];
    let semi = after_gap.find(';')?;
    let value = &after_gap[..semi];
    if value.trim().is_empty() {
        return None;
    }

    let prefix_len = indent + key.len() + gap;
    Some((&line[..prefix_len], value, &after_gap[semi..]))
}

/// Read the first value stored under `key` in dictionary text
pub fn read_value_str(text: &str, key: &str) -> Option<String> {
    text.lines()
        .find_map(|line| split_entry(line, key))
        .map(|(_, value, _)| value.trim().to_string())
}

/// Replace every value stored under `key`, returning the new text and the
/// number of entries changed
pub fn replace_value_str(text: &str, key: &str, value: impl Display) -> (String, usize) {
    let value = value.to_string();
    let mut out = String::with_capacity(text.len() + value.len());
    let mut replaced = 0;

    for line in text.split_inclusive('\n') {
        match split_entry(line, key) {
            Some((prefix, _, suffix)) => {
                out.push_str(prefix);
                out.push_str(&value);
                out.push_str(suffix);
                replaced += 1;
            }
            None => out.push_str(line),
        }
    }

    (out, replaced)
}

/// Read the raw value of `key` from a dictionary file
pub fn read_value(path: &Path, key: &str) -> Result<String> {
    let text = std::fs::read_to_string(path).with_path(path)?;
    read_value_str(&text, key).ok_or_else(|| SweepError::key_not_found(path, key))
}

/// Read and parse a numeric value of `key` from a dictionary file
pub fn read_number<T: FromStr>(path: &Path, key: &str) -> Result<T> {
    let raw = read_value(path, key)?;
    raw.parse().map_err(|_| SweepError::InvalidValue {
        path: path.to_path_buf(),
        key: key.to_string(),
        value: raw,
    })
}

/// Replace the value of `key` in a dictionary file in place
///
/// Fails with [`SweepError::KeyNotFound`] when no entry matched, leaving the
/// file untouched.
pub fn replace_value(path: &Path, key: &str, value: impl Display) -> Result<usize> {
    let text = std::fs::read_to_string(path).with_path(path)?;
    let value = value.to_string();
    let (patched, replaced) = replace_value_str(&text, key, &value);

    if replaced == 0 {
        return Err(SweepError::key_not_found(path, key));
    }

    std::fs::write(path, patched).with_path(path)?;
    tracing::debug!("Set {} = {} in {:?} ({} entries)", key, value, path, replaced);
    Ok(replaced)
}
