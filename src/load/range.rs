use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z]{1,3})\s*(?::\s*([A-Za-z]{1,3})\s*)?$").unwrap());

/// Inclusive, zero-based column span parsed from spreadsheet notation (`"A:F"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnRange {
    pub first: usize,
    pub last: usize,
}

impl ColumnRange {
    pub fn new(first: usize, last: usize) -> Result<Self> {
        if first > last {
            return Err(Error::InvalidRange(format!(
                "{}:{}",
                index_to_letters(first),
                index_to_letters(last)
            )));
        }
        Ok(Self { first, last })
    }
}

impl FromStr for ColumnRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = RANGE_RE
            .captures(s)
            .ok_or_else(|| Error::InvalidRange(s.to_string()))?;
        let first = letters_to_index(&caps[1]);
        let last = caps
            .get(2)
            .map(|m| letters_to_index(m.as_str()))
            .unwrap_or(first);
        if first > last {
            return Err(Error::InvalidRange(s.to_string()));
        }
        Ok(Self { first, last })
    }
}

impl TryFrom<String> for ColumnRange {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ColumnRange> for String {
    fn from(r: ColumnRange) -> String {
        r.to_string()
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            index_to_letters(self.first),
            index_to_letters(self.last)
        )
    }
}

/// `"A"` → 0, `"Z"` → 25, `"AA"` → 26. Caller guarantees ASCII letters.
fn letters_to_index(letters: &str) -> usize {
    letters
        .bytes()
        .map(|b| (b.to_ascii_uppercase() - b'A') as usize + 1)
        .fold(0, |acc, d| acc * 26 + d)
        - 1
}

fn index_to_letters(mut idx: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
