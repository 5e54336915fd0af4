//! Numeric-aware string ordering
//!
//! Digit runs compare by value and everything else compares
//! case-insensitively, so "A-2" sorts before "A-10".

use std::cmp::Ordering;

/// Compare two strings treating embedded digit runs as numbers
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = compare_chunks(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }

    // Equal under the relaxed rules; fall back to a strict comparison for stability
    a.cmp(b)
}

fn compare_chunks(l: &str, r: &str) -> Ordering {
    let l_digit = l.as_bytes()[0].is_ascii_digit();
    let r_digit = r.as_bytes()[0].is_ascii_digit();

    match (l_digit, r_digit) {
        (true, true) => {
            let lt = l.trim_start_matches('0');
            let rt = r.trim_start_matches('0');
            lt.len()
                .cmp(&rt.len())
                .then_with(|| lt.cmp(rt))
                .then_with(|| l.len().cmp(&r.len()))
        }
        // Numbers sort before text, as in a numeric collation
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => {
            let lc = l.chars().flat_map(char::to_lowercase);
            let rc = r.chars().flat_map(char::to_lowercase);
            lc.cmp(rc)
        }
    }
}

/// Splits a string into alternating digit and non-digit runs
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digit)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}
