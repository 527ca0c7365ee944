//! Permissive numeric tokenizer for hand-authored coefficient tables.
//!
//! Numbers are separated by `,`, `;`, `:` or whitespace. Characters that cannot
//! start a number are skipped, a number ends at the first character outside
//! `[0-9.+-EeDd]`, exponent markers are normalised to `E` and trailing
//! characters other than digits or `.` are stripped. Candidates that still do
//! not parse are dropped without error.

use std::fmt;

/// A numeric token with its normalised source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    text: String,
    value: f64,
}

impl Number {
    fn parse(candidate: &str) -> Option<Self> {
        let mut text: String = candidate
            .chars()
            .map(|c| match c {
                'e' | 'D' | 'd' => 'E',
                other => other,
            })
            .collect();
        while let Some(last) = text.chars().last() {
            if last.is_ascii_digit() || last == '.' {
                break;
            }
            text.pop();
        }
        let value: f64 = text.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self { text, value })
    }

    /// Normalised text of the token.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Floating point value of the token.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Integer value when the token is integral.
    pub fn as_int(&self) -> Option<i64> {
        if self.value.fract() == 0.0 && self.value.abs() < i64::MAX as f64 {
            Some(self.value as i64)
        } else {
            None
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn starts_number(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-')
}

fn continues_number(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'E' | 'e' | 'D' | 'd')
}

/// Lazy iterator over the numbers of one line. Cloning restarts from the
/// clone point.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl Iterator for Tokens<'_> {
    type Item = Number;

    fn next(&mut self) -> Option<Number> {
        loop {
            let start = self.rest.find(starts_number)?;
            let tail = &self.rest[start..];
            let len = tail
                .char_indices()
                .skip(1)
                .find(|(_, c)| !continues_number(*c))
                .map(|(idx, _)| idx)
                .unwrap_or(tail.len());
            let (candidate, rest) = tail.split_at(len);
            self.rest = rest;
            if let Some(number) = Number::parse(candidate) {
                return Some(number);
            }
        }
    }
}

/// Returns a lazy token stream over `line`.
pub fn tokenize(line: &str) -> Tokens<'_> {
    Tokens { rest: line }
}

/// Collects every number of `line`.
pub fn parse_numbers(line: &str) -> Vec<Number> {
    tokenize(line).collect()
}
