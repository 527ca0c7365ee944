//! Projection coefficient tables.
//!
//! A table starts with the number of operators it holds. Each operator is a
//! header line carrying its term count followed by that many records of the
//! form `s1 s2 s3 d1 d2 d3 re im`. Records wider than eight numbers are
//! accepted; the first six numbers are the indices and the last two the
//! coefficient.

use std::fs;
use std::path::Path;

use qqq_core::errors::{ErrorInfo, QqqError};
use qqq_core::{parse_numbers, Coefficient, IndexTuple, Number};
use serde::{Deserialize, Serialize};

/// Minimum number of values in a term record.
pub const RECORD_WIDTH: usize = 8;

fn format_info(code: &str, message: impl Into<String>, origin: &str) -> ErrorInfo {
    ErrorInfo::new(code, message).with_context("file", origin)
}

/// One line of a projection table: spins, displacements and coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTerm {
    /// Spin indices of the three quark legs.
    pub spins: [i32; 3],
    /// Displacement directions of the three quark legs.
    pub displacements: [i32; 3],
    /// Projection coefficient.
    pub coefficient: Coefficient,
}

impl ProjectionTerm {
    /// Attaches a displacement-length class, producing a validated tuple.
    pub fn with_length(&self, length: i32) -> Result<IndexTuple, QqqError> {
        IndexTuple::new(self.spins, self.displacements, length)
    }

    fn from_numbers(numbers: &[Number], origin: &str, line: usize) -> Result<Self, QqqError> {
        let mut indices = [0i32; 6];
        for (slot, number) in indices.iter_mut().zip(numbers) {
            *slot = number
                .as_int()
                .and_then(|value| i32::try_from(value).ok())
                .ok_or_else(|| {
                    QqqError::Format(
                        format_info("non-integer-index", "index field is not an integer", origin)
                            .with_context("line", line),
                    )
                })?;
        }
        let re = numbers[numbers.len() - 2].value();
        let im = numbers[numbers.len() - 1].value();
        let term = Self {
            spins: [indices[0], indices[1], indices[2]],
            displacements: [indices[3], indices[4], indices[5]],
            coefficient: Coefficient::new(re, im),
        };
        // Range check with the single-site class; lengths are attached later.
        term.with_length(0).map_err(|err| match err {
            QqqError::HashRange(info) => QqqError::HashRange(
                info.with_context("file", origin).with_context("line", line),
            ),
            other => other,
        })?;
        Ok(term)
    }
}

struct OpenBlock {
    index: usize,
    expected: usize,
    seen: usize,
    header_line: usize,
}

impl OpenBlock {
    fn close(&self, origin: &str) -> Result<(), QqqError> {
        if self.seen == self.expected {
            return Ok(());
        }
        Err(QqqError::Format(
            format_info("term-count-mismatch", "operator block is short of terms", origin)
                .with_context("line", self.header_line)
                .with_context("operator", self.index)
                .with_context("declared", self.expected)
                .with_context("found", self.seen),
        ))
    }
}

fn count_from(number: &Number, origin: &str, line: usize, what: &str) -> Result<usize, QqqError> {
    number
        .as_int()
        .and_then(|value| usize::try_from(value).ok())
        .ok_or_else(|| {
            QqqError::Format(
                format_info("count-line", format!("{what} is not a non-negative integer"), origin)
                    .with_context("line", line),
            )
        })
}

/// Walks every block of a table, validating structure and handing each term to
/// `on_term` together with its 0-based operator index. Returns the number of
/// operator blocks.
fn scan<F>(text: &str, origin: &str, mut on_term: F) -> Result<usize, QqqError>
where
    F: FnMut(usize, ProjectionTerm),
{
    let mut lines = text.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    let declared = loop {
        let Some((line_no, line)) = lines.next() else {
            return Err(QqqError::Format(format_info(
                "empty-file",
                "table has no operator count",
                origin,
            )));
        };
        let numbers = parse_numbers(line);
        match numbers.as_slice() {
            [] => continue,
            [count] => break count_from(count, origin, line_no, "operator count")?,
            _ => {
                return Err(QqqError::Format(
                    format_info(
                        "count-line",
                        "first line must hold only the operator count",
                        origin,
                    )
                    .with_context("line", line_no),
                ))
            }
        }
    };

    let mut blocks = 0usize;
    let mut open: Option<OpenBlock> = None;
    for (line_no, line) in lines {
        let numbers = parse_numbers(line);
        match numbers.len() {
            0 => continue,
            1 => {
                if let Some(block) = open.take() {
                    block.close(origin)?;
                }
                open = Some(OpenBlock {
                    index: blocks,
                    expected: count_from(&numbers[0], origin, line_no, "term count")?,
                    seen: 0,
                    header_line: line_no,
                });
                blocks += 1;
            }
            width if width >= RECORD_WIDTH => {
                let Some(block) = open.as_mut() else {
                    return Err(QqqError::Format(
                        format_info(
                            "record-before-header",
                            "term record precedes any operator header",
                            origin,
                        )
                        .with_context("line", line_no),
                    ));
                };
                if block.seen == block.expected {
                    return Err(QqqError::Format(
                        format_info(
                            "term-count-mismatch",
                            "operator block has more terms than declared",
                            origin,
                        )
                        .with_context("line", line_no)
                        .with_context("operator", block.index)
                        .with_context("declared", block.expected),
                    ));
                }
                let term = ProjectionTerm::from_numbers(&numbers, origin, line_no)?;
                on_term(block.index, term);
                block.seen += 1;
            }
            width => {
                return Err(QqqError::Format(
                    format_info("short-record", "term record is too short", origin)
                        .with_context("line", line_no)
                        .with_context("width", width)
                        .with_context("expected", RECORD_WIDTH),
                ))
            }
        }
    }
    if let Some(block) = open.take() {
        block.close(origin)?;
    }
    if blocks != declared {
        return Err(QqqError::Format(
            format_info(
                "operator-count-mismatch",
                "number of operator blocks differs from the declared count",
                origin,
            )
            .with_context("declared", declared)
            .with_context("found", blocks),
        ));
    }
    Ok(blocks)
}

fn missing_operator(index: usize, available: usize, origin: &str) -> QqqError {
    QqqError::Format(
        format_info("operator-missing", "requested operator index is not in the table", origin)
            .with_context("operator", index)
            .with_context("available", available)
            .with_hint("check the operator-index list against the projection tables"),
    )
}

fn read_text(path: &Path) -> Result<String, QqqError> {
    fs::read_to_string(path).map_err(|err| QqqError::io(path.display(), err))
}

/// Parses the terms of a single operator out of table text.
///
/// Only the requested block is materialised; the rest of the table is still
/// validated.
pub fn parse_operator(
    text: &str,
    origin: &str,
    index: usize,
) -> Result<Vec<ProjectionTerm>, QqqError> {
    let mut terms = Vec::new();
    let blocks = scan(text, origin, |block, term| {
        if block == index {
            terms.push(term);
        }
    })?;
    if index >= blocks {
        return Err(missing_operator(index, blocks, origin));
    }
    Ok(terms)
}

/// Reads the terms of operator `index` (0-based, file order) from `path`.
pub fn read_operator(path: &Path, index: usize) -> Result<Vec<ProjectionTerm>, QqqError> {
    let text = read_text(path)?;
    parse_operator(&text, &path.display().to_string(), index)
}

/// Fully parsed projection table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoefficientTable {
    origin: String,
    operators: Vec<Vec<ProjectionTerm>>,
}

impl CoefficientTable {
    /// Parses every operator block of `text`.
    pub fn parse(text: &str, origin: impl Into<String>) -> Result<Self, QqqError> {
        let origin = origin.into();
        let mut operators: Vec<Vec<ProjectionTerm>> = Vec::new();
        let blocks = scan(text, &origin, |block, term| {
            if operators.len() <= block {
                operators.resize_with(block + 1, Vec::new);
            }
            operators[block].push(term);
        })?;
        operators.resize_with(blocks, Vec::new);
        Ok(Self { origin, operators })
    }

    /// Loads and parses the table at `path`.
    pub fn load(path: &Path) -> Result<Self, QqqError> {
        let text = read_text(path)?;
        Self::parse(&text, path.display().to_string())
    }

    /// Builds a table directly from operator term lists.
    pub fn from_operators(origin: impl Into<String>, operators: Vec<Vec<ProjectionTerm>>) -> Self {
        Self {
            origin: origin.into(),
            operators,
        }
    }

    /// Terms of operator `index`.
    pub fn operator(&self, index: usize) -> Result<&[ProjectionTerm], QqqError> {
        self.operators
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| missing_operator(index, self.operators.len(), &self.origin))
    }

    /// Number of operators in the table.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether the table holds no operators.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Path or label the table was read from.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}
