//! Operator-index lists per irrep family.
//!
//! The list file groups operator indices by irrep:
//!
//! ```text
//! <G1>
//! SS  0  1  2
//! SD  0 11 17 20 22
//! DDI 0  4  5  9 12
//! <H>
//! SS
//! SD  7  9 10 13 31
//! ```
//!
//! A type line without indices selects no operators of that type. Blank lines
//! and lines starting with `#` are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use qqq_core::errors::{ErrorInfo, QqqError};
use qqq_core::{parse_numbers, OperatorType};
use serde::{Deserialize, Serialize};

use crate::channel::Channel;

/// Operator indices to build for one irrep family, per operator type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorSelection {
    indices: BTreeMap<OperatorType, Vec<usize>>,
}

impl OperatorSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the indices selected for `op_type`.
    pub fn set(&mut self, op_type: OperatorType, indices: Vec<usize>) {
        self.indices.insert(op_type, indices);
    }

    /// Indices selected for `op_type`, empty when none.
    pub fn indices(&self, op_type: OperatorType) -> &[usize] {
        self.indices
            .get(&op_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of named operators this selection yields for one channel.
    ///
    /// Single-site operators appear once; every other type once per
    /// displacement length.
    pub fn expected_operator_count(&self, displacement_lengths: usize) -> usize {
        OperatorType::ALL
            .iter()
            .map(|ty| {
                let count = self.indices(*ty).len();
                if ty.is_single_site() {
                    count
                } else {
                    count * displacement_lengths
                }
            })
            .sum()
    }

    /// Whether no operator of any type is selected.
    pub fn is_empty(&self) -> bool {
        self.indices.values().all(Vec::is_empty)
    }
}

/// Operator selections keyed by irrep family, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorLists {
    irreps: IndexMap<String, OperatorSelection>,
}

fn list_error(code: &str, message: &str, origin: &str, line: usize) -> QqqError {
    QqqError::Format(
        ErrorInfo::new(code, message)
            .with_context("file", origin)
            .with_context("line", line),
    )
}

impl OperatorLists {
    /// Creates an empty set of lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses list text; `origin` labels errors.
    pub fn parse(text: &str, origin: &str) -> Result<Self, QqqError> {
        let mut lists = Self::new();
        let mut current: Option<String> = None;
        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(inner) = line.strip_prefix('<').and_then(|l| l.strip_suffix('>')) {
                let irrep = inner.trim();
                if irrep.is_empty() {
                    return Err(list_error("irrep-header", "empty irrep header", origin, line_no));
                }
                lists.irreps.entry(irrep.to_string()).or_default();
                current = Some(irrep.to_string());
                continue;
            }
            let Some(irrep) = current.as_ref() else {
                return Err(list_error(
                    "irrep-header",
                    "operator line precedes any <irrep> header",
                    origin,
                    line_no,
                ));
            };
            let (tag, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let op_type: OperatorType = tag.parse().map_err(|_| {
                list_error("operator-type", "unknown operator type tag", origin, line_no)
            })?;
            let mut indices = Vec::new();
            for number in parse_numbers(rest) {
                let index = number
                    .as_int()
                    .and_then(|value| usize::try_from(value).ok())
                    .ok_or_else(|| {
                        list_error(
                            "operator-index",
                            "operator index is not a non-negative integer",
                            origin,
                            line_no,
                        )
                    })?;
                if indices.contains(&index) {
                    return Err(QqqError::Format(
                        ErrorInfo::new("duplicate-index", "operator index listed twice")
                            .with_context("file", origin)
                            .with_context("line", line_no)
                            .with_context("type", op_type)
                            .with_context("index", index),
                    ));
                }
                indices.push(index);
            }
            let selection = lists.irreps.entry(irrep.clone()).or_default();
            if selection.indices.contains_key(&op_type) {
                return Err(list_error(
                    "duplicate-type",
                    "operator type listed twice for one irrep",
                    origin,
                    line_no,
                ));
            }
            selection.set(op_type, indices);
        }
        Ok(lists)
    }

    /// Loads and parses the list file at `path`.
    pub fn load(path: &Path) -> Result<Self, QqqError> {
        let text = fs::read_to_string(path).map_err(|err| QqqError::io(path.display(), err))?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Sets the selection of an irrep family.
    pub fn insert(&mut self, irrep: impl Into<String>, selection: OperatorSelection) {
        self.irreps.insert(irrep.into(), selection);
    }

    /// Selection for the irrep family of `channel`.
    pub fn for_channel(&self, channel: &Channel) -> Option<&OperatorSelection> {
        self.irreps.get(channel.irrep())
    }

    /// Iterates over irreps and their selections in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperatorSelection)> + '_ {
        self.irreps
            .iter()
            .map(|(irrep, selection)| (irrep.as_str(), selection))
    }
}
