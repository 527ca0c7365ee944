//! The assembly artifact handed to the correlator stage.
//!
//! Layout:
//!
//! ```text
//! <Nx> <Ny> <Nz> <Nt>
//! <NumSrcPerm>
//! <a b c>                          (NumSrcPerm lines)
//! <NumSnkPerm>
//! <a b c>                          (NumSnkPerm lines)
//! <Ndil0> <Ndil1> <Ndil2>
//! <Noperators>
//! <id> <name>                      (Noperators lines)
//! <NumDistinctKeys>
//! <key> <s1> <s2> <s3> <d1> <d2> <d3> <L> <contributors>
//! <operatorId>                     (per contributor)
//! <re> <im>
//! <solution file name>             (Ndil0 + Ndil1 + Ndil2 lines)
//! ```

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use qqq_core::errors::{ErrorInfo, QqqError};
use qqq_core::{CanonicalKey, Coefficient, IndexTuple};
use serde::{Deserialize, Serialize};

use crate::dilution::QuarkOrdering;
use crate::numbering::OperatorNumbering;
use crate::registry::{KeyOrder, Registry};

/// Run-level values written ahead of the operator table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Lattice extents `Nx Ny Nz Nt`.
    pub lattice: [usize; 4],
    /// Source quark orderings.
    pub source_orderings: Vec<QuarkOrdering>,
    /// Sink quark orderings.
    pub sink_orderings: Vec<QuarkOrdering>,
    /// Hybrid-list size of each quark leg.
    pub dilution: [usize; 3],
}

/// One operator's coefficient on a key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    /// Dense operator id.
    pub operator: usize,
    /// Coefficient of the term in that operator.
    pub coefficient: Coefficient,
}

/// A distinct key with its tuple and contributors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    /// Canonical key.
    pub key: CanonicalKey,
    /// Tuple the key encodes.
    pub tuple: IndexTuple,
    /// Contributors in registration order.
    pub contributors: Vec<Contributor>,
}

/// In-memory form of the emitted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Header values.
    pub header: ArtifactHeader,
    /// Operator names in id order.
    pub operators: Vec<String>,
    /// Distinct keys in emission order.
    pub entries: Vec<ArtifactEntry>,
    /// Solution-file names.
    pub solution_files: Vec<String>,
}

impl Artifact {
    /// Collects registry contents into emission order.
    pub fn assemble(
        header: ArtifactHeader,
        registry: &Registry,
        numbering: &OperatorNumbering,
        order: KeyOrder,
        solution_files: Vec<String>,
    ) -> Result<Self, QqqError> {
        let mut entries = Vec::with_capacity(registry.len());
        for key in registry.ordered_keys(order) {
            let tuple = registry.tuple(key).copied().ok_or_else(|| {
                QqqError::Format(
                    ErrorInfo::new("unknown-key", "key has no recorded tuple")
                        .with_context("key", key),
                )
            })?;
            let contributions = registry.contributions(key).unwrap_or_default();
            let mut contributors = Vec::with_capacity(contributions.len());
            for contribution in contributions {
                let operator = numbering.id(&contribution.name).ok_or_else(|| {
                    QqqError::Naming(
                        ErrorInfo::new("unnumbered-operator", "operator name has no id")
                            .with_context("name", &contribution.name),
                    )
                })?;
                contributors.push(Contributor {
                    operator,
                    coefficient: contribution.coefficient,
                });
            }
            entries.push(ArtifactEntry {
                key,
                tuple,
                contributors,
            });
        }
        Ok(Self {
            header,
            operators: numbering.names().to_vec(),
            entries,
            solution_files,
        })
    }

    /// Writes the text form to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }

    /// Renders the text form.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Parses the text form, checking counts and key/tuple agreement.
    pub fn parse(text: &str) -> Result<Self, QqqError> {
        let mut cursor = Cursor::new(text);

        let lattice = cursor.fields::<usize, 4>("lattice")?;
        let source_orderings = cursor.orderings("source orderings")?;
        let sink_orderings = cursor.orderings("sink orderings")?;
        let dilution = cursor.fields::<usize, 3>("dilution")?;

        let [count] = cursor.fields::<usize, 1>("operator count")?;
        let mut operators = Vec::with_capacity(count);
        for expected_id in 0..count {
            let (line_no, line) = cursor.line("operator")?;
            let (id, name) = line
                .split_once(char::is_whitespace)
                .map(|(id, name)| (id, name.trim()))
                .ok_or_else(|| artifact_error("artifact-operator", "expected `<id> <name>`", line_no))?;
            if id.parse::<usize>().ok() != Some(expected_id) || name.is_empty() {
                return Err(artifact_error(
                    "artifact-operator",
                    "operator ids must run densely from 0",
                    line_no,
                ));
            }
            operators.push(name.to_string());
        }

        let [count] = cursor.fields::<usize, 1>("key count")?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let line_no = cursor.line_no + 1;
            let [raw, s1, s2, s3, d1, d2, d3, length, contributors] =
                cursor.fields::<i64, 9>("key entry")?;
            let narrow = |value: i64| {
                i32::try_from(value)
                    .map_err(|_| artifact_error("artifact-entry", "index out of range", line_no))
            };
            let tuple = IndexTuple::new(
                [narrow(s1)?, narrow(s2)?, narrow(s3)?],
                [narrow(d1)?, narrow(d2)?, narrow(d3)?],
                narrow(length)?,
            )?;
            let key = CanonicalKey::encode(&tuple);
            if i64::from(key.as_raw()) != raw {
                return Err(artifact_error(
                    "artifact-key-mismatch",
                    "key does not encode the listed tuple",
                    line_no,
                ));
            }
            let contributors = usize::try_from(contributors).map_err(|_| {
                artifact_error("artifact-entry", "negative contributor count", line_no)
            })?;
            let mut list = Vec::with_capacity(contributors);
            for _ in 0..contributors {
                let op_line = cursor.line_no + 1;
                let [operator] = cursor.fields::<usize, 1>("contributor id")?;
                if operator >= operators.len() {
                    return Err(artifact_error(
                        "artifact-contributor",
                        "contributor id outside the operator table",
                        op_line,
                    ));
                }
                let [re, im] = cursor.fields::<f64, 2>("coefficient")?;
                list.push(Contributor {
                    operator,
                    coefficient: Coefficient::new(re, im),
                });
            }
            entries.push(ArtifactEntry {
                key,
                tuple,
                contributors: list,
            });
        }

        let first_name_line = cursor.line_no + 1;
        let solution_files = cursor.rest();
        let expected: usize = dilution.iter().sum();
        if solution_files.len() != expected {
            let code = if solution_files.len() < expected {
                "artifact-truncated"
            } else {
                "artifact-solution-files"
            };
            return Err(QqqError::Format(
                ErrorInfo::new(code, "solution-file names disagree with the dilution counts")
                    .with_context("expected", expected)
                    .with_context("found", solution_files.len())
                    .with_context("line", first_name_line),
            ));
        }
        Ok(Self {
            header: ArtifactHeader {
                lattice,
                source_orderings,
                sink_orderings,
                dilution,
            },
            operators,
            entries,
            solution_files,
        })
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [nx, ny, nz, nt] = self.header.lattice;
        writeln!(f, "{nx} {ny} {nz} {nt}")?;
        for orderings in [&self.header.source_orderings, &self.header.sink_orderings] {
            writeln!(f, "{}", orderings.len())?;
            for ordering in orderings {
                writeln!(f, "{ordering}")?;
            }
        }
        let [d0, d1, d2] = self.header.dilution;
        writeln!(f, "{d0} {d1} {d2}")?;
        writeln!(f, "{}", self.operators.len())?;
        for (id, name) in self.operators.iter().enumerate() {
            writeln!(f, "{id} {name}")?;
        }
        writeln!(f, "{}", self.entries.len())?;
        for entry in &self.entries {
            writeln!(
                f,
                "{} {} {}",
                entry.key,
                entry.tuple,
                entry.contributors.len()
            )?;
            for contributor in &entry.contributors {
                writeln!(f, "{}", contributor.operator)?;
                writeln!(f, "{}", contributor.coefficient)?;
            }
        }
        for name in &self.solution_files {
            writeln!(f, "{name}")?;
        }
        Ok(())
    }
}

fn artifact_error(code: &str, message: &str, line: usize) -> QqqError {
    QqqError::Format(ErrorInfo::new(code, message).with_context("line", line))
}

struct Cursor<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line_no: 0,
        }
    }

    fn line(&mut self, what: &str) -> Result<(usize, &'a str), QqqError> {
        self.line_no += 1;
        match self.lines.next() {
            Some(line) => Ok((self.line_no, line.trim())),
            None => Err(QqqError::Format(
                ErrorInfo::new("artifact-truncated", "artifact ends early")
                    .with_context("expected", what)
                    .with_context("line", self.line_no),
            )),
        }
    }

    fn fields<T: FromStr, const N: usize>(&mut self, what: &str) -> Result<[T; N], QqqError> {
        let (line_no, line) = self.line(what)?;
        let bad = || {
            QqqError::Format(
                ErrorInfo::new("artifact-fields", "unexpected field layout")
                    .with_context("expected", format!("{N} values for {what}"))
                    .with_context("line", line_no),
            )
        };
        let parsed: Vec<T> = line
            .split_whitespace()
            .map(|field| field.parse::<T>().map_err(|_| bad()))
            .collect::<Result<_, _>>()?;
        parsed.try_into().map_err(|_| bad())
    }

    fn orderings(&mut self, what: &str) -> Result<Vec<QuarkOrdering>, QqqError> {
        let [count] = self.fields::<usize, 1>(what)?;
        let mut orderings = Vec::with_capacity(count);
        for _ in 0..count {
            let line_no = self.line_no + 1;
            let legs = self.fields::<usize, 3>(what)?;
            orderings.push(QuarkOrdering::new(legs).map_err(|err| match err {
                QqqError::Config(info) => QqqError::Format(info.with_context("line", line_no)),
                other => other,
            })?);
        }
        Ok(orderings)
    }

    fn rest(self) -> Vec<String> {
        self.lines
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}
