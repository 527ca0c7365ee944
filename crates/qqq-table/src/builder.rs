//! Per-channel construction of registry entries from projection tables.

use qqq_core::errors::{ErrorInfo, QqqError};
use qqq_core::tuple::LENGTH_MAX;
use qqq_core::OperatorType;
use qqq_proj::{Channel, OperatorSelection, ProjectionSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::registry::{OperatorOrigin, Registry};

/// Counts gathered while building one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSummary {
    /// Channel that was built.
    pub channel: String,
    /// Operators the selection asks for.
    pub expected_operators: usize,
    /// Operators that were visited.
    pub built_operators: usize,
    /// Terms appended to the registry.
    pub terms: usize,
    /// Visited operators whose projection held no terms.
    pub empty_operators: usize,
}

/// Checks that displacement lengths are usable as non-single-site classes.
pub fn validate_lengths(lengths: &[i32]) -> Result<(), QqqError> {
    if lengths.is_empty() {
        return Err(QqqError::Config(
            ErrorInfo::new("displacement-lengths", "no displacement lengths configured")
                .with_hint("list at least one length, e.g. [1]"),
        ));
    }
    for (pos, length) in lengths.iter().enumerate() {
        if !(1..=LENGTH_MAX).contains(length) {
            return Err(QqqError::Config(
                ErrorInfo::new(
                    "displacement-lengths",
                    "displacement length outside 1..=15",
                )
                .with_context("length", length),
            ));
        }
        if lengths[..pos].contains(length) {
            return Err(QqqError::Config(
                ErrorInfo::new("displacement-lengths", "displacement length listed twice")
                    .with_context("length", length),
            ));
        }
    }
    Ok(())
}

fn reject_repeated(
    channel: &Channel,
    op_type: OperatorType,
    indices: &[usize],
) -> Result<(), QqqError> {
    for (pos, index) in indices.iter().enumerate() {
        if indices[..pos].contains(index) {
            return Err(QqqError::Config(
                ErrorInfo::new("duplicate-index", "operator index selected twice")
                    .with_context("channel", channel)
                    .with_context("type", op_type)
                    .with_context("index", index),
            ));
        }
    }
    Ok(())
}

/// Appends the terms of projected operators to a [`Registry`].
pub struct TableBuilder<'a, S: ProjectionSource> {
    source: &'a mut S,
    lengths: Vec<i32>,
}

impl<'a, S: ProjectionSource> TableBuilder<'a, S> {
    /// Creates a builder reading from `source` for the given length classes.
    pub fn new(source: &'a mut S, lengths: &[i32]) -> Result<Self, QqqError> {
        validate_lengths(lengths)?;
        Ok(Self {
            source,
            lengths: lengths.to_vec(),
        })
    }

    /// Displacement-length classes in processing order.
    pub fn lengths(&self) -> &[i32] {
        &self.lengths
    }

    /// Registers the operators of one type.
    ///
    /// Single-site operators are registered once with `L = 0`; other types
    /// once per displacement length.
    pub fn build(
        &mut self,
        registry: &mut Registry,
        channel: &Channel,
        op_type: OperatorType,
        indices: &[usize],
    ) -> Result<usize, QqqError> {
        reject_repeated(channel, op_type, indices)?;
        let mut terms = 0;
        for pos in 0..self.lengths.len() {
            if op_type.is_single_site() && pos > 0 {
                break;
            }
            for index in indices {
                terms += self.add_operator(registry, channel, op_type, pos, *index)?;
            }
        }
        Ok(terms)
    }

    /// Registers every selected operator of `channel`.
    ///
    /// Processing runs over lengths, then types, then indices, then terms.
    pub fn build_channel(
        &mut self,
        registry: &mut Registry,
        channel: &Channel,
        selection: &OperatorSelection,
    ) -> Result<ChannelSummary, QqqError> {
        for op_type in OperatorType::ALL {
            reject_repeated(channel, op_type, selection.indices(op_type))?;
        }
        let mut summary = ChannelSummary {
            channel: channel.to_string(),
            expected_operators: selection.expected_operator_count(self.lengths.len()),
            built_operators: 0,
            terms: 0,
            empty_operators: 0,
        };
        for pos in 0..self.lengths.len() {
            for op_type in OperatorType::ALL {
                if op_type.is_single_site() && pos > 0 {
                    continue;
                }
                for index in selection.indices(op_type) {
                    let added = self.add_operator(registry, channel, op_type, pos, *index)?;
                    summary.built_operators += 1;
                    summary.terms += added;
                    if added == 0 {
                        summary.empty_operators += 1;
                    }
                }
            }
        }
        if summary.empty_operators > 0 {
            warn!(
                channel = %channel,
                empty = summary.empty_operators,
                "selected operators without projection terms"
            );
        }
        info!(
            channel = %channel,
            operators = summary.built_operators,
            terms = summary.terms,
            keys = registry.len(),
            "channel built"
        );
        Ok(summary)
    }

    fn add_operator(
        &mut self,
        registry: &mut Registry,
        channel: &Channel,
        op_type: OperatorType,
        pos: usize,
        index: usize,
    ) -> Result<usize, QqqError> {
        let length = if op_type.is_single_site() {
            0
        } else {
            self.lengths[pos]
        };
        let origin = OperatorOrigin {
            channel: channel.clone(),
            length,
            op_type,
            index,
        };
        let terms = self.source.operator_terms(channel, op_type, index)?;
        debug!(operator = %origin.name(), terms = terms.len(), "operator read");
        for term in terms {
            let tuple = term.with_length(length)?;
            registry.register(&tuple, &origin, term.coefficient)?;
        }
        Ok(terms.len())
    }
}
