//! Lookup of projection terms by channel, operator type and index.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use qqq_core::errors::{ErrorInfo, QqqError};
use qqq_core::OperatorType;
use tracing::debug;

use crate::channel::Channel;
use crate::coefficients::{CoefficientTable, ProjectionTerm};

/// Provides the projection terms of a named operator.
pub trait ProjectionSource {
    /// Returns the terms of operator `index` of `op_type` in `channel`.
    fn operator_terms(
        &mut self,
        channel: &Channel,
        op_type: OperatorType,
        index: usize,
    ) -> Result<&[ProjectionTerm], QqqError>;
}

/// Projection tables laid out as `<root>/<channel>/<LongForm>`.
///
/// Each table file is parsed once and cached for the lifetime of the source.
#[derive(Debug)]
pub struct CoefficientDir {
    root: PathBuf,
    cache: HashMap<PathBuf, CoefficientTable>,
}

impl CoefficientDir {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Root directory of the tables.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the table holding `op_type` operators of `channel`.
    pub fn table_path(&self, channel: &Channel, op_type: OperatorType) -> PathBuf {
        self.root.join(channel.name()).join(op_type.long_form())
    }
}

impl ProjectionSource for CoefficientDir {
    fn operator_terms(
        &mut self,
        channel: &Channel,
        op_type: OperatorType,
        index: usize,
    ) -> Result<&[ProjectionTerm], QqqError> {
        let path = self.table_path(channel, op_type);
        let table = match self.cache.entry(path) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let table = CoefficientTable::load(entry.key())?;
                debug!(
                    path = %entry.key().display(),
                    operators = table.len(),
                    "loaded projection table"
                );
                entry.insert(table)
            }
        };
        table.operator(index)
    }
}

/// In-memory projection tables keyed by channel name and operator type.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: BTreeMap<(String, OperatorType), CoefficientTable>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the table for `op_type` operators of `channel`.
    pub fn insert(&mut self, channel: &Channel, op_type: OperatorType, table: CoefficientTable) {
        self.tables
            .insert((channel.name().to_string(), op_type), table);
    }
}

impl ProjectionSource for MemorySource {
    fn operator_terms(
        &mut self,
        channel: &Channel,
        op_type: OperatorType,
        index: usize,
    ) -> Result<&[ProjectionTerm], QqqError> {
        let table = self
            .tables
            .get(&(channel.name().to_string(), op_type))
            .ok_or_else(|| {
                QqqError::Format(
                    ErrorInfo::new("table-missing", "no projection table registered")
                        .with_context("channel", channel)
                        .with_context("type", op_type),
                )
            })?;
        table.operator(index)
    }
}
