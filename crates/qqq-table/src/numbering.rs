//! Dense numbering of distinct operator names.

use std::collections::{BTreeMap, HashMap};

use qqq_core::errors::{ErrorInfo, QqqError};

use crate::registry::{Contribution, OperatorOrigin, Registry};

/// Sorted operator names with ids `0..N-1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorNumbering {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl OperatorNumbering {
    /// Collects every name in `registry` and numbers them in ascending order.
    ///
    /// Fails with a `name-collision` error when two different origins derive
    /// the same name.
    pub fn assign(registry: &Registry) -> Result<Self, QqqError> {
        Self::from_contributions(
            registry
                .iter()
                .flat_map(|(_, contributions)| contributions.iter()),
        )
    }

    /// Numbers the names carried by `contributions`, checking each name maps
    /// back to a single origin.
    pub fn from_contributions<'a, I>(contributions: I) -> Result<Self, QqqError>
    where
        I: IntoIterator<Item = &'a Contribution>,
    {
        let mut origins: BTreeMap<&str, &OperatorOrigin> = BTreeMap::new();
        for contribution in contributions {
            let seen = origins
                .entry(contribution.name.as_str())
                .or_insert(&contribution.origin);
            if *seen != &contribution.origin {
                return Err(QqqError::Naming(
                    ErrorInfo::new("name-collision", "two operator origins share a name")
                        .with_context("name", &contribution.name)
                        .with_context("first", *seen)
                        .with_context("second", &contribution.origin),
                ));
            }
        }
        Ok(Self::from_sorted(origins.into_keys().map(str::to_string).collect()))
    }

    /// Numbers an explicit list of names after sorting and deduplicating it.
    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self::from_sorted(names)
    }

    fn from_sorted(names: Vec<String>) -> Self {
        let ids = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();
        Self { names, ids }
    }

    /// Id of `name`.
    pub fn id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Name with id `id`.
    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Names in id order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of distinct operators.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no operator is numbered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
