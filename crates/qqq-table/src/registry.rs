//! Deduplicating registry from canonical keys to operator contributions.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use qqq_core::errors::QqqError;
use qqq_core::{CanonicalKey, Coefficient, IndexTuple, KeyTable, OperatorType, Term};
use qqq_proj::Channel;
use serde::{Deserialize, Serialize};

/// The (channel, length, type, index) combination a named operator comes from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperatorOrigin {
    /// Symmetry channel.
    pub channel: Channel,
    /// Displacement-length class, 0 for single-site operators.
    pub length: i32,
    /// Operator topology.
    pub op_type: OperatorType,
    /// 0-based index within the projection table.
    pub index: usize,
}

impl OperatorOrigin {
    /// Derived operator name, e.g. `G1g_L3_SD_11`.
    pub fn name(&self) -> String {
        format!(
            "{}_L{}_{}_{}",
            self.channel, self.length, self.op_type, self.index
        )
    }
}

impl fmt::Display for OperatorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "channel={} L={} type={} index={}",
            self.channel, self.length, self.op_type, self.index
        )
    }
}

/// One operator's use of a QQQ term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Derived operator name.
    pub name: String,
    /// Where the name was derived from.
    pub origin: OperatorOrigin,
    /// Coefficient the term enters the operator with.
    pub coefficient: Coefficient,
}

/// A named operator with the terms it is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorRecord {
    /// Derived operator name.
    pub name: String,
    /// Terms in registration order.
    pub terms: Vec<Term>,
}

/// Order in which distinct keys are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyOrder {
    /// Numerically ascending keys.
    #[default]
    Ascending,
    /// Order in which keys were first registered.
    Discovery,
    /// Ascending by the decimal text of the key.
    Lexical,
}

/// Mapping from canonical key to every contribution that needs it.
///
/// Contributions keep registration order per key; keys keep first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    keys: KeyTable,
    entries: IndexMap<CanonicalKey, Vec<Contribution>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a contribution of `origin` to the key of `tuple`.
    pub fn register(
        &mut self,
        tuple: &IndexTuple,
        origin: &OperatorOrigin,
        coefficient: Coefficient,
    ) -> Result<CanonicalKey, QqqError> {
        let key = self.keys.record(tuple)?;
        self.entries.entry(key).or_default().push(Contribution {
            name: origin.name(),
            origin: origin.clone(),
            coefficient,
        });
        Ok(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of contributions across all keys.
    pub fn contribution_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Contributions recorded for `key`.
    pub fn contributions(&self, key: CanonicalKey) -> Option<&[Contribution]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Tuple behind `key`.
    pub fn tuple(&self, key: CanonicalKey) -> Option<&IndexTuple> {
        self.keys.tuple(key)
    }

    /// Iterates over keys and contributions in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalKey, &[Contribution])> + '_ {
        self.entries
            .iter()
            .map(|(key, contributions)| (*key, contributions.as_slice()))
    }

    /// Distinct keys in the requested order.
    pub fn ordered_keys(&self, order: KeyOrder) -> Vec<CanonicalKey> {
        let mut keys: Vec<CanonicalKey> = self.entries.keys().copied().collect();
        match order {
            KeyOrder::Ascending => keys.sort_unstable(),
            KeyOrder::Discovery => {}
            KeyOrder::Lexical => keys.sort_by_cached_key(|key| key.to_string()),
        }
        keys
    }

    /// Reassembles each named operator from the registered terms.
    ///
    /// Operators appear in first-registration order.
    pub fn operator_records(&self) -> Vec<OperatorRecord> {
        let mut records: Vec<OperatorRecord> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        for (key, contributions) in &self.entries {
            let Some(tuple) = self.keys.tuple(*key) else {
                continue;
            };
            for contribution in contributions {
                let slot = *slots.entry(contribution.name.as_str()).or_insert_with(|| {
                    records.push(OperatorRecord {
                        name: contribution.name.clone(),
                        terms: Vec::new(),
                    });
                    records.len() - 1
                });
                records[slot].terms.push(Term {
                    tuple: *tuple,
                    coefficient: contribution.coefficient,
                });
            }
        }
        records
    }
}
