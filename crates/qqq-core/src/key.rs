//! Canonical integer keys for index tuples.
//!
//! Layout, most significant field first:
//!
//! | field      | stored as | bits | shift |
//! |------------|-----------|------|-------|
//! | `s1`       | `s1 - 1`  | 2    | 17    |
//! | `s2`       | `s2 - 1`  | 2    | 15    |
//! | `s3`       | `s3 - 1`  | 2    | 13    |
//! | `d1`       | `d1 + 3`  | 3    | 10    |
//! | `d2`       | `d2 + 3`  | 3    | 7     |
//! | `d3`       | `d3 + 3`  | 3    | 4     |
//! | `L`        | `L`       | 4    | 0     |
//!
//! The fields never overlap, so encoding is injective over the ranges
//! enforced by [`IndexTuple::new`].

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, QqqError};
use crate::tuple::{IndexTuple, DISPLACEMENT_MIN, SPIN_MIN};

const SPIN_BITS: u32 = 2;
const DISPLACEMENT_BITS: u32 = 3;
const LENGTH_BITS: u32 = 4;

const SPIN_SHIFTS: [u32; 3] = [17, 15, 13];
const DISPLACEMENT_SHIFTS: [u32; 3] = [10, 7, 4];

/// Number of bits occupied by a canonical key.
pub const KEY_BITS: u32 = 3 * SPIN_BITS + 3 * DISPLACEMENT_BITS + LENGTH_BITS;

fn mask(bits: u32) -> u32 {
    (1 << bits) - 1
}

/// Dense integer identifying one elementary QQQ evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(u32);

impl CanonicalKey {
    /// Creates a key from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the key.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Packs a tuple into its key.
    pub fn encode(tuple: &IndexTuple) -> Self {
        let mut raw = 0u32;
        for (spin, shift) in tuple.spins().iter().zip(SPIN_SHIFTS) {
            raw |= ((spin - SPIN_MIN) as u32) << shift;
        }
        for (disp, shift) in tuple.displacements().iter().zip(DISPLACEMENT_SHIFTS) {
            raw |= ((disp - DISPLACEMENT_MIN) as u32) << shift;
        }
        raw |= tuple.length() as u32;
        Self(raw)
    }

    /// Unpacks the tuple encoded by this key.
    pub fn decode(&self) -> Result<IndexTuple, QqqError> {
        if self.0 >> KEY_BITS != 0 {
            return Err(QqqError::HashRange(
                ErrorInfo::new("key-range", "key has bits above the canonical layout")
                    .with_context("key", self.0),
            ));
        }
        let spins = SPIN_SHIFTS.map(|shift| ((self.0 >> shift) & mask(SPIN_BITS)) as i32 + SPIN_MIN);
        let displacements = DISPLACEMENT_SHIFTS
            .map(|shift| ((self.0 >> shift) & mask(DISPLACEMENT_BITS)) as i32 + DISPLACEMENT_MIN);
        let length = (self.0 & mask(LENGTH_BITS)) as i32;
        IndexTuple::new(spins, displacements, length)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates the seven fields and returns their canonical key.
pub fn canonical_key(
    s1: i32,
    s2: i32,
    s3: i32,
    d1: i32,
    d2: i32,
    d3: i32,
    length: i32,
) -> Result<CanonicalKey, QqqError> {
    let tuple = IndexTuple::new([s1, s2, s3], [d1, d2, d3], length)?;
    Ok(CanonicalKey::encode(&tuple))
}

/// Memo of every key handed out, mapping back to the originating tuple.
///
/// Iteration follows first-recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    inverse: IndexMap<CanonicalKey, IndexTuple>,
}

impl KeyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `tuple` and records the inverse entry once.
    pub fn record(&mut self, tuple: &IndexTuple) -> Result<CanonicalKey, QqqError> {
        let key = CanonicalKey::encode(tuple);
        match self.inverse.get(&key) {
            Some(existing) if existing != tuple => Err(QqqError::HashRange(
                ErrorInfo::new("key-collision", "two tuples share a canonical key")
                    .with_context("key", key)
                    .with_context("recorded", existing)
                    .with_context("incoming", tuple),
            )),
            Some(_) => Ok(key),
            None => {
                self.inverse.insert(key, *tuple);
                Ok(key)
            }
        }
    }

    /// Returns the tuple recorded for `key`.
    pub fn tuple(&self, key: CanonicalKey) -> Option<&IndexTuple> {
        self.inverse.get(&key)
    }

    /// Number of distinct keys recorded.
    pub fn len(&self) -> usize {
        self.inverse.len()
    }

    /// Whether no key has been recorded.
    pub fn is_empty(&self) -> bool {
        self.inverse.is_empty()
    }

    /// Iterates over recorded keys and tuples in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalKey, &IndexTuple)> + '_ {
        self.inverse.iter().map(|(key, tuple)| (*key, tuple))
    }
}
