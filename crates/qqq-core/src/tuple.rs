//! Spin/displacement index tuples and their coefficients.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, QqqError};

/// Smallest admissible spin index.
pub const SPIN_MIN: i32 = 1;
/// Largest admissible spin index.
pub const SPIN_MAX: i32 = 4;
/// Most negative admissible displacement direction.
pub const DISPLACEMENT_MIN: i32 = -3;
/// Most positive admissible displacement direction.
pub const DISPLACEMENT_MAX: i32 = 3;
/// Largest displacement-length class representable in a canonical key.
pub const LENGTH_MAX: i32 = 15;

fn range_error(code: &str, field: &str, value: i32, min: i32, max: i32) -> QqqError {
    QqqError::HashRange(
        ErrorInfo::new(code, format!("{field} outside the encodable range"))
            .with_context("field", field)
            .with_context("value", value)
            .with_context("min", min)
            .with_context("max", max),
    )
}

/// The seven indices `(s1, s2, s3, d1, d2, d3, L)` identifying one QQQ term.
///
/// Construction validates every field against the canonical key layout, so a
/// tuple that exists can always be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "[i32; 7]", try_from = "[i32; 7]")]
pub struct IndexTuple {
    spins: [i32; 3],
    displacements: [i32; 3],
    length: i32,
}

impl IndexTuple {
    /// Creates a tuple after checking each field against its encoded width.
    pub fn new(spins: [i32; 3], displacements: [i32; 3], length: i32) -> Result<Self, QqqError> {
        for (leg, spin) in spins.iter().enumerate() {
            if !(SPIN_MIN..=SPIN_MAX).contains(spin) {
                return Err(range_error(
                    "spin-range",
                    &format!("s{}", leg + 1),
                    *spin,
                    SPIN_MIN,
                    SPIN_MAX,
                ));
            }
        }
        for (leg, disp) in displacements.iter().enumerate() {
            if !(DISPLACEMENT_MIN..=DISPLACEMENT_MAX).contains(disp) {
                return Err(range_error(
                    "displacement-range",
                    &format!("d{}", leg + 1),
                    *disp,
                    DISPLACEMENT_MIN,
                    DISPLACEMENT_MAX,
                ));
            }
        }
        if !(0..=LENGTH_MAX).contains(&length) {
            return Err(range_error("length-range", "L", length, 0, LENGTH_MAX));
        }
        Ok(Self {
            spins,
            displacements,
            length,
        })
    }

    /// Spin indices of the three quark legs (1-based).
    pub fn spins(&self) -> [i32; 3] {
        self.spins
    }

    /// Displacement directions of the three quark legs (0 means undisplaced).
    pub fn displacements(&self) -> [i32; 3] {
        self.displacements
    }

    /// Displacement-length class, 0 for single-site terms.
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Returns the seven fields in emission order.
    pub fn to_array(&self) -> [i32; 7] {
        let [s1, s2, s3] = self.spins;
        let [d1, d2, d3] = self.displacements;
        [s1, s2, s3, d1, d2, d3, self.length]
    }
}

impl From<IndexTuple> for [i32; 7] {
    fn from(tuple: IndexTuple) -> Self {
        tuple.to_array()
    }
}

impl TryFrom<[i32; 7]> for IndexTuple {
    type Error = QqqError;

    fn try_from(raw: [i32; 7]) -> Result<Self, Self::Error> {
        let [s1, s2, s3, d1, d2, d3, length] = raw;
        IndexTuple::new([s1, s2, s3], [d1, d2, d3], length)
    }
}

impl fmt::Display for IndexTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [s1, s2, s3, d1, d2, d3, length] = self.to_array();
        write!(f, "{s1} {s2} {s3} {d1} {d2} {d3} {length}")
    }
}

/// Complex projection coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coefficient {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Coefficient {
    /// Creates a coefficient from its real and imaginary parts.
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.re, self.im)
    }
}

/// A tuple together with the coefficient it enters an operator with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Indices of the elementary QQQ evaluation.
    pub tuple: IndexTuple,
    /// Projection coefficient.
    pub coefficient: Coefficient,
}
