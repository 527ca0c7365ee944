//! Dilution schemes, quark orderings and solution-file names.

use std::fmt;

use itertools::iproduct;
use qqq_core::errors::{ErrorInfo, QqqError};
use serde::{Deserialize, Serialize};

/// Per-leg dilution partition counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DilutionScheme {
    /// Time partitions.
    #[serde(default = "default_count")]
    pub time: usize,
    /// Color partitions.
    #[serde(default = "default_count")]
    pub color: usize,
    /// Spin partitions.
    #[serde(default = "default_count")]
    pub spin: usize,
    /// Space partitions.
    #[serde(default = "default_count")]
    pub space: usize,
}

fn default_count() -> usize {
    1
}

impl Default for DilutionScheme {
    fn default() -> Self {
        Self::new(1, 1, 1, 1)
    }
}

impl DilutionScheme {
    /// Creates a scheme from its four counts.
    pub const fn new(time: usize, color: usize, spin: usize, space: usize) -> Self {
        Self {
            time,
            color,
            spin,
            space,
        }
    }

    /// Number of hybrid-list entries, the product of all counts.
    pub fn size(&self) -> usize {
        self.time * self.color * self.spin * self.space
    }

    /// Rejects zero counts.
    pub fn validate(&self) -> Result<(), QqqError> {
        let counts = [
            ("time", self.time),
            ("color", self.color),
            ("spin", self.spin),
            ("space", self.space),
        ];
        for (field, count) in counts {
            if count == 0 {
                return Err(QqqError::Config(
                    ErrorInfo::new("dilution", "dilution count must be at least one")
                        .with_context("field", field),
                ));
            }
        }
        Ok(())
    }

    /// Solution-file names for one leg, nested time, color, spin, space.
    ///
    /// The time suffix is always present; the others only when their count
    /// exceeds one.
    pub fn solution_names(&self, stub: &str, extension: &str) -> Vec<String> {
        iproduct!(0..self.time, 0..self.color, 0..self.spin, 0..self.space)
            .map(|(t, c, s, x)| {
                let mut name = format!("{stub}_t{t}");
                if self.color > 1 {
                    name.push_str(&format!("_c{c}"));
                }
                if self.spin > 1 {
                    name.push_str(&format!("_s{s}"));
                }
                if self.space > 1 {
                    name.push_str(&format!("_x{x}"));
                }
                name.push_str(extension);
                name
            })
            .collect()
    }
}

/// Solution-file naming for the three quark legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionFiles {
    /// Prefix; the leg number `1..=3` is appended.
    #[serde(default = "default_stub")]
    pub stub: String,
    /// Suffix appended to every name.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Dilution scheme of each leg.
    #[serde(default)]
    pub legs: [DilutionScheme; 3],
}

fn default_stub() -> String {
    "quark".to_string()
}

fn default_extension() -> String {
    ".lime".to_string()
}

impl Default for SolutionFiles {
    fn default() -> Self {
        Self {
            stub: default_stub(),
            extension: default_extension(),
            legs: [DilutionScheme::default(); 3],
        }
    }
}

impl SolutionFiles {
    /// Hybrid-list sizes of the three legs.
    pub fn sizes(&self) -> [usize; 3] {
        [self.legs[0].size(), self.legs[1].size(), self.legs[2].size()]
    }

    /// Every solution-file name, leg by leg.
    pub fn names(&self) -> Vec<String> {
        self.legs
            .iter()
            .enumerate()
            .flat_map(|(leg, scheme)| {
                scheme.solution_names(&format!("{}{}", self.stub, leg + 1), &self.extension)
            })
            .collect()
    }

    /// Checks every leg.
    pub fn validate(&self) -> Result<(), QqqError> {
        for (leg, scheme) in self.legs.iter().enumerate() {
            scheme.validate().map_err(|err| match err {
                QqqError::Config(info) => QqqError::Config(info.with_context("leg", leg + 1)),
                other => other,
            })?;
        }
        Ok(())
    }
}

/// A permutation of the three quark legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[usize; 3]", into = "[usize; 3]")]
pub struct QuarkOrdering([usize; 3]);

impl QuarkOrdering {
    /// The identity ordering.
    pub const IDENTITY: QuarkOrdering = QuarkOrdering([0, 1, 2]);

    /// The six source orderings, in emission order.
    pub const SOURCE: [QuarkOrdering; 6] = [
        QuarkOrdering([0, 1, 2]),
        QuarkOrdering([2, 1, 0]),
        QuarkOrdering([0, 2, 1]),
        QuarkOrdering([1, 0, 2]),
        QuarkOrdering([1, 2, 0]),
        QuarkOrdering([2, 0, 1]),
    ];

    /// Validates that `legs` is a permutation of `{0, 1, 2}`.
    pub fn new(legs: [usize; 3]) -> Result<Self, QqqError> {
        let mut sorted = legs;
        sorted.sort_unstable();
        if sorted != [0, 1, 2] {
            return Err(QqqError::Config(
                ErrorInfo::new("ordering", "quark ordering is not a permutation of 0 1 2")
                    .with_context("ordering", format!("{legs:?}")),
            ));
        }
        Ok(Self(legs))
    }

    /// Leg indices in order.
    pub fn legs(&self) -> [usize; 3] {
        self.0
    }
}

impl Default for QuarkOrdering {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for QuarkOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a} {b} {c}")
    }
}

impl TryFrom<[usize; 3]> for QuarkOrdering {
    type Error = QqqError;

    fn try_from(legs: [usize; 3]) -> Result<Self, Self::Error> {
        QuarkOrdering::new(legs)
    }
}

impl From<QuarkOrdering> for [usize; 3] {
    fn from(ordering: QuarkOrdering) -> Self {
        ordering.0
    }
}
