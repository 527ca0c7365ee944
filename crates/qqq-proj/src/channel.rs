//! Symmetry channels and their irrep families.

use std::fmt;

use qqq_core::errors::{ErrorInfo, QqqError};
use serde::{Deserialize, Serialize};

/// Irreducible-representation label such as `G1g` or `Hu`.
///
/// The irrep family is the label without its trailing parity letter; operator
/// index lists are shared between the two parities of a family.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Channel {
    name: String,
}

impl Channel {
    /// Validates and wraps a channel label.
    pub fn new(name: impl Into<String>) -> Result<Self, QqqError> {
        let name = name.into();
        let well_formed = name.len() > 1
            && name.chars().all(|c| c.is_ascii_alphanumeric())
            && (name.ends_with('g') || name.ends_with('u'));
        if !well_formed {
            return Err(QqqError::Config(
                ErrorInfo::new("channel", "channel label must be an irrep with g/u parity")
                    .with_context("channel", &name)
                    .with_hint("examples: G1g, G1u, G2g, Hu"),
            ));
        }
        Ok(Self { name })
    }

    /// Full channel label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Irrep family shared by both parities.
    pub fn irrep(&self) -> &str {
        &self.name[..self.name.len() - 1]
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TryFrom<String> for Channel {
    type Error = QqqError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Channel::new(value)
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.name
    }
}
