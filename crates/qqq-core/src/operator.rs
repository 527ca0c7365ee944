//! Operator construction types and their on-disk naming.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, QqqError};

/// Displacement topology of a baryon operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperatorType {
    /// All three quarks on one site.
    #[serde(rename = "SS")]
    SingleSite,
    /// One displaced quark.
    #[serde(rename = "SD")]
    SinglyDisplaced,
    /// Two quarks displaced along the same axis.
    #[serde(rename = "DDI")]
    DoublyDisplacedI,
    /// Two quarks displaced along orthogonal axes.
    #[serde(rename = "DDL")]
    DoublyDisplacedL,
    /// Three quarks displaced along orthogonal axes.
    #[serde(rename = "TDT")]
    TriplyDisplacedT,
}

impl OperatorType {
    /// Every operator type in table-building order.
    pub const ALL: [OperatorType; 5] = [
        OperatorType::SingleSite,
        OperatorType::SinglyDisplaced,
        OperatorType::DoublyDisplacedI,
        OperatorType::DoublyDisplacedL,
        OperatorType::TriplyDisplacedT,
    ];

    /// Short tag used in operator names and index lists.
    pub fn tag(&self) -> &'static str {
        match self {
            OperatorType::SingleSite => "SS",
            OperatorType::SinglyDisplaced => "SD",
            OperatorType::DoublyDisplacedI => "DDI",
            OperatorType::DoublyDisplacedL => "DDL",
            OperatorType::TriplyDisplacedT => "TDT",
        }
    }

    /// File name of the projection coefficient table for this type.
    pub fn long_form(&self) -> &'static str {
        match self {
            OperatorType::SingleSite => "Single_Site",
            OperatorType::SinglyDisplaced => "Singly_Displaced",
            OperatorType::DoublyDisplacedI => "Doubly_Displaced_I",
            OperatorType::DoublyDisplacedL => "Doubly_Displaced_L",
            OperatorType::TriplyDisplacedT => "Triply_Displaced_T",
        }
    }

    /// Whether the operator ignores the configured displacement lengths.
    pub fn is_single_site(&self) -> bool {
        matches!(self, OperatorType::SingleSite)
    }
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for OperatorType {
    type Err = QqqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperatorType::ALL
            .into_iter()
            .find(|ty| ty.tag() == s || ty.long_form() == s)
            .ok_or_else(|| {
                QqqError::Config(
                    ErrorInfo::new("operator-type", "unknown operator type")
                        .with_context("value", s)
                        .with_hint("expected one of SS, SD, DDI, DDL, TDT"),
                )
            })
    }
}
