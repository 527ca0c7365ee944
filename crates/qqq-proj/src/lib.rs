#![deny(missing_docs)]
#![doc = "Projection coefficient tables, operator-index lists and channel labels for baryon QQQ assembly."]

pub mod channel;
pub mod coefficients;
pub mod oplist;
pub mod source;

pub use channel::Channel;
pub use coefficients::{parse_operator, read_operator, CoefficientTable, ProjectionTerm, RECORD_WIDTH};
pub use oplist::{OperatorLists, OperatorSelection};
pub use source::{CoefficientDir, MemorySource, ProjectionSource};
