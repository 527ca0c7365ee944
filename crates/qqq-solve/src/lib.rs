#![deny(missing_docs)]
#![doc = "Multigrid clover solver wrapper: parameter marshaling, subspace caching and a two-step MdagM solve with typed tolerance failures."]

/// Solver error type and its conversion into the shared error surface.
pub mod error;
pub mod marshal;
/// Serde-configurable solver parameters.
pub mod params;
pub mod solver;
pub mod subspace;

pub use error::SolveError;
pub use marshal::{gauge_padding, marshal, GaugeParams, InvertParams, TimeBoundary, Verbosity};
pub use params::{AnisoParams, MultigridParams, Precision, Reconstruct, SchwarzType, SolverParams};
pub use solver::{Inversion, LinearOperator, MdagMSolver, MultigridBackend, Sign, SolveReport, SpinorField};
pub use subspace::{MemorySubspaceCache, SubspaceCache};
