#![deny(missing_docs)]
#![doc = "Registry, operator numbering and artifact emission for baryon QQQ assembly."]

/// Assembly artifact emission and parsing.
pub mod artifact;
/// Per-channel registry construction.
pub mod builder;
/// YAML run configuration.
pub mod config;
/// Dilution schemes, quark orderings and solution-file names.
pub mod dilution;
/// Side listings written next to the artifact.
pub mod listing;
/// Dense operator numbering.
pub mod numbering;
/// Run entry points and summaries.
pub mod pipeline;
/// Canonical key registry.
pub mod registry;

mod digest;

pub use artifact::{Artifact, ArtifactEntry, ArtifactHeader, Contributor};
pub use builder::{validate_lengths, ChannelSummary, TableBuilder};
pub use config::{OutputConfig, RunConfig};
pub use digest::{stable_hash_string, text_digest, to_canonical_json_bytes};
pub use dilution::{DilutionScheme, QuarkOrdering, SolutionFiles};
pub use numbering::OperatorNumbering;
pub use pipeline::{assemble, run, write_outputs, AssemblyOutcome, RunSummary};
pub use registry::{Contribution, KeyOrder, OperatorOrigin, OperatorRecord, Registry};
