//! End-to-end assembly: build every channel, number operators, emit.

use std::fs;
use std::path::Path;

use chrono::Utc;
use qqq_core::errors::{ErrorInfo, QqqError};
use qqq_proj::{CoefficientDir, OperatorLists, ProjectionSource};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::artifact::{Artifact, ArtifactHeader};
use crate::builder::{ChannelSummary, TableBuilder};
use crate::config::RunConfig;
use crate::digest::{stable_hash_string, text_digest};
use crate::dilution::QuarkOrdering;
use crate::listing::{operator_name_listing, sorted_channel_list, to_text};
use crate::numbering::OperatorNumbering;
use crate::registry::{KeyOrder, Registry};

/// Machine-readable record of a completed assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// RFC 3339 timestamp of the run.
    pub created_at: String,
    /// Hash of the canonical JSON form of the configuration.
    pub config_hash: String,
    /// SHA-256 of the artifact text.
    pub artifact_digest: String,
    /// Per-channel build counts.
    pub channels: Vec<ChannelSummary>,
    /// Operators asked for across all channels.
    pub expected_operators: usize,
    /// Distinct operator names numbered.
    pub distinct_operators: usize,
    /// Distinct canonical keys.
    pub distinct_keys: usize,
    /// Contributions across all keys.
    pub contributions: usize,
    /// Solution-file names emitted.
    pub solution_files: usize,
    /// Order keys were emitted in.
    pub key_order: KeyOrder,
}

/// Everything an assembly run produces.
#[derive(Debug, Clone)]
pub struct AssemblyOutcome {
    /// Registry after every channel was built.
    pub registry: Registry,
    /// Dense operator numbering.
    pub numbering: OperatorNumbering,
    /// Artifact ready to write.
    pub artifact: Artifact,
    /// Run summary.
    pub summary: RunSummary,
}

impl AssemblyOutcome {
    /// Text of the artifact.
    pub fn artifact_text(&self) -> String {
        self.artifact.to_text()
    }
}

/// Builds the registry and artifact from an already validated configuration.
pub fn assemble<S: ProjectionSource>(
    config: &RunConfig,
    lists: &OperatorLists,
    source: &mut S,
) -> Result<AssemblyOutcome, QqqError> {
    let mut registry = Registry::new();
    let mut channels = Vec::with_capacity(config.channels.len());
    {
        let mut builder = TableBuilder::new(source, &config.displacement_lengths)?;
        for channel in &config.channels {
            let selection = lists.for_channel(channel).ok_or_else(|| {
                QqqError::Config(
                    ErrorInfo::new("operator-lists", "no operator list for the channel's irrep")
                        .with_context("channel", channel)
                        .with_context("irrep", channel.irrep()),
                )
            })?;
            channels.push(builder.build_channel(&mut registry, channel, selection)?);
        }
    }

    let numbering = OperatorNumbering::assign(&registry)?;
    let expected_operators: usize = channels.iter().map(|c| c.expected_operators).sum();
    if expected_operators != numbering.len() {
        warn!(
            expected = expected_operators,
            distinct = numbering.len(),
            "distinct operator count differs from the selection"
        );
    }

    let header = ArtifactHeader {
        lattice: config.lattice,
        source_orderings: QuarkOrdering::SOURCE.to_vec(),
        sink_orderings: config.sink_orderings.clone(),
        dilution: config.solution_files.sizes(),
    };
    let solution_files = config.solution_files.names();
    let artifact = Artifact::assemble(
        header,
        &registry,
        &numbering,
        config.key_order,
        solution_files,
    )?;

    let summary = RunSummary {
        created_at: Utc::now().to_rfc3339(),
        config_hash: stable_hash_string(config)?,
        artifact_digest: text_digest(&artifact.to_text()),
        channels,
        expected_operators,
        distinct_operators: numbering.len(),
        distinct_keys: registry.len(),
        contributions: registry.contribution_count(),
        solution_files: artifact.solution_files.len(),
        key_order: config.key_order,
    };
    info!(
        operators = summary.distinct_operators,
        keys = summary.distinct_keys,
        contributions = summary.contributions,
        "assembly complete"
    );
    Ok(AssemblyOutcome {
        registry,
        numbering,
        artifact,
        summary,
    })
}

/// Validates `config`, reads its inputs from disk and writes every output.
pub fn run(config: &RunConfig) -> Result<AssemblyOutcome, QqqError> {
    config.validate()?;
    let lists = match &config.operator_list {
        Some(path) => OperatorLists::load(path)?,
        None => config.operators.clone(),
    };
    let mut source = CoefficientDir::new(&config.projection_dir);
    let outcome = assemble(config, &lists, &mut source)?;
    write_outputs(&outcome, config)?;
    Ok(outcome)
}

fn write_file(path: &Path, contents: &str) -> Result<(), QqqError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| QqqError::io(parent.display(), err))?;
    }
    fs::write(path, contents).map_err(|err| QqqError::io(path.display(), err))
}

/// Writes the artifact and whichever side files `config.output` names.
pub fn write_outputs(outcome: &AssemblyOutcome, config: &RunConfig) -> Result<(), QqqError> {
    let output = &config.output;
    write_file(&output.artifact, &outcome.artifact_text())?;
    info!(path = %output.artifact.display(), "artifact written");
    if let Some(path) = &output.channel_list {
        write_file(path, &to_text(&sorted_channel_list(&outcome.registry)))?;
    }
    if let Some(path) = &output.operator_names {
        write_file(path, &to_text(&operator_name_listing(&outcome.numbering)))?;
    }
    if let Some(path) = &output.summary {
        let json = serde_json::to_string_pretty(&outcome.summary).map_err(|err| {
            QqqError::Serde(
                ErrorInfo::new("summary-serialize", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        write_file(path, &json)?;
    }
    Ok(())
}
