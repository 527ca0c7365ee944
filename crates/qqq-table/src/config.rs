//! YAML run configuration: defaults, path resolution and validation.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use qqq_core::errors::{ErrorInfo, QqqError};
use qqq_proj::{Channel, OperatorLists};
use serde::{Deserialize, Serialize};

use crate::builder::validate_lengths;
use crate::dilution::{QuarkOrdering, SolutionFiles};
use crate::registry::KeyOrder;

/// YAML-configurable parameters of an assembly run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Lattice extents `Nx Ny Nz Nt`.
    #[serde(default = "default_lattice")]
    pub lattice: [usize; 4],
    /// Displacement-length classes for displaced operators.
    #[serde(default = "default_lengths")]
    pub displacement_lengths: Vec<i32>,
    /// Channels to build, in processing order.
    #[serde(default)]
    pub channels: Vec<Channel>,
    /// Operator-index list file; takes precedence over `operators`.
    #[serde(default)]
    pub operator_list: Option<PathBuf>,
    /// Inline operator-index lists keyed by irrep family.
    #[serde(default)]
    pub operators: OperatorLists,
    /// Root of the projection tables, laid out `<root>/<channel>/<LongForm>`.
    #[serde(default = "default_projection_dir")]
    pub projection_dir: PathBuf,
    /// Sink quark orderings.
    #[serde(default = "default_sink_orderings")]
    pub sink_orderings: Vec<QuarkOrdering>,
    /// Solution-file naming and dilution.
    #[serde(default)]
    pub solution_files: SolutionFiles,
    /// Emission order of distinct keys.
    #[serde(default)]
    pub key_order: KeyOrder,
    /// Output locations.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_lattice() -> [usize; 4] {
    [4, 4, 4, 8]
}

fn default_lengths() -> Vec<i32> {
    vec![1]
}

fn default_projection_dir() -> PathBuf {
    PathBuf::from("projections")
}

fn default_sink_orderings() -> Vec<QuarkOrdering> {
    vec![QuarkOrdering::IDENTITY]
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            lattice: default_lattice(),
            displacement_lengths: default_lengths(),
            channels: Vec::new(),
            operator_list: None,
            operators: OperatorLists::default(),
            projection_dir: default_projection_dir(),
            sink_orderings: default_sink_orderings(),
            solution_files: SolutionFiles::default(),
            key_order: KeyOrder::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Where the run writes its files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Assembly artifact.
    #[serde(default = "default_artifact")]
    pub artifact: PathBuf,
    /// Sorted channel list, skipped when unset.
    #[serde(default)]
    pub channel_list: Option<PathBuf>,
    /// Operator-name listing, skipped when unset.
    #[serde(default)]
    pub operator_names: Option<PathBuf>,
    /// JSON run summary, skipped when unset.
    #[serde(default)]
    pub summary: Option<PathBuf>,
}

fn default_artifact() -> PathBuf {
    PathBuf::from("qqq_assembly.txt")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact: default_artifact(),
            channel_list: None,
            operator_names: None,
            summary: None,
        }
    }
}

fn config_error(code: &str, message: &str) -> QqqError {
    QqqError::Config(ErrorInfo::new(code, message))
}

fn config_hint(code: &str, message: &str, hint: &str) -> QqqError {
    QqqError::Config(ErrorInfo::new(code, message).with_hint(hint))
}

impl RunConfig {
    /// Reads a YAML configuration; relative paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, QqqError> {
        let text = fs::read_to_string(path).map_err(|err| QqqError::io(path.display(), err))?;
        let mut config = Self::from_yaml(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parses a YAML configuration.
    pub fn from_yaml(text: &str) -> Result<Self, QqqError> {
        serde_yaml::from_str(text).map_err(|err| {
            QqqError::Config(ErrorInfo::new("config-parse", err.to_string()))
        })
    }

    /// Prefixes every relative path with `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.projection_dir);
        resolve(&mut self.output.artifact);
        for path in [
            self.operator_list.as_mut(),
            self.output.channel_list.as_mut(),
            self.output.operator_names.as_mut(),
            self.output.summary.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            resolve(path);
        }
    }

    /// Checks the configuration for values no run can use.
    pub fn validate(&self) -> Result<(), QqqError> {
        if self.lattice.contains(&0) {
            return Err(config_error("lattice", "lattice extents must be positive"));
        }
        if self.channels.is_empty() {
            return Err(config_hint(
                "channels",
                "no channels configured",
                "set `channels`, e.g. [G1g, Hu]",
            ));
        }
        let mut seen = BTreeSet::new();
        for channel in &self.channels {
            if !seen.insert(channel) {
                return Err(QqqError::Config(
                    ErrorInfo::new("channels", "channel listed twice")
                        .with_context("channel", channel),
                ));
            }
        }
        validate_lengths(&self.displacement_lengths)?;
        if self.sink_orderings.is_empty() {
            return Err(config_error("ordering", "no sink orderings configured"));
        }
        if self.operator_list.is_none() && self.operators.iter().next().is_none() {
            return Err(config_hint(
                "operator-lists",
                "no operator-index lists configured",
                "set `operator_list` or inline `operators`",
            ));
        }
        self.solution_files.validate()
    }
}
