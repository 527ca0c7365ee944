use std::error::Error;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use qqq_proj::Channel;
use qqq_table::{run as run_assembly, KeyOrder, RunConfig};
use tracing::info;

#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// YAML run configuration; defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Comma-separated channels overriding the configuration, e.g. G1g,Hu.
    #[arg(long, value_delimiter = ',')]
    pub channels: Option<Vec<String>>,
    /// Comma-separated displacement lengths overriding the configuration.
    #[arg(long, value_delimiter = ',')]
    pub lengths: Option<Vec<i32>>,
    /// Operator-index list file overriding the configuration.
    #[arg(long)]
    pub operator_list: Option<PathBuf>,
    /// Projection coefficient directory overriding the configuration.
    #[arg(long)]
    pub projection_dir: Option<PathBuf>,
    /// Artifact output path.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// JSON run summary output path.
    #[arg(long)]
    pub summary: Option<PathBuf>,
    /// Emission order of distinct keys.
    #[arg(long, value_enum)]
    pub key_order: Option<KeyOrderArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KeyOrderArg {
    Ascending,
    Discovery,
    Lexical,
}

impl From<KeyOrderArg> for KeyOrder {
    fn from(arg: KeyOrderArg) -> Self {
        match arg {
            KeyOrderArg::Ascending => KeyOrder::Ascending,
            KeyOrderArg::Discovery => KeyOrder::Discovery,
            KeyOrderArg::Lexical => KeyOrder::Lexical,
        }
    }
}

fn apply_overrides(config: &mut RunConfig, args: &AssembleArgs) -> Result<(), Box<dyn Error>> {
    if let Some(channels) = &args.channels {
        config.channels = channels
            .iter()
            .map(|name| Channel::new(name.trim()))
            .collect::<Result<_, _>>()?;
    }
    if let Some(lengths) = &args.lengths {
        config.displacement_lengths = lengths.clone();
    }
    if let Some(path) = &args.operator_list {
        config.operator_list = Some(path.clone());
    }
    if let Some(path) = &args.projection_dir {
        config.projection_dir = path.clone();
    }
    if let Some(path) = &args.out {
        config.output.artifact = path.clone();
    }
    if let Some(path) = &args.summary {
        config.output.summary = Some(path.clone());
    }
    if let Some(order) = args.key_order {
        config.key_order = order.into();
    }
    Ok(())
}

pub fn run(args: &AssembleArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    apply_overrides(&mut config, args)?;
    let outcome = run_assembly(&config)?;
    let summary = &outcome.summary;
    info!(
        artifact = %config.output.artifact.display(),
        digest = %summary.artifact_digest,
        "assembly written"
    );
    println!(
        "{} operators, {} distinct keys, {} contributions -> {}",
        summary.distinct_operators,
        summary.distinct_keys,
        summary.contributions,
        config.output.artifact.display()
    );
    Ok(())
}
