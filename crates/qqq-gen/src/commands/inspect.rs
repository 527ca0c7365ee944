use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use qqq_table::{text_digest, Artifact};
use serde_json::{json, Value};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Assembly artifact to read.
    #[arg(long)]
    pub artifact: PathBuf,
    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

fn report(artifact: &Artifact, digest: String) -> Value {
    let entries: Vec<Value> = artifact
        .entries
        .iter()
        .map(|entry| {
            let contributors: Vec<Value> = entry
                .contributors
                .iter()
                .map(|c| {
                    json!({
                        "id": c.operator,
                        "name": artifact.operators.get(c.operator),
                        "re": c.coefficient.re,
                        "im": c.coefficient.im,
                    })
                })
                .collect();
            json!({
                "key": entry.key,
                "tuple": entry.tuple.to_array(),
                "quarks": entry.tuple.quark_terms(),
                "contributors": contributors,
            })
        })
        .collect();
    json!({
        "digest": digest,
        "lattice": artifact.header.lattice,
        "source_orderings": artifact.header.source_orderings.len(),
        "sink_orderings": artifact.header.sink_orderings.len(),
        "dilution": artifact.header.dilution,
        "operators": artifact.operators.len(),
        "distinct_keys": artifact.entries.len(),
        "contributions": artifact.entries.iter().map(|e| e.contributors.len()).sum::<usize>(),
        "solution_files": artifact.solution_files.len(),
        "entries": entries,
    })
}

pub fn run(args: &InspectArgs) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(&args.artifact)?;
    let artifact = Artifact::parse(&text)?;
    let value = report(&artifact, text_digest(&text));
    let rendered = serde_json::to_string_pretty(&value)?;
    match &args.out {
        Some(path) => fs::write(path, rendered + "\n")?,
        None => println!("{rendered}"),
    }
    Ok(())
}
