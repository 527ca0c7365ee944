//! Human-readable side listings of an assembly run.

use itertools::Itertools;

use crate::numbering::OperatorNumbering;
use crate::registry::Registry;

/// Lines `name re im s1 s2 s3 d1 d2 d3 L`, sorted with duplicates removed.
pub fn sorted_channel_list(registry: &Registry) -> Vec<String> {
    registry
        .operator_records()
        .iter()
        .flat_map(|record| {
            record
                .terms
                .iter()
                .map(move |term| format!("{} {} {}", record.name, term.coefficient, term.tuple))
        })
        .sorted()
        .dedup()
        .collect()
}

/// A count line followed by `id name` lines.
pub fn operator_name_listing(numbering: &OperatorNumbering) -> Vec<String> {
    std::iter::once(numbering.len().to_string())
        .chain(
            numbering
                .names()
                .iter()
                .enumerate()
                .map(|(id, name)| format!("{id} {name}")),
        )
        .collect()
}

/// Joins listing lines into file text with a trailing newline.
pub fn to_text(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}
