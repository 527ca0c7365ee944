use criterion::{criterion_group, criterion_main, Criterion};
use qqq_core::{Coefficient, OperatorType};
use qqq_proj::{Channel, CoefficientTable, MemorySource, OperatorSelection, ProjectionTerm};
use qqq_table::{
    Artifact, ArtifactHeader, KeyOrder, OperatorNumbering, QuarkOrdering, Registry, TableBuilder,
};

fn synthetic_table(operators: usize, terms: usize) -> CoefficientTable {
    let table = (0..operators)
        .map(|op| {
            (0..terms)
                .map(|term| {
                    let n = (op * terms + term) as i32;
                    ProjectionTerm {
                        spins: [1 + n % 4, 1 + (n / 4) % 4, 1 + (n / 16) % 4],
                        displacements: [0, 0, (n / 64) % 7 - 3],
                        coefficient: Coefficient::new(1.0 / (1 + term) as f64, 0.0),
                    }
                })
                .collect()
        })
        .collect();
    CoefficientTable::from_operators("synthetic", table)
}

fn sample_source(channels: &[Channel]) -> MemorySource {
    let mut source = MemorySource::new();
    for channel in channels {
        source.insert(channel, OperatorType::SingleSite, synthetic_table(8, 24));
        source.insert(channel, OperatorType::SinglyDisplaced, synthetic_table(32, 48));
    }
    source
}

fn bench_registry(c: &mut Criterion) {
    let channels: Vec<Channel> = ["G1g", "G1u", "Hg", "Hu"]
        .into_iter()
        .map(|name| Channel::new(name).unwrap())
        .collect();
    let mut selection = OperatorSelection::new();
    selection.set(OperatorType::SingleSite, (0..8).collect());
    selection.set(OperatorType::SinglyDisplaced, (0..32).collect());
    let mut source = sample_source(&channels);

    c.bench_function("registry_build_and_emit", |b| {
        b.iter(|| {
            let mut registry = Registry::new();
            let mut builder = TableBuilder::new(&mut source, &[1, 2, 3]).unwrap();
            for channel in &channels {
                builder
                    .build_channel(&mut registry, channel, &selection)
                    .unwrap();
            }
            let numbering = OperatorNumbering::assign(&registry).unwrap();
            let header = ArtifactHeader {
                lattice: [16, 16, 16, 32],
                source_orderings: QuarkOrdering::SOURCE.to_vec(),
                sink_orderings: vec![QuarkOrdering::IDENTITY],
                dilution: [1, 1, 1],
            };
            let artifact =
                Artifact::assemble(header, &registry, &numbering, KeyOrder::Ascending, Vec::new())
                    .unwrap();
            artifact.to_text().len()
        });
    });
}

criterion_group!(benches, bench_registry);
criterion_main!(benches);
