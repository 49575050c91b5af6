//! Larger generated trees: parallel and sequential runs must agree.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scopegraph_analysis::analyze;
use scopegraph_core::{
    AnalysisConfig, Artifact, ArtifactId, ArtifactKind, Hierarchy, HierarchyBuilder, Reference,
};

fn corpus(
    seed: u64,
    folders: usize,
    files: usize,
    symbols: usize,
    references: usize,
) -> (Hierarchy, Vec<Reference>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = HierarchyBuilder::new();
    let root = ArtifactId::from("root");
    b.add(None, Artifact::new("root", "repo", ArtifactKind::folder()))
        .unwrap();

    let mut leaves = Vec::new();
    for d in 0..folders {
        let folder = ArtifactId::new(format!("d{d}"));
        b.add(
            Some(&root),
            Artifact::new(folder.clone(), format!("mod{d}"), ArtifactKind::folder()),
        )
        .unwrap();
        for f in 0..files {
            let file = ArtifactId::new(format!("d{d}/f{f}"));
            b.add(
                Some(&folder),
                Artifact::new(file.clone(), format!("f{f}.rs"), ArtifactKind::file()),
            )
            .unwrap();
            for s in 0..symbols {
                let symbol = ArtifactId::new(format!("d{d}/f{f}#s{s}"));
                b.add(
                    Some(&file),
                    Artifact::new(symbol.clone(), format!("s{s}"), ArtifactKind::symbol("Function"))
                        .with_lines_of_code(rng.gen_range(1..200)),
                )
                .unwrap();
                leaves.push(symbol);
            }
        }
    }

    let references = (0..references)
        .map(|_| {
            Reference::new(
                leaves[rng.gen_range(0..leaves.len())].clone(),
                leaves[rng.gen_range(0..leaves.len())].clone(),
            )
        })
        .collect();

    (b.build().unwrap(), references)
}

#[test]
fn parallel_and_sequential_runs_agree() {
    for seed in [7_u64, 42, 1_234] {
        let (hierarchy, references) = corpus(seed, 6, 5, 6, 800);

        let parallel = analyze(&hierarchy, &references, &AnalysisConfig::default()).unwrap();
        let sequential = analyze(
            &hierarchy,
            &references,
            &AnalysisConfig {
                parallel: false,
                ..AnalysisConfig::default()
            },
        )
        .unwrap();

        assert_eq!(parallel.metrics.snapshot(), sequential.metrics.snapshot());
        assert_eq!(parallel.report.content_hash, sequential.report.content_hash);
        assert_eq!(parallel.metrics.len(), hierarchy.len());
    }
}

#[test]
fn same_seed_gives_same_hash() {
    let run = |seed| {
        let (hierarchy, references) = corpus(seed, 4, 4, 5, 400);
        analyze(&hierarchy, &references, &AnalysisConfig::default())
            .unwrap()
            .report
            .content_hash
    };
    assert_eq!(run(99), run(99));
    assert_ne!(run(99), run(100));
}
