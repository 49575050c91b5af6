//! Known-topology regression tests for the analysis pipeline.
//!
//! Each test builds a small hierarchy with hand-computed expectations for
//! the pruned edge set and every metric it touches.

use scopegraph_analysis::{analyze, annotate};
use scopegraph_core::{
    AnalysisConfig, Artifact, ArtifactId, ArtifactKind, Hierarchy, HierarchyBuilder, InputTree,
    Reference,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn id(s: &str) -> ArtifactId {
    ArtifactId::from(s)
}

/// One file whose symbols are `names`, each with the given size.
fn single_file(symbols: &[(&str, usize)]) -> Hierarchy {
    let mut b = HierarchyBuilder::new();
    b.add(None, Artifact::new("root", "root", ArtifactKind::folder()))
        .unwrap();
    b.add(Some(&id("root")), Artifact::new("F", "lib.rs", ArtifactKind::file()))
        .unwrap();
    for (name, loc) in symbols {
        b.add(
            Some(&id("F")),
            Artifact::new(*name, *name, ArtifactKind::symbol("Function")).with_lines_of_code(*loc),
        )
        .unwrap();
    }
    b.build().unwrap()
}

fn refs(edges: &[(&str, &str)]) -> Vec<Reference> {
    edges.iter().map(|(s, t)| Reference::new(*s, *t)).collect()
}

// ---------------------------------------------------------------------------
// Redundant edge: A→B, B→C, A→C
// ---------------------------------------------------------------------------

#[test]
fn redundant_edge_dropped() {
    let h = single_file(&[("A", 1), ("B", 1), ("C", 1)]);
    let analysis = analyze(
        &h,
        &refs(&[("A", "B"), ("B", "C"), ("A", "C")]),
        &AnalysisConfig::default(),
    )
    .unwrap();

    let file = analysis.graph(&id("F")).unwrap();
    assert_eq!(file.edge_count(), 2);
    assert_eq!(file.weight(&id("A"), &id("B")), Some(1));
    assert_eq!(file.weight(&id("B"), &id("C")), Some(1));
    assert_eq!(file.weight(&id("A"), &id("C")), None, "C reachable via B");

    let a = analysis.metrics.get(&id("A")).unwrap();
    let c = analysis.metrics.get(&id("C")).unwrap();
    assert_eq!(a.outgoing_dependencies_in_scope, 1);
    assert_eq!(c.ingoing_dependencies_in_scope, 1);
    assert_eq!(analysis.report.pruned_edge_count(), 1);
}

// ---------------------------------------------------------------------------
// Cycle: A→B, B→C, C→A, D→A
// ---------------------------------------------------------------------------

#[test]
fn cycle_members_flagged_and_edges_kept() {
    let h = single_file(&[("A", 1), ("B", 1), ("C", 1), ("D", 1)]);
    let analysis = analyze(
        &h,
        &refs(&[("A", "B"), ("B", "C"), ("C", "A"), ("D", "A")]),
        &AnalysisConfig::default(),
    )
    .unwrap();

    let file = analysis.graph(&id("F")).unwrap();
    assert_eq!(file.edge_count(), 4, "same-SCC edges and D→A all kept");
    assert_eq!(file.weight(&id("D"), &id("A")), Some(1));

    for name in ["A", "B", "C"] {
        let m = analysis.metrics.get(&id(name)).unwrap();
        assert!(m.is_in_a_cycle, "{name}");
        assert_eq!(m.component_rank, 0);
        assert_eq!(m.scc_index_topologically_sorted, 1);
    }
    let d = analysis.metrics.get(&id("D")).unwrap();
    assert!(!d.is_in_a_cycle);
    assert_eq!(d.scc_index_topologically_sorted, 0);

    let stats = &analysis.report.scopes.iter().find(|s| s.scope == id("F")).unwrap();
    assert_eq!(stats.component_count, 1);
    assert_eq!(stats.scc_count, 2);
    assert_eq!(stats.cycle_count, 1);
}

// ---------------------------------------------------------------------------
// Component ranking: totals [50, 120, 30]
// ---------------------------------------------------------------------------

#[test]
fn components_ranked_by_descending_size() {
    // Three components: {P}=50, {Q1,Q2}=120, {R}=30.
    let h = single_file(&[("P", 50), ("Q1", 100), ("Q2", 20), ("R", 30)]);
    let analysis = analyze(&h, &refs(&[("Q1", "Q2")]), &AnalysisConfig::default()).unwrap();

    let rank = |n: &str| analysis.metrics.get(&id(n)).unwrap().component_rank;
    assert_eq!(rank("Q1"), 0);
    assert_eq!(rank("Q2"), 0);
    assert_eq!(rank("P"), 1);
    assert_eq!(rank("R"), 2);
}

// ---------------------------------------------------------------------------
// Cross-scope projection: S1 in F1 → S2 in F2, both in folder D
// ---------------------------------------------------------------------------

const CROSS_SCOPE: &str = r#"{
  "root": {
    "id": "root", "name": "repo",
    "subfolders": [{
      "id": "D", "name": "src",
      "files": [
        { "id": "F1", "name": "a.rs",
          "symbols": [{ "id": "S1", "name": "parse", "kindName": "Function", "linesOfCode": 12 }] },
        { "id": "F2", "name": "b.rs",
          "symbols": [{ "id": "S2", "name": "Token", "kindName": "Struct", "linesOfCode": 4 }] }
      ]
    }]
  },
  "references": [{ "source": "S1", "target": "S2" }]
}"#;

#[test]
fn cross_scope_reference_projects_to_common_folder() {
    let (h, references) = InputTree::from_json(CROSS_SCOPE)
        .unwrap()
        .into_hierarchy()
        .unwrap();
    let analysis = analyze(&h, &references, &AnalysisConfig::default()).unwrap();

    let folder = analysis.graph(&id("D")).unwrap();
    assert_eq!(folder.edge_count(), 1);
    assert_eq!(folder.weight(&id("F1"), &id("F2")), Some(1));

    for file in ["F1", "F2"] {
        assert_eq!(
            analysis.graph(&id(file)).unwrap().edge_count(),
            0,
            "no symbol-level edge in {file}"
        );
    }

    let tree = annotate(&h, &analysis).unwrap();
    let d = tree.find(&id("D")).unwrap();
    assert_eq!(d.dependencies.len(), 1);
    assert_eq!(d.dependencies[0].source, id("F1"));
    assert_eq!(d.dependencies[0].target, id("F2"));
    assert_eq!(d.dependencies[0].weight, 1);
}

#[test]
fn repeated_references_aggregate_weight() {
    let h = single_file(&[("A", 1), ("B", 1)]);
    let analysis = analyze(
        &h,
        &refs(&[("A", "B"), ("A", "B"), ("A", "B")]),
        &AnalysisConfig::default(),
    )
    .unwrap();
    let file = analysis.graph(&id("F")).unwrap();
    assert_eq!(file.edge_count(), 1);
    assert_eq!(file.weight(&id("A"), &id("B")), Some(3));
    assert_eq!(
        analysis.metrics.get(&id("A")).unwrap().outgoing_dependencies_in_scope,
        1,
        "degree counts edges, not weight"
    );
}

#[test]
fn stale_references_are_warnings_not_failures() {
    let h = single_file(&[("A", 1), ("B", 1)]);
    let analysis = analyze(
        &h,
        &refs(&[("A", "B"), ("A", "deleted"), ("A", "A")]),
        &AnalysisConfig::default(),
    )
    .unwrap();

    let codes: Vec<&str> = analysis
        .report
        .skipped
        .iter()
        .map(|s| s.code.as_str())
        .collect();
    assert_eq!(codes, vec!["E3001", "E3003"]);
    assert_eq!(analysis.graph(&id("F")).unwrap().edge_count(), 1);
}
