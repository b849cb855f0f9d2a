use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pigment_bca::kernel::diffuse;
use pigment_bca::policy::{DirectedWeighted, Kale15x15, UndirectedWeighted};
use pigment_bca::{BcaConfig, BcaEngine, DiffusionContext, DiffusionParams, Scratch, Variant};
use pigment_core::{Adjacency, PredicateWeights, RdfGraph, Term, Triple};

fn ring_with_chords(n: usize) -> RdfGraph {
    let mut graph = RdfGraph::new();
    for i in 0..n {
        let s = Term::iri(format!("node_{}", i));
        graph.add_triple(Triple::new(s.clone(), "next", Term::iri(format!("node_{}", (i + 1) % n))));
        graph.add_triple(Triple::new(s.clone(), "chord", Term::iri(format!("node_{}", (i * 17) % n))));
        graph.add_triple(Triple::new(s, "label", Term::literal(format!("label {}", i % 50))));
    }
    graph
}

fn bench_single_bookmark(c: &mut Criterion) {
    let graph = ring_with_chords(1000);
    let adjacency = Adjacency::build_partitioned(&graph, 1);
    let weights = PredicateWeights::uniform(graph.predicate_count());
    let ctx = DiffusionContext::new(
        &graph,
        &adjacency,
        &weights,
        DiffusionParams {
            alpha: 0.1,
            epsilon: 1e-4,
            reverse: false,
        },
    );
    let mut scratch = Scratch::for_context(&ctx);

    c.bench_function("bca_directed_weighted_1000_nodes", |b| {
        b.iter(|| diffuse(&ctx, &DirectedWeighted, black_box(0), &mut scratch))
    });
    c.bench_function("bca_undirected_weighted_1000_nodes", |b| {
        b.iter(|| diffuse(&ctx, &UndirectedWeighted, black_box(0), &mut scratch))
    });
    c.bench_function("bca_kale15x15_1000_nodes", |b| {
        b.iter(|| diffuse(&ctx, &Kale15x15, black_box(0), &mut scratch))
    });
}

fn bench_engine_run(c: &mut Criterion) {
    let graph = ring_with_chords(500);
    let engine = BcaEngine::new(BcaConfig {
        alpha: 0.15,
        epsilon: 1e-3,
        variant: Variant::DirectedWeighted,
        ..BcaConfig::default()
    })
    .unwrap();

    c.bench_function("bca_engine_500_nodes_all_bookmarks", |b| {
        b.iter(|| engine.run(black_box(&graph)))
    });
}

criterion_group!(benches, bench_single_bookmark, bench_engine_run);
criterion_main!(benches);
