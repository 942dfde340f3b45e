//! Benchmarks for vista-graph.
//!
//! Steps are built on demand for every prototype walk, so construction and
//! hashing have to stay cheap.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hashbrown::HashSet;
use vista_core::schema::{SchemaBuilder, TableBuilder};
use vista_core::{DataType, TableId};
use vista_graph::{DatabaseGraph, Direction, Path, Step};

/// A chain T0 <- T1 <- ... <- Tn, each table also carrying two parallel
/// keys to T0.
fn chain_graph(len: usize) -> DatabaseGraph {
    let mut builder = SchemaBuilder::new();
    for t in 0..len {
        let mut table = TableBuilder::new(format!("T{}", t))
            .unwrap()
            .add_field("NOM", DataType::String)
            .unwrap();
        if t > 0 {
            table = table
                .add_foreign_key("ID_PREV", &format!("T{}", t - 1))
                .unwrap()
                .add_foreign_key("ID_ROOT_A", "T0")
                .unwrap()
                .add_foreign_key("ID_ROOT_B", "T0")
                .unwrap();
        }
        builder = builder.add_table(table).unwrap();
    }
    DatabaseGraph::new(builder.build().unwrap())
}

fn bench_step_create(c: &mut Criterion) {
    let graph = chain_graph(8);
    let field = graph.schema().field_id("T3", "ID_PREV").unwrap();
    let mut group = c.benchmark_group("step");

    group.bench_function("from_field", |b| {
        b.iter(|| Step::from_field(&graph, black_box(3), field, Direction::Unresolved))
    });

    group.bench_function("between_multi", |b| {
        b.iter(|| Step::between(&graph, black_box(5), black_box(0)))
    });

    let step = Step::between(&graph, 5, 0).unwrap();
    group.bench_function("reverse", |b| b.iter(|| black_box(&step).reverse()));
    group.bench_function("single_steps", |b| b.iter(|| black_box(&step).single_steps()));

    group.finish();
}

fn bench_path_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("path");

    for len in [2usize, 4, 8] {
        let graph = chain_graph(len + 1);
        let tables: Vec<TableId> = (0..=len as TableId).rev().collect();
        let path = Path::between(&graph, &tables).unwrap();

        group.bench_with_input(BenchmarkId::new("hash_insert", len), &path, |b, path| {
            b.iter(|| {
                let mut set = HashSet::new();
                set.insert(black_box(path.clone()));
                set
            })
        });
        group.bench_with_input(BenchmarkId::new("reverse", len), &path, |b, path| {
            b.iter(|| black_box(path).reverse())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step_create, bench_path_hash);
criterion_main!(benches);
