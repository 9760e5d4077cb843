//! Benchmarks for handle generation and modifier expansion.
//!
//! Run with: cargo bench -p css-handles

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use css_handles::prelude::*;
use css_handles::{DiagnosticsConfig, GeneratorConfig};

const APP: &str = "vtex.store-components@3.14.0";

fn handle_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("handle{i}")).collect()
}

fn generator() -> HandleGenerator {
    let diagnostics = Arc::new(ModifierDiagnostics::new(
        DiagnosticsConfig::default().with_mode(BuildMode::Production),
    ));
    HandleGenerator::new(
        GeneratorConfig::default()
            .with_mode(BuildMode::Production)
            .with_diagnostics(diagnostics),
    )
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let g = generator();
    let options = HandlesOptions::new()
        .block_class("home")
        .migrations_from(["vtex.store@2.0.0", "vtex.shelf@1.0.0"]);

    for count in [4, 16, 64] {
        let names = handle_names(count);
        group.bench_with_input(BenchmarkId::new("migrations", count), &names, |b, names| {
            b.iter(|| g.generate(black_box(names), black_box(APP), &options))
        });
    }
    group.finish();
}

fn bench_memo_hit(c: &mut Criterion) {
    let names = handle_names(16);
    let options = HandlesOptions::new().block_class("home");
    let mut memo = HandlesMemo::new(generator());
    c.bench_function("memo/hit", |b| {
        b.iter(|| memo.get_or_generate(black_box(&names), APP, &options))
    });
}

fn bench_with_modifiers(c: &mut Criterion) {
    let bag = generator()
        .generate(&["container"], APP, &HandlesOptions::new().block_class("home"))
        .expect("production mode never rejects");
    c.bench_function("with_modifiers/three", |b| {
        b.iter(|| bag.with_modifiers(black_box("container"), ["active", "selected", "first"]))
    });
}

criterion_group!(benches, bench_generate, bench_memo_hit, bench_with_modifiers);
criterion_main!(benches);
