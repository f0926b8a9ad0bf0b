//! Criterion benchmarks for the `malang` pipeline stages. See `benches/`.
