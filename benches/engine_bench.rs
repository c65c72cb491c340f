use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nearsim::algo::{lsh, minhash::MinHasher, shingle};
use nearsim::{Document, Options, Pipeline, ShingleType};

/// Generate synthetic text data for benchmarking
fn generate_texts(n: usize) -> Vec<String> {
    let domains = [
        "rust programming memory safety borrow checker ownership lifetime",
        "python data science machine learning pandas numpy tensorflow",
        "javascript web development react angular vue node express",
        "go concurrency goroutines channels microservices kubernetes docker",
        "java enterprise spring boot hibernate jpa gradle maven",
        "database sql postgresql mysql redis mongodb cassandra",
        "devops ci cd pipeline github actions jenkins terraform ansible",
        "security authentication authorization oauth jwt encryption",
        "cloud aws azure gcp serverless lambda functions compute",
        "mobile ios android flutter react native swift kotlin",
    ];
    (0..n)
        .map(|i| {
            let base = domains[i % domains.len()];
            format!("{base} item-{i} extra-context-{}", i % 100)
        })
        .collect()
}

fn bench_shingle(c: &mut Criterion) {
    let text = generate_texts(1).remove(0);
    c.bench_function("shingle/char5", |b| {
        b.iter(|| shingle::shingle(black_box(&text), ShingleType::Char, 5))
    });
    c.bench_function("shingle/word3", |b| {
        b.iter(|| shingle::shingle(black_box(&text), ShingleType::Word, 3))
    });
}

fn bench_sketch(c: &mut Criterion) {
    let texts = generate_texts(1000);
    let sets: Vec<_> = texts
        .iter()
        .filter_map(|t| shingle::shingle(t, ShingleType::Char, 5).ok())
        .collect();

    let mut group = c.benchmark_group("sketch");
    for num_hashes in [64, 128, 256] {
        let hasher = MinHasher::new(num_hashes, 42);
        group.bench_with_input(BenchmarkId::from_parameter(num_hashes), &sets, |b, sets| {
            b.iter(|| {
                for set in sets {
                    black_box(hasher.sketch(set));
                }
            })
        });
    }
    group.finish();
}

fn bench_banding(c: &mut Criterion) {
    let texts = generate_texts(5000);
    let hasher = MinHasher::new(128, 42);
    let signatures: Vec<_> = texts
        .iter()
        .filter_map(|t| shingle::shingle(t, ShingleType::Char, 5).ok())
        .map(|s| hasher.sketch(&s))
        .collect();

    c.bench_function("lsh_index/5000_candidate_pairs", |b| {
        b.iter(|| {
            let idx = lsh::LshIndex::from_keys(
                16,
                signatures
                    .iter()
                    .map(|s| lsh::band_keys(s, 16, 8))
                    .enumerate(),
            );
            black_box(idx.candidate_pairs().len())
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);
    for size in [100, 1000] {
        let texts = generate_texts(size);
        let options = Options {
            num_hashes: 128,
            num_bands: 16,
            num_rows: 8,
            ..Options::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(size), &texts, |b, texts| {
            b.iter(|| {
                let docs = Document::admit(texts.iter().map(|t| ("doc", t.as_str())));
                black_box(Pipeline::new(options.clone()).analyze(docs))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_shingle,
    bench_sketch,
    bench_banding,
    bench_pipeline,
);
criterion_main!(benches);
