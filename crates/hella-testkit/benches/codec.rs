//! Benchmarks for the value codec, pointer derivation and combination keys.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hella_core::{combo_unordered60, decode, encode, object_pointer, soft_hash64, Value};
use hella_testkit::fixtures::{quote, QuoteFixture};

fn bench_encode_decode(c: &mut Criterion) {
    let fixture = QuoteFixture::new(256);
    let values: Vec<Value> = fixture
        .records
        .iter()
        .map(|r| Value::Object(r.fields.clone()))
        .collect();
    let encoded: Vec<Vec<u8>> = values.iter().map(encode).collect();
    let total: usize = encoded.iter().map(Vec::len).sum();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(total as u64));
    group.bench_function("encode_quotes", |b| {
        b.iter(|| {
            for v in &values {
                black_box(encode(black_box(v)));
            }
        })
    });
    group.bench_function("decode_quotes", |b| {
        b.iter(|| {
            for bytes in &encoded {
                black_box(decode(black_box(bytes), 0).ok());
            }
        })
    });
    group.finish();
}

fn bench_packed_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("packed_arrays");
    for len in [16usize, 256, 4096] {
        let ints = Value::Array((0..len as i64).map(|i| Value::Integer(i - 100)).collect());
        let floats = Value::Array((0..len).map(|i| Value::Float(i as f64 * 0.5)).collect());
        group.bench_with_input(BenchmarkId::new("integers", len), &ints, |b, v| {
            b.iter(|| black_box(encode(v)))
        });
        group.bench_with_input(BenchmarkId::new("floats", len), &floats, |b, v| {
            b.iter(|| black_box(encode(v)))
        });
    }
    group.finish();
}

fn bench_hashing(c: &mut Criterion) {
    let record = quote(7);
    let data = vec![0x5au8; 1024];

    let mut group = c.benchmark_group("hashing");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("soft_hash64_1k", |b| b.iter(|| soft_hash64(black_box(&data))));
    group.finish();

    c.bench_function("object_pointer_quote", |b| {
        b.iter(|| object_pointer(black_box(&record.fields), 0xc).ok())
    });

    let mut group = c.benchmark_group("combo_unordered60");
    for n in [4usize, 8, 12] {
        let items: Vec<Vec<u8>> = (0..n).map(|i| format!("field-{}", i).into_bytes()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &items, |b, items| {
            b.iter(|| black_box(combo_unordered60(items, 0xd).len()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode_decode, bench_packed_arrays, bench_hashing);
criterion_main!(benches);
