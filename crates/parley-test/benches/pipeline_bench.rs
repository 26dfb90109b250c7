//! Benchmarks for validation and decoding

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use parley_core::{inspect, is_valid, join_tokens, tokens, Decoder, RawMessage, MARTIAN_WORDS};

fn sample_sentence() -> String {
    let words: Vec<&str> = MARTIAN_WORDS.iter().take(5).map(|(token, _)| *token).collect();
    join_tokens(&words)
}

fn bench_is_valid(c: &mut Criterion) {
    let sentence = sample_sentence();

    c.bench_function("is_valid", |b| b.iter(|| is_valid(black_box(&sentence))));
}

fn bench_inspect(c: &mut Criterion) {
    let raw = RawMessage::from(sample_sentence());

    c.bench_function("inspect", |b| b.iter(|| black_box(inspect(black_box(&raw)))));
}

fn bench_decode_cached(c: &mut Criterion) {
    let decoder = Decoder::default();
    decoder.decode("L-R-Z");

    c.bench_function("decode_cached", |b| {
        b.iter(|| black_box(decoder.decode(black_box("L-R-Z"))))
    });
}

fn bench_decode_unknown(c: &mut Criterion) {
    let decoder = Decoder::default();

    c.bench_function("decode_unknown", |b| {
        b.iter(|| black_box(decoder.decode(black_box("B-K--Z"))))
    });
}

fn bench_translate_sentence(c: &mut Criterion) {
    let decoder = Decoder::default();
    let sentence = sample_sentence();

    c.bench_function("translate_sentence", |b| {
        b.iter(|| black_box(decoder.translate(tokens(black_box(&sentence)))))
    });
}

criterion_group!(
    benches,
    bench_is_valid,
    bench_inspect,
    bench_decode_cached,
    bench_decode_unknown,
    bench_translate_sentence,
);
criterion_main!(benches);
