use rand::Rng;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use podread::decoder::{decode_chunks, CpodDecoder, FpodDecoder};
use podread::FileFormat;

const NUM_CHUNKS: usize = 10_000;

// Random chunks with the tag byte drawn from the values a real file contains.
fn fpod_data() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let tags = [0u8, 90, 183, 249, 250, 254];
    let mut buf = vec![0u8; NUM_CHUNKS * 16];
    for chunk in buf.chunks_mut(16) {
        rng.fill(chunk);
        chunk[0] = tags[rng.gen_range(0..tags.len())];
    }
    buf
}

fn cpod_data() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut buf = vec![0u8; NUM_CHUNKS * 10];
    for chunk in buf.chunks_mut(10) {
        rng.fill(&mut chunk[..9]);
        chunk[9] = if rng.gen_bool(0.02) { 254 } else { 0 };
    }
    buf
}

fn bench_fpod_decode(c: &mut Criterion) {
    let data = fpod_data();
    let mut group = c.benchmark_group("fpod");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("decode_chunks", |b| {
        b.iter(|| {
            let decoder = FpodDecoder::with_capacity(FileFormat::Fp3, 30, NUM_CHUNKS);
            decode_chunks(decoder, &data[..], 16).unwrap()
        });
    });
    group.finish();
}

fn bench_cpod_decode(c: &mut Criterion) {
    let data = cpod_data();
    let mut group = c.benchmark_group("cpod");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("decode_chunks", |b| {
        b.iter(|| {
            let decoder = CpodDecoder::with_capacity(FileFormat::Cp1, NUM_CHUNKS);
            decode_chunks(decoder, &data[..], 10).unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_fpod_decode, bench_cpod_decode);
criterion_main!(benches);
