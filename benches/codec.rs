//! Benchmarks for the `.cbin` codec.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use ledcube::{
    animation::{decode_slice, encode_to_vec},
    schema::{AnimationSequence, VoxelGrid},
};

fn test_sequence(frames: u64) -> AnimationSequence {
    AnimationSequence::with_frames(
        (0..frames).map(|i| VoxelGrid::noise(0.3, i)).collect(),
        100,
        true,
    )
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for frames in [1, 64, 1024] {
        let sequence = test_sequence(frames);
        group.bench_with_input(BenchmarkId::from_parameter(frames), &frames, |b, _| {
            b.iter(|| encode_to_vec(black_box(&sequence)).unwrap());
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for frames in [1, 64, 1024] {
        let bytes = encode_to_vec(&test_sequence(frames)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(frames), &frames, |b, _| {
            b.iter(|| decode_slice(black_box(&bytes)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
