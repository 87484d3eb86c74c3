use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use syndrome_sim::ecc::{bits, CodeParameters, Codec, CosetLeaderTable, NoisyChannel};

fn random_code(k: usize, n: usize) -> CodeParameters {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    CodeParameters::random(k, n, 0.05, &mut rng).unwrap()
}

fn bench_table_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("coset_leader_table");
    for &(k, n) in &[(4, 8), (6, 12), (8, 16), (10, 20)] {
        let params = random_code(k, n);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("[{}, {}]", n, k)),
            &params,
            |b, params| b.iter(|| CosetLeaderTable::build(black_box(params)).unwrap()),
        );
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for &(k, n) in &[(4, 8), (8, 16)] {
        let codec = Codec::new(random_code(k, n)).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut channel = NoisyChannel::with_seed(0.05, 7).unwrap();
        let received: Vec<_> = (0..256)
            .map(|_| {
                let message = bits::unpack(rng.gen::<u64>(), k);
                channel.transmit(&codec.encode(&message).unwrap())
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("sequential", format!("[{}, {}]", n, k)),
            &received,
            |b, received| {
                b.iter(|| {
                    for vector in received {
                        black_box(codec.decode(vector).unwrap());
                    }
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("batch", format!("[{}, {}]", n, k)),
            &received,
            |b, received| b.iter(|| black_box(codec.decode_batch(received).unwrap())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_table_construction, bench_decode);
criterion_main!(benches);
