/// Convolution Method Benchmarks
///
/// Compares direct summation against FFT evaluation for growing kernel sizes,
/// and measures the task protocol overhead on tiny inputs. Results guide the
/// defaults in `EngineConfig`.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use convkit_core::{conv1d, conv2d, s_conv1d, EngineConfig, NativeEngine, Padding, Padding2D};
use ndarray::Array2;

struct BenchConfig {
    name: &'static str,
    kernel: usize,
    input: usize,
}

const SIZES_1D: &[BenchConfig] = &[
    BenchConfig {
        name: "k8_n4k",
        kernel: 8,
        input: 4_096,
    },
    BenchConfig {
        name: "k32_n4k",
        kernel: 32,
        input: 4_096,
    },
    BenchConfig {
        name: "k128_n4k",
        kernel: 128,
        input: 4_096,
    },
    BenchConfig {
        name: "k512_n16k",
        kernel: 512,
        input: 16_384,
    },
];

fn signal(len: usize) -> Vec<f64> {
    (0..len).map(|i| ((i * 31) % 17) as f64 - 8.0).collect()
}

fn bench_methods_1d(c: &mut Criterion) {
    let direct = NativeEngine::with_config(EngineConfig::direct_only());
    let fft = NativeEngine::with_config(EngineConfig::fft_only());
    let mut group = c.benchmark_group("conv1d_method");

    for config in SIZES_1D {
        let h = signal(config.kernel);
        let x = signal(config.input);
        group.bench_with_input(BenchmarkId::new("direct", config.name), &config, |b, _| {
            b.iter(|| conv1d(&direct, black_box(&h), black_box(&x), Padding::Same))
        });
        group.bench_with_input(BenchmarkId::new("fft", config.name), &config, |b, _| {
            b.iter(|| conv1d(&fft, black_box(&h), black_box(&x), Padding::Same))
        });
    }

    group.finish();
}

fn bench_methods_2d(c: &mut Criterion) {
    let direct = NativeEngine::with_config(EngineConfig::direct_only());
    let fft = NativeEngine::with_config(EngineConfig::fft_only());
    let mut group = c.benchmark_group("conv2d_method");

    for k in [3usize, 9, 17] {
        let h = Array2::from_shape_fn((k, k), |(i, j)| ((i + j) % 5) as f32 * 0.1);
        let x = Array2::from_shape_fn((128, 128), |(i, j)| ((i * 3 + j) % 11) as f32);
        group.bench_with_input(BenchmarkId::new("direct", k), &k, |b, _| {
            b.iter(|| conv2d(&direct, black_box(h.view()), black_box(x.view()), Padding2D::Same))
        });
        group.bench_with_input(BenchmarkId::new("fft", k), &k, |b, _| {
            b.iter(|| conv2d(&fft, black_box(h.view()), black_box(x.view()), Padding2D::Same))
        });
    }

    group.finish();
}

fn bench_protocol_overhead(c: &mut Criterion) {
    let engine = NativeEngine::new();
    let kernel = [1.0f32, 1.0, 1.0];
    let x = [1.0f32, 2.0, 3.0, 4.0, 5.0];
    c.bench_function("s_conv1d_tiny", |b| {
        b.iter(|| {
            let mut result = [0.0f32; 5];
            s_conv1d(
                &engine,
                black_box(&kernel),
                3,
                black_box(&x),
                5,
                0,
                &mut result,
                5,
            )
        })
    });
}

criterion_group!(
    benches,
    bench_methods_1d,
    bench_methods_2d,
    bench_protocol_overhead
);

criterion_main!(benches);
