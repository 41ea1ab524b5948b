use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pqct_quant_rs::image_pipeline::{
    CalibrationParameters, FixedHeaderReader, Image, LabelImage, PqctImageReader, RawImageDescriptor,
    aggregate, calibrate,
};

fn generate_mock_pqct_file(side: usize) -> Vec<u8> {
    let mut data = vec![0u8; RawImageDescriptor::default().header_length];
    for y in 0..side {
        for x in 0..side {
            let value = ((x * 7 + y * 13) % 4000) as i16 - 1000;
            data.extend_from_slice(&value.to_le_bytes());
        }
    }
    data
}

fn generate_labels(side: usize, clusters: usize) -> LabelImage {
    let data = (0..side * side).map(|i| (i % clusters) as i32).collect();
    Image::new(side, side, data).unwrap()
}

const SIZES: [usize; 3] = [128, 283, 512];

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let reader = FixedHeaderReader::default();

    for side in SIZES {
        let file = generate_mock_pqct_file(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &file, |b, data| {
            b.iter(|| reader.read_pqct(black_box(data)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_calibrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibrate");
    let reader = FixedHeaderReader::default();
    let params = CalibrationParameters::default();

    for side in SIZES {
        let pixels = reader.read_pqct(&generate_mock_pqct_file(side)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(side), &pixels, |b, pixels| {
            b.iter(|| calibrate(black_box(pixels), None, &params).unwrap());
        });
    }

    group.finish();
}

fn benchmark_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let reader = FixedHeaderReader::default();
    let params = CalibrationParameters::default();

    for side in SIZES {
        let pixels = reader.read_pqct(&generate_mock_pqct_file(side)).unwrap();
        let density = calibrate(&pixels, None, &params).unwrap();
        let labels = generate_labels(side, 4);
        group.bench_with_input(BenchmarkId::from_parameter(side), &density, |b, density| {
            b.iter(|| aggregate(black_box(&labels), black_box(density), 4, 0.64, None).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_decode, benchmark_calibrate, benchmark_aggregate);
criterion_main!(benches);
