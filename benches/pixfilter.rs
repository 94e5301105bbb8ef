use criterion::{criterion_group, criterion_main, Criterion};
use pixfilter::{
    CorrelationConfig, CorrelationMatcher, Execution, FilterParams, FilterRegistry, PixelBuffer,
};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let value = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8;
            data.extend_from_slice(&[value, value.wrapping_mul(3), 255 - value, 255]);
        }
    }
    PixelBuffer::from_rgba(data, width, height).unwrap()
}

fn crop(src: &PixelBuffer, x0: usize, y0: usize, width: usize, height: usize) -> PixelBuffer {
    let mut out = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let row = src.view().row(y0 + y).unwrap();
        out.extend_from_slice(&row[x0 * 4..(x0 + width) * 4]);
    }
    PixelBuffer::from_rgba(out, width, height).unwrap()
}

fn bench_filters(c: &mut Criterion) {
    let image = make_image(256, 256);
    let view = image.view();
    let registry = FilterRegistry::standard();

    for desc in registry.descriptors() {
        let params = FilterParams::defaults_for(desc);
        c.bench_function(&format!("filter_{}", desc.id), |b| {
            b.iter(|| black_box(registry.apply_filter(desc.id, view, &params).unwrap()));
        });
    }

    if cfg!(feature = "rayon") {
        let registry_par = FilterRegistry::standard().with_execution(Execution::Parallel);
        for id in ["gaussianBlur", "medianFilter", "sharpen"] {
            let desc = registry_par.get(id).unwrap().descriptor();
            let params = FilterParams::defaults_for(desc);
            c.bench_function(&format!("filter_{id}_parallel"), |b| {
                b.iter(|| black_box(registry_par.apply_filter(id, view, &params).unwrap()));
            });
        }
    }
}

fn bench_correlation(c: &mut Criterion) {
    let image = make_image(64, 48);
    let probe = crop(&image, 20, 12, 16, 16);
    let matcher = CorrelationMatcher::new();

    c.bench_function("auto_correlate_64x48", |b| {
        b.iter(|| black_box(matcher.auto_correlate(image.view()).unwrap()));
    });

    c.bench_function("cross_correlate_64x48_16x16", |b| {
        b.iter(|| black_box(matcher.cross_correlate(image.view(), probe.view()).unwrap()));
    });

    c.bench_function("match_patch_r3", |b| {
        b.iter(|| black_box(matcher.match_patch(image.view(), 28, 20, 3, image.view()).unwrap()));
    });

    if cfg!(feature = "rayon") {
        let matcher_par =
            CorrelationMatcher::new().with_config(CorrelationConfig::default().with_parallel(true));
        c.bench_function("auto_correlate_64x48_parallel", |b| {
            b.iter(|| black_box(matcher_par.auto_correlate(image.view()).unwrap()));
        });
    }
}

criterion_group!(benches, bench_filters, bench_correlation);
criterion_main!(benches);
