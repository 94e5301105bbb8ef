use pixfilter::filter::{box_blur, median};
use pixfilter::lowlevel::{extract_window_into, source_index};
use pixfilter::{
    extract_window, CorrelationMatcher, Execution, GaussianKernel, PixFilterError, PixelBuffer,
    PixelView,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn gradient_rgba(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, (x + y) as u8, 255]);
        }
    }
    data
}

#[test]
fn window_size_is_constant_everywhere() {
    for width in 1..=5 {
        for height in 1..=5 {
            let data = gradient_rgba(width, height);
            let view = PixelView::rgba(&data, width, height).unwrap();
            for radius in 0..=3 {
                let side = 2 * radius + 1;
                for y in -2..height as i64 + 2 {
                    for x in -2..width as i64 + 2 {
                        let window = extract_window(view, x, y, radius).unwrap();
                        assert_eq!(window.width(), side);
                        assert_eq!(window.height(), side);
                        assert_eq!(window.data().len(), side * side * 4);
                    }
                }
            }
        }
    }
}

#[test]
fn corner_window_replicates_corner_pixel() {
    let data = gradient_rgba(4, 3);
    let view = PixelView::rgba(&data, 4, 3).unwrap();
    let window = extract_window(view, 0, 0, 1).unwrap();
    let corner = view.pixel(0, 0).unwrap();

    for (wx, wy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(window.pixel(wx, wy).unwrap(), corner);
    }
    assert_eq!(window.pixel(2, 2).unwrap(), view.pixel(1, 1).unwrap());
    assert_eq!(window.pixel(2, 0).unwrap(), view.pixel(1, 0).unwrap());
}

#[test]
fn one_by_one_image_fills_window() {
    let data = [7u8, 8, 9, 10];
    let view = PixelView::rgba(&data, 1, 1).unwrap();
    let window = extract_window(view, 0, 0, 2).unwrap();
    assert!(window.data().chunks_exact(4).all(|px| px == data));
}

#[test]
fn random_windows_match_clamped_lookup() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let (width, height) = (9, 7);
    let data: Vec<u8> = (0..width * height).map(|_| rng.random()).collect();
    let view = PixelView::luma(&data, width, height).unwrap();
    let mut scratch = Vec::new();

    for _ in 0..200 {
        let cx = rng.random_range(-4i64..13);
        let cy = rng.random_range(-4i64..11);
        let radius = rng.random_range(0usize..4);
        extract_window_into(view, cx, cy, radius, &mut scratch).unwrap();

        let r = radius as i64;
        let mut idx = 0;
        for wy in cy - r..=cy + r {
            for wx in cx - r..=cx + r {
                let sx = source_index(wx, width);
                let sy = source_index(wy, height);
                assert_eq!(scratch[idx], data[sy * width + sx]);
                idx += 1;
            }
        }
        assert_eq!(idx, scratch.len());
    }
}

#[test]
fn oversized_radius_is_an_error() {
    let img = PixelBuffer::filled(2, 2, &[1, 2, 3, 4]).unwrap();
    let mut scratch = Vec::new();
    for radius in [usize::MAX / 2, usize::MAX, 1usize << (usize::BITS / 2)] {
        let err = extract_window(img.view(), 0, 0, radius).unwrap_err();
        assert!(matches!(err, PixFilterError::InvalidInput(_)), "radius {radius}");
        let err = extract_window_into(img.view(), 1, 1, radius, &mut scratch).unwrap_err();
        assert!(matches!(err, PixFilterError::InvalidInput(_)), "radius {radius}");
    }
}

#[test]
fn extreme_center_is_an_error() {
    let img = PixelBuffer::filled(2, 2, &[1, 2, 3, 4]).unwrap();
    assert!(extract_window(img.view(), i64::MAX, 0, 1).is_err());
    assert!(extract_window(img.view(), 0, i64::MIN, 1).is_err());
}

#[test]
fn oversized_radius_fails_in_consumers() {
    let img = PixelBuffer::filled(2, 2, &[1, 2, 3, 4]).unwrap();
    let huge = usize::MAX / 2;
    assert!(box_blur(img.view(), huge, Execution::Sequential).is_err());
    assert!(median(img.view(), huge, Execution::Sequential).is_err());
    assert!(GaussianKernel::from_radius(huge).is_err());
    let err = CorrelationMatcher::new()
        .match_patch(img.view(), 0, 0, huge, img.view())
        .unwrap_err();
    assert!(matches!(err, PixFilterError::InvalidInput(_)));
}
