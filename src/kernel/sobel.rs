//! 3x3 Sobel derivative kernels.

/// Horizontal derivative kernel, row-major.
pub const SOBEL_X: [i32; 9] = [-1, 0, 1, -2, 0, 2, -1, 0, 1];
/// Vertical derivative kernel, row-major.
pub const SOBEL_Y: [i32; 9] = [-1, -2, -1, 0, 0, 0, 1, 2, 1];

/// Computes `(gx, gy)` for one channel of an interleaved 3x3 window.
#[inline]
pub fn gradient_at(window: &[u8], channels: usize, channel: usize) -> (i32, i32) {
    let mut gx = 0i32;
    let mut gy = 0i32;
    for (i, px) in window.chunks_exact(channels).take(9).enumerate() {
        let v = i32::from(px[channel]);
        gx += v * SOBEL_X[i];
        gy += v * SOBEL_Y[i];
    }
    (gx, gy)
}

/// Euclidean gradient magnitude.
#[inline]
pub fn magnitude(gx: i32, gy: i32) -> f64 {
    f64::from(gx).hypot(f64::from(gy))
}
