//! Normalized 2D Gaussian weights.

use crate::util::math::window_shape;
use crate::util::{PixFilterError, PixFilterResult};

/// Square Gaussian weight matrix whose entries sum to one.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    radius: usize,
    side: usize,
    sigma: f64,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// Builds a `(2*radius+1)^2` kernel with standard deviation `sigma`.
    ///
    /// The weight at offset `(dx, dy)` from the center is
    /// `exp(-(dx^2 + dy^2) / (2 sigma^2))`, divided by the sum of all weights.
    pub fn new(radius: usize, sigma: f64) -> PixFilterResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(PixFilterError::InvalidInput(
                "gaussian sigma must be finite and positive",
            ));
        }

        let (side, _) = window_shape(radius, std::mem::size_of::<f64>())?;
        let r = radius as i64;
        let denom = 2.0 * sigma * sigma;
        let mut weights = Vec::with_capacity(side * side);
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = (dx * dx + dy * dy) as f64;
                weights.push((-d2 / denom).exp());
            }
        }

        let sum: f64 = weights.iter().sum();
        if !(sum.is_finite() && sum > 0.0) {
            return Err(PixFilterError::InvalidInput("gaussian weights underflowed"));
        }
        for w in &mut weights {
            *w /= sum;
        }

        Ok(Self {
            radius,
            side,
            sigma,
            weights,
        })
    }

    /// Builds a kernel with `sigma = radius / 3`.
    pub fn from_radius(radius: usize) -> PixFilterResult<Self> {
        Self::new(radius, radius as f64 / 3.0)
    }

    /// Returns the kernel radius.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Returns the standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Returns the side length of the square kernel.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Row-major weights matching the window layout.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weighted sum of one channel of an interleaved window.
    #[inline]
    pub(crate) fn weighted_channel(&self, window: &[u8], channels: usize, channel: usize) -> f64 {
        self.weights
            .iter()
            .zip(window.chunks_exact(channels))
            .map(|(w, px)| w * f64::from(px[channel]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::GaussianKernel;
    use crate::util::PixFilterError;

    #[test]
    fn weights_are_symmetric_and_peak_at_center() {
        let kernel = GaussianKernel::new(2, 1.0).unwrap();
        let w = kernel.weights();
        assert_eq!(w.len(), 25);
        let center = w[12];
        assert!(w.iter().all(|&v| v <= center));
        assert!((w[0] - w[24]).abs() < 1e-15);
        assert!((w[7] - w[11]).abs() < 1e-15);
    }

    #[test]
    fn radius_zero_is_identity() {
        let kernel = GaussianKernel::new(0, 1.0).unwrap();
        assert_eq!(kernel.weights(), &[1.0]);
    }

    #[test]
    fn rejects_non_positive_sigma() {
        assert_eq!(
            GaussianKernel::new(1, 0.0).unwrap_err(),
            PixFilterError::InvalidInput("gaussian sigma must be finite and positive")
        );
        assert!(GaussianKernel::new(1, f64::NAN).is_err());
        assert!(GaussianKernel::from_radius(0).is_err());
    }
}
