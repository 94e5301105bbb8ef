//! Numeric helpers shared by the filters.

use crate::util::{PixFilterError, PixFilterResult};

/// Rounds half away from zero and clamps to the 8-bit range.
///
/// Non-finite inputs map to 0.
#[inline]
pub(crate) fn round_to_u8(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Converts a validated, non-negative parameter value into an integer radius.
#[inline]
pub(crate) fn to_radius(value: f64) -> usize {
    value.round().max(0.0) as usize
}

/// Checked shape of a square window: `(side, side * side * channels)`.
///
/// `channels` may also be an element size in bytes when sizing non-`u8` storage.
///
/// Fails when the radius cannot be represented as a window on this target.
pub(crate) fn window_shape(radius: usize, channels: usize) -> PixFilterResult<(usize, usize)> {
    let side = radius
        .checked_mul(2)
        .and_then(|d| d.checked_add(1))
        .filter(|_| i64::try_from(radius).is_ok());
    side.and_then(|s| {
        s.checked_mul(s)
            .and_then(|area| area.checked_mul(channels))
            .filter(|&len| isize::try_from(len).is_ok())
            .map(|len| (s, len))
    })
    .ok_or(PixFilterError::InvalidInput("window radius is too large"))
}

#[cfg(test)]
mod tests {
    use super::{round_to_u8, to_radius, window_shape};

    #[test]
    fn round_to_u8_rounds_half_away_from_zero() {
        assert_eq!(round_to_u8(0.5), 1);
        assert_eq!(round_to_u8(1.5), 2);
        assert_eq!(round_to_u8(2.5), 3);
        assert_eq!(round_to_u8(2.49), 2);
    }

    #[test]
    fn round_to_u8_clamps_and_rejects_nan() {
        assert_eq!(round_to_u8(-12.0), 0);
        assert_eq!(round_to_u8(300.0), 255);
        assert_eq!(round_to_u8(f64::NAN), 0);
        assert_eq!(round_to_u8(f64::INFINITY), 0);
    }

    #[test]
    fn radius_helpers() {
        assert_eq!(to_radius(2.4), 2);
        assert_eq!(to_radius(2.6), 3);
        assert_eq!(window_shape(3, 4), Ok((7, 196)));
        assert!(window_shape(usize::MAX / 2, 1).is_err());
        assert!(window_shape(usize::MAX, 1).is_err());
    }
}
