//! Frequency grids for span sweeps.

use crate::math::Scalar;

/// Generates `n` linearly spaced samples in `[start, stop]`.
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            (0..n).map(|i| start + step * i as Scalar).collect()
        }
    }
}

/// Frequency samples for a span sweep: `2·resolution + 1` points centered on
/// `center_hz`, spanning ±`span_hz`. A zero span (or zero resolution)
/// collapses to the single center sample.
#[must_use]
pub fn span_frequencies(center_hz: Scalar, span_hz: Scalar, resolution: usize) -> Vec<Scalar> {
    if span_hz == 0.0 || resolution == 0 {
        return vec![center_hz];
    }
    linspace(center_hz - span_hz, center_hz + span_hz, 2 * resolution + 1)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn linspace_basic() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn zero_span_yields_one_sample() {
        assert_eq!(span_frequencies(1.0e9, 0.0, 20), vec![1.0e9]);
    }

    #[test]
    fn span_sampling_is_symmetric() {
        let v = span_frequencies(10.0e9, 1.0e9, 20);
        assert_eq!(v.len(), 41);
        assert_relative_eq!(v[0], 9.0e9, max_relative = 1.0e-12);
        assert_relative_eq!(v[20], 10.0e9, max_relative = 1.0e-12);
        assert_relative_eq!(v[40], 11.0e9, max_relative = 1.0e-12);
    }
}
