//! Shared numerical primitives anchored on `num-complex`.

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Primary complex scalar type used for impedances and reflection
/// coefficients.
pub type CScalar = num_complex::Complex<Scalar>;

/// Returns the complex exponential `e^(j·theta)`.
#[must_use]
pub fn phasor(theta: Scalar) -> CScalar {
    CScalar::from_polar(1.0, theta)
}

/// Complex reciprocal `1/(re + j·im)`.
///
/// A zero input produces non-finite components; callers either guard or let
/// the NaN propagate to the terminal quantities.
#[must_use]
pub fn reciprocal(z: CScalar) -> CScalar {
    let d = z.re * z.re + z.im * z.im;
    CScalar::new(z.re / d, -z.im / d)
}

/// Magnitude and phase (degrees, normalized to `[0°, 360°)`) of a complex
/// value. The quadrant fold adds 180° when the real part is negative and
/// wraps negative angles by +360°.
#[must_use]
pub fn magnitude_phase(z: CScalar) -> (Scalar, Scalar) {
    let mag = z.norm();
    let mut phase = z.im.atan2(z.re).to_degrees();
    if phase < 0.0 {
        phase += 360.0;
    }
    (mag, phase)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn reciprocal_is_an_involution() {
        let z = CScalar::new(42.4, -19.6);
        let back = reciprocal(reciprocal(z));
        assert_relative_eq!(back.re, z.re, max_relative = 1.0e-12);
        assert_relative_eq!(back.im, z.im, max_relative = 1.0e-12);
    }

    #[test]
    fn reciprocal_matches_known_value() {
        let z = reciprocal(CScalar::new(3.0, 4.0));
        assert_relative_eq!(z.re, 0.12, max_relative = 1.0e-12);
        assert_relative_eq!(z.im, -0.16, max_relative = 1.0e-12);
    }

    #[test]
    fn phase_folds_into_all_four_quadrants() {
        assert_relative_eq!(magnitude_phase(CScalar::new(1.0, 1.0)).1, 45.0);
        assert_relative_eq!(magnitude_phase(CScalar::new(-1.0, 1.0)).1, 135.0);
        assert_relative_eq!(magnitude_phase(CScalar::new(-1.0, -1.0)).1, 225.0);
        assert_relative_eq!(magnitude_phase(CScalar::new(1.0, -1.0)).1, 315.0);
    }

    #[test]
    fn phasor_has_unit_magnitude() {
        let p = phasor(1.234);
        assert_relative_eq!(p.norm(), 1.0, max_relative = 1.0e-12);
    }
}
