//! Simultaneous conjugate matching and stability from measured two-port
//! S-parameters.
//!
//! Given S11/S12/S21/S22 this derives the Rollett stability factor, the
//! maximum available gain, and the source/load reflection coefficients (and
//! impedances) that conjugately match both ports at once. An unconditionally
//! unstable device surfaces as non-finite gain/match values rather than an
//! error.

use crate::analysis::{equivalent_parallel_rc, gamma_to_impedance};
use crate::math::{CScalar, Scalar};
use crate::units::Scale;

/// One port's side of the simultaneous match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortMatch {
    /// Reflection coefficient to present to the port.
    pub gamma: CScalar,
    /// The corresponding impedance in ohms.
    pub z: CScalar,
    /// Parallel-R of the R‖C display pair, derived from `gamma` in the
    /// normalized (unit-reference) frame.
    pub r: Scalar,
    /// Parallel-C of the R‖C display pair, in `cap_scale` units.
    pub c: Scalar,
}

/// Stability and conjugate-match summary of a two-port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConjugateMatch {
    /// Rollett stability factor k (> 1 with |Δ| < 1 means unconditionally
    /// stable).
    pub k: Scalar,
    /// Source-side intermediate term `1 + |S11|² − |S22|² − |Δ|²`.
    pub b1: Scalar,
    /// Load-side intermediate term `1 + |S22|² − |S11|² − |Δ|²`.
    pub b2: Scalar,
    /// Maximum available gain in dB.
    pub mag_db: Scalar,
    /// Source-port match.
    pub src: PortMatch,
    /// Load-port match.
    pub load: PortMatch,
}

/// Computes stability and the simultaneous conjugate match.
#[must_use]
pub fn conjugate_match(
    s11: CScalar,
    s12: CScalar,
    s21: CScalar,
    s22: CScalar,
    z0: Scalar,
    freq_hz: Scalar,
    cap_scale: &Scale,
) -> ConjugateMatch {
    let ds = s11 * s22 - s12 * s21;

    let k = (1.0 + ds.norm().powi(2) - s11.norm().powi(2) - s22.norm().powi(2))
        / (2.0 * s12.norm() * s21.norm());
    let b1 = 1.0 + s11.norm().powi(2) - s22.norm().powi(2) - ds.norm().powi(2);
    let b2 = 1.0 + s22.norm().powi(2) - s11.norm().powi(2) - ds.norm().powi(2);

    let mag_db = 10.0 * (s21.norm() / s12.norm()).log10()
        + 10.0 * (k - b1.signum() * (k.powi(2) - 1.0).sqrt()).abs().log10();

    let c2 = s22 - ds * s11.conj();
    let gamma_load_mag =
        (b2 - b2.signum() * (b2.powi(2) - 4.0 * c2.norm().powi(2)).sqrt()) / (2.0 * c2.norm());
    let gamma_load = CScalar::from_polar(gamma_load_mag, -c2.arg());
    let z_load = gamma_to_impedance(gamma_load, z0);
    let (rl, cl) = equivalent_parallel_rc(gamma_load, freq_hz, &Scale::Base, cap_scale);

    let gamma_src = (s11 + s12 * s21 * gamma_load / (1.0 - gamma_load * s22)).conj();
    let z_src = gamma_to_impedance(gamma_src, z0);
    let (rs, cs) = equivalent_parallel_rc(gamma_src, freq_hz, &Scale::Base, cap_scale);

    ConjugateMatch {
        k,
        b1,
        b2,
        mag_db,
        src: PortMatch {
            gamma: gamma_src,
            z: z_src,
            r: rs,
            c: cs,
        },
        load: PortMatch {
            gamma: gamma_load,
            z: z_load,
            r: rl,
            c: cl,
        },
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn stable_device_reference_match() {
        let out = conjugate_match(
            CScalar::new(0.34, 0.21),
            CScalar::new(0.0434, -0.0052),
            CScalar::new(0.32, -3.4),
            CScalar::new(0.34, -0.52),
            100.0,
            275.0e9,
            &Scale::Femto,
        );
        assert_relative_eq!(out.k, 1.7031802961437423, max_relative = 1.0e-10);
        assert_relative_eq!(out.b1, 0.7195251545599999, max_relative = 1.0e-10);
        assert_relative_eq!(out.b2, 1.1721251545600002, max_relative = 1.0e-10);
        assert_relative_eq!(out.mag_db, 14.039928315508192, max_relative = 1.0e-10);

        assert_relative_eq!(out.src.gamma.re, 0.5040400052246673, max_relative = 1.0e-10);
        assert_relative_eq!(out.src.gamma.im, -0.13478919243703535, max_relative = 1.0e-10);
        assert_relative_eq!(out.src.z.re, 275.52180881729475, max_relative = 1.0e-10);
        assert_relative_eq!(out.src.z.im, -102.05718583392367, max_relative = 1.0e-10);

        assert_relative_eq!(out.load.gamma.re, 0.31959462490960494, max_relative = 1.0e-10);
        assert_relative_eq!(out.load.gamma.im, 0.6148725683749898, max_relative = 1.0e-10);
        assert_relative_eq!(out.load.z.re, 61.804850661047205, max_relative = 1.0e-10);
        assert_relative_eq!(out.load.z.im, 146.22072038786013, max_relative = 1.0e-10);
    }

    #[test]
    fn parallel_rc_views_follow_the_match() {
        let out = conjugate_match(
            CScalar::new(0.34, 0.21),
            CScalar::new(0.0434, -0.0052),
            CScalar::new(0.32, -3.4),
            CScalar::new(0.34, -0.52),
            100.0,
            275.0e9,
            &Scale::Femto,
        );
        assert_relative_eq!(out.src.r, 0.5400850139729908, max_relative = 1.0e-10);
        assert_relative_eq!(out.src.c, 286.5598722530983, max_relative = 1.0e-10);
        assert_relative_eq!(out.load.r, 1.502556558161738, max_relative = 1.0e-10);
        assert_relative_eq!(out.load.c, -741.0410407114609, max_relative = 1.0e-10);
    }

    #[test]
    fn potentially_unstable_device_yields_non_finite_gain() {
        // |S11| > 1 style pathological data drives k² − 1 negative.
        let out = conjugate_match(
            CScalar::new(0.9, 0.0),
            CScalar::new(0.5, 0.0),
            CScalar::new(2.0, 0.0),
            CScalar::new(0.9, 0.0),
            50.0,
            1.0e9,
            &Scale::Pico,
        );
        assert!(out.k < 1.0);
        assert!(out.mag_db.is_nan());
    }
}
