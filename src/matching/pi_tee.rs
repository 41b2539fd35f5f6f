//! Pi and Tee three-element solvers with a target network Q.
//!
//! The virtual resistance is set by the requested Q (`rv = Rmax/(Q²+1)` for
//! the Pi, `rv = Rmin·(Q²+1)` for the Tee); a target below the minimum
//! `√(Rmax/Rmin − 1)` cannot reach both terminations and reports NaN. Both
//! element orders are solved: C-L-C alongside L-C-L for the Pi, and the
//! corresponding pair for the Tee.

use crate::math::{CScalar, Scalar};
use crate::units::Scale;

use super::{labels, PiTee};

fn pi_tee(
    vals: [Scalar; 6],
    q: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> PiTee {
    let (c_unit, l_unit) = labels(c_scale, l_scale);
    let [c, cs, cl, l, ls, ll] = vals;
    PiTee {
        c,
        cs,
        cl,
        l,
        ls,
        ll,
        q,
        c_unit,
        l_unit,
    }
}

fn all_nan(c_scale: &Scale, l_scale: &Scale) -> PiTee {
    pi_tee([f64::NAN; 6], f64::NAN, c_scale, l_scale)
}

/// Pi network solver.
#[must_use]
pub fn pi(
    zs: CScalar,
    zl: CScalar,
    w: Scalar,
    q_tgt: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> PiTee {
    if q_tgt < 0.0 {
        return all_nan(c_scale, l_scale);
    }
    if q_tgt == 0.0 && zs.re == zl.re {
        return pi_tee([0.0; 6], 0.0, c_scale, l_scale);
    }
    if q_tgt < (zs.re.max(zl.re) / zs.re.min(zl.re) - 1.0).sqrt() {
        return all_nan(c_scale, l_scale);
    }

    let rv = zs.re.max(zl.re) / (q_tgt * q_tgt + 1.0);
    let qs = -zs.im / zs.re;
    let ql = -zl.im / zl.re;
    let rps = zs.re * (1.0 + qs * qs);
    let rpl = zl.re * (1.0 + ql * ql);

    // C-L-C order.
    let cps = qs / (rps * w);
    let cpl = ql / (rpl * w);
    let mut qx = (rps / rv - 1.0).sqrt();
    let mut cs = qx / (w * rps) - cps;
    let l5 = qx * rv / w;
    qx = (rpl / rv - 1.0).sqrt();
    let mut cl = qx / (w * rpl) - cpl;
    let mut l = l5 + qx * rv / w;

    // L-C-L order.
    qx = (rps / rv - 1.0).sqrt();
    let mut ls = rps / (w * qx);
    if qs != 0.0 {
        let lps = rps / (qs * w);
        ls *= lps / (ls - lps);
    }
    let c5 = 1.0 / (w * qx * rv);
    qx = (rpl / rv - 1.0).sqrt();
    let mut ll = rpl / (w * qx);
    if ql != 0.0 {
        let lpl = rpl / (ql * w);
        ll *= lpl / (ll - lpl);
    }
    let c1 = 1.0 / (w * qx * rv);
    let mut c = c1 * c5 / (c1 + c5);

    c *= c_scale.display_multiplier();
    cs *= c_scale.display_multiplier();
    cl *= c_scale.display_multiplier();
    l *= l_scale.display_multiplier();
    ls *= l_scale.display_multiplier();
    ll *= l_scale.display_multiplier();

    if c < 0.0 || ls < 0.0 || ll < 0.0 {
        c = f64::NAN;
        ls = f64::NAN;
        ll = f64::NAN;
    }
    if l < 0.0 || cs < 0.0 || cl < 0.0 {
        l = f64::NAN;
        cs = f64::NAN;
        cl = f64::NAN;
    }
    pi_tee([c, cs, cl, l, ls, ll], q_tgt, c_scale, l_scale)
}

/// Tee network solver.
#[must_use]
pub fn tee(
    zs: CScalar,
    zl: CScalar,
    w: Scalar,
    q_tgt: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> PiTee {
    if q_tgt < 0.0 {
        return all_nan(c_scale, l_scale);
    }
    if q_tgt == 0.0 && zs.re == zl.re {
        return pi_tee([0.0; 6], 0.0, c_scale, l_scale);
    }
    if q_tgt < (zs.re.max(zl.re) / zs.re.min(zl.re) - 1.0).sqrt() {
        return all_nan(c_scale, l_scale);
    }

    let rv = zs.re.min(zl.re) * (q_tgt * q_tgt + 1.0);

    // C-L-C order, series capacitors absorbing the terminations.
    let mut qx = (rv / zs.re - 1.0).sqrt();
    let mut cs = 1.0 / (w * zs.re * qx);
    if zs.im != 0.0 {
        if cs == -1.0 / (w * zs.im) {
            cs = f64::INFINITY;
        } else {
            cs *= -1.0 / (w * zs.im) / (cs + 1.0 / (w * zs.im));
        }
    }

    let l5 = rv / (w * qx);
    qx = (rv / zl.re - 1.0).sqrt();
    let mut cl = 1.0 / (w * zl.re * qx);
    if zl.im != 0.0 {
        if cl == -1.0 / (w * zs.im) {
            cl = f64::INFINITY;
        } else {
            cl *= -1.0 / (w * zs.im) / (cl + 1.0 / (w * zs.im));
        }
    }

    let l1 = rv / (w * qx);
    let mut l = l1 * l5 / (l1 + l5);

    // L-C-L order.
    qx = (rv / zs.re - 1.0).sqrt();
    let mut ls = qx * zs.re / w - zs.im / w;
    let c5 = qx / (w * rv);
    qx = (rv / zl.re - 1.0).sqrt();
    let mut ll = qx * zl.re / w - zl.im / w;
    let mut c = c5 + qx / (w * rv);

    c *= c_scale.display_multiplier();
    cs *= c_scale.display_multiplier();
    cl *= c_scale.display_multiplier();
    l *= l_scale.display_multiplier();
    ls *= l_scale.display_multiplier();
    ll *= l_scale.display_multiplier();

    if c < 0.0 || ls < 0.0 || ll < 0.0 {
        c = f64::NAN;
        ls = f64::NAN;
        ll = f64::NAN;
    }
    if l < 0.0 || cs < 0.0 || cl < 0.0 || cs == f64::INFINITY || cl == f64::INFINITY {
        l = f64::NAN;
        cs = f64::NAN;
        cl = f64::NAN;
    }
    pi_tee([c, cs, cl, l, ls, ll], q_tgt, c_scale, l_scale)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn pi_solves_the_reference_pair() {
        let zs = CScalar::new(42.4, -19.6);
        let zl = CScalar::new(212.3, 43.2);
        let w = 2.0 * PI * 275.0e9;
        let out = pi(zs, zl, w, 4.32, &Scale::Femto, &Scale::Pico);
        assert!(out.c.is_nan());
        assert!(out.ls.is_nan());
        assert!(out.ll.is_nan());
        assert_relative_eq!(out.cs, 16.62637373190316, max_relative = 1.0e-10);
        assert_relative_eq!(out.cl, 12.08508737222243, max_relative = 1.0e-10);
        assert_relative_eq!(out.l, 39.704380813877926, max_relative = 1.0e-10);
        assert_relative_eq!(out.q, 4.32);
    }

    #[test]
    fn tee_solves_the_reference_pair() {
        let zs = CScalar::new(42.4, -19.6);
        let zl = CScalar::new(212.3, 43.2);
        let w = 2.0 * PI * 275.0e9;
        let out = tee(zs, zl, w, 4.32, &Scale::Femto, &Scale::Pico);
        assert_relative_eq!(out.c, 4.186603177852454, max_relative = 1.0e-10);
        assert_relative_eq!(out.ls, 117.35101636675431, max_relative = 1.0e-10);
        assert_relative_eq!(out.ll, 185.20322518485523, max_relative = 1.0e-10);
        assert!(out.cs.is_nan());
        assert!(out.cl.is_nan());
        assert!(out.l.is_nan());
    }

    #[test]
    fn q_below_the_feasible_minimum_is_rejected() {
        let zs = CScalar::new(42.4, -19.6);
        let zl = CScalar::new(212.3, 43.2);
        let w = 2.0 * PI * 275.0e9;
        // √(212.3/42.4 − 1) ≈ 1.73 — ask for less.
        let out = pi(zs, zl, w, 1.0, &Scale::Femto, &Scale::Pico);
        assert!(out.cs.is_nan() && out.l.is_nan() && out.q.is_nan());
    }

    #[test]
    fn negative_q_is_rejected() {
        let out = tee(
            CScalar::new(50.0, 0.0),
            CScalar::new(100.0, 0.0),
            2.0 * PI * 1.0e9,
            -1.0,
            &Scale::Pico,
            &Scale::Nano,
        );
        assert!(out.c.is_nan() && out.q.is_nan());
    }

    #[test]
    fn matched_resistances_at_zero_q_need_no_network() {
        let out = pi(
            CScalar::new(50.0, 0.0),
            CScalar::new(50.0, 0.0),
            2.0 * PI * 1.0e9,
            0.0,
            &Scale::Pico,
            &Scale::Nano,
        );
        assert_relative_eq!(out.c, 0.0);
        assert_relative_eq!(out.l, 0.0);
        assert_relative_eq!(out.q, 0.0);
    }
}
