//! Two-element L-section solvers.
//!
//! Each variant absorbs the source/load reactance into the nearest element
//! (series-to-parallel transformation of the terminating Q) and solves the
//! resistive step with the section Q. Negative component values mean the
//! section cannot realize the match and everything reports NaN.

use crate::math::{CScalar, Scalar};
use crate::units::Scale;

use super::{labels, CL};

fn cl(c: Scalar, l: Scalar, q: Scalar, c_scale: &Scale, l_scale: &Scale) -> CL {
    let (c_unit, l_unit) = labels(c_scale, l_scale);
    CL {
        c,
        l,
        q,
        c_unit,
        l_unit,
    }
}

/// Series C toward the source, shunt L at the load.
///
/// ```text
/// ---CAP---------
///           |
///          IND
///           |
///          GND
/// ```
#[must_use]
pub fn hp_ell_cl(
    zs: CScalar,
    zl: CScalar,
    w: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> CL {
    if zs.re == zl.re && zs.im == -zl.im {
        return cl(0.0, 0.0, zs.im / zs.re, c_scale, l_scale);
    }

    let qs = zl.im / zl.re;
    let c1 = -1.0 / (w * zs.im);
    let l1 = (1.0 + qs * qs) * zl.im / (w * qs * qs);
    let rp = (1.0 + qs * qs) * zl.re;

    if zs.re > rp {
        return cl(f64::NAN, f64::NAN, f64::NAN, c_scale, l_scale);
    }

    let mut q = (rp / zs.re - 1.0).sqrt();
    let mut l = rp / (w * q);
    let mut c = 1.0 / (q * w * zs.re);

    if zs.im != 0.0 {
        if c1 == c {
            c = f64::INFINITY;
        } else {
            c *= c1 / (c1 - c);
        }
    }
    if zl.im != 0.0 {
        if l1 == l {
            l = f64::INFINITY;
        } else {
            l *= l1 / (l1 - l);
        }
    }

    c *= c_scale.display_multiplier();
    l *= l_scale.display_multiplier();
    if c < 0.0 || l < 0.0 {
        c = f64::NAN;
        l = f64::NAN;
        q = f64::NAN;
    }
    cl(c, l, q, c_scale, l_scale)
}

/// Shunt L at the source, series C toward the load.
///
/// ```text
/// --------CAP----
///     |
///    IND
///     |
///    GND
/// ```
#[must_use]
pub fn hp_ell_lc(
    zs: CScalar,
    zl: CScalar,
    w: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> CL {
    if zs.re == zl.re && zs.im == -zl.im {
        return cl(0.0, 0.0, zs.im / zs.re, c_scale, l_scale);
    }

    let qs = zs.im / zs.re;
    let c1 = -1.0 / (w * zl.im);
    let l1 = (1.0 + qs * qs) * zs.im / (w * qs * qs);
    let rp = (1.0 + qs * qs) * zs.re;
    let rs = zl.re;

    if rs > rp {
        return cl(f64::NAN, f64::NAN, f64::NAN, c_scale, l_scale);
    }

    let mut q = (rp / rs - 1.0).sqrt();
    let mut l = rp / (w * q);
    let mut c = 1.0 / (q * w * rs);

    if zl.im != 0.0 {
        if c1 == c {
            c = f64::INFINITY;
        } else {
            c *= c1 / (c1 - c);
        }
    }
    if zs.im != 0.0 {
        if l1 == l {
            l = f64::INFINITY;
        } else {
            l *= l1 / (l1 - l);
        }
    }

    c *= c_scale.display_multiplier();
    l *= l_scale.display_multiplier();
    if c < 0.0 || l < 0.0 {
        c = f64::NAN;
        l = f64::NAN;
        q = f64::NAN;
    }
    cl(c, l, q, c_scale, l_scale)
}

/// Shunt C at the source, series L toward the load.
///
/// ```text
/// --------IND----
///     |
///    CAP
///     |
///    GND
/// ```
#[must_use]
pub fn lp_ell_cl(
    zs: CScalar,
    zl: CScalar,
    w: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> CL {
    if zs.re == zl.re && zs.im == -zl.im {
        return cl(0.0, 0.0, zs.im / zs.re, c_scale, l_scale);
    }

    let qs = -zs.im / zs.re;
    let rp = zs.re * (1.0 + qs * qs);

    if zl.re > rp {
        return cl(f64::NAN, f64::NAN, f64::NAN, c_scale, l_scale);
    }

    let mut q = (rp / zl.re - 1.0).sqrt();
    let cp = q / (rp * w);
    let c1 = qs / (rp * w);
    let mut c = cp - c1;
    let ls = q * zl.re / w;
    let l1 = zl.im / w;
    let mut l = ls - l1;

    c *= c_scale.display_multiplier();
    l *= l_scale.display_multiplier();
    if c < 0.0 || l < 0.0 {
        c = f64::NAN;
        l = f64::NAN;
        q = f64::NAN;
    }
    cl(c, l, q, c_scale, l_scale)
}

/// Series L toward the source, shunt C at the load.
///
/// ```text
/// ---IND---------
///           |
///          CAP
///           |
///          GND
/// ```
#[must_use]
pub fn lp_ell_lc(
    zs: CScalar,
    zl: CScalar,
    w: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> CL {
    if zs.re == zl.re && zs.im == -zl.im {
        return cl(0.0, 0.0, zs.im / zs.re, c_scale, l_scale);
    }

    let qs = -zl.im / zl.re;
    let rp = zl.re * (1.0 + qs * qs);

    if zs.re > rp {
        return cl(f64::NAN, f64::NAN, f64::NAN, c_scale, l_scale);
    }

    let mut q = (rp / zs.re - 1.0).sqrt();
    let cp = q / (rp * w);
    let c1 = qs / (rp * w);
    let mut c = cp - c1;
    let ls = q * zs.re / w;
    let l1 = zs.im / w;
    let mut l = ls - l1;

    c *= c_scale.display_multiplier();
    l *= l_scale.display_multiplier();
    if c < 0.0 || l < 0.0 {
        c = f64::NAN;
        l = f64::NAN;
        q = f64::NAN;
    }
    cl(c, l, q, c_scale, l_scale)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn hp_ell_cl_known_solutions() {
        let zs = CScalar::new(42.4, -19.6);
        let zl = CScalar::new(212.3, 43.2);
        let w = 2.0 * PI * 275.0e9;
        let out = hp_ell_cl(zs, zl, w, &Scale::Femto, &Scale::Pico);
        assert_relative_eq!(out.c, 8.58125245724517, max_relative = 1.0e-10);
        assert_relative_eq!(out.l, 69.18681390709257, max_relative = 1.0e-10);
        assert_relative_eq!(out.q, 2.0529004985170953, max_relative = 1.0e-10);
        assert_eq!(out.c_unit, "fF");
        assert_eq!(out.l_unit, "pH");

        let zs = CScalar::new(62.4, -14.6);
        let zl = CScalar::new(202.3, 23.2);
        let w = 2.0 * PI * 175.0e6;
        let out = hp_ell_cl(zs, zl, w, &Scale::Pico, &Scale::Nano);
        assert_relative_eq!(out.c, 11.408503434826747, max_relative = 1.0e-10);
        assert_relative_eq!(out.l, 133.4483264614267, max_relative = 1.0e-10);
        assert_relative_eq!(out.q, 1.5114976179652644, max_relative = 1.0e-10);
    }

    #[test]
    fn hp_ell_cl_reports_unrealizable_direction() {
        // Stepping down in resistance cannot be done with this orientation.
        let zs = CScalar::new(212.3, 43.2);
        let zl = CScalar::new(42.4, -19.6);
        let w = 2.0 * PI * 175.0e9;
        let out = hp_ell_cl(zs, zl, w, &Scale::Pico, &Scale::Nano);
        assert!(out.c.is_nan() && out.l.is_nan() && out.q.is_nan());
    }

    #[test]
    fn hp_ell_lc_mirrors_cl_with_swapped_ports() {
        let zs = CScalar::new(212.3, 43.2);
        let zl = CScalar::new(42.4, -19.6);
        let w = 2.0 * PI * 275.0e9;
        let out = hp_ell_lc(zs, zl, w, &Scale::Femto, &Scale::Pico);
        assert_relative_eq!(out.c, 8.58125245724517, max_relative = 1.0e-10);
        assert_relative_eq!(out.l, 69.18681390709257, max_relative = 1.0e-10);
        assert_relative_eq!(out.q, 2.0529004985170953, max_relative = 1.0e-10);
    }

    #[test]
    fn lp_ell_cl_known_solutions() {
        let zs = CScalar::new(212.3, 43.2);
        let zl = CScalar::new(42.4, -19.6);
        let w = 2.0 * PI * 275.0e9;
        let out = lp_ell_cl(zs, zl, w, &Scale::Femto, &Scale::Pico);
        assert_relative_eq!(out.c, 5.906505625073422, max_relative = 1.0e-10);
        assert_relative_eq!(out.l, 61.719118523742445, max_relative = 1.0e-10);
        assert_relative_eq!(out.q, 2.0529004985170953, max_relative = 1.0e-10);

        let out = lp_ell_cl(
            CScalar::new(202.3, 23.2),
            CScalar::new(62.4, -14.6),
            2.0 * PI * 175.0e6,
            &Scale::Pico,
            &Scale::Nano,
        );
        assert_relative_eq!(out.c, 7.2157251698188345, max_relative = 1.0e-10);
        assert_relative_eq!(out.l, 99.0557187033109, max_relative = 1.0e-10);
        assert_relative_eq!(out.q, 1.5114976179652644, max_relative = 1.0e-10);
    }

    #[test]
    fn lp_ell_lc_known_solutions() {
        let zs = CScalar::new(42.4, -19.6);
        let zl = CScalar::new(212.3, 43.2);
        let w = 2.0 * PI * 275.0e9;
        let out = lp_ell_lc(zs, zl, w, &Scale::Femto, &Scale::Pico);
        assert_relative_eq!(out.c, 5.906505625073422, max_relative = 1.0e-10);
        assert_relative_eq!(out.l, 61.719118523742445, max_relative = 1.0e-10);

        let out = lp_ell_lc(
            CScalar::new(212.3, 43.2),
            CScalar::new(42.4, -19.6),
            2.0 * PI * 275.0e9,
            &Scale::Femto,
            &Scale::Pico,
        );
        assert!(out.c.is_nan() && out.l.is_nan() && out.q.is_nan());
    }
}
