//! Four-element ladder solvers: the two-step high-pass/low-pass networks and
//! the four band-pass hybrids.
//!
//! All of them pivot through the intermediate resistance `rv = √(rp·r)` of a
//! two-section match; the mirrored variants are the same equations with the
//! source and load exchanged.

use crate::math::{CScalar, Scalar};
use crate::units::Scale;

use super::{labels, CCLL};

fn ccll(cs: Scalar, cl: Scalar, ls: Scalar, ll: Scalar, c_scale: &Scale, l_scale: &Scale) -> CCLL {
    let (c_unit, l_unit) = labels(c_scale, l_scale);
    CCLL {
        cs,
        cl,
        ls,
        ll,
        c_unit,
        l_unit,
    }
}

fn ccll_nan(c_scale: &Scale, l_scale: &Scale) -> CCLL {
    ccll(f64::NAN, f64::NAN, f64::NAN, f64::NAN, c_scale, l_scale)
}

/// High-pass ladder, shunt inductors on both sides.
///
/// ```text
/// --------CAP-------CAP--
///     |         |
///    IND       IND
///     |         |
///    GND       GND
/// ```
#[must_use]
pub fn hp1(zs: CScalar, zl: CScalar, w: Scalar, c_scale: &Scale, l_scale: &Scale) -> CCLL {
    let q = zs.im / zs.re;
    let rp = (1.0 + q * q) * zs.re;
    let rv = (rp * zl.re).sqrt();
    if rp <= rv {
        return ccll_nan(c_scale, l_scale);
    }

    let qs = (rp / rv - 1.0).sqrt();
    let ql = (rv / zl.re - 1.0).sqrt();
    let lp = rp / (w * q);
    let mut cs = 1.0 / (w * rv * qs);
    let mut ls = rp / (w * qs);
    if zs.im != 0.0 {
        if lp == ls {
            ls = f64::INFINITY;
        } else {
            ls *= lp / (lp - ls);
        }
    }

    let c5 = -1.0 / (w * zl.im);
    let mut ll = rv / (w * ql);
    let mut cl = 1.0 / (w * zl.re * ql);
    if zl.im != 0.0 {
        if c5 == cl {
            cl = f64::INFINITY;
        } else {
            cl *= c5 / (c5 - cl);
        }
    }

    cs *= c_scale.display_multiplier();
    cl *= c_scale.display_multiplier();
    ls *= l_scale.display_multiplier();
    ll *= l_scale.display_multiplier();
    if cs < 0.0 || cl < 0.0 || ls < 0.0 || ll < 0.0 {
        return ccll_nan(c_scale, l_scale);
    }
    ccll(cs, cl, ls, ll, c_scale, l_scale)
}

/// High-pass ladder entered through a series capacitor; [`hp1`] with the
/// ports exchanged.
#[must_use]
pub fn hp2(zs: CScalar, zl: CScalar, w: Scalar, c_scale: &Scale, l_scale: &Scale) -> CCLL {
    hp1(zl, zs, w, c_scale, l_scale)
}

/// Low-pass ladder, shunt capacitors on both sides.
///
/// ```text
/// --------IND-------IND--
///     |         |
///    CAP       CAP
///     |         |
///    GND       GND
/// ```
#[must_use]
pub fn lp1(zs: CScalar, zl: CScalar, w: Scalar, c_scale: &Scale, l_scale: &Scale) -> CCLL {
    let q = -zs.im / zs.re;
    let rp = (1.0 + q * q) * zs.re;
    let rv = (rp * zl.re).sqrt();
    if rp <= rv {
        return ccll_nan(c_scale, l_scale);
    }

    let qs = (rp / rv - 1.0).sqrt();
    let ql = (rv / zl.re - 1.0).sqrt();
    let cp = q / (w * rp);
    let mut cs = qs / (w * rp) - cp;
    let mut ls = qs * rv / w;
    let mut ll = zl.re * ql / w - zl.im / w;
    let mut cl = ql / (w * rv);

    cs *= c_scale.display_multiplier();
    cl *= c_scale.display_multiplier();
    ls *= l_scale.display_multiplier();
    ll *= l_scale.display_multiplier();
    if cs < 0.0 || cl < 0.0 || ls < 0.0 || ll < 0.0 {
        return ccll_nan(c_scale, l_scale);
    }
    ccll(cs, cl, ls, ll, c_scale, l_scale)
}

/// Low-pass ladder entered through a series inductor; [`lp1`] with the ports
/// exchanged.
#[must_use]
pub fn lp2(zs: CScalar, zl: CScalar, w: Scalar, c_scale: &Scale, l_scale: &Scale) -> CCLL {
    lp1(zl, zs, w, c_scale, l_scale)
}

/// Band-pass ladder: high-pass section at the source, low-pass at the load.
///
/// ```text
/// --------CAP-------IND--
///     |         |
///    IND       CAP
///     |         |
///    GND       GND
/// ```
#[must_use]
pub fn bp1(zs: CScalar, zl: CScalar, w: Scalar, c_scale: &Scale, l_scale: &Scale) -> CCLL {
    let q = zs.im / zs.re;
    let rp = (1.0 + q * q) * zs.re;
    let rv = (rp * zl.re).sqrt();
    if rp <= rv {
        return ccll_nan(c_scale, l_scale);
    }

    let qs = (rp / rv - 1.0).sqrt();
    let ql = (rv / zl.re - 1.0).sqrt();
    let lp = rp / (w * q);
    let mut cs = 1.0 / (w * rv * qs);
    let mut ls = rp / (w * qs);
    if zs.im != 0.0 {
        if lp == ls {
            ls = f64::INFINITY;
        } else {
            ls *= lp / (lp - ls);
        }
    }

    let mut ll = ql * zl.re / w - zl.im / w;
    let mut cl = ql / (w * rv);

    cs *= c_scale.display_multiplier();
    cl *= c_scale.display_multiplier();
    ls *= l_scale.display_multiplier();
    ll *= l_scale.display_multiplier();
    if cs < 0.0 || cl < 0.0 || ls < 0.0 || ll < 0.0 {
        return ccll_nan(c_scale, l_scale);
    }
    ccll(cs, cl, ls, ll, c_scale, l_scale)
}

/// Band-pass ladder, mirror of [`bp1`]: the source sees the low-pass
/// section.
#[must_use]
pub fn bp2(zs: CScalar, zl: CScalar, w: Scalar, c_scale: &Scale, l_scale: &Scale) -> CCLL {
    bp1(zl, zs, w, c_scale, l_scale)
}

/// Band-pass ladder: low-pass section at the source, high-pass at the load.
///
/// ```text
/// --------IND-------CAP--
///     |         |
///    CAP       IND
///     |         |
///    GND       GND
/// ```
#[must_use]
pub fn bp3(zs: CScalar, zl: CScalar, w: Scalar, c_scale: &Scale, l_scale: &Scale) -> CCLL {
    let q = -zs.im / zs.re;
    let rp = (1.0 + q * q) * zs.re;
    let rv = (rp * zl.re).sqrt();
    if rp <= rv {
        return ccll_nan(c_scale, l_scale);
    }

    let qs = (rp / rv - 1.0).sqrt();
    let ql = (rv / zl.re - 1.0).sqrt();
    let cp = q / (w * rp);
    let mut cs = qs / (w * rp) - cp;
    let mut ls = qs * rv / w;
    let mut ll = rv / (w * ql);
    let c5 = -1.0 / (w * zl.im);
    let mut cl = 1.0 / (w * zl.re * ql);
    if zl.im != 0.0 {
        if c5 == cl {
            cl = f64::INFINITY;
        } else {
            cl *= c5 / (c5 - cl);
        }
    }

    cs *= c_scale.display_multiplier();
    cl *= c_scale.display_multiplier();
    ls *= l_scale.display_multiplier();
    ll *= l_scale.display_multiplier();
    if cs < 0.0 || cl < 0.0 || ls < 0.0 || ll < 0.0 {
        return ccll_nan(c_scale, l_scale);
    }
    ccll(cs, cl, ls, ll, c_scale, l_scale)
}

/// Band-pass ladder, mirror of [`bp3`].
#[must_use]
pub fn bp4(zs: CScalar, zl: CScalar, w: Scalar, c_scale: &Scale, l_scale: &Scale) -> CCLL {
    bp3(zl, zs, w, c_scale, l_scale)
}
