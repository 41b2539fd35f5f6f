//! Q-constrained L-section solvers.
//!
//! Unlike the plain L-sections, the section Q is prescribed: the resistive
//! slot of the series leg becomes a free variable and the element reactances
//! come out of the closed-form quartic in the terminating reactances. An
//! imaginary discriminant or a negative element value reports NaN.

use crate::math::{CScalar, Scalar};
use crate::units::Scale;

use super::{labels, CLQ};

fn clq(c: Scalar, l: Scalar, q: Scalar, q_net: Scalar, c_scale: &Scale, l_scale: &Scale) -> CLQ {
    let (c_unit, l_unit) = labels(c_scale, l_scale);
    CLQ {
        c,
        l,
        q,
        q_net,
        c_unit,
        l_unit,
    }
}

/// Series C toward the source, lossy shunt L at the load, at prescribed `q`.
///
/// ```text
/// ---CAP---------
///           |
///          RES
///           |
///          IND
///           |
///          GND
/// ```
#[must_use]
pub fn hp_ell_cl_q(
    zs: CScalar,
    zl: CScalar,
    q: Scalar,
    w: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> CLQ {
    if zs.re == zl.re && zs.im == -zl.im {
        return clq(0.0, 0.0, q, zs.im / zs.re, c_scale, l_scale);
    }

    let qs = zs.im / zs.re;
    let rp = (1.0 + qs * qs) * zl.re;
    let rs = zs.re;
    let xs = zs.im;
    let rl = zl.re;
    let xl = zl.im;
    let mut q_net = (rp / rs - 1.0).sqrt();

    let disc = (xl.powi(4) - 4.0 * q * rs * xl.powi(3)
        + (-(4.0 * rs.powi(2)) + 4.0 * q.powi(2) * rl * rs + 2.0 * rl.powi(2)) * xl.powi(2)
        + (8.0 * q * rl * rs.powi(2) - 4.0 * q * rl.powi(2) * rs) * xl
        - 4.0 * q.powi(2) * rl.powi(2) * rs.powi(2)
        + 4.0 * q.powi(2) * rl.powi(3) * rs
        + rl.powi(4))
    .sqrt();
    let xp = -((q * disc - q * xl.powi(2) + 2.0 * q.powi(2) * rs * xl + 2.0 * q * rl * rs
        - q * rl.powi(2))
        / ((2.0 * q.powi(2) + 2.0) * rs + (-(2.0 * q.powi(2)) - 2.0) * rl));
    let xc = ((2.0 * q * rl - 2.0 * xl) * xs + disc - xl.powi(2) - rl.powi(2))
        / (2.0 * xl - 2.0 * q * rl);

    let mut l = xp / w * l_scale.display_multiplier();
    let mut c = -1.0 / (w * xc) * c_scale.display_multiplier();
    if l < 0.0 || c < 0.0 {
        l = f64::NAN;
        c = f64::NAN;
        q_net = f64::NAN;
    }
    clq(c, l, q, q_net, c_scale, l_scale)
}

/// Lossy shunt L at the source, series C toward the load, at prescribed `q`.
///
/// ```text
/// --------CAP----
///     |
///    RES
///     |
///    IND
///     |
///    GND
/// ```
#[must_use]
pub fn hp_ell_lc_q(
    zs: CScalar,
    zl: CScalar,
    q: Scalar,
    w: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> CLQ {
    if zs.re == zl.re && zs.im == -zl.im {
        return clq(0.0, 0.0, q, zs.im / zs.re, c_scale, l_scale);
    }

    let qs = zs.im / zs.re;
    let rp = (1.0 + qs * qs) * zs.re;
    let rs = zs.re;
    let xs = zs.im;
    let rl = zl.re;
    let xl = zl.im;
    let mut q_net = (rp / rs - 1.0).sqrt();

    let disc = (xs.powi(4) - 4.0 * q * rl * xs.powi(3)
        + (2.0 * rs.powi(2) + 4.0 * q.powi(2) * rl * rs - 4.0 * rl.powi(2)) * xs.powi(2)
        + (8.0 * q * rl.powi(2) * rs - 4.0 * q * rl * rs.powi(2)) * xs
        + rs.powi(4)
        + 4.0 * q.powi(2) * rl * rs.powi(3)
        - 4.0 * q.powi(2) * rl.powi(2) * rs.powi(2))
    .sqrt();
    let xp = (q * disc - q * xs.powi(2) + 2.0 * q.powi(2) * rl * xs - q * rs.powi(2)
        + 2.0 * q * rl * rs)
        / ((2.0 * q.powi(2) + 2.0) * rs + (-(2.0 * q.powi(2)) - 2.0) * rl);
    let xc = (disc - xs.powi(2) - 2.0 * xl * xs + 2.0 * q * rs * xl - rs.powi(2))
        / (2.0 * xs - 2.0 * q * rs);

    let mut l = xp / w * l_scale.display_multiplier();
    let mut c = -1.0 / (w * xc) * c_scale.display_multiplier();
    if l < 0.0 || c < 0.0 {
        l = f64::NAN;
        c = f64::NAN;
        q_net = f64::NAN;
    }
    clq(c, l, q, q_net, c_scale, l_scale)
}

/// Lossy shunt C at the source, series L toward the load, at prescribed `q`.
///
/// ```text
/// --------RES--IND----
///     |
///    CAP
///     |
///    GND
/// ```
#[must_use]
pub fn lp_ell_cl_q(
    zs: CScalar,
    zl: CScalar,
    q: Scalar,
    w: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> CLQ {
    if zs.re == zl.re && zs.im == -zl.im {
        return clq(0.0, 0.0, q, zs.im / zs.re, c_scale, l_scale);
    }

    let qs = -zs.im / zs.re;
    let rp = zs.re * (1.0 + qs * qs);
    let rs = zs.re;
    let xs = zs.im;
    let rl = zl.re;
    let xl = zl.im;
    let mut q_net = (rp / zl.re - 1.0).sqrt();

    let disc = (xs.powi(4)
        + (4.0 * q * rs * xl + 2.0 * rs.powi(2) + 4.0 * q.powi(2) * rl * rs) * xs.powi(2)
        - 4.0 * rs.powi(2) * xl.powi(2)
        + (4.0 * q * rs.powi(3) - 8.0 * q * rl * rs.powi(2)) * xl
        + rs.powi(4)
        + 4.0 * q.powi(2) * rl * rs.powi(3)
        - 4.0 * q.powi(2) * rl.powi(2) * rs.powi(2))
    .sqrt();
    let xp = (q * disc - q * xs.powi(2) - 2.0 * q.powi(2) * rs * xl - q * rs.powi(2)
        + 2.0 * q * rl * rs)
        / ((2.0 * q.powi(2) + 2.0) * rs);
    let xc = (disc - xs.powi(2) + (-(2.0 * xl) - 2.0 * q * rl) * xs - rs.powi(2))
        / (2.0 * xs + 2.0 * xl - 2.0 * q * rs + 2.0 * q * rl);

    let mut l = xp / w * l_scale.display_multiplier();
    let mut c = -1.0 / (w * xc) * c_scale.display_multiplier();
    if l < 0.0 || c < 0.0 {
        l = f64::NAN;
        c = f64::NAN;
        q_net = f64::NAN;
    }
    clq(c, l, q, q_net, c_scale, l_scale)
}

/// Series L toward the source, lossy shunt C at the load, at prescribed `q`.
///
/// ```text
/// ---RES--IND---------
///          |
///         CAP
///          |
///         GND
/// ```
#[must_use]
pub fn lp_ell_lc_q(
    zs: CScalar,
    zl: CScalar,
    q: Scalar,
    w: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> CLQ {
    if zs.re == zl.re && zs.im == -zl.im {
        return clq(0.0, 0.0, q, zs.im / zs.re, c_scale, l_scale);
    }

    let qs = -zl.im / zl.re;
    let rp = zl.re * (1.0 + qs * qs);
    let rs = zs.re;
    let xs = zs.im;
    let rl = zl.re;
    let xl = zl.im;
    let mut q_net = (rp / zs.re - 1.0).sqrt();

    let disc = (-(4.0 * rl.powi(2) * xs.powi(2))
        + (4.0 * q * rl * xl.powi(2) - 8.0 * q * rl.powi(2) * rs + 4.0 * q * rl.powi(3)) * xs
        + xl.powi(4)
        + (4.0 * q.powi(2) * rl * rs + 2.0 * rl.powi(2)) * xl.powi(2)
        - 4.0 * q.powi(2) * rl.powi(2) * rs.powi(2)
        + 4.0 * q.powi(2) * rl.powi(3) * rs
        + rl.powi(4))
    .sqrt();
    let xp = -((q * disc + 2.0 * q.powi(2) * rl * xs + q * xl.powi(2) - 2.0 * q * rl * rs
        + q * rl.powi(2))
        / ((2.0 * q.powi(2) + 2.0) * rl));
    let xc = -((disc + 2.0 * xl * xs + xl.powi(2) + 2.0 * q * rs * xl + rl.powi(2))
        / (2.0 * xs + 2.0 * xl + 2.0 * q * rs - 2.0 * q * rl));

    let mut l = xp / w * l_scale.display_multiplier();
    let mut c = -1.0 / (w * xc) * c_scale.display_multiplier();
    if l < 0.0 || c < 0.0 {
        l = f64::NAN;
        c = f64::NAN;
        q_net = f64::NAN;
    }
    clq(c, l, q, q_net, c_scale, l_scale)
}
