//! Per-element impedance models.
//!
//! Every model is a pure function of the element description, the global
//! configuration and the evaluation frequency. Lumped models return the
//! branch impedance of the element itself; how that branch composes into the
//! cascade (series addition, admittance addition, line transform) is decided
//! by [`crate::cascade`] from the element kind.

use serde::Serialize;

use crate::constants::angular_frequency;
use crate::math::{reciprocal, CScalar, Scalar};
use crate::schematic::{CircuitElement, ElementKind, GlobalConfig, LutRow, Topology};
use crate::units::resolve;

/// Normalized element impedance. Line kinds report their physical length in
/// meters instead of an impedance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ElementImpedance {
    /// Normalized resistance (R/z0).
    pub real: Scalar,
    /// Normalized reactance (X/z0).
    pub imaginary: Scalar,
    /// Physical length in meters; 0 for lumped kinds.
    pub length: Scalar,
}

/// Evaluates the cached per-element quantity: normalized branch impedance for
/// lumped kinds, physical length for line kinds.
#[must_use]
pub fn commit_impedance(
    elem: &CircuitElement,
    config: &GlobalConfig,
    freq_hz: Scalar,
) -> ElementImpedance {
    if elem.kind().is_line() {
        return ElementImpedance {
            real: 0.0,
            imaginary: 0.0,
            length: line_length_m(elem, config, freq_hz),
        };
    }
    let z = branch_impedance_norm(elem, config, freq_hz);
    ElementImpedance {
        real: z.re,
        imaginary: z.im,
        length: 0.0,
    }
}

/// Normalized branch impedance of a lumped element (including the black box
/// and the transformer's standalone tee impedance).
#[must_use]
pub fn branch_impedance_norm(
    elem: &CircuitElement,
    config: &GlobalConfig,
    freq_hz: Scalar,
) -> CScalar {
    branch_impedance_ohms(elem, config, freq_hz) / config.z0
}

fn branch_impedance_ohms(elem: &CircuitElement, config: &GlobalConfig, freq_hz: Scalar) -> CScalar {
    let w = angular_frequency(freq_hz);
    let vals = elem.values();
    let units = elem.units();
    let er = config.er;

    match elem.kind() {
        ElementKind::BlackBox => {
            let div = match config.topology {
                Topology::SingleEnded => 1.0,
                Topology::Differential => 2.0,
            };
            CScalar::new(vals[0] / div, vals[1] / div)
        }
        ElementKind::SeriesResistor | ElementKind::ShuntResistor => {
            CScalar::new(vals[0] * resolve(&units[0], freq_hz, er), 0.0)
        }
        ElementKind::SeriesCapacitor | ElementKind::ShuntCapacitor => {
            let c = vals[1] * resolve(&units[1], freq_hz, er);
            let r = loss_resistance(vals[0], &units[0], freq_hz, er, 1.0 / (w * c));
            CScalar::new(r, -1.0 / (w * c))
        }
        ElementKind::SeriesInductor | ElementKind::ShuntInductor => {
            let l = vals[1] * resolve(&units[1], freq_hz, er);
            let r = loss_resistance(vals[0], &units[0], freq_hz, er, w * l);
            CScalar::new(r, w * l)
        }
        ElementKind::SeriesRlc | ElementKind::ShuntRlc => {
            let r = vals[0] * resolve(&units[0], freq_hz, er);
            let l = vals[1] * resolve(&units[1], freq_hz, er);
            let x = if vals[2] == 0.0 {
                w * l
            } else {
                let c = vals[2] * resolve(&units[2], freq_hz, er);
                w * l - 1.0 / (w * c)
            };
            CScalar::new(r, x)
        }
        ElementKind::Transformer => {
            let (zp, zm, zs) = transformer_tee(elem, config, freq_hz);
            reciprocal(reciprocal(zp) + reciprocal(zm)) + zs
        }
        ElementKind::CustomZ => {
            let (re, im) = lut_lookup(elem.lut(), freq_hz);
            CScalar::new(re, im)
        }
        ElementKind::TransmissionLine | ElementKind::OpenStub | ElementKind::ShortedStub => {
            standalone_line_impedance(elem, config, freq_hz)
        }
    }
}

/// Series resistance of a lossy reactive element. A `Q` tag converts through
/// `R = |X|/Q`; a zero magnitude short-circuits to an ideal element.
fn loss_resistance(val: Scalar, tag: &str, freq_hz: Scalar, er: Scalar, reactance_mag: Scalar) -> Scalar {
    if val == 0.0 {
        0.0
    } else if tag == "Q" || tag == "q" {
        reactance_mag / val
    } else {
        val * resolve(tag, freq_hz, er)
    }
}

/// Tee-equivalent arms of the transformer, in ohms: primary arm `Zp`, shared
/// mutual branch `Zm`, secondary arm `Zs`.
pub(crate) fn transformer_tee(
    elem: &CircuitElement,
    config: &GlobalConfig,
    freq_hz: Scalar,
) -> (CScalar, CScalar, CScalar) {
    let w = angular_frequency(freq_hz);
    let vals = elem.values();
    let units = elem.units();
    let er = config.er;

    let l1 = vals[1] * resolve(&units[1], freq_hz, er);
    let l2 = if units[2] == "N" {
        vals[2] * vals[2] * l1
    } else {
        vals[2] * resolve(&units[2], freq_hz, er)
    };
    let m = if units[3] == "K" {
        vals[3] * (l1 * l2).sqrt()
    } else {
        vals[3] * resolve(&units[3], freq_hz, er)
    };

    let (rp, rs) = if units[0] == "Q" || units[0] == "q" {
        if vals[0] == 0.0 {
            (0.0, 0.0)
        } else {
            (w * l1 / vals[0], w * l2 / vals[0])
        }
    } else {
        let r = vals[0] * resolve(&units[0], freq_hz, er);
        (r, r)
    };

    (
        CScalar::new(rp, w * (l1 - m)),
        CScalar::new(0.0, w * m),
        CScalar::new(rs, w * (l2 - m)),
    )
}

/// Transformer two-port loaded by `zin_norm`, returning the normalized input
/// impedance at the secondary side.
#[must_use]
pub fn transformer_cascade_norm(
    elem: &CircuitElement,
    config: &GlobalConfig,
    freq_hz: Scalar,
    zin_norm: CScalar,
) -> CScalar {
    let (zp, zm, zs) = transformer_tee(elem, config, freq_hz);
    let zin = zin_norm * config.z0;
    (reciprocal(reciprocal(zin + zp) + reciprocal(zm)) + zs) / config.z0
}

/// Physical length of a line element in meters.
#[must_use]
pub fn line_length_m(elem: &CircuitElement, config: &GlobalConfig, freq_hz: Scalar) -> Scalar {
    elem.values()[0] * resolve(&elem.units()[0], freq_hz, config.er)
}

/// Electrical length `βl = ω·√εr·ℓ/c`.
#[must_use]
pub fn electrical_length(elem: &CircuitElement, config: &GlobalConfig, freq_hz: Scalar) -> Scalar {
    beta(config, freq_hz) * line_length_m(elem, config, freq_hz)
}

/// Phase constant `β = ω·√εr/c` in rad/m.
#[must_use]
pub fn beta(config: &GlobalConfig, freq_hz: Scalar) -> Scalar {
    angular_frequency(freq_hz) * config.er.sqrt() / crate::constants::SPEED_OF_LIGHT
}

/// Standalone input impedance of a line element in ohms: the ideal line
/// terminated by z0, or the open/shorted stub looking into its own port.
fn standalone_line_impedance(
    elem: &CircuitElement,
    config: &GlobalConfig,
    freq_hz: Scalar,
) -> CScalar {
    let bl = electrical_length(elem, config, freq_hz);
    let zl0 = elem.line_z0();
    let j = CScalar::i();
    match elem.kind() {
        ElementKind::TransmissionLine => {
            line_input_impedance(CScalar::new(config.z0, 0.0), zl0, bl.tan())
        }
        ElementKind::OpenStub => -j * zl0 / bl.tan(),
        ElementKind::ShortedStub => j * zl0 * bl.tan(),
        _ => unreachable!("not a line kind"),
    }
}

/// Input impedance (normalized) of an ideal line of electrical length `bl`
/// and characteristic impedance `line_z0`, terminated by `zin_norm`.
#[must_use]
pub fn line_transform_norm(
    zin_norm: CScalar,
    line_z0: Scalar,
    bl: Scalar,
    z0: Scalar,
) -> CScalar {
    line_input_impedance(zin_norm * z0, line_z0, bl.tan()) / z0
}

fn line_input_impedance(zl: CScalar, line_z0: Scalar, t: Scalar) -> CScalar {
    let j = CScalar::i();
    line_z0 * (zl + j * line_z0 * t) / (CScalar::new(line_z0, 0.0) + j * zl * t)
}

/// Normalized shunt admittance contributed by a stub of electrical length
/// `bl`: `+j·tanβl·(z0/Z0ˡ)` open, `−j·z0/(Z0ˡ·tanβl)` shorted.
#[must_use]
pub fn stub_admittance_norm(kind: ElementKind, line_z0: Scalar, bl: Scalar, z0: Scalar) -> CScalar {
    match kind {
        ElementKind::OpenStub => CScalar::new(0.0, bl.tan() * z0 / line_z0),
        ElementKind::ShortedStub => CScalar::new(0.0, -z0 / (line_z0 * bl.tan())),
        _ => unreachable!("not a stub kind"),
    }
}

/// One cascade transition: folds `elem` into the running normalized
/// impedance `zin_norm` at `freq_hz`.
#[must_use]
pub fn cascade_step(
    elem: &CircuitElement,
    config: &GlobalConfig,
    freq_hz: Scalar,
    zin_norm: CScalar,
) -> CScalar {
    use crate::schematic::Composition;
    match elem.kind().composition() {
        Composition::Series => {
            if elem.kind() == ElementKind::Transformer {
                transformer_cascade_norm(elem, config, freq_hz, zin_norm)
            } else {
                zin_norm + branch_impedance_norm(elem, config, freq_hz)
            }
        }
        Composition::Shunt => {
            let ze = branch_impedance_norm(elem, config, freq_hz);
            reciprocal(reciprocal(zin_norm) + reciprocal(ze))
        }
        Composition::Line => {
            let bl = electrical_length(elem, config, freq_hz);
            line_transform_norm(zin_norm, elem.line_z0(), bl, config.z0)
        }
        Composition::Stub => {
            let bl = electrical_length(elem, config, freq_hz);
            let y = reciprocal(zin_norm)
                + stub_admittance_norm(elem.kind(), elem.line_z0(), bl, config.z0);
            reciprocal(y)
        }
    }
}

fn lut_lookup(lut: &[LutRow], freq_hz: Scalar) -> (Scalar, Scalar) {
    let idx = lut.partition_point(|row| row[0] <= freq_hz);
    if idx == 0 {
        (lut[0][1], lut[0][2])
    } else if idx >= lut.len() {
        let last = lut[lut.len() - 1];
        (last[1], last[2])
    } else {
        let lo = lut[idx - 1];
        let hi = lut[idx];
        let frac = (freq_hz - lo[0]) / (hi[0] - lo[0]);
        (
            lo[1] + frac * (hi[1] - lo[1]),
            lo[2] + frac * (hi[2] - lo[2]),
        )
    }
}
