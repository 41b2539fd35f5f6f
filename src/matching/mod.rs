//! Closed-form matching-network synthesis.
//!
//! Every topology solver is a pure function of the source/load impedances,
//! the angular frequency and the requested display scales. A topology that
//! cannot realize the match (negative component value, imaginary
//! intermediate Q) reports NaN component values; callers render those as
//! "n/a". Nothing here iterates.

use std::str::FromStr;

use serde::Serialize;

use crate::analysis::{equivalent_parallel_rc, gamma_to_impedance, impedance_to_gamma};
use crate::constants::angular_frequency;
use crate::errors::SmithError;
use crate::math::{reciprocal, CScalar, Scalar};
use crate::schematic::Topology;
use crate::units::{unit_label, Quantity, Scale};

mod ell;
mod ell_q;
mod ladder;
mod pi_tee;

pub use ell::{hp_ell_cl, hp_ell_lc, lp_ell_cl, lp_ell_lc};
pub use ell_q::{hp_ell_cl_q, hp_ell_lc_q, lp_ell_cl_q, lp_ell_lc_q};
pub use ladder::{bp1, bp2, bp3, bp4, hp1, hp2, lp1, lp2};
pub use pi_tee::{pi, tee};

/// Two-element L-section solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CL {
    /// Capacitance in `c_unit` units.
    pub c: Scalar,
    /// Inductance in `l_unit` units.
    pub l: Scalar,
    /// Realized network Q.
    pub q: Scalar,
    /// Capacitance display unit label.
    pub c_unit: String,
    /// Inductance display unit label.
    pub l_unit: String,
}

/// Q-constrained L-section solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CLQ {
    /// Capacitance in `c_unit` units.
    pub c: Scalar,
    /// Inductance in `l_unit` units.
    pub l: Scalar,
    /// Requested Q.
    pub q: Scalar,
    /// Realized network Q.
    pub q_net: Scalar,
    /// Capacitance display unit label.
    pub c_unit: String,
    /// Inductance display unit label.
    pub l_unit: String,
}

/// Four-element ladder solution (HP/LP/band-pass families).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CCLL {
    /// Source-side capacitance.
    pub cs: Scalar,
    /// Load-side capacitance.
    pub cl: Scalar,
    /// Source-side inductance.
    pub ls: Scalar,
    /// Load-side inductance.
    pub ll: Scalar,
    /// Capacitance display unit label.
    pub c_unit: String,
    /// Inductance display unit label.
    pub l_unit: String,
}

/// Pi/Tee solution; both element orders (C-L-C and L-C-L) are reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PiTee {
    /// Shared capacitance of the L-C-L order.
    pub c: Scalar,
    /// Source-side capacitance of the C-L-C order.
    pub cs: Scalar,
    /// Load-side capacitance of the C-L-C order.
    pub cl: Scalar,
    /// Shared inductance of the C-L-C order.
    pub l: Scalar,
    /// Source-side inductance of the L-C-L order.
    pub ls: Scalar,
    /// Load-side inductance of the L-C-L order.
    pub ll: Scalar,
    /// Network Q the solution was computed for.
    pub q: Scalar,
    /// Capacitance display unit label.
    pub c_unit: String,
    /// Inductance display unit label.
    pub l_unit: String,
}

pub(crate) fn labels(c_scale: &Scale, l_scale: &Scale) -> (String, String) {
    (
        unit_label(c_scale, Quantity::Farad),
        unit_label(l_scale, Quantity::Henry),
    )
}

/// All topology solutions for one source/load pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchingSolutions {
    /// Source impedance the solutions were computed for, in ohms.
    pub zs: (Scalar, Scalar),
    /// Load impedance the solutions were computed for, in ohms.
    pub zl: (Scalar, Scalar),
    /// Shunt-first high-pass ladder.
    pub hp1: CCLL,
    /// Series-first high-pass ladder.
    pub hp2: CCLL,
    /// Shunt-first low-pass ladder.
    pub lp1: CCLL,
    /// Series-first low-pass ladder.
    pub lp2: CCLL,
    /// Band-pass ladder, variant 1.
    pub bp1: CCLL,
    /// Band-pass ladder, variant 2.
    pub bp2: CCLL,
    /// Band-pass ladder, variant 3.
    pub bp3: CCLL,
    /// Band-pass ladder, variant 4.
    pub bp4: CCLL,
    /// Pi network at the requested network Q.
    pub pi: PiTee,
    /// Tee network at the requested network Q.
    pub tee: PiTee,
    /// High-pass L-section, shunt inductor at the load.
    pub hp_ell_cl: CL,
    /// High-pass L-section, shunt inductor at the source.
    pub hp_ell_lc: CL,
    /// Low-pass L-section, shunt capacitor at the source.
    pub lp_ell_cl: CL,
    /// Low-pass L-section, shunt capacitor at the load.
    pub lp_ell_lc: CL,
    /// Q-constrained high-pass L-section (C then shunt L).
    pub hp_ell_cl_q: CLQ,
    /// Q-constrained high-pass L-section (shunt L then C).
    pub hp_ell_lc_q: CLQ,
    /// Q-constrained low-pass L-section (shunt C then L).
    pub lp_ell_cl_q: CLQ,
    /// Q-constrained low-pass L-section (L then shunt C).
    pub lp_ell_lc_q: CLQ,
}

/// Solves every supported topology for a conjugate match from `zs` to `zl`
/// (ohms) at `freq_hz`. `q_net` constrains the Pi/Tee networks; `q`
/// constrains the `*_q` L-section variants.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn synthesize(
    zs: CScalar,
    zl: CScalar,
    q_net: Scalar,
    q: Scalar,
    freq_hz: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> MatchingSolutions {
    let w = angular_frequency(freq_hz);
    MatchingSolutions {
        zs: (zs.re, zs.im),
        zl: (zl.re, zl.im),
        hp1: hp1(zs, zl, w, c_scale, l_scale),
        hp2: hp2(zs, zl, w, c_scale, l_scale),
        lp1: lp1(zs, zl, w, c_scale, l_scale),
        lp2: lp2(zs, zl, w, c_scale, l_scale),
        bp1: bp1(zs, zl, w, c_scale, l_scale),
        bp2: bp2(zs, zl, w, c_scale, l_scale),
        bp3: bp3(zs, zl, w, c_scale, l_scale),
        bp4: bp4(zs, zl, w, c_scale, l_scale),
        pi: pi(zs, zl, w, q_net, c_scale, l_scale),
        tee: tee(zs, zl, w, q_net, c_scale, l_scale),
        hp_ell_cl: hp_ell_cl(zs, zl, w, c_scale, l_scale),
        hp_ell_lc: hp_ell_lc(zs, zl, w, c_scale, l_scale),
        lp_ell_cl: lp_ell_cl(zs, zl, w, c_scale, l_scale),
        lp_ell_lc: lp_ell_lc(zs, zl, w, c_scale, l_scale),
        hp_ell_cl_q: hp_ell_cl_q(zs, zl, q, w, c_scale, l_scale),
        hp_ell_lc_q: hp_ell_lc_q(zs, zl, q, w, c_scale, l_scale),
        lp_ell_cl_q: lp_ell_cl_q(zs, zl, q, w, c_scale, l_scale),
        lp_ell_lc_q: lp_ell_lc_q(zs, zl, q, w, c_scale, l_scale),
    }
}

/// Entry format of a source/load pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Impedance re/im in ohms.
    ZReIm,
    /// Admittance re/im in siemens.
    YReIm,
    /// Γ magnitude/angle against z0.
    GammaMagAng,
    /// Γ re/im against z0.
    GammaReIm,
    /// Parallel resistance (Ω) and capacitance (display units).
    ParallelRc,
}

impl FromStr for SourceFormat {
    type Err = SmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zri" => Ok(Self::ZReIm),
            "yri" => Ok(Self::YReIm),
            "gma" => Ok(Self::GammaMagAng),
            "gri" => Ok(Self::GammaReIm),
            "rc" => Ok(Self::ParallelRc),
            other => Err(SmithError::InvalidConfig(format!(
                "unknown impedance format `{other}`"
            ))),
        }
    }
}

/// Decodes one formatted (re, im) pair into an impedance in ohms.
#[must_use]
pub fn decode_impedance(
    re: Scalar,
    im: Scalar,
    format: SourceFormat,
    z0: Scalar,
    freq_hz: Scalar,
    cap_scale: &Scale,
) -> CScalar {
    match format {
        SourceFormat::ZReIm => CScalar::new(re, im),
        SourceFormat::YReIm => reciprocal(CScalar::new(re, im)),
        SourceFormat::GammaMagAng => {
            gamma_to_impedance(CScalar::from_polar(re, im.to_radians()), z0)
        }
        SourceFormat::GammaReIm => gamma_to_impedance(CScalar::new(re, im), z0),
        SourceFormat::ParallelRc => {
            let w = angular_frequency(freq_hz);
            let c_si = im * cap_scale.si_multiplier();
            reciprocal(CScalar::new(1.0 / re, w * c_si))
        }
    }
}

/// Encodes an impedance in ohms into a formatted (re, im) pair.
#[must_use]
pub fn encode_impedance(
    z: CScalar,
    format: SourceFormat,
    z0: Scalar,
    freq_hz: Scalar,
    cap_scale: &Scale,
) -> (Scalar, Scalar) {
    match format {
        SourceFormat::ZReIm => (z.re, z.im),
        SourceFormat::YReIm => {
            let y = reciprocal(z);
            (y.re, y.im)
        }
        SourceFormat::GammaMagAng => {
            let g = impedance_to_gamma(z, z0);
            (g.norm(), g.arg().to_degrees())
        }
        SourceFormat::GammaReIm => {
            let g = impedance_to_gamma(z, z0);
            (g.re, g.im)
        }
        SourceFormat::ParallelRc => {
            equivalent_parallel_rc(z, freq_hz, &Scale::Base, cap_scale)
        }
    }
}

/// Converts a source/load pair between entry formats.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn convert_impedance_pair(
    src: (Scalar, Scalar),
    load: (Scalar, Scalar),
    from: SourceFormat,
    to: SourceFormat,
    z0: Scalar,
    freq_hz: Scalar,
    cap_scale: &Scale,
) -> ((Scalar, Scalar), (Scalar, Scalar)) {
    if from == to {
        return (src, load);
    }
    let zs = decode_impedance(src.0, src.1, from, z0, freq_hz, cap_scale);
    let zl = decode_impedance(load.0, load.1, from, z0, freq_hz, cap_scale);
    (
        encode_impedance(zs, to, z0, freq_hz, cap_scale),
        encode_impedance(zl, to, z0, freq_hz, cap_scale),
    )
}

/// Full entry-format synthesis: decodes the pair, applies the differential
/// halving when requested, and solves all topologies.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn synthesize_from_entry(
    src: (Scalar, Scalar),
    load: (Scalar, Scalar),
    format: SourceFormat,
    topology: Topology,
    q_net: Scalar,
    q: Scalar,
    z0: Scalar,
    freq_hz: Scalar,
    c_scale: &Scale,
    l_scale: &Scale,
) -> MatchingSolutions {
    let mut zs = decode_impedance(src.0, src.1, format, z0, freq_hz, c_scale);
    let mut zl = decode_impedance(load.0, load.1, format, z0, freq_hz, c_scale);
    if topology == Topology::Differential {
        zs /= 2.0;
        zl /= 2.0;
    }
    synthesize(zs, zl, q_net, q, freq_hz, c_scale, l_scale)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn already_matched_pair_degenerates_everywhere() {
        let zs = CScalar::new(50.0, 0.0);
        let zl = CScalar::new(50.0, 0.0);
        let out = synthesize(zs, zl, 0.0, 2.0, 1.0e9, &Scale::Pico, &Scale::Nano);
        // L-sections report zero-valued elements; ladders cannot transform
        // equal resistances and report n/a.
        assert_relative_eq!(out.hp_ell_cl.c, 0.0);
        assert_relative_eq!(out.hp_ell_cl.l, 0.0);
        assert_relative_eq!(out.lp_ell_lc.c, 0.0);
        assert_relative_eq!(out.pi.l, 0.0);
        assert_relative_eq!(out.tee.c, 0.0);
        assert!(out.hp1.cs.is_nan());
        assert!(out.lp1.ls.is_nan());
    }

    #[test]
    fn format_round_trip_through_gamma() {
        let (src, load) = convert_impedance_pair(
            (42.4, -19.6),
            (212.3, 43.2),
            SourceFormat::ZReIm,
            SourceFormat::GammaReIm,
            50.0,
            1.0e9,
            &Scale::Femto,
        );
        let (src2, load2) = convert_impedance_pair(
            src,
            load,
            SourceFormat::GammaReIm,
            SourceFormat::ZReIm,
            50.0,
            1.0e9,
            &Scale::Femto,
        );
        assert_relative_eq!(src2.0, 42.4, max_relative = 1.0e-10);
        assert_relative_eq!(src2.1, -19.6, max_relative = 1.0e-10);
        assert_relative_eq!(load2.0, 212.3, max_relative = 1.0e-10);
        assert_relative_eq!(load2.1, 43.2, max_relative = 1.0e-10);
    }

    #[test]
    fn differential_entry_halves_the_pair() {
        let out = synthesize_from_entry(
            (100.0, 0.0),
            (100.0, 0.0),
            SourceFormat::ZReIm,
            Topology::Differential,
            0.0,
            0.0,
            50.0,
            1.0e9,
            &Scale::Pico,
            &Scale::Nano,
        );
        assert_relative_eq!(out.zs.0, 50.0);
        assert_relative_eq!(out.zl.0, 50.0);
    }
}
