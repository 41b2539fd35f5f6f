//! Derived quantities computed from a terminal impedance.

use std::str::FromStr;

use crate::chart::{reflection_coefficient, Reflection};
use crate::constants::angular_frequency;
use crate::errors::SmithError;
use crate::math::{reciprocal, CScalar, Scalar};
use crate::units::Scale;

/// Everything the result panel needs, derived from one normalized terminal
/// impedance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedQuantities {
    /// Terminal impedance in ohms.
    pub impedance: CScalar,
    /// Terminal admittance in siemens.
    pub admittance: CScalar,
    /// Reflection coefficient against z0.
    pub reflection: Reflection,
    /// Voltage standing-wave ratio `(1+|Γ|)/(1−|Γ|)`.
    pub vswr: Scalar,
    /// Return loss `20·log10|Γ|` in dB (≤ 0 for passive loads; −∞ when
    /// perfectly matched).
    pub return_loss_db: Scalar,
    /// Distance from the load to the first voltage maximum, in wavelengths.
    pub vmax_fraction: Scalar,
    /// Distance from the load to the first voltage minimum, in wavelengths.
    pub vmin_fraction: Scalar,
}

/// Derives the full quantity set from a normalized terminal impedance.
/// Non-finite inputs propagate into the outputs rather than erroring.
#[must_use]
pub fn derived_quantities(z_norm: CScalar, z0: Scalar) -> DerivedQuantities {
    let impedance = z_norm * z0;
    let admittance = reciprocal(impedance);
    let reflection = reflection_coefficient(z_norm, z0);
    let vswr = (1.0 + reflection.magnitude) / (1.0 - reflection.magnitude);
    let return_loss_db = 20.0 * reflection.magnitude.log10();
    let vmax_fraction = 0.5 * reflection.phase_deg / 360.0;
    let vmin_fraction = if reflection.phase_deg > 180.0 {
        0.5 * (reflection.phase_deg - 180.0) / 360.0
    } else {
        0.5 * (reflection.phase_deg + 180.0) / 360.0
    };
    DerivedQuantities {
        impedance,
        admittance,
        reflection,
        vswr,
        return_loss_db,
        vmax_fraction,
        vmin_fraction,
    }
}

/// Γ = (Z − Z0)/(Z + Z0) for an impedance in ohms.
#[must_use]
pub fn impedance_to_gamma(z: CScalar, z0: Scalar) -> CScalar {
    (z - z0) * reciprocal(z + z0)
}

/// Z = Z0·(1 + Γ)/(1 − Γ).
#[must_use]
pub fn gamma_to_impedance(gamma: CScalar, z0: Scalar) -> CScalar {
    z0 * (1.0 + gamma) * reciprocal(1.0 - gamma)
}

/// Entry format of a complex reflection coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GammaFormat {
    /// Rectangular (re, im).
    ReIm,
    /// Polar (magnitude, angle°).
    MagAng,
    /// Polar with magnitude in dB (dB, angle°).
    DbAng,
}

impl FromStr for GammaFormat {
    type Err = SmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ri" | "reim" => Ok(Self::ReIm),
            "ma" | "magang" => Ok(Self::MagAng),
            "db" | "dbang" => Ok(Self::DbAng),
            other => Err(SmithError::InvalidConfig(format!(
                "unknown complex format `{other}`"
            ))),
        }
    }
}

/// Builds a complex value from a formatted (re, im) pair.
#[must_use]
pub fn gen_complex(re: Scalar, im: Scalar, format: GammaFormat) -> CScalar {
    match format {
        GammaFormat::ReIm => CScalar::new(re, im),
        GammaFormat::MagAng => CScalar::from_polar(re, im.to_radians()),
        GammaFormat::DbAng => CScalar::from_polar(10.0_f64.powf(re / 20.0), im.to_radians()),
    }
}

/// Equivalent parallel R‖C of an impedance at `freq_hz`: `R = 1/Re(Y)` and
/// `C = Im(Y)/ω`, returned in the requested display scales.
#[must_use]
pub fn equivalent_parallel_rc(
    z: CScalar,
    freq_hz: Scalar,
    res_scale: &Scale,
    cap_scale: &Scale,
) -> (Scalar, Scalar) {
    let y = reciprocal(z);
    let w = angular_frequency(freq_hz);
    (
        1.0 / (y.re * res_scale.display_multiplier()),
        (y.im / w) * cap_scale.display_multiplier(),
    )
}

/// Entry format accepted by [`impedance_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpedanceEntry {
    /// Impedance re/im in ohms.
    Impedance,
    /// Γ rectangular.
    GammaReIm,
    /// Γ magnitude/angle.
    GammaMagAng,
    /// Γ dB/angle.
    GammaDb,
    /// Parallel resistance (Ω) and capacitance (in `cap_scale` units).
    ParallelRc,
}

impl FromStr for ImpedanceEntry {
    type Err = SmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "z" => Ok(Self::Impedance),
            "ri" => Ok(Self::GammaReIm),
            "ma" => Ok(Self::GammaMagAng),
            "db" => Ok(Self::GammaDb),
            "rc" => Ok(Self::ParallelRc),
            other => Err(SmithError::InvalidConfig(format!(
                "unknown impedance entry format `{other}`"
            ))),
        }
    }
}

/// Impedance-calculator result: the entry converted to impedance, both Γ
/// forms, and the parallel R‖C equivalent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpedanceReport {
    /// Impedance in ohms.
    pub z: CScalar,
    /// Reflection coefficient.
    pub gamma: CScalar,
    /// |Γ|.
    pub gamma_mag: Scalar,
    /// ∠Γ in degrees, in `(−180°, 180°]`.
    pub gamma_ang: Scalar,
    /// Equivalent parallel resistance in ohms.
    pub r: Scalar,
    /// Equivalent parallel capacitance in `cap_scale` units.
    pub c: Scalar,
}

/// Converts an entry in any supported format into the full impedance report.
pub fn impedance_report(
    re: Scalar,
    im: Scalar,
    entry: ImpedanceEntry,
    z0: Scalar,
    freq_hz: Scalar,
    cap_scale: &Scale,
) -> ImpedanceReport {
    let w = angular_frequency(freq_hz);
    let (z, gamma) = match entry {
        ImpedanceEntry::Impedance => {
            let z = CScalar::new(re, im);
            (z, impedance_to_gamma(z, z0))
        }
        ImpedanceEntry::GammaReIm => {
            let g = CScalar::new(re, im);
            (gamma_to_impedance(g, z0), g)
        }
        ImpedanceEntry::GammaMagAng => {
            let g = gen_complex(re, im, GammaFormat::MagAng);
            (gamma_to_impedance(g, z0), g)
        }
        ImpedanceEntry::GammaDb => {
            let g = gen_complex(re, im, GammaFormat::DbAng);
            (gamma_to_impedance(g, z0), g)
        }
        ImpedanceEntry::ParallelRc => {
            let c_si = im * cap_scale.si_multiplier();
            let z = reciprocal(CScalar::new(1.0 / re, w * c_si));
            (z, impedance_to_gamma(z, z0))
        }
    };
    let (r, c) = equivalent_parallel_rc(z, freq_hz, &Scale::Base, cap_scale);
    ImpedanceReport {
        z,
        gamma,
        gamma_mag: gamma.norm(),
        gamma_ang: gamma.arg().to_degrees(),
        r,
        c,
    }
}
