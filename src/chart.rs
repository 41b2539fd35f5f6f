//! Reflection coefficients and Smith-chart coordinate mapping.
//!
//! The chart is the unit disk: a normalized impedance maps to Γ = (z−1)/(z+1)
//! and is plotted at (Re Γ, Im Γ). Admittance-domain trajectories (shunt
//! elements, stubs) are mapped through the rotated chart by inverting the
//! input first.

use serde::Serialize;

use crate::constants::wavelength;
use crate::element::{
    beta, branch_impedance_norm, cascade_step, electrical_length, line_length_m,
    line_transform_norm, stub_admittance_norm,
};
use crate::errors::SmithError;
use crate::math::{magnitude_phase, reciprocal, CScalar, Scalar};
use crate::schematic::{CircuitElement, Composition, ElementKind, GlobalConfig, Schematic};

/// Cartesian position inside the unit circle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ChartPoint {
    /// Horizontal coordinate (Re Γ).
    pub x: Scalar,
    /// Vertical coordinate (Im Γ).
    pub y: Scalar,
}

/// Reflection coefficient in both rectangular and polar forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reflection {
    /// Re Γ.
    pub re: Scalar,
    /// Im Γ.
    pub im: Scalar,
    /// |Γ|.
    pub magnitude: Scalar,
    /// ∠Γ in degrees, normalized to `[0°, 360°)`.
    pub phase_deg: Scalar,
}

/// Reflection coefficient of a normalized impedance against `z0`.
#[must_use]
pub fn reflection_coefficient(z_norm: CScalar, z0: Scalar) -> Reflection {
    let z = z_norm * z0;
    let g = (z - z0) * reciprocal(z + z0);
    let (magnitude, phase_deg) = magnitude_phase(g);
    Reflection {
        re: g.re,
        im: g.im,
        magnitude,
        phase_deg,
    }
}

/// Maps a normalized impedance (admittance when `rotate`) onto the chart.
///
/// Exactly-zero real or imaginary parts sit on coordinate singularities of
/// the rotated mapping, so they are nudged by ±0.001 before the transform; a
/// non-finite imaginary part is reset to zero first. This is a plotting aid,
/// not a physical correction.
#[must_use]
pub fn smith_coord(re: Scalar, im: Scalar, rotate: bool) -> ChartPoint {
    let mut re = re;
    let mut im = if im.is_finite() { im } else { 0.0 };
    if im == 0.0 {
        im = -0.001;
    }
    if re == 0.0 {
        re = 0.001;
    }
    let mut z = CScalar::new(re, im);
    if rotate {
        z = reciprocal(z);
    }
    let g = (z - 1.0) * reciprocal(z + 1.0);
    ChartPoint { x: g.re, y: g.im }
}

/// One element's trajectory on the chart.
///
/// `start`/`end` are in the interpolation domain (normalized impedance, or
/// normalized admittance for rotated traces). The point list is recomputed
/// fresh on every call; no state is shared between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcTrace {
    /// `steps + 1` chart positions from the element's input to its output.
    pub points: Vec<ChartPoint>,
    /// Interpolation-domain start value.
    pub start: (Scalar, Scalar),
    /// Interpolation-domain end value.
    pub end: (Scalar, Scalar),
    /// Whether the trace lives on the rotated (admittance) chart.
    pub rotated: bool,
}

/// Computes an element's chart arc from the running impedance `zin_norm`,
/// returning the trace and the cascaded output impedance.
#[must_use]
pub fn element_arc(
    elem: &CircuitElement,
    config: &GlobalConfig,
    freq_hz: Scalar,
    zin_norm: CScalar,
    steps: usize,
) -> (ArcTrace, CScalar) {
    let zout = cascade_step(elem, config, freq_hz, zin_norm);
    let steps = steps.max(1);
    let n = steps as Scalar;

    let trace = match elem.kind().composition() {
        Composition::Series => {
            let start = zin_norm;
            let end = if elem.kind() == ElementKind::Transformer {
                zout
            } else {
                zin_norm + branch_impedance_norm(elem, config, freq_hz)
            };
            linear_trace(start, end, steps, false)
        }
        Composition::Shunt => {
            let start = reciprocal(zin_norm);
            let end = start + reciprocal(branch_impedance_norm(elem, config, freq_hz));
            linear_trace(start, end, steps, true)
        }
        Composition::Line => {
            let bl = electrical_length(elem, config, freq_hz);
            let points = (0..=steps)
                .map(|i| {
                    let z = line_transform_norm(
                        zin_norm,
                        elem.line_z0(),
                        bl * i as Scalar / n,
                        config.z0,
                    );
                    smith_coord(z.re, z.im, false)
                })
                .collect();
            ArcTrace {
                points,
                start: (zin_norm.re, zin_norm.im),
                end: (zout.re, zout.im),
                rotated: false,
            }
        }
        Composition::Stub => {
            let bl = electrical_length(elem, config, freq_hz);
            let y = reciprocal(zin_norm);
            // A shorted stub under λ/2 sweeps from the λ/4 point instead of
            // zero length, keeping the plotted arc on one branch of the
            // tangent. The electrical end state is unaffected.
            let offset = stub_sweep_offset(elem, config, freq_hz);
            let b = beta(config, freq_hz);
            let length = line_length_m(elem, config, freq_hz);
            let points = (0..=steps)
                .map(|i| {
                    let arg = if offset == 0.0 {
                        bl * i as Scalar / n
                    } else {
                        b * (offset + (length - offset) * i as Scalar / n)
                    };
                    let ys = stub_admittance_norm(elem.kind(), elem.line_z0(), arg, config.z0);
                    smith_coord(y.re, y.im + ys.im, true)
                })
                .collect();
            let y_end = y + stub_admittance_norm(elem.kind(), elem.line_z0(), bl, config.z0);
            ArcTrace {
                points,
                start: (y.re, y.im),
                end: (y_end.re, y_end.im),
                rotated: true,
            }
        }
    };

    (trace, zout)
}

/// Arc of one schematic element at the center frequency, starting from the
/// running impedance `zin_norm`. Probe-only; the schematic is not touched.
pub fn schematic_arc(
    schematic: &Schematic,
    index: usize,
    zin_norm: CScalar,
    steps: usize,
) -> Result<(ArcTrace, CScalar), SmithError> {
    let elem = schematic
        .element(index)
        .ok_or_else(|| SmithError::InvalidConfig(format!("no element at index {index}")))?;
    let config = schematic.config();
    Ok(element_arc(
        elem,
        config,
        config.frequency_hz(),
        zin_norm,
        steps,
    ))
}

fn linear_trace(start: CScalar, end: CScalar, steps: usize, rotated: bool) -> ArcTrace {
    let n = steps as Scalar;
    let points = (0..=steps)
        .map(|i| {
            let f = i as Scalar / n;
            smith_coord(
                start.re + (end.re - start.re) * f,
                start.im + (end.im - start.im) * f,
                rotated,
            )
        })
        .collect();
    ArcTrace {
        points,
        start: (start.re, start.im),
        end: (end.re, end.im),
        rotated,
    }
}

fn stub_sweep_offset(elem: &CircuitElement, config: &GlobalConfig, freq_hz: Scalar) -> Scalar {
    if elem.kind() != ElementKind::ShortedStub {
        return 0.0;
    }
    let lambda = wavelength(freq_hz, config.er);
    let length = line_length_m(elem, config, freq_hz);
    if length < 0.5 * lambda {
        lambda / 4.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::analysis::gamma_to_impedance;
    use crate::schematic::GlobalConfig;

    #[test]
    fn matched_point_sits_at_the_nudged_origin() {
        let pt = smith_coord(1.0, 0.0, false);
        assert_abs_diff_eq!(pt.x, 0.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(pt.y, -5.0e-4, epsilon = 1.0e-5);
    }

    #[test]
    fn rotated_matched_point_flips_the_nudge() {
        let pt = smith_coord(1.0, 0.0, true);
        assert_abs_diff_eq!(pt.x, 0.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(pt.y, 5.0e-4, epsilon = 1.0e-5);
    }

    #[test]
    fn rotated_coordinate_matches_reference() {
        let pt = smith_coord(0.7490939362604676, 0.43353455562188586, true);
        assert_abs_diff_eq!(pt.x, 0.07727, epsilon = 1.0e-5);
        assert_abs_diff_eq!(pt.y, -0.26701, epsilon = 1.0e-5);
    }

    #[test]
    fn non_finite_reactance_is_reset() {
        let pt = smith_coord(2.0, f64::NAN, false);
        assert!(pt.x.is_finite() && pt.y.is_finite());
    }

    #[test]
    fn gamma_round_trips_to_impedance() {
        let z0 = 50.0;
        let z_norm = CScalar::new(1.3, 0.45);
        let g = reflection_coefficient(z_norm, z0);
        let z_back = gamma_to_impedance(CScalar::new(g.re, g.im), z0);
        assert_relative_eq!(z_back.re, z_norm.re * z0, max_relative = 1.0e-10);
        assert_relative_eq!(z_back.im, z_norm.im * z0, max_relative = 1.0e-10);
    }

    #[test]
    fn reflection_of_mismatched_load() {
        let g = reflection_coefficient(CScalar::new(1.5, 0.0), 50.0);
        assert_relative_eq!(g.re, 0.2, max_relative = 1.0e-12);
        assert_relative_eq!(g.im, 0.0);
        assert_relative_eq!(g.magnitude, 0.2, max_relative = 1.0e-12);
    }

    #[test]
    fn gamma_phase_is_normalized() {
        // Inductive region: phase in (0°, 180°); capacitive mirror below.
        let top = reflection_coefficient(CScalar::new(1.0, 1.0), 50.0);
        assert!(top.phase_deg > 0.0 && top.phase_deg < 180.0);
        let bottom = reflection_coefficient(CScalar::new(1.0, -1.0), 50.0);
        assert!(bottom.phase_deg > 180.0 && bottom.phase_deg < 360.0);
    }

    #[test]
    fn series_arc_has_steps_plus_one_points() {
        let cfg = GlobalConfig::single_ended(50.0, 1.0, 1.0e9);
        let elem = crate::schematic::CircuitElement::lumped(
            ElementKind::SeriesInductor,
            vec![0.0, 10.0],
            vec!["Q".into(), "nH".into()],
            0.0,
        )
        .unwrap();
        let (trace, zout) = element_arc(&elem, &cfg, 1.0e9, CScalar::new(1.0, 0.0), 10);
        assert_eq!(trace.points.len(), 11);
        assert!(!trace.rotated);
        assert_relative_eq!(trace.end.0, zout.re, max_relative = 1.0e-12);
        assert_relative_eq!(trace.end.1, zout.im, max_relative = 1.0e-12);
        assert_relative_eq!(zout.im, 1.2566370614359172, max_relative = 1.0e-12);
    }

    #[test]
    fn shunt_arc_interpolates_in_admittance() {
        let cfg = GlobalConfig::single_ended(50.0, 1.0, 1.0e9);
        let elem = crate::schematic::CircuitElement::lumped(
            ElementKind::ShuntResistor,
            vec![100.0],
            vec!["Ω".into()],
            0.0,
        )
        .unwrap();
        let (trace, zout) = element_arc(&elem, &cfg, 1.0e9, CScalar::new(2.0, 0.0), 8);
        assert!(trace.rotated);
        assert_eq!(trace.points.len(), 9);
        // 100 Ω ‖ 100 Ω = 50 Ω.
        assert_relative_eq!(zout.re, 1.0, max_relative = 1.0e-12);
        assert_relative_eq!(trace.end.0, 1.0, max_relative = 1.0e-12);
    }

    #[test]
    fn line_arc_starts_at_the_load() {
        let cfg = GlobalConfig::single_ended(50.0, 280.0, 1.0e9);
        let elem = crate::schematic::CircuitElement::line(
            ElementKind::TransmissionLine,
            100.0,
            "um",
            100.0,
            0.0,
        )
        .unwrap();
        let zin = CScalar::new(1.0, 0.0);
        let (trace, zout) = element_arc(&elem, &cfg, 280.0e9, zin, 10);
        assert_eq!(trace.points.len(), 11);
        // First point is the untransformed load.
        let first = smith_coord(zin.re, zin.im, false);
        assert_abs_diff_eq!(trace.points[0].x, first.x, epsilon = 1.0e-12);
        assert_abs_diff_eq!(trace.points[0].y, first.y, epsilon = 1.0e-12);
        assert_relative_eq!(zout.re * 50.0, 64.90822960372651, max_relative = 1.0e-10);
    }

    #[test]
    fn short_stub_arc_ends_at_its_admittance() {
        let cfg = GlobalConfig::single_ended(50.0, 280.0, 1.0e9);
        let elem = crate::schematic::CircuitElement::line(
            ElementKind::ShortedStub,
            100.0,
            "um",
            100.0,
            0.0,
        )
        .unwrap();
        let zin = CScalar::new(1.0, 0.0);
        let (trace, zout) = element_arc(&elem, &cfg, 280.0e9, zin, 10);
        assert!(trace.rotated);
        // End admittance equals 1/zin + stub susceptance, and the cascade
        // output is its reciprocal.
        let y_end = CScalar::new(trace.end.0, trace.end.1);
        let z_end = reciprocal(y_end);
        assert_relative_eq!(z_end.re, zout.re, max_relative = 1.0e-10);
        assert_relative_eq!(z_end.im, zout.im, max_relative = 1.0e-10);
    }
}
