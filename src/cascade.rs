//! Network cascading, tolerance corners and span envelopes.
//!
//! The engine walks the schematic front to back, folding each element into a
//! running normalized impedance. The walk is repeated once per tolerance
//! corner (every toleranced element independently at +tol and −tol, plus the
//! all-nominal case) and, for the nominal corner, once per span frequency
//! sample. Corner walks operate on scaled copies of the elements; the
//! schematic itself is never mutated.

use serde::Serialize;

use crate::chart::{element_arc, ArcTrace};
use crate::element::{branch_impedance_norm, cascade_step};
use crate::errors::SmithError;
use crate::math::{CScalar, Scalar};
use crate::schematic::{CircuitElement, GlobalConfig, Schematic};
use crate::sweep::span_frequencies;

/// Rendering knobs; the defaults match the interactive tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Points per element arc.
    pub arc_resolution: usize,
    /// Half the number of span samples (samples = 2·resolution + 1).
    pub span_resolution: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            arc_resolution: 100,
            span_resolution: 20,
        }
    }
}

/// Impedance recorded at an element boundary, scaled back to ohms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    /// Resistance in ohms.
    pub real: Scalar,
    /// Reactance in ohms.
    pub imaginary: Scalar,
}

/// One element's arc within one tolerance corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementArc {
    /// Schematic index of the element the arc belongs to.
    pub element: usize,
    /// Corner index the arc was computed for.
    pub corner: usize,
    /// Whether this corner is the all-nominal (ideal) one.
    pub ideal: bool,
    /// The chart trajectory.
    pub trace: ArcTrace,
}

/// Full render output for one schematic state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRender {
    /// Arcs for every element of every corner, schematic order within each
    /// corner, nominal corner last.
    pub arcs: Vec<ElementArc>,
    /// Normalized terminal impedance per span sample (nominal corner). One
    /// entry for a zero span, `2·span_resolution + 1` otherwise.
    pub span_impedances: Vec<CScalar>,
    /// Impedance at each element boundary (nominal corner, center
    /// frequency), in ohms.
    pub data_points: Vec<DataPoint>,
    /// Normalized terminal impedance at the center frequency.
    pub terminal: CScalar,
    /// Number of corner walks performed (`2^k + 1`, or 1 when no element
    /// carries tolerance).
    pub corner_count: usize,
}

/// Per-corner value multipliers: one row per corner, one entry per element.
/// Toleranced elements alternate through +tol/−tol across the 2ᵏ corners;
/// the appended final row is all-nominal. A schematic without tolerances
/// yields the single nominal row.
#[must_use]
pub fn corner_multipliers(elements: &[CircuitElement]) -> Vec<Vec<Scalar>> {
    let toleranced: Vec<usize> = elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.tolerance() > 0.0)
        .map(|(i, _)| i)
        .collect();
    let k = toleranced.len();
    if k == 0 {
        return vec![vec![1.0; elements.len()]];
    }

    let mut corners = Vec::with_capacity((1 << k) + 1);
    for corner in 0..(1_usize << k) {
        let mut row = vec![1.0; elements.len()];
        for (bit, &idx) in toleranced.iter().enumerate() {
            let tol = elements[idx].tolerance() / 100.0;
            row[idx] = if corner >> bit & 1 == 0 {
                1.0 + tol
            } else {
                1.0 - tol
            };
        }
        corners.push(row);
    }
    corners.push(vec![1.0; elements.len()]);
    corners
}

/// Walks the full cascade at one frequency, returning the terminal
/// normalized impedance. Non-finite element results propagate through.
#[must_use]
pub fn walk_cascade(
    elements: &[CircuitElement],
    config: &GlobalConfig,
    freq_hz: Scalar,
) -> CScalar {
    let mut z = branch_impedance_norm(&elements[0], config, freq_hz);
    for elem in &elements[1..] {
        z = cascade_step(elem, config, freq_hz, z);
    }
    z
}

/// Renders the schematic: per-corner arcs, the nominal span envelope and the
/// boundary data points.
pub fn render_chart(
    schematic: &Schematic,
    settings: &RenderSettings,
) -> Result<ChartRender, SmithError> {
    let config = *schematic.config();
    config.validate()?;

    let freq_hz = config.frequency_hz();
    let span_hz = config.span_hz();
    let corners = corner_multipliers(schematic.elements());
    let corner_count = corners.len();

    let mut arcs = Vec::new();
    let mut data_points = Vec::new();
    let mut span_impedances = Vec::new();
    let mut terminal = CScalar::new(0.0, 0.0);

    for (ci, row) in corners.iter().enumerate() {
        let ideal = ci == corner_count - 1;
        let scaled: Vec<CircuitElement> = schematic
            .elements()
            .iter()
            .zip(row)
            .map(|(e, &m)| e.scaled(m))
            .collect();

        let mut z = branch_impedance_norm(&scaled[0], &config, freq_hz);
        for (offset, elem) in scaled[1..].iter().enumerate() {
            if ideal {
                data_points.push(DataPoint {
                    real: z.re * config.z0,
                    imaginary: z.im * config.z0,
                });
            }
            let (trace, z_next) = element_arc(elem, &config, freq_hz, z, settings.arc_resolution);
            arcs.push(ElementArc {
                element: offset + 1,
                corner: ci,
                ideal,
                trace,
            });
            z = z_next;
        }

        if ideal {
            terminal = z;
            data_points.push(DataPoint {
                real: z.re * config.z0,
                imaginary: z.im * config.z0,
            });
            span_impedances = span_frequencies(freq_hz, span_hz, settings.span_resolution)
                .into_iter()
                .map(|f| {
                    if f == freq_hz {
                        z
                    } else {
                        walk_cascade(&scaled, &config, f)
                    }
                })
                .collect();
        }
    }

    Ok(ChartRender {
        arcs,
        span_impedances,
        data_points,
        terminal,
        corner_count,
    })
}
