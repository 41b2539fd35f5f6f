//! Convenience re-exports for building matching tools.

pub use crate::analysis::{
    derived_quantities, equivalent_parallel_rc, gamma_to_impedance, impedance_report,
    impedance_to_gamma, DerivedQuantities, GammaFormat, ImpedanceEntry, ImpedanceReport,
};
pub use crate::cascade::{
    corner_multipliers, render_chart, walk_cascade, ChartRender, DataPoint, ElementArc,
    RenderSettings,
};
pub use crate::chart::{
    element_arc, reflection_coefficient, schematic_arc, smith_coord, ArcTrace, ChartPoint,
    Reflection,
};
pub use crate::conjugate::{conjugate_match, ConjugateMatch, PortMatch};
pub use crate::constants::{angular_frequency, wavelength, SPEED_OF_LIGHT};
pub use crate::element::{cascade_step, commit_impedance, ElementImpedance};
pub use crate::errors::SmithError;
pub use crate::matching::{
    synthesize, synthesize_from_entry, MatchingSolutions, SourceFormat, CCLL, CL, CLQ, PiTee,
};
pub use crate::math::{magnitude_phase, reciprocal, CScalar, Scalar};
pub use crate::schematic::{
    CircuitElement, Composition, ElementKind, GlobalConfig, Interpolation, Schematic, Topology,
};
pub use crate::sweep::{linspace, span_frequencies};
pub use crate::units::{resolve, unit_label, Quantity, Scale};
