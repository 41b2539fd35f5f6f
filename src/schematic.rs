//! Schematic data model and JSON interchange.
//!
//! A [`Schematic`] is the global configuration plus an ordered list of
//! circuit elements, element 0 always being the black box that anchors the
//! cascade. All mutation goes through [`Schematic`] methods; every mutation
//! recomputes the cached per-element impedances for the whole schematic, so
//! the caches are never stale.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::element::{commit_impedance, ElementImpedance};
use crate::errors::SmithError;
use crate::math::Scalar;

/// Reference topology for the black-box termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    /// Single-ended, impedances referenced to z0.
    #[default]
    SingleEnded,
    /// Differential; black-box magnitudes are stored doubled (referenced to
    /// 2·z0) and halved during evaluation.
    Differential,
}

impl Topology {
    fn tag(self) -> &'static str {
        match self {
            Self::SingleEnded => "se",
            Self::Differential => "diff",
        }
    }
}

/// How an element composes into the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    /// Impedances add.
    Series,
    /// Admittances add.
    Shunt,
    /// Transforms the running impedance as its load.
    Line,
    /// Shunt stub: adds a purely reactive admittance derived from the line
    /// transform.
    Stub,
}

/// Circuit element discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Fixed terminating impedance in raw ohms.
    BlackBox,
    /// Series resistor.
    SeriesResistor,
    /// Shunt resistor.
    ShuntResistor,
    /// Series capacitor with optional loss (Q or series resistance).
    SeriesCapacitor,
    /// Shunt capacitor with optional loss.
    ShuntCapacitor,
    /// Series inductor with optional loss.
    SeriesInductor,
    /// Shunt inductor with optional loss.
    ShuntInductor,
    /// Series R-L-C branch in the series path.
    SeriesRlc,
    /// Series R-L-C branch to ground.
    ShuntRlc,
    /// Ideal transmission line segment.
    TransmissionLine,
    /// Open-circuited shunt stub.
    OpenStub,
    /// Short-circuited shunt stub.
    ShortedStub,
    /// Coupled-inductor transformer (tee equivalent).
    Transformer,
    /// Tabulated impedance versus frequency.
    CustomZ,
}

impl ElementKind {
    /// Canonical short tag used by the interchange format.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::BlackBox => "bb",
            Self::SeriesResistor => "sr",
            Self::ShuntResistor => "pr",
            Self::SeriesCapacitor => "sc",
            Self::ShuntCapacitor => "pc",
            Self::SeriesInductor => "si",
            Self::ShuntInductor => "pi",
            Self::SeriesRlc => "srlc",
            Self::ShuntRlc => "prlc",
            Self::TransmissionLine => "tl",
            Self::OpenStub => "so",
            Self::ShortedStub => "ss",
            Self::Transformer => "xfmr",
            Self::CustomZ => "customZ",
        }
    }

    /// Long descriptive name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BlackBox => "black_box",
            Self::SeriesResistor => "series_resistor",
            Self::ShuntResistor => "shunt_resistor",
            Self::SeriesCapacitor => "series_capacitor",
            Self::ShuntCapacitor => "shunt_capacitor",
            Self::SeriesInductor => "series_inductor",
            Self::ShuntInductor => "shunt_inductor",
            Self::SeriesRlc => "series_rlc",
            Self::ShuntRlc => "shunt_rlc",
            Self::TransmissionLine => "transmission_line",
            Self::OpenStub => "open_stub",
            Self::ShortedStub => "shorted_stub",
            Self::Transformer => "transformer",
            Self::CustomZ => "custom_z",
        }
    }

    /// Cascade composition rule for this kind.
    #[must_use]
    pub fn composition(self) -> Composition {
        match self {
            Self::BlackBox
            | Self::SeriesResistor
            | Self::SeriesCapacitor
            | Self::SeriesInductor
            | Self::SeriesRlc
            | Self::Transformer
            | Self::CustomZ => Composition::Series,
            Self::ShuntResistor
            | Self::ShuntCapacitor
            | Self::ShuntInductor
            | Self::ShuntRlc => Composition::Shunt,
            Self::TransmissionLine => Composition::Line,
            Self::OpenStub | Self::ShortedStub => Composition::Stub,
        }
    }

    /// Whether the element carries its own line impedance and physical
    /// length.
    #[must_use]
    pub fn is_line(self) -> bool {
        matches!(
            self,
            Self::TransmissionLine | Self::OpenStub | Self::ShortedStub
        )
    }

    /// Number of value slots this kind carries.
    #[must_use]
    pub fn value_slots(self) -> usize {
        match self {
            Self::BlackBox => 2,
            Self::SeriesResistor | Self::ShuntResistor => 1,
            Self::SeriesCapacitor
            | Self::ShuntCapacitor
            | Self::SeriesInductor
            | Self::ShuntInductor => 2,
            Self::SeriesRlc | Self::ShuntRlc => 3,
            Self::TransmissionLine | Self::OpenStub | Self::ShortedStub => 1,
            Self::Transformer => 4,
            Self::CustomZ => 0,
        }
    }

    fn unit_ok(self, slot: usize, tag: &str) -> bool {
        let resistance = |t: &str| t.ends_with('Ω') || t.ends_with("ohm");
        let capacitance = |t: &str| t.ends_with('F');
        let inductance = |t: &str| t.ends_with('H');
        let length = |t: &str| {
            matches!(t, "m" | "mm" | "um" | "μm" | "nm" | "λ" | "lambda")
        };
        match (self, slot) {
            // Black-box values are raw ohms; the unit slots are ignored.
            (Self::BlackBox, _) => true,
            (Self::SeriesResistor | Self::ShuntResistor, 0) => resistance(tag),
            (Self::SeriesCapacitor | Self::ShuntCapacitor, 0)
            | (Self::SeriesInductor | Self::ShuntInductor, 0) => {
                tag == "Q" || tag == "q" || resistance(tag)
            }
            (Self::SeriesCapacitor | Self::ShuntCapacitor, 1) => capacitance(tag),
            (Self::SeriesInductor | Self::ShuntInductor, 1) => inductance(tag),
            (Self::SeriesRlc | Self::ShuntRlc, 0) => resistance(tag),
            (Self::SeriesRlc | Self::ShuntRlc, 1) => inductance(tag),
            (Self::SeriesRlc | Self::ShuntRlc, 2) => capacitance(tag),
            (Self::TransmissionLine | Self::OpenStub | Self::ShortedStub, 0) => length(tag),
            (Self::Transformer, 0) => tag == "Q" || tag == "q" || resistance(tag),
            (Self::Transformer, 1) => inductance(tag),
            (Self::Transformer, 2) => tag == "N" || inductance(tag),
            (Self::Transformer, 3) => tag == "K" || inductance(tag),
            _ => false,
        }
    }
}

impl FromStr for ElementKind {
    type Err = SmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bb" | "black_box" | "blackbox" => Ok(Self::BlackBox),
            "sr" | "ser_res" | "series_res" | "series_resistor" => Ok(Self::SeriesResistor),
            "pr" | "shnt_res" | "shunt_res" | "shunt_resistor" => Ok(Self::ShuntResistor),
            "sc" | "ser_cap" | "series_cap" | "series_capacitor" => Ok(Self::SeriesCapacitor),
            "pc" | "shnt_cap" | "shunt_cap" | "shunt_capacitor" => Ok(Self::ShuntCapacitor),
            "si" | "ser_ind" | "series_ind" | "series_inductor" => Ok(Self::SeriesInductor),
            "pi" | "shnt_ind" | "shunt_ind" | "shunt_inductor" => Ok(Self::ShuntInductor),
            "srlc" | "series_rlc" => Ok(Self::SeriesRlc),
            "prlc" | "shunt_rlc" => Ok(Self::ShuntRlc),
            "tl" | "tline" | "transmission_line" => Ok(Self::TransmissionLine),
            "so" | "os" | "open_stub" => Ok(Self::OpenStub),
            "ss" | "short_stub" | "shorted_stub" => Ok(Self::ShortedStub),
            "xfmr" | "transformer" => Ok(Self::Transformer),
            "customZ" | "custom_z" => Ok(Self::CustomZ),
            other => Err(SmithError::UnknownElement(other.to_string())),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interpolation method for tabulated impedances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Per-column linear interpolation, clamped to the table edges.
    #[default]
    Linear,
}

/// One row of a custom-impedance table: `[frequency Hz, real Ω, imag Ω]`.
pub type LutRow = [Scalar; 3];

/// A single circuit element.
///
/// `real`/`imaginary` (and `length` for line kinds) are cached outputs of the
/// element model, refreshed by [`Schematic::recompute`]; they are never
/// authoritative inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitElement {
    kind: ElementKind,
    values: Vec<Scalar>,
    units: Vec<String>,
    tolerance: Scalar,
    line_z0: Scalar,
    lut: Vec<LutRow>,
    interp: Interpolation,
    real: Scalar,
    imaginary: Scalar,
    length: Scalar,
}

impl CircuitElement {
    /// Builds a lumped element (anything except line kinds and `CustomZ`).
    pub fn lumped(
        kind: ElementKind,
        values: Vec<Scalar>,
        units: Vec<String>,
        tolerance: Scalar,
    ) -> Result<Self, SmithError> {
        if kind.is_line() || kind == ElementKind::CustomZ {
            return Err(SmithError::InvalidConfig(format!(
                "{kind} is not a lumped element"
            )));
        }
        let elem = Self {
            kind,
            values,
            units,
            tolerance,
            line_z0: 0.0,
            lut: Vec::new(),
            interp: Interpolation::Linear,
            real: 0.0,
            imaginary: 0.0,
            length: 0.0,
        };
        elem.validate()?;
        Ok(elem)
    }

    /// Builds a transmission-line element (ideal line or stub).
    pub fn line(
        kind: ElementKind,
        length: Scalar,
        unit: impl Into<String>,
        line_z0: Scalar,
        tolerance: Scalar,
    ) -> Result<Self, SmithError> {
        if !kind.is_line() {
            return Err(SmithError::InvalidConfig(format!(
                "{kind} is not a transmission-line element"
            )));
        }
        let elem = Self {
            kind,
            values: vec![length],
            units: vec![unit.into()],
            tolerance,
            line_z0,
            lut: Vec::new(),
            interp: Interpolation::Linear,
            real: 0.0,
            imaginary: 0.0,
            length: 0.0,
        };
        elem.validate()?;
        Ok(elem)
    }

    /// Builds a tabulated-impedance element.
    pub fn custom(lut: Vec<LutRow>, interp: Interpolation) -> Result<Self, SmithError> {
        let elem = Self {
            kind: ElementKind::CustomZ,
            values: Vec::new(),
            units: Vec::new(),
            tolerance: 0.0,
            line_z0: 0.0,
            lut,
            interp,
            real: 0.0,
            imaginary: 0.0,
            length: 0.0,
        };
        elem.validate()?;
        Ok(elem)
    }

    /// Black-box termination with raw resistance/reactance in ohms.
    #[must_use]
    pub fn black_box(resistance: Scalar, reactance: Scalar) -> Self {
        Self {
            kind: ElementKind::BlackBox,
            values: vec![resistance, reactance],
            units: vec!["Ω".into(), "Ω".into()],
            tolerance: 0.0,
            line_z0: 0.0,
            lut: Vec::new(),
            interp: Interpolation::Linear,
            real: 0.0,
            imaginary: 0.0,
            length: 0.0,
        }
    }

    /// A freshly inserted element with the tool's default values for `kind`.
    #[must_use]
    pub fn default_for(kind: ElementKind) -> Self {
        let (values, units): (Vec<Scalar>, Vec<&str>) = match kind {
            ElementKind::BlackBox => (vec![50.0, 0.0], vec!["Ω", "Ω"]),
            ElementKind::SeriesResistor | ElementKind::ShuntResistor => (vec![50.0], vec!["Ω"]),
            ElementKind::SeriesInductor | ElementKind::ShuntInductor => {
                (vec![20.0, 10.0], vec!["Q", "pH"])
            }
            ElementKind::SeriesCapacitor | ElementKind::ShuntCapacitor => {
                (vec![0.0, 20.0], vec!["Q", "fF"])
            }
            ElementKind::SeriesRlc | ElementKind::ShuntRlc => {
                (vec![1.0, 10.0, 20.0], vec!["Ω", "pH", "fF"])
            }
            ElementKind::TransmissionLine | ElementKind::OpenStub | ElementKind::ShortedStub => {
                (vec![1.0], vec!["um"])
            }
            ElementKind::Transformer => (vec![20.0, 10.0, 10.0, 0.4], vec!["Q", "pH", "pH", "K"]),
            ElementKind::CustomZ => (Vec::new(), Vec::new()),
        };
        let mut elem = Self {
            kind,
            values,
            units: units.into_iter().map(String::from).collect(),
            tolerance: 0.0,
            line_z0: if kind.is_line() { 50.0 } else { 0.0 },
            lut: if kind == ElementKind::CustomZ {
                vec![[1.0e9, 50.0, 0.0]]
            } else {
                Vec::new()
            },
            interp: Interpolation::Linear,
            real: 0.0,
            imaginary: 0.0,
            length: 0.0,
        };
        if kind == ElementKind::CustomZ {
            elem.values = Vec::new();
        }
        elem
    }

    fn validate(&self) -> Result<(), SmithError> {
        if self.tolerance < 0.0 {
            return Err(SmithError::InvalidConfig(
                "tolerance must be non-negative".into(),
            ));
        }
        match self.kind {
            ElementKind::CustomZ => {
                if self.lut.is_empty() {
                    return Err(SmithError::InvalidConfig(
                        "custom impedance table must contain at least one row".into(),
                    ));
                }
                if self.lut.windows(2).any(|w| w[0][0] > w[1][0]) {
                    return Err(SmithError::InvalidConfig(
                        "custom impedance table must be sorted by frequency".into(),
                    ));
                }
            }
            kind => {
                if self.values.len() != kind.value_slots()
                    || self.units.len() != self.values.len()
                {
                    return Err(SmithError::InvalidConfig(format!(
                        "{kind} expects {} value/unit pairs",
                        kind.value_slots()
                    )));
                }
                for (slot, tag) in self.units.iter().enumerate() {
                    if !kind.unit_ok(slot, tag) {
                        return Err(SmithError::InvalidUnit {
                            kind: kind.name(),
                            tag: tag.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Element discriminant.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Displayed value magnitudes.
    #[must_use]
    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    /// Unit tags parallel to [`Self::values`].
    #[must_use]
    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Tolerance in percent; 0 means exact.
    #[must_use]
    pub fn tolerance(&self) -> Scalar {
        self.tolerance
    }

    /// Characteristic impedance of a line element, in ohms.
    #[must_use]
    pub fn line_z0(&self) -> Scalar {
        self.line_z0
    }

    /// Lookup table of a `CustomZ` element.
    #[must_use]
    pub fn lut(&self) -> &[LutRow] {
        &self.lut
    }

    /// Interpolation method of a `CustomZ` element.
    #[must_use]
    pub fn interp(&self) -> Interpolation {
        self.interp
    }

    /// Cached normalized resistance from the last recompute.
    #[must_use]
    pub fn real(&self) -> Scalar {
        self.real
    }

    /// Cached normalized reactance from the last recompute.
    #[must_use]
    pub fn imaginary(&self) -> Scalar {
        self.imaginary
    }

    /// Cached physical length in meters (line kinds only).
    #[must_use]
    pub fn length(&self) -> Scalar {
        self.length
    }

    /// A copy of this element with every value scaled by `factor` (tolerance
    /// corner evaluation).
    #[must_use]
    pub(crate) fn scaled(&self, factor: Scalar) -> Self {
        let mut out = self.clone();
        for v in &mut out.values {
            *v *= factor;
        }
        out
    }

    pub(crate) fn store_cache(&mut self, z: &ElementImpedance) {
        self.real = z.real;
        self.imaginary = z.imaginary;
        self.length = z.length;
    }
}

/// Global configuration occupying slot 0 of the interchange array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Reference impedance in ohms.
    pub z0: Scalar,
    /// Center frequency magnitude in `freq_multiplier` units.
    pub freq: Scalar,
    /// Frequency unit multiplier (1e9 for GHz).
    pub freq_multiplier: Scalar,
    /// Sweep half-span magnitude in `span_multiplier` units; 0 disables the
    /// span sweep.
    pub span: Scalar,
    /// Span unit multiplier.
    pub span_multiplier: Scalar,
    /// Relative permittivity used for transmission-line lengths.
    pub er: Scalar,
    /// Single-ended or differential reference.
    pub topology: Topology,
}

impl GlobalConfig {
    /// Single-ended configuration at the given reference impedance and
    /// frequency (magnitude × multiplier), with no span and εr = 1.
    #[must_use]
    pub fn single_ended(z0: Scalar, freq: Scalar, freq_multiplier: Scalar) -> Self {
        Self {
            z0,
            freq,
            freq_multiplier,
            span: 0.0,
            span_multiplier: freq_multiplier,
            er: 1.0,
            topology: Topology::SingleEnded,
        }
    }

    /// Center frequency in Hz.
    #[must_use]
    pub fn frequency_hz(&self) -> Scalar {
        self.freq * self.freq_multiplier
    }

    /// Sweep half-span in Hz.
    #[must_use]
    pub fn span_hz(&self) -> Scalar {
        self.span * self.span_multiplier
    }

    /// Checks the static invariants (`z0 > 0`, `er > 0`) and that the span
    /// does not push the sweep into negative frequencies.
    pub fn validate(&self) -> Result<(), SmithError> {
        if !(self.z0 > 0.0) {
            return Err(SmithError::InvalidConfig("z0 must be positive".into()));
        }
        if !(self.er > 0.0) {
            return Err(SmithError::InvalidConfig("er must be positive".into()));
        }
        if self.span_hz() > self.frequency_hz() {
            return Err(SmithError::InvalidConfig(
                "span exceeds the center frequency; the sweep would reach negative frequencies"
                    .into(),
            ));
        }
        Ok(())
    }
}

/// Ordered element chain with its global configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Schematic {
    config: GlobalConfig,
    elements: Vec<CircuitElement>,
}

impl Schematic {
    /// New schematic holding only the mandatory black box, matched to z0
    /// (doubled magnitudes for a differential reference).
    #[must_use]
    pub fn new(config: GlobalConfig) -> Self {
        let bb = match config.topology {
            Topology::SingleEnded => CircuitElement::black_box(config.z0, 0.0),
            Topology::Differential => CircuitElement::black_box(2.0 * config.z0, 0.0),
        };
        let mut sch = Self {
            config,
            elements: vec![bb],
        };
        sch.recompute();
        sch
    }

    /// Global configuration.
    #[must_use]
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Replaces the global configuration and recomputes all cached values.
    pub fn set_config(&mut self, config: GlobalConfig) -> Result<(), SmithError> {
        if !(config.z0 > 0.0) || !(config.er > 0.0) {
            return Err(SmithError::InvalidConfig(
                "z0 and er must be positive".into(),
            ));
        }
        self.config = config;
        self.recompute();
        Ok(())
    }

    /// Elements in cascade order; index 0 is the black box.
    #[must_use]
    pub fn elements(&self) -> &[CircuitElement] {
        &self.elements
    }

    /// Element at `index`, if present.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&CircuitElement> {
        self.elements.get(index)
    }

    /// Appends an element to the cascade. A second black box is rejected.
    pub fn push(&mut self, element: CircuitElement) -> Result<(), SmithError> {
        if element.kind() == ElementKind::BlackBox {
            return Err(SmithError::InvalidConfig(
                "the schematic already carries its black box".into(),
            ));
        }
        self.elements.push(element);
        self.recompute();
        Ok(())
    }

    /// Removes the element at `index`. The black box (index 0) is
    /// structurally required and cannot be removed.
    pub fn remove(&mut self, index: usize) -> Result<CircuitElement, SmithError> {
        if index == 0 {
            return Err(SmithError::InvalidConfig(
                "the black box cannot be removed".into(),
            ));
        }
        if index >= self.elements.len() {
            return Err(SmithError::InvalidConfig(format!(
                "no element at index {index}"
            )));
        }
        let removed = self.elements.remove(index);
        self.recompute();
        Ok(removed)
    }

    /// Updates one value slot of an element.
    pub fn set_value(&mut self, index: usize, slot: usize, value: Scalar) -> Result<(), SmithError> {
        let elem = self.element_mut(index)?;
        if slot >= elem.values.len() {
            return Err(SmithError::InvalidConfig(format!(
                "{} has no value slot {slot}",
                elem.kind
            )));
        }
        elem.values[slot] = value;
        self.recompute();
        Ok(())
    }

    /// Updates one unit slot of an element, validating the tag against the
    /// kind's allowed set.
    pub fn set_unit(
        &mut self,
        index: usize,
        slot: usize,
        tag: impl Into<String>,
    ) -> Result<(), SmithError> {
        let tag = tag.into();
        let elem = self.element_mut(index)?;
        if slot >= elem.units.len() {
            return Err(SmithError::InvalidConfig(format!(
                "{} has no unit slot {slot}",
                elem.kind
            )));
        }
        if !elem.kind.unit_ok(slot, &tag) {
            return Err(SmithError::InvalidUnit {
                kind: elem.kind.name(),
                tag,
            });
        }
        elem.units[slot] = tag;
        self.recompute();
        Ok(())
    }

    /// Updates an element's tolerance in percent.
    pub fn set_tolerance(&mut self, index: usize, tolerance: Scalar) -> Result<(), SmithError> {
        if tolerance < 0.0 {
            return Err(SmithError::InvalidConfig(
                "tolerance must be non-negative".into(),
            ));
        }
        self.element_mut(index)?.tolerance = tolerance;
        self.recompute();
        Ok(())
    }

    /// Updates the characteristic impedance of a line element.
    pub fn set_line_z0(&mut self, index: usize, line_z0: Scalar) -> Result<(), SmithError> {
        let elem = self.element_mut(index)?;
        if !elem.kind.is_line() {
            return Err(SmithError::InvalidConfig(format!(
                "{} has no line impedance",
                elem.kind
            )));
        }
        elem.line_z0 = line_z0;
        self.recompute();
        Ok(())
    }

    /// Replaces the lookup table of a `CustomZ` element.
    pub fn set_lut(&mut self, index: usize, lut: Vec<LutRow>) -> Result<(), SmithError> {
        let elem = self.element_mut(index)?;
        if elem.kind != ElementKind::CustomZ {
            return Err(SmithError::InvalidConfig(format!(
                "{} has no lookup table",
                elem.kind
            )));
        }
        let mut candidate = elem.clone();
        candidate.lut = lut;
        candidate.validate()?;
        *elem = candidate;
        self.recompute();
        Ok(())
    }

    fn element_mut(&mut self, index: usize) -> Result<&mut CircuitElement, SmithError> {
        let len = self.elements.len();
        self.elements
            .get_mut(index)
            .ok_or_else(|| SmithError::InvalidConfig(format!("no element at index {index} ({len} present)")))
    }

    /// Recomputes every element's cached normalized impedance at the center
    /// frequency. NaN results are stored as-is.
    pub fn recompute(&mut self) {
        let config = self.config;
        let freq_hz = config.frequency_hz();
        for elem in &mut self.elements {
            let z = commit_impedance(elem, &config, freq_hz);
            elem.store_cache(&z);
        }
    }

    /// Probe evaluation of one element's normalized impedance, optionally at
    /// an override frequency. Never mutates the schematic.
    pub fn element_impedance(
        &self,
        index: usize,
        freq_override_hz: Option<Scalar>,
    ) -> Result<ElementImpedance, SmithError> {
        let elem = self
            .elements
            .get(index)
            .ok_or_else(|| SmithError::InvalidConfig(format!("no element at index {index}")))?;
        let freq = freq_override_hz.unwrap_or_else(|| self.config.frequency_hz());
        Ok(commit_impedance(elem, &self.config, freq))
    }

    /// Serializes to the interchange JSON array.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut arr = vec![json!({
            "type": "raw",
            "imp": self.config.topology.tag(),
            "z0": self.config.z0,
            "freq": self.config.freq,
            "freq_unit": { "multiplier": self.config.freq_multiplier },
            "span": self.config.span,
            "span_unit": { "multiplier": self.config.span_multiplier },
            "er": self.config.er,
        })];
        for elem in &self.elements {
            let mut entry = json!({
                "type": elem.kind.tag(),
                "abs": elem.values,
                "unit": elem.units,
                "tol": elem.tolerance,
                "real": elem.real,
                "imaginary": elem.imaginary,
            });
            let map = entry.as_object_mut().expect("object literal");
            if elem.kind.is_line() {
                map.insert("line_zo".into(), json!(elem.line_z0));
                map.insert("line_length".into(), json!(elem.length));
            }
            if elem.kind == ElementKind::CustomZ {
                map.insert("lut".into(), json!(elem.lut));
                map.insert("interp".into(), json!("linear"));
            }
            arr.push(entry);
        }
        Value::Array(arr)
    }

    /// Serializes to an interchange JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).expect("schematic serializes")
    }

    /// Loads a schematic from interchange JSON, coercing legacy scalar
    /// `abs`/`unit` fields and the `abs_bb_i` black-box field. A schematic
    /// that fails validation is rejected without partial application.
    pub fn from_json(text: &str) -> Result<Self, SmithError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| SmithError::MalformedSchematic(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Loads a schematic from a parsed interchange value.
    pub fn from_value(value: &Value) -> Result<Self, SmithError> {
        let arr = value
            .as_array()
            .ok_or_else(|| SmithError::MalformedSchematic("expected a JSON array".into()))?;
        if arr.len() < 2 {
            return Err(SmithError::MalformedSchematic(
                "expected global config plus at least the black box".into(),
            ));
        }

        let stored: StoredGlobal = serde_json::from_value(arr[0].clone())
            .map_err(|e| SmithError::MalformedSchematic(format!("global config: {e}")))?;
        let topology = match stored.imp.as_str() {
            "diff" => Topology::Differential,
            "se" => Topology::SingleEnded,
            other => {
                return Err(SmithError::MalformedSchematic(format!(
                    "unknown topology `{other}`"
                )))
            }
        };
        let config = GlobalConfig {
            z0: stored.z0,
            freq: stored.freq,
            freq_multiplier: stored.freq_unit.multiplier,
            span: stored.span.unwrap_or(0.0),
            span_multiplier: stored
                .span_unit
                .map_or(stored.freq_unit.multiplier, |u| u.multiplier),
            er: stored.er,
            topology,
        };
        if !(config.z0 > 0.0) || !(config.er > 0.0) {
            return Err(SmithError::MalformedSchematic(
                "z0 and er must be positive".into(),
            ));
        }

        let mut elements = Vec::with_capacity(arr.len() - 1);
        for (pos, entry) in arr[1..].iter().enumerate() {
            let elem = element_from_value(entry)
                .map_err(|e| match e {
                    SmithError::MalformedSchematic(msg) => SmithError::MalformedSchematic(
                        format!("element {}: {msg}", pos + 1),
                    ),
                    other => other,
                })?;
            elements.push(elem);
        }
        if elements[0].kind() != ElementKind::BlackBox {
            return Err(SmithError::MalformedSchematic(
                "the first element must be a black box".into(),
            ));
        }
        if elements[1..]
            .iter()
            .any(|e| e.kind() == ElementKind::BlackBox)
        {
            return Err(SmithError::MalformedSchematic(
                "only one black box is allowed".into(),
            ));
        }

        let mut sch = Self { config, elements };
        sch.recompute();
        Ok(sch)
    }
}

#[derive(Deserialize)]
struct StoredUnit {
    multiplier: Scalar,
}

#[derive(Deserialize)]
struct StoredGlobal {
    imp: String,
    z0: Scalar,
    freq: Scalar,
    er: Scalar,
    freq_unit: StoredUnit,
    span: Option<Scalar>,
    span_unit: Option<StoredUnit>,
}

/// Legacy files stored single-slot `abs`/`unit` as scalars.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(v) => v,
            Self::One(x) => vec![x],
        }
    }
}

#[derive(Deserialize)]
struct StoredElement {
    #[serde(rename = "type")]
    kind: String,
    abs: Option<OneOrMany<Scalar>>,
    unit: Option<OneOrMany<String>>,
    abs_bb_i: Option<Scalar>,
    tol: Option<Scalar>,
    line_zo: Option<Scalar>,
    lut: Option<Vec<LutRow>>,
    interp: Option<String>,
}

fn element_from_value(entry: &Value) -> Result<CircuitElement, SmithError> {
    let stored: StoredElement = serde_json::from_value(entry.clone())
        .map_err(|e| SmithError::MalformedSchematic(e.to_string()))?;
    let kind = ElementKind::from_str(&stored.kind)?;
    let tolerance = stored.tol.unwrap_or(0.0).abs();

    if kind == ElementKind::CustomZ {
        let lut = stored
            .lut
            .ok_or_else(|| SmithError::MalformedSchematic("custom_z without lut".into()))?;
        match stored.interp.as_deref() {
            None | Some("linear") => {}
            Some(other) => {
                return Err(SmithError::MalformedSchematic(format!(
                    "unknown interpolation `{other}`"
                )))
            }
        }
        return CircuitElement::custom(lut, Interpolation::Linear)
            .map_err(|e| SmithError::MalformedSchematic(e.to_string()));
    }

    let mut values = stored
        .abs
        .ok_or_else(|| SmithError::MalformedSchematic(format!("{kind} without abs values")))?
        .into_vec();
    let mut units = stored.unit.map(OneOrMany::into_vec).unwrap_or_default();

    if kind == ElementKind::BlackBox {
        if let Some(xi) = stored.abs_bb_i {
            values.push(xi);
        }
        if values.len() != 2 {
            return Err(SmithError::MalformedSchematic(
                "black box needs [resistance, reactance]".into(),
            ));
        }
        let mut elem = CircuitElement::black_box(values[0], values[1]);
        elem.tolerance = tolerance;
        return Ok(elem);
    }

    if kind.is_line() {
        let unit = units
            .pop()
            .ok_or_else(|| SmithError::MalformedSchematic(format!("{kind} without a length unit")))?;
        let length = values
            .first()
            .copied()
            .ok_or_else(|| SmithError::MalformedSchematic(format!("{kind} without a length")))?;
        let line_z0 = stored.line_zo.unwrap_or(50.0);
        return CircuitElement::line(kind, length, unit, line_z0, tolerance)
            .map_err(|e| SmithError::MalformedSchematic(e.to_string()));
    }

    CircuitElement::lumped(kind, values, units, tolerance)
        .map_err(|e| SmithError::MalformedSchematic(e.to_string()))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn ghz_config() -> GlobalConfig {
        GlobalConfig::single_ended(50.0, 1.0, 1.0e9)
    }

    #[test]
    fn new_schematic_carries_a_matched_black_box() {
        let sch = Schematic::new(ghz_config());
        assert_eq!(sch.elements().len(), 1);
        assert_eq!(sch.elements()[0].kind(), ElementKind::BlackBox);
        assert_relative_eq!(sch.elements()[0].real(), 1.0);
        assert_relative_eq!(sch.elements()[0].imaginary(), 0.0);
    }

    #[test]
    fn differential_black_box_is_doubled() {
        let mut config = ghz_config();
        config.topology = Topology::Differential;
        let sch = Schematic::new(config);
        assert_relative_eq!(sch.elements()[0].values()[0], 100.0);
        // Stored doubled, evaluated back to a normalized match.
        assert_relative_eq!(sch.elements()[0].real(), 1.0);
    }

    #[test]
    fn black_box_cannot_be_removed() {
        let mut sch = Schematic::new(ghz_config());
        assert!(sch.remove(0).is_err());
    }

    #[test]
    fn unit_validation_rejects_out_of_enum_tags() {
        let err = CircuitElement::lumped(
            ElementKind::SeriesInductor,
            vec![0.0, 10.0],
            vec!["Q".into(), "pF".into()],
            0.0,
        )
        .unwrap_err();
        assert!(matches!(err, SmithError::InvalidUnit { .. }));
    }

    #[test]
    fn custom_table_must_be_sorted_and_non_empty() {
        assert!(CircuitElement::custom(Vec::new(), Interpolation::Linear).is_err());
        let unsorted = vec![[2.0e9, 50.0, 0.0], [1.0e9, 40.0, 0.0]];
        assert!(CircuitElement::custom(unsorted, Interpolation::Linear).is_err());
    }

    #[test]
    fn mutations_refresh_cached_impedance() {
        let mut sch = Schematic::new(ghz_config());
        sch.push(
            CircuitElement::lumped(
                ElementKind::SeriesInductor,
                vec![0.0, 10.0],
                vec!["Q".into(), "nH".into()],
                0.0,
            )
            .unwrap(),
        )
        .unwrap();
        let x_before = sch.elements()[1].imaginary();
        sch.set_value(1, 1, 20.0).unwrap();
        let x_after = sch.elements()[1].imaginary();
        assert_relative_eq!(x_after, 2.0 * x_before, max_relative = 1.0e-12);
    }

    #[test]
    fn json_round_trip_preserves_the_schematic() {
        let mut sch = Schematic::new(ghz_config());
        sch.push(
            CircuitElement::lumped(
                ElementKind::ShuntCapacitor,
                vec![0.0, 20.0],
                vec!["Q".into(), "fF".into()],
                5.0,
            )
            .unwrap(),
        )
        .unwrap();
        sch.push(CircuitElement::line(ElementKind::TransmissionLine, 100.0, "um", 75.0, 0.0).unwrap())
            .unwrap();

        let text = sch.to_json();
        let loaded = Schematic::from_json(&text).unwrap();
        assert_eq!(loaded.elements().len(), sch.elements().len());
        assert_eq!(loaded.config(), sch.config());
        assert_eq!(loaded.elements()[1], sch.elements()[1]);
        assert_relative_eq!(loaded.elements()[2].line_z0(), 75.0);
    }

    #[test]
    fn legacy_scalar_fields_are_coerced() {
        let text = r#"[
            {"type":"raw","imp":"se","z0":50,"freq":1,"er":1,
             "freq_unit":{"multiplier":1e9},"span":0,"span_unit":{"multiplier":1e9}},
            {"type":"bb","abs":75,"abs_bb_i":25,"unit":"null","tol":0},
            {"type":"sr","abs":10,"unit":"Ω","tol":0}
        ]"#;
        let sch = Schematic::from_json(text).unwrap();
        assert_eq!(sch.elements()[0].values(), &[75.0, 25.0]);
        assert_eq!(sch.elements()[1].values(), &[10.0]);
    }

    #[test]
    fn malformed_schematics_are_rejected() {
        // Not an array.
        assert!(Schematic::from_json("{}").is_err());
        // Unknown element kind.
        let text = r#"[
            {"type":"raw","imp":"se","z0":50,"freq":1,"er":1,
             "freq_unit":{"multiplier":1e9}},
            {"type":"warp_coil","abs":[1],"unit":["Ω"],"tol":0}
        ]"#;
        assert!(Schematic::from_json(text).is_err());
        // First element is not a black box.
        let text = r#"[
            {"type":"raw","imp":"se","z0":50,"freq":1,"er":1,
             "freq_unit":{"multiplier":1e9}},
            {"type":"sr","abs":[10],"unit":["Ω"],"tol":0}
        ]"#;
        assert!(Schematic::from_json(text).is_err());
    }

    #[test]
    fn span_beyond_frequency_is_an_invalid_config() {
        let mut config = ghz_config();
        config.span = 2.0;
        config.span_multiplier = 1.0e9;
        assert!(matches!(
            config.validate(),
            Err(SmithError::InvalidConfig(_))
        ));
    }
}
