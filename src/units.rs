//! Unit tags and SI scale resolution.
//!
//! Element values are stored as displayed magnitudes next to a unit tag
//! (`[0.0, 20.0]` with `["Q", "fF"]`). [`resolve`] turns a tag into the
//! multiplier that converts the displayed magnitude into SI units; the
//! reverse direction is used when handing synthesized component values back
//! in the caller's preferred scale.

use crate::constants::wavelength;
use crate::math::Scalar;

/// Decoded unit scale.
///
/// `Lambda` carries the frequency/permittivity context needed to convert a
/// length expressed in wavelengths. `Quality`, `Coupling` and `Turns` are
/// dimensionless tags that occupy unit slots on lossy/coupled elements and
/// resolve to a multiplier of 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// 10¹²
    Tera,
    /// 10⁹
    Giga,
    /// 10⁶
    Mega,
    /// 10³
    Kilo,
    /// Unscaled.
    Base,
    /// Physical length in meters (the literal tag `m`).
    Meter,
    /// 10⁻³
    Milli,
    /// 10⁻⁶
    Micro,
    /// 10⁻⁹
    Nano,
    /// 10⁻¹²
    Pico,
    /// 10⁻¹⁵
    Femto,
    /// Length in guided wavelengths at `freq_hz` / `er`.
    Lambda {
        /// Frequency context in Hz.
        freq_hz: Scalar,
        /// Relative permittivity context.
        er: Scalar,
    },
    /// Quality-factor tag on a resistive slot.
    Quality,
    /// Coupling-coefficient tag on a transformer mutual slot.
    Coupling,
    /// Turns-ratio tag on a transformer secondary slot.
    Turns,
}

impl Scale {
    /// Decodes a unit tag. Named scales and `prefix + quantity` forms
    /// (`"pF"`, `"kΩ"`, `"GHz"`, …) are both accepted. Unrecognized tags
    /// decode to [`Scale::Base`]; this permissive fallback is kept for
    /// compatibility with persisted schematics and is surfaced at debug
    /// level rather than treated as an error.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "m" => return Self::Meter,
            "Q" | "q" => return Self::Quality,
            "K" => return Self::Coupling,
            "N" => return Self::Turns,
            "lambda" | "λ" | "wavelength" => {
                return Self::Lambda {
                    freq_hz: 1.0,
                    er: 1.0,
                }
            }
            "tera" => return Self::Tera,
            "giga" => return Self::Giga,
            "mega" => return Self::Mega,
            "kilo" => return Self::Kilo,
            "milli" => return Self::Milli,
            "micro" => return Self::Micro,
            "nano" => return Self::Nano,
            "pico" => return Self::Pico,
            "femto" => return Self::Femto,
            _ => {}
        }

        match tag.chars().next() {
            Some('T') => Self::Tera,
            Some('G') => Self::Giga,
            Some('M') => Self::Mega,
            Some('k') | Some('K') => Self::Kilo,
            Some('m') => Self::Milli,
            Some('u') | Some('μ') => Self::Micro,
            Some('n') => Self::Nano,
            Some('p') => Self::Pico,
            Some('f') => Self::Femto,
            Some('λ') => Self::Lambda {
                freq_hz: 1.0,
                er: 1.0,
            },
            _ => {
                log::debug!("unrecognized unit tag `{tag}`, treating as unscaled");
                Self::Base
            }
        }
    }

    /// Supplies wavelength context to a `Lambda` scale; other scales pass
    /// through unchanged.
    #[must_use]
    pub fn with_wavelength_context(self, freq_hz: Scalar, er: Scalar) -> Self {
        match self {
            Self::Lambda { .. } => Self::Lambda { freq_hz, er },
            other => other,
        }
    }

    /// Multiplier converting a displayed magnitude into SI units.
    #[must_use]
    pub fn si_multiplier(&self) -> Scalar {
        match self {
            Self::Tera => 1.0e12,
            Self::Giga => 1.0e9,
            Self::Mega => 1.0e6,
            Self::Kilo => 1.0e3,
            Self::Base | Self::Meter | Self::Quality | Self::Coupling | Self::Turns => 1.0,
            Self::Milli => 1.0e-3,
            Self::Micro => 1.0e-6,
            Self::Nano => 1.0e-9,
            Self::Pico => 1.0e-12,
            Self::Femto => 1.0e-15,
            Self::Lambda { freq_hz, er } => wavelength(*freq_hz, *er),
        }
    }

    /// Multiplier converting an SI magnitude into this display scale.
    #[must_use]
    pub fn display_multiplier(&self) -> Scalar {
        1.0 / self.si_multiplier()
    }

    /// Scale prefix as displayed (`"p"`, `"μ"`, `"k"`, …).
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Tera => "T",
            Self::Giga => "G",
            Self::Mega => "M",
            Self::Kilo => "k",
            Self::Base | Self::Meter => "",
            Self::Milli => "m",
            Self::Micro => "μ",
            Self::Nano => "n",
            Self::Pico => "p",
            Self::Femto => "f",
            Self::Lambda { .. } => "λ",
            Self::Quality => "Q",
            Self::Coupling => "K",
            Self::Turns => "N",
        }
    }
}

/// Physical quantity a unit tag is attached to, for display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Capacitance.
    Farad,
    /// Inductance.
    Henry,
    /// Resistance.
    Ohm,
    /// Frequency.
    Hertz,
}

impl Quantity {
    fn symbol(self) -> &'static str {
        match self {
            Self::Farad => "F",
            Self::Henry => "H",
            Self::Ohm => "Ω",
            Self::Hertz => "Hz",
        }
    }
}

/// Display label for a scaled quantity, e.g. `Pico`/`Farad` → `"pF"`.
#[must_use]
pub fn unit_label(scale: &Scale, quantity: Quantity) -> String {
    format!("{}{}", scale.prefix(), quantity.symbol())
}

/// Resolves a unit tag to the multiplier converting displayed magnitudes to
/// SI units. `λ` needs the operating frequency and relative permittivity;
/// all other tags ignore them. Unknown tags resolve to 1 (see
/// [`Scale::parse`]).
#[must_use]
pub fn resolve(tag: &str, freq_hz: Scalar, er: Scalar) -> Scalar {
    Scale::parse(tag)
        .with_wavelength_context(freq_hz, er)
        .si_multiplier()
}
