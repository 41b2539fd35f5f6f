//! Shared error types used across submodules.

use thiserror::Error;

/// Top-level error type for the crate.
///
/// Non-finite numeric results (division by a zero impedance, an imaginary
/// matching-network discriminant) are deliberately *not* errors: they
/// propagate as NaN through the computation pipeline and are reported as
/// "not available" values by the consuming layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmithError {
    /// An element kind tag was not recognized.
    #[error("unknown element kind `{0}`")]
    UnknownElement(String),
    /// A unit tag is outside the set allowed for the element kind.
    #[error("unit `{tag}` is not valid for {kind}")]
    InvalidUnit {
        /// Element kind the unit was supplied for.
        kind: &'static str,
        /// Offending unit tag.
        tag: String,
    },
    /// The global configuration cannot be computed with (e.g. the sweep span
    /// exceeds the center frequency).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A persisted schematic failed structural validation during load.
    #[error("malformed schematic: {0}")]
    MalformedSchematic(String),
}
