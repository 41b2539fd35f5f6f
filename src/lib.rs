#![warn(clippy::all, missing_docs)]
#![doc = include_str!("../README.md")]

/// Physical constants and frequency helpers.
pub mod constants;
/// Unit tags and SI scale resolution.
pub mod units;
/// Shared scalar/complex primitives.
pub mod math;
/// Error types shared across the crate.
pub mod errors;
/// Schematic data model and JSON interchange.
pub mod schematic;
/// Per-element impedance models.
pub mod element;
/// Reflection coefficients and Smith-chart coordinate mapping.
pub mod chart;
/// Frequency grids for span sweeps.
pub mod sweep;
/// Network cascading, tolerance corners and span envelopes.
pub mod cascade;
/// Derived quantities (Γ, VSWR, return loss, R‖C equivalents).
pub mod analysis;
/// Closed-form matching-network synthesis.
pub mod matching;
/// Conjugate matching and stability from two-port S-parameters.
pub mod conjugate;

/// Common exports for downstream crates.
pub mod prelude;

pub use errors::SmithError;
