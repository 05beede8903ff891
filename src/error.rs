use miette::Diagnostic;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Error raised when the parsed configuration cannot describe a physical simulation
pub enum ConfigurationError {
    #[error(transparent)]
    Parse(#[from] config::ConfigError),
    #[error("unrecognised material: {0}")]
    UnrecognisedMaterial(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Error raised when a tabulated mobility curve cannot be brought into memory
pub enum DataLoadError {
    #[error("cannot open mobility table {}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed while reading mobility table")]
    Read(#[from] std::io::Error),
    #[error("mobility table contains no usable rows")]
    Empty,
    #[error("tabulated fields must increase strictly: row {row} does not")]
    NonMonotone { row: usize },
}

#[derive(thiserror::Error, Debug, Diagnostic)]
/// Error raised when the excitation profile cannot yield a carrier distribution
pub enum SamplingError {
    #[error("beam width is not positive at depth {depth} m")]
    DegenerateBeamWidth { depth: f64 },
    #[error("no finite positive beam-width minimum on [{start} m, {end} m]")]
    EnvelopeSearchFailed { start: f64, end: f64 },
    #[error("sample count must be non-zero")]
    EmptyRequest,
}
