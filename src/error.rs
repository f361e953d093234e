#![warn(missing_docs)]
//! plotspec specific error structures
use std::{error::Error, fmt::Display};

/// plotspec application specific Result type
pub type PsResult<T> = std::result::Result<T, PlotSpecError>;

/// Errors that can be returned by the plotspec pipeline.
///
/// None of them is recoverable at the point where it occurs. They are propagated up to
/// `main`, reported to the user and end the run with a non-zero exit status.
#[derive(Debug, PartialEq, Eq)]
pub enum PlotSpecError {
    /// unrecognized mode / unit / format strings, invalid ranges or a missing configuration
    Config(String),
    /// no curve data could be resolved for a given input identifier
    InputNotFound(String),
    /// requested output format is neither a vector nor a raster format
    UnsupportedFormat(String),
    /// a writer or exporter failed while producing the output file
    Export(String),
    /// errors of the command line interface
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for PlotSpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(m) => {
                write!(f, "Config:{m}")
            }
            Self::InputNotFound(m) => {
                write!(f, "InputNotFound:{m}")
            }
            Self::UnsupportedFormat(m) => {
                write!(f, "UnsupportedFormat:{m}")
            }
            Self::Export(m) => {
                write!(f, "Export:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "plotspec Error:Other:{m}"),
        }
    }
}
impl Error for PlotSpecError {}

impl std::convert::From<String> for PlotSpecError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
impl std::convert::From<std::io::Error> for PlotSpecError {
    fn from(err: std::io::Error) -> Self {
        Self::Export(format!("i/o error: {err}"))
    }
}
