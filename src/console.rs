//! Handling the plotspec CLI
//!
//! This module handles the command line parsing as well as the console output of a run (intro,
//! parameter summary, usage text).
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use uom::si::energy::electronvolt;

use crate::{
    error::{PlotSpecError, PsResult},
    parameters::SpectrumParameters,
};

/// Command line arguments of the plotspec application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// quantum-chemistry output files, one spectrum each. `.out` or `.log` is appended if the file
    /// does not exist as given
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// configuration file. if not defined, `spectrum_config.yaml` is searched in the current and
    /// in the home directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// do not show the plot in a window after exporting it
    #[arg(long)]
    pub no_interactive: bool,
}

/// Parses the command line.
///
/// `--help` and `--version` print their text and return `Ok(None)`.
/// # Errors
/// This function returns a [`PlotSpecError::Console`] holding clap's message (without its usage
/// hint) if the arguments are invalid.
pub fn parse_args<I, T>(args: I) -> PsResult<Option<Args>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(args) {
        Ok(args) => Ok(Some(args)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()
                .map_err(|err| PlotSpecError::Console(err.to_string()))?;
            Ok(None)
        }
        Err(e) => Err(PlotSpecError::Console(clap_message(&e.to_string()))),
    }
}

fn clap_message(rendered: &str) -> String {
    rendered
        .lines()
        .take_while(|line| !line.starts_with("Usage:"))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim_start_matches("error: ")
        .to_owned()
}

/// Creates the intro banner.
#[must_use]
fn create_intro() -> String {
    let title = "plotspec - spectrum synthesis and plotting";
    let rule = "=".repeat(title.len() + 4);
    format!("{rule}\n  {title}\n{rule}\n")
}

/// Show the intro banner and the version information.
pub fn show_intro() {
    println!("{}version {}\n", create_intro(), env!("CARGO_PKG_VERSION"));
}

/// Returns the usage text of the command line interface.
#[must_use]
pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Prints the usage text to stderr.
pub fn print_usage() {
    eprintln!("{}", usage());
}

/// Creates the summary of the resolved parameters, one line per entry.
#[must_use]
pub fn parameter_summary(params: &SpectrumParameters, config_path: &Path) -> Vec<String> {
    vec![
        format!("Using configuration: {}", config_path.display()),
        format!("Mode: {}, Unit: {}", params.mode, params.unit),
        format!(
            "Range: {} - {} {}",
            params.x_start, params.x_end, params.unit
        ),
        format!(
            "FWHM: {:.4} eV",
            params.fwhm.energy().get::<electronvolt>()
        ),
        format!("Processing {} files...", params.input_files.len()),
    ]
}

/// Prints the summary of the resolved parameters.
pub fn print_parameters(params: &SpectrumParameters, config_path: &Path) {
    for line in parameter_summary(params, config_path) {
        println!("{line}");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::units::{AxisUnit, SpectrumMode};

    #[test]
    fn parse_args() {
        let args = Args::try_parse_from(["plotspec", "a.out", "b"]).unwrap();
        assert_eq!(args.files, vec![PathBuf::from("a.out"), PathBuf::from("b")]);
        assert_eq!(args.config, None);
        assert!(!args.no_interactive);
        let args =
            Args::try_parse_from(["plotspec", "-c", "my.yaml", "--no-interactive", "a"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("my.yaml")));
        assert!(args.no_interactive);
    }
    #[test]
    fn parse_args_without_files() {
        assert!(Args::try_parse_from(["plotspec"]).is_err());
        assert!(Args::try_parse_from(["plotspec", "--config", "x.yaml"]).is_err());
    }
    #[test]
    fn parse_args_errors() {
        let args = super::parse_args(["plotspec", "-c", "my.yaml", "a.out"]).unwrap().unwrap();
        assert_eq!(args.files, vec![PathBuf::from("a.out")]);
        let Err(PlotSpecError::Console(msg)) = super::parse_args(["plotspec"]) else {
            panic!("missing files must be a console error");
        };
        assert!(msg.starts_with("the following required arguments were not provided"));
        assert!(msg.contains("<FILES>"));
        let Err(PlotSpecError::Console(msg)) = super::parse_args(["plotspec", "--bogus", "a.out"]) else {
            panic!("unknown flag must be a console error");
        };
        assert!(msg.contains("--bogus"));
        assert!(!msg.starts_with("error:"));
        assert!(!msg.contains("Usage:"));
    }
    #[test]
    fn parse_args_help_and_version() {
        assert!(super::parse_args(["plotspec", "--help"]).unwrap().is_none());
        assert!(super::parse_args(["plotspec", "--version"]).unwrap().is_none());
    }
    #[test]
    fn usage_text() {
        let usage = usage();
        assert!(usage.contains("--config"));
        assert!(usage.contains("--no-interactive"));
        assert!(usage.contains("<FILES>"));
    }
    #[test]
    fn intro_test() {
        let intro = create_intro();
        assert!(intro.contains("plotspec"));
        assert_eq!(intro.lines().count(), 3);
    }
    #[test]
    fn summary() {
        let params = SpectrumParameters {
            mode: SpectrumMode::CircularDichroism,
            unit: AxisUnit::Nanometer,
            x_start: 180.,
            x_end: 400.,
            input_files: vec!["a.out".into(), "b.out".into()],
            ..Default::default()
        };
        let lines = parameter_summary(&params, Path::new("spectrum_config.yaml"));
        assert_eq!(
            lines,
            vec![
                "Using configuration: spectrum_config.yaml",
                "Mode: cd, Unit: nm",
                "Range: 180 - 400 nm",
                "FWHM: 0.5000 eV",
                "Processing 2 files...",
            ]
        );
    }
}
