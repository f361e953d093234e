#![warn(missing_docs)]
//! Loading of the plotting parameters from a YAML configuration file.
//!
//! The configuration is declarative data. Every key is optional and falls back to the defaults of
//! [`SpectrumParameters`]. Unknown keys are rejected so that typos do not go unnoticed.
use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;
use uom::si::{
    energy::electronvolt,
    f64::{Energy, ThermodynamicTemperature},
    thermodynamic_temperature::kelvin,
};

use crate::{
    error::{PlotSpecError, PsResult},
    parameters::{OutputFormat, SpectrumParameters},
    units::{AxisUnit, Fwhm, SpectrumMode},
};

/// Name of the configuration file searched in the working and in the home directory.
pub const CONFIG_FILE_NAME: &str = "spectrum_config.yaml";

/// Raw content of a configuration file.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// spectrum mode (`abs`, `emi`, `cd`, `cdl`)
    pub mode: Option<String>,
    /// axis unit (`nm`, `eV`, `cm-1`)
    pub unit: Option<String>,
    /// start of the spectral range
    pub x_start: Option<f64>,
    /// end of the spectral range
    pub x_end: Option<f64>,
    /// grid interval
    pub interval: Option<f64>,
    /// full width at half maximum in eV
    pub fwhm_ev: Option<f64>,
    /// output format
    pub output_format: Option<String>,
    /// output file name without extension
    pub output_filename: Option<String>,
    /// legend entries, one per input file
    pub legend_names: Option<Vec<String>>,
    /// temperature in K
    pub temperature: Option<f64>,
}

impl ConfigFile {
    /// Parses the YAML content of a configuration file.
    /// # Errors
    /// This function returns a [`PlotSpecError::Config`] if the content is no valid configuration.
    pub fn from_yaml(content: &str) -> PsResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| PlotSpecError::Config(format!("parsing of configuration failed: {e}")))
    }
    /// Resolves the configuration into a full parameter record for the given input files.
    ///
    /// The grid interval defaults to the default interval of the chosen unit. Legend names are
    /// resolved against the input files (see [`SpectrumParameters::resolve_legend_names`]).
    /// # Errors
    /// This function returns an error if
    ///  - mode, unit or output format are not recognized
    ///  - fwhm or temperature are not finite and positive
    ///  - the resulting parameters are inconsistent (see [`SpectrumParameters::validate`])
    pub fn into_parameters(
        self,
        input_files: Vec<PathBuf>,
        interactive: bool,
    ) -> PsResult<SpectrumParameters> {
        let defaults = SpectrumParameters::default();
        let mode = self
            .mode
            .as_deref()
            .map_or(Ok(defaults.mode), SpectrumMode::parse)?;
        let unit = self
            .unit
            .as_deref()
            .map_or(Ok(defaults.unit), AxisUnit::parse)?;
        let fwhm = match self.fwhm_ev {
            Some(fwhm_ev) => Fwhm::from_energy(Energy::new::<electronvolt>(fwhm_ev))?,
            None => defaults.fwhm,
        };
        let temperature = match self.temperature {
            Some(t) if t.is_normal() && t.is_sign_positive() => {
                ThermodynamicTemperature::new::<kelvin>(t)
            }
            Some(t) => {
                return Err(PlotSpecError::Config(format!(
                    "temperature must be greater than zero and finite, got {t}"
                )))
            }
            None => defaults.temperature,
        };
        let output_format = self
            .output_format
            .as_deref()
            .map_or(Ok(defaults.output_format), OutputFormat::parse)?;
        let mut params = SpectrumParameters {
            mode,
            unit,
            x_start: self.x_start.unwrap_or(defaults.x_start),
            x_end: self.x_end.unwrap_or(defaults.x_end),
            interval: self.interval.unwrap_or_else(|| unit.default_interval()),
            fwhm,
            temperature,
            output_format,
            output_filename: self.output_filename.unwrap_or(defaults.output_filename),
            input_files,
            legend_names: self.legend_names.unwrap_or_default(),
            interactive,
        };
        params.validate()?;
        params.resolve_legend_names();
        Ok(params)
    }
}

/// Open configuration source.
///
/// The session is acquired before the configuration is read and released when it goes out of
/// scope, on success as well as on every error path.
#[derive(Debug)]
pub struct ConfigSession {
    path: PathBuf,
    content: String,
}

impl ConfigSession {
    /// Opens the configuration file at `path`.
    /// # Errors
    /// This function returns a [`PlotSpecError::Config`] if the file cannot be read.
    pub fn acquire(path: &Path) -> PsResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PlotSpecError::Config(format!(
                "cannot read configuration file {}: {e}",
                path.display()
            ))
        })?;
        debug!("configuration session for {} acquired", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }
    /// Returns the path of the configuration file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Parses the configuration file.
    /// # Errors
    /// This function returns a [`PlotSpecError::Config`] if the content is no valid configuration.
    pub fn read(&self) -> PsResult<ConfigFile> {
        ConfigFile::from_yaml(&self.content).map_err(|e| match e {
            PlotSpecError::Config(m) => {
                PlotSpecError::Config(format!("{}: {m}", self.path.display()))
            }
            other => other,
        })
    }
}

impl Drop for ConfigSession {
    fn drop(&mut self) {
        debug!("configuration session for {} released", self.path.display());
    }
}

/// Directories searched for [`CONFIG_FILE_NAME`]: the working directory, then the home directory.
#[must_use]
pub fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home));
    }
    dirs
}

/// Locates the configuration file.
///
/// An explicitly given path is used as is. Otherwise the first of the `dirs` containing
/// [`CONFIG_FILE_NAME`] wins.
/// # Errors
/// This function returns a [`PlotSpecError::Config`] if no configuration file can be found.
pub fn find_config_file(explicit: Option<&Path>, dirs: &[PathBuf]) -> PsResult<PathBuf> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(PlotSpecError::Config(format!(
                "configuration file {} not found",
                path.display()
            )))
        };
    }
    dirs.iter()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            PlotSpecError::Config(format!(
                "configuration file {CONFIG_FILE_NAME} not found in the current or the home directory"
            ))
        })
}

/// Reads the configuration file at `path` and resolves it into the parameters of this run.
/// # Errors
/// This function returns an error if the file cannot be read or contains invalid settings.
pub fn load(
    path: &Path,
    input_files: Vec<PathBuf>,
    interactive: bool,
) -> PsResult<SpectrumParameters> {
    let session = ConfigSession::acquire(path)?;
    let params = session.read()?.into_parameters(input_files, interactive)?;
    info!("configuration loaded from {}", session.path().display());
    Ok(params)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::test_helper::test_helper::check_warnings;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }
    #[test]
    fn empty_config() {
        let params = ConfigFile::from_yaml("")
            .unwrap()
            .into_parameters(vec!["a.out".into()], true)
            .unwrap();
        assert_eq!(params.mode, SpectrumMode::Absorption);
        assert_eq!(params.unit, AxisUnit::Nanometer);
        assert_relative_eq!(params.x_start, 200.);
        assert_relative_eq!(params.x_end, 1000.);
        assert_relative_eq!(params.interval, 1.);
        assert_eq!(params.output_format, OutputFormat::Svg);
        assert_eq!(params.output_filename, "spectrum_plot");
        assert_eq!(params.legend_names, vec!["a".to_string()]);
        assert!(params.interactive);
    }
    #[test]
    fn full_config() {
        let yaml = "mode: cd
unit: eV
x_start: 2.5
x_end: 5.0
fwhm_ev: 0.3
output_format: png
output_filename: cd_spectrum
legend_names: [R, S]
temperature: 77
";
        let params = ConfigFile::from_yaml(yaml)
            .unwrap()
            .into_parameters(vec!["r.out".into(), "s.out".into()], false)
            .unwrap();
        assert_eq!(params.mode, SpectrumMode::CircularDichroism);
        assert_eq!(params.unit, AxisUnit::ElectronVolt);
        assert_relative_eq!(params.interval, 0.01);
        assert_relative_eq!(params.fwhm.energy().get::<electronvolt>(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(params.temperature.get::<kelvin>(), 77.);
        assert_eq!(params.output_format, OutputFormat::Png);
        assert_eq!(params.output_filename, "cd_spectrum");
        assert_eq!(params.legend_names, vec!["R".to_string(), "S".to_string()]);
        assert!(!params.interactive);
    }
    #[test]
    fn interval_given() {
        let params = ConfigFile::from_yaml("unit: cm-1\nx_start: 20000\nx_end: 40000\ninterval: 50")
            .unwrap()
            .into_parameters(vec![], true)
            .unwrap();
        assert_relative_eq!(params.interval, 50.);
    }
    #[test]
    fn legend_mismatch() {
        testing_logger::setup();
        let params = ConfigFile::from_yaml("legend_names: [one, two, three]")
            .unwrap()
            .into_parameters(vec!["dir/first.log".into()], true)
            .unwrap();
        assert_eq!(params.legend_names, vec!["first".to_string()]);
        check_warnings(vec![
            "3 legend names given for 1 input files. Using file names instead.",
        ]);
    }
    #[test]
    fn invalid_values() {
        assert_matches!(ConfigFile::from_yaml("colour: red"), Err(PlotSpecError::Config(_)));
        assert_matches!(ConfigFile::from_yaml("x_start: abc"), Err(PlotSpecError::Config(_)));
        let invalid = |yaml: &str| {
            ConfigFile::from_yaml(yaml)
                .unwrap()
                .into_parameters(vec![], true)
        };
        assert_matches!(invalid("mode: ir"), Err(PlotSpecError::Config(_)));
        assert_matches!(invalid("unit: Hz"), Err(PlotSpecError::Config(_)));
        assert_matches!(
            invalid("output_format: bmp"),
            Err(PlotSpecError::UnsupportedFormat(_))
        );
        assert_matches!(invalid("fwhm_ev: 0"), Err(PlotSpecError::Config(_)));
        assert_matches!(invalid("temperature: -4"), Err(PlotSpecError::Config(_)));
        assert_matches!(invalid("x_start: 500\nx_end: 400"), Err(PlotSpecError::Config(_)));
        assert_matches!(invalid("interval: 0"), Err(PlotSpecError::Config(_)));
    }
    #[test]
    fn find_explicit() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "mode: abs");
        assert_eq!(find_config_file(Some(&path), &[]).unwrap(), path);
        assert_matches!(
            find_config_file(Some(&dir.path().join("other.yaml")), &[]),
            Err(PlotSpecError::Config(_))
        );
    }
    #[test]
    fn find_in_dirs() {
        let empty = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "mode: abs");
        let dirs = vec![empty.path().to_path_buf(), dir.path().to_path_buf()];
        assert_eq!(find_config_file(None, &dirs).unwrap(), path);
        assert_matches!(
            find_config_file(None, &[empty.path().to_path_buf()]),
            Err(PlotSpecError::Config(_))
        );
    }
    #[test]
    fn load_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "mode: emi\nx_start: 300\nx_end: 700\n");
        let params = load(&path, vec!["x.out".into()], true).unwrap();
        assert_eq!(params.mode, SpectrumMode::Emission);
        assert_relative_eq!(params.x_end, 700.);
        let path = write_config(&dir, "mode: [abs]");
        assert_matches!(load(&path, vec![], true), Err(PlotSpecError::Config(_)));
        assert_matches!(
            load(&dir.path().join("missing.yaml"), vec![], true),
            Err(PlotSpecError::Config(_))
        );
    }
}
