//! This is the documentation for the **plotspec** software package. **plotspec** synthesizes
//! absorption, emission and circular dichroism spectra for a set of quantum-chemistry output
//! files and exports them as publication style plots (svg, eps, pdf, png, jpg).
//!
//! The pipeline is
//! [`synthesis`] → [`plottable::ax_lims`] / [`plottable::ticks`] → [`plottable`] → [`export`] →
//! (optional) [`viewer`]. Parameters are resolved once by [`config`] and passed by reference.
use std::path::PathBuf;

use log::info;
use uom::si::thermodynamic_temperature::kelvin;

use crate::{
    console::Args,
    error::{PlotSpecError, PsResult},
};

pub mod config;
pub mod console;
pub mod error;
pub mod export;
pub mod parameters;
/// Chart assembly, axis ranges and ticks
pub mod plottable;
pub mod synthesis;
pub mod units;
pub mod utils;
pub mod viewer;

pub use parameters::SpectrumParameters;
pub use plottable::Chart;

/// Runs the whole pipeline for the given command line arguments.
///
/// Returns the path of the exported plot.
/// # Errors
/// This function returns an error if
///  - no input files are given
///  - the configuration cannot be found or is invalid
///  - an input file cannot be resolved
///  - the chart cannot be exported or shown
pub fn run(args: Args) -> PsResult<PathBuf> {
    if args.files.is_empty() {
        return Err(PlotSpecError::Console("no input files given".into()));
    }
    let config_path = config::find_config_file(args.config.as_deref(), &config::search_dirs())?;
    let params = config::load(&config_path, args.files, !args.no_interactive)?;
    console::print_parameters(&params, &config_path);
    info!(
        "kT at {} K: {:.6} eV",
        params.temperature.get::<kelvin>(),
        params.kt_ev()
    );
    let curves = synthesis::synthesize_all(&params)?;
    println!(
        "Generated {} data points per spectrum.",
        curves.first().map_or(0, synthesis::Curve::len)
    );
    println!("Creating visualization with {} spectra...", curves.len());
    let chart = plottable::assemble(curves, &params)?;
    let path = export::export(&chart, &params)?;
    println!("Plot exported to: {}", path.display());
    if params.interactive {
        println!("Showing the plot. Close the window to finish.");
        viewer::show(&chart)?;
    }
    Ok(path)
}
