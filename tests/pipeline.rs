use std::{fs, path::PathBuf};

use clap::Parser;
use plotspec::{
    config,
    console::Args,
    error::PlotSpecError,
    export::export,
    plottable::assemble,
    synthesis::synthesize_all,
    units::SpectrumMode,
};
use tempfile::TempDir;

fn touch(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, "dummy output").unwrap();
    path
}

#[test]
fn circular_dichroism_to_svg() {
    let dir = TempDir::new().unwrap();
    let first = touch(&dir, "r_isomer.out");
    touch(&dir, "s_isomer.log");
    let output = dir.path().join("spectrum_plot");
    let config_path = dir.path().join(config::CONFIG_FILE_NAME);
    fs::write(
        &config_path,
        format!(
            "mode: cd\nunit: nm\nx_start: 200\nx_end: 400\ninterval: 1.0\noutput_filename: {}\n",
            output.display()
        ),
    )
    .unwrap();
    // second input given without extension
    let params = config::load(
        &config_path,
        vec![first, dir.path().join("s_isomer")],
        false,
    )
    .unwrap();
    assert_eq!(params.mode, SpectrumMode::CircularDichroism);
    assert_eq!(params.legend_names, vec!["r_isomer", "s_isomer"]);

    let curves = synthesize_all(&params).unwrap();
    assert_eq!(curves.len(), 2);
    for curve in &curves {
        assert_eq!(curve.len(), 201);
        let (y_min, y_max) = curve.y_min_max().unwrap();
        assert!(y_min < 0.0);
        assert!(y_max > 0.0);
    }
    let chart = assemble(curves, &params).unwrap();
    assert!(chart.y_lims().min < 0.0);
    let path = export(&chart, &params).unwrap();
    assert_eq!(path, dir.path().join("spectrum_plot.svg"));
    let svg = fs::read_to_string(path).unwrap();
    assert!(svg.contains("r_isomer"));
    assert!(svg.contains("Wavelength (nm)"));
}

#[test]
fn run_from_command_line() {
    let dir = TempDir::new().unwrap();
    let input = touch(&dir, "benzene.out");
    let config_path = dir.path().join("custom.yaml");
    let output = dir.path().join("absorption");
    fs::write(
        &config_path,
        format!(
            "output_format: eps\nlegend_names: [Benzene]\noutput_filename: {}\n",
            output.display()
        ),
    )
    .unwrap();
    let args = Args::try_parse_from([
        "plotspec".into(),
        "--config".into(),
        config_path.display().to_string(),
        "--no-interactive".into(),
        input.display().to_string(),
    ])
    .unwrap();
    let path = plotspec::run(args).unwrap();
    assert_eq!(path, dir.path().join("absorption.eps"));
    let eps = fs::read_to_string(path).unwrap();
    assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0"));
    assert!(eps.contains("(Benzene)"));
}

#[test]
fn missing_input() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("custom.yaml");
    fs::write(&config_path, "mode: abs\n").unwrap();
    let args = Args {
        files: vec![dir.path().join("does_not_exist")],
        config: Some(config_path),
        no_interactive: true,
    };
    assert!(matches!(
        plotspec::run(args),
        Err(PlotSpecError::InputNotFound(_))
    ));
}

#[test]
fn missing_config() {
    let dir = TempDir::new().unwrap();
    let args = Args {
        files: vec![touch(&dir, "a.out")],
        config: Some(dir.path().join("nothing.yaml")),
        no_interactive: true,
    };
    assert!(matches!(plotspec::run(args), Err(PlotSpecError::Config(_))));
}
