#![warn(missing_docs)]
//! Spectrum modes, axis units and the conversion constants between them.
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString};
use uom::si::{energy::electronvolt, f64::Energy};

use crate::error::{PlotSpecError, PsResult};

/// Conversion factor from electron volts to wavenumbers (cm⁻¹ per eV)
pub const EV_TO_CM_MINUS_1: f64 = 8065.544_77;
/// Boltzmann constant in eV/K
pub const KB_EV_PER_K: f64 = 1.380_650_4e-23 / 1.602_176_487e-19;
/// Room temperature in K
pub const ROOM_TEMP_K: f64 = 298.15;

/// Kind of spectrum to be synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
pub enum SpectrumMode {
    /// one-photon absorption
    #[strum(to_string = "abs")]
    Absorption,
    /// emission (fluorescence / phosphorescence)
    #[strum(to_string = "emi")]
    Emission,
    /// electronic circular dichroism (velocity gauge)
    #[strum(to_string = "cd")]
    CircularDichroism,
    /// electronic circular dichroism (length gauge)
    #[strum(to_string = "cdl")]
    CircularDichroismLength,
}

impl SpectrumMode {
    /// Parses a mode string (`abs`, `emi`, `cd`, `cdl`).
    /// # Errors
    /// This function returns a [`PlotSpecError::Config`] if the string is not a known mode.
    pub fn parse(mode: &str) -> PsResult<Self> {
        Self::from_str(mode).map_err(|_| {
            PlotSpecError::Config(format!(
                "unknown spectrum mode \"{mode}\". Valid modes: abs, emi, cd, cdl"
            ))
        })
    }
    /// Returns `true` for both circular dichroism variants. Such spectra carry negative bands.
    #[must_use]
    pub const fn is_circular_dichroism(self) -> bool {
        matches!(self, Self::CircularDichroism | Self::CircularDichroismLength)
    }
    /// Label of the intensity (y) axis.
    #[must_use]
    pub const fn y_label(self) -> &'static str {
        match self {
            Self::Absorption => "Molar Absorptivity (L/(mol·cm))",
            Self::Emission => "Emission Intensity (arb. units)",
            Self::CircularDichroism | Self::CircularDichroismLength => "Δε (L/(mol·cm))",
        }
    }
    /// Chart title belonging to this mode.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Absorption => "Absorption Spectra",
            Self::Emission => "Emission Spectra",
            Self::CircularDichroism | Self::CircularDichroismLength => {
                "Circular Dichroism Spectra"
            }
        }
    }
}

/// Unit of the spectral (x) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
pub enum AxisUnit {
    /// wavelength in nm
    #[strum(to_string = "nm")]
    Nanometer,
    /// photon energy in eV
    #[strum(to_string = "eV")]
    ElectronVolt,
    /// wavenumber in cm⁻¹
    #[strum(to_string = "cm-1", serialize = "cm^-1", serialize = "cm⁻¹")]
    Wavenumber,
}

impl AxisUnit {
    /// Parses a unit string (`nm`, `eV`, `cm-1`).
    /// # Errors
    /// This function returns a [`PlotSpecError::Config`] if the string is not a known unit.
    pub fn parse(unit: &str) -> PsResult<Self> {
        Self::from_str(unit).map_err(|_| {
            PlotSpecError::Config(format!(
                "unknown axis unit \"{unit}\". Valid units: nm, eV, cm-1"
            ))
        })
    }
    /// Grid interval used if none is given explicitly.
    #[must_use]
    pub const fn default_interval(self) -> f64 {
        match self {
            Self::Nanometer => 1.0,
            Self::ElectronVolt => 0.01,
            Self::Wavenumber => 100.0,
        }
    }
    /// Label of the spectral (x) axis.
    #[must_use]
    pub const fn x_label(self) -> &'static str {
        match self {
            Self::Nanometer => "Wavelength (nm)",
            Self::ElectronVolt => "Energy (eV)",
            Self::Wavenumber => "Wavenumber (cm⁻¹)",
        }
    }
    /// Rescales a peak shift given on the nanometer scale into this unit.
    #[must_use]
    pub fn rescale_shift(self, shift_nm_scale: f64) -> f64 {
        match self {
            Self::Nanometer => shift_nm_scale,
            Self::ElectronVolt => shift_nm_scale / 1000.0,
            Self::Wavenumber => shift_nm_scale * 100.0,
        }
    }
}

/// Full width at half maximum of the broadening function.
///
/// The width is stored as a wavenumber (cm⁻¹) and can be read back as an energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fwhm {
    wavenumber: f64,
}
impl Fwhm {
    /// Creates a new [`Fwhm`] from an energy.
    /// # Errors
    /// This function returns a [`PlotSpecError::Config`] if the energy is not finite and positive.
    pub fn from_energy(energy: Energy) -> PsResult<Self> {
        Self::from_wavenumber(energy.get::<electronvolt>() * EV_TO_CM_MINUS_1)
    }
    /// Creates a new [`Fwhm`] from a wavenumber in cm⁻¹.
    /// # Errors
    /// This function returns a [`PlotSpecError::Config`] if the wavenumber is not finite and positive.
    pub fn from_wavenumber(wavenumber: f64) -> PsResult<Self> {
        if !wavenumber.is_normal() || wavenumber.is_sign_negative() {
            return Err(PlotSpecError::Config(
                "fwhm must be greater than zero and finite".into(),
            ));
        }
        Ok(Self { wavenumber })
    }
    /// Returns the width as wavenumber in cm⁻¹.
    #[must_use]
    pub const fn wavenumber(&self) -> f64 {
        self.wavenumber
    }
    /// Returns the width as an energy.
    #[must_use]
    pub fn energy(&self) -> Energy {
        Energy::new::<electronvolt>(self.wavenumber / EV_TO_CM_MINUS_1)
    }
}
impl Default for Fwhm {
    fn default() -> Self {
        Self {
            wavenumber: 0.5 * EV_TO_CM_MINUS_1,
        }
    }
}
