use crate::error::ConfigurationError;
use crate::injection::SpeciesSelection;
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub(crate) struct Configuration {
    pub(crate) device: DeviceConfiguration,
    pub(crate) injection: InjectionConfiguration,
    pub(crate) simulation: SimulationConfiguration,
    pub(crate) scan: Option<ScanConfiguration>,
    pub(crate) mobility: MobilityConfiguration,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeviceConfiguration {
    pub(crate) doping_concentration: f64,
    pub(crate) width: f64,
    pub(crate) length: f64,
    pub(crate) built_in_voltage: f64,
    pub(crate) bias_voltage: f64,
    pub(crate) resistance: f64,
    pub(crate) material: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InjectionConfiguration {
    pub(crate) focus: f64,
    pub(crate) wavelength: f64,
    pub(crate) numerical_aperture: f64,
    pub(crate) refractive_index: f64,
    pub(crate) carrier_count: usize,
    pub(crate) species: SpeciesSelection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulationConfiguration {
    pub(crate) steps: usize,
    pub(crate) dt: f64,
    /// Probe time for the weighted pulse charge, in seconds
    pub(crate) probe_time: f64,
    pub(crate) mode: SimulationMode,
    /// Seed for the random source. Absent means seeding from entropy, so only
    /// runs with an explicit seed are reproducible.
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScanConfiguration {
    pub(crate) start: f64,
    pub(crate) stop: f64,
    pub(crate) points: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MobilityConfiguration {
    pub(crate) electron_table: PathBuf,
    pub(crate) hole_table: PathBuf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, clap::ArgEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SimulationMode {
    Visualization,
    ZScan,
}

impl Configuration {
    pub(crate) fn build(path: &Path) -> Result<Self, ConfigurationError> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()?;
        let configuration: Self = s.try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.simulation.dt <= 0. {
            return Err(ConfigurationError::Invalid(
                "the time step must be positive".into(),
            ));
        }
        if self.simulation.steps == 0 {
            return Err(ConfigurationError::Invalid(
                "the step count must be non-zero".into(),
            ));
        }
        if self.injection.carrier_count == 0 {
            return Err(ConfigurationError::Invalid(
                "the carrier count must be non-zero".into(),
            ));
        }
        if self.simulation.mode == SimulationMode::ZScan {
            match &self.scan {
                None => {
                    return Err(ConfigurationError::Invalid(
                        "z_scan mode requires a [scan] section".into(),
                    ))
                }
                Some(scan) if scan.points == 0 => {
                    return Err(ConfigurationError::Invalid(
                        "the sweep must contain at least one point".into(),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Configuration;
    use crate::error::ConfigurationError;
    use std::io::Write;

    fn reference_toml() -> String {
        r#"
            [device]
            doping_concentration = 1.7e20
            width = 50e-6
            length = 50e-6
            built_in_voltage = 3.0
            bias_voltage = 450.0
            resistance = 50.0
            material = "SiC"

            [injection]
            focus = 25e-6
            wavelength = 400e-9
            numerical_aperture = 0.15
            refractive_index = 2.55
            carrier_count = 5000
            species = "both"

            [simulation]
            steps = 2000
            dt = 1e-12
            probe_time = 0.5e-9
            mode = "z_scan"
            seed = 12345

            [scan]
            start = 2e-6
            stop = 48e-6
            points = 50

            [mobility]
            electron_table = "data/electron_mobility.csv"
            hole_table = "data/hole_mobility.csv"
        "#
        .to_string()
    }

    fn write_config(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "tpa-tct-config-{}-{:x}.toml",
            std::process::id(),
            contents.len()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn a_complete_configuration_deserialises() {
        let path = write_config(&reference_toml());
        let configuration = Configuration::build(&path).unwrap();
        assert_eq!(configuration.injection.carrier_count, 5000);
        assert_eq!(configuration.scan.unwrap().points, 50);
        assert_eq!(configuration.simulation.seed, Some(12345));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn a_missing_group_is_a_configuration_error() {
        let truncated = reference_toml().replace("[mobility]", "[something_else]");
        let path = write_config(&truncated);
        let err = Configuration::build(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse(_)));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn z_scan_mode_without_a_sweep_is_rejected() {
        let no_scan = reference_toml().replace("[scan]", "[scan_disabled]");
        let path = write_config(&no_scan);
        let err = Configuration::build(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::Invalid(_)));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn a_degenerate_time_step_is_rejected() {
        let bad_dt = reference_toml().replace("dt = 1e-12", "dt = 0.0");
        let path = write_config(&bad_dt);
        let err = Configuration::build(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::Invalid(_)));
        std::fs::remove_file(path).ok();
    }
}
