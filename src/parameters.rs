//! Defines the `AnalysisParameters` struct, which represents the contents of `analysis.toml`.
//!
//! The screening thresholds were chosen empirically for each year of data in past analyses, so
//! none of them has a default: they must always be supplied by the user.
use crate::input::{input_err_msg, read_toml};
use crate::record::PrimeMover;
use crate::units::{Dimensionless, Energy, HeatRate};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const ANALYSIS_PARAMETERS_FILE_NAME: &str = "analysis.toml";

/// The prime movers which burn fuel, for which heat rates are meaningful
const DEFAULT_FUEL_PRIME_MOVERS: [&str; 7] = ["ST", "GT", "IC", "CA", "CT", "CS", "CC"];

fn default_fuel_prime_movers() -> Vec<PrimeMover> {
    DEFAULT_FUEL_PRIME_MOVERS.map(PrimeMover::new).to_vec()
}

/// Represents the contents of the entire analysis parameters file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct AnalysisParameters {
    /// The year the data refer to (used to get the number of hours in February)
    pub year: u32,
    /// Records with a capacity factor below this value are tagged as having a negative capacity
    /// factor
    pub negative_capacity_factor_threshold: Dimensionless,
    /// Months with a capacity factor below this value are listed for review as extreme cases.
    ///
    /// This is a stricter, reporting-only screen and does not affect which plants are excluded.
    pub plant_screening_capacity_factor_threshold: Dimensionless,
    /// Plants with at least this proportion of negative months are excluded from the heat rate
    /// table
    pub consistently_negative_fraction: Dimensionless,
    /// Months with net generation below minus this value are listed for review as noticeable
    pub noticeable_net_generation_threshold: Energy,
    /// The best heat rates observed historically. Lower heat rates are tagged as implausible.
    #[serde(default)]
    pub implausible_heat_rate: Option<ImplausibleHeatRate>,
    /// Prime movers which burn fuel
    #[serde(default = "default_fuel_prime_movers")]
    pub fuel_prime_movers: Vec<PrimeMover>,
}

/// Heat rates below which a record is considered to contain a reporting error
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub struct ImplausibleHeatRate {
    /// Threshold for coal-fired generation
    pub coal: HeatRate,
    /// Threshold for all other fuels
    pub other: HeatRate,
}

/// Check that the `year` parameter is valid
fn check_year(year: u32) -> Result<()> {
    ensure!(
        (1900..=2100).contains(&year),
        "year must be between 1900 and 2100"
    );

    Ok(())
}

/// Check that a capacity factor threshold is valid
fn check_capacity_factor_threshold(value: Dimensionless, name: &str) -> Result<()> {
    ensure!(
        value.is_finite() && value <= Dimensionless(0.0),
        "{name} must be a finite number less than or equal to zero"
    );

    Ok(())
}

/// Check that the `consistently_negative_fraction` parameter is valid
fn check_consistently_negative_fraction(value: Dimensionless) -> Result<()> {
    ensure!(
        value > Dimensionless(0.0) && value <= Dimensionless(1.0),
        "consistently_negative_fraction must be greater than zero and less than or equal to one"
    );

    Ok(())
}

/// Check that the `noticeable_net_generation_threshold` parameter is valid
fn check_noticeable_net_generation_threshold(value: Energy) -> Result<()> {
    ensure!(
        value.is_finite() && value >= Energy(0.0),
        "noticeable_net_generation_threshold must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the `implausible_heat_rate` parameter is valid
fn check_implausible_heat_rate(value: &ImplausibleHeatRate) -> Result<()> {
    for (name, heat_rate) in [("coal", value.coal), ("other", value.other)] {
        ensure!(
            heat_rate.is_finite() && heat_rate > HeatRate(0.0),
            "implausible_heat_rate.{name} must be a finite number greater than zero"
        );
    }

    Ok(())
}

impl AnalysisParameters {
    /// Read the analysis parameters file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `input_dir` - Folder containing input files
    ///
    /// # Returns
    ///
    /// The file contents as an [`AnalysisParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(input_dir: P) -> Result<AnalysisParameters> {
        let file_path = input_dir.as_ref().join(ANALYSIS_PARAMETERS_FILE_NAME);
        let params: AnalysisParameters = read_toml(&file_path)?;

        params
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_year(self.year)?;
        check_capacity_factor_threshold(
            self.negative_capacity_factor_threshold,
            "negative_capacity_factor_threshold",
        )?;
        check_capacity_factor_threshold(
            self.plant_screening_capacity_factor_threshold,
            "plant_screening_capacity_factor_threshold",
        )?;
        check_consistently_negative_fraction(self.consistently_negative_fraction)?;
        check_noticeable_net_generation_threshold(self.noticeable_net_generation_threshold)?;
        if let Some(implausible_heat_rate) = &self.implausible_heat_rate {
            check_implausible_heat_rate(implausible_heat_rate)?;
        }
        ensure!(
            !self.fuel_prime_movers.is_empty(),
            "fuel_prime_movers cannot be empty"
        );

        Ok(())
    }

    /// Whether `prime_mover` burns fuel
    pub fn is_fuel_prime_mover(&self, prime_mover: &PrimeMover) -> bool {
        self.fuel_prime_movers
            .iter()
            .any(|pm| pm.as_str().eq_ignore_ascii_case(prime_mover.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, parameters};
    use rstest::rstest;
    use std::fmt::Display;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    /// Helper function to assert validation result based on expected validity
    fn assert_validation_result<T, U: Display>(
        result: Result<T>,
        expected_valid: bool,
        value: U,
        expected_error_fragment: &str,
    ) {
        if expected_valid {
            assert!(
                result.is_ok(),
                "Expected value {} to be valid, but got error: {:?}",
                value,
                result.err()
            );
        } else {
            assert!(
                result.is_err(),
                "Expected value {value} to be invalid, but it was accepted",
            );
            let error_message = result.err().unwrap().to_string();
            assert!(
                error_message.contains(expected_error_fragment),
                "Error message should mention the validation constraint, got: {error_message}",
            );
        }
    }

    const REQUIRED_PARAMETERS: &str = "year = 2015
negative_capacity_factor_threshold = 0.0
plant_screening_capacity_factor_threshold = -0.05
consistently_negative_fraction = 0.8
noticeable_net_generation_threshold = 1000.0
";

    fn write_parameters_file(dir_path: &Path, contents: &str) {
        let mut file = File::create(dir_path.join(ANALYSIS_PARAMETERS_FILE_NAME)).unwrap();
        write!(file, "{contents}").unwrap();
    }

    #[test]
    fn test_from_path_required_only() {
        let dir = tempdir().unwrap();
        write_parameters_file(dir.path(), REQUIRED_PARAMETERS);

        let params = AnalysisParameters::from_path(dir.path()).unwrap();
        assert_eq!(params.year, 2015);
        assert_eq!(params.implausible_heat_rate, None);
        assert_eq!(params.fuel_prime_movers, default_fuel_prime_movers());
    }

    #[rstest]
    fn test_from_path_all(parameters: AnalysisParameters) {
        let dir = tempdir().unwrap();
        let contents = format!(
            "{REQUIRED_PARAMETERS}fuel_prime_movers = [\"ST\", \"GT\", \"IC\", \"CA\", \"CT\", \"CS\", \"CC\"]

[implausible_heat_rate]
coal = 8.607
other = 6.711
"
        );
        write_parameters_file(dir.path(), &contents);

        assert_eq!(AnalysisParameters::from_path(dir.path()).unwrap(), parameters);
    }

    #[test]
    fn test_from_path_missing_threshold() {
        let dir = tempdir().unwrap();
        write_parameters_file(
            dir.path(),
            "year = 2015\nnegative_capacity_factor_threshold = 0.0\n",
        );
        assert!(AnalysisParameters::from_path(dir.path()).is_err());
    }

    #[test]
    fn test_from_path_invalid_value() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(ANALYSIS_PARAMETERS_FILE_NAME);
        write_parameters_file(
            dir.path(),
            &REQUIRED_PARAMETERS.replace("= 0.8", "= 1.5"),
        );
        assert_error!(
            AnalysisParameters::from_path(dir.path()),
            input_err_msg(&file_path)
        );
    }

    #[rstest]
    #[case(2015, true)]
    #[case(1900, true)]
    #[case(2100, true)]
    #[case(1899, false)]
    #[case(2101, false)]
    fn test_check_year(#[case] value: u32, #[case] expected_valid: bool) {
        assert_validation_result(
            check_year(value),
            expected_valid,
            value,
            "year must be between 1900 and 2100",
        );
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(-0.05, true)]
    #[case(-1.0, true)]
    #[case(1e-10, false)] // Invalid: positive
    #[case(f64::NEG_INFINITY, false)]
    #[case(f64::NAN, false)]
    fn test_check_capacity_factor_threshold(#[case] value: f64, #[case] expected_valid: bool) {
        assert_validation_result(
            check_capacity_factor_threshold(Dimensionless(value), "threshold"),
            expected_valid,
            value,
            "threshold must be a finite number less than or equal to zero",
        );
    }

    #[rstest]
    #[case(0.8, true)]
    #[case(1.0, true)]
    #[case(1e-10, true)]
    #[case(0.0, false)] // Invalid: every plant would be excluded
    #[case(1.01, false)]
    #[case(f64::NAN, false)]
    fn test_check_consistently_negative_fraction(
        #[case] value: f64,
        #[case] expected_valid: bool,
    ) {
        assert_validation_result(
            check_consistently_negative_fraction(Dimensionless(value)),
            expected_valid,
            value,
            "consistently_negative_fraction must be greater than zero",
        );
    }

    #[rstest]
    #[case(1000.0, true)]
    #[case(0.0, true)]
    #[case(-1.0, false)]
    #[case(f64::INFINITY, false)]
    fn test_check_noticeable_net_generation_threshold(
        #[case] value: f64,
        #[case] expected_valid: bool,
    ) {
        assert_validation_result(
            check_noticeable_net_generation_threshold(Energy(value)),
            expected_valid,
            value,
            "noticeable_net_generation_threshold must be a finite number",
        );
    }

    #[rstest]
    #[case(8.607, 6.711, true)]
    #[case(0.0, 6.711, false)]
    #[case(8.607, -1.0, false)]
    fn test_check_implausible_heat_rate(
        #[case] coal: f64,
        #[case] other: f64,
        #[case] expected_valid: bool,
    ) {
        let value = ImplausibleHeatRate {
            coal: HeatRate(coal),
            other: HeatRate(other),
        };
        assert_eq!(check_implausible_heat_rate(&value).is_ok(), expected_valid);
    }

    #[rstest]
    fn test_is_fuel_prime_mover(parameters: AnalysisParameters) {
        assert!(parameters.is_fuel_prime_mover(&"ST".into()));
        assert!(parameters.is_fuel_prime_mover(&"cc".into()));
        assert!(!parameters.is_fuel_prime_mover(&"PS".into()));
        assert!(!parameters.is_fuel_prime_mover(&"WT".into()));
    }
}
