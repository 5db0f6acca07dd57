//! Fixtures for tests

use crate::fuel_mix::{FuelMixResolver, PlantFuelProfile, normalise_fuel_code};
use crate::month::Month;
use crate::parameters::{AnalysisParameters, ImplausibleHeatRate};
use crate::record::{GenerationRecord, PlantID};
use crate::units::{Capacity, Dimensionless, Energy, FuelEnergy, HeatRate};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Create a [`GenerationRecord`] from raw values
#[allow(clippy::too_many_arguments)]
pub fn record(
    plant_id: &str,
    fuel_code: &str,
    prime_mover: &str,
    month: u32,
    gross_generation: f64,
    auxiliary_load: f64,
    fuel_consumption: f64,
    nameplate_capacity: f64,
) -> GenerationRecord {
    GenerationRecord {
        plant_id: plant_id.into(),
        fuel_code: normalise_fuel_code(fuel_code),
        prime_mover: prime_mover.into(),
        month: Month::new(month).unwrap(),
        gross_generation: Energy(gross_generation),
        auxiliary_load: Energy(auxiliary_load),
        fuel_consumption: FuelEnergy(fuel_consumption),
        nameplate_capacity: Capacity(nameplate_capacity),
    }
}

#[fixture]
pub fn generation_record() -> GenerationRecord {
    record("100", "NG", "CC", 1, 50000.0, 1500.0, 350000.0, 100.0)
}

#[fixture]
pub fn fuel_mix() -> FuelMixResolver {
    let profile = |fuels: &[&str]| {
        PlantFuelProfile::new(fuels.iter().map(|fuel| normalise_fuel_code(fuel)).collect())
            .unwrap()
    };

    FuelMixResolver::from_profiles([
        (PlantID::new("100"), profile(&["NG"])),
        (PlantID::new("200"), profile(&["BIT", "NG"])),
        (PlantID::new("300"), profile(&["NG"])),
    ])
    .unwrap()
}

#[fixture]
pub fn parameters() -> AnalysisParameters {
    AnalysisParameters {
        year: 2015,
        negative_capacity_factor_threshold: Dimensionless(0.0),
        plant_screening_capacity_factor_threshold: Dimensionless(-0.05),
        consistently_negative_fraction: Dimensionless(0.8),
        noticeable_net_generation_threshold: Energy(1000.0),
        implausible_heat_rate: Some(ImplausibleHeatRate {
            coal: HeatRate(8.607),
            other: HeatRate(6.711),
        }),
        fuel_prime_movers: ["ST", "GT", "IC", "CA", "CT", "CS", "CC"]
            .map(Into::into)
            .to_vec(),
    }
}
