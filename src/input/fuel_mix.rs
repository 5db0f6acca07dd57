//! Code for reading the fuel-mix reference table from a CSV file.
use super::*;
use crate::fuel_mix::{FuelCode, PlantFuelProfile, normalise_fuel_code};
use crate::record::PlantID;
use indexmap::IndexMap;
use serde::Deserialize;

const FUEL_MIX_FILE_NAME: &str = "fuel_mix.csv";

/// One row of the fuel-mix table: a fuel a plant is registered to use
#[derive(PartialEq, Debug, Deserialize)]
struct FuelMixRaw {
    plant_id: String,
    fuel_code: String,
}

/// Build the fuel profiles from rows of the fuel-mix table.
///
/// Rows for the same plant needn't be adjacent. Within a plant, rows are kept in file order, so
/// the first row gives the primary fuel.
fn read_fuel_mix_from_iter<I>(iter: I) -> Result<FuelMixResolver>
where
    I: Iterator<Item = FuelMixRaw>,
{
    let mut fuels_by_plant: IndexMap<PlantID, Vec<FuelCode>> = IndexMap::new();
    for row in iter {
        ensure!(!row.plant_id.is_empty(), "Plant ID cannot be empty");
        ensure!(
            !row.fuel_code.is_empty(),
            "Fuel code cannot be empty (plant {})",
            row.plant_id
        );

        fuels_by_plant
            .entry(row.plant_id.into())
            .or_default()
            .push(normalise_fuel_code(&row.fuel_code));
    }

    let mut profiles = Vec::with_capacity(fuels_by_plant.len());
    for (plant_id, fuels) in fuels_by_plant {
        let profile = PlantFuelProfile::new(fuels)
            .with_context(|| format!("Invalid fuel profile for plant {plant_id}"))?;
        profiles.push((plant_id, profile));
    }

    FuelMixResolver::from_profiles(profiles)
}

/// Read the fuel-mix reference table from the fuel_mix.csv file.
///
/// # Arguments
///
/// * `input_dir` - Folder containing input files
pub fn read_fuel_mix(input_dir: &Path) -> Result<FuelMixResolver> {
    let file_path = input_dir.join(FUEL_MIX_FILE_NAME);
    let fuel_mix_csv = read_csv(&file_path)?;
    read_fuel_mix_from_iter(fuel_mix_csv).with_context(|| input_err_msg(&file_path))
}
