//! Code for reading monthly generation records from a CSV file.
use super::*;
use crate::fuel_mix::normalise_fuel_code;
use crate::month::Month;
use crate::units::{Capacity, Energy, FuelEnergy};
use serde::Deserialize;

const GENERATION_FILE_NAME: &str = "generation.csv";

/// A generation record retrieved from a CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct GenerationRecordRaw {
    plant_id: String,
    fuel_code: String,
    prime_mover: String,
    month: Month,
    gross_generation: f64,
    auxiliary_load: f64,
    fuel_consumption: f64,
    nameplate_capacity: f64,
}

impl GenerationRecordRaw {
    fn into_generation_record(self) -> Result<GenerationRecord> {
        ensure!(!self.plant_id.is_empty(), "Plant ID cannot be empty");
        ensure!(
            !self.fuel_code.is_empty(),
            "Fuel code cannot be empty (plant {})",
            self.plant_id
        );
        ensure!(
            !self.prime_mover.is_empty(),
            "Prime mover cannot be empty (plant {})",
            self.plant_id
        );
        for (name, value) in [
            ("gross_generation", self.gross_generation),
            ("auxiliary_load", self.auxiliary_load),
            ("fuel_consumption", self.fuel_consumption),
        ] {
            ensure!(
                value.is_finite(),
                "{name} must be a finite number (plant {}, month {})",
                self.plant_id,
                self.month
            );
        }
        ensure!(
            self.fuel_consumption >= 0.0,
            "fuel_consumption cannot be negative (plant {}, month {})",
            self.plant_id,
            self.month
        );

        Ok(GenerationRecord {
            plant_id: self.plant_id.as_str().into(),
            fuel_code: normalise_fuel_code(&self.fuel_code),
            prime_mover: self.prime_mover.to_ascii_uppercase().into(),
            month: self.month,
            gross_generation: Energy(self.gross_generation),
            auxiliary_load: Energy(self.auxiliary_load),
            fuel_consumption: FuelEnergy(self.fuel_consumption),
            // Invalid capacities are reported per record rather than rejected here
            nameplate_capacity: Capacity(self.nameplate_capacity),
        })
    }
}

fn read_generation_records_from_iter<I>(iter: I) -> Result<Vec<GenerationRecord>>
where
    I: Iterator<Item = GenerationRecordRaw>,
{
    iter.map(GenerationRecordRaw::into_generation_record)
        .collect()
}

/// Read generation records from the generation.csv file.
///
/// # Arguments
///
/// * `input_dir` - Folder containing input files
///
/// # Returns
///
/// The records in the order they appear in the file
pub fn read_generation_records(input_dir: &Path) -> Result<Vec<GenerationRecord>> {
    let file_path = input_dir.join(GENERATION_FILE_NAME);
    let generation_csv = read_csv(&file_path)?;
    read_generation_records_from_iter(generation_csv).with_context(|| input_err_msg(&file_path))
}
