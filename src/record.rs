//! Monthly generation and fuel consumption records.
use crate::fuel_mix::FuelCode;
use crate::id::define_id_type;
use crate::month::Month;
use crate::units::{Capacity, Energy, FuelEnergy};
use std::cmp::Ordering;
use std::fmt::Display;

define_id_type! {PlantID}
define_id_type! {PrimeMover}

/// The prime mover code used for pumped storage hydro
pub const PUMPED_STORAGE_PRIME_MOVER: &str = "PS";

impl PrimeMover {
    /// Whether this prime mover is pumped storage, which can legitimately consume net energy
    pub fn is_pumped_storage(&self) -> bool {
        self.as_str() == PUMPED_STORAGE_PRIME_MOVER
    }
}

/// One plant x fuel x prime mover x month observation.
///
/// Records are never modified by the analysis: derived quantities are computed separately (see
/// [`crate::metrics::DerivedMetrics`]).
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    /// The plant this observation refers to
    pub plant_id: PlantID,
    /// The fuel consumed
    pub fuel_code: FuelCode,
    /// The type of prime mover (e.g. "ST" for steam turbine)
    pub prime_mover: PrimeMover,
    /// The month of the observation
    pub month: Month,
    /// Gross electricity generation
    pub gross_generation: Energy,
    /// Station service (auxiliary) load
    pub auxiliary_load: Energy,
    /// Fuel consumed for electricity generation
    pub fuel_consumption: FuelEnergy,
    /// Nameplate capacity of the generating units
    pub nameplate_capacity: Capacity,
}

impl GenerationRecord {
    /// The key identifying this record
    pub fn key(&self) -> RecordKey {
        RecordKey {
            plant_id: self.plant_id.clone(),
            month: self.month,
            fuel_code: self.fuel_code.clone(),
            prime_mover: self.prime_mover.clone(),
        }
    }

    /// Compare records for output purposes.
    ///
    /// Records are ordered by plant, month, fuel and prime mover, with ties broken by the numeric
    /// fields so that the ordering is total.
    pub fn output_cmp(&self, other: &Self) -> Ordering {
        self.plant_id
            .cmp(&other.plant_id)
            .then(self.month.cmp(&other.month))
            .then_with(|| self.fuel_code.cmp(&other.fuel_code))
            .then_with(|| self.prime_mover.cmp(&other.prime_mover))
            .then_with(|| {
                self.gross_generation
                    .0
                    .total_cmp(&other.gross_generation.0)
            })
            .then_with(|| self.auxiliary_load.0.total_cmp(&other.auxiliary_load.0))
            .then_with(|| {
                self.fuel_consumption
                    .0
                    .total_cmp(&other.fuel_consumption.0)
            })
            .then_with(|| {
                self.nameplate_capacity
                    .0
                    .total_cmp(&other.nameplate_capacity.0)
            })
    }
}

/// Identifies a record in review output, independently of its position in the input
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    /// The plant
    pub plant_id: PlantID,
    /// The month
    pub month: Month,
    /// The fuel
    pub fuel_code: FuelCode,
    /// The prime mover
    pub prime_mover: PrimeMover,
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "plant {}, fuel {}, prime mover {}, month {}",
            self.plant_id, self.fuel_code, self.prime_mover, self.month
        )
    }
}
