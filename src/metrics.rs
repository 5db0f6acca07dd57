//! Calculation of the derived metrics for a single generation record.
//!
//! Three quantities are derived from the raw inputs:
//!
//! * net generation: gross generation minus auxiliary load. This can be negative (e.g. when a plant
//!   is offline but still drawing station service) and the sign is always preserved.
//! * heat rate: fuel consumption divided by net generation. Undefined when net generation is zero.
//! * capacity factor: net generation divided by the maximum possible generation for the month.
use crate::record::GenerationRecord;
use crate::units::{Capacity, Dimensionless, Energy, FuelEnergy, HeatRate, Hours};
use thiserror::Error;

/// A problem encountered while calculating the metrics for one record.
///
/// These never abort an analysis: the affected metric is simply left out.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum MetricError {
    /// Net generation is exactly zero
    #[error("Heat rate is undefined because net generation is zero")]
    UndefinedHeatRate,
    /// Nameplate capacity is zero, negative or not finite
    #[error("Nameplate capacity must be a finite number greater than zero (got {0} MW)")]
    InvalidCapacity(Capacity),
}

/// Net generation for the given gross generation and auxiliary load
pub fn net_generation(gross_generation: Energy, auxiliary_load: Energy) -> Energy {
    gross_generation - auxiliary_load
}

/// Heat rate for the given fuel consumption and net generation.
///
/// The sign of the result follows the sign of net generation for non-negative fuel consumption.
pub fn heat_rate(
    fuel_consumption: FuelEnergy,
    net_generation: Energy,
) -> Result<HeatRate, MetricError> {
    if net_generation == Energy(0.0) {
        return Err(MetricError::UndefinedHeatRate);
    }

    Ok(fuel_consumption / net_generation)
}

/// Capacity factor for the given net generation over a period of `hours`
pub fn capacity_factor(
    net_generation: Energy,
    nameplate_capacity: Capacity,
    hours: Hours,
) -> Result<Dimensionless, MetricError> {
    if !nameplate_capacity.is_finite() || nameplate_capacity <= Capacity(0.0) {
        return Err(MetricError::InvalidCapacity(nameplate_capacity));
    }

    Ok(net_generation / (nameplate_capacity * hours))
}

/// The metrics derived from a single [`GenerationRecord`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    /// Gross generation minus auxiliary load
    pub net_generation: Energy,
    /// Fuel consumption per unit net generation
    pub heat_rate: Result<HeatRate, MetricError>,
    /// Net generation as a proportion of the maximum possible generation
    pub capacity_factor: Result<Dimensionless, MetricError>,
}

impl DerivedMetrics {
    /// Calculate the metrics for `record`, where `year` is the year of the analysis
    pub fn calculate(record: &GenerationRecord, year: u32) -> Self {
        let net_generation = net_generation(record.gross_generation, record.auxiliary_load);
        Self {
            net_generation,
            heat_rate: heat_rate(record.fuel_consumption, net_generation),
            capacity_factor: capacity_factor(
                net_generation,
                record.nameplate_capacity,
                record.month.hours(year),
            ),
        }
    }

    /// The heat rate, if defined
    pub fn heat_rate(&self) -> Option<HeatRate> {
        self.heat_rate.ok()
    }

    /// The capacity factor, if it could be calculated
    pub fn capacity_factor(&self) -> Option<Dimensionless> {
        self.capacity_factor.ok()
    }

    /// Whether at least one of heat rate and capacity factor is defined
    pub fn has_defined_metric(&self) -> bool {
        self.heat_rate.is_ok() || self.capacity_factor.is_ok()
    }

    /// Iterate over the errors encountered while calculating metrics
    pub fn iter_errors(&self) -> impl Iterator<Item = MetricError> {
        [self.heat_rate.err(), self.capacity_factor.err()]
            .into_iter()
            .flatten()
    }
}
