//! Plant-level review of classified records.
//!
//! A plant is excluded from the heat rate table when it reports negative values in most of the
//! months which could be evaluated. Plants which burn more than one fuel, or which report
//! generation against a fuel they aren't registered to use, are flagged for review instead of
//! being excluded, as their anomalies are likely to be caused by the way fuel consumption is
//! attributed.
use crate::classification::{AssessedRecord, Classification};
use crate::fuel_mix::{FuelCode, FuelMixResolver};
use crate::metrics::heat_rate;
use crate::month::Month;
use crate::parameters::AnalysisParameters;
use crate::record::PlantID;
use crate::units::{Dimensionless, Energy, FuelEnergy, HeatRate};
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use strum::Display;

/// What happens to a plant as a result of the review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PlantDisposition {
    /// The plant's records go into the heat rate table
    Included,
    /// The plant reports negative values too often to be trusted
    ExcludedConsistentlyNegative,
    /// The plant uses (or reports) more than one fuel and should be reviewed by hand
    FlaggedMultiFuel,
}

/// Months in which a single-fuel plant reported generation against an unregistered fuel.
///
/// No heat rate can be computed for the plant as a whole in these months, because part of the
/// fuel consumption is attributed to a fuel the reference data doesn't know about.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputationGap {
    /// The plant
    pub plant_id: PlantID,
    /// The plant's only registered fuel
    pub registered_fuel: FuelCode,
    /// The fuel the generation was reported against
    pub fuel_code: FuelCode,
    /// The affected months, in ascending order
    pub months: Vec<Month>,
}

/// The outcome of reviewing one plant
#[derive(Debug, Clone, PartialEq)]
pub struct PlantSummary {
    /// The plant
    pub plant_id: PlantID,
    /// Number of records examined
    pub record_count: usize,
    /// Months in which at least one record had a heat rate or capacity factor
    pub evaluated_months: usize,
    /// Evaluated months in which at least one record was negative
    pub negative_months: usize,
    /// `negative_months / evaluated_months`, if any months were evaluated
    pub negative_fraction: Option<Dimensionless>,
    /// For each tag, the months in which at least one record had it
    pub months_by_tag: BTreeMap<Classification, Vec<Month>>,
    /// Whether the plant's records go into the heat rate table
    pub include_in_heat_rate_table: bool,
    /// Whether the plant's records go into the generation table
    pub include_in_generation_table: bool,
    /// Whether the plant is registered to use more than one fuel
    pub is_multi_fuel: bool,
    /// Whether the plant should be reviewed as a multi-fuel plant
    pub flagged_multi_fuel: bool,
    /// Whether the plant is absent from the fuel-mix reference data
    pub missing_fuel_profile: bool,
    /// Number of fuels the plant is registered to use
    pub registered_fuel_count: usize,
    /// Fuels the plant reported generation against
    pub observed_fuels: BTreeSet<FuelCode>,
    /// Months with a capacity factor below the screening threshold (pumped storage aside)
    pub extreme_capacity_factor_months: Vec<Month>,
    /// Months in which a record's net generation was noticeably negative
    pub noticeable_negative_months: Vec<Month>,
    /// Unregistered fuels reported by a single-fuel plant
    pub computation_gaps: Vec<ComputationGap>,
    /// Net generation summed over all records
    pub total_net_generation: Energy,
    /// Fuel consumption over net generation, for records with a defined heat rate
    pub aggregate_heat_rate: Option<HeatRate>,
}

impl PlantSummary {
    /// The dispositions which apply to this plant.
    ///
    /// A plant is either included or excluded, and may additionally be flagged as multi-fuel.
    pub fn dispositions(&self) -> Vec<PlantDisposition> {
        let mut dispositions = vec![if self.is_excluded_consistently_negative() {
            PlantDisposition::ExcludedConsistentlyNegative
        } else {
            PlantDisposition::Included
        }];
        if self.flagged_multi_fuel {
            dispositions.push(PlantDisposition::FlaggedMultiFuel);
        }

        dispositions
    }

    /// Whether the plant reports negative values in too many months for its heat rates to be used
    pub fn is_excluded_consistently_negative(&self) -> bool {
        !self.include_in_heat_rate_table
    }

    /// Months in which at least one record had the given tag
    pub fn months_with_tag(&self, tag: Classification) -> &[Month] {
        self.months_by_tag
            .get(&tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the plant reported against fuels it isn't registered to use
    pub fn has_incomplete_fuel_registration(&self) -> bool {
        !self.computation_gaps.is_empty()
    }
}

/// Reviews all the records for a plant
pub struct PlantAggregator<'a> {
    parameters: &'a AnalysisParameters,
    fuel_mix: &'a FuelMixResolver,
}

impl<'a> PlantAggregator<'a> {
    /// Create a new [`PlantAggregator`]
    pub fn new(parameters: &'a AnalysisParameters, fuel_mix: &'a FuelMixResolver) -> Self {
        Self {
            parameters,
            fuel_mix,
        }
    }

    /// Summarise the records for one plant.
    ///
    /// # Arguments
    ///
    /// * `plant_id` - The plant to summarise
    /// * `records` - All the assessed records for this plant, in any order
    pub fn aggregate(&self, plant_id: &PlantID, records: &[AssessedRecord]) -> PlantSummary {
        let mut months_by_tag: BTreeMap<Classification, BTreeSet<Month>> = BTreeMap::new();
        let mut evaluated = BTreeSet::new();
        let mut negative = BTreeSet::new();
        let mut extreme = BTreeSet::new();
        let mut noticeable = BTreeSet::new();
        let mut observed_fuels = BTreeSet::new();
        let noticeable_threshold = Energy(-self.parameters.noticeable_net_generation_threshold.0);

        for assessed in records {
            let month = assessed.record.month;
            observed_fuels.insert(assessed.record.fuel_code.clone());
            for tag in &assessed.classifications {
                months_by_tag.entry(*tag).or_default().insert(month);
            }

            // Anomalies in records for an unregistered fuel are reported as computation gaps
            if !self.is_unregistered_fuel(plant_id, assessed) {
                if assessed.metrics.has_defined_metric() {
                    evaluated.insert(month);
                }
                if assessed.is_negative() {
                    negative.insert(month);
                }
            }
            if self.is_extreme_capacity_factor(assessed) {
                extreme.insert(month);
            }
            if assessed.metrics.net_generation < noticeable_threshold {
                noticeable.insert(month);
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let negative_fraction = (!evaluated.is_empty()).then(|| {
            Dimensionless(negative.len() as f64 / evaluated.len() as f64)
        });
        let excluded_consistently_negative = negative_fraction
            .is_some_and(|fraction| fraction >= self.parameters.consistently_negative_fraction);
        if excluded_consistently_negative {
            info!(
                "Plant {plant_id} is excluded from the heat rate table: {} of {} evaluated months \
                 are negative",
                negative.len(),
                evaluated.len()
            );
        }

        let missing_fuel_profile = !self.fuel_mix.has_profile(plant_id);
        if missing_fuel_profile {
            warn!("Plant {plant_id} has no entry in the fuel-mix reference data");
        }

        let computation_gaps = self.find_computation_gaps(plant_id, records);
        for gap in &computation_gaps {
            debug!(
                "Plant {plant_id} reports fuel {} but is only registered for {}",
                gap.fuel_code, gap.registered_fuel
            );
        }

        let is_multi_fuel = self.fuel_mix.is_multi_fuel(plant_id);
        PlantSummary {
            plant_id: plant_id.clone(),
            record_count: records.len(),
            evaluated_months: evaluated.len(),
            negative_months: negative.len(),
            negative_fraction,
            months_by_tag: months_by_tag
                .into_iter()
                .map(|(tag, months)| (tag, months.into_iter().collect()))
                .collect(),
            include_in_heat_rate_table: !excluded_consistently_negative,
            include_in_generation_table: true,
            is_multi_fuel,
            flagged_multi_fuel: is_multi_fuel || !computation_gaps.is_empty(),
            missing_fuel_profile,
            registered_fuel_count: self.fuel_mix.registered_fuel_count(plant_id),
            observed_fuels,
            extreme_capacity_factor_months: extreme.into_iter().collect(),
            noticeable_negative_months: noticeable.into_iter().collect(),
            computation_gaps,
            total_net_generation: records
                .iter()
                .map(|assessed| assessed.metrics.net_generation)
                .sum(),
            aggregate_heat_rate: aggregate_heat_rate(records),
        }
    }

    /// Whether the record's capacity factor is below the stricter screening threshold.
    ///
    /// Pumped storage plants consume more energy than they generate in normal operation, so they
    /// are never listed.
    fn is_extreme_capacity_factor(&self, assessed: &AssessedRecord) -> bool {
        !assessed.record.prime_mover.is_pumped_storage()
            && assessed.metrics.capacity_factor().is_some_and(|capacity_factor| {
                capacity_factor < self.parameters.plant_screening_capacity_factor_threshold
            })
    }

    /// Whether the record is for a fuel other than the sole registered fuel of a single-fuel plant
    fn is_unregistered_fuel(&self, plant_id: &PlantID, assessed: &AssessedRecord) -> bool {
        self.fuel_mix.registered_fuel_count(plant_id) == 1
            && !self
                .fuel_mix
                .is_primary_fuel(plant_id, &assessed.record.fuel_code)
    }

    /// Find fuels reported by a plant registered to use exactly one fuel, other than that fuel
    fn find_computation_gaps(
        &self,
        plant_id: &PlantID,
        records: &[AssessedRecord],
    ) -> Vec<ComputationGap> {
        let mut months_by_fuel: BTreeMap<&FuelCode, BTreeSet<Month>> = BTreeMap::new();
        for assessed in records
            .iter()
            .filter(|assessed| self.is_unregistered_fuel(plant_id, assessed))
        {
            months_by_fuel
                .entry(&assessed.record.fuel_code)
                .or_default()
                .insert(assessed.record.month);
        }

        // Only single-fuel plants have gaps, so the profile exists
        let Some(profile) = self.fuel_mix.profile(plant_id) else {
            return Vec::new();
        };
        let registered_fuel = profile.primary_fuel();

        months_by_fuel
            .into_iter()
            .map(|(fuel_code, months)| ComputationGap {
                plant_id: plant_id.clone(),
                registered_fuel: registered_fuel.clone(),
                fuel_code: fuel_code.clone(),
                months: months.into_iter().collect(),
            })
            .collect()
    }
}

/// Total fuel consumption over total net generation, for records whose heat rate is defined
fn aggregate_heat_rate(records: &[AssessedRecord]) -> Option<HeatRate> {
    let defined = records
        .iter()
        .filter(|assessed| assessed.metrics.heat_rate().is_some());
    let (fuel, net) = defined.fold(
        (FuelEnergy(0.0), Energy(0.0)),
        |(fuel, net), assessed| {
            (
                fuel + assessed.record.fuel_consumption,
                net + assessed.metrics.net_generation,
            )
        },
    );

    // Also undefined if there are no records, as the net generation sum is then zero
    heat_rate(fuel, net).ok()
}
