//! Drives the review of a batch of records from metrics through to the final tables.
use crate::classification::{AnomalyClassifier, AssessedRecord, ClassificationSet};
use crate::fuel_mix::FuelMixResolver;
use crate::metrics::MetricError;
use crate::parameters::AnalysisParameters;
use crate::plant::{ComputationGap, PlantAggregator, PlantSummary};
use crate::record::{GenerationRecord, PlantID, RecordKey};
use crate::units::{Dimensionless, Energy, HeatRate};
use log::{debug, info};
use std::collections::BTreeMap;

/// A row of one of the cleaned tables: a record with its derived metrics and tags
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// The original record
    pub record: GenerationRecord,
    /// Gross generation minus auxiliary load
    pub net_generation: Energy,
    /// The heat rate, if defined
    pub heat_rate: Option<HeatRate>,
    /// The capacity factor, if it could be calculated
    pub capacity_factor: Option<Dimensionless>,
    /// The tags assigned to the record
    pub classifications: ClassificationSet,
}

impl From<&AssessedRecord<'_>> for TableRow {
    fn from(assessed: &AssessedRecord) -> Self {
        Self {
            record: assessed.record.clone(),
            net_generation: assessed.metrics.net_generation,
            heat_rate: assessed.metrics.heat_rate(),
            capacity_factor: assessed.metrics.capacity_factor(),
            classifications: assessed.classifications.clone(),
        }
    }
}

/// A plant listed for review because it uses, or reports, more than one fuel
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFuelPlant {
    /// The plant
    pub plant_id: PlantID,
    /// Number of fuels in the reference data
    pub registered_fuel_count: usize,
    /// Number of distinct fuels in the plant's records
    pub observed_fuel_count: usize,
    /// Whether the plant reported fuels it isn't registered for
    pub incomplete_registration: bool,
    /// Whether the plant is also excluded from the heat rate table
    pub excluded: bool,
}

impl From<&PlantSummary> for MultiFuelPlant {
    fn from(summary: &PlantSummary) -> Self {
        Self {
            plant_id: summary.plant_id.clone(),
            registered_fuel_count: summary.registered_fuel_count,
            observed_fuel_count: summary.observed_fuels.len(),
            incomplete_registration: summary.has_incomplete_fuel_registration(),
            excluded: summary.is_excluded_consistently_negative(),
        }
    }
}

/// A problem with one record which meant a metric couldn't be calculated
#[derive(Debug, Clone, PartialEq)]
pub struct DataQualityIssue {
    /// The affected record
    pub key: RecordKey,
    /// What went wrong
    pub error: MetricError,
}

/// Everything produced by a run of the pipeline.
///
/// Each collection is sorted by plant, then (where applicable) month, fuel and prime mover.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineOutput {
    /// Records of plants whose heat rates can be used
    pub heat_rate_table: Vec<TableRow>,
    /// Records of all plants
    pub generation_table: Vec<TableRow>,
    /// Plants left out of the heat rate table for being consistently negative
    pub excluded_plants: Vec<PlantID>,
    /// Plants flagged for review as multi-fuel
    pub multi_fuel_plants: Vec<MultiFuelPlant>,
    /// One summary per plant
    pub plant_summaries: Vec<PlantSummary>,
    /// Unregistered fuels reported by single-fuel plants
    pub computation_gaps: Vec<ComputationGap>,
    /// Records for which a metric couldn't be calculated
    pub data_quality_issues: Vec<DataQualityIssue>,
}

/// Get the positions of each plant's records in `records`, ordered by plant ID
pub fn index_by_plant(records: &[GenerationRecord]) -> BTreeMap<&PlantID, Vec<usize>> {
    let mut index: BTreeMap<&PlantID, Vec<usize>> = BTreeMap::new();
    for (position, record) in records.iter().enumerate() {
        index.entry(&record.plant_id).or_default().push(position);
    }

    index
}

/// Run the review over a batch of records.
///
/// # Arguments
///
/// * `records` - The records to review, in any order
/// * `fuel_mix` - The fuels each plant is registered to use
/// * `parameters` - Thresholds for the analysis
///
/// # Returns
///
/// The partitioned tables and review lists. Reordering `records` doesn't change the result.
pub fn run_pipeline(
    records: &[GenerationRecord],
    fuel_mix: &FuelMixResolver,
    parameters: &AnalysisParameters,
) -> PipelineOutput {
    let classifier = AnomalyClassifier::new(parameters);
    let aggregator = PlantAggregator::new(parameters, fuel_mix);
    let index = index_by_plant(records);
    info!(
        "Reviewing {} records for {} plants",
        records.len(),
        index.len()
    );

    let mut output = PipelineOutput::default();
    for (plant_id, positions) in index {
        let mut assessed: Vec<_> = positions
            .into_iter()
            .map(|position| classifier.assess(&records[position]))
            .collect();
        assessed.sort_by(|a, b| a.record.output_cmp(b.record));

        let summary = aggregator.aggregate(plant_id, &assessed);
        for assessed in &assessed {
            for error in assessed.metrics.iter_errors() {
                debug!("Record for {}: {error}", assessed.record.key());
                output.data_quality_issues.push(DataQualityIssue {
                    key: assessed.record.key(),
                    error,
                });
            }

            let row = TableRow::from(assessed);
            if summary.include_in_heat_rate_table {
                output.heat_rate_table.push(row.clone());
            }
            if summary.include_in_generation_table {
                output.generation_table.push(row);
            }
        }

        if summary.is_excluded_consistently_negative() {
            output.excluded_plants.push(plant_id.clone());
        }
        if summary.flagged_multi_fuel {
            output.multi_fuel_plants.push(MultiFuelPlant::from(&summary));
        }
        output
            .computation_gaps
            .extend(summary.computation_gaps.iter().cloned());
        output.plant_summaries.push(summary);
    }

    info!(
        "{} plants excluded as consistently negative, {} flagged as multi-fuel",
        output.excluded_plants.len(),
        output.multi_fuel_plants.len()
    );

    output
}
