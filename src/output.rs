//! The module responsible for writing output data to disk.
use crate::classification::{Classification, format_classifications};
use crate::fuel_mix::FuelCode;
use crate::metrics::MetricError;
use crate::month::Month;
use crate::pipeline::{DataQualityIssue, MultiFuelPlant, PipelineOutput, TableRow};
use crate::plant::{ComputationGap, PlantSummary};
use crate::record::{PlantID, PrimeMover};
use crate::units::{Capacity, Dimensionless, Energy, FuelEnergy, HeatRate};
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which input-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "plantqc_results";

/// The output file name for the cleaned heat rate table
const HEAT_RATE_TABLE_FILE_NAME: &str = "heat_rate_table.csv";

/// The output file name for the cleaned generation table
const GENERATION_TABLE_FILE_NAME: &str = "generation_table.csv";

/// The output file name for the list of excluded plants
const EXCLUDED_PLANTS_FILE_NAME: &str = "excluded_plants.csv";

/// The output file name for the list of multi-fuel plants
const MULTI_FUEL_PLANTS_FILE_NAME: &str = "multi_fuel_plants.csv";

/// The output file name for plant summaries
const PLANT_SUMMARY_FILE_NAME: &str = "plant_summary.csv";

/// The output file name for computation gaps
const COMPUTATION_GAPS_FILE_NAME: &str = "computation_gaps.csv";

/// The output file name for record-level data quality issues
const DATA_QUALITY_ISSUES_FILE_NAME: &str = "data_quality_issues.csv";

/// Get the default output directory for the input data in the specified directory
pub fn get_output_dir(input_dir: &Path) -> Result<PathBuf> {
    // Get the dataset name from the dir path. This ends up being convoluted because we need to
    // check for all possible errors. Ugh.
    let input_dir = input_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to input data")?;

    let input_name = input_dir
        .file_name()
        .context("Input data cannot be in root folder")?
        .to_str()
        .context("Invalid chars in input dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, input_name].iter().collect())
}

/// Create a new output directory, deleting the contents of any existing one if `allow_overwrite`
/// is set.
///
/// # Returns
///
/// True if an existing non-empty directory was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass the \
             --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Format a list of months for a CSV cell, e.g. "1;2;12"
fn format_months(months: &[Month]) -> String {
    months.iter().join(";")
}

/// Represents a row in the heat rate and generation table CSV files
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct TableRowOut {
    plant_id: PlantID,
    fuel_code: FuelCode,
    prime_mover: PrimeMover,
    month: Month,
    gross_generation: Energy,
    auxiliary_load: Energy,
    fuel_consumption: FuelEnergy,
    nameplate_capacity: Capacity,
    net_generation: Energy,
    heat_rate: Option<HeatRate>,
    capacity_factor: Option<Dimensionless>,
    classifications: String,
}

impl From<&TableRow> for TableRowOut {
    fn from(row: &TableRow) -> Self {
        let record = &row.record;
        Self {
            plant_id: record.plant_id.clone(),
            fuel_code: record.fuel_code.clone(),
            prime_mover: record.prime_mover.clone(),
            month: record.month,
            gross_generation: record.gross_generation,
            auxiliary_load: record.auxiliary_load,
            fuel_consumption: record.fuel_consumption,
            nameplate_capacity: record.nameplate_capacity,
            net_generation: row.net_generation,
            heat_rate: row.heat_rate,
            capacity_factor: row.capacity_factor,
            classifications: format_classifications(&row.classifications),
        }
    }
}

/// Represents a row in the excluded plants CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ExcludedPlantRow {
    plant_id: PlantID,
    evaluated_months: usize,
    negative_months: usize,
    negative_fraction: Option<Dimensionless>,
}

/// Represents a row in the multi-fuel plants CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct MultiFuelPlantRow {
    plant_id: PlantID,
    registered_fuel_count: usize,
    observed_fuel_count: usize,
    incomplete_registration: bool,
    excluded: bool,
}

impl From<&MultiFuelPlant> for MultiFuelPlantRow {
    fn from(plant: &MultiFuelPlant) -> Self {
        Self {
            plant_id: plant.plant_id.clone(),
            registered_fuel_count: plant.registered_fuel_count,
            observed_fuel_count: plant.observed_fuel_count,
            incomplete_registration: plant.incomplete_registration,
            excluded: plant.excluded,
        }
    }
}

/// Represents a row in the plant summary CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct PlantSummaryRow {
    plant_id: PlantID,
    record_count: usize,
    evaluated_months: usize,
    negative_months: usize,
    negative_fraction: Option<Dimensionless>,
    include_in_heat_rate_table: bool,
    include_in_generation_table: bool,
    is_multi_fuel: bool,
    flagged_multi_fuel: bool,
    missing_fuel_profile: bool,
    dispositions: String,
    negative_heat_rate_months: String,
    negative_capacity_factor_months: String,
    zero_generation_months: String,
    implausibly_low_heat_rate_months: String,
    extreme_capacity_factor_months: String,
    noticeable_negative_months: String,
    total_net_generation: Energy,
    aggregate_heat_rate: Option<HeatRate>,
}

impl From<&PlantSummary> for PlantSummaryRow {
    fn from(summary: &PlantSummary) -> Self {
        let tag_months = |tag| format_months(summary.months_with_tag(tag));
        Self {
            plant_id: summary.plant_id.clone(),
            record_count: summary.record_count,
            evaluated_months: summary.evaluated_months,
            negative_months: summary.negative_months,
            negative_fraction: summary.negative_fraction,
            include_in_heat_rate_table: summary.include_in_heat_rate_table,
            include_in_generation_table: summary.include_in_generation_table,
            is_multi_fuel: summary.is_multi_fuel,
            flagged_multi_fuel: summary.flagged_multi_fuel,
            missing_fuel_profile: summary.missing_fuel_profile,
            dispositions: summary.dispositions().iter().join(";"),
            negative_heat_rate_months: tag_months(Classification::NegativeHeatRate),
            negative_capacity_factor_months: tag_months(Classification::NegativeCapacityFactor),
            zero_generation_months: tag_months(Classification::ZeroGeneration),
            implausibly_low_heat_rate_months: tag_months(Classification::ImplausiblyLowHeatRate),
            extreme_capacity_factor_months: format_months(&summary.extreme_capacity_factor_months),
            noticeable_negative_months: format_months(&summary.noticeable_negative_months),
            total_net_generation: summary.total_net_generation,
            aggregate_heat_rate: summary.aggregate_heat_rate,
        }
    }
}

/// Represents a row in the computation gaps CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ComputationGapRow {
    plant_id: PlantID,
    registered_fuel: FuelCode,
    fuel_code: FuelCode,
    months: String,
}

impl From<&ComputationGap> for ComputationGapRow {
    fn from(gap: &ComputationGap) -> Self {
        Self {
            plant_id: gap.plant_id.clone(),
            registered_fuel: gap.registered_fuel.clone(),
            fuel_code: gap.fuel_code.clone(),
            months: format_months(&gap.months),
        }
    }
}

/// The type of a record-level data quality issue
#[derive(PartialEq, Debug, SerializeLabeledStringEnum, DeserializeLabeledStringEnum)]
enum IssueKind {
    #[string = "undefined_heat_rate"]
    UndefinedHeatRate,
    #[string = "invalid_capacity"]
    InvalidCapacity,
}

impl From<&MetricError> for IssueKind {
    fn from(error: &MetricError) -> Self {
        match error {
            MetricError::UndefinedHeatRate => IssueKind::UndefinedHeatRate,
            MetricError::InvalidCapacity(_) => IssueKind::InvalidCapacity,
        }
    }
}

/// Represents a row in the data quality issues CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DataQualityIssueRow {
    plant_id: PlantID,
    fuel_code: FuelCode,
    prime_mover: PrimeMover,
    month: Month,
    issue: IssueKind,
    message: String,
}

impl From<&DataQualityIssue> for DataQualityIssueRow {
    fn from(issue: &DataQualityIssue) -> Self {
        Self {
            plant_id: issue.key.plant_id.clone(),
            fuel_code: issue.key.fuel_code.clone(),
            prime_mover: issue.key.prime_mover.clone(),
            month: issue.key.month,
            issue: IssueKind::from(&issue.error),
            message: issue.error.to_string(),
        }
    }
}

/// An object for writing the results of an analysis to file
pub struct DataWriter {
    heat_rate_table_writer: csv::Writer<File>,
    generation_table_writer: csv::Writer<File>,
    excluded_plants_writer: csv::Writer<File>,
    multi_fuel_plants_writer: csv::Writer<File>,
    plant_summary_writer: csv::Writer<File>,
    computation_gaps_writer: csv::Writer<File>,
    data_quality_issues_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            heat_rate_table_writer: new_writer(HEAT_RATE_TABLE_FILE_NAME)?,
            generation_table_writer: new_writer(GENERATION_TABLE_FILE_NAME)?,
            excluded_plants_writer: new_writer(EXCLUDED_PLANTS_FILE_NAME)?,
            multi_fuel_plants_writer: new_writer(MULTI_FUEL_PLANTS_FILE_NAME)?,
            plant_summary_writer: new_writer(PLANT_SUMMARY_FILE_NAME)?,
            computation_gaps_writer: new_writer(COMPUTATION_GAPS_FILE_NAME)?,
            data_quality_issues_writer: new_writer(DATA_QUALITY_ISSUES_FILE_NAME)?,
        })
    }

    /// Write everything produced by the pipeline
    pub fn write_output(&mut self, output: &PipelineOutput) -> Result<()> {
        write_rows::<_, TableRowOut, _>(&mut self.heat_rate_table_writer, &output.heat_rate_table)?;
        write_rows::<_, TableRowOut, _>(
            &mut self.generation_table_writer,
            &output.generation_table,
        )?;
        self.write_excluded_plants(&output.plant_summaries)?;
        write_rows::<_, MultiFuelPlantRow, _>(
            &mut self.multi_fuel_plants_writer,
            &output.multi_fuel_plants,
        )?;
        write_rows::<_, PlantSummaryRow, _>(
            &mut self.plant_summary_writer,
            &output.plant_summaries,
        )?;
        write_rows::<_, ComputationGapRow, _>(
            &mut self.computation_gaps_writer,
            &output.computation_gaps,
        )?;
        write_rows::<_, DataQualityIssueRow, _>(
            &mut self.data_quality_issues_writer,
            &output.data_quality_issues,
        )?;

        Ok(())
    }

    /// Write the plants excluded for being consistently negative
    fn write_excluded_plants(&mut self, summaries: &[PlantSummary]) -> Result<()> {
        for summary in summaries
            .iter()
            .filter(|summary| summary.is_excluded_consistently_negative())
        {
            let row = ExcludedPlantRow {
                plant_id: summary.plant_id.clone(),
                evaluated_months: summary.evaluated_months,
                negative_months: summary.negative_months,
                negative_fraction: summary.negative_fraction,
            };
            self.excluded_plants_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        for writer in [
            &mut self.heat_rate_table_writer,
            &mut self.generation_table_writer,
            &mut self.excluded_plants_writer,
            &mut self.multi_fuel_plants_writer,
            &mut self.plant_summary_writer,
            &mut self.computation_gaps_writer,
            &mut self.data_quality_issues_writer,
        ] {
            writer.flush()?;
        }

        Ok(())
    }
}

/// Convert each item to a row type and write it out
fn write_rows<T, R, W>(writer: &mut csv::Writer<W>, items: &[T]) -> Result<()>
where
    R: Serialize + for<'a> From<&'a T>,
    W: std::io::Write,
{
    for item in items {
        writer.serialize(R::from(item))?;
    }

    Ok(())
}

/// Write the output of an analysis to the specified folder
pub fn write_output(output_path: &Path, output: &PipelineOutput) -> Result<()> {
    let mut writer = DataWriter::create(output_path)?;
    writer.write_output(output)?;
    writer.flush()
}
