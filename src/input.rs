//! Common routines for handling input data.
use crate::fuel_mix::FuelMixResolver;
use crate::parameters::AnalysisParameters;
use crate::record::GenerationRecord;
use anyhow::{Context, Result, ensure};
use log::info;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub mod fuel_mix;
use fuel_mix::read_fuel_mix;
pub mod generation;
use generation::read_generation_records;

/// All the data needed for an analysis, as read from an input directory
pub struct AnalysisInputs {
    /// Thresholds and other parameters
    pub parameters: AnalysisParameters,
    /// The records to review
    pub records: Vec<GenerationRecord>,
    /// The fuels each plant is registered to use
    pub fuel_mix: FuelMixResolver,
}

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    let vec = read_csv_as_vec(file_path)?;
    ensure!(!vec.is_empty(), "CSV file {} cannot be empty", file_path.display());

    Ok(vec.into_iter())
}

/// Read a CSV file into a `Vec`, attaching the file path to any error
fn read_csv_as_vec<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?;

    let mut vec = Vec::new();
    for result in reader.deserialize() {
        let record: T = result.with_context(|| input_err_msg(file_path))?;
        vec.push(record);
    }

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read all the inputs for an analysis from the specified directory.
///
/// # Arguments
///
/// * `input_dir` - Folder containing `analysis.toml`, `generation.csv` and `fuel_mix.csv`
pub fn load_inputs<P: AsRef<Path>>(input_dir: P) -> Result<AnalysisInputs> {
    let input_dir = input_dir.as_ref();
    let parameters = AnalysisParameters::from_path(input_dir)?;
    let records = read_generation_records(input_dir)?;
    let fuel_mix = read_fuel_mix(input_dir)?;
    info!(
        "Read {} records and fuel profiles for {} plants",
        records.len(),
        fuel_mix.len()
    );

    Ok(AnalysisInputs {
        parameters,
        records,
        fuel_mix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use serde::Deserialize;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: String,
        value: u32,
    }

    /// Create an example CSV file in dir_path
    fn create_csv_file(dir_path: &Path, contents: &str) -> PathBuf {
        let file_path = dir_path.join("test.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{contents}").unwrap();
        file_path
    }

    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,value\nhello, 1\nworld,2\n");
        let records: Vec<Record> = read_csv(&file_path).unwrap().collect();
        assert_eq!(
            records,
            &[
                Record {
                    id: "hello".to_string(),
                    value: 1,
                },
                Record {
                    id: "world".to_string(),
                    value: 2,
                }
            ]
        );
    }

    #[test]
    fn test_read_csv_empty() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,value\n");
        assert!(read_csv::<Record>(&file_path).is_err());
    }

    #[test]
    fn test_read_csv_bad_row() {
        let dir = tempdir().unwrap();
        let file_path = create_csv_file(dir.path(), "id,value\nhello,minus one\n");
        let result = read_csv::<Record>(&file_path).map(Iterator::count);
        assert_error!(result, input_err_msg(&file_path));
    }

    #[test]
    fn test_read_toml() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Value {
            value: u32,
        }

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "value = 1").unwrap();
        }
        assert_eq!(read_toml::<Value>(&file_path).unwrap(), Value { value: 1 });

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "value = \"one\"").unwrap();
        }
        assert_error!(read_toml::<Value>(&file_path), input_err_msg(&file_path));
    }

    #[test]
    fn test_read_toml_missing_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing.toml");
        assert_error!(read_toml::<toml::Table>(&file_path), input_err_msg(&file_path));
    }
}
