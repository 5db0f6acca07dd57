//! Quality control of monthly power plant generation and fuel consumption records.
//!
//! The core of the crate derives net generation, heat rate and capacity factor for each
//! plant/fuel/month record, classifies anomalous records, rolls the classifications up per plant
//! and partitions the results into cleaned tables plus lists of plants for manual review.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod classification;
pub mod cli;
pub mod fuel_mix;
pub mod id;
pub mod input;
pub mod log;
pub mod metrics;
pub mod month;
pub mod output;
pub mod parameters;
pub mod pipeline;
pub mod plant;
pub mod record;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the directory in which the program's configuration files are stored
pub fn get_plantqc_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        panic!("Configuration directory could not be found");
    };

    config_dir.push("plantqc");
    config_dir
}
