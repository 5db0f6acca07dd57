//! Classification of individual records as normal or anomalous.
//!
//! Rules are evaluated independently, so a record can carry several tags at once. Negative heat
//! rates and negative capacity factors commonly go together, because both follow the sign of net
//! generation.
//!
//! Only the hard negative/zero boundaries are applied here. Judgements about the magnitude of an
//! anomaly are made when plants are reviewed (see [`crate::plant`]), using the metric values
//! rather than the tags.
use crate::metrics::DerivedMetrics;
use crate::parameters::AnalysisParameters;
use crate::record::GenerationRecord;
use crate::units::HeatRate;
use itertools::Itertools;
use std::collections::BTreeSet;
use strum::Display;

/// The outcome of classifying a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Classification {
    /// No anomalies found
    Normal,
    /// The heat rate is negative (i.e. net generation is negative while fuel was consumed)
    NegativeHeatRate,
    /// The capacity factor is below the configured threshold
    NegativeCapacityFactor,
    /// Net generation is zero, so the heat rate is undefined
    ZeroGeneration,
    /// The heat rate is better than the best heat rate observed historically for the fuel
    ImplausiblyLowHeatRate,
}

/// The set of tags assigned to a record
pub type ClassificationSet = BTreeSet<Classification>;

/// Format a set of tags for output, e.g. "negative_heat_rate;negative_capacity_factor"
pub fn format_classifications(classifications: &ClassificationSet) -> String {
    classifications.iter().join(";")
}

/// A record together with its derived metrics and classification
#[derive(Debug, Clone, PartialEq)]
pub struct AssessedRecord<'a> {
    /// The original record
    pub record: &'a GenerationRecord,
    /// Metrics derived from the record
    pub metrics: DerivedMetrics,
    /// The tags assigned to the record
    pub classifications: ClassificationSet,
}

impl AssessedRecord<'_> {
    /// Whether the record has either of the tags which count towards a plant's negative months
    pub fn is_negative(&self) -> bool {
        self.classifications
            .contains(&Classification::NegativeHeatRate)
            || self
                .classifications
                .contains(&Classification::NegativeCapacityFactor)
    }
}

/// Applies threshold rules to records
pub struct AnomalyClassifier<'a> {
    parameters: &'a AnalysisParameters,
}

impl<'a> AnomalyClassifier<'a> {
    /// Create a new [`AnomalyClassifier`] using thresholds from `parameters`
    pub fn new(parameters: &'a AnalysisParameters) -> Self {
        Self { parameters }
    }

    /// Calculate the metrics for `record` and classify it
    pub fn assess<'r>(&self, record: &'r GenerationRecord) -> AssessedRecord<'r> {
        let metrics = DerivedMetrics::calculate(record, self.parameters.year);
        let classifications = self.classify(record, &metrics);
        AssessedRecord {
            record,
            metrics,
            classifications,
        }
    }

    /// Classify a record based on its derived metrics.
    ///
    /// The returned set contains [`Classification::Normal`] if and only if no other tag applies.
    pub fn classify(
        &self,
        record: &GenerationRecord,
        metrics: &DerivedMetrics,
    ) -> ClassificationSet {
        let mut tags = ClassificationSet::new();

        if let Some(heat_rate) = metrics.heat_rate() {
            if heat_rate < HeatRate(0.0) {
                tags.insert(Classification::NegativeHeatRate);
            }
            if self.is_implausibly_low(record, heat_rate) {
                tags.insert(Classification::ImplausiblyLowHeatRate);
            }
        } else {
            tags.insert(Classification::ZeroGeneration);
        }

        // Records with an invalid capacity can't be assessed against this threshold
        let threshold = self.parameters.negative_capacity_factor_threshold;
        if metrics
            .capacity_factor()
            .is_some_and(|capacity_factor| capacity_factor < threshold)
        {
            tags.insert(Classification::NegativeCapacityFactor);
        }

        if tags.is_empty() {
            tags.insert(Classification::Normal);
        }

        tags
    }

    /// Whether a (defined) heat rate is lower than is physically plausible for this record
    fn is_implausibly_low(&self, record: &GenerationRecord, heat_rate: HeatRate) -> bool {
        let Some(thresholds) = &self.parameters.implausible_heat_rate else {
            return false;
        };

        if heat_rate <= HeatRate(0.0) || !self.parameters.is_fuel_prime_mover(&record.prime_mover)
        {
            return false;
        }

        let threshold = if record.fuel_code.is_coal() {
            thresholds.coal
        } else {
            thresholds.other
        };

        heat_rate < threshold
    }
}
