//! Fuel-mix reference data: which fuels each plant is registered to use.
//!
//! The reference table is used to tell genuine anomalies apart from artefacts of plants that burn
//! more than one fuel, where only part of the plant's fuel consumption is attributed to the record
//! being examined.
use crate::id::define_id_type;
use crate::record::PlantID;
use anyhow::{Result, ensure};
use std::collections::HashMap;

define_id_type! {FuelCode}

/// The code which all coal sub-types are folded into
pub const COAL_FUEL_CODE: &str = "COAL";

/// Fuel codes for the different types of coal
const COAL_SUBTYPE_CODES: [&str; 7] = ["ANT", "BIT", "LIG", "SGC", "SUB", "WC", "RC"];

/// Create a [`FuelCode`] from a raw code in the input data.
///
/// Codes are trimmed and upper-cased, and coal sub-types (anthracite, bituminous etc.) are all
/// mapped onto [`COAL_FUEL_CODE`].
pub fn normalise_fuel_code(code: &str) -> FuelCode {
    let code = code.trim().to_ascii_uppercase();
    if COAL_SUBTYPE_CODES.contains(&code.as_str()) {
        FuelCode::new(COAL_FUEL_CODE)
    } else {
        code.into()
    }
}

impl FuelCode {
    /// Whether this is coal
    pub fn is_coal(&self) -> bool {
        self.as_str() == COAL_FUEL_CODE
    }
}

/// The fuels a plant is registered to use, in the order they are listed in the reference table.
///
/// The first-listed fuel is the plant's primary fuel.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantFuelProfile {
    fuels: Vec<FuelCode>,
}

impl PlantFuelProfile {
    /// Create a new [`PlantFuelProfile`], checking that it is non-empty and has no duplicates
    pub fn new(fuels: Vec<FuelCode>) -> Result<Self> {
        ensure!(!fuels.is_empty(), "A plant must be registered with at least one fuel");
        for (i, fuel) in fuels.iter().enumerate() {
            ensure!(
                !fuels[..i].contains(fuel),
                "Fuel {fuel} is listed more than once"
            );
        }

        Ok(Self { fuels })
    }

    /// The registered fuels, primary fuel first
    pub fn fuels(&self) -> &[FuelCode] {
        &self.fuels
    }

    /// The plant's primary fuel
    pub fn primary_fuel(&self) -> &FuelCode {
        &self.fuels[0]
    }
}

/// Answers questions about plants' registered fuels
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuelMixResolver {
    profiles: HashMap<PlantID, PlantFuelProfile>,
}

impl FuelMixResolver {
    /// Create a new [`FuelMixResolver`] from plant fuel profiles.
    ///
    /// Returns an error if a plant has more than one profile.
    pub fn from_profiles<I>(profiles: I) -> Result<Self>
    where
        I: IntoIterator<Item = (PlantID, PlantFuelProfile)>,
    {
        let mut map = HashMap::new();
        for (plant_id, profile) in profiles {
            ensure!(
                !map.contains_key(&plant_id),
                "Plant {plant_id} has more than one fuel profile"
            );
            map.insert(plant_id, profile);
        }

        Ok(Self { profiles: map })
    }

    /// The fuel profile for the given plant, if it has one
    pub fn profile(&self, plant_id: &PlantID) -> Option<&PlantFuelProfile> {
        self.profiles.get(plant_id)
    }

    /// Whether the reference data has an entry for this plant
    pub fn has_profile(&self, plant_id: &PlantID) -> bool {
        self.profiles.contains_key(plant_id)
    }

    /// The number of plants with a fuel profile
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether there are no fuel profiles
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Number of fuels the plant is registered to use (zero for plants with no profile)
    pub fn registered_fuel_count(&self, plant_id: &PlantID) -> usize {
        self.profile(plant_id).map_or(0, |profile| profile.fuels.len())
    }

    /// Whether the plant is registered to use more than one fuel
    pub fn is_multi_fuel(&self, plant_id: &PlantID) -> bool {
        self.registered_fuel_count(plant_id) > 1
    }

    /// Whether `fuel_code` is the plant's sole or first-listed fuel
    pub fn is_primary_fuel(&self, plant_id: &PlantID, fuel_code: &FuelCode) -> bool {
        self.profile(plant_id)
            .is_some_and(|profile| profile.primary_fuel() == fuel_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, fuel_mix};
    use rstest::rstest;

    #[rstest]
    #[case("NG", "NG")]
    #[case(" ng ", "NG")]
    #[case("BIT", "COAL")]
    #[case("sub", "COAL")]
    #[case("RC", "COAL")]
    #[case("DFO", "DFO")]
    fn test_normalise_fuel_code(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalise_fuel_code(raw), FuelCode::new(expected));
    }

    #[test]
    fn test_is_coal() {
        assert!(normalise_fuel_code("LIG").is_coal());
        assert!(!normalise_fuel_code("NG").is_coal());
    }

    #[test]
    fn test_profile_new_invalid() {
        assert_error!(
            PlantFuelProfile::new(Vec::new()),
            "A plant must be registered with at least one fuel"
        );
        assert_error!(
            PlantFuelProfile::new(vec!["NG".into(), "DFO".into(), "NG".into()]),
            "Fuel NG is listed more than once"
        );
    }

    #[test]
    fn test_from_profiles_duplicate_plant() {
        let profile = PlantFuelProfile::new(vec!["NG".into()]).unwrap();
        assert_error!(
            FuelMixResolver::from_profiles([
                (PlantID::new("100"), profile.clone()),
                (PlantID::new("100"), profile)
            ]),
            "Plant 100 has more than one fuel profile"
        );
    }

    #[rstest]
    #[case("100", false, 1)]
    #[case("200", true, 2)]
    #[case("999", false, 0)] // No profile
    fn test_is_multi_fuel(
        fuel_mix: FuelMixResolver,
        #[case] plant_id: &str,
        #[case] expected: bool,
        #[case] count: usize,
    ) {
        let plant_id = PlantID::new(plant_id);
        assert_eq!(fuel_mix.is_multi_fuel(&plant_id), expected);
        assert_eq!(fuel_mix.registered_fuel_count(&plant_id), count);
    }

    #[rstest]
    #[case("100", "NG", true)]
    #[case("100", "DFO", false)]
    #[case("200", "COAL", true)]
    #[case("200", "NG", false)] // Registered, but not first-listed
    #[case("999", "NG", false)]
    fn test_is_primary_fuel(
        fuel_mix: FuelMixResolver,
        #[case] plant_id: &str,
        #[case] fuel: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            fuel_mix.is_primary_fuel(&plant_id.into(), &fuel.into()),
            expected
        );
    }
}
