#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Continuous-size plant growth, separate from the discrete tile grid.
//!
//! Variants are a closed tagged enum with their growth constants in a
//! lookup table; instances hold only their mutable size, and growth is a
//! pure `(variant, size) -> size` function. There are no shared mutable
//! method objects and no string-keyed registry: an unknown variant cannot
//! be expressed, so the only runtime validation left is the plant index.

use thiserror::Error;

/// Kinds of continuously growing plants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlantVariant {
    /// Fast grower with a modest maximum size.
    Flower,
    /// Slow grower with the largest maximum size.
    Tree,
    /// Slowest grower, small and thrifty with water.
    Cactus,
}

/// Per-variant growth constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthProfile {
    /// Size gained by one growth tick.
    pub growth_rate: f32,
    /// Size the plant can never exceed.
    pub max_growth: f32,
    /// Size gained by one watering.
    pub water_requirement: f32,
}

impl PlantVariant {
    /// Growth constants for this variant. Fixed configuration data.
    #[must_use]
    pub const fn profile(self) -> GrowthProfile {
        match self {
            Self::Flower => GrowthProfile {
                growth_rate: 1.5,
                max_growth: 100.0,
                water_requirement: 10.0,
            },
            Self::Tree => GrowthProfile {
                growth_rate: 0.5,
                max_growth: 200.0,
                water_requirement: 20.0,
            },
            Self::Cactus => GrowthProfile {
                growth_rate: 0.2,
                max_growth: 50.0,
                water_requirement: 5.0,
            },
        }
    }
}

/// Advances a plant's size by one growth tick, capped at the maximum.
#[must_use]
pub fn grow(variant: PlantVariant, size: f32) -> f32 {
    let profile = variant.profile();
    (size + profile.growth_rate).min(profile.max_growth)
}

/// Advances a plant's size by one watering, capped at the maximum.
#[must_use]
pub fn water(variant: PlantVariant, size: f32) -> f32 {
    let profile = variant.profile();
    (size + profile.water_requirement).min(profile.max_growth)
}

/// A single plant: its variant tag and its only mutable state, the size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantInstance {
    /// Variant deciding the growth constants.
    pub variant: PlantVariant,
    /// Current size in `[0, max_growth]`.
    pub size: f32,
}

/// Raised when a plant index does not name a managed plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("plant index {0} is out of range")]
pub struct InvalidPlantIndex(pub usize);

/// Owns a collection of plants and drives their growth over time.
#[derive(Debug, Default)]
pub struct Flora {
    plants: Vec<PlantInstance>,
}

impl Flora {
    /// Creates an empty plant collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new plant of the given variant at size zero.
    pub fn add_plant(&mut self, variant: PlantVariant) {
        self.plants.push(PlantInstance { variant, size: 0.0 });
    }

    /// Waters the plant at `index`, growing it by its water requirement.
    pub fn water_plant(&mut self, index: usize) -> Result<(), InvalidPlantIndex> {
        let plant = self
            .plants
            .get_mut(index)
            .ok_or(InvalidPlantIndex(index))?;
        plant.size = water(plant.variant, plant.size);
        Ok(())
    }

    /// Applies one growth tick to every managed plant.
    pub fn update_growth(&mut self) {
        for plant in &mut self.plants {
            plant.size = grow(plant.variant, plant.size);
        }
    }

    /// Read-only view of the managed plants.
    #[must_use]
    pub fn plants(&self) -> &[PlantInstance] {
        &self.plants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_rates_follow_the_profile_table() {
        assert_eq!(grow(PlantVariant::Flower, 0.0), 1.5);
        assert_eq!(grow(PlantVariant::Tree, 0.0), 0.5);
        assert_eq!(grow(PlantVariant::Cactus, 0.0), 0.2);
    }

    #[test]
    fn size_never_exceeds_the_variant_maximum() {
        assert_eq!(grow(PlantVariant::Cactus, 49.9), 50.0);
        assert_eq!(water(PlantVariant::Flower, 95.0), 100.0);
        assert_eq!(grow(PlantVariant::Tree, 200.0), 200.0);
    }

    #[test]
    fn watering_grows_by_the_water_requirement() {
        let mut flora = Flora::new();
        flora.add_plant(PlantVariant::Tree);
        flora.water_plant(0).expect("plant exists");
        assert_eq!(flora.plants()[0].size, 20.0);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut flora = Flora::new();
        flora.add_plant(PlantVariant::Flower);
        assert_eq!(flora.water_plant(3), Err(InvalidPlantIndex(3)));
    }

    #[test]
    fn update_grows_every_plant_independently() {
        let mut flora = Flora::new();
        flora.add_plant(PlantVariant::Flower);
        flora.add_plant(PlantVariant::Cactus);
        flora.update_growth();
        flora.update_growth();
        let sizes: Vec<f32> = flora.plants().iter().map(|plant| plant.size).collect();
        assert_eq!(sizes, vec![3.0, 0.4]);
    }
}
