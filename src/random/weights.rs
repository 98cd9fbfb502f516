use crate::utils::{Result, UtilError};
use rand::Rng;

/// Named weights for a weighted random pick.
///
/// Entries are walked in insertion order, so a seeded generator always
/// yields the same sequence of names.
#[derive(Debug, Clone, Default)]
pub struct MapWeights {
    entries: Vec<(String, u32)>,
    total_weight: u64,
    default_name: String,
}

impl MapWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_weight(
        &mut self,
        name: impl Into<String>,
        weight: u32,
        is_default: bool,
    ) -> Result<()> {
        let name = name.into();
        if self.entries.iter().any(|(n, _)| *n == name) {
            tracing::error!(name = %name, "MapWeights::add_weight: duplicate name");
            return Err(UtilError::DuplicateWeightName(name));
        }

        self.total_weight += u64::from(weight);
        if is_default {
            self.default_name = name.clone();
        }
        self.entries.push((name, weight));

        Ok(())
    }

    /// Makes the first entry with the greatest weight the default. Leaves the
    /// default unchanged when every weight is zero.
    pub fn set_default_is_max_weight(&mut self) {
        let mut max = 0;
        for (name, weight) in &self.entries {
            if *weight > max {
                max = *weight;
                self.default_name = name.clone();
            }
        }
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pick(&self) -> &str {
        self.pick_with(&mut rand::thread_rng())
    }

    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        if self.total_weight == 0 {
            tracing::error!(
                entries = self.entries.len(),
                default = %self.default_name,
                "MapWeights::pick: no weight to pick from"
            );
            return &self.default_name;
        }

        let mut cr = rng.gen_range(0..self.total_weight);
        for (name, weight) in &self.entries {
            let weight = u64::from(*weight);
            if cr < weight {
                return name;
            }
            cr -= weight;
        }

        tracing::error!(cr = cr, "MapWeights::pick: draw out of range");
        &self.default_name
    }
}
