//! Placeholder listing attributes (`Surface`, `Rooms`) for datasets that lack them.
//!
//! The values are generated, not measured. They exist so the listing filters
//! have something to act on, and are reproducible for a given seed.

use crate::core::dataset::{Dataset, ROOMS, Record, SURFACE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

pub const DEFAULT_SEED: u64 = 42;

const SURFACE_RANGE: RangeInclusive<u32> = 30..=250;
const ROOMS_RANGE: RangeInclusive<u32> = 1..=6;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        SyntheticConfig { seed: DEFAULT_SEED }
    }
}

/// Returns a copy of `dataset` where every missing `Surface`/`Rooms` value is
/// filled from a generator seeded with `config.seed`.
///
/// Values already present are kept. Each row draws both values in order,
/// so a row's placeholders depend only on its position.
pub fn with_listing_attributes(dataset: &Dataset, config: &SyntheticConfig) -> Dataset {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let records: Vec<Record> = dataset
        .records()
        .iter()
        .map(|record| {
            let surface = rng.gen_range(SURFACE_RANGE);
            let rooms = rng.gen_range(ROOMS_RANGE);
            Record {
                surface: record.surface.or(Some(surface)),
                rooms: record.rooms.or(Some(rooms)),
                ..record.clone()
            }
        })
        .collect();

    let mut columns = dataset.columns().to_vec();
    for column in [SURFACE, ROOMS] {
        if !dataset.has_column(column) {
            debug!("Synthesizing column {column} with seed {}", config.seed);
            columns.push(column.to_string());
        }
    }

    Dataset::new(columns, records)
}

/// Minimum thresholds on the listing attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ListingFilter {
    pub min_surface: Option<u32>,
    pub min_rooms: Option<u32>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.min_surface.is_none() && self.min_rooms.is_none()
    }

    /// A row without a value for a constrained attribute does not match.
    pub fn matches(&self, record: &Record) -> bool {
        let meets = |threshold: Option<u32>, value: Option<u32>| match threshold {
            Some(min) => value.is_some_and(|v| v >= min),
            None => true,
        };
        meets(self.min_surface, record.surface) && meets(self.min_rooms, record.rooms)
    }

    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        if self.is_empty() {
            return dataset.clone();
        }
        let view = dataset.filtered(|r| self.matches(r));
        debug!(
            "Listing filter {:?} kept {}/{} rows",
            self,
            view.len(),
            dataset.len()
        );
        view
    }
}
