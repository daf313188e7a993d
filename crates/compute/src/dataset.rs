//! Historical sensor table used to fit the classifier.
//!
//! The dataset is a fixture injected at construction time. [`HistoricalDataset::builtin`]
//! returns the reference ten-row table; tests and callers can supply their own rows.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use upkeep_core::{HistoricalRecord, Result, SensorReading, UpkeepError};

/// Reference maintenance history: (temperature, vibration, pressure, maintenance_needed).
const BUILTIN_RECORDS: [HistoricalRecord; 10] = [
    HistoricalRecord::new(75.0, 0.5, 30.0, false),
    HistoricalRecord::new(80.0, 0.7, 35.0, false),
    HistoricalRecord::new(90.0, 0.9, 40.0, true),
    HistoricalRecord::new(70.0, 0.4, 28.0, false),
    HistoricalRecord::new(85.0, 0.8, 38.0, true),
    HistoricalRecord::new(95.0, 1.0, 42.0, true),
    HistoricalRecord::new(65.0, 0.3, 25.0, false),
    HistoricalRecord::new(78.0, 0.6, 33.0, false),
    HistoricalRecord::new(92.0, 0.95, 41.0, true),
    HistoricalRecord::new(88.0, 0.85, 39.0, true),
];

/// Immutable, ordered table of labelled readings.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDataset {
    records: Vec<HistoricalRecord>,
}

impl HistoricalDataset {
    pub fn builtin() -> Self {
        Self {
            records: BUILTIN_RECORDS.to_vec(),
        }
    }

    /// Build a dataset from caller-supplied rows. Row order is preserved.
    pub fn from_records(records: Vec<HistoricalRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(UpkeepError::EmptyDataset);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    /// Feature matrix, index-aligned with [`labels`](Self::labels).
    pub fn features(&self) -> Vec<SensorReading> {
        self.records.iter().map(|r| r.reading).collect()
    }

    pub fn labels(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.maintenance_needed).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Shuffle row indices with a seeded RNG and hold out `ceil(n * test_fraction)`
    /// rows for testing. The train partition always keeps at least one row.
    ///
    /// Same dataset + same fraction + same seed always yields the same split.
    pub fn split(&self, test_fraction: f64, seed: u64) -> TrainTestSplit {
        let n = self.records.len();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let fraction = if test_fraction.is_finite() {
            test_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let test_len = ((n as f64 * fraction).ceil() as usize).min(n.saturating_sub(1));

        let (test_idx, train_idx) = indices.split_at(test_len);
        TrainTestSplit {
            train: train_idx.iter().map(|&i| self.records[i]).collect(),
            test: test_idx.iter().map(|&i| self.records[i]).collect(),
        }
    }
}

/// Deterministic partition of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainTestSplit {
    pub train: Vec<HistoricalRecord>,
    /// Held out for the accuracy report only; never consulted at inference.
    pub test: Vec<HistoricalRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort_key(r: &HistoricalRecord) -> (i64, i64, i64) {
        (
            (r.reading.temperature * 100.0) as i64,
            (r.reading.vibration * 100.0) as i64,
            (r.reading.pressure * 100.0) as i64,
        )
    }

    #[test]
    fn builtin_is_balanced_and_aligned() {
        let ds = HistoricalDataset::builtin();
        assert_eq!(ds.len(), 10);
        assert_eq!(ds.features().len(), ds.labels().len());
        assert_eq!(ds.labels().iter().filter(|l| **l).count(), 5);
        assert_eq!(ds.features()[5], SensorReading::new(95.0, 1.0, 42.0));
        assert!(ds.labels()[5]);
    }

    #[test]
    fn empty_records_rejected() {
        assert_eq!(
            HistoricalDataset::from_records(Vec::new()),
            Err(UpkeepError::EmptyDataset)
        );
    }

    #[test]
    fn split_sizes_follow_fraction() {
        let split = HistoricalDataset::builtin().split(0.3, 42);
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 7);
    }

    #[test]
    fn split_is_a_partition() {
        let ds = HistoricalDataset::builtin();
        let split = ds.split(0.3, 42);
        let mut all: Vec<_> = split.train.iter().chain(split.test.iter()).copied().collect();
        let mut expected = ds.records().to_vec();
        all.sort_by_key(sort_key);
        expected.sort_by_key(sort_key);
        assert_eq!(all, expected);
    }

    #[test]
    fn split_is_reproducible() {
        let ds = HistoricalDataset::builtin();
        assert_eq!(ds.split(0.3, 42), ds.split(0.3, 42));
    }

    #[test]
    fn zero_fraction_trains_on_everything() {
        let ds = HistoricalDataset::builtin();
        let split = ds.split(0.0, 42);
        assert!(split.test.is_empty());
        assert_eq!(split.train.len(), 10);
    }

    #[test]
    fn single_row_stays_in_train() {
        let ds = HistoricalDataset::from_records(vec![HistoricalRecord::new(1.0, 1.0, 1.0, true)])
            .unwrap();
        let split = ds.split(0.5, 1);
        assert_eq!(split.train.len(), 1);
        assert!(split.test.is_empty());
    }
}
