//! Cumulative-weight table for weighted random choice

use super::RandomSource;

/// Weighted choice over a fixed set of values
///
/// Stores the running total of weights per entry. A roll in `[0, total)`
/// selects the first entry whose upper bound exceeds it.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<(T, u32)>,
    total: u32,
}

impl<T: Copy> WeightedTable<T> {
    /// Build from `(value, relative weight)` pairs. Zero weights never match.
    pub fn new(weights: &[(T, u32)]) -> Self {
        let mut total = 0;
        let entries = weights
            .iter()
            .map(|&(value, weight)| {
                total += weight;
                (value, total)
            })
            .collect();

        Self { entries, total }
    }

    /// Sum of all weights
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Map a roll in `[0, total)` to its value
    pub fn pick(&self, roll: u32) -> Option<T> {
        self.entries
            .iter()
            .find(|(_, upper)| roll < *upper)
            .map(|(value, _)| *value)
    }

    /// Draw one value; `None` when every weight is zero
    pub fn sample(&self, rng: &mut dyn RandomSource) -> Option<T> {
        if self.total == 0 {
            return None;
        }
        let roll = rng.int_in(0, i64::from(self.total) - 1);
        self.pick(roll as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PodStatus;
    use crate::sampler::StdRandom;

    fn pod_table() -> WeightedTable<PodStatus> {
        WeightedTable::new(&[
            (PodStatus::Running, 8),
            (PodStatus::Pending, 1),
            (PodStatus::Error, 1),
        ])
    }

    #[test]
    fn test_pick_walks_cumulative_bounds() {
        let table = pod_table();
        assert_eq!(table.total(), 10);

        for roll in 0..8 {
            assert_eq!(table.pick(roll), Some(PodStatus::Running));
        }
        assert_eq!(table.pick(8), Some(PodStatus::Pending));
        assert_eq!(table.pick(9), Some(PodStatus::Error));
        assert_eq!(table.pick(10), None);
    }

    #[test]
    fn test_zero_weight_entry_is_never_picked() {
        let table = WeightedTable::new(&[("a", 0), ("b", 3)]);
        for roll in 0..3 {
            assert_eq!(table.pick(roll), Some("b"));
        }
    }

    #[test]
    fn test_empty_table_samples_none() {
        let table: WeightedTable<u8> = WeightedTable::new(&[]);
        let mut rng = StdRandom::seeded(1);
        assert_eq!(table.sample(&mut rng), None);
    }

    #[test]
    fn test_sample_distribution_roughly_matches_weights() {
        let table = pod_table();
        let mut rng = StdRandom::seeded(1234);

        let draws = 10_000;
        let running = (0..draws)
            .filter(|_| table.sample(&mut rng) == Some(PodStatus::Running))
            .count();

        let ratio = running as f64 / draws as f64;
        assert!((0.75..0.85).contains(&ratio), "running ratio {}", ratio);
    }
}
