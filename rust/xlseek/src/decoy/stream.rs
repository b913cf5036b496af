use rand::{
    Rng,
    SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use serde::{
    Deserialize,
    Serialize,
};
use std::time::{
    SystemTime,
    UNIX_EPOCH,
};
use tracing::info;

/// Session seed, either fixed for reproducible runs or taken from the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedConfig {
    Fixed(u64),
    Named(SeedKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedKeyword {
    Time,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig::Fixed(1)
    }
}

impl SeedConfig {
    pub fn resolve(&self) -> u64 {
        match self {
            SeedConfig::Fixed(x) => *x,
            SeedConfig::Named(SeedKeyword::Time) => {
                let seed = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                info!("Seeding decoy generation from the clock: {}", seed);
                seed
            }
        }
    }
}

impl std::str::FromStr for SeedConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("time") {
            return Ok(SeedConfig::Named(SeedKeyword::Time));
        }
        s.parse::<u64>()
            .map(SeedConfig::Fixed)
            .map_err(|_| format!("Invalid seed: '{}'. Expected an integer or 'time'", s))
    }
}

/// The explicit random source used for decoy shuffling.
///
/// Every independent unit of work gets its own stream derived from the
/// session seed and a task id, so results do not depend on thread
/// scheduling.
#[derive(Debug, Clone)]
pub struct ShuffleStream {
    rng: ChaCha8Rng,
}

impl ShuffleStream {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn for_task(seed: u64, task: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(task);
        Self { rng }
    }

    /// Uniform draw from the closed interval `[low, high]`.
    pub fn draw_inclusive(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = ShuffleStream::for_task(42, 7);
        let mut b = ShuffleStream::for_task(42, 7);
        let da: Vec<_> = (0..32).map(|_| a.draw_inclusive(0, 1000)).collect();
        let db: Vec<_> = (0..32).map(|_| b.draw_inclusive(0, 1000)).collect();
        assert_eq!(da, db);
    }

    #[test]
    fn test_tasks_diverge() {
        let mut a = ShuffleStream::for_task(42, 1);
        let mut b = ShuffleStream::for_task(42, 2);
        let da: Vec<_> = (0..32).map(|_| a.draw_inclusive(0, 1000)).collect();
        let db: Vec<_> = (0..32).map(|_| b.draw_inclusive(0, 1000)).collect();
        assert_ne!(da, db);
    }

    #[test]
    fn test_draw_bounds() {
        let mut s = ShuffleStream::from_seed(3);
        for _ in 0..200 {
            let x = s.draw_inclusive(4, 6);
            assert!((4..=6).contains(&x));
        }
        assert_eq!(s.draw_inclusive(5, 5), 5);
    }

    #[test]
    fn test_seed_config_parsing() {
        assert_eq!("12".parse::<SeedConfig>().unwrap(), SeedConfig::Fixed(12));
        assert_eq!(
            "time".parse::<SeedConfig>().unwrap(),
            SeedConfig::Named(SeedKeyword::Time)
        );
        assert!("tomorrow".parse::<SeedConfig>().is_err());
        let from_json: SeedConfig = serde_json::from_str("\"time\"").unwrap();
        assert_eq!(from_json, SeedConfig::Named(SeedKeyword::Time));
        let from_json: SeedConfig = serde_json::from_str("5").unwrap();
        assert_eq!(from_json, SeedConfig::Fixed(5));
    }
}
