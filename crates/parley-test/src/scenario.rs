//! Delivery scenarios
//!
//! Models an unreliable sender's pacing:
//! - Steady intervals
//! - Uniform jitter
//! - Heavy-tailed (Pareto) stalls
//! - Interleaved keep-alive sentinels

use std::time::Duration;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use parley_core::SENTINEL;

/// Jitter distribution type
#[derive(Clone, Debug)]
pub enum JitterDistribution {
    None,
    /// Uniform distribution
    Uniform { min_ms: u32, max_ms: u32 },
    /// Pareto distribution (heavy tail)
    Pareto { scale_ms: f64, shape: f64 },
}

impl JitterDistribution {
    /// Sample a jitter value
    pub fn sample(&self, rng: &mut StdRng) -> Duration {
        match self {
            JitterDistribution::None => Duration::ZERO,
            JitterDistribution::Uniform { min_ms, max_ms } => {
                if min_ms >= max_ms {
                    return Duration::from_millis(*min_ms as u64);
                }
                let dist = Uniform::new(*min_ms, *max_ms);
                Duration::from_millis(dist.sample(rng) as u64)
            }
            JitterDistribution::Pareto { scale_ms, shape } => {
                let u: f64 = rng.gen_range(f64::EPSILON..1.0);
                let value = scale_ms / u.powf(1.0 / shape);
                Duration::from_millis(value.min(10_000.0) as u64) // Cap at 10 seconds
            }
        }
    }
}

/// Delivery pacing configuration
#[derive(Clone, Debug)]
pub struct DeliveryConfig {
    /// Base gap between messages
    pub interval: Duration,
    /// Extra delay added to each gap
    pub jitter: JitterDistribution,
    /// Insert a sentinel after every n messages
    pub sentinel_every: Option<usize>,
    /// Whether messages carry an acknowledgement
    pub acknowledged: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        DeliveryConfig {
            interval: Duration::from_millis(1000),
            jitter: JitterDistribution::Uniform {
                min_ms: 0,
                max_ms: 500,
            },
            sentinel_every: None,
            acknowledged: true,
        }
    }
}

impl DeliveryConfig {
    /// Fixed one-second gaps
    pub fn steady() -> Self {
        DeliveryConfig {
            jitter: JitterDistribution::None,
            ..Self::default()
        }
    }

    /// Short gaps with occasional long stalls
    pub fn bursty() -> Self {
        DeliveryConfig {
            interval: Duration::from_millis(100),
            jitter: JitterDistribution::Pareto {
                scale_ms: 50.0,
                shape: 1.2,
            },
            sentinel_every: Some(5),
            acknowledged: true,
        }
    }
}

/// Message scheduled at an offset from the start of the plan
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledMessage {
    pub seq: u64,
    pub at: Duration,
    pub message: String,
    pub acknowledged: bool,
}

impl ScheduledMessage {
    pub fn is_sentinel(&self) -> bool {
        self.message == SENTINEL
    }
}

#[derive(Clone, Debug, Default)]
pub struct DeliveryPlan {
    messages: Vec<ScheduledMessage>,
}

impl DeliveryPlan {
    /// Schedule messages with seeded jitter
    pub fn build<I, S>(messages: I, config: &DeliveryConfig, seed: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut plan = DeliveryPlan::default();
        let mut at = Duration::ZERO;
        let mut seq = 0;

        for (i, message) in messages.into_iter().enumerate() {
            at += config.interval + config.jitter.sample(&mut rng);
            plan.messages.push(ScheduledMessage {
                seq,
                at,
                message: message.into(),
                acknowledged: config.acknowledged,
            });
            seq += 1;

            if config.sentinel_every.is_some_and(|n| n > 0 && (i + 1) % n == 0) {
                plan.messages.push(ScheduledMessage {
                    seq,
                    at,
                    message: SENTINEL.to_string(),
                    acknowledged: config.acknowledged,
                });
                seq += 1;
            }
        }

        plan
    }

    pub fn messages(&self) -> &[ScheduledMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn sentinel_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_sentinel()).count()
    }

    /// Offset of the last message
    pub fn duration(&self) -> Duration {
        self.messages.last().map_or(Duration::ZERO, |m| m.at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_plan_offsets() {
        let plan = DeliveryPlan::build(["B", "K", "R"], &DeliveryConfig::steady(), 1);

        let offsets: Vec<Duration> = plan.messages().iter().map(|m| m.at).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3)
            ]
        );
        assert_eq!(plan.duration(), Duration::from_secs(3));
    }

    #[test]
    fn test_plan_is_seeded() {
        let config = DeliveryConfig::bursty();
        let words = ["B", "K", "R", "Z", "L", "B-K", "K-R"];

        let a = DeliveryPlan::build(words, &config, 7);
        let b = DeliveryPlan::build(words, &config, 7);
        assert_eq!(a.messages(), b.messages());
    }

    #[test]
    fn test_sentinels_interleaved() {
        let config = DeliveryConfig {
            sentinel_every: Some(2),
            ..DeliveryConfig::steady()
        };
        let plan = DeliveryPlan::build(["B", "K", "R", "Z", "L"], &config, 1);

        assert_eq!(plan.len(), 7);
        assert_eq!(plan.sentinel_count(), 2);
        assert!(plan.messages()[2].is_sentinel());
        assert!(plan.messages()[5].is_sentinel());
    }

    #[test]
    fn test_jitter_distribution() {
        let mut rng = StdRng::seed_from_u64(42);

        let pareto = JitterDistribution::Pareto {
            scale_ms: 50.0,
            shape: 1.5,
        };

        let samples: Vec<Duration> = (0..1000).map(|_| pareto.sample(&mut rng)).collect();
        let avg = samples.iter().map(|d| d.as_millis()).sum::<u128>() / 1000;

        // Should have heavy tail
        let max = samples.iter().map(|d| d.as_millis()).max().unwrap();
        assert!(max > avg * 2);
        assert!(samples.iter().all(|d| d.as_millis() >= 50));
    }
}
