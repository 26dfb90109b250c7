//! Distraction model
//!
//! Before each token the listener draws one independent event. When it
//! fires, processing pauses; the [`DistractionPolicy`] then decides whether
//! decoding resumes or the message is abandoned and re-queued.

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{DistractionPolicy, ListenerConfig};

/// Per-token interruption source
pub trait DistractionSource: Send {
    fn distracted(&mut self) -> bool;
}

/// Bernoulli draws from a seedable RNG
pub struct RandomDistraction {
    probability: f64,
    rng: StdRng,
}

impl RandomDistraction {
    pub fn new(probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        RandomDistraction {
            probability,
            rng,
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl DistractionSource for RandomDistraction {
    fn distracted(&mut self) -> bool {
        self.rng.gen_bool(self.probability)
    }
}

/// Replays a fixed sequence of draws, then stays attentive
#[derive(Clone, Debug, Default)]
pub struct ScriptedDistraction {
    draws: VecDeque<bool>,
}

impl ScriptedDistraction {
    pub fn new(draws: impl IntoIterator<Item = bool>) -> Self {
        ScriptedDistraction {
            draws: draws.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl DistractionSource for ScriptedDistraction {
    fn distracted(&mut self) -> bool {
        self.draws.pop_front().unwrap_or(false)
    }
}

/// A fired distraction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interruption {
    pub pause: Duration,
    pub policy: DistractionPolicy,
}

impl Interruption {
    pub fn aborts(&self) -> bool {
        self.policy == DistractionPolicy::Abort
    }
}

pub struct DistractionModel {
    source: Box<dyn DistractionSource>,
    pause: Duration,
    policy: DistractionPolicy,
}

impl DistractionModel {
    pub fn new(
        source: Box<dyn DistractionSource>,
        pause: Duration,
        policy: DistractionPolicy,
    ) -> Self {
        DistractionModel {
            source,
            pause,
            policy,
        }
    }

    /// Random model from configuration
    pub fn from_config(config: &ListenerConfig) -> Self {
        Self::new(
            Box::new(RandomDistraction::new(
                config.distraction_probability,
                config.seed,
            )),
            config.distraction_pause,
            config.distraction_policy,
        )
    }

    /// Draw the event for one token
    pub fn draw(&mut self) -> Option<Interruption> {
        self.source.distracted().then_some(Interruption {
            pause: self.pause,
            policy: self.policy,
        })
    }

    pub fn policy(&self) -> DistractionPolicy {
        self.policy
    }
}

impl std::fmt::Debug for DistractionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistractionModel")
            .field("pause", &self.pause)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_distraction_extremes() {
        let mut never = RandomDistraction::new(0.0, Some(1));
        let mut always = RandomDistraction::new(1.0, Some(1));

        for _ in 0..1000 {
            assert!(!never.distracted());
            assert!(always.distracted());
        }
    }

    #[test]
    fn test_random_distraction_rate() {
        let mut source = RandomDistraction::new(0.1, Some(42));
        let fired = (0..10_000).filter(|_| source.distracted()).count();

        // 1000 expected; generous bounds for a fixed seed
        assert!((800..1200).contains(&fired), "fired {} times", fired);
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let mut a = RandomDistraction::new(0.5, Some(9));
        let mut b = RandomDistraction::new(0.5, Some(9));

        let draws_a: Vec<bool> = (0..64).map(|_| a.distracted()).collect();
        let draws_b: Vec<bool> = (0..64).map(|_| b.distracted()).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_probability_is_clamped() {
        assert_eq!(RandomDistraction::new(3.0, None).probability(), 1.0);
        assert_eq!(RandomDistraction::new(-1.0, None).probability(), 0.0);
    }

    #[test]
    fn test_model_draw() {
        let mut model = DistractionModel::new(
            Box::new(ScriptedDistraction::new([false, true])),
            Duration::from_millis(1000),
            DistractionPolicy::Resume,
        );

        assert_eq!(model.draw(), None);
        let interruption = model.draw().unwrap();
        assert_eq!(interruption.pause, Duration::from_millis(1000));
        assert!(!interruption.aborts());
        // Script exhausted
        assert_eq!(model.draw(), None);
    }
}
