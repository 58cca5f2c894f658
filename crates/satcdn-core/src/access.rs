// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Categorical access-pattern sampler with optional one-hitter noise.
//! Weighted sampling is provided by `rand` (see DESIGN.md for the
//! grounding of this choice).

use rand::distributions::{Alphanumeric, Distribution, WeightedIndex};
use rand::Rng;

use crate::ids::ContentId;

const ONE_HITTER_LEN: usize = 10;

pub struct AccessGenerator {
    keys: Vec<ContentId>,
    weights: WeightedIndex<f64>,
    prob_one_hitter: f64,
}

impl AccessGenerator {
    /// `pattern` maps content id to probability; probabilities must sum to
    /// 1 within 1e-6 (validated at config load, not here — by the time this
    /// is constructed the pattern is trusted).
    pub fn new(pattern: &[(ContentId, f64)], prob_one_hitter: f64) -> Self {
        let keys = pattern.iter().map(|(k, _)| k.clone()).collect();
        let weights =
            WeightedIndex::new(pattern.iter().map(|(_, p)| *p)).expect("non-empty, non-negative pattern");
        Self {
            keys,
            weights,
            prob_one_hitter,
        }
    }

    /// Samples `num_to_gen` content ids. With independent probability
    /// `prob_one_hitter` per position, the drawn key is replaced by a fresh
    /// random 10-character alphanumeric string.
    pub fn generate<R: Rng + ?Sized>(&self, num_to_gen: usize, rng: &mut R) -> Vec<ContentId> {
        (0..num_to_gen)
            .map(|_| {
                if self.prob_one_hitter > 0.0 && rng.gen_bool(self.prob_one_hitter) {
                    one_hitter(rng)
                } else {
                    self.keys[self.weights.sample(rng)].clone()
                }
            })
            .collect()
    }
}

fn one_hitter<R: Rng + ?Sized>(rng: &mut R) -> ContentId {
    let s: String = rng
        .sample_iter(&Alphanumeric)
        .take(ONE_HITTER_LEN)
        .map(char::from)
        .collect();
    ContentId::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_only_from_pattern_when_noise_disabled() {
        let pattern = vec![(ContentId::from("a"), 0.5), (ContentId::from("b"), 0.5)];
        let gen = AccessGenerator::new(&pattern, 0.0);
        let mut rng = StdRng::seed_from_u64(7);
        let out = gen.generate(50, &mut rng);
        assert_eq!(out.len(), 50);
        assert!(out.iter().all(|c| c.as_str() == "a" || c.as_str() == "b"));
    }

    #[test]
    fn one_hitter_always_replaces_when_prob_is_one() {
        let pattern = vec![(ContentId::from("a"), 1.0)];
        let gen = AccessGenerator::new(&pattern, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let out = gen.generate(20, &mut rng);
        assert!(out.iter().all(|c| c.as_str() != "a"));
        assert!(out.iter().all(|c| c.as_str().len() == ONE_HITTER_LEN));
    }
}
