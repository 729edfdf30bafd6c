//! Seedable random source shared by the delay policy and the hole selector.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

use crate::error::ValidationError;

/// Random number source for a game.
///
/// Seeded games are fully reproducible; unseeded games draw from entropy.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: Mcg128Xsl64,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Uniform integer over the inclusive range `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`] when `min > max`.
    pub fn random_integer(&mut self, min: u64, max: u64) -> Result<u64, ValidationError> {
        if min > max {
            return Err(ValidationError::InvalidRange { min, max });
        }
        Ok(self.inner.gen_range(min..=max))
    }

    /// Bernoulli draw, used by the simulated player.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_integer_stays_in_bounds_and_covers_them() {
        let mut rng = GameRng::seeded(7);
        let mut lo = u64::MAX;
        let mut hi = 0;
        for _ in 0..10_000 {
            let v = rng.random_integer(3, 11).unwrap();
            assert!((3..=11).contains(&v));
            lo = lo.min(v);
            hi = hi.max(v);
        }
        assert_eq!(lo, 3);
        assert_eq!(hi, 11);
    }

    #[test]
    fn degenerate_range_returns_the_single_value() {
        let mut rng = GameRng::seeded(1);
        assert_eq!(rng.random_integer(5, 5).unwrap(), 5);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut rng = GameRng::seeded(1);
        assert_eq!(
            rng.random_integer(9, 2),
            Err(ValidationError::InvalidRange { min: 9, max: 2 })
        );
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = GameRng::seeded(12345);
        let mut b = GameRng::seeded(12345);
        for _ in 0..100 {
            assert_eq!(
                a.random_integer(0, 1_000).unwrap(),
                b.random_integer(0, 1_000).unwrap()
            );
        }
    }
}
