//! Property tests for the random building blocks.

use proptest::prelude::*;
use whackamole_core::{set_delay, Difficulty, GameRng, HoleSelector, ValidationError};

proptest! {
    #[test]
    fn random_integer_stays_in_range(seed: u64, a in 0u64..10_000, b in 0u64..10_000) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let mut rng = GameRng::seeded(seed);
        for _ in 0..32 {
            let n = rng.random_integer(min, max).unwrap();
            prop_assert!(n >= min && n <= max);
        }
    }

    #[test]
    fn inverted_range_is_rejected(seed: u64, min in 1u64..10_000, gap in 1u64..100) {
        let max = min.saturating_sub(gap);
        prop_assume!(max < min);
        let mut rng = GameRng::seeded(seed);
        prop_assert_eq!(
            rng.random_integer(min, max),
            Err(ValidationError::InvalidRange { min, max })
        );
    }

    #[test]
    fn selector_never_repeats(seed: u64, count in 2usize..20) {
        let selector = HoleSelector::new(count).unwrap();
        let mut rng = GameRng::seeded(seed);
        let mut last = None;
        for _ in 0..100 {
            let previous = last;
            let chosen = selector.choose_hole(&mut rng, &mut last).unwrap();
            prop_assert!(selector.contains(chosen));
            prop_assert_ne!(Some(chosen), previous);
            prop_assert_eq!(last, Some(chosen));
        }
    }

    #[test]
    fn hard_delay_in_bounds(seed: u64) {
        let mut rng = GameRng::seeded(seed);
        let delay = set_delay(Difficulty::Hard, &mut rng).unwrap();
        prop_assert!((600..=1200).contains(&delay));
    }
}
