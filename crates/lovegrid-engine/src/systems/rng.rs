//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic and fast; the host supplies the seed so tests can pin it.

/// Seedable pseudo-random number generator (xorshift64).
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random number in [0, upper_bound). Returns 0 for an empty range.
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        if upper_bound == 0 {
            return 0;
        }
        (self.next_u64() % upper_bound as u64) as u32
    }

    /// Uniform index in [0, len) that is never `excluded`.
    ///
    /// Draws from the `len - 1` remaining slots and shifts past the excluded
    /// one, so it never loops. With `len <= 1` there is nothing else to pick
    /// and `excluded` (clamped into range) is returned.
    pub fn next_int_excluding(&mut self, len: u32, excluded: u32) -> u32 {
        if len <= 1 {
            return excluded.min(len.saturating_sub(1));
        }
        let pick = self.next_int(len - 1);
        if pick >= excluded {
            pick + 1
        } else {
            pick
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_deterministic() {
        let mut rng1 = Rng::new(42);
        let mut rng2 = Rng::new(42);
        for _ in 0..10 {
            assert_eq!(rng1.next_int(1000), rng2.next_int(1000));
        }
    }

    #[test]
    fn rng_zero_seed_handled() {
        let mut rng = Rng::new(0);
        let _ = rng.next_int(100);
    }

    #[test]
    fn empty_range_yields_zero() {
        let mut rng = Rng::new(9);
        assert_eq!(rng.next_int(0), 0);
    }

    #[test]
    fn excluding_never_returns_excluded() {
        let mut rng = Rng::new(123);
        for excluded in 0..5 {
            for _ in 0..200 {
                let v = rng.next_int_excluding(5, excluded);
                assert!(v < 5);
                assert_ne!(v, excluded);
            }
        }
    }

    #[test]
    fn excluding_with_two_is_the_other() {
        let mut rng = Rng::new(5);
        for _ in 0..20 {
            assert_eq!(rng.next_int_excluding(2, 1), 0);
            assert_eq!(rng.next_int_excluding(2, 0), 1);
        }
    }

    #[test]
    fn excluding_single_returns_it() {
        let mut rng = Rng::new(5);
        assert_eq!(rng.next_int_excluding(1, 0), 0);
    }
}
