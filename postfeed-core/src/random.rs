//! Randomness capability used for post ids, author handles and promoted-post
//! selection.
//!
//! Production code uses [`OsRandom`], backed by the operating system CSPRNG.
//! Tests swap in a deterministic implementation.

use crate::error::CoreError;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

pub trait RandomSource: Send + Sync {
    /// Fills `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError>;

    /// Returns a uniformly distributed integer in `0..upper`.
    ///
    /// Each draw seeds a fresh `StdRng` from this source, so failures of the
    /// underlying source surface here instead of panicking inside `rand`.
    fn gen_index(&self, upper: usize) -> Result<usize, CoreError> {
        if upper == 0 {
            return Err(CoreError::InvalidInput {
                message: "cannot draw from an empty range".to_string(),
            });
        }

        let mut seed = <StdRng as SeedableRng>::Seed::default();
        self.fill_bytes(&mut seed)?;
        let mut rng = StdRng::from_seed(seed);
        Ok(Uniform::new(0, upper).sample(&mut rng))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CoreError::Randomness {
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantBytes(u8);

    impl RandomSource for ConstantBytes {
        fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError> {
            dest.fill(self.0);
            Ok(())
        }
    }

    struct Unavailable;

    impl RandomSource for Unavailable {
        fn fill_bytes(&self, _dest: &mut [u8]) -> Result<(), CoreError> {
            Err(CoreError::Randomness {
                reason: "no entropy".to_string(),
            })
        }
    }

    #[test]
    fn test_gen_index_stays_in_range() {
        let rng = OsRandom;
        for upper in [1usize, 2, 7, 36, 1000] {
            for _ in 0..200 {
                assert!(rng.gen_index(upper).unwrap() < upper);
            }
        }
    }

    #[test]
    fn test_gen_index_rejects_empty_range() {
        let result = OsRandom.gen_index(0);
        assert!(matches!(result, Err(CoreError::InvalidInput { .. })));
    }

    #[test]
    fn test_gen_index_is_determined_by_source_bytes() {
        let first = ConstantBytes(7).gen_index(36).unwrap();
        let second = ConstantBytes(7).gen_index(36).unwrap();
        assert_eq!(first, second);
        assert_eq!(ConstantBytes(7).gen_index(1).unwrap(), 0);
    }

    #[test]
    fn test_gen_index_reports_source_failure() {
        let result = Unavailable.gen_index(10);
        assert!(matches!(result, Err(CoreError::Randomness { .. })));
    }

    #[test]
    fn test_gen_index_covers_whole_range() {
        let mut seen = [false; 6];
        for _ in 0..500 {
            seen[OsRandom.gen_index(6).unwrap()] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn test_os_random_fills_buffer() {
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        OsRandom.fill_bytes(&mut first).unwrap();
        OsRandom.fill_bytes(&mut second).unwrap();
        assert_ne!(first, second);
    }
}
