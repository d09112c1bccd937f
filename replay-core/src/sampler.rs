//! Fixed-interval query instants

use crate::{Error, Result};

/// Closed-interval sequence `start, start + step, ...` not exceeding `end`.
///
/// Cloning restarts the sequence from wherever the clone was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSampler {
    next: i64,
    end: i64,
    step: i64,
    done: bool,
}

impl FrameSampler {
    /// Creates a sampler over `[start, end]`. An empty range yields nothing.
    pub fn new(start: i64, end: i64, step: i64) -> Result<Self> {
        if step <= 0 {
            return Err(Error::InvalidConfig(format!(
                "sampling step must be positive, got {}",
                step
            )));
        }
        Ok(Self {
            next: start,
            end,
            step,
            done: start > end,
        })
    }
}

impl Iterator for FrameSampler {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.done {
            return None;
        }
        let current = self.next;
        match current.checked_add(self.step) {
            Some(next) if next <= self.end => self.next = next,
            _ => self.done = true,
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.done {
            0
        } else {
            let steps = (self.end as i128 - self.next as i128) / self.step as i128;
            usize::try_from(steps)
                .ok()
                .and_then(|n| n.checked_add(1))
                .unwrap_or(usize::MAX)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameSampler {}

impl std::iter::FusedIterator for FrameSampler {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_closed_interval() {
        let instants: Vec<i64> = FrameSampler::new(0, 30_000, 10_000).unwrap().collect();
        assert_eq!(instants, vec![0, 10_000, 20_000, 30_000]);
    }

    #[test]
    fn test_end_not_on_step() {
        let instants: Vec<i64> = FrameSampler::new(5, 25_004, 10_000).unwrap().collect();
        assert_eq!(instants, vec![5, 10_005, 20_005]);
    }

    #[test]
    fn test_degenerate_ranges() {
        let single: Vec<i64> = FrameSampler::new(42, 42, 10_000).unwrap().collect();
        assert_eq!(single, vec![42]);

        let sampler = FrameSampler::new(50, 10, 10_000).unwrap();
        assert_eq!(sampler.len(), 0);
        assert_eq!(sampler.count(), 0);
    }

    #[test]
    fn test_restartable() {
        let sampler = FrameSampler::new(0, 20, 10).unwrap();
        let first: Vec<i64> = sampler.clone().collect();
        let second: Vec<i64> = sampler.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_step() {
        assert!(FrameSampler::new(0, 10, 0).is_err());
        assert!(FrameSampler::new(0, 10, -1).is_err());
    }

    #[test]
    fn test_no_overflow_near_max() {
        let instants: Vec<i64> = FrameSampler::new(i64::MAX - 5, i64::MAX, 4).unwrap().collect();
        assert_eq!(instants, vec![i64::MAX - 5, i64::MAX - 1]);
    }

    #[test]
    fn test_len_saturates_on_full_range() {
        let sampler = FrameSampler::new(i64::MIN, i64::MAX, 1).unwrap();
        assert_eq!(sampler.len(), usize::MAX);

        let sampler = FrameSampler::new(i64::MIN, i64::MAX, i64::MAX).unwrap();
        assert_eq!(sampler.len(), 3);
        assert_eq!(sampler.collect::<Vec<_>>(), vec![i64::MIN, -1, i64::MAX - 1]);
    }

    proptest! {
        #[test]
        fn prop_instant_count(
            start in -1_000_000i64..1_000_000,
            span in 0i64..1_000_000,
            step in 1i64..50_000,
        ) {
            let end = start + span;
            let sampler = FrameSampler::new(start, end, step).unwrap();
            let expected = (span / step) as usize + 1;
            prop_assert_eq!(sampler.len(), expected);

            let instants: Vec<i64> = sampler.collect();
            prop_assert_eq!(instants.len(), expected);
            prop_assert_eq!(instants[0], start);
            let last = *instants.last().unwrap();
            prop_assert!(last <= end);
            prop_assert!(last + step > end);
        }
    }
}
