//! Implementation of a saturating confidence counter.

/// Configuration for building a [`ConfidenceCounter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfidenceCounterConfig {
    /// The largest value the counter can hold
    pub max: u8,
}
impl ConfidenceCounterConfig {
    /// The 2-bit counter used by both value predictors.
    pub const TWO_BIT: Self = Self { max: 3 };

    pub fn storage_bits(&self) -> usize {
        (self.max.max(1).ilog2() + 1) as usize
    }

    /// Build a counter starting at some value (clamped to the maximum).
    pub fn build(self, init: u8) -> ConfidenceCounter {
        ConfidenceCounter {
            cfg: self,
            ctr: init.min(self.max),
        }
    }
}

/// An N-bit saturating counter estimating how reliable a prediction is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfidenceCounter {
    cfg: ConfidenceCounterConfig,
    ctr: u8,
}
impl ConfidenceCounter {
    /// Increment, saturating at the configured maximum.
    pub fn strengthen(&mut self) {
        if self.ctr < self.cfg.max {
            self.ctr += 1;
        }
    }

    /// Decrement, saturating at zero.
    pub fn weaken(&mut self) {
        self.ctr = self.ctr.saturating_sub(1);
    }

    pub fn get(&self) -> u8 { self.ctr }
}

impl Default for ConfidenceCounter {
    fn default() -> Self { ConfidenceCounterConfig::TWO_BIT.build(0) }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn saturates_both_ways() {
        let mut c = ConfidenceCounterConfig::TWO_BIT.build(1);
        for _ in 0..10 { c.strengthen(); }
        assert_eq!(c.get(), 3);
        for _ in 0..10 { c.weaken(); }
        assert_eq!(c.get(), 0);
    }

    #[test]
    fn build_clamps() {
        assert_eq!(ConfidenceCounterConfig::TWO_BIT.build(9).get(), 3);
        assert_eq!(ConfidenceCounterConfig::TWO_BIT.storage_bits(), 2);
    }

    proptest! {
        #[test]
        fn stays_in_range(ops in proptest::collection::vec(any::<bool>(), 0..512)) {
            let mut c = ConfidenceCounter::default();
            for up in ops {
                if up { c.strengthen() } else { c.weaken() }
                prop_assert!(c.get() <= 3);
            }
        }
    }
}
