//! Last-stride (LS) prediction: guess that a load returns the value it
//! returned last time, plus the difference between its last two values.

use crate::load::AccessWidth;
use crate::predictor::*;

/// An entry in a last-stride predictor table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LastStrideEntry {
    pub tag: u64,

    /// The last observed value (masked to the access width)
    pub last: u64,

    /// Difference between the last two observed values (mod 2^64)
    pub stride: u64,

    pub conf: ConfidenceCounter,

    /// Set once a stride has been observed
    pub have_two: bool,

    pub valid: bool,
}

impl ValueEntry for LastStrideEntry {
    const NAME: &'static str = "LS";

    fn payload_bits() -> usize {
        64 + 64 + ConfidenceCounterConfig::TWO_BIT.storage_bits() + 2
    }

    fn tag(&self) -> u64 { self.tag }
    fn is_valid(&self) -> bool { self.valid }
    fn confidence(&self) -> u8 { self.conf.get() }

    fn init(&mut self, tag: u64, value: u64, width: AccessWidth) {
        *self = Self {
            tag,
            last: width.mask(value),
            stride: 0,
            conf: ConfidenceCounterConfig::TWO_BIT.build(0),
            have_two: false,
            valid: true,
        };
    }

    fn update(&mut self, tag: u64, value: u64, width: AccessWidth) {
        // A stale slot can't provide a delta
        if !self.valid {
            self.init(tag, value, width);
            return;
        }

        let value = width.mask(value);
        let stride = value.wrapping_sub(width.mask(self.last));
        if self.have_two {
            if stride == self.stride {
                self.conf.strengthen();
            } else {
                self.conf.weaken();
                self.stride = stride;
            }
        } else {
            // One gap isn't evidence of anything yet
            self.stride = stride;
            self.have_two = true;
        }
        self.last = value;
    }

    fn prediction(&self, width: AccessWidth) -> Option<u64> {
        if self.have_two {
            Some(width.mask(self.last.wrapping_add(self.stride)))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn needs_two_values() {
        let mut e = LastStrideEntry::default();
        e.init(3, 100, AccessWidth::B4);
        assert_eq!(e.prediction(AccessWidth::B4), None);
        assert_eq!(e.confidence(), 0);

        e.update(3, 110, AccessWidth::B4);
        assert!(e.have_two);
        assert_eq!(e.stride, 10);
        assert_eq!(e.confidence(), 0);
        assert_eq!(e.prediction(AccessWidth::B4), Some(120));
    }

    #[test]
    fn stride_converges() {
        let base = 0x4000u64;
        let stride = 24u64;
        let w = AccessWidth::B8;
        let mut e = LastStrideEntry::default();
        e.init(0, base, w);
        e.update(0, base + stride, w);
        for i in 2..5 {
            e.update(0, base + i * stride, w);
        }
        assert_eq!(e.stride, stride);
        assert_eq!(e.confidence(), 3);
        assert_eq!(e.prediction(w), Some(base + 5 * stride));
    }

    #[test]
    fn negative_stride_wraps() {
        let w = AccessWidth::B8;
        let mut e = LastStrideEntry::default();
        e.init(0, 50, w);
        e.update(0, 40, w);
        assert_eq!(e.stride, (-10i64) as u64);
        assert_eq!(e.prediction(w), Some(30));
    }

    #[test]
    fn prediction_wraps_within_width() {
        let w = AccessWidth::B1;
        let mut e = LastStrideEntry::default();
        e.init(0, 0xf0, w);
        e.update(0, 0xf8, w);
        assert_eq!(e.prediction(w), Some(0x00));
    }

    #[test]
    fn broken_stride_is_replaced() {
        let w = AccessWidth::B8;
        let mut e = LastStrideEntry::default();
        e.init(0, 0, w);
        for v in [4, 8, 12] {
            e.update(0, v, w);
        }
        assert_eq!(e.confidence(), 2);
        e.update(0, 100, w);
        assert_eq!(e.confidence(), 1);
        assert_eq!(e.stride, 88);
        assert_eq!(e.last, 100);
    }

    #[test]
    fn invalid_slot_reinitializes() {
        let w = AccessWidth::B8;
        let mut e = LastStrideEntry {
            tag: 7, last: 1, stride: 5, have_two: true,
            conf: ConfidenceCounterConfig::TWO_BIT.build(3),
            valid: false,
        };
        e.update(7, 42, w);
        assert!(e.valid);
        assert!(!e.have_two);
        assert_eq!(e.stride, 0);
        assert_eq!(e.last, 42);
        assert_eq!(e.confidence(), 0);
    }

    proptest! {
        #[test]
        fn alternating_values_keep_confidence_bounded(
            a in any::<u64>(), b in any::<u64>(), n in 1usize..256
        ) {
            let w = AccessWidth::B8;
            let mut e = LastStrideEntry::default();
            e.init(0, a, w);
            for i in 0..n {
                e.update(0, if i % 2 == 0 { b } else { a }, w);
                prop_assert!(e.confidence() <= 3);
            }
        }
    }
}
