//! Last-value (LV) prediction: guess that a load returns the same value
//! it returned last time.

use crate::load::AccessWidth;
use crate::predictor::*;

/// An entry in a last-value predictor table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LastValueEntry {
    pub tag: u64,

    /// The last observed value (masked to the access width)
    pub last: u64,

    pub conf: ConfidenceCounter,
    pub valid: bool,
}

impl ValueEntry for LastValueEntry {
    const NAME: &'static str = "LV";

    fn payload_bits() -> usize {
        64 + ConfidenceCounterConfig::TWO_BIT.storage_bits() + 1
    }

    fn tag(&self) -> u64 { self.tag }
    fn is_valid(&self) -> bool { self.valid }
    fn confidence(&self) -> u8 { self.conf.get() }

    fn init(&mut self, tag: u64, value: u64, width: AccessWidth) {
        *self = Self {
            tag,
            last: width.mask(value),
            conf: ConfidenceCounterConfig::TWO_BIT.build(1),
            valid: true,
        };
    }

    fn update(&mut self, _tag: u64, value: u64, width: AccessWidth) {
        let value = width.mask(value);
        if width.mask(self.last) == value {
            self.conf.strengthen();
        } else {
            self.conf.weaken();
            self.last = value;
        }
        self.valid = true;
    }

    fn prediction(&self, width: AccessWidth) -> Option<u64> {
        Some(width.mask(self.last))
    }
}
