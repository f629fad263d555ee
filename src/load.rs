//! Types describing a single memory load observed in a trace.

use crate::error::TraceError;

/// The size of a load access in bytes.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessWidth {
    B1 = 1,
    B2 = 2,
    B4 = 4,
    B8 = 8,
}
impl AccessWidth {
    /// Returns the number of bytes touched by this access.
    pub fn bytes(&self) -> u8 { *self as u8 }

    /// Returns a mask selecting the bits visible to an access of this width.
    pub fn value_mask(&self) -> u64 {
        match self {
            Self::B1 => 0xff,
            Self::B2 => 0xffff,
            Self::B4 => 0xffff_ffff,
            Self::B8 => u64::MAX,
        }
    }

    /// Truncate some value to the bits visible to an access of this width.
    pub fn mask(&self, value: u64) -> u64 {
        value & self.value_mask()
    }
}

impl TryFrom<u64> for AccessWidth {
    type Error = TraceError;
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            1 => Ok(Self::B1),
            2 => Ok(Self::B2),
            4 => Ok(Self::B4),
            8 => Ok(Self::B8),
            _ => Err(TraceError::InvalidWidth(x)),
        }
    }
}

impl std::fmt::Display for AccessWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}B", self.bytes())
    }
}

/// A record of one load instruction executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadRecord {
    /// The program counter value for this load
    pub pc: u64,

    /// The size of the access
    pub width: AccessWidth,

    /// The value returned by the load
    pub value: u64,

    /// Whether a predicted value would be allowed to be consumed
    pub eligible: bool,
}
impl LoadRecord {
    pub fn new(pc: u64, width: AccessWidth, value: u64) -> Self {
        Self { pc, width, value, eligible: true }
    }

    /// Mark this load as (in)eligible for value prediction.
    pub fn with_eligible(mut self, eligible: bool) -> Self {
        self.eligible = eligible;
        self
    }

    /// The loaded value truncated to the access width.
    pub fn masked_value(&self) -> u64 {
        self.width.mask(self.value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    const WIDTHS: [AccessWidth; 4] = [
        AccessWidth::B1, AccessWidth::B2, AccessWidth::B4, AccessWidth::B8
    ];

    #[test]
    fn width_from_int() {
        assert_eq!(AccessWidth::try_from(4).unwrap(), AccessWidth::B4);
        assert_eq!(AccessWidth::try_from(8).unwrap().bytes(), 8);
        assert!(AccessWidth::try_from(3).is_err());
        assert!(AccessWidth::try_from(0).is_err());
        assert!(AccessWidth::try_from(16).is_err());
    }

    #[test]
    fn mask_truncates() {
        let v = 0x1122_3344_5566_7788;
        assert_eq!(AccessWidth::B1.mask(v), 0x88);
        assert_eq!(AccessWidth::B2.mask(v), 0x7788);
        assert_eq!(AccessWidth::B4.mask(v), 0x5566_7788);
        assert_eq!(AccessWidth::B8.mask(v), v);
    }

    proptest! {
        #[test]
        fn mask_is_idempotent(v in any::<u64>(), w in 0usize..4) {
            let width = WIDTHS[w];
            prop_assert_eq!(width.mask(width.mask(v)), width.mask(v));
        }
    }
}
